#![allow(clippy::unwrap_used)]

use std::ptr;

use cosmian_pkcs11_sys::Platform;
use strum::IntoEnumIterator;

mod arena;
mod families;
mod mechanism;
mod outputs;

/// Run a test generic over the layout with the layout of this process
macro_rules! with_current_layout {
    ($test:ident) => {
        cosmian_pkcs11_sys::with_layout!(cosmian_pkcs11_sys::Platform::current(), L => $test::<L>())
    };
}
pub(crate) use with_current_layout;

/// Any platform but the one fixed for this process
pub(crate) fn other_platform() -> Platform {
    let current = Platform::current();
    Platform::iter().find(|p| *p != current).unwrap()
}

// The helpers below play the part of the Cryptoki library: they read and
// write through the pointers found in the marshaled structures.

pub(crate) fn read_bytes(ptr: *mut u8, len: usize) -> Vec<u8> {
    assert!(!ptr.is_null());
    unsafe { std::slice::from_raw_parts(ptr, len) }.to_vec()
}

pub(crate) fn write_bytes(ptr: *mut u8, bytes: &[u8]) {
    assert!(!ptr.is_null());
    unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, bytes.len()) }
}

pub(crate) fn read_value<T: Copy>(ptr: *mut u8) -> T {
    assert!(!ptr.is_null());
    unsafe { ptr::read_unaligned(ptr.cast::<T>()) }
}

pub(crate) fn write_value<T: Copy>(ptr: *mut u8, value: T) {
    assert!(!ptr.is_null());
    unsafe { ptr::write_unaligned(ptr.cast::<T>(), value) }
}
