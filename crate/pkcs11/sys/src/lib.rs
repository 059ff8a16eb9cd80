//! Copyright 2024 Cosmian Tech SAS
//!
//! Low level Cryptoki definitions shared by the mechanism parameter objects.
//!
//! PKCS#11 structures do not have a single binary layout: `CK_ULONG` is 4 bytes
//! on Windows and 32-bit Unix but 8 bytes on 64-bit Unix, and Windows headers
//! are compiled with `#pragma pack(1)`. Every structure is therefore defined
//! once, generic over a [`CkLayout`] marker, and instantiated for one of the
//! four [`Platform`] variants picked by the platform resolver.

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(non_snake_case)]
#![allow(non_camel_case_types)]
#![allow(clippy::upper_case_acronyms)]

pub use config::{PLATFORM_ENV_VAR, PlatformConfig};
pub use layout::{
    CField, CFieldDef, CLayout, CMember, CStruct, CkLayout, NativeLayout, NativePtr, NativeUlong,
    PackedPtr, PackedU32, PackedU64, RawPtr, Ulong4Natural, Ulong4Packed, Ulong8Natural,
    Ulong8Packed, c_layout, padding_offsets,
};
pub use platform::{Packing, Platform, PlatformError};
pub use structs::*;

mod config;
pub mod consts;
mod layout;
mod platform;
mod structs;

/// Run `$body` with `$layout` bound to the marker type of `$platform`.
///
/// ```ignore
/// let size = with_layout!(Platform::current(), L => size_of::<CK_GCM_PARAMS<L>>());
/// ```
#[macro_export]
macro_rules! with_layout {
    ($platform:expr, $layout:ident => $body:expr) => {
        match $platform {
            $crate::Platform::Ulong4Packed => {
                type $layout = $crate::Ulong4Packed;
                $body
            }
            $crate::Platform::Ulong4Natural => {
                type $layout = $crate::Ulong4Natural;
                $body
            }
            $crate::Platform::Ulong8Packed => {
                type $layout = $crate::Ulong8Packed;
                $body
            }
            $crate::Platform::Ulong8Natural => {
                type $layout = $crate::Ulong8Natural;
                $body
            }
        }
    };
}
