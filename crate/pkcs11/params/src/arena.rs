//! Unmanaged memory blocks handed to the Cryptoki library.
//!
//! A block is either live (non-null pointer, length > 0) or released (null
//! pointer, zero length). Releasing is idempotent and wipes the content first:
//! blocks routinely hold passwords, shared secrets and key material.

use std::{
    alloc::{Layout, alloc_zeroed, dealloc, handle_alloc_error},
    cell::Cell,
    ptr::{self, NonNull},
    slice,
};

use cosmian_pkcs11_sys::{CMember, CStruct, NativePtr, NativeUlong};
use tracing::trace;
use zeroize::Zeroize;

use crate::{PResult, Pkcs11Error};

/// Alignment of every block, enough for any Cryptoki structure
const BLOCK_ALIGN: usize = 16;

/// Allocation counters of the current thread
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaStats {
    pub allocations: u64,
    pub frees: u64,
    pub live_bytes: usize,
}

thread_local! {
    static STATS: Cell<ArenaStats> = const {
        Cell::new(ArenaStats {
            allocations: 0,
            frees: 0,
            live_bytes: 0,
        })
    };
}

/// Counters of the blocks allocated and freed by the current thread
#[must_use]
pub fn stats() -> ArenaStats {
    STATS.with(Cell::get)
}

pub fn reset_stats() {
    STATS.with(|s| s.set(ArenaStats::default()));
}

fn record(update: impl FnOnce(&mut ArenaStats)) {
    STATS.with(|s| {
        let mut stats = s.get();
        update(&mut stats);
        s.set(stats);
    });
}

/// A block of raw memory, owned by exactly one object at a time
#[derive(Debug)]
pub struct UnmanagedBlock {
    ptr: Option<NonNull<u8>>,
    len: usize,
}

impl Default for UnmanagedBlock {
    fn default() -> Self {
        Self::null()
    }
}

impl UnmanagedBlock {
    /// The released block: null pointer, zero length
    #[must_use]
    pub const fn null() -> Self {
        Self { ptr: None, len: 0 }
    }

    /// Reserve `len` zeroed bytes. A zero length yields the null block.
    ///
    /// A length no allocation can satisfy is rejected. Running out of memory
    /// is fatal: the process aborts through [`handle_alloc_error`], nothing is
    /// retried.
    pub fn allocate(len: usize) -> PResult<Self> {
        if len == 0 {
            return Ok(Self::null());
        }
        let layout = Layout::from_size_align(len, BLOCK_ALIGN)
            .map_err(|_| Pkcs11Error::Allocation(len))?;
        // SAFETY: `layout` has a non zero size
        let raw = unsafe { alloc_zeroed(layout) };
        let Some(ptr) = NonNull::new(raw) else {
            handle_alloc_error(layout)
        };
        record(|s| {
            s.allocations += 1;
            s.live_bytes += len;
        });
        trace!("allocated {len} bytes at {ptr:p}");
        Ok(Self {
            ptr: Some(ptr),
            len,
        })
    }

    /// Allocate a block sized to `bytes` and copy them in
    pub fn from_bytes(bytes: &[u8]) -> PResult<Self> {
        let mut block = Self::allocate(bytes.len())?;
        block.write(bytes)?;
        Ok(block)
    }

    /// Absent inputs map to the null block
    pub fn from_optional(bytes: Option<&[u8]>) -> PResult<Self> {
        bytes.map_or_else(|| Ok(Self::null()), Self::from_bytes)
    }

    /// Allocate a block holding a single native `CK_ULONG`
    pub fn from_ulong<U: NativeUlong>(value: U) -> PResult<Self> {
        Self::from_member(&value)
    }

    /// Allocate a block holding `value` as a C compiler lays it out, padding zeroed
    pub fn from_member<T: CMember>(value: &T) -> PResult<Self> {
        Self::from_bytes(&value.to_c_bytes())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the block is released (or was never allocated)
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.ptr.is_none()
    }

    /// Raw address, null when released
    #[must_use]
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    /// Address as a structure member of the selected layout
    #[must_use]
    pub fn ptr<P: NativePtr>(&self) -> P {
        P::from_raw(self.as_ptr())
    }

    fn ensure_capacity(&self, requested: usize) -> PResult<()> {
        if requested > self.len {
            return Err(Pkcs11Error::BufferOverflow {
                capacity: self.len,
                requested,
            });
        }
        Ok(())
    }

    /// Copy `bytes` at the start of the block
    pub fn write(&mut self, bytes: &[u8]) -> PResult<()> {
        self.ensure_capacity(bytes.len())?;
        if let Some(ptr) = self.ptr {
            // SAFETY: the block holds at least `bytes.len()` bytes
            unsafe {
                ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len());
            }
        }
        Ok(())
    }

    /// Copy `len` bytes out of the block.
    ///
    /// A released block yields `None` and is never dereferenced.
    pub fn read(&self, len: usize) -> PResult<Option<Vec<u8>>> {
        let Some(ptr) = self.ptr else {
            return Ok(None);
        };
        self.ensure_capacity(len)?;
        // SAFETY: the block holds at least `len` initialised bytes
        let bytes = unsafe { slice::from_raw_parts(ptr.as_ptr(), len) }.to_vec();
        Ok(Some(bytes))
    }

    /// Copy the whole block out; empty for a released block
    pub fn to_vec(&self) -> PResult<Vec<u8>> {
        Ok(self.read(self.len)?.unwrap_or_default())
    }

    /// Store a Cryptoki structure at the start of the block, padding zeroed
    pub fn write_struct<S: CStruct>(&mut self, value: &S) -> PResult<()> {
        self.write(&value.to_c_bytes())
    }

    /// Load the Cryptoki structure stored at the start of the block
    pub fn read_struct<S: CStruct>(&self) -> PResult<Option<S>> {
        let Some(ptr) = self.ptr else {
            return Ok(None);
        };
        self.ensure_capacity(size_of::<S>())?;
        // Cryptoki structures are made of integers, bytes and pointers:
        // every bit pattern is a valid value
        // SAFETY: the block holds at least `size_of::<S>()` bytes
        let value = unsafe { ptr::read_unaligned(ptr.as_ptr().cast::<S>()) };
        Ok(Some(value))
    }

    pub fn write_ulong<U: NativeUlong>(&mut self, value: U) -> PResult<()> {
        self.write(&value.to_c_bytes())
    }

    pub fn read_ulong<U: NativeUlong>(&self) -> PResult<Option<U>> {
        let Some(ptr) = self.ptr else {
            return Ok(None);
        };
        self.ensure_capacity(U::SIZE)?;
        // SAFETY: the block holds at least `U::SIZE` bytes
        let value = unsafe { ptr::read_unaligned(ptr.as_ptr().cast::<U>()) };
        Ok(Some(value))
    }

    /// Wipe and release the memory. Safe to call any number of times.
    pub fn free(&mut self) {
        let Some(ptr) = self.ptr.take() else {
            return;
        };
        let len = std::mem::take(&mut self.len);
        // SAFETY: `ptr` was allocated with this length and alignment, which
        // formed a valid layout
        unsafe {
            slice::from_raw_parts_mut(ptr.as_ptr(), len).zeroize();
            dealloc(ptr.as_ptr(), Layout::from_size_align_unchecked(len, BLOCK_ALIGN));
        }
        record(|s| {
            s.frees += 1;
            s.live_bytes = s.live_bytes.saturating_sub(len);
        });
        trace!("freed {len} bytes at {ptr:p}");
    }
}

impl Drop for UnmanagedBlock {
    fn drop(&mut self) {
        self.free();
    }
}
