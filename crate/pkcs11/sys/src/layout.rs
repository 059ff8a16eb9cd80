use std::{
    fmt::Debug,
    num::TryFromIntError,
    ops::Range,
    ptr::{self, with_exposed_provenance_mut},
};

use crate::platform::{Packing, Platform};

mod sealed {
    pub trait Sealed {}
}

/// A value as laid out in Cryptoki memory.
///
/// Structures are written member by member: the bytes between members and
/// after the last one are left untouched, so a zeroed destination keeps its
/// padding zeroed.
pub trait CMember: Copy {
    /// Write the value at the start of `out`.
    ///
    /// # Panics
    ///
    /// When `out` is shorter than the value
    fn write_member(&self, out: &mut [u8]);

    /// The bytes of the value, padding zeroed
    fn to_c_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0; size_of::<Self>()];
        self.write_member(&mut bytes);
        bytes
    }
}

/// Copy a value without padding (an integer, a pointer or a byte array)
fn write_unpadded<T: Copy>(value: T, out: &mut [u8]) {
    let out = &mut out[..size_of::<T>()];
    // SAFETY: `out` holds `size_of::<T>()` bytes, the write does not need alignment
    unsafe { ptr::write_unaligned(out.as_mut_ptr().cast::<T>(), value) }
}

macro_rules! unpadded_member {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CMember for $ty {
                fn write_member(&self, out: &mut [u8]) {
                    write_unpadded(*self, out);
                }
            }
        )*
    };
}

unpadded_member!(u8, u32, u64, PackedU32, PackedU64, RawPtr, PackedPtr);

impl<const N: usize> CMember for [u8; N] {
    fn write_member(&self, out: &mut [u8]) {
        out[..N].copy_from_slice(self);
    }
}

/// Native representation of `CK_ULONG` (and of every handle) inside a structure.
pub trait NativeUlong:
    CMember + Debug + Default + PartialEq + Eq + 'static + sealed::Sealed
{
    /// Size in bytes
    const SIZE: usize;

    fn try_from_u64(value: u64) -> Result<Self, TryFromIntError>;

    fn to_u64(self) -> u64;

    fn try_from_usize(value: usize) -> Result<Self, TryFromIntError> {
        Self::try_from_u64(u64::try_from(value)?)
    }
}

/// Native representation of a pointer member inside a structure.
pub trait NativePtr: CMember + Debug + Default + PartialEq + Eq + 'static + sealed::Sealed {
    fn from_raw(ptr: *mut u8) -> Self;

    fn as_raw(self) -> *mut u8;

    fn null() -> Self {
        Self::from_raw(ptr::null_mut())
    }

    fn is_null(self) -> bool {
        self.as_raw().is_null()
    }
}

impl sealed::Sealed for u32 {}
impl NativeUlong for u32 {
    const SIZE: usize = 4;

    fn try_from_u64(value: u64) -> Result<Self, TryFromIntError> {
        Self::try_from(value)
    }

    fn to_u64(self) -> u64 {
        u64::from(self)
    }
}

impl sealed::Sealed for u64 {}
impl NativeUlong for u64 {
    const SIZE: usize = 8;

    fn try_from_u64(value: u64) -> Result<Self, TryFromIntError> {
        Ok(value)
    }

    fn to_u64(self) -> u64 {
        self
    }
}

/// A 4 bytes `CK_ULONG` with an alignment of 1, as found in packed structures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct PackedU32([u8; 4]);

impl sealed::Sealed for PackedU32 {}
impl NativeUlong for PackedU32 {
    const SIZE: usize = 4;

    fn try_from_u64(value: u64) -> Result<Self, TryFromIntError> {
        Ok(Self(u32::try_from(value)?.to_ne_bytes()))
    }

    fn to_u64(self) -> u64 {
        u64::from(u32::from_ne_bytes(self.0))
    }
}

/// An 8 bytes `CK_ULONG` with an alignment of 1, as found in packed structures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct PackedU64([u8; 8]);

impl sealed::Sealed for PackedU64 {}
impl NativeUlong for PackedU64 {
    const SIZE: usize = 8;

    fn try_from_u64(value: u64) -> Result<Self, TryFromIntError> {
        Ok(Self(value.to_ne_bytes()))
    }

    fn to_u64(self) -> u64 {
        u64::from_ne_bytes(self.0)
    }
}

/// A naturally aligned pointer member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct RawPtr(*mut u8);

impl Default for RawPtr {
    fn default() -> Self {
        Self(ptr::null_mut())
    }
}

impl sealed::Sealed for RawPtr {}
impl NativePtr for RawPtr {
    fn from_raw(ptr: *mut u8) -> Self {
        Self(ptr)
    }

    fn as_raw(self) -> *mut u8 {
        self.0
    }
}

/// A pointer member with an alignment of 1, as found in packed structures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct PackedPtr([u8; size_of::<usize>()]);

impl sealed::Sealed for PackedPtr {}
impl NativePtr for PackedPtr {
    fn from_raw(ptr: *mut u8) -> Self {
        Self(ptr.expose_provenance().to_ne_bytes())
    }

    fn as_raw(self) -> *mut u8 {
        with_exposed_provenance_mut(usize::from_ne_bytes(self.0))
    }
}

/// Selects the member representations of one of the four [`Platform`] layouts.
///
/// A `#[repr(C)]` structure whose members all have an alignment of 1 has no
/// padding, which is exactly what `#[pragma pack(1)]` produces: the packed
/// layouts simply use byte-array backed members.
pub trait CkLayout: Copy + Debug + Default + PartialEq + Eq + 'static + sealed::Sealed {
    const PLATFORM: Platform;

    type Ulong: NativeUlong;

    type Ptr: NativePtr;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ulong4Packed;

impl sealed::Sealed for Ulong4Packed {}
impl CkLayout for Ulong4Packed {
    type Ptr = PackedPtr;
    type Ulong = PackedU32;

    const PLATFORM: Platform = Platform::Ulong4Packed;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ulong4Natural;

impl sealed::Sealed for Ulong4Natural {}
impl CkLayout for Ulong4Natural {
    type Ptr = RawPtr;
    type Ulong = u32;

    const PLATFORM: Platform = Platform::Ulong4Natural;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ulong8Packed;

impl sealed::Sealed for Ulong8Packed {}
impl CkLayout for Ulong8Packed {
    type Ptr = PackedPtr;
    type Ulong = PackedU64;

    const PLATFORM: Platform = Platform::Ulong8Packed;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ulong8Natural;

impl sealed::Sealed for Ulong8Natural {}
impl CkLayout for Ulong8Natural {
    type Ptr = RawPtr;
    type Ulong = u64;

    const PLATFORM: Platform = Platform::Ulong8Natural;
}

/// The layout matching the C headers of the compilation target
#[cfg(windows)]
pub type NativeLayout = Ulong4Packed;
#[cfg(all(not(windows), target_pointer_width = "64"))]
pub type NativeLayout = Ulong8Natural;
#[cfg(all(not(windows), not(target_pointer_width = "64")))]
pub type NativeLayout = Ulong4Natural;

/// Kind of a structure member, as written in the C header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CField {
    /// `CK_ULONG` or any type defined as such (handles, mechanism types...)
    Ulong,
    /// any pointer
    Ptr,
    /// `CK_BYTE` / `CK_BBOOL`
    Byte,
    /// `CK_BYTE[n]`
    Bytes(usize),
    /// an embedded structure
    Struct(&'static [CFieldDef]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CFieldDef {
    pub name: &'static str,
    pub kind: CField,
}

/// Offsets and size of a structure, as a C compiler would lay it out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CLayout {
    pub offsets: Vec<usize>,
    pub size: usize,
    pub align: usize,
}

const fn align_up(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}

fn size_and_align(kind: CField, platform: Platform) -> (usize, usize) {
    let (size, natural_align) = match kind {
        CField::Ulong => (platform.ulong_size(), platform.ulong_size()),
        CField::Ptr => (size_of::<usize>(), align_of::<usize>()),
        CField::Byte => (1, 1),
        CField::Bytes(n) => (n, 1),
        CField::Struct(fields) => {
            let layout = c_layout(fields, platform);
            (layout.size, layout.align)
        }
    };
    match platform.packing() {
        Packing::Default => (size, natural_align),
        Packing::Explicit => (size, 1),
    }
}

/// Lay out `fields` the way the native compiler does for `platform`.
#[must_use]
pub fn c_layout(fields: &[CFieldDef], platform: Platform) -> CLayout {
    let mut offsets = Vec::with_capacity(fields.len());
    let mut offset = 0;
    let mut align = 1;
    for field in fields {
        let (field_size, field_align) = size_and_align(field.kind, platform);
        offset = align_up(offset, field_align);
        offsets.push(offset);
        offset += field_size;
        align = align.max(field_align);
    }
    CLayout {
        offsets,
        size: align_up(offset, align),
        align,
    }
}

/// Offsets of the padding bytes of a structure laid out by [`c_layout`],
/// embedded structures included
#[must_use]
pub fn padding_offsets(fields: &[CFieldDef], platform: Platform) -> Vec<usize> {
    let mut members = Vec::new();
    member_ranges(fields, platform, 0, &mut members);
    (0..c_layout(fields, platform).size)
        .filter(|offset| !members.iter().any(|member| member.contains(offset)))
        .collect()
}

fn member_ranges(
    fields: &[CFieldDef],
    platform: Platform,
    base: usize,
    members: &mut Vec<Range<usize>>,
) {
    let layout = c_layout(fields, platform);
    for (field, offset) in fields.iter().zip(layout.offsets) {
        let start = base + offset;
        match field.kind {
            CField::Struct(nested) => member_ranges(nested, platform, start, members),
            kind => {
                let (size, _) = size_and_align(kind, platform);
                members.push(start..start + size);
            }
        }
    }
}

/// Implemented by every Cryptoki structure: exposes the C declaration
/// alongside the Rust one so that both can be checked against each other.
pub trait CStruct: CMember {
    const NAME: &'static str;

    /// Members, in declaration order
    const FIELDS: &'static [CFieldDef];

    /// Offsets of the members in the Rust definition, in declaration order
    fn field_offsets() -> Vec<usize>;

    /// A value with every member zeroed (null pointers, zero integers)
    fn zeroed() -> Self;
}
