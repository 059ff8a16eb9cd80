//! `CK_MECHANISM` built from a parameter object.

use std::marker::PhantomData;

use cosmian_pkcs11_sys::{CK_MECHANISM, CkLayout, NativePtr, consts::CK_MECHANISM_TYPE};
use tracing::trace;

use crate::{
    PResult,
    arena::UnmanagedBlock,
    params::{MechanismParams, ensure_layout, ulong, ulong_len},
};

/// A mechanism ready to be passed to `C_EncryptInit`, `C_DeriveKey`...
///
/// The parameter structure is copied into its own block; the parameter object
/// is borrowed so that the memory its structure points at outlives the mechanism.
#[derive(Debug)]
pub struct Mechanism<'p, L: CkLayout> {
    mechanism: CK_MECHANISM<L>,
    parameter: UnmanagedBlock,
    _params: PhantomData<&'p ()>,
}

impl<'p, L: CkLayout> Mechanism<'p, L> {
    pub fn new<P>(mechanism_type: CK_MECHANISM_TYPE, params: &'p P) -> PResult<Self>
    where
        P: MechanismParams<Layout = L>,
    {
        ensure_layout::<L>()?;
        let view = params.to_marshalable_structure()?;
        let mechanism = ulong::<L>("mechanism", mechanism_type)?;
        let parameter_len = ulong_len::<L>(P::NAME, size_of::<P::View>())?;

        let parameter = UnmanagedBlock::from_member(&view)?;
        trace!(
            "mechanism {mechanism_type:#x} with {} ({} bytes)",
            P::NAME,
            parameter.len()
        );
        Ok(Self {
            mechanism: CK_MECHANISM {
                mechanism,
                pParameter: parameter.ptr(),
                ulParameterLen: parameter_len,
            },
            parameter,
            _params: PhantomData,
        })
    }

    /// A mechanism taking no parameter: null `pParameter`, zero length
    pub fn without_parameter(mechanism_type: CK_MECHANISM_TYPE) -> PResult<Self> {
        ensure_layout::<L>()?;
        Ok(Self {
            mechanism: CK_MECHANISM {
                mechanism: ulong::<L>("mechanism", mechanism_type)?,
                pParameter: L::Ptr::null(),
                ulParameterLen: ulong::<L>("parameter length", 0)?,
            },
            parameter: UnmanagedBlock::null(),
            _params: PhantomData,
        })
    }

    #[must_use]
    pub const fn as_view(&self) -> &CK_MECHANISM<L> {
        &self.mechanism
    }

    /// Bytes of the parameter structure, as read by the Cryptoki library
    pub fn parameter(&self) -> PResult<Vec<u8>> {
        self.parameter.to_vec()
    }

    /// Address of the `CK_MECHANISM`, for `CK_MECHANISM_PTR` arguments
    #[must_use]
    pub fn as_ptr(&self) -> *const CK_MECHANISM<L> {
        &raw const self.mechanism
    }
}
