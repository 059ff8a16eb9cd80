//! RSA padding parameters.

use cosmian_pkcs11_sys::{
    CK_KEY_WRAP_SET_OAEP_PARAMS, CK_RSA_PKCS_OAEP_PARAMS, CK_RSA_PKCS_PSS_PARAMS, CkLayout,
    consts::{CK_MECHANISM_TYPE, CK_RSA_PKCS_MGF_TYPE, CK_RSA_PKCS_OAEP_SOURCE_TYPE},
};

use crate::{
    PResult,
    arena::UnmanagedBlock,
    params::{DisposeState, ensure_layout, mechanism_params, optional_len, ulong},
};

/// `CKM_RSA_PKCS_OAEP`
#[derive(Debug)]
pub struct RsaPkcsOaepParams<L: CkLayout> {
    params: CK_RSA_PKCS_OAEP_PARAMS<L>,
    source_data: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> RsaPkcsOaepParams<L> {
    /// `source` is `CKZ_DATA_SPECIFIED` (or 0 without label), `source_data` the
    /// encoding parameter (label), if any
    pub fn new(
        hash_alg: CK_MECHANISM_TYPE,
        mgf: CK_RSA_PKCS_MGF_TYPE,
        source: CK_RSA_PKCS_OAEP_SOURCE_TYPE,
        source_data: Option<&[u8]>,
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let hash_alg = ulong::<L>("hash algorithm", hash_alg)?;
        let mgf = ulong::<L>("MGF", mgf)?;
        let source = ulong::<L>("source", source)?;
        let source_data_len = optional_len::<L>("source data", source_data)?;

        let source_data = UnmanagedBlock::from_optional(source_data)?;
        Ok(Self {
            params: CK_RSA_PKCS_OAEP_PARAMS {
                hashAlg: hash_alg,
                mgf,
                source,
                pSourceData: source_data.ptr(),
                ulSourceDataLen: source_data_len,
            },
            source_data,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(RsaPkcsOaepParams, CK_RSA_PKCS_OAEP_PARAMS<L>, [source_data]);

/// `CKM_RSA_PKCS_PSS` and the `CKM_*_RSA_PKCS_PSS` signatures
#[derive(Debug)]
pub struct RsaPkcsPssParams<L: CkLayout> {
    params: CK_RSA_PKCS_PSS_PARAMS<L>,
    state: DisposeState,
}

impl<L: CkLayout> RsaPkcsPssParams<L> {
    pub fn new(
        hash_alg: CK_MECHANISM_TYPE,
        mgf: CK_RSA_PKCS_MGF_TYPE,
        salt_len: u64,
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        Ok(Self {
            params: CK_RSA_PKCS_PSS_PARAMS {
                hashAlg: ulong::<L>("hash algorithm", hash_alg)?,
                mgf: ulong::<L>("MGF", mgf)?,
                sLen: ulong::<L>("salt length", salt_len)?,
            },
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(RsaPkcsPssParams, CK_RSA_PKCS_PSS_PARAMS<L>, []);

/// `CKM_KEY_WRAP_SET_OAEP`
#[derive(Debug)]
pub struct KeyWrapSetOaepParams<L: CkLayout> {
    params: CK_KEY_WRAP_SET_OAEP_PARAMS<L>,
    x: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> KeyWrapSetOaepParams<L> {
    /// `bc` is the block contents byte, `x` the concatenation of hash of
    /// plaintext data (if present) and extra data (if present)
    pub fn new(bc: u8, x: Option<&[u8]>) -> PResult<Self> {
        ensure_layout::<L>()?;
        let x_len = optional_len::<L>("x", x)?;

        let x = UnmanagedBlock::from_optional(x)?;
        Ok(Self {
            params: CK_KEY_WRAP_SET_OAEP_PARAMS {
                bBC: bc,
                pX: x.ptr(),
                ulXLen: x_len,
            },
            x,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(KeyWrapSetOaepParams, CK_KEY_WRAP_SET_OAEP_PARAMS<L>, [x]);
