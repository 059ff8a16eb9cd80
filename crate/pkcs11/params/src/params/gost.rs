//! GOST R 34.10 key derivation and key wrapping.

use cosmian_pkcs11_sys::{
    CK_GOSTR3410_DERIVE_PARAMS, CK_GOSTR3410_KEY_WRAP_PARAMS, CkLayout,
    consts::{CK_EC_KDF_TYPE, CK_OBJECT_HANDLE},
};

use crate::{
    PResult,
    arena::UnmanagedBlock,
    params::{DisposeState, ensure_layout, mechanism_params, optional_len, ulong, ulong_len},
    pkcs11_ensure,
};

/// Shortest user keying material accepted by the GOST derivations
pub const GOST_MIN_UKM_LEN: usize = 8;

/// `CKM_GOSTR3410_DERIVE`
#[derive(Debug)]
pub struct Gostr3410DeriveParams<L: CkLayout> {
    params: CK_GOSTR3410_DERIVE_PARAMS<L>,
    public_data: UnmanagedBlock,
    ukm: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> Gostr3410DeriveParams<L> {
    pub fn new(kdf: CK_EC_KDF_TYPE, public_data: &[u8], ukm: &[u8]) -> PResult<Self> {
        ensure_layout::<L>()?;
        pkcs11_ensure!(
            ukm.len() >= GOST_MIN_UKM_LEN,
            "UKM must be at least {GOST_MIN_UKM_LEN} bytes long, got {}",
            ukm.len()
        );
        let kdf = ulong::<L>("kdf", kdf)?;
        let public_data_len = ulong_len::<L>("public data", public_data.len())?;
        let ukm_len = ulong_len::<L>("UKM", ukm.len())?;

        let public_data = UnmanagedBlock::from_bytes(public_data)?;
        let ukm = UnmanagedBlock::from_bytes(ukm)?;
        Ok(Self {
            params: CK_GOSTR3410_DERIVE_PARAMS {
                kdf,
                pPublicData: public_data.ptr(),
                ulPublicDataLen: public_data_len,
                pUKM: ukm.ptr(),
                ulUKMLen: ukm_len,
            },
            public_data,
            ukm,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(Gostr3410DeriveParams, CK_GOSTR3410_DERIVE_PARAMS<L>, [public_data, ukm]);

/// `CKM_GOSTR3410_KEY_WRAP`
#[derive(Debug)]
pub struct Gostr3410KeyWrapParams<L: CkLayout> {
    params: CK_GOSTR3410_KEY_WRAP_PARAMS<L>,
    wrap_oid: UnmanagedBlock,
    ukm: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> Gostr3410KeyWrapParams<L> {
    /// `wrap_oid` is the DER encoding of the GOST 28147-89 parameters OID,
    /// `key` the handle of the sender's key.
    pub fn new(
        wrap_oid: Option<&[u8]>,
        ukm: Option<&[u8]>,
        key: CK_OBJECT_HANDLE,
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let wrap_oid_len = optional_len::<L>("wrap OID", wrap_oid)?;
        let ukm_len = optional_len::<L>("UKM", ukm)?;
        let key = ulong::<L>("key handle", key)?;

        let wrap_oid = UnmanagedBlock::from_optional(wrap_oid)?;
        let ukm = UnmanagedBlock::from_optional(ukm)?;
        Ok(Self {
            params: CK_GOSTR3410_KEY_WRAP_PARAMS {
                pWrapOID: wrap_oid.ptr(),
                ulWrapOIDLen: wrap_oid_len,
                pUKM: ukm.ptr(),
                ulUKMLen: ukm_len,
                hKey: key,
            },
            wrap_oid,
            ukm,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(Gostr3410KeyWrapParams, CK_GOSTR3410_KEY_WRAP_PARAMS<L>, [wrap_oid, ukm]);
