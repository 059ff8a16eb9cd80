//! Elliptic curve Diffie-Hellman and MQV key derivations.

use cosmian_pkcs11_sys::{
    CK_ECDH1_DERIVE_PARAMS, CK_ECDH2_DERIVE_PARAMS, CK_ECMQV_DERIVE_PARAMS, CkLayout,
    consts::{CK_EC_KDF_TYPE, CK_OBJECT_HANDLE},
};

use crate::{
    PResult,
    arena::UnmanagedBlock,
    params::{DisposeState, ensure_layout, mechanism_params, optional_len, ulong, ulong_len},
};

/// `CKM_ECDH1_DERIVE` and `CKM_ECDH1_COFACTOR_DERIVE`
#[derive(Debug)]
pub struct Ecdh1DeriveParams<L: CkLayout> {
    params: CK_ECDH1_DERIVE_PARAMS<L>,
    shared_data: UnmanagedBlock,
    public_data: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> Ecdh1DeriveParams<L> {
    /// `shared_data` is only used by the KDFs other than `CKD_NULL`;
    /// `public_data` is the other party's public key value.
    pub fn new(
        kdf: CK_EC_KDF_TYPE,
        shared_data: Option<&[u8]>,
        public_data: &[u8],
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let kdf = ulong::<L>("kdf", kdf)?;
        let shared_data_len = optional_len::<L>("shared data", shared_data)?;
        let public_data_len = ulong_len::<L>("public data", public_data.len())?;

        let shared_data = UnmanagedBlock::from_optional(shared_data)?;
        let public_data = UnmanagedBlock::from_bytes(public_data)?;
        Ok(Self {
            params: CK_ECDH1_DERIVE_PARAMS {
                kdf,
                ulSharedDataLen: shared_data_len,
                pSharedData: shared_data.ptr(),
                ulPublicDataLen: public_data_len,
                pPublicData: public_data.ptr(),
            },
            shared_data,
            public_data,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(Ecdh1DeriveParams, CK_ECDH1_DERIVE_PARAMS<L>, [shared_data, public_data]);

/// Elliptic curve derivation using two key pairs on each side
#[derive(Debug)]
pub struct Ecdh2DeriveParams<L: CkLayout> {
    params: CK_ECDH2_DERIVE_PARAMS<L>,
    shared_data: UnmanagedBlock,
    public_data: UnmanagedBlock,
    public_data2: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> Ecdh2DeriveParams<L> {
    /// `private_data` is the handle of the second EC private key, whose value
    /// is `private_data_len` bytes long; `public_data2` is the other party's
    /// second public key value.
    pub fn new(
        kdf: CK_EC_KDF_TYPE,
        shared_data: Option<&[u8]>,
        public_data: &[u8],
        private_data_len: u64,
        private_data: CK_OBJECT_HANDLE,
        public_data2: &[u8],
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let kdf = ulong::<L>("kdf", kdf)?;
        let shared_data_len = optional_len::<L>("shared data", shared_data)?;
        let public_data_len = ulong_len::<L>("public data", public_data.len())?;
        let private_data_len = ulong::<L>("private data length", private_data_len)?;
        let private_data = ulong::<L>("private data handle", private_data)?;
        let public_data_len2 = ulong_len::<L>("public data 2", public_data2.len())?;

        let shared_data = UnmanagedBlock::from_optional(shared_data)?;
        let public_data = UnmanagedBlock::from_bytes(public_data)?;
        let public_data2 = UnmanagedBlock::from_bytes(public_data2)?;
        Ok(Self {
            params: CK_ECDH2_DERIVE_PARAMS {
                kdf,
                ulSharedDataLen: shared_data_len,
                pSharedData: shared_data.ptr(),
                ulPublicDataLen: public_data_len,
                pPublicData: public_data.ptr(),
                ulPrivateDataLen: private_data_len,
                hPrivateData: private_data,
                ulPublicDataLen2: public_data_len2,
                pPublicData2: public_data2.ptr(),
            },
            shared_data,
            public_data,
            public_data2,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(
    Ecdh2DeriveParams,
    CK_ECDH2_DERIVE_PARAMS<L>,
    [shared_data, public_data, public_data2]
);

/// `CKM_ECMQV_DERIVE`
#[derive(Debug)]
pub struct EcmqvDeriveParams<L: CkLayout> {
    params: CK_ECMQV_DERIVE_PARAMS<L>,
    shared_data: UnmanagedBlock,
    public_data: UnmanagedBlock,
    public_data2: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> EcmqvDeriveParams<L> {
    /// Same inputs as [`Ecdh2DeriveParams::new`] plus `public_key`, the
    /// handle of the first EC public key
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kdf: CK_EC_KDF_TYPE,
        shared_data: Option<&[u8]>,
        public_data: &[u8],
        private_data_len: u64,
        private_data: CK_OBJECT_HANDLE,
        public_data2: &[u8],
        public_key: CK_OBJECT_HANDLE,
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let kdf = ulong::<L>("kdf", kdf)?;
        let shared_data_len = optional_len::<L>("shared data", shared_data)?;
        let public_data_len = ulong_len::<L>("public data", public_data.len())?;
        let private_data_len = ulong::<L>("private data length", private_data_len)?;
        let private_data = ulong::<L>("private data handle", private_data)?;
        let public_data_len2 = ulong_len::<L>("public data 2", public_data2.len())?;
        let public_key = ulong::<L>("public key handle", public_key)?;

        let shared_data = UnmanagedBlock::from_optional(shared_data)?;
        let public_data = UnmanagedBlock::from_bytes(public_data)?;
        let public_data2 = UnmanagedBlock::from_bytes(public_data2)?;
        Ok(Self {
            params: CK_ECMQV_DERIVE_PARAMS {
                kdf,
                ulSharedDataLen: shared_data_len,
                pSharedData: shared_data.ptr(),
                ulPublicDataLen: public_data_len,
                pPublicData: public_data.ptr(),
                ulPrivateDataLen: private_data_len,
                hPrivateData: private_data,
                ulPublicDataLen2: public_data_len2,
                pPublicData2: public_data2.ptr(),
                publicKey: public_key,
            },
            shared_data,
            public_data,
            public_data2,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(
    EcmqvDeriveParams,
    CK_ECMQV_DERIVE_PARAMS<L>,
    [shared_data, public_data, public_data2]
);
