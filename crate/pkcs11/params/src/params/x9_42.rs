//! X9.42 Diffie-Hellman key derivations.

use cosmian_pkcs11_sys::{
    CK_X9_42_DH1_DERIVE_PARAMS, CK_X9_42_DH2_DERIVE_PARAMS, CK_X9_42_MQV_DERIVE_PARAMS, CkLayout,
    consts::{CK_OBJECT_HANDLE, CK_X9_42_DH_KDF_TYPE},
};

use crate::{
    PResult,
    arena::UnmanagedBlock,
    params::{DisposeState, ensure_layout, mechanism_params, optional_len, ulong, ulong_len},
};

/// `CKM_X9_42_DH_DERIVE`
#[derive(Debug)]
pub struct X942Dh1DeriveParams<L: CkLayout> {
    params: CK_X9_42_DH1_DERIVE_PARAMS<L>,
    other_info: UnmanagedBlock,
    public_data: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> X942Dh1DeriveParams<L> {
    pub fn new(
        kdf: CK_X9_42_DH_KDF_TYPE,
        other_info: Option<&[u8]>,
        public_data: &[u8],
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let kdf = ulong::<L>("kdf", kdf)?;
        let other_info_len = optional_len::<L>("other info", other_info)?;
        let public_data_len = ulong_len::<L>("public data", public_data.len())?;

        let other_info = UnmanagedBlock::from_optional(other_info)?;
        let public_data = UnmanagedBlock::from_bytes(public_data)?;
        Ok(Self {
            params: CK_X9_42_DH1_DERIVE_PARAMS {
                kdf,
                ulOtherInfoLen: other_info_len,
                pOtherInfo: other_info.ptr(),
                ulPublicDataLen: public_data_len,
                pPublicData: public_data.ptr(),
            },
            other_info,
            public_data,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(X942Dh1DeriveParams, CK_X9_42_DH1_DERIVE_PARAMS<L>, [other_info, public_data]);

/// `CKM_X9_42_DH_HYBRID_DERIVE`
#[derive(Debug)]
pub struct X942Dh2DeriveParams<L: CkLayout> {
    params: CK_X9_42_DH2_DERIVE_PARAMS<L>,
    other_info: UnmanagedBlock,
    public_data: UnmanagedBlock,
    public_data2: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> X942Dh2DeriveParams<L> {
    pub fn new(
        kdf: CK_X9_42_DH_KDF_TYPE,
        other_info: Option<&[u8]>,
        public_data: &[u8],
        private_data_len: u64,
        private_data: CK_OBJECT_HANDLE,
        public_data2: &[u8],
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let kdf = ulong::<L>("kdf", kdf)?;
        let other_info_len = optional_len::<L>("other info", other_info)?;
        let public_data_len = ulong_len::<L>("public data", public_data.len())?;
        let private_data_len = ulong::<L>("private data length", private_data_len)?;
        let private_data = ulong::<L>("private data handle", private_data)?;
        let public_data_len2 = ulong_len::<L>("public data 2", public_data2.len())?;

        let other_info = UnmanagedBlock::from_optional(other_info)?;
        let public_data = UnmanagedBlock::from_bytes(public_data)?;
        let public_data2 = UnmanagedBlock::from_bytes(public_data2)?;
        Ok(Self {
            params: CK_X9_42_DH2_DERIVE_PARAMS {
                kdf,
                ulOtherInfoLen: other_info_len,
                pOtherInfo: other_info.ptr(),
                ulPublicDataLen: public_data_len,
                pPublicData: public_data.ptr(),
                ulPrivateDataLen: private_data_len,
                hPrivateData: private_data,
                ulPublicDataLen2: public_data_len2,
                pPublicData2: public_data2.ptr(),
            },
            other_info,
            public_data,
            public_data2,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(
    X942Dh2DeriveParams,
    CK_X9_42_DH2_DERIVE_PARAMS<L>,
    [other_info, public_data, public_data2]
);

/// `CKM_X9_42_MQV_DERIVE`
#[derive(Debug)]
pub struct X942MqvDeriveParams<L: CkLayout> {
    params: CK_X9_42_MQV_DERIVE_PARAMS<L>,
    other_info: UnmanagedBlock,
    public_data: UnmanagedBlock,
    public_data2: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> X942MqvDeriveParams<L> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kdf: CK_X9_42_DH_KDF_TYPE,
        other_info: Option<&[u8]>,
        public_data: &[u8],
        private_data_len: u64,
        private_data: CK_OBJECT_HANDLE,
        public_data2: &[u8],
        public_key: CK_OBJECT_HANDLE,
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let kdf = ulong::<L>("kdf", kdf)?;
        let other_info_len = optional_len::<L>("other info", other_info)?;
        let public_data_len = ulong_len::<L>("public data", public_data.len())?;
        let private_data_len = ulong::<L>("private data length", private_data_len)?;
        let private_data = ulong::<L>("private data handle", private_data)?;
        let public_data_len2 = ulong_len::<L>("public data 2", public_data2.len())?;
        let public_key = ulong::<L>("public key handle", public_key)?;

        let other_info = UnmanagedBlock::from_optional(other_info)?;
        let public_data = UnmanagedBlock::from_bytes(public_data)?;
        let public_data2 = UnmanagedBlock::from_bytes(public_data2)?;
        Ok(Self {
            params: CK_X9_42_MQV_DERIVE_PARAMS {
                kdf,
                ulOtherInfoLen: other_info_len,
                pOtherInfo: other_info.ptr(),
                ulPublicDataLen: public_data_len,
                pPublicData: public_data.ptr(),
                ulPrivateDataLen: private_data_len,
                hPrivateData: private_data,
                ulPublicDataLen2: public_data_len2,
                pPublicData2: public_data2.ptr(),
                publicKey: public_key,
            },
            other_info,
            public_data,
            public_data2,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(
    X942MqvDeriveParams,
    CK_X9_42_MQV_DERIVE_PARAMS<L>,
    [other_info, public_data, public_data2]
);
