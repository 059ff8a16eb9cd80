//! Miscellaneous key derivations: from a byte string, by bit extraction, KEA.

use cosmian_pkcs11_sys::{
    CK_EXTRACT_PARAMS, CK_KEA_DERIVE_PARAMS, CK_KEY_DERIVATION_STRING_DATA, CkLayout,
};

use crate::{
    PResult,
    arena::UnmanagedBlock,
    params::{
        DisposeState, ck_bool, ensure_layout, ensure_len, mechanism_params, ulong, ulong_len,
    },
};

/// `CKM_CONCATENATE_BASE_AND_DATA`, `CKM_XOR_BASE_AND_DATA` and the other
/// derivations taking a byte string
#[derive(Debug)]
pub struct KeyDerivationStringData<L: CkLayout> {
    params: CK_KEY_DERIVATION_STRING_DATA<L>,
    data: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> KeyDerivationStringData<L> {
    pub fn new(data: &[u8]) -> PResult<Self> {
        ensure_layout::<L>()?;
        let len = ulong_len::<L>("data", data.len())?;

        let data = UnmanagedBlock::from_bytes(data)?;
        Ok(Self {
            params: CK_KEY_DERIVATION_STRING_DATA {
                pData: data.ptr(),
                ulLen: len,
            },
            data,
            state: DisposeState::default(),
        })
    }

    /// The byte string, as stored in unmanaged memory
    pub fn data(&self) -> PResult<Vec<u8>> {
        self.state.ensure_active(<Self as crate::MechanismParams>::NAME)?;
        self.data.to_vec()
    }
}

mechanism_params!(KeyDerivationStringData, CK_KEY_DERIVATION_STRING_DATA<L>, [data]);

/// `CKM_EXTRACT_KEY_FROM_KEY`: index of the first bit to extract
#[derive(Debug)]
pub struct ExtractParams<L: CkLayout> {
    params: CK_EXTRACT_PARAMS<L>,
    state: DisposeState,
}

impl<L: CkLayout> ExtractParams<L> {
    pub fn new(bit_index: u64) -> PResult<Self> {
        ensure_layout::<L>()?;
        Ok(Self {
            params: ulong::<L>("bit index", bit_index)?,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(ExtractParams, CK_EXTRACT_PARAMS<L>, []);

/// `CKM_KEA_KEY_DERIVE`
#[derive(Debug)]
pub struct KeaDeriveParams<L: CkLayout> {
    params: CK_KEA_DERIVE_PARAMS<L>,
    random_a: UnmanagedBlock,
    random_b: UnmanagedBlock,
    public_data: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> KeaDeriveParams<L> {
    /// `random_a` and `random_b` share a single length member and must have
    /// the same length.
    pub fn new(
        is_sender: bool,
        random_a: &[u8],
        random_b: &[u8],
        public_data: &[u8],
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        ensure_len("random B", random_b, random_a.len())?;
        let random_len = ulong_len::<L>("random A", random_a.len())?;
        let public_data_len = ulong_len::<L>("public data", public_data.len())?;

        let random_a = UnmanagedBlock::from_bytes(random_a)?;
        let random_b = UnmanagedBlock::from_bytes(random_b)?;
        let public_data = UnmanagedBlock::from_bytes(public_data)?;
        Ok(Self {
            params: CK_KEA_DERIVE_PARAMS {
                isSender: ck_bool(is_sender),
                ulRandomLen: random_len,
                pRandomA: random_a.ptr(),
                pRandomB: random_b.ptr(),
                ulPublicDataLen: public_data_len,
                pPublicData: public_data.ptr(),
            },
            random_a,
            random_b,
            public_data,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(
    KeaDeriveParams,
    CK_KEA_DERIVE_PARAMS<L>,
    [random_a, random_b, public_data]
);
