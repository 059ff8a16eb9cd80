//! Password based encryption and key generation.

use cosmian_pkcs11_sys::{
    CK_PBE_PARAMS, CK_PKCS5_PBKD2_PARAMS, CkLayout,
    consts::{CK_PKCS5_PBKD2_PSEUDO_RANDOM_FUNCTION_TYPE, CK_PKCS5_PBKDF2_SALT_SOURCE_TYPE},
};

use crate::{
    PResult,
    arena::UnmanagedBlock,
    params::{DisposeState, ensure_layout, mechanism_params, optional_len, ulong, ulong_len},
};

/// Length of the IV generated by the `CKM_PBE_*` mechanisms
pub const PBE_INIT_VECTOR_LEN: usize = 8;

/// `CKM_PBE_*` key generation.
///
/// The token writes the IV it generates in a buffer allocated here and read
/// back with [`PbeParams::init_vector`].
#[derive(Debug)]
pub struct PbeParams<L: CkLayout> {
    params: CK_PBE_PARAMS<L>,
    init_vector: UnmanagedBlock,
    password: UnmanagedBlock,
    salt: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> PbeParams<L> {
    pub fn new(password: &[u8], salt: Option<&[u8]>, iteration: u64) -> PResult<Self> {
        ensure_layout::<L>()?;
        let password_len = ulong_len::<L>("password", password.len())?;
        let salt_len = optional_len::<L>("salt", salt)?;
        let iteration = ulong::<L>("iteration", iteration)?;

        let init_vector = UnmanagedBlock::allocate(PBE_INIT_VECTOR_LEN)?;
        let password = UnmanagedBlock::from_bytes(password)?;
        let salt = UnmanagedBlock::from_optional(salt)?;
        Ok(Self {
            params: CK_PBE_PARAMS {
                pInitVector: init_vector.ptr(),
                pPassword: password.ptr(),
                ulPasswordLen: password_len,
                pSalt: salt.ptr(),
                ulSaltLen: salt_len,
                ulIteration: iteration,
            },
            init_vector,
            password,
            salt,
            state: DisposeState::default(),
        })
    }

    /// The IV written by the token, all zeros before the call
    pub fn init_vector(&self) -> PResult<Vec<u8>> {
        self.state.ensure_active(<Self as crate::MechanismParams>::NAME)?;
        self.init_vector.to_vec()
    }
}

mechanism_params!(PbeParams, CK_PBE_PARAMS<L>, [init_vector, password, salt]);

/// `CKM_PKCS5_PBKD2`
///
/// `ulPasswordLen` is a pointer in the C structure: the length is stored in
/// its own block.
#[derive(Debug)]
pub struct Pkcs5Pbkd2Params<L: CkLayout> {
    params: CK_PKCS5_PBKD2_PARAMS<L>,
    salt_source_data: UnmanagedBlock,
    prf_data: UnmanagedBlock,
    password: UnmanagedBlock,
    password_len: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> Pkcs5Pbkd2Params<L> {
    pub fn new(
        salt_source: CK_PKCS5_PBKDF2_SALT_SOURCE_TYPE,
        salt_source_data: Option<&[u8]>,
        iterations: u64,
        prf: CK_PKCS5_PBKD2_PSEUDO_RANDOM_FUNCTION_TYPE,
        prf_data: Option<&[u8]>,
        password: &[u8],
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let salt_source = ulong::<L>("salt source", salt_source)?;
        let salt_source_data_len = optional_len::<L>("salt source data", salt_source_data)?;
        let iterations = ulong::<L>("iterations", iterations)?;
        let prf = ulong::<L>("prf", prf)?;
        let prf_data_len = optional_len::<L>("prf data", prf_data)?;
        let password_len = ulong_len::<L>("password", password.len())?;

        let salt_source_data = UnmanagedBlock::from_optional(salt_source_data)?;
        let prf_data = UnmanagedBlock::from_optional(prf_data)?;
        let password = UnmanagedBlock::from_bytes(password)?;
        let password_len = UnmanagedBlock::from_ulong(password_len)?;
        Ok(Self {
            params: CK_PKCS5_PBKD2_PARAMS {
                saltSource: salt_source,
                pSaltSourceData: salt_source_data.ptr(),
                ulSaltSourceDataLen: salt_source_data_len,
                iterations,
                prf,
                pPrfData: prf_data.ptr(),
                ulPrfDataLen: prf_data_len,
                pPassword: password.ptr(),
                ulPasswordLen: password_len.ptr(),
            },
            salt_source_data,
            prf_data,
            password,
            password_len,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(
    Pkcs5Pbkd2Params,
    CK_PKCS5_PBKD2_PARAMS<L>,
    [salt_source_data, prf_data, password, password_len]
);
