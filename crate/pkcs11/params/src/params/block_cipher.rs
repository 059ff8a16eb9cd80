//! Parameters of the other block ciphers: DES, ARIA, Camellia, SEED, RC2 and RC5.

use cosmian_pkcs11_sys::{
    CK_ARIA_CBC_ENCRYPT_DATA_PARAMS, CK_CAMELLIA_CBC_ENCRYPT_DATA_PARAMS, CK_CAMELLIA_CTR_PARAMS,
    CK_DES_CBC_ENCRYPT_DATA_PARAMS, CK_RC2_CBC_PARAMS, CK_RC2_PARAMS, CK_RC5_CBC_PARAMS,
    CK_RC5_PARAMS, CK_SEED_CBC_ENCRYPT_DATA_PARAMS, CkLayout,
};

use crate::{
    PResult,
    arena::UnmanagedBlock,
    params::{
        DisposeState, cbc_encrypt_data_params, ctr_params, ensure_layout, fixed_bytes,
        mechanism_params, optional_len, ulong,
    },
    pkcs11_ensure,
};

pub const DES_BLOCK_SIZE: usize = 8;
pub const ARIA_BLOCK_SIZE: usize = 16;
pub const CAMELLIA_BLOCK_SIZE: usize = 16;
pub const SEED_BLOCK_SIZE: usize = 16;
pub const RC2_BLOCK_SIZE: usize = 8;

/// Largest effective key size of RC2, in bits
const RC2_MAX_EFFECTIVE_BITS: u64 = 1024;

cbc_encrypt_data_params!(
    /// `CKM_DES_CBC_ENCRYPT_DATA` and `CKM_DES3_CBC_ENCRYPT_DATA`
    DesCbcEncryptDataParams,
    CK_DES_CBC_ENCRYPT_DATA_PARAMS,
    DES_BLOCK_SIZE
);

cbc_encrypt_data_params!(
    /// `CKM_ARIA_CBC_ENCRYPT_DATA`
    AriaCbcEncryptDataParams,
    CK_ARIA_CBC_ENCRYPT_DATA_PARAMS,
    ARIA_BLOCK_SIZE
);

cbc_encrypt_data_params!(
    /// `CKM_CAMELLIA_CBC_ENCRYPT_DATA`
    CamelliaCbcEncryptDataParams,
    CK_CAMELLIA_CBC_ENCRYPT_DATA_PARAMS,
    CAMELLIA_BLOCK_SIZE
);

cbc_encrypt_data_params!(
    /// `CKM_SEED_CBC_ENCRYPT_DATA`
    SeedCbcEncryptDataParams,
    CK_SEED_CBC_ENCRYPT_DATA_PARAMS,
    SEED_BLOCK_SIZE
);

ctr_params!(
    /// `CKM_CAMELLIA_CTR`
    CamelliaCtrParams,
    CK_CAMELLIA_CTR_PARAMS,
    CAMELLIA_BLOCK_SIZE
);

pub(crate) fn rc2_effective_bits<L: CkLayout>(effective_bits: u64) -> PResult<L::Ulong> {
    pkcs11_ensure!(
        (1..=RC2_MAX_EFFECTIVE_BITS).contains(&effective_bits),
        "RC2 effective bits must be between 1 and {RC2_MAX_EFFECTIVE_BITS}, got {effective_bits}"
    );
    ulong::<L>("effective bits", effective_bits)
}

/// `CKM_RC2_ECB` and `CKM_RC2_MAC`: the effective number of key bits
#[derive(Debug)]
pub struct Rc2Params<L: CkLayout> {
    params: CK_RC2_PARAMS<L>,
    state: DisposeState,
}

impl<L: CkLayout> Rc2Params<L> {
    pub fn new(effective_bits: u64) -> PResult<Self> {
        ensure_layout::<L>()?;
        Ok(Self {
            params: rc2_effective_bits::<L>(effective_bits)?,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(Rc2Params, CK_RC2_PARAMS<L>, []);

/// `CKM_RC2_CBC` and `CKM_RC2_CBC_PAD`
#[derive(Debug)]
pub struct Rc2CbcParams<L: CkLayout> {
    params: CK_RC2_CBC_PARAMS<L>,
    state: DisposeState,
}

impl<L: CkLayout> Rc2CbcParams<L> {
    pub fn new(effective_bits: u64, iv: &[u8]) -> PResult<Self> {
        ensure_layout::<L>()?;
        Ok(Self {
            params: CK_RC2_CBC_PARAMS {
                ulEffectiveBits: rc2_effective_bits::<L>(effective_bits)?,
                iv: fixed_bytes::<RC2_BLOCK_SIZE>("iv", iv)?,
            },
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(Rc2CbcParams, CK_RC2_CBC_PARAMS<L>, []);

/// `CKM_RC5_ECB` and `CKM_RC5_MAC`
#[derive(Debug)]
pub struct Rc5Params<L: CkLayout> {
    params: CK_RC5_PARAMS<L>,
    state: DisposeState,
}

impl<L: CkLayout> Rc5Params<L> {
    /// `wordsize` is in bytes
    pub fn new(wordsize: u64, rounds: u64) -> PResult<Self> {
        ensure_layout::<L>()?;
        Ok(Self {
            params: CK_RC5_PARAMS {
                ulWordsize: ulong::<L>("wordsize", wordsize)?,
                ulRounds: ulong::<L>("rounds", rounds)?,
            },
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(Rc5Params, CK_RC5_PARAMS<L>, []);

/// `CKM_RC5_CBC` and `CKM_RC5_CBC_PAD`. The IV is as long as a block: twice the word size.
#[derive(Debug)]
pub struct Rc5CbcParams<L: CkLayout> {
    params: CK_RC5_CBC_PARAMS<L>,
    iv: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> Rc5CbcParams<L> {
    pub fn new(wordsize: u64, rounds: u64, iv: Option<&[u8]>) -> PResult<Self> {
        ensure_layout::<L>()?;
        let wordsize = ulong::<L>("wordsize", wordsize)?;
        let rounds = ulong::<L>("rounds", rounds)?;
        let iv_len = optional_len::<L>("iv", iv)?;

        let iv = UnmanagedBlock::from_optional(iv)?;
        Ok(Self {
            params: CK_RC5_CBC_PARAMS {
                ulWordsize: wordsize,
                ulRounds: rounds,
                pIv: iv.ptr(),
                ulIvLen: iv_len,
            },
            iv,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(Rc5CbcParams, CK_RC5_CBC_PARAMS<L>, [iv]);
