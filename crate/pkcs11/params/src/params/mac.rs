//! Parameters of the general-length MAC mechanisms.

use cosmian_pkcs11_sys::{
    CK_MAC_GENERAL_PARAMS, CK_RC2_MAC_GENERAL_PARAMS, CK_RC5_MAC_GENERAL_PARAMS,
    CK_TLS_MAC_PARAMS, CkLayout, consts::CK_MECHANISM_TYPE,
};

use crate::{
    PResult,
    params::{DisposeState, block_cipher::rc2_effective_bits, ensure_layout, mechanism_params, ulong},
};

/// `CKM_*_HMAC_GENERAL` and friends: the length of the MAC in bytes
#[derive(Debug)]
pub struct MacGeneralParams<L: CkLayout> {
    params: CK_MAC_GENERAL_PARAMS<L>,
    state: DisposeState,
}

impl<L: CkLayout> MacGeneralParams<L> {
    pub fn new(mac_length: u64) -> PResult<Self> {
        ensure_layout::<L>()?;
        Ok(Self {
            params: ulong::<L>("MAC length", mac_length)?,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(MacGeneralParams, CK_MAC_GENERAL_PARAMS<L>, []);

/// `CKM_RC2_MAC_GENERAL`
#[derive(Debug)]
pub struct Rc2MacGeneralParams<L: CkLayout> {
    params: CK_RC2_MAC_GENERAL_PARAMS<L>,
    state: DisposeState,
}

impl<L: CkLayout> Rc2MacGeneralParams<L> {
    pub fn new(effective_bits: u64, mac_length: u64) -> PResult<Self> {
        ensure_layout::<L>()?;
        Ok(Self {
            params: CK_RC2_MAC_GENERAL_PARAMS {
                ulEffectiveBits: rc2_effective_bits::<L>(effective_bits)?,
                ulMacLength: ulong::<L>("MAC length", mac_length)?,
            },
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(Rc2MacGeneralParams, CK_RC2_MAC_GENERAL_PARAMS<L>, []);

/// `CKM_RC5_MAC_GENERAL`
#[derive(Debug)]
pub struct Rc5MacGeneralParams<L: CkLayout> {
    params: CK_RC5_MAC_GENERAL_PARAMS<L>,
    state: DisposeState,
}

impl<L: CkLayout> Rc5MacGeneralParams<L> {
    pub fn new(wordsize: u64, rounds: u64, mac_length: u64) -> PResult<Self> {
        ensure_layout::<L>()?;
        Ok(Self {
            params: CK_RC5_MAC_GENERAL_PARAMS {
                ulWordsize: ulong::<L>("wordsize", wordsize)?,
                ulRounds: ulong::<L>("rounds", rounds)?,
                ulMacLength: ulong::<L>("MAC length", mac_length)?,
            },
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(Rc5MacGeneralParams, CK_RC5_MAC_GENERAL_PARAMS<L>, []);

/// Which side of a TLS connection computes the MAC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMacSide {
    Server = 1,
    Client = 2,
}

/// `CKM_TLS_MAC`
#[derive(Debug)]
pub struct TlsMacParams<L: CkLayout> {
    params: CK_TLS_MAC_PARAMS<L>,
    state: DisposeState,
}

impl<L: CkLayout> TlsMacParams<L> {
    pub fn new(
        prf_hash_mechanism: CK_MECHANISM_TYPE,
        mac_length: u64,
        side: TlsMacSide,
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        Ok(Self {
            params: CK_TLS_MAC_PARAMS {
                prfHashMechanism: ulong::<L>("PRF hash mechanism", prf_hash_mechanism)?,
                ulMacLength: ulong::<L>("MAC length", mac_length)?,
                ulServerOrClient: ulong::<L>("side", side as u64)?,
            },
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(TlsMacParams, CK_TLS_MAC_PARAMS<L>, []);
