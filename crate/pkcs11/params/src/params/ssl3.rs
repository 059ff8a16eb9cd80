//! SSL 3 master key and key material derivations.
//!
//! The random data is its own parameter object, borrowed by the derivations
//! that embed it: it must outlive them and is never released on their behalf.

use std::{marker::PhantomData, rc::Rc};

use cosmian_pkcs11_sys::{
    CK_SSL3_KEY_MAT_PARAMS, CK_SSL3_MASTER_KEY_DERIVE_PARAMS, CK_SSL3_RANDOM_DATA, CK_VERSION,
    CkLayout,
};

use crate::{
    MechanismParams, PResult,
    arena::UnmanagedBlock,
    output::{ReturnedMaterial, Ssl3KeyMatOut},
    params::{DisposeState, bits_to_bytes, ck_bool, ensure_layout, mechanism_params, ulong, ulong_len},
};

/// `CK_SSL3_RANDOM_DATA`: client and server random values
#[derive(Debug)]
pub struct Ssl3RandomData<L: CkLayout> {
    params: CK_SSL3_RANDOM_DATA<L>,
    client_random: UnmanagedBlock,
    server_random: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> Ssl3RandomData<L> {
    pub fn new(client_random: &[u8], server_random: &[u8]) -> PResult<Self> {
        ensure_layout::<L>()?;
        let client_random_len = ulong_len::<L>("client random", client_random.len())?;
        let server_random_len = ulong_len::<L>("server random", server_random.len())?;

        let client_random = UnmanagedBlock::from_bytes(client_random)?;
        let server_random = UnmanagedBlock::from_bytes(server_random)?;
        Ok(Self {
            params: CK_SSL3_RANDOM_DATA {
                pClientRandom: client_random.ptr(),
                ulClientRandomLen: client_random_len,
                pServerRandom: server_random.ptr(),
                ulServerRandomLen: server_random_len,
            },
            client_random,
            server_random,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(Ssl3RandomData, CK_SSL3_RANDOM_DATA<L>, [client_random, server_random]);

/// Allocate the `CK_VERSION` the token fills, unless the Diffie-Hellman
/// variant is used: it returns no version and `pVersion` stays null.
pub(crate) fn version_block(dh: bool) -> PResult<UnmanagedBlock> {
    if dh {
        Ok(UnmanagedBlock::null())
    } else {
        UnmanagedBlock::allocate(size_of::<CK_VERSION>())
    }
}

/// `CKM_SSL3_MASTER_KEY_DERIVE` and `CKM_SSL3_MASTER_KEY_DERIVE_DH`
#[derive(Debug)]
pub struct Ssl3MasterKeyDeriveParams<'r, L: CkLayout> {
    params: CK_SSL3_MASTER_KEY_DERIVE_PARAMS<L>,
    version: UnmanagedBlock,
    state: DisposeState,
    _random_info: PhantomData<&'r Ssl3RandomData<L>>,
}

impl<'r, L: CkLayout> Ssl3MasterKeyDeriveParams<'r, L> {
    /// `dh` selects `CKM_SSL3_MASTER_KEY_DERIVE_DH`, which returns no version
    pub fn new(random_info: &'r Ssl3RandomData<L>, dh: bool) -> PResult<Self> {
        ensure_layout::<L>()?;
        let random_info = random_info.to_marshalable_structure()?;

        let version = version_block(dh)?;
        Ok(Self {
            params: CK_SSL3_MASTER_KEY_DERIVE_PARAMS {
                RandomInfo: random_info,
                pVersion: version.ptr(),
            },
            version,
            state: DisposeState::default(),
            _random_info: PhantomData,
        })
    }

    /// The SSL protocol version written by the token, `None` for the
    /// Diffie-Hellman variant
    pub fn version(&self) -> PResult<Option<CK_VERSION>> {
        self.state.ensure_active(Self::NAME)?;
        self.version.read_struct::<CK_VERSION>()
    }
}

mechanism_params!(
    Ssl3MasterKeyDeriveParams<'r>,
    CK_SSL3_MASTER_KEY_DERIVE_PARAMS<L>,
    [version]
);

/// `CKM_SSL3_KEY_AND_MAC_DERIVE`
///
/// The handles and IVs generated by the token are returned through
/// [`Ssl3KeyMatParams::returned_key_material`].
#[derive(Debug)]
pub struct Ssl3KeyMatParams<'r, L: CkLayout> {
    params: CK_SSL3_KEY_MAT_PARAMS<L>,
    returned_key_material: ReturnedMaterial<Ssl3KeyMatOut<L>>,
    state: DisposeState,
    _random_info: PhantomData<&'r Ssl3RandomData<L>>,
}

impl<'r, L: CkLayout> Ssl3KeyMatParams<'r, L> {
    /// `iv_size_in_bits` must be a multiple of 8: both IV buffers are that long.
    pub fn new(
        mac_size_in_bits: u64,
        key_size_in_bits: u64,
        iv_size_in_bits: u64,
        is_export: bool,
        random_info: &'r Ssl3RandomData<L>,
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let iv_len = bits_to_bytes("IV size", iv_size_in_bits)?;
        let mac_size_in_bits = ulong::<L>("MAC size", mac_size_in_bits)?;
        let key_size_in_bits = ulong::<L>("key size", key_size_in_bits)?;
        let iv_size_in_bits = ulong::<L>("IV size", iv_size_in_bits)?;
        let random_info = random_info.to_marshalable_structure()?;

        let returned_key_material = Ssl3KeyMatOut::<L>::allocate(iv_len)?;
        Ok(Self {
            params: CK_SSL3_KEY_MAT_PARAMS {
                ulMacSizeInBits: mac_size_in_bits,
                ulKeySizeInBits: key_size_in_bits,
                ulIVSizeInBits: iv_size_in_bits,
                bIsExport: ck_bool(is_export),
                RandomInfo: random_info,
                pReturnedKeyMaterial: returned_key_material.structure_ptr(),
            },
            returned_key_material: ReturnedMaterial::retained(returned_key_material),
            state: DisposeState::default(),
            _random_info: PhantomData,
        })
    }

    /// The key material written by the token.
    ///
    /// The first call reads it back and hands it over: from then on the
    /// returned object is no longer released with these parameters. Later
    /// calls return the same object.
    pub fn returned_key_material(&mut self) -> PResult<Rc<Ssl3KeyMatOut<L>>> {
        self.state.ensure_active(Self::NAME)?;
        self.returned_key_material.transfer()
    }
}

mechanism_params!(
    Ssl3KeyMatParams<'r>,
    CK_SSL3_KEY_MAT_PARAMS<L>,
    [returned_key_material]
);
