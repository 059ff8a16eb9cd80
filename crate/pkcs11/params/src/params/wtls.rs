//! WTLS derivations.

use std::{marker::PhantomData, rc::Rc};

use cosmian_pkcs11_sys::{
    CK_WTLS_KEY_MAT_PARAMS, CK_WTLS_MASTER_KEY_DERIVE_PARAMS, CK_WTLS_PRF_PARAMS,
    CK_WTLS_RANDOM_DATA, CkLayout, consts::CK_MECHANISM_TYPE,
};

use crate::{
    MechanismParams, PResult,
    arena::UnmanagedBlock,
    error::result::PResultHelper,
    output::{PrfOutput, ReturnedMaterial, WtlsKeyMatOut},
    params::{DisposeState, bits_to_bytes, ck_bool, ensure_layout, mechanism_params, ulong, ulong_len},
};

/// `CK_WTLS_RANDOM_DATA`: client and server random values
#[derive(Debug)]
pub struct WtlsRandomData<L: CkLayout> {
    params: CK_WTLS_RANDOM_DATA<L>,
    client_random: UnmanagedBlock,
    server_random: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> WtlsRandomData<L> {
    pub fn new(client_random: &[u8], server_random: &[u8]) -> PResult<Self> {
        ensure_layout::<L>()?;
        let client_random_len = ulong_len::<L>("client random", client_random.len())?;
        let server_random_len = ulong_len::<L>("server random", server_random.len())?;

        let client_random = UnmanagedBlock::from_bytes(client_random)?;
        let server_random = UnmanagedBlock::from_bytes(server_random)?;
        Ok(Self {
            params: CK_WTLS_RANDOM_DATA {
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

mechanism_params!(WtlsRandomData, CK_WTLS_RANDOM_DATA<L>, [client_random, server_random]);

/// `CKM_WTLS_MASTER_KEY_DERIVE` and `CKM_WTLS_MASTER_KEY_DERIVE_DH_ECC`
#[derive(Debug)]
pub struct WtlsMasterKeyDeriveParams<'r, L: CkLayout> {
    params: CK_WTLS_MASTER_KEY_DERIVE_PARAMS<L>,
    version: UnmanagedBlock,
    state: DisposeState,
    _random_info: PhantomData<&'r WtlsRandomData<L>>,
}

impl<'r, L: CkLayout> WtlsMasterKeyDeriveParams<'r, L> {
    /// `dh_ecc` selects `CKM_WTLS_MASTER_KEY_DERIVE_DH_ECC`, which returns no version
    pub fn new(
        digest_mechanism: CK_MECHANISM_TYPE,
        random_info: &'r WtlsRandomData<L>,
        dh_ecc: bool,
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let digest_mechanism = ulong::<L>("digest mechanism", digest_mechanism)?;
        let random_info = random_info.to_marshalable_structure()?;

        // a single version byte
        let version = if dh_ecc {
            UnmanagedBlock::null()
        } else {
            UnmanagedBlock::allocate(1)?
        };
        Ok(Self {
            params: CK_WTLS_MASTER_KEY_DERIVE_PARAMS {
                DigestMechanism: digest_mechanism,
                RandomInfo: random_info,
                pVersion: version.ptr(),
            },
            version,
            state: DisposeState::default(),
            _random_info: PhantomData,
        })
    }

    /// The WTLS protocol version written by the token, `None` for the ECC variant
    pub fn version(&self) -> PResult<Option<u8>> {
        self.state.ensure_active(Self::NAME)?;
        let Some(version) = self.version.read(1)? else {
            return Ok(None);
        };
        Ok(Some(
            *version
                .first()
                .context("the version byte could not be read")?,
        ))
    }
}

mechanism_params!(
    WtlsMasterKeyDeriveParams<'r>,
    CK_WTLS_MASTER_KEY_DERIVE_PARAMS<L>,
    [version]
);

/// `CKM_WTLS_PRF`
#[derive(Debug)]
pub struct WtlsPrfParams<L: CkLayout> {
    params: CK_WTLS_PRF_PARAMS<L>,
    seed: UnmanagedBlock,
    label: UnmanagedBlock,
    output: PrfOutput,
    state: DisposeState,
}

impl<L: CkLayout> WtlsPrfParams<L> {
    pub fn new(
        digest_mechanism: CK_MECHANISM_TYPE,
        seed: &[u8],
        label: &[u8],
        output_len: usize,
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let digest_mechanism = ulong::<L>("digest mechanism", digest_mechanism)?;
        let seed_len = ulong_len::<L>("seed", seed.len())?;
        let label_len = ulong_len::<L>("label", label.len())?;
        let output_capacity = ulong_len::<L>("output", output_len)?;

        let seed = UnmanagedBlock::from_bytes(seed)?;
        let label = UnmanagedBlock::from_bytes(label)?;
        let output = PrfOutput::allocate::<L>(output_len, output_capacity)?;
        Ok(Self {
            params: CK_WTLS_PRF_PARAMS {
                DigestMechanism: digest_mechanism,
                pSeed: seed.ptr(),
                ulSeedLen: seed_len,
                pLabel: label.ptr(),
                ulLabelLen: label_len,
                pOutput: output.output_ptr(),
                pulOutputLen: output.output_len_ptr(),
            },
            seed,
            label,
            output,
            state: DisposeState::default(),
        })
    }

    pub fn output(&self) -> PResult<Vec<u8>> {
        self.state.ensure_active(Self::NAME)?;
        self.output.read::<L>()
    }
}

mechanism_params!(WtlsPrfParams, CK_WTLS_PRF_PARAMS<L>, [seed, label, output]);

/// `CKM_WTLS_SERVER_KEY_AND_MAC_DERIVE` and `CKM_WTLS_CLIENT_KEY_AND_MAC_DERIVE`
#[derive(Debug)]
pub struct WtlsKeyMatParams<'r, L: CkLayout> {
    params: CK_WTLS_KEY_MAT_PARAMS<L>,
    returned_key_material: ReturnedMaterial<WtlsKeyMatOut<L>>,
    state: DisposeState,
    _random_info: PhantomData<&'r WtlsRandomData<L>>,
}

impl<'r, L: CkLayout> WtlsKeyMatParams<'r, L> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        digest_mechanism: CK_MECHANISM_TYPE,
        mac_size_in_bits: u64,
        key_size_in_bits: u64,
        iv_size_in_bits: u64,
        sequence_number: u64,
        is_export: bool,
        random_info: &'r WtlsRandomData<L>,
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let iv_len = bits_to_bytes("IV size", iv_size_in_bits)?;
        let digest_mechanism = ulong::<L>("digest mechanism", digest_mechanism)?;
        let mac_size_in_bits = ulong::<L>("MAC size", mac_size_in_bits)?;
        let key_size_in_bits = ulong::<L>("key size", key_size_in_bits)?;
        let iv_size_in_bits = ulong::<L>("IV size", iv_size_in_bits)?;
        let sequence_number = ulong::<L>("sequence number", sequence_number)?;
        let random_info = random_info.to_marshalable_structure()?;

        let returned_key_material = WtlsKeyMatOut::<L>::allocate(iv_len)?;
        Ok(Self {
            params: CK_WTLS_KEY_MAT_PARAMS {
                DigestMechanism: digest_mechanism,
                ulMacSizeInBits: mac_size_in_bits,
                ulKeySizeInBits: key_size_in_bits,
                ulIVSizeInBits: iv_size_in_bits,
                ulSequenceNumber: sequence_number,
                bIsExport: ck_bool(is_export),
                RandomInfo: random_info,
                pReturnedKeyMaterial: returned_key_material.structure_ptr(),
            },
            returned_key_material: ReturnedMaterial::retained(returned_key_material),
            state: DisposeState::default(),
            _random_info: PhantomData,
        })
    }

    /// The key material written by the token; ownership moves to the caller
    /// on the first call.
    pub fn returned_key_material(&mut self) -> PResult<Rc<WtlsKeyMatOut<L>>> {
        self.state.ensure_active(Self::NAME)?;
        self.returned_key_material.transfer()
    }
}

mechanism_params!(
    WtlsKeyMatParams<'r>,
    CK_WTLS_KEY_MAT_PARAMS<L>,
    [returned_key_material]
);
