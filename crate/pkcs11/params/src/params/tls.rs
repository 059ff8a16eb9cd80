//! TLS pseudo random function, TLS 1.2 derivations and TLS KDF.
//!
//! TLS 1.2 reuses the SSL 3 random data and returned key material structures.

use std::{marker::PhantomData, rc::Rc};

use cosmian_pkcs11_sys::{
    CK_TLS_KDF_PARAMS, CK_TLS_PRF_PARAMS, CK_TLS12_KEY_MAT_PARAMS,
    CK_TLS12_MASTER_KEY_DERIVE_PARAMS, CK_VERSION, CkLayout, consts::CK_MECHANISM_TYPE,
};

use crate::{
    MechanismParams, PResult,
    arena::UnmanagedBlock,
    output::{PrfOutput, ReturnedMaterial, Ssl3KeyMatOut},
    params::{
        DisposeState, bits_to_bytes, ck_bool, ensure_layout, mechanism_params, optional_len,
        ssl3::{Ssl3RandomData, version_block},
        ulong, ulong_len,
    },
};

/// `CKM_TLS_PRF`
///
/// The output buffer is allocated with the requested length; the token writes
/// the actual length back and [`TlsPrfParams::output`] returns that many bytes.
#[derive(Debug)]
pub struct TlsPrfParams<L: CkLayout> {
    params: CK_TLS_PRF_PARAMS<L>,
    seed: UnmanagedBlock,
    label: UnmanagedBlock,
    output: PrfOutput,
    state: DisposeState,
}

impl<L: CkLayout> TlsPrfParams<L> {
    pub fn new(seed: &[u8], label: &[u8], output_len: usize) -> PResult<Self> {
        ensure_layout::<L>()?;
        let seed_len = ulong_len::<L>("seed", seed.len())?;
        let label_len = ulong_len::<L>("label", label.len())?;
        let output_capacity = ulong_len::<L>("output", output_len)?;

        let seed = UnmanagedBlock::from_bytes(seed)?;
        let label = UnmanagedBlock::from_bytes(label)?;
        let output = PrfOutput::allocate::<L>(output_len, output_capacity)?;
        Ok(Self {
            params: CK_TLS_PRF_PARAMS {
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

    /// The PRF output written by the token
    pub fn output(&self) -> PResult<Vec<u8>> {
        self.state.ensure_active(Self::NAME)?;
        self.output.read::<L>()
    }
}

mechanism_params!(TlsPrfParams, CK_TLS_PRF_PARAMS<L>, [seed, label, output]);

/// `CKM_TLS12_MASTER_KEY_DERIVE` and `CKM_TLS12_MASTER_KEY_DERIVE_DH`
#[derive(Debug)]
pub struct Tls12MasterKeyDeriveParams<'r, L: CkLayout> {
    params: CK_TLS12_MASTER_KEY_DERIVE_PARAMS<L>,
    version: UnmanagedBlock,
    state: DisposeState,
    _random_info: PhantomData<&'r Ssl3RandomData<L>>,
}

impl<'r, L: CkLayout> Tls12MasterKeyDeriveParams<'r, L> {
    /// `dh` selects `CKM_TLS12_MASTER_KEY_DERIVE_DH`, which returns no version
    pub fn new(
        random_info: &'r Ssl3RandomData<L>,
        prf_hash_mechanism: CK_MECHANISM_TYPE,
        dh: bool,
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let prf_hash_mechanism = ulong::<L>("PRF hash mechanism", prf_hash_mechanism)?;
        let random_info = random_info.to_marshalable_structure()?;

        let version = version_block(dh)?;
        Ok(Self {
            params: CK_TLS12_MASTER_KEY_DERIVE_PARAMS {
                RandomInfo: random_info,
                pVersion: version.ptr(),
                prfHashMechanism: prf_hash_mechanism,
            },
            version,
            state: DisposeState::default(),
            _random_info: PhantomData,
        })
    }

    pub fn version(&self) -> PResult<Option<CK_VERSION>> {
        self.state.ensure_active(Self::NAME)?;
        self.version.read_struct::<CK_VERSION>()
    }
}

mechanism_params!(
    Tls12MasterKeyDeriveParams<'r>,
    CK_TLS12_MASTER_KEY_DERIVE_PARAMS<L>,
    [version]
);

/// `CKM_TLS12_KEY_AND_MAC_DERIVE`
#[derive(Debug)]
pub struct Tls12KeyMatParams<'r, L: CkLayout> {
    params: CK_TLS12_KEY_MAT_PARAMS<L>,
    returned_key_material: ReturnedMaterial<Ssl3KeyMatOut<L>>,
    state: DisposeState,
    _random_info: PhantomData<&'r Ssl3RandomData<L>>,
}

impl<'r, L: CkLayout> Tls12KeyMatParams<'r, L> {
    pub fn new(
        mac_size_in_bits: u64,
        key_size_in_bits: u64,
        iv_size_in_bits: u64,
        is_export: bool,
        random_info: &'r Ssl3RandomData<L>,
        prf_hash_mechanism: CK_MECHANISM_TYPE,
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let iv_len = bits_to_bytes("IV size", iv_size_in_bits)?;
        let mac_size_in_bits = ulong::<L>("MAC size", mac_size_in_bits)?;
        let key_size_in_bits = ulong::<L>("key size", key_size_in_bits)?;
        let iv_size_in_bits = ulong::<L>("IV size", iv_size_in_bits)?;
        let prf_hash_mechanism = ulong::<L>("PRF hash mechanism", prf_hash_mechanism)?;
        let random_info = random_info.to_marshalable_structure()?;

        let returned_key_material = Ssl3KeyMatOut::<L>::allocate(iv_len)?;
        Ok(Self {
            params: CK_TLS12_KEY_MAT_PARAMS {
                ulMacSizeInBits: mac_size_in_bits,
                ulKeySizeInBits: key_size_in_bits,
                ulIVSizeInBits: iv_size_in_bits,
                bIsExport: ck_bool(is_export),
                RandomInfo: random_info,
                pReturnedKeyMaterial: returned_key_material.structure_ptr(),
                prfHashMechanism: prf_hash_mechanism,
            },
            returned_key_material: ReturnedMaterial::retained(returned_key_material),
            state: DisposeState::default(),
            _random_info: PhantomData,
        })
    }

    /// See [`Ssl3KeyMatParams::returned_key_material`](super::ssl3::Ssl3KeyMatParams::returned_key_material)
    pub fn returned_key_material(&mut self) -> PResult<Rc<Ssl3KeyMatOut<L>>> {
        self.state.ensure_active(Self::NAME)?;
        self.returned_key_material.transfer()
    }
}

mechanism_params!(
    Tls12KeyMatParams<'r>,
    CK_TLS12_KEY_MAT_PARAMS<L>,
    [returned_key_material]
);

/// `CKM_TLS_KDF`
#[derive(Debug)]
pub struct TlsKdfParams<'r, L: CkLayout> {
    params: CK_TLS_KDF_PARAMS<L>,
    label: UnmanagedBlock,
    context_data: UnmanagedBlock,
    state: DisposeState,
    _random_info: PhantomData<&'r Ssl3RandomData<L>>,
}

impl<'r, L: CkLayout> TlsKdfParams<'r, L> {
    pub fn new(
        prf_mechanism: CK_MECHANISM_TYPE,
        label: &[u8],
        random_info: &'r Ssl3RandomData<L>,
        context_data: Option<&[u8]>,
    ) -> PResult<Self> {
        ensure_layout::<L>()?;
        let prf_mechanism = ulong::<L>("PRF mechanism", prf_mechanism)?;
        let label_len = ulong_len::<L>("label", label.len())?;
        let context_data_len = optional_len::<L>("context data", context_data)?;
        let random_info = random_info.to_marshalable_structure()?;

        let label = UnmanagedBlock::from_bytes(label)?;
        let context_data = UnmanagedBlock::from_optional(context_data)?;
        Ok(Self {
            params: CK_TLS_KDF_PARAMS {
                prfMechanism: prf_mechanism,
                pLabel: label.ptr(),
                ulLabelLength: label_len,
                RandomInfo: random_info,
                pContextData: context_data.ptr(),
                ulContextDataLength: context_data_len,
            },
            label,
            context_data,
            state: DisposeState::default(),
            _random_info: PhantomData,
        })
    }
}

mechanism_params!(TlsKdfParams<'r>, CK_TLS_KDF_PARAMS<L>, [label, context_data]);
