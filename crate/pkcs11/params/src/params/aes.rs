//! AES parameters: key derivation by encryption, counter mode and AEAD modes.

use cosmian_pkcs11_sys::{
    CK_AES_CBC_ENCRYPT_DATA_PARAMS, CK_AES_CTR_PARAMS, CK_CCM_PARAMS, CK_GCM_PARAMS, CkLayout,
};

use crate::{
    PResult, PResultHelper,
    arena::UnmanagedBlock,
    params::{
        DisposeState, cbc_encrypt_data_params, ctr_params, ensure_layout, mechanism_params,
        optional_len, ulong, ulong_len,
    },
    pkcs11_ensure,
};

pub const AES_BLOCK_SIZE: usize = 16;

/// Largest authentication tag of GCM, in bits
const GCM_MAX_TAG_BITS: u64 = 128;

cbc_encrypt_data_params!(
    /// `CKM_AES_CBC_ENCRYPT_DATA`: derive a key by encrypting `data` under the base key
    AesCbcEncryptDataParams,
    CK_AES_CBC_ENCRYPT_DATA_PARAMS,
    AES_BLOCK_SIZE
);

ctr_params!(
    /// `CKM_AES_CTR`
    AesCtrParams,
    CK_AES_CTR_PARAMS,
    AES_BLOCK_SIZE
);

/// `CKM_AES_GCM`
#[derive(Debug)]
pub struct GcmParams<L: CkLayout> {
    params: CK_GCM_PARAMS<L>,
    iv: UnmanagedBlock,
    aad: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> GcmParams<L> {
    /// `tag_bits` is the length of the authentication tag, at most 128.
    /// The IV length in bits is derived from `iv`.
    pub fn new(iv: &[u8], aad: Option<&[u8]>, tag_bits: u64) -> PResult<Self> {
        ensure_layout::<L>()?;
        pkcs11_ensure!(
            tag_bits <= GCM_MAX_TAG_BITS,
            "GCM tag length must be at most {GCM_MAX_TAG_BITS} bits, got {tag_bits}"
        );
        let iv_len = ulong_len::<L>("iv", iv.len())?;
        let iv_bytes = u64::try_from(iv.len()).context("iv length")?;
        let iv_bits = ulong::<L>("iv bits", iv_bytes * 8)?;
        let aad_len = optional_len::<L>("aad", aad)?;
        let tag_bits = ulong::<L>("tag bits", tag_bits)?;

        let iv = UnmanagedBlock::from_bytes(iv)?;
        let aad = UnmanagedBlock::from_optional(aad)?;
        Ok(Self {
            params: CK_GCM_PARAMS {
                pIv: iv.ptr(),
                ulIvLen: iv_len,
                ulIvBits: iv_bits,
                pAAD: aad.ptr(),
                ulAADLen: aad_len,
                ulTagBits: tag_bits,
            },
            iv,
            aad,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(GcmParams, CK_GCM_PARAMS<L>, [iv, aad]);

/// `CKM_AES_CCM`
#[derive(Debug)]
pub struct CcmParams<L: CkLayout> {
    params: CK_CCM_PARAMS<L>,
    nonce: UnmanagedBlock,
    aad: UnmanagedBlock,
    state: DisposeState,
}

impl<L: CkLayout> CcmParams<L> {
    /// `data_len` is the length of the message, `nonce` 7 to 13 bytes long
    /// and `mac_len` the length of the MAC in bytes: an even number from 4 to 16.
    pub fn new(data_len: u64, nonce: &[u8], aad: Option<&[u8]>, mac_len: u64) -> PResult<Self> {
        ensure_layout::<L>()?;
        pkcs11_ensure!(
            (7..=13).contains(&nonce.len()),
            "CCM nonce must be 7 to 13 bytes long, got {}",
            nonce.len()
        );
        pkcs11_ensure!(
            (4..=16).contains(&mac_len) && mac_len % 2 == 0,
            "CCM MAC length must be an even number of bytes from 4 to 16, got {mac_len}"
        );
        let data_len = ulong::<L>("data length", data_len)?;
        let nonce_len = ulong_len::<L>("nonce", nonce.len())?;
        let aad_len = optional_len::<L>("aad", aad)?;
        let mac_len = ulong::<L>("MAC length", mac_len)?;

        let nonce = UnmanagedBlock::from_bytes(nonce)?;
        let aad = UnmanagedBlock::from_optional(aad)?;
        Ok(Self {
            params: CK_CCM_PARAMS {
                ulDataLen: data_len,
                pNonce: nonce.ptr(),
                ulNonceLen: nonce_len,
                pAAD: aad.ptr(),
                ulAADLen: aad_len,
                ulMACLen: mac_len,
            },
            nonce,
            aad,
            state: DisposeState::default(),
        })
    }
}

mechanism_params!(CcmParams, CK_CCM_PARAMS<L>, [nonce, aad]);
