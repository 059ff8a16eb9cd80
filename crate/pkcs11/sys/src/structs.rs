//! Cryptoki mechanism parameter structures, as declared in `pkcs11t.h`.
//!
//! Member names are kept identical to the C headers.

use crate::layout::{CField, CFieldDef, CMember, CStruct, CkLayout, Ulong8Natural};

/// Rust type of a member kind
macro_rules! ck_type {
    (ulong) => { <L as CkLayout>::Ulong };
    (ptr) => { <L as CkLayout>::Ptr };
    (byte) => { u8 };
    ([u8; $n:literal]) => { [u8; $n] };
    ($nested:ident) => { $nested<L> };
}

/// C declaration of a member kind
macro_rules! ck_kind {
    (ulong) => { CField::Ulong };
    (ptr) => { CField::Ptr };
    (byte) => { CField::Byte };
    ([u8; $n:literal]) => { CField::Bytes($n) };
    ($nested:ident) => { CField::Struct(<$nested<Ulong8Natural> as CStruct>::FIELDS) };
}

/// Declare a structure generic over the layout, together with its C declaration.
///
/// Member types go through `ck_type!`, which `#[derive]` refuses, so the
/// usual traits are implemented here.
macro_rules! ck_struct {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$field_meta:meta])* $field:ident : $kind:tt ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(C)]
        pub struct $name<L: CkLayout> {
            $( $(#[$field_meta])* pub $field: ck_type!($kind), )*
        }

        impl<L: CkLayout> Clone for $name<L> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<L: CkLayout> Copy for $name<L> {}

        impl<L: CkLayout> Default for $name<L> {
            fn default() -> Self {
                Self {
                    $( $field: Default::default(), )*
                }
            }
        }

        impl<L: CkLayout> PartialEq for $name<L> {
            fn eq(&self, other: &Self) -> bool {
                true $( && self.$field == other.$field )*
            }
        }

        impl<L: CkLayout> Eq for $name<L> {}

        impl<L: CkLayout> ::core::fmt::Debug for $name<L> {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.debug_struct(stringify!($name))
                    $( .field(stringify!($field), &self.$field) )*
                    .finish()
            }
        }

        impl<L: CkLayout> CMember for $name<L> {
            fn write_member(&self, out: &mut [u8]) {
                let out = &mut out[..size_of::<Self>()];
                $( self.$field.write_member(&mut out[::core::mem::offset_of!(Self, $field)..]); )*
            }
        }

        impl<L: CkLayout> CStruct for $name<L> {
            const NAME: &'static str = stringify!($name);
            const FIELDS: &'static [CFieldDef] = &[
                $( CFieldDef { name: stringify!($field), kind: ck_kind!($kind) }, )*
            ];

            fn field_offsets() -> Vec<usize> {
                vec![$( ::core::mem::offset_of!(Self, $field) ),*]
            }

            fn zeroed() -> Self {
                Self::default()
            }
        }
    };
}

/// `CK_VERSION`: identical in every layout, made of bytes only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct CK_VERSION {
    pub major: u8,
    pub minor: u8,
}

impl CMember for CK_VERSION {
    fn write_member(&self, out: &mut [u8]) {
        out[..2].copy_from_slice(&[self.major, self.minor]);
    }
}

impl CStruct for CK_VERSION {
    const FIELDS: &'static [CFieldDef] = &[
        CFieldDef {
            name: "major",
            kind: CField::Byte,
        },
        CFieldDef {
            name: "minor",
            kind: CField::Byte,
        },
    ];
    const NAME: &'static str = "CK_VERSION";

    fn field_offsets() -> Vec<usize> {
        vec![
            ::core::mem::offset_of!(Self, major),
            ::core::mem::offset_of!(Self, minor),
        ]
    }

    fn zeroed() -> Self {
        Self::default()
    }
}

/// `CK_MAC_GENERAL_PARAMS` is a plain `CK_ULONG`: the MAC length in bytes
pub type CK_MAC_GENERAL_PARAMS<L> = <L as CkLayout>::Ulong;
/// `CK_RC2_PARAMS` is a plain `CK_ULONG`: the effective number of bits
pub type CK_RC2_PARAMS<L> = <L as CkLayout>::Ulong;
/// `CK_EXTRACT_PARAMS` is a plain `CK_ULONG`: the index of the first extracted bit
pub type CK_EXTRACT_PARAMS<L> = <L as CkLayout>::Ulong;

ck_struct! {
    pub struct CK_MECHANISM {
        mechanism: ulong,
        pParameter: ptr,
        ulParameterLen: ulong,
    }
}

// Block ciphers

ck_struct! {
    pub struct CK_AES_CBC_ENCRYPT_DATA_PARAMS {
        iv: [u8; 16],
        pData: ptr,
        length: ulong,
    }
}

ck_struct! {
    pub struct CK_ARIA_CBC_ENCRYPT_DATA_PARAMS {
        iv: [u8; 16],
        pData: ptr,
        length: ulong,
    }
}

ck_struct! {
    pub struct CK_CAMELLIA_CBC_ENCRYPT_DATA_PARAMS {
        iv: [u8; 16],
        pData: ptr,
        length: ulong,
    }
}

ck_struct! {
    pub struct CK_SEED_CBC_ENCRYPT_DATA_PARAMS {
        iv: [u8; 16],
        pData: ptr,
        length: ulong,
    }
}

ck_struct! {
    pub struct CK_DES_CBC_ENCRYPT_DATA_PARAMS {
        iv: [u8; 8],
        pData: ptr,
        length: ulong,
    }
}

ck_struct! {
    pub struct CK_AES_CTR_PARAMS {
        ulCounterBits: ulong,
        cb: [u8; 16],
    }
}

ck_struct! {
    pub struct CK_CAMELLIA_CTR_PARAMS {
        ulCounterBits: ulong,
        cb: [u8; 16],
    }
}

ck_struct! {
    pub struct CK_GCM_PARAMS {
        pIv: ptr,
        ulIvLen: ulong,
        ulIvBits: ulong,
        pAAD: ptr,
        ulAADLen: ulong,
        ulTagBits: ulong,
    }
}

ck_struct! {
    pub struct CK_CCM_PARAMS {
        ulDataLen: ulong,
        pNonce: ptr,
        ulNonceLen: ulong,
        pAAD: ptr,
        ulAADLen: ulong,
        ulMACLen: ulong,
    }
}

ck_struct! {
    pub struct CK_RC2_CBC_PARAMS {
        ulEffectiveBits: ulong,
        iv: [u8; 8],
    }
}

ck_struct! {
    pub struct CK_RC2_MAC_GENERAL_PARAMS {
        ulEffectiveBits: ulong,
        ulMacLength: ulong,
    }
}

ck_struct! {
    pub struct CK_RC5_PARAMS {
        ulWordsize: ulong,
        ulRounds: ulong,
    }
}

ck_struct! {
    pub struct CK_RC5_CBC_PARAMS {
        ulWordsize: ulong,
        ulRounds: ulong,
        pIv: ptr,
        ulIvLen: ulong,
    }
}

ck_struct! {
    pub struct CK_RC5_MAC_GENERAL_PARAMS {
        ulWordsize: ulong,
        ulRounds: ulong,
        ulMacLength: ulong,
    }
}

ck_struct! {
    pub struct CK_TLS_MAC_PARAMS {
        prfHashMechanism: ulong,
        ulMacLength: ulong,
        ulServerOrClient: ulong,
    }
}

// RSA

ck_struct! {
    pub struct CK_RSA_PKCS_OAEP_PARAMS {
        hashAlg: ulong,
        mgf: ulong,
        source: ulong,
        pSourceData: ptr,
        ulSourceDataLen: ulong,
    }
}

ck_struct! {
    pub struct CK_RSA_PKCS_PSS_PARAMS {
        hashAlg: ulong,
        mgf: ulong,
        sLen: ulong,
    }
}

ck_struct! {
    pub struct CK_KEY_WRAP_SET_OAEP_PARAMS {
        bBC: byte,
        pX: ptr,
        ulXLen: ulong,
    }
}

// Diffie-Hellman style derivations

ck_struct! {
    pub struct CK_ECDH1_DERIVE_PARAMS {
        kdf: ulong,
        ulSharedDataLen: ulong,
        pSharedData: ptr,
        ulPublicDataLen: ulong,
        pPublicData: ptr,
    }
}

ck_struct! {
    pub struct CK_ECDH2_DERIVE_PARAMS {
        kdf: ulong,
        ulSharedDataLen: ulong,
        pSharedData: ptr,
        ulPublicDataLen: ulong,
        pPublicData: ptr,
        ulPrivateDataLen: ulong,
        hPrivateData: ulong,
        ulPublicDataLen2: ulong,
        pPublicData2: ptr,
    }
}

ck_struct! {
    pub struct CK_ECMQV_DERIVE_PARAMS {
        kdf: ulong,
        ulSharedDataLen: ulong,
        pSharedData: ptr,
        ulPublicDataLen: ulong,
        pPublicData: ptr,
        ulPrivateDataLen: ulong,
        hPrivateData: ulong,
        ulPublicDataLen2: ulong,
        pPublicData2: ptr,
        publicKey: ulong,
    }
}

ck_struct! {
    pub struct CK_X9_42_DH1_DERIVE_PARAMS {
        kdf: ulong,
        ulOtherInfoLen: ulong,
        pOtherInfo: ptr,
        ulPublicDataLen: ulong,
        pPublicData: ptr,
    }
}

ck_struct! {
    pub struct CK_X9_42_DH2_DERIVE_PARAMS {
        kdf: ulong,
        ulOtherInfoLen: ulong,
        pOtherInfo: ptr,
        ulPublicDataLen: ulong,
        pPublicData: ptr,
        ulPrivateDataLen: ulong,
        hPrivateData: ulong,
        ulPublicDataLen2: ulong,
        pPublicData2: ptr,
    }
}

ck_struct! {
    pub struct CK_X9_42_MQV_DERIVE_PARAMS {
        kdf: ulong,
        ulOtherInfoLen: ulong,
        pOtherInfo: ptr,
        ulPublicDataLen: ulong,
        pPublicData: ptr,
        ulPrivateDataLen: ulong,
        hPrivateData: ulong,
        ulPublicDataLen2: ulong,
        pPublicData2: ptr,
        publicKey: ulong,
    }
}

ck_struct! {
    pub struct CK_KEA_DERIVE_PARAMS {
        isSender: byte,
        ulRandomLen: ulong,
        pRandomA: ptr,
        pRandomB: ptr,
        ulPublicDataLen: ulong,
        pPublicData: ptr,
    }
}

ck_struct! {
    pub struct CK_KEY_DERIVATION_STRING_DATA {
        pData: ptr,
        ulLen: ulong,
    }
}

ck_struct! {
    pub struct CK_GOSTR3410_DERIVE_PARAMS {
        kdf: ulong,
        pPublicData: ptr,
        ulPublicDataLen: ulong,
        pUKM: ptr,
        ulUKMLen: ulong,
    }
}

ck_struct! {
    pub struct CK_GOSTR3410_KEY_WRAP_PARAMS {
        pWrapOID: ptr,
        ulWrapOIDLen: ulong,
        pUKM: ptr,
        ulUKMLen: ulong,
        hKey: ulong,
    }
}

// Password based

ck_struct! {
    pub struct CK_PBE_PARAMS {
        /// Receives the 8 bytes IV generated by the token
        pInitVector: ptr,
        pPassword: ptr,
        ulPasswordLen: ulong,
        pSalt: ptr,
        ulSaltLen: ulong,
        ulIteration: ulong,
    }
}

ck_struct! {
    pub struct CK_PKCS5_PBKD2_PARAMS {
        saltSource: ulong,
        pSaltSourceData: ptr,
        ulSaltSourceDataLen: ulong,
        iterations: ulong,
        prf: ulong,
        pPrfData: ptr,
        ulPrfDataLen: ulong,
        pPassword: ptr,
        /// `CK_ULONG_PTR`: the password length lives in its own block
        ulPasswordLen: ptr,
    }
}

// SSL 3 / TLS

ck_struct! {
    pub struct CK_SSL3_RANDOM_DATA {
        pClientRandom: ptr,
        ulClientRandomLen: ulong,
        pServerRandom: ptr,
        ulServerRandomLen: ulong,
    }
}

ck_struct! {
    pub struct CK_SSL3_MASTER_KEY_DERIVE_PARAMS {
        RandomInfo: CK_SSL3_RANDOM_DATA,
        /// `CK_VERSION_PTR`, null for the Diffie-Hellman variants
        pVersion: ptr,
    }
}

ck_struct! {
    pub struct CK_SSL3_KEY_MAT_OUT {
        hClientMacSecret: ulong,
        hServerMacSecret: ulong,
        hClientKey: ulong,
        hServerKey: ulong,
        pIVClient: ptr,
        pIVServer: ptr,
    }
}

ck_struct! {
    pub struct CK_SSL3_KEY_MAT_PARAMS {
        ulMacSizeInBits: ulong,
        ulKeySizeInBits: ulong,
        ulIVSizeInBits: ulong,
        bIsExport: byte,
        RandomInfo: CK_SSL3_RANDOM_DATA,
        /// `CK_SSL3_KEY_MAT_OUT_PTR`
        pReturnedKeyMaterial: ptr,
    }
}

ck_struct! {
    pub struct CK_TLS_PRF_PARAMS {
        pSeed: ptr,
        ulSeedLen: ulong,
        pLabel: ptr,
        ulLabelLen: ulong,
        pOutput: ptr,
        /// `CK_ULONG_PTR`: output capacity on input, output length on return
        pulOutputLen: ptr,
    }
}

ck_struct! {
    pub struct CK_TLS12_MASTER_KEY_DERIVE_PARAMS {
        RandomInfo: CK_SSL3_RANDOM_DATA,
        pVersion: ptr,
        prfHashMechanism: ulong,
    }
}

ck_struct! {
    pub struct CK_TLS12_KEY_MAT_PARAMS {
        ulMacSizeInBits: ulong,
        ulKeySizeInBits: ulong,
        ulIVSizeInBits: ulong,
        bIsExport: byte,
        RandomInfo: CK_SSL3_RANDOM_DATA,
        pReturnedKeyMaterial: ptr,
        prfHashMechanism: ulong,
    }
}

ck_struct! {
    pub struct CK_TLS_KDF_PARAMS {
        prfMechanism: ulong,
        pLabel: ptr,
        ulLabelLength: ulong,
        RandomInfo: CK_SSL3_RANDOM_DATA,
        pContextData: ptr,
        ulContextDataLength: ulong,
    }
}

// WTLS

ck_struct! {
    pub struct CK_WTLS_RANDOM_DATA {
        pClientRandom: ptr,
        ulClientRandomLen: ulong,
        pServerRandom: ptr,
        ulServerRandomLen: ulong,
    }
}

ck_struct! {
    pub struct CK_WTLS_MASTER_KEY_DERIVE_PARAMS {
        DigestMechanism: ulong,
        RandomInfo: CK_WTLS_RANDOM_DATA,
        /// `CK_BYTE_PTR`: a single version byte, null for the ECC variant
        pVersion: ptr,
    }
}

ck_struct! {
    pub struct CK_WTLS_PRF_PARAMS {
        DigestMechanism: ulong,
        pSeed: ptr,
        ulSeedLen: ulong,
        pLabel: ptr,
        ulLabelLen: ulong,
        pOutput: ptr,
        pulOutputLen: ptr,
    }
}

ck_struct! {
    pub struct CK_WTLS_KEY_MAT_OUT {
        hMacSecret: ulong,
        hKey: ulong,
        pIV: ptr,
    }
}

ck_struct! {
    pub struct CK_WTLS_KEY_MAT_PARAMS {
        DigestMechanism: ulong,
        ulMacSizeInBits: ulong,
        ulKeySizeInBits: ulong,
        ulIVSizeInBits: ulong,
        ulSequenceNumber: ulong,
        bIsExport: byte,
        RandomInfo: CK_WTLS_RANDOM_DATA,
        pReturnedKeyMaterial: ptr,
    }
}
