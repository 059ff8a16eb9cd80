//! Cryptoki constants used by the mechanism parameters.
//!
//! Values are platform independent: they are converted to the native
//! `CK_ULONG` of the selected layout when a structure is filled.

pub type CK_MECHANISM_TYPE = u64;
pub type CK_RSA_PKCS_MGF_TYPE = u64;
pub type CK_RSA_PKCS_OAEP_SOURCE_TYPE = u64;
pub type CK_EC_KDF_TYPE = u64;
pub type CK_X9_42_DH_KDF_TYPE = u64;
pub type CK_PKCS5_PBKDF2_SALT_SOURCE_TYPE = u64;
pub type CK_PKCS5_PBKD2_PSEUDO_RANDOM_FUNCTION_TYPE = u64;
pub type CK_OBJECT_HANDLE = u64;

pub const CK_FALSE: u8 = 0;
pub const CK_TRUE: u8 = 1;

pub const CKM_RSA_PKCS: CK_MECHANISM_TYPE = 0x0001;
pub const CKM_RSA_PKCS_OAEP: CK_MECHANISM_TYPE = 0x0009;
pub const CKM_RSA_PKCS_PSS: CK_MECHANISM_TYPE = 0x000D;
pub const CKM_X9_42_DH_DERIVE: CK_MECHANISM_TYPE = 0x0031;
pub const CKM_X9_42_DH_HYBRID_DERIVE: CK_MECHANISM_TYPE = 0x0032;
pub const CKM_X9_42_MQV_DERIVE: CK_MECHANISM_TYPE = 0x0033;
pub const CKM_RC2_ECB: CK_MECHANISM_TYPE = 0x0101;
pub const CKM_RC2_CBC: CK_MECHANISM_TYPE = 0x0102;
pub const CKM_RC2_MAC_GENERAL: CK_MECHANISM_TYPE = 0x0104;
pub const CKM_MD5: CK_MECHANISM_TYPE = 0x0210;
pub const CKM_MD5_HMAC_GENERAL: CK_MECHANISM_TYPE = 0x0212;
pub const CKM_SHA_1: CK_MECHANISM_TYPE = 0x0220;
pub const CKM_SHA_1_HMAC_GENERAL: CK_MECHANISM_TYPE = 0x0222;
pub const CKM_SHA256: CK_MECHANISM_TYPE = 0x0250;
pub const CKM_SHA256_HMAC_GENERAL: CK_MECHANISM_TYPE = 0x0252;
pub const CKM_SHA224: CK_MECHANISM_TYPE = 0x0255;
pub const CKM_SHA384: CK_MECHANISM_TYPE = 0x0260;
pub const CKM_SHA512: CK_MECHANISM_TYPE = 0x0270;
pub const CKM_RC5_ECB: CK_MECHANISM_TYPE = 0x0331;
pub const CKM_RC5_CBC: CK_MECHANISM_TYPE = 0x0332;
pub const CKM_RC5_MAC_GENERAL: CK_MECHANISM_TYPE = 0x0334;
pub const CKM_CONCATENATE_BASE_AND_DATA: CK_MECHANISM_TYPE = 0x0362;
pub const CKM_XOR_BASE_AND_DATA: CK_MECHANISM_TYPE = 0x0364;
pub const CKM_EXTRACT_KEY_FROM_KEY: CK_MECHANISM_TYPE = 0x0365;
pub const CKM_SSL3_MASTER_KEY_DERIVE: CK_MECHANISM_TYPE = 0x0371;
pub const CKM_SSL3_KEY_AND_MAC_DERIVE: CK_MECHANISM_TYPE = 0x0372;
pub const CKM_SSL3_MASTER_KEY_DERIVE_DH: CK_MECHANISM_TYPE = 0x0373;
pub const CKM_TLS_MASTER_KEY_DERIVE: CK_MECHANISM_TYPE = 0x0375;
pub const CKM_TLS_KEY_AND_MAC_DERIVE: CK_MECHANISM_TYPE = 0x0376;
pub const CKM_TLS_MASTER_KEY_DERIVE_DH: CK_MECHANISM_TYPE = 0x0377;
pub const CKM_TLS_PRF: CK_MECHANISM_TYPE = 0x0378;
pub const CKM_PBE_SHA1_DES3_EDE_CBC: CK_MECHANISM_TYPE = 0x03A8;
pub const CKM_PKCS5_PBKD2: CK_MECHANISM_TYPE = 0x03B0;
pub const CKM_WTLS_MASTER_KEY_DERIVE: CK_MECHANISM_TYPE = 0x03D1;
pub const CKM_WTLS_MASTER_KEY_DERIVE_DH_ECC: CK_MECHANISM_TYPE = 0x03D2;
pub const CKM_WTLS_PRF: CK_MECHANISM_TYPE = 0x03D3;
pub const CKM_WTLS_SERVER_KEY_AND_MAC_DERIVE: CK_MECHANISM_TYPE = 0x03D4;
pub const CKM_WTLS_CLIENT_KEY_AND_MAC_DERIVE: CK_MECHANISM_TYPE = 0x03D5;
pub const CKM_TLS12_MASTER_KEY_DERIVE: CK_MECHANISM_TYPE = 0x03E0;
pub const CKM_TLS12_KEY_AND_MAC_DERIVE: CK_MECHANISM_TYPE = 0x03E1;
pub const CKM_TLS12_MASTER_KEY_DERIVE_DH: CK_MECHANISM_TYPE = 0x03E2;
pub const CKM_TLS_MAC: CK_MECHANISM_TYPE = 0x03E4;
pub const CKM_TLS_KDF: CK_MECHANISM_TYPE = 0x03E5;
pub const CKM_KEY_WRAP_SET_OAEP: CK_MECHANISM_TYPE = 0x0401;
pub const CKM_CAMELLIA_CBC_ENCRYPT_DATA: CK_MECHANISM_TYPE = 0x0557;
pub const CKM_CAMELLIA_CTR: CK_MECHANISM_TYPE = 0x0558;
pub const CKM_ARIA_CBC_ENCRYPT_DATA: CK_MECHANISM_TYPE = 0x0565;
pub const CKM_SEED_CBC_ENCRYPT_DATA: CK_MECHANISM_TYPE = 0x0657;
pub const CKM_KEA_KEY_DERIVE: CK_MECHANISM_TYPE = 0x1011;
pub const CKM_ECDH1_DERIVE: CK_MECHANISM_TYPE = 0x1050;
pub const CKM_ECDH1_COFACTOR_DERIVE: CK_MECHANISM_TYPE = 0x1051;
pub const CKM_ECMQV_DERIVE: CK_MECHANISM_TYPE = 0x1052;
pub const CKM_AES_CTR: CK_MECHANISM_TYPE = 0x1086;
pub const CKM_AES_GCM: CK_MECHANISM_TYPE = 0x1087;
pub const CKM_AES_CCM: CK_MECHANISM_TYPE = 0x1088;
pub const CKM_DES_CBC_ENCRYPT_DATA: CK_MECHANISM_TYPE = 0x1101;
pub const CKM_DES3_CBC_ENCRYPT_DATA: CK_MECHANISM_TYPE = 0x1103;
pub const CKM_AES_CBC_ENCRYPT_DATA: CK_MECHANISM_TYPE = 0x1105;
pub const CKM_GOSTR3410_KEY_WRAP: CK_MECHANISM_TYPE = 0x1203;
pub const CKM_GOSTR3410_DERIVE: CK_MECHANISM_TYPE = 0x1204;

pub const CKG_MGF1_SHA1: CK_RSA_PKCS_MGF_TYPE = 0x0001;
pub const CKG_MGF1_SHA256: CK_RSA_PKCS_MGF_TYPE = 0x0002;
pub const CKG_MGF1_SHA384: CK_RSA_PKCS_MGF_TYPE = 0x0003;
pub const CKG_MGF1_SHA512: CK_RSA_PKCS_MGF_TYPE = 0x0004;
pub const CKG_MGF1_SHA224: CK_RSA_PKCS_MGF_TYPE = 0x0005;

pub const CKZ_DATA_SPECIFIED: CK_RSA_PKCS_OAEP_SOURCE_TYPE = 0x0001;

pub const CKD_NULL: CK_EC_KDF_TYPE = 0x0001;
pub const CKD_SHA1_KDF: CK_EC_KDF_TYPE = 0x0002;
pub const CKD_SHA1_KDF_ASN1: CK_X9_42_DH_KDF_TYPE = 0x0003;
pub const CKD_SHA1_KDF_CONCATENATE: CK_X9_42_DH_KDF_TYPE = 0x0004;
pub const CKD_SHA224_KDF: CK_EC_KDF_TYPE = 0x0005;
pub const CKD_SHA256_KDF: CK_EC_KDF_TYPE = 0x0006;
pub const CKD_SHA384_KDF: CK_EC_KDF_TYPE = 0x0007;
pub const CKD_SHA512_KDF: CK_EC_KDF_TYPE = 0x0008;

pub const CKZ_SALT_SPECIFIED: CK_PKCS5_PBKDF2_SALT_SOURCE_TYPE = 0x0001;

pub const CKP_PKCS5_PBKD2_HMAC_SHA1: CK_PKCS5_PBKD2_PSEUDO_RANDOM_FUNCTION_TYPE = 0x0001;
pub const CKP_PKCS5_PBKD2_HMAC_GOSTR3411: CK_PKCS5_PBKD2_PSEUDO_RANDOM_FUNCTION_TYPE = 0x0002;
pub const CKP_PKCS5_PBKD2_HMAC_SHA224: CK_PKCS5_PBKD2_PSEUDO_RANDOM_FUNCTION_TYPE = 0x0003;
pub const CKP_PKCS5_PBKD2_HMAC_SHA256: CK_PKCS5_PBKD2_PSEUDO_RANDOM_FUNCTION_TYPE = 0x0004;
pub const CKP_PKCS5_PBKD2_HMAC_SHA384: CK_PKCS5_PBKD2_PSEUDO_RANDOM_FUNCTION_TYPE = 0x0005;
pub const CKP_PKCS5_PBKD2_HMAC_SHA512: CK_PKCS5_PBKD2_PSEUDO_RANDOM_FUNCTION_TYPE = 0x0006;
