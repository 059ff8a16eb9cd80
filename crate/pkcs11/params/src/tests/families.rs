use cosmian_pkcs11_sys::{
    CkLayout, NativePtr, NativeUlong,
    consts::{CKD_SHA1_KDF, CKD_SHA1_KDF_ASN1, CKM_SHA256},
};

use crate::{
    MechanismParams, Pkcs11Error,
    arena::{reset_stats, stats},
    params::{
        block_cipher::{
            AriaCbcEncryptDataParams, CamelliaCbcEncryptDataParams, CamelliaCtrParams, Rc5Params,
            SeedCbcEncryptDataParams,
        },
        ecdh::{Ecdh2DeriveParams, EcmqvDeriveParams},
        gost::Gostr3410KeyWrapParams,
        mac::{Rc2MacGeneralParams, Rc5MacGeneralParams},
        ssl3::Ssl3RandomData,
        tls::TlsKdfParams,
        x9_42::{X942Dh2DeriveParams, X942MqvDeriveParams},
    },
    tests::{read_bytes, with_current_layout},
};

fn sixteen_byte_iv_families<L: CkLayout>() {
    let data = b"derivation data";
    let aria = AriaCbcEncryptDataParams::<L>::new(&[1; 16], Some(data)).unwrap();
    let camellia = CamelliaCbcEncryptDataParams::<L>::new(&[2; 16], Some(data)).unwrap();
    let seed = SeedCbcEncryptDataParams::<L>::new(&[3; 16], None).unwrap();

    let view = aria.to_marshalable_structure().unwrap();
    assert_eq!(view.iv, [1; 16]);
    assert_eq!(view.length.to_u64(), data.len() as u64);
    assert_eq!(read_bytes(view.pData.as_raw(), data.len()), data);

    let view = camellia.to_marshalable_structure().unwrap();
    assert_eq!(view.iv, [2; 16]);
    assert_eq!(read_bytes(view.pData.as_raw(), data.len()), data);

    let view = seed.to_marshalable_structure().unwrap();
    assert!(view.pData.is_null());
    assert_eq!(view.length.to_u64(), 0);

    assert!(matches!(
        SeedCbcEncryptDataParams::<L>::new(&[3; 8], None),
        Err(Pkcs11Error::SizeMismatch {
            expected: 16,
            actual: 8,
            ..
        })
    ));
}

#[test]
fn test_sixteen_byte_iv_families() {
    with_current_layout!(sixteen_byte_iv_families);
}

fn camellia_counter<L: CkLayout>() {
    let params = CamelliaCtrParams::<L>::new(128, &[9; 16]).unwrap();
    let view = params.to_marshalable_structure().unwrap();
    assert_eq!(view.ulCounterBits.to_u64(), 128);
    assert_eq!(view.cb, [9; 16]);

    assert!(matches!(
        CamelliaCtrParams::<L>::new(129, &[9; 16]),
        Err(Pkcs11Error::InvalidParameter(_))
    ));
    assert!(matches!(
        CamelliaCtrParams::<L>::new(0, &[9; 16]),
        Err(Pkcs11Error::InvalidParameter(_))
    ));
}

#[test]
fn test_camellia_counter_bits() {
    with_current_layout!(camellia_counter);
}

fn rc5_and_mac_scalars<L: CkLayout>() {
    reset_stats();
    let rc5 = Rc5Params::<L>::new(4, 12).unwrap();
    let view = rc5.to_marshalable_structure().unwrap();
    assert_eq!(view.ulWordsize.to_u64(), 4);
    assert_eq!(view.ulRounds.to_u64(), 12);

    let rc2_mac = Rc2MacGeneralParams::<L>::new(64, 4).unwrap();
    let view = rc2_mac.to_marshalable_structure().unwrap();
    assert_eq!(view.ulEffectiveBits.to_u64(), 64);
    assert_eq!(view.ulMacLength.to_u64(), 4);

    let rc5_mac = Rc5MacGeneralParams::<L>::new(8, 16, 8).unwrap();
    let view = rc5_mac.to_marshalable_structure().unwrap();
    assert_eq!(view.ulWordsize.to_u64(), 8);
    assert_eq!(view.ulRounds.to_u64(), 16);
    assert_eq!(view.ulMacLength.to_u64(), 8);

    // scalar structures live inline
    assert_eq!(stats().allocations, 0);

    assert!(matches!(
        Rc2MacGeneralParams::<L>::new(0, 4),
        Err(Pkcs11Error::InvalidParameter(_))
    ));
}

#[test]
fn test_rc5_and_mac_scalars() {
    with_current_layout!(rc5_and_mac_scalars);
}

fn ecdh_two_key_pairs<L: CkLayout>() {
    reset_stats();
    let mut params =
        Ecdh2DeriveParams::<L>::new(CKD_SHA1_KDF, None, &[4; 65], 32, 17, &[5; 65]).unwrap();
    // no shared data: two public values only
    assert_eq!(stats().allocations, 2);

    let view = params.to_marshalable_structure().unwrap();
    assert_eq!(view.kdf.to_u64(), CKD_SHA1_KDF);
    assert!(view.pSharedData.is_null());
    assert_eq!(view.ulSharedDataLen.to_u64(), 0);
    assert_eq!(view.ulPrivateDataLen.to_u64(), 32);
    assert_eq!(view.hPrivateData.to_u64(), 17);
    assert_eq!(read_bytes(view.pPublicData.as_raw(), 65), vec![4; 65]);
    assert_eq!(read_bytes(view.pPublicData2.as_raw(), 65), vec![5; 65]);

    params.dispose();
    assert_eq!(stats().frees, 2);

    let params = EcmqvDeriveParams::<L>::new(
        CKD_SHA1_KDF,
        Some(b"shared"),
        &[4; 65],
        32,
        17,
        &[5; 65],
        18,
    )
    .unwrap();
    let view = params.to_marshalable_structure().unwrap();
    assert_eq!(view.publicKey.to_u64(), 18);
    assert_eq!(read_bytes(view.pSharedData.as_raw(), 6), b"shared");
}

#[test]
fn test_ecdh_with_two_key_pairs() {
    with_current_layout!(ecdh_two_key_pairs);
}

fn x9_42_two_key_pairs<L: CkLayout>() {
    reset_stats();
    let params = X942Dh2DeriveParams::<L>::new(
        CKD_SHA1_KDF_ASN1,
        Some(b"other info"),
        &[6; 128],
        20,
        21,
        &[7; 128],
    )
    .unwrap();
    assert_eq!(stats().allocations, 3);
    let view = params.to_marshalable_structure().unwrap();
    assert_eq!(view.ulOtherInfoLen.to_u64(), 10);
    assert_eq!(view.ulPublicDataLen2.to_u64(), 128);
    assert_eq!(read_bytes(view.pOtherInfo.as_raw(), 10), b"other info");
    drop(params);
    assert_eq!(stats().frees, 3);

    let params =
        X942MqvDeriveParams::<L>::new(CKD_SHA1_KDF_ASN1, None, &[6; 128], 20, 21, &[7; 128], 22)
            .unwrap();
    let view = params.to_marshalable_structure().unwrap();
    assert!(view.pOtherInfo.is_null());
    assert_eq!(view.publicKey.to_u64(), 22);
}

#[test]
fn test_x9_42_with_two_key_pairs() {
    with_current_layout!(x9_42_two_key_pairs);
}

fn gost_key_wrap<L: CkLayout>() {
    let oid = [0x06, 0x07, 0x2A, 0x85, 0x03, 0x02, 0x02, 0x1F, 0x01];
    let params = Gostr3410KeyWrapParams::<L>::new(Some(&oid), Some(&[8; 8]), 30).unwrap();
    let view = params.to_marshalable_structure().unwrap();
    assert_eq!(view.ulWrapOIDLen.to_u64(), oid.len() as u64);
    assert_eq!(read_bytes(view.pWrapOID.as_raw(), oid.len()), oid);
    assert_eq!(read_bytes(view.pUKM.as_raw(), 8), vec![8; 8]);
    assert_eq!(view.hKey.to_u64(), 30);

    let params = Gostr3410KeyWrapParams::<L>::new(None, None, 30).unwrap();
    let view = params.to_marshalable_structure().unwrap();
    assert!(view.pWrapOID.is_null());
    assert!(view.pUKM.is_null());
}

#[test]
fn test_gost_key_wrap() {
    with_current_layout!(gost_key_wrap);
}

fn tls_kdf_borrows_random_info<L: CkLayout>() {
    let random = Ssl3RandomData::<L>::new(&[1; 32], &[2; 32]).unwrap();
    let random_view = random.to_marshalable_structure().unwrap();

    reset_stats();
    let mut params =
        TlsKdfParams::new(CKM_SHA256, b"EXPORTER", &random, Some(b"context")).unwrap();
    assert_eq!(stats().allocations, 2);

    let view = params.to_marshalable_structure().unwrap();
    assert_eq!(view.prfMechanism.to_u64(), CKM_SHA256);
    assert_eq!(view.ulLabelLength.to_u64(), 8);
    assert_eq!(view.RandomInfo, random_view);
    assert_eq!(view.ulContextDataLength.to_u64(), 7);
    assert_eq!(read_bytes(view.pContextData.as_raw(), 7), b"context");

    params.dispose();
    // the random data stays with its owner
    assert_eq!(stats().frees, 2);
    assert_eq!(random.to_marshalable_structure().unwrap(), random_view);
    assert_eq!(
        read_bytes(random_view.pClientRandom.as_raw(), 32),
        vec![1; 32]
    );
}

#[test]
fn test_tls_kdf_borrows_random_info() {
    with_current_layout!(tls_kdf_borrows_random_info);
}
