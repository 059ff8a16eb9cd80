use std::rc::Rc;

use cosmian_logger::log_init;
use cosmian_pkcs11_sys::{
    CK_SSL3_KEY_MAT_OUT, CK_VERSION, CK_WTLS_KEY_MAT_OUT, CkLayout, NativePtr, NativeUlong,
    consts::{CKM_SHA_1, CKM_SHA256, CKM_TLS12_KEY_AND_MAC_DERIVE},
};

use crate::{
    KeyMaterialOutput, Mechanism, MechanismParams, Pkcs11Error,
    arena::{reset_stats, stats},
    params::{
        pbe::{PBE_INIT_VECTOR_LEN, PbeParams},
        ssl3::{Ssl3KeyMatParams, Ssl3MasterKeyDeriveParams, Ssl3RandomData},
        tls::{Tls12KeyMatParams, Tls12MasterKeyDeriveParams, TlsPrfParams},
        wtls::{WtlsKeyMatParams, WtlsMasterKeyDeriveParams, WtlsPrfParams, WtlsRandomData},
    },
    tests::{read_value, with_current_layout, write_bytes, write_value},
};

fn ulong<L: CkLayout>(value: u64) -> L::Ulong {
    L::Ulong::try_from_u64(value).unwrap()
}

fn ssl3_key_material_transfer<L: CkLayout>() {
    let random = Ssl3RandomData::<L>::new(&[1; 32], &[2; 32]).unwrap();
    reset_stats();
    let mut params = Ssl3KeyMatParams::new(160, 128, 128, false, &random).unwrap();
    // the output structure and two IVs
    assert_eq!(stats().allocations, 3);

    // the token fills the output structure
    let view = params.to_marshalable_structure().unwrap();
    assert_eq!(view.ulIVSizeInBits.to_u64(), 128);
    let out_ptr = view.pReturnedKeyMaterial.as_raw();
    let mut out: CK_SSL3_KEY_MAT_OUT<L> = read_value(out_ptr);
    assert!(!out.pIVClient.is_null());
    assert!(!out.pIVServer.is_null());
    out.hClientMacSecret = ulong::<L>(11);
    out.hServerMacSecret = ulong::<L>(12);
    out.hClientKey = ulong::<L>(13);
    out.hServerKey = ulong::<L>(14);
    write_value(out_ptr, out);
    write_bytes(out.pIVClient.as_raw(), &[0xC1; 16]);
    write_bytes(out.pIVServer.as_raw(), &[0x5E; 16]);

    let material = params.returned_key_material().unwrap();
    assert_eq!(material.client_mac_secret().unwrap(), 11);
    assert_eq!(material.server_mac_secret().unwrap(), 12);
    assert_eq!(material.client_key().unwrap(), 13);
    assert_eq!(material.server_key().unwrap(), 14);
    assert_eq!(material.iv_client().unwrap(), vec![0xC1; 16]);
    assert_eq!(material.iv_server().unwrap(), vec![0x5E; 16]);
    assert_eq!(material.to_marshalable_structure().unwrap(), out);

    let again = params.returned_key_material().unwrap();
    assert!(Rc::ptr_eq(&material, &again));
    drop(again);

    params.dispose();
    // the material now belongs to the caller
    assert_eq!(stats().frees, 0);
    assert!(!material.is_disposed());
    assert_eq!(material.iv_server().unwrap(), vec![0x5E; 16]);
    assert!(matches!(
        params.returned_key_material(),
        Err(Pkcs11Error::Disposed("Ssl3KeyMatParams"))
    ));

    material.dispose();
    assert!(material.is_disposed());
    assert_eq!(stats().frees, 3);
    assert_eq!(stats().live_bytes, 0);
    material.dispose();
    assert_eq!(stats().frees, 3);
    drop(material);
    assert_eq!(stats().frees, 3);
    assert_eq!(stats().allocations, 3);
}

#[test]
fn test_ssl3_key_material_ownership_moves_to_the_caller() {
    log_init(None);
    with_current_layout!(ssl3_key_material_transfer);
}

fn key_material_released_with_params<L: CkLayout>() {
    let random = Ssl3RandomData::<L>::new(&[1; 32], &[2; 32]).unwrap();
    reset_stats();
    let mut params = Tls12KeyMatParams::new(0, 256, 0, false, &random, CKM_SHA256).unwrap();
    // no IV: only the output structure
    assert_eq!(stats().allocations, 1);
    let view = params.to_marshalable_structure().unwrap();
    let out: CK_SSL3_KEY_MAT_OUT<L> = read_value(view.pReturnedKeyMaterial.as_raw());
    assert!(out.pIVClient.is_null());
    assert!(out.pIVServer.is_null());

    params.dispose();
    assert_eq!(stats().frees, 1);
    assert_eq!(stats().live_bytes, 0);
}

#[test]
fn test_untransferred_key_material_is_released_with_the_params() {
    with_current_layout!(key_material_released_with_params);
}

fn transferred_material_dispose<L: CkLayout>() {
    let random = Ssl3RandomData::<L>::new(&[1; 32], &[2; 32]).unwrap();
    let mut params = Tls12KeyMatParams::new(256, 128, 96, false, &random, CKM_SHA256).unwrap();
    let material = params.returned_key_material().unwrap();
    assert_eq!(material.iv_client().unwrap(), vec![0; 12]);

    assert!(params.to_marshalable_structure().is_ok());

    material.dispose();
    assert!(material.is_disposed());
    assert!(matches!(
        material.client_key(),
        Err(Pkcs11Error::Disposed("Ssl3KeyMatOut"))
    ));
    // pReturnedKeyMaterial would point at released memory
    assert!(matches!(
        params.to_marshalable_structure(),
        Err(Pkcs11Error::Disposed("Ssl3KeyMatOut"))
    ));
    assert!(matches!(
        Mechanism::new(CKM_TLS12_KEY_AND_MAC_DERIVE, &params),
        Err(Pkcs11Error::Disposed("Ssl3KeyMatOut"))
    ));
    material.dispose();
    assert!(matches!(
        params.returned_key_material().unwrap().iv_server(),
        Err(Pkcs11Error::Disposed(_))
    ));
}

#[test]
fn test_transferred_material_can_be_disposed_by_the_caller() {
    with_current_layout!(transferred_material_dispose);
}

fn iv_size_in_bits<L: CkLayout>() {
    let random = Ssl3RandomData::<L>::new(&[1; 32], &[2; 32]).unwrap();
    reset_stats();
    assert!(matches!(
        Ssl3KeyMatParams::new(160, 128, 12, false, &random),
        Err(Pkcs11Error::InvalidParameter(_))
    ));
    assert_eq!(stats().allocations, 0);
}

#[test]
fn test_iv_size_must_be_whole_bytes() {
    with_current_layout!(iv_size_in_bits);
}

fn wtls_key_material<L: CkLayout>() {
    let random = WtlsRandomData::<L>::new(&[3; 32], &[4; 32]).unwrap();
    reset_stats();
    let mut params = WtlsKeyMatParams::new(CKM_SHA_1, 160, 128, 64, 7, false, &random).unwrap();
    let view = params.to_marshalable_structure().unwrap();
    assert_eq!(view.ulSequenceNumber.to_u64(), 7);

    let out_ptr = view.pReturnedKeyMaterial.as_raw();
    let mut out: CK_WTLS_KEY_MAT_OUT<L> = read_value(out_ptr);
    out.hMacSecret = ulong::<L>(21);
    out.hKey = ulong::<L>(22);
    write_value(out_ptr, out);
    write_bytes(out.pIV.as_raw(), &[0x77; 8]);

    let material = params.returned_key_material().unwrap();
    assert_eq!(material.mac_secret().unwrap(), 21);
    assert_eq!(material.key().unwrap(), 22);
    assert_eq!(material.iv().unwrap(), vec![0x77; 8]);

    drop(params);
    assert_eq!(stats().frees, 0);
    drop(material);
    assert_eq!(stats().frees, 2);
}

#[test]
fn test_wtls_key_material() {
    with_current_layout!(wtls_key_material);
}

fn wtls_view_after_caller_dispose<L: CkLayout>() {
    let random = WtlsRandomData::<L>::new(&[3; 32], &[4; 32]).unwrap();
    let mut params = WtlsKeyMatParams::new(CKM_SHA_1, 160, 128, 64, 7, true, &random).unwrap();
    let material = params.returned_key_material().unwrap();
    assert!(params.to_marshalable_structure().is_ok());

    material.dispose();
    assert!(matches!(
        params.to_marshalable_structure(),
        Err(Pkcs11Error::Disposed("WtlsKeyMatOut"))
    ));
    params.dispose();
    assert!(matches!(
        params.to_marshalable_structure(),
        Err(Pkcs11Error::Disposed("WtlsKeyMatParams"))
    ));
}

#[test]
fn test_wtls_view_is_refused_once_the_material_is_disposed() {
    with_current_layout!(wtls_view_after_caller_dispose);
}

fn master_key_versions<L: CkLayout>() {
    let random = Ssl3RandomData::<L>::new(&[1; 48], &[2; 48]).unwrap();

    let mut params = Ssl3MasterKeyDeriveParams::new(&random, false).unwrap();
    assert_eq!(params.version().unwrap(), Some(CK_VERSION::default()));
    let view = params.to_marshalable_structure().unwrap();
    write_value(view.pVersion.as_raw(), CK_VERSION { major: 3, minor: 0 });
    assert_eq!(
        params.version().unwrap(),
        Some(CK_VERSION { major: 3, minor: 0 })
    );
    params.dispose();
    assert!(matches!(params.version(), Err(Pkcs11Error::Disposed(_))));

    let params = Ssl3MasterKeyDeriveParams::new(&random, true).unwrap();
    assert!(params.to_marshalable_structure().unwrap().pVersion.is_null());
    assert_eq!(params.version().unwrap(), None);

    let params = Tls12MasterKeyDeriveParams::new(&random, CKM_SHA256, false).unwrap();
    let view = params.to_marshalable_structure().unwrap();
    assert_eq!(view.prfHashMechanism.to_u64(), CKM_SHA256);
    write_value(view.pVersion.as_raw(), CK_VERSION { major: 3, minor: 3 });
    assert_eq!(
        params.version().unwrap(),
        Some(CK_VERSION { major: 3, minor: 3 })
    );

    let params = Tls12MasterKeyDeriveParams::new(&random, CKM_SHA256, true).unwrap();
    assert_eq!(params.version().unwrap(), None);
}

#[test]
fn test_master_key_versions() {
    with_current_layout!(master_key_versions);
}

fn wtls_master_key_version<L: CkLayout>() {
    let random = WtlsRandomData::<L>::new(&[3; 32], &[4; 32]).unwrap();

    let params = WtlsMasterKeyDeriveParams::new(CKM_SHA_1, &random, false).unwrap();
    assert_eq!(params.version().unwrap(), Some(0));
    let view = params.to_marshalable_structure().unwrap();
    write_bytes(view.pVersion.as_raw(), &[1]);
    assert_eq!(params.version().unwrap(), Some(1));

    let params = WtlsMasterKeyDeriveParams::new(CKM_SHA_1, &random, true).unwrap();
    assert!(params.to_marshalable_structure().unwrap().pVersion.is_null());
    assert_eq!(params.version().unwrap(), None);
}

#[test]
fn test_wtls_master_key_version() {
    with_current_layout!(wtls_master_key_version);
}

fn prf_output<L: CkLayout>() {
    let params = TlsPrfParams::<L>::new(b"seed", b"master secret", 48).unwrap();
    let view = params.to_marshalable_structure().unwrap();
    let capacity: L::Ulong = read_value(view.pulOutputLen.as_raw());
    assert_eq!(capacity.to_u64(), 48);
    assert_eq!(view.ulLabelLen.to_u64(), 13);
    assert_eq!(params.output().unwrap(), vec![0; 48]);

    write_bytes(view.pOutput.as_raw(), &[0x42; 32]);
    write_value(view.pulOutputLen.as_raw(), ulong::<L>(32));
    assert_eq!(params.output().unwrap(), vec![0x42; 32]);
    assert_eq!(params.output().unwrap(), vec![0x42; 32]);

    // never read past the buffer
    write_value(view.pulOutputLen.as_raw(), ulong::<L>(100));
    assert_eq!(params.output().unwrap().len(), 48);

    let mut params = WtlsPrfParams::<L>::new(CKM_SHA_1, b"seed", b"label", 20).unwrap();
    let view = params.to_marshalable_structure().unwrap();
    write_bytes(view.pOutput.as_raw(), &[0x24; 20]);
    assert_eq!(params.output().unwrap(), vec![0x24; 20]);
    params.dispose();
    assert!(matches!(
        params.output(),
        Err(Pkcs11Error::Disposed("WtlsPrfParams"))
    ));
}

#[test]
fn test_prf_output() {
    with_current_layout!(prf_output);
}

fn prf_output_too_large<L: CkLayout>() {
    reset_stats();
    // a 4 bytes CK_ULONG cannot even express the length
    assert!(matches!(
        TlsPrfParams::<L>::new(b"seed", b"label", usize::MAX),
        Err(Pkcs11Error::Allocation(_) | Pkcs11Error::TryFromInt { .. })
    ));
    assert_eq!(stats().live_bytes, 0);
    assert_eq!(stats().allocations, stats().frees);
}

#[test]
fn test_prf_output_too_large_is_rejected() {
    with_current_layout!(prf_output_too_large);
}

fn pbe_init_vector<L: CkLayout>() {
    reset_stats();
    let mut params = PbeParams::<L>::new(b"password", Some(&[1; 8]), 2048).unwrap();
    assert_eq!(stats().allocations, 3);
    assert_eq!(params.init_vector().unwrap(), vec![0; PBE_INIT_VECTOR_LEN]);

    let view = params.to_marshalable_structure().unwrap();
    assert_eq!(view.ulIteration.to_u64(), 2048);
    write_bytes(view.pInitVector.as_raw(), &[0xA5; PBE_INIT_VECTOR_LEN]);
    assert_eq!(params.init_vector().unwrap(), vec![0xA5; PBE_INIT_VECTOR_LEN]);
    assert_eq!(params.init_vector().unwrap(), vec![0xA5; PBE_INIT_VECTOR_LEN]);

    params.dispose();
    assert_eq!(stats().frees, 3);
    assert!(matches!(
        params.init_vector(),
        Err(Pkcs11Error::Disposed("PbeParams"))
    ));
}

#[test]
fn test_pbe_init_vector() {
    with_current_layout!(pbe_init_vector);
}
