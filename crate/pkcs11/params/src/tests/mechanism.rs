use cosmian_pkcs11_sys::{
    CK_GCM_PARAMS, CK_RSA_PKCS_PSS_PARAMS, CStruct, CkLayout, NativePtr, NativeUlong,
    consts::{
        CK_MECHANISM_TYPE, CKG_MGF1_SHA256, CKM_AES_GCM, CKM_KEA_KEY_DERIVE,
        CKM_KEY_WRAP_SET_OAEP, CKM_RC2_ECB, CKM_RSA_PKCS, CKM_RSA_PKCS_PSS, CKM_SHA256,
        CKM_SSL3_KEY_AND_MAC_DERIVE,
    },
    padding_offsets,
};

use crate::{
    Mechanism, MechanismParams, Pkcs11Error,
    arena::{reset_stats, stats},
    params::{
        aes::GcmParams,
        block_cipher::Rc2Params,
        derive::KeaDeriveParams,
        rsa::{KeyWrapSetOaepParams, RsaPkcsPssParams},
        ssl3::{Ssl3KeyMatParams, Ssl3RandomData},
    },
    tests::{read_value, with_current_layout},
};

fn gcm_mechanism<L: CkLayout>() {
    let params = GcmParams::<L>::new(&[3; 12], Some(b"aad"), 128).unwrap();
    let mechanism = Mechanism::new(CKM_AES_GCM, &params).unwrap();
    let view = mechanism.as_view();

    assert_eq!(view.mechanism.to_u64(), CKM_AES_GCM);
    assert_eq!(
        view.ulParameterLen.to_u64(),
        size_of::<CK_GCM_PARAMS<L>>() as u64
    );
    let copied: CK_GCM_PARAMS<L> = read_value(view.pParameter.as_raw());
    assert_eq!(copied, params.to_marshalable_structure().unwrap());
    assert_eq!(
        mechanism.parameter().unwrap().len(),
        size_of::<CK_GCM_PARAMS<L>>()
    );
    assert_eq!(
        mechanism.as_ptr().cast::<u8>(),
        std::ptr::from_ref(view).cast::<u8>()
    );
}

#[test]
fn test_mechanism_carries_a_copy_of_the_parameters() {
    with_current_layout!(gcm_mechanism);
}

fn pss_mechanism<L: CkLayout>() {
    let params = RsaPkcsPssParams::<L>::new(CKM_SHA256, CKG_MGF1_SHA256, 32).unwrap();
    let mechanism = Mechanism::new(CKM_RSA_PKCS_PSS, &params).unwrap();
    let copied: CK_RSA_PKCS_PSS_PARAMS<L> = read_value(mechanism.as_view().pParameter.as_raw());
    assert_eq!(copied.sLen.to_u64(), 32);
    assert_eq!(copied.mgf.to_u64(), CKG_MGF1_SHA256);
}

#[test]
fn test_pss_mechanism() {
    with_current_layout!(pss_mechanism);
}

fn scalar_parameter<L: CkLayout>() {
    let params = Rc2Params::<L>::new(128).unwrap();
    let mechanism = Mechanism::new(CKM_RC2_ECB, &params).unwrap();
    let view = mechanism.as_view();
    assert_eq!(view.ulParameterLen.to_u64(), L::Ulong::SIZE as u64);
    let effective_bits: L::Ulong = read_value(view.pParameter.as_raw());
    assert_eq!(effective_bits.to_u64(), 128);
}

#[test]
fn test_scalar_parameter() {
    with_current_layout!(scalar_parameter);
}

fn no_parameter<L: CkLayout>() {
    reset_stats();
    let mechanism = Mechanism::<L>::without_parameter(CKM_RSA_PKCS).unwrap();
    let view = mechanism.as_view();
    assert_eq!(view.mechanism.to_u64(), CKM_RSA_PKCS);
    assert!(view.pParameter.is_null());
    assert_eq!(view.ulParameterLen.to_u64(), 0);
    assert!(mechanism.parameter().unwrap().is_empty());
    assert_eq!(stats().allocations, 0);
}

#[test]
fn test_mechanism_without_parameter() {
    with_current_layout!(no_parameter);
}

fn disposed_parameters<L: CkLayout>() {
    let mut params = GcmParams::<L>::new(&[3; 12], None, 128).unwrap();
    params.dispose();
    assert!(matches!(
        Mechanism::new(CKM_AES_GCM, &params),
        Err(Pkcs11Error::Disposed("GcmParams"))
    ));
}

#[test]
fn test_mechanism_rejects_disposed_parameters() {
    with_current_layout!(disposed_parameters);
}

fn assert_zero_padding<P>(mechanism_type: CK_MECHANISM_TYPE, params: &P)
where
    P: MechanismParams,
    P::View: CStruct,
{
    let mechanism = Mechanism::new(mechanism_type, params).unwrap();
    let bytes = mechanism.parameter().unwrap();
    assert_eq!(bytes.len(), size_of::<P::View>());
    let padding = padding_offsets(P::View::FIELDS, <P::Layout as CkLayout>::PLATFORM);
    for offset in padding {
        assert_eq!(bytes[offset], 0, "padding byte {offset} of {}", P::NAME);
    }
}

fn padded_parameters<L: CkLayout>() {
    let oaep = KeyWrapSetOaepParams::<L>::new(0xFF, Some(&[0xAB; 16])).unwrap();
    assert_zero_padding(CKM_KEY_WRAP_SET_OAEP, &oaep);
    let bytes = Mechanism::new(CKM_KEY_WRAP_SET_OAEP, &oaep)
        .unwrap()
        .parameter()
        .unwrap();
    assert_eq!(bytes[0], 0xFF);

    let kea = KeaDeriveParams::<L>::new(true, &[1; 20], &[2; 20], &[3; 128]).unwrap();
    assert_zero_padding(CKM_KEA_KEY_DERIVE, &kea);

    let random = Ssl3RandomData::<L>::new(&[1; 32], &[2; 32]).unwrap();
    let key_mat = Ssl3KeyMatParams::new(160, 128, 128, true, &random).unwrap();
    assert_zero_padding(CKM_SSL3_KEY_AND_MAC_DERIVE, &key_mat);
}

#[test]
fn test_parameter_padding_is_zeroed() {
    with_current_layout!(padded_parameters);
}
