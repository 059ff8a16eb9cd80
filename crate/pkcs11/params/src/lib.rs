//! Copyright 2024 Cosmian Tech SAS
//!
//! Cryptoki mechanism parameters backed by unmanaged memory.
//!
//! A parameter object copies its inputs into [`arena::UnmanagedBlock`]s and
//! exposes a C structure, in the layout of the current platform, that points
//! at them. The structure stays valid until the object is disposed.
//!
//! ```ignore
//! use cosmian_pkcs11_params::{MechanismParams, params::aes::GcmParams};
//! use cosmian_pkcs11_sys::NativeLayout;
//!
//! let params = GcmParams::<NativeLayout>::new(&iv, Some(&aad), 128)?;
//! let view = params.to_marshalable_structure()?;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

pub use cosmian_pkcs11_sys as sys;
pub use error::{
    Pkcs11Error,
    result::{PResult, PResultHelper},
};
pub use mechanism::Mechanism;
pub use output::{KeyMaterialOutput, Ssl3KeyMatOut, Ssl3KeyMaterial, WtlsKeyMatOut, WtlsKeyMaterial};
pub use params::MechanismParams;

pub mod arena;
mod error;
mod mechanism;
mod output;
pub mod params;

#[cfg(test)]
mod tests;
