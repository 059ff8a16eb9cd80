//! Mechanism parameter objects.
//!
//! Each object validates its inputs, copies every variable length input into
//! its own [`UnmanagedBlock`] and keeps the C structure pointing at them.
//! The structure is handed out by [`MechanismParams::to_marshalable_structure`]
//! until the object is disposed, explicitly or when dropped.

use cosmian_pkcs11_sys::{CMember, CkLayout, NativeUlong, Platform};

use crate::{
    PResult, Pkcs11Error, arena::UnmanagedBlock, error::result::PResultHelper, pkcs11_bail,
};

pub mod aes;
pub mod block_cipher;
pub mod derive;
pub mod ecdh;
pub mod gost;
pub mod mac;
pub mod pbe;
pub mod rsa;
pub mod ssl3;
pub mod tls;
pub mod wtls;
pub mod x9_42;

/// Lifecycle shared by every mechanism parameter object:
/// constructed (and active) until disposed, disposed for good afterwards.
pub trait MechanismParams {
    type Layout: CkLayout;

    /// The C structure read by the Cryptoki library
    type View: CMember;

    const NAME: &'static str;

    /// The structure to marshal. Calling it repeatedly returns the same value
    /// and allocates nothing.
    fn to_marshalable_structure(&self) -> PResult<Self::View>;

    /// Release every block this object allocated. Only the first call does anything.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// Something a parameter object must release when disposed
pub(crate) trait Release {
    fn release(&mut self);

    /// Fail when the structure would point at memory released elsewhere
    fn ensure_usable(&self) -> PResult<()> {
        Ok(())
    }
}

impl Release for UnmanagedBlock {
    fn release(&mut self) {
        self.free();
    }
}

#[derive(Debug, Default)]
pub(crate) struct DisposeState {
    disposed: bool,
}

impl DisposeState {
    pub(crate) fn ensure_active(&self, name: &'static str) -> PResult<()> {
        if self.disposed {
            return Err(Pkcs11Error::Disposed(name));
        }
        Ok(())
    }

    /// Flip to disposed; `true` only for the call that did it
    pub(crate) fn begin_dispose(&mut self) -> bool {
        !std::mem::replace(&mut self.disposed, true)
    }

    pub(crate) const fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Implement [`MechanismParams`] and the drop safety net for a parameter
/// object holding its structure in `params`, its state in `state` and the
/// listed releasable members.
macro_rules! mechanism_params {
    ($ty:ident $(<$lt:lifetime>)?, $view:ty, [$($owned:ident),* $(,)?]) => {
        impl<$($lt,)? L: ::cosmian_pkcs11_sys::CkLayout> $crate::params::MechanismParams for $ty<$($lt,)? L> {
            type Layout = L;
            type View = $view;

            const NAME: &'static str = stringify!($ty);

            fn to_marshalable_structure(&self) -> $crate::PResult<Self::View> {
                self.state.ensure_active(Self::NAME)?;
                $( $crate::params::Release::ensure_usable(&self.$owned)?; )*
                Ok(self.params)
            }

            fn dispose(&mut self) {
                if self.state.begin_dispose() {
                    $( $crate::params::Release::release(&mut self.$owned); )*
                    ::tracing::trace!("{} disposed", Self::NAME);
                }
            }

            fn is_disposed(&self) -> bool {
                self.state.is_disposed()
            }
        }

        impl<$($lt,)? L: ::cosmian_pkcs11_sys::CkLayout> Drop for $ty<$($lt,)? L> {
            fn drop(&mut self) {
                if !self.state.is_disposed() {
                    ::tracing::debug!(
                        "{} released on drop",
                        <Self as $crate::params::MechanismParams>::NAME
                    );
                    $crate::params::MechanismParams::dispose(self);
                }
            }
        }
    };
}
pub(crate) use mechanism_params;

/// Parameters of the `CKM_*_CBC_ENCRYPT_DATA` derivations: a fixed length IV
/// and the data to encrypt.
macro_rules! cbc_encrypt_data_params {
    ($(#[$meta:meta])* $name:ident, $view:ident, $iv_len:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<L: ::cosmian_pkcs11_sys::CkLayout> {
            params: $view<L>,
            data: $crate::arena::UnmanagedBlock,
            state: $crate::params::DisposeState,
        }

        impl<L: ::cosmian_pkcs11_sys::CkLayout> $name<L> {
            pub fn new(iv: &[u8], data: Option<&[u8]>) -> $crate::PResult<Self> {
                $crate::params::ensure_layout::<L>()?;
                let iv = $crate::params::fixed_bytes::<{ $iv_len }>("iv", iv)?;
                let length = $crate::params::optional_len::<L>("data", data)?;
                let data = $crate::arena::UnmanagedBlock::from_optional(data)?;
                Ok(Self {
                    params: $view {
                        iv,
                        pData: data.ptr(),
                        length,
                    },
                    data,
                    state: $crate::params::DisposeState::default(),
                })
            }
        }

        $crate::params::mechanism_params!($name, $view<L>, [data]);
    };
}
pub(crate) use cbc_encrypt_data_params;

/// Parameters of the counter modes: the size of the counter and the initial
/// counter block.
macro_rules! ctr_params {
    ($(#[$meta:meta])* $name:ident, $view:ident, $block_len:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<L: ::cosmian_pkcs11_sys::CkLayout> {
            params: $view<L>,
            state: $crate::params::DisposeState,
        }

        impl<L: ::cosmian_pkcs11_sys::CkLayout> $name<L> {
            /// `counter_bits` low order bits of `cb` are incremented, at least
            /// one and at most the whole block.
            pub fn new(counter_bits: u64, cb: &[u8]) -> $crate::PResult<Self> {
                $crate::params::ensure_layout::<L>()?;
                let cb = $crate::params::fixed_bytes::<{ $block_len }>("counter block", cb)?;
                $crate::pkcs11_ensure!(
                    counter_bits > 0 && counter_bits <= 8 * $block_len as u64,
                    "counter bits must be between 1 and {}, got {}",
                    8 * $block_len,
                    counter_bits
                );
                Ok(Self {
                    params: $view {
                        ulCounterBits: $crate::params::ulong::<L>("counter bits", counter_bits)?,
                        cb,
                    },
                    state: $crate::params::DisposeState::default(),
                })
            }
        }

        $crate::params::mechanism_params!($name, $view<L>, []);
    };
}
pub(crate) use ctr_params;

/// Reject layouts other than the one fixed for this process
pub(crate) fn ensure_layout<L: CkLayout>() -> PResult<()> {
    Ok(Platform::ensure(L::PLATFORM)?)
}

/// Convert a value to the native `CK_ULONG`
pub(crate) fn ulong<L: CkLayout>(name: &str, value: u64) -> PResult<L::Ulong> {
    L::Ulong::try_from_u64(value).context(name)
}

/// Convert a length to the native `CK_ULONG`
pub(crate) fn ulong_len<L: CkLayout>(name: &str, len: usize) -> PResult<L::Ulong> {
    L::Ulong::try_from_usize(len).context(name)
}

/// Length of an optional input, zero when absent
pub(crate) fn optional_len<L: CkLayout>(name: &str, bytes: Option<&[u8]>) -> PResult<L::Ulong> {
    ulong_len::<L>(name, bytes.map_or(0, <[u8]>::len))
}

/// Copy a fixed length input, rejecting any other length
pub(crate) fn fixed_bytes<const N: usize>(name: &'static str, bytes: &[u8]) -> PResult<[u8; N]> {
    <[u8; N]>::try_from(bytes).map_err(|_| Pkcs11Error::SizeMismatch {
        name,
        expected: N,
        actual: bytes.len(),
    })
}

/// Check that a variable length input has the length a structure member requires
pub(crate) fn ensure_len(name: &'static str, bytes: &[u8], expected: usize) -> PResult<()> {
    if bytes.len() != expected {
        return Err(Pkcs11Error::SizeMismatch {
            name,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

/// Number of bytes of a size given in bits, which must be a multiple of 8
pub(crate) fn bits_to_bytes(name: &str, bits: u64) -> PResult<usize> {
    if bits % 8 != 0 {
        pkcs11_bail!("{name} must be a multiple of 8, got {bits}");
    }
    usize::try_from(bits / 8).context(name)
}

pub(crate) const fn ck_bool(value: bool) -> u8 {
    if value {
        cosmian_pkcs11_sys::consts::CK_TRUE
    } else {
        cosmian_pkcs11_sys::consts::CK_FALSE
    }
}
