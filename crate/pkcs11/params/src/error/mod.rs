use std::num::TryFromIntError;

use cosmian_pkcs11_sys::PlatformError;
use thiserror::Error;

pub(crate) mod result;

#[derive(Error, Debug)]
pub enum Pkcs11Error {
    // A fixed length input (IV, counter block...) has the wrong length
    #[error("Invalid size for {name}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    // Any value rejected before allocation: bit counts, ranges...
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    // Any accessor called on a disposed object
    #[error("{0} has been disposed")]
    Disposed(&'static str),

    #[error("Buffer overflow: {requested} bytes requested on a block of {capacity} bytes")]
    BufferOverflow { capacity: usize, requested: usize },

    // No allocation can hold that many bytes
    #[error("Cannot allocate an unmanaged block of {0} bytes")]
    Allocation(usize),

    // The layout does not match the platform fixed for this process
    #[error(transparent)]
    Platform(#[from] PlatformError),

    // A value does not fit the native CK_ULONG
    #[error("{context} does not fit: {source}")]
    TryFromInt {
        context: String,
        source: TryFromIntError,
    },

    // Unmanaged memory read after it was released
    #[error("Released memory: {0}")]
    Released(String),
}

/// Return early with an error if a condition is not satisfied.
///
/// This macro is equivalent to `if !$cond { return Err(From::from($err)); }`.
#[macro_export]
macro_rules! pkcs11_ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($crate::pkcs11_error!($msg));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return ::core::result::Result::Err($crate::pkcs11_error!($fmt, $($arg)*));
        }
    };
}

/// Construct an invalid parameter error from a string.
#[macro_export]
macro_rules! pkcs11_error {
    ($msg:literal) => {
        $crate::Pkcs11Error::InvalidParameter(::core::format_args!($msg).to_string())
    };
    ($err:expr $(,)?) => ({
        $crate::Pkcs11Error::InvalidParameter($err.to_string())
    });
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Pkcs11Error::InvalidParameter(::core::format_args!($fmt, $($arg)*).to_string())
    };
}

/// Return early with an error.
#[macro_export]
macro_rules! pkcs11_bail {
    ($msg:literal) => {
        return ::core::result::Result::Err($crate::pkcs11_error!($msg))
    };
    ($err:expr $(,)?) => {
        return ::core::result::Result::Err($err)
    };
    ($fmt:expr, $($arg:tt)*) => {
        return ::core::result::Result::Err($crate::pkcs11_error!($fmt, $($arg)*))
    };
}
