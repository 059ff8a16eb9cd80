use std::num::TryFromIntError;

use crate::error::Pkcs11Error;

pub type PResult<R> = Result<R, Pkcs11Error>;

/// Name the value or the block a failure is about
pub trait PResultHelper<T> {
    fn context(self, context: &str) -> PResult<T>;
}

/// A value that does not fit the native `CK_ULONG` (or `usize`)
impl<T> PResultHelper<T> for Result<T, TryFromIntError> {
    fn context(self, context: &str) -> PResult<T> {
        self.map_err(|source| Pkcs11Error::TryFromInt {
            context: context.to_owned(),
            source,
        })
    }
}

/// A block that has already been released
impl<T> PResultHelper<T> for Option<T> {
    fn context(self, context: &str) -> PResult<T> {
        self.ok_or_else(|| Pkcs11Error::Released(context.to_owned()))
    }
}
