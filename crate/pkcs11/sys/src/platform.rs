use std::{os::raw::c_ulong, sync::OnceLock};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::PlatformConfig;

/// The platform resolved for this process. Set at most once.
static RESOLVED: OnceLock<Platform> = OnceLock::new();

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error(
        "the Cryptoki layout is already fixed to {resolved} for this process, it cannot be used \
         as {requested}"
    )]
    Mismatch {
        resolved: Platform,
        requested: Platform,
    },

    #[error("Invalid platform configuration: {0}")]
    Config(String),
}

/// Structure packing convention of the native library headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Packing {
    /// Natural alignment of every member (the compiler default)
    Default,
    /// `#pragma pack(1)`: no padding at all
    Explicit,
}

/// One of the four binary layouts a Cryptoki library may have been compiled with.
///
/// Pointers always keep the width of the running process; only the width of
/// `CK_ULONG` (and therefore of every handle) and the packing vary.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    Display,
    AsRefStr,
)]
pub enum Platform {
    /// 4 bytes `CK_ULONG`, packed structures (Windows)
    #[strum(serialize = "ulong4_packed")]
    #[serde(rename = "ulong4_packed")]
    Ulong4Packed,
    /// 4 bytes `CK_ULONG`, naturally aligned structures (32-bit Unix)
    #[strum(serialize = "ulong4_natural")]
    #[serde(rename = "ulong4_natural")]
    Ulong4Natural,
    /// 8 bytes `CK_ULONG`, packed structures
    #[strum(serialize = "ulong8_packed")]
    #[serde(rename = "ulong8_packed")]
    Ulong8Packed,
    /// 8 bytes `CK_ULONG`, naturally aligned structures (64-bit Unix)
    #[strum(serialize = "ulong8_natural")]
    #[serde(rename = "ulong8_natural")]
    Ulong8Natural,
}

impl Platform {
    #[must_use]
    pub const fn from_parts(ulong_size: usize, packing: Packing) -> Option<Self> {
        match (ulong_size, packing) {
            (4, Packing::Explicit) => Some(Self::Ulong4Packed),
            (4, Packing::Default) => Some(Self::Ulong4Natural),
            (8, Packing::Explicit) => Some(Self::Ulong8Packed),
            (8, Packing::Default) => Some(Self::Ulong8Natural),
            _ => None,
        }
    }

    /// Size in bytes of `CK_ULONG` and of every native handle
    #[must_use]
    pub const fn ulong_size(self) -> usize {
        match self {
            Self::Ulong4Packed | Self::Ulong4Natural => 4,
            Self::Ulong8Packed | Self::Ulong8Natural => 8,
        }
    }

    #[must_use]
    pub const fn packing(self) -> Packing {
        match self {
            Self::Ulong4Packed | Self::Ulong8Packed => Packing::Explicit,
            Self::Ulong4Natural | Self::Ulong8Natural => Packing::Default,
        }
    }

    /// Inspect the running environment.
    ///
    /// Windows Cryptoki headers use `unsigned long` (always 4 bytes there) and
    /// `#pragma pack(1)`; Unix headers use `unsigned long` with natural alignment.
    #[must_use]
    pub fn detect() -> Self {
        let packing = if cfg!(windows) {
            Packing::Explicit
        } else {
            Packing::Default
        };
        match Self::from_parts(size_of::<c_ulong>(), packing) {
            Some(platform) => platform,
            // c_ulong is either 4 or 8 bytes on every supported target
            None => Self::Ulong8Natural,
        }
    }

    /// The platform fixed for this process.
    ///
    /// The first call resolves it: an override found in the environment
    /// (see [`PlatformConfig::from_env`]) wins over detection. The value never
    /// changes afterwards.
    pub fn current() -> Self {
        *RESOLVED.get_or_init(|| {
            let configured = match PlatformConfig::from_env() {
                Ok(config) => config.platform,
                Err(e) => {
                    warn!("ignoring the Cryptoki platform override: {e}");
                    None
                }
            };
            let platform = configured.unwrap_or_else(Self::detect);
            debug!(
                "Cryptoki layout resolved to {platform}: CK_ULONG is {} bytes, {} packing{}",
                platform.ulong_size(),
                platform.packing(),
                if configured.is_some() {
                    " (configured)"
                } else {
                    ""
                }
            );
            platform
        })
    }

    /// Fix the platform explicitly, before anything else resolves it.
    ///
    /// Configuring the platform that is already in effect is accepted; any
    /// other value is a configuration consistency failure.
    pub fn configure(platform: Self) -> Result<Self, PlatformError> {
        let resolved = *RESOLVED.get_or_init(|| {
            debug!("Cryptoki layout configured to {platform}");
            platform
        });
        if resolved == platform {
            Ok(resolved)
        } else {
            Err(PlatformError::Mismatch {
                resolved,
                requested: platform,
            })
        }
    }

    /// Check that structures laid out for `requested` may be handed to the
    /// native library of this process.
    pub fn ensure(requested: Self) -> Result<(), PlatformError> {
        let resolved = Self::current();
        if resolved == requested {
            Ok(())
        } else {
            Err(PlatformError::Mismatch {
                resolved,
                requested,
            })
        }
    }
}
