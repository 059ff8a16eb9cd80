use std::{env, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::platform::{Platform, PlatformError};

/// Environment variable overriding the detected Cryptoki layout,
/// e.g. `CKI_PLATFORM=ulong8_packed`
pub const PLATFORM_ENV_VAR: &str = "CKI_PLATFORM";

/// Platform settings, usually embedded in the configuration of the
/// application driving the Cryptoki library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Forces the layout instead of detecting it.
    /// Only needed for vendor libraries built with non-standard headers.
    pub platform: Option<Platform>,
}

impl PlatformConfig {
    /// Read the override from [`PLATFORM_ENV_VAR`]. An unset or empty variable means no override.
    pub fn from_env() -> Result<Self, PlatformError> {
        match env::var(PLATFORM_ENV_VAR) {
            Ok(value) => Self::parse(&value),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(PlatformError::Config(format!("{PLATFORM_ENV_VAR}: {e}"))),
        }
    }

    pub fn parse(value: &str) -> Result<Self, PlatformError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(Self::default());
        }
        let platform = Platform::from_str(value).map_err(|e| {
            PlatformError::Config(format!("{PLATFORM_ENV_VAR}: {e}: {value:?}"))
        })?;
        Ok(Self {
            platform: Some(platform),
        })
    }

    /// Fix the process platform from this configuration and return it.
    pub fn apply(&self) -> Result<Platform, PlatformError> {
        match self.platform {
            Some(platform) => Platform::configure(platform),
            None => Ok(Platform::current()),
        }
    }
}
