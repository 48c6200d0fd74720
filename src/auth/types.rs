//! Credential type

use std::fmt;

/// Environment variable the CLI and [`Credential::from_env`] read
pub const CREDENTIAL_ENV: &str = "RAPIDAPI_KEY";

/// RapidAPI access key
///
/// Immutable once built. `Debug` never prints the key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    key: String,
}

impl Credential {
    /// Wrap a key
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Read the key from `RAPIDAPI_KEY`, empty when unset
    pub fn from_env() -> Self {
        Self::new(std::env::var(CREDENTIAL_ENV).unwrap_or_default())
    }

    /// Whether a usable key is present
    pub fn is_configured(&self) -> bool {
        !self.key.trim().is_empty()
    }

    /// The raw key
    pub fn expose(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.is_configured() { "***" } else { "<unset>" };
        f.debug_tuple("Credential").field(&shown).finish()
    }
}

impl From<&str> for Credential {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for Credential {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}
