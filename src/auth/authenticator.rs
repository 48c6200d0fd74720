//! Authenticator implementation
//!
//! Applies the RapidAPI host and key headers to outgoing requests.

use super::types::Credential;
use crate::error::{Error, Result};
use crate::types::ResourceKind;
use reqwest::RequestBuilder;

/// Header naming the RapidAPI upstream host
pub const HOST_HEADER: &str = "x-rapidapi-host";

/// Header carrying the RapidAPI key
pub const KEY_HEADER: &str = "x-rapidapi-key";

/// Upstream host of the Crunchbase ODM API on RapidAPI
pub const DEFAULT_RAPIDAPI_HOST: &str = "crunchbase-crunchbase-v1.p.rapidapi.com";

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone)]
pub struct Authenticator {
    credential: Credential,
    host: String,
}

impl Authenticator {
    /// Create an authenticator for the default RapidAPI host
    pub fn new(credential: Credential) -> Self {
        Self::with_host(credential, DEFAULT_RAPIDAPI_HOST)
    }

    /// Create an authenticator with a custom `x-rapidapi-host` value
    pub fn with_host(credential: Credential, host: impl Into<String>) -> Self {
        Self {
            credential,
            host: host.into(),
        }
    }

    /// Whether a key is configured
    pub fn is_configured(&self) -> bool {
        self.credential.is_configured()
    }

    /// Fail with [`Error::MissingCredential`] when no key is configured
    pub fn ensure_configured(&self, resource: ResourceKind) -> Result<()> {
        if self.credential.is_configured() {
            Ok(())
        } else {
            Err(Error::MissingCredential { resource })
        }
    }

    /// Apply authentication headers to a request builder
    pub fn apply(&self, req: RequestBuilder, resource: ResourceKind) -> Result<RequestBuilder> {
        self.ensure_configured(resource)?;
        Ok(req
            .header(HOST_HEADER, self.host.as_str())
            .header(KEY_HEADER, self.credential.expose()))
    }
}
