//! Client settings
//!
//! Settings can come from a YAML file, from the environment, or both; the
//! environment wins. Example file:
//!
//! ```yaml
//! api_key: "..."
//! base_url: https://crunchbase-crunchbase-v1.p.rapidapi.com
//! timeout_seconds: 60
//! parallel: true
//! workers: 4
//! headers:
//!   accept: application/json
//! ```

use crate::auth::{Credential, CREDENTIAL_ENV, DEFAULT_RAPIDAPI_HOST};
use crate::engine::FetchConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Overrides the API base URL
pub const BASE_URL_ENV: &str = "ODM_BASE_URL";

/// Overrides the worker limit used when fetching in parallel
pub const WORKERS_ENV: &str = "ODM_WORKERS";

/// Overrides the request timeout, in seconds
pub const TIMEOUT_ENV: &str = "ODM_TIMEOUT_SECS";

/// Settings for an [`OdmClient`](crate::client::OdmClient)
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// RapidAPI key
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL for API requests
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `x-rapidapi-host` header
    #[serde(default = "default_rapidapi_host")]
    pub rapidapi_host: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Fetch pages 2..N in parallel unless a query says otherwise
    #[serde(default)]
    pub parallel: bool,

    /// Report page progress unless a query says otherwise
    #[serde(default)]
    pub verbose: bool,

    /// Worker limit for parallel fetches (default: available parallelism)
    #[serde(default)]
    pub workers: Option<usize>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_rapidapi_host() -> String {
    DEFAULT_RAPIDAPI_HOST.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            rapidapi_host: default_rapidapi_host(),
            timeout_seconds: default_timeout(),
            parallel: false,
            verbose: false,
            workers: None,
            headers: HashMap::new(),
        }
    }
}

impl ClientSettings {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Load settings from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read settings file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse settings from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Overlay the process environment
    pub fn with_env(self) -> Result<Self> {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    /// Overlay variables resolved by `lookup`
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = var(CREDENTIAL_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = var(BASE_URL_ENV) {
            self.base_url = url;
        }
        if let Some(workers) = var(WORKERS_ENV) {
            self.workers = Some(parse_env(WORKERS_ENV, &workers)?);
        }
        if let Some(timeout) = var(TIMEOUT_ENV) {
            self.timeout_seconds = parse_env(TIMEOUT_ENV, &timeout)?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check values that would otherwise fail later
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("Invalid base_url '{}': {e}", self.base_url)))?;

        if self.timeout_seconds == 0 {
            return Err(Error::config("timeout_seconds must be at least 1"));
        }
        if self.workers == Some(0) {
            return Err(Error::config("workers must be at least 1"));
        }
        Ok(())
    }

    /// Credential for requests; unset when no key is configured
    pub fn credential(&self) -> Credential {
        Credential::new(self.api_key.clone().unwrap_or_default())
    }

    /// HTTP client configuration
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .rapidapi_host(&self.rapidapi_host)
            .timeout(Duration::from_secs(self.timeout_seconds));
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }
        builder.build()
    }

    /// Fetch defaults applied to every query
    pub fn fetch_config(&self) -> FetchConfig {
        let config = FetchConfig::new()
            .with_parallel(self.parallel)
            .with_verbose(self.verbose);
        match self.workers {
            Some(workers) => config.with_workers(workers),
            None => config,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::config(format!("Invalid {name} '{value}': {e}")))
}

impl std::fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("rapidapi_host", &self.rapidapi_host)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("parallel", &self.parallel)
            .field("verbose", &self.verbose)
            .field("workers", &self.workers)
            .field("headers", &self.headers)
            .finish()
    }
}
