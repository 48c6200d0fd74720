//! HTTP client for the ODM endpoints
//!
//! Provides a thin HTTP client that handles:
//! - Endpoint URL construction per resource kind
//! - Authentication headers
//! - Status classification into typed errors
//! - Envelope decoding

use super::transport::{page_of, Transport};
use crate::auth::{Authenticator, Credential};
use crate::decode::{EnvelopeDecoder, ResponseEnvelope};
use crate::error::{Error, Result};
use crate::types::{Query, ResourceKind};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Base URL of the Crunchbase ODM API on RapidAPI
pub const DEFAULT_BASE_URL: &str = "https://crunchbase-crunchbase-v1.p.rapidapi.com";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Value of the `x-rapidapi-host` header
    pub rapidapi_host: String,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            rapidapi_host: crate::auth::DEFAULT_RAPIDAPI_HOST.to_string(),
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("odm-fetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the `x-rapidapi-host` header value
    pub fn rapidapi_host(mut self, host: impl Into<String>) -> Self {
        self.config.rapidapi_host = host.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: Query,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// Create a request config carrying a query
    pub fn with_query(query: Query) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.set(key, value);
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client for the ODM endpoints
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
    decoder: EnvelopeDecoder,
}

impl HttpClient {
    /// Create a client against the default endpoint
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_config(HttpClientConfig::default(), credential)
    }

    /// Create a client with custom configuration
    pub fn with_config(config: HttpClientConfig, credential: Credential) -> Result<Self> {
        Url::parse(&config.base_url)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        let authenticator = Authenticator::with_host(credential, config.rapidapi_host.clone());

        Ok(Self {
            client,
            config,
            authenticator,
            decoder: EnvelopeDecoder::new(),
        })
    }

    /// Replace the envelope decoder
    #[must_use]
    pub fn with_decoder(mut self, decoder: EnvelopeDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Endpoint URL for a resource kind
    pub fn endpoint(&self, resource: ResourceKind) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{}", resource.path()))?)
    }

    /// Issue a GET for a resource kind
    ///
    /// Non-success statuses become [`Error::HttpStatus`]; network failures
    /// become [`Error::Http`]. Nothing is retried.
    pub async fn get(&self, resource: ResourceKind, config: RequestConfig) -> Result<Response> {
        let page = page_of(&config.query);
        let url = self.endpoint(resource)?;

        let mut req = self.client.get(url.clone());

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !config.query.is_empty() {
            let params: Vec<(&str, &str)> = config.query.iter().collect();
            req = req.query(&params);
        }

        if let Some(timeout) = config.timeout {
            req = req.timeout(timeout);
        }

        req = self.authenticator.apply(req, resource)?;

        debug!("GET {url} ({resource} page {page})");
        let response = req.send().await.map_err(|source| Error::Http {
            resource,
            page,
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(resource, page, status.as_u16(), body));
        }

        Ok(response)
    }

    /// Fetch and decode one page
    pub async fn get_envelope(
        &self,
        resource: ResourceKind,
        query: &Query,
    ) -> Result<ResponseEnvelope> {
        let page = page_of(query);
        let response = self
            .get(resource, RequestConfig::with_query(query.clone()))
            .await?;

        let body = response.text().await.map_err(|source| Error::Http {
            resource,
            page,
            source,
        })?;

        let envelope = self
            .decoder
            .decode(&body)
            .map_err(|e| e.at(resource, page))?;

        debug!(
            "Decoded {resource} page {}/{} with {} items",
            envelope.current_page(),
            envelope.number_of_pages(),
            envelope.items.len()
        );
        Ok(envelope)
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn fetch(&self, resource: ResourceKind, query: &Query) -> Result<ResponseEnvelope> {
        self.get_envelope(resource, query).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_credential", &self.authenticator.is_configured())
            .finish_non_exhaustive()
    }
}
