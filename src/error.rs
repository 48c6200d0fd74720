//! Error types for odm-fetch
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use crate::types::ResourceKind;
use thiserror::Error;

/// The main error type for odm-fetch
#[allow(missing_docs)]
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("No API credential configured; set one before fetching {resource}")]
    MissingCredential { resource: ResourceKind },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request for {resource} page {page} failed: {source}")]
    Http {
        resource: ResourceKind,
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {resource} page {page}: {body}")]
    HttpStatus {
        resource: ResourceKind,
        page: u32,
        status: u16,
        body: String,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Parse Errors
    // ============================================================================
    #[error("Malformed response{}: {message}", origin(.resource, .page))]
    Parse {
        resource: Option<ResourceKind>,
        page: Option<u32>,
        message: String,
    },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Worker Errors
    // ============================================================================
    #[error("Fetch worker did not complete: {0}")]
    Worker(#[source] tokio::task::JoinError),

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing credential or invalid settings
    Configuration,
    /// Network failure or non-success HTTP status
    Transport,
    /// Response body did not match the envelope shape
    Parse,
    /// Local output, export or worker bookkeeping failure
    Output,
}

fn origin(resource: &Option<ResourceKind>, page: &Option<u32>) -> String {
    match (resource, page) {
        (Some(resource), Some(page)) => format!(" for {resource} page {page}"),
        (Some(resource), None) => format!(" for {resource}"),
        (None, Some(page)) => format!(" for page {page}"),
        (None, None) => String::new(),
    }
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a parse error with no origin attached yet
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            resource: None,
            page: None,
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(
        resource: ResourceKind,
        page: u32,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self::HttpStatus {
            resource,
            page,
            status,
            body: body.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Attach the originating resource and page to a parse error.
    ///
    /// Other variants either already carry their origin or have none.
    #[must_use]
    pub fn at(self, resource: ResourceKind, page: u32) -> Self {
        match self {
            Self::Parse { message, .. } => Self::Parse {
                resource: Some(resource),
                page: Some(page),
                message,
            },
            Self::JsonParse(e) => Self::Parse {
                resource: Some(resource),
                page: Some(page),
                message: e.to_string(),
            },
            other => other,
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. } | Error::MissingCredential { .. } | Error::YamlParse(_) => {
                ErrorKind::Configuration
            }
            Error::Http { .. } | Error::HttpStatus { .. } | Error::InvalidUrl(_) => {
                ErrorKind::Transport
            }
            Error::Parse { .. } | Error::JsonParse(_) => ErrorKind::Parse,
            Error::Worker(_)
            | Error::Arrow(_)
            | Error::Parquet(_)
            | Error::Output { .. }
            | Error::Io(_) => ErrorKind::Output,
        }
    }

    /// Page that produced this error, when known
    pub fn page(&self) -> Option<u32> {
        match self {
            Error::Http { page, .. } | Error::HttpStatus { page, .. } => Some(*page),
            Error::Parse { page, .. } => *page,
            _ => None,
        }
    }

    /// Resource kind that produced this error, when known
    pub fn resource(&self) -> Option<ResourceKind> {
        match self {
            Error::MissingCredential { resource }
            | Error::Http { resource, .. }
            | Error::HttpStatus { resource, .. } => Some(*resource),
            Error::Parse { resource, .. } => *resource,
            _ => None,
        }
    }
}

/// Result type alias for odm-fetch
pub type Result<T> = std::result::Result<T, Error>;
