//! Authentication module
//!
//! The ODM endpoints authenticate with a RapidAPI key sent as a header on
//! every request. The key is held by a [`Credential`] that is handed to the
//! client once at construction and shared read-only by every worker.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, DEFAULT_RAPIDAPI_HOST, HOST_HEADER, KEY_HEADER};
pub use types::{Credential, CREDENTIAL_ENV};

#[cfg(test)]
mod tests;
