// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # odm-fetch
//!
//! Fetches every page of a Crunchbase ODM query (people or organizations)
//! and merges the pages into one table.
//!
//! ## Features
//!
//! - **Page-count discovery**: page 1 is fetched with the query as given and
//!   reports how many pages exist
//! - **Fan-out**: pages 2..N are split into contiguous chunks and fetched by
//!   a bounded set of tokio workers
//! - **Fail-fast**: the first failed page fails the whole fetch; partial
//!   results are never returned
//! - **Column union**: the dataset's columns are every field seen, in
//!   first-seen order, null-filled where a record lacks one
//! - **Arrow Output**: datasets convert to Arrow RecordBatches and Parquet
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use odm_fetch::auth::Credential;
//! use odm_fetch::client::{OdmClient, OrganizationsQuery};
//!
//! #[tokio::main]
//! async fn main() -> odm_fetch::Result<()> {
//!     let client = OdmClient::new(Credential::from_env())?;
//!
//!     let orgs = client
//!         .organizations(
//!             OrganizationsQuery::new()
//!                 .locations("Berlin")
//!                 .organization_types("company")
//!                 .parallel(true)
//!                 .verbose(true),
//!         )
//!         .await?;
//!
//!     println!("{} organizations", orgs.len());
//!     orgs.write_parquet("orgs.parquet", None)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  OdmClient::people / organizations              │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Paginate    │ Partition │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ RapidAPI │ GET       │ First page    │ Chunking  │ Dataset     │
//! │ headers  │ Envelope  │ Single page   │ Workers   │ Arrow       │
//! │          │ decoding  │               │           │ Parquet     │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// RapidAPI credential and headers
pub mod auth;

/// HTTP transport
pub mod http;

/// Response envelope decoding
pub mod decode;

/// First-page and single-page fetching
pub mod pagination;

/// Splitting pages across workers
pub mod partition;

/// Dataset assembly and Arrow/Parquet output
pub mod output;

/// Fan-out fetch engine
pub mod engine;

/// Client settings
pub mod config;

/// Fetch entry points
pub mod client;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::Credential;
pub use client::{OdmClient, OrganizationsQuery, PeopleQuery};
pub use config::ClientSettings;
pub use output::Dataset;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
