//! Fetch entry points
//!
//! [`OdmClient`] is built once with a credential and reused for any number
//! of fetches. Each fetch takes a typed query; recognised filters are
//! passed to the provider verbatim and never validated here.
//!
//! ```rust,ignore
//! use odm_fetch::client::{OdmClient, PeopleQuery};
//! use odm_fetch::auth::Credential;
//!
//! let client = OdmClient::new(Credential::from_env())?;
//! let people = client
//!     .people(PeopleQuery::new().name("Ada").locations("London").parallel(true))
//!     .await?;
//! println!("{} rows, columns {:?}", people.len(), people.columns());
//! ```

use crate::auth::Credential;
use crate::config::ClientSettings;
use crate::engine::{FetchConfig, FetchEngine, FetchStats, Progress};
use crate::error::Result;
use crate::http::{HttpClient, Transport};
use crate::output::Dataset;
use crate::pagination::PageFetcher;
use crate::types::{Query, ResourceKind};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Per-query overrides of the client's fetch defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Fetch pages 2..N with multiple workers
    pub parallel: Option<bool>,
    /// Report page progress
    pub verbose: Option<bool>,
    /// Worker limit
    pub workers: Option<usize>,
}

impl FetchOptions {
    /// Overlay these options on `defaults`
    pub fn resolve(&self, defaults: &FetchConfig) -> FetchConfig {
        let mut config = defaults
            .clone()
            .with_parallel(self.parallel.unwrap_or(defaults.parallel))
            .with_verbose(self.verbose.unwrap_or(defaults.verbose));
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        config
    }
}

/// Builder methods shared by every query type
macro_rules! query_builder {
    ($query:ident) => {
        impl $query {
            /// Full-text query on name only
            #[must_use]
            pub fn name(self, name: impl Into<String>) -> Self {
                self.param("name", name.into())
            }

            /// Location names, comma separated and AND'd together
            #[must_use]
            pub fn locations(self, locations: impl Into<String>) -> Self {
                self.param("locations", locations.into())
            }

            /// Only records updated at or after this unix timestamp
            #[must_use]
            pub fn updated_since(self, timestamp: i64) -> Self {
                self.param("updated_since", timestamp)
            }

            /// Only records updated at or after this instant
            #[must_use]
            pub fn updated_since_datetime(self, since: DateTime<Utc>) -> Self {
                self.updated_since(since.timestamp())
            }

            /// Pass any other parameter through unchanged
            #[must_use]
            pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
                self.params.set(key, value);
                self
            }

            /// Fetch pages 2..N with multiple workers
            #[must_use]
            pub fn parallel(mut self, parallel: bool) -> Self {
                self.options.parallel = Some(parallel);
                self
            }

            /// Report page progress
            #[must_use]
            pub fn verbose(mut self, verbose: bool) -> Self {
                self.options.verbose = Some(verbose);
                self
            }

            /// Cap the number of workers
            #[must_use]
            pub fn workers(mut self, workers: usize) -> Self {
                self.options.workers = Some(workers);
                self
            }

            /// Query parameters sent for page 1
            pub fn query(&self) -> &Query {
                &self.params
            }

            /// Fetch overrides
            pub fn options(&self) -> FetchOptions {
                self.options
            }
        }
    };
}

// ============================================================================
// People
// ============================================================================

/// Filters for `/odm-people`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeopleQuery {
    params: Query,
    options: FetchOptions,
}

query_builder!(PeopleQuery);

impl PeopleQuery {
    /// Empty query (every person)
    pub fn new() -> Self {
        Self::default()
    }

    /// Social media identities, comma separated and AND'd together
    #[must_use]
    pub fn socials(self, socials: impl Into<String>) -> Self {
        self.param("socials", socials.into())
    }

    /// Person types, comma separated (e.g. `investor,executive`)
    #[must_use]
    pub fn types(self, types: impl Into<String>) -> Self {
        self.param("types", types.into())
    }
}

// ============================================================================
// Organizations
// ============================================================================

/// Filters for `/odm-organizations`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationsQuery {
    params: Query,
    options: FetchOptions,
}

query_builder!(OrganizationsQuery);

impl OrganizationsQuery {
    /// Empty query (every organization)
    pub fn new() -> Self {
        Self::default()
    }

    /// Text search of domain name only
    #[must_use]
    pub fn domain_name(self, domain: impl Into<String>) -> Self {
        self.param("domain_name", domain.into())
    }

    /// Organization types, comma separated (e.g. `company,investor`)
    #[must_use]
    pub fn organization_types(self, types: impl Into<String>) -> Self {
        self.param("organization_types", types.into())
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for the ODM people and organizations endpoints
///
/// Cheap to clone; clones share the transport.
#[derive(Debug, Clone)]
pub struct OdmClient {
    fetcher: PageFetcher,
    defaults: FetchConfig,
    progress: Progress,
}

impl OdmClient {
    /// Client against the default endpoint
    pub fn new(credential: Credential) -> Result<Self> {
        Ok(Self::with_transport(HttpClient::new(credential)?))
    }

    /// Client built from settings
    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let http = HttpClient::with_config(settings.http_config(), settings.credential())?;
        Ok(Self::with_transport(http).with_defaults(settings.fetch_config()))
    }

    /// Client over any transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self::with_shared_transport(Arc::new(transport))
    }

    /// Client over a shared transport
    pub fn with_shared_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            fetcher: PageFetcher::new(transport),
            defaults: FetchConfig::default(),
            progress: Progress::default(),
        }
    }

    /// Fetch defaults used when a query does not override them
    #[must_use]
    pub fn with_defaults(mut self, defaults: FetchConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Send verbose output somewhere other than stdout
    #[must_use]
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Fetch defaults
    pub fn defaults(&self) -> &FetchConfig {
        &self.defaults
    }

    /// Fetch every page of people matching `query`
    pub async fn people(&self, query: PeopleQuery) -> Result<Dataset> {
        let config = query.options().resolve(&self.defaults);
        self.fetch(ResourceKind::People, query.query(), config)
            .await
            .map(|(dataset, _)| dataset)
    }

    /// Fetch every page of organizations matching `query`
    pub async fn organizations(&self, query: OrganizationsQuery) -> Result<Dataset> {
        let config = query.options().resolve(&self.defaults);
        self.fetch(ResourceKind::Organizations, query.query(), config)
            .await
            .map(|(dataset, _)| dataset)
    }

    /// Fetch every page of a raw query and report statistics
    pub async fn fetch(
        &self,
        resource: ResourceKind,
        query: &Query,
        config: FetchConfig,
    ) -> Result<(Dataset, FetchStats)> {
        let mut engine = FetchEngine::new(self.fetcher.clone())
            .with_config(config)
            .with_progress(self.progress.clone());
        let dataset = engine.fetch_all(resource, query).await?;
        Ok((dataset, engine.stats().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixtureTransport;
    use chrono::TimeZone;

    #[test]
    fn test_people_filters() {
        let query = PeopleQuery::new()
            .name("Ada")
            .locations("London,England")
            .socials("ada")
            .types("investor")
            .updated_since(1_500_000_000)
            .param("sort_order", "updated_at DESC");

        let q = query.query();
        assert_eq!(q.get("name"), Some("Ada"));
        assert_eq!(q.get("locations"), Some("London,England"));
        assert_eq!(q.get("socials"), Some("ada"));
        assert_eq!(q.get("types"), Some("investor"));
        assert_eq!(q.get("updated_since"), Some("1500000000"));
        assert_eq!(q.get("sort_order"), Some("updated_at DESC"));
        assert_eq!(q.get("page"), None);
    }

    #[test]
    fn test_organization_filters() {
        let since = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let query = OrganizationsQuery::new()
            .name("Acme")
            .domain_name("acme.com")
            .organization_types("company")
            .updated_since_datetime(since);

        let q = query.query();
        assert_eq!(q.get("domain_name"), Some("acme.com"));
        assert_eq!(q.get("organization_types"), Some("company"));
        assert_eq!(q.get("updated_since"), Some("1577836800"));
    }

    #[test]
    fn test_options_overlay_defaults() {
        let defaults = FetchConfig::new().with_parallel(true).with_workers(8);

        let config = PeopleQuery::new().options().resolve(&defaults);
        assert!(config.parallel);
        assert!(!config.verbose);
        assert_eq!(config.workers, Some(8));

        let config = PeopleQuery::new()
            .parallel(false)
            .verbose(true)
            .workers(2)
            .options()
            .resolve(&defaults);
        assert!(!config.parallel);
        assert!(config.verbose);
        assert_eq!(config.workers, Some(2));
    }

    #[tokio::test]
    async fn test_people_fetch_through_client() {
        let transport = Arc::new(FixtureTransport::paged(&[&["X"], &["Y"], &["Z"]]));
        let client = OdmClient::with_shared_transport(transport.clone());

        let dataset = client
            .people(PeopleQuery::new().name("Data"))
            .await
            .unwrap();

        assert_eq!(dataset.len(), 3);
        let calls = transport.calls();
        assert!(calls.iter().all(|(kind, _)| *kind == ResourceKind::People));
        assert!(calls.iter().all(|(_, q)| q.get("name") == Some("Data")));
    }

    #[tokio::test]
    async fn test_organizations_fetch_reports_stats() {
        let transport = Arc::new(FixtureTransport::paged(&[&["A", "B"], &["C"]]));
        let client = OdmClient::with_shared_transport(transport.clone());

        let (dataset, stats) = client
            .fetch(
                ResourceKind::Organizations,
                &Query::new(),
                FetchConfig::new().with_parallel(true).with_workers(2),
            )
            .await
            .unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(stats.number_of_pages, 2);
        assert_eq!(stats.pages_fetched, 2);
        assert_eq!(stats.workers_used, 1);
        assert_eq!(transport.calls()[0].0, ResourceKind::Organizations);
    }
}
