//! CLI runner - executes commands

use crate::cli::commands::{Cli, FetchRequest, OutputFormat};
use crate::client::OdmClient;
use crate::config::ClientSettings;
use crate::engine::{FetchStats, Progress};
use crate::error::{Error, Result};
use crate::output::{Dataset, ParquetWriterConfig};
use crate::types::{Query, ResourceKind};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing rows to stdout
    pub async fn run(&self) -> Result<()> {
        let mut out = BufWriter::new(io::stdout());
        self.run_to(&mut out).await?;
        out.flush()?;
        Ok(())
    }

    /// Run the CLI command, writing rows to `out`
    pub async fn run_to(&self, out: &mut impl Write) -> Result<()> {
        if self.cli.format == OutputFormat::Parquet && self.cli.output.is_none() {
            return Err(Error::config("Parquet format requires --output file"));
        }

        let settings = self.settings()?;
        // Rows own stdout, so progress goes to stderr
        let client =
            OdmClient::from_settings(&settings)?.with_progress(Progress::to_writer(io::stderr()));

        let (resource, query, config) = match self.cli.request() {
            FetchRequest::People(q) => (
                ResourceKind::People,
                q.query().clone(),
                q.options().resolve(client.defaults()),
            ),
            FetchRequest::Organizations(q) => (
                ResourceKind::Organizations,
                q.query().clone(),
                q.options().resolve(client.defaults()),
            ),
        };

        let (dataset, stats) = client.fetch(resource, &query, config).await?;
        self.log_summary(resource, &query, &dataset, &stats);
        self.emit(&dataset, out)
    }

    /// Resolve settings: file, then environment, then command-line flags
    fn settings(&self) -> Result<ClientSettings> {
        let mut settings = match &self.cli.config {
            Some(path) => ClientSettings::load(path)?,
            None => ClientSettings::default(),
        }
        .with_env()?;

        if let Some(key) = &self.cli.api_key {
            settings.api_key = Some(key.clone());
        }
        if let Some(url) = &self.cli.base_url {
            settings.base_url = url.clone();
        }
        settings.validate()?;
        Ok(settings)
    }

    fn log_summary(
        &self,
        resource: ResourceKind,
        query: &Query,
        dataset: &Dataset,
        stats: &FetchStats,
    ) {
        info!(
            "{resource}: {} rows x {} columns, {} of {} pages, {} workers, {}ms ({} filters)",
            dataset.len(),
            dataset.columns().len(),
            stats.pages_fetched,
            stats.number_of_pages,
            stats.workers_used.max(1),
            stats.duration_ms,
            query.len()
        );
    }

    /// Write the dataset in the selected format
    fn emit(&self, dataset: &Dataset, out: &mut impl Write) -> Result<()> {
        match self.cli.format {
            OutputFormat::Parquet => {
                let path = self
                    .cli
                    .output
                    .as_deref()
                    .ok_or_else(|| Error::config("Parquet format requires --output file"))?;
                Self::write_parquet(dataset, path)?;
            }
            OutputFormat::Json => {
                if let Some(path) = &self.cli.output {
                    Self::write_parquet(dataset, path)?;
                }
                for record in dataset.records() {
                    serde_json::to_writer(&mut *out, &record)?;
                    writeln!(out)?;
                }
            }
            OutputFormat::Pretty => {
                if let Some(path) = &self.cli.output {
                    Self::write_parquet(dataset, path)?;
                }
                serde_json::to_writer_pretty(&mut *out, &dataset.records())?;
                writeln!(out)?;
            }
        }
        Ok(())
    }

    fn write_parquet(dataset: &Dataset, path: &Path) -> Result<()> {
        let config = ParquetWriterConfig::default();
        let rows = dataset.write_parquet(path, Some(&config))?;
        info!("Wrote {rows} rows to {}", path.display());
        Ok(())
    }
}
