//! CLI commands and argument parsing

use crate::auth::CREDENTIAL_ENV;
use crate::client::{OrganizationsQuery, PeopleQuery};
use crate::types::ResourceKind;
use chrono::{DateTime, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fetch every page of a Crunchbase ODM query into one table
#[derive(Parser, Debug)]
#[command(name = "odm-fetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// RapidAPI key
    #[arg(long, global = true, env = CREDENTIAL_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Settings file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Parquet output file (required for `--format parquet`)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Extra query parameter passed through unchanged (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", global = true, value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Fetch pages 2..N with multiple workers
    #[arg(long, global = true)]
    pub parallel: bool,

    /// Worker limit for `--parallel`
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub workers: Option<u64>,

    /// Print page progress
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch people
    People {
        /// Full-text query on name only
        #[arg(long)]
        name: Option<String>,

        /// Location names, comma separated
        #[arg(long)]
        locations: Option<String>,

        /// Social media identities, comma separated
        #[arg(long)]
        socials: Option<String>,

        /// Person types, comma separated
        #[arg(long)]
        types: Option<String>,

        /// Unix timestamp, RFC 3339 instant or YYYY-MM-DD
        #[arg(long, value_parser = parse_timestamp)]
        updated_since: Option<i64>,
    },

    /// Fetch organizations
    #[command(alias = "orgs")]
    Organizations {
        /// Full-text query on name only
        #[arg(long)]
        name: Option<String>,

        /// Text search of domain name only
        #[arg(long)]
        domain_name: Option<String>,

        /// Location names, comma separated
        #[arg(long)]
        locations: Option<String>,

        /// Organization types, comma separated
        #[arg(long)]
        organization_types: Option<String>,

        /// Unix timestamp, RFC 3339 instant or YYYY-MM-DD
        #[arg(long, value_parser = parse_timestamp)]
        updated_since: Option<i64>,
    },
}

impl Commands {
    /// Resource kind this command fetches
    pub fn resource(&self) -> ResourceKind {
        match self {
            Commands::People { .. } => ResourceKind::People,
            Commands::Organizations { .. } => ResourceKind::Organizations,
        }
    }
}

/// A command turned into a typed query
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    /// `/odm-people`
    People(PeopleQuery),
    /// `/odm-organizations`
    Organizations(OrganizationsQuery),
}

impl Cli {
    /// Build the query for the selected command, global flags included
    pub fn request(&self) -> FetchRequest {
        match &self.command {
            Commands::People {
                name,
                locations,
                socials,
                types,
                updated_since,
            } => {
                let mut query = PeopleQuery::new();
                if let Some(name) = name {
                    query = query.name(name);
                }
                if let Some(locations) = locations {
                    query = query.locations(locations);
                }
                if let Some(socials) = socials {
                    query = query.socials(socials);
                }
                if let Some(types) = types {
                    query = query.types(types);
                }
                if let Some(since) = updated_since {
                    query = query.updated_since(*since);
                }
                for (key, value) in &self.params {
                    query = query.param(key, value);
                }
                if self.parallel {
                    query = query.parallel(true);
                }
                if self.verbose {
                    query = query.verbose(true);
                }
                if let Some(workers) = self.workers {
                    query = query.workers(workers as usize);
                }
                FetchRequest::People(query)
            }
            Commands::Organizations {
                name,
                domain_name,
                locations,
                organization_types,
                updated_since,
            } => {
                let mut query = OrganizationsQuery::new();
                if let Some(name) = name {
                    query = query.name(name);
                }
                if let Some(domain) = domain_name {
                    query = query.domain_name(domain);
                }
                if let Some(locations) = locations {
                    query = query.locations(locations);
                }
                if let Some(types) = organization_types {
                    query = query.organization_types(types);
                }
                if let Some(since) = updated_since {
                    query = query.updated_since(*since);
                }
                for (key, value) in &self.params {
                    query = query.param(key, value);
                }
                if self.parallel {
                    query = query.parallel(true);
                }
                if self.verbose {
                    query = query.verbose(true);
                }
                if let Some(workers) = self.workers {
                    query = query.workers(workers as usize);
                }
                FetchRequest::Organizations(query)
            }
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per row
    Json,
    /// Indented JSON array
    Pretty,
    /// Parquet file
    Parquet,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn parse_timestamp(s: &str) -> Result<i64, String> {
    if let Ok(seconds) = s.parse::<i64>() {
        return Ok(seconds);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Ok(instant.timestamp());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp())
        .ok_or_else(|| format!("'{s}' is not a unix timestamp, RFC 3339 instant or YYYY-MM-DD"))
}
