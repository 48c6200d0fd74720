//! Output module
//!
//! Assembles fetched records into a [`Dataset`] and exports it.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Merging per-page record batches into one table whose columns are the
//!   union of observed fields in first-seen order, null-filled where absent
//! - Converting a dataset to an Arrow RecordBatch
//! - Writing Parquet files

mod dataset;
mod schema;
mod writer;

pub use dataset::{assemble, Dataset, DatasetBuilder};
pub use schema::{dataset_to_arrow, infer_column_type};
pub use writer::{write_batch_to_parquet, ParquetWriter, ParquetWriterConfig};
