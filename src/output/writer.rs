//! Parquet output
//!
//! Datasets are written through their Arrow form. Files are Snappy
//! compressed unless configured otherwise.

use crate::error::{Error, Result};
use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

const DEFAULT_ROW_GROUP_SIZE: usize = 1 << 20;

/// Settings for Parquet files
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    footer: Vec<KeyValue>,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            footer: Vec::new(),
        }
    }
}

impl ParquetWriterConfig {
    /// Snappy compression, 1Mi-row groups, no footer metadata
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum rows per row group
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Set the maximum rows per row group
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    /// Write pages uncompressed
    #[must_use]
    pub fn uncompressed(mut self) -> Self {
        self.compression = Compression::UNCOMPRESSED;
        self
    }

    /// Add a key/value pair to the file footer (e.g. the resource kind)
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.footer.push(KeyValue::new(key.into(), value.into()));
        self
    }

    fn properties(&self) -> WriterProperties {
        let footer = (!self.footer.is_empty()).then(|| self.footer.clone());
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .set_key_value_metadata(footer)
            .build()
    }
}

/// Streams record batches into one Parquet file
pub struct ParquetWriter<W: Write + Send = File> {
    inner: ArrowWriter<W>,
    rows: usize,
}

impl ParquetWriter<File> {
    /// Create (or truncate) `path` and write `schema` batches to it
    pub fn new(
        path: impl AsRef<Path>,
        schema: &Schema,
        config: &ParquetWriterConfig,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| Error::output(format!("Failed to create {}: {e}", path.display())))?;
        Self::from_writer(file, Arc::new(schema.clone()), config)
    }
}

impl<W: Write + Send> ParquetWriter<W> {
    /// Write Parquet to any sink
    pub fn from_writer(sink: W, schema: SchemaRef, config: &ParquetWriterConfig) -> Result<Self> {
        let inner = ArrowWriter::try_new(sink, schema, Some(config.properties()))?;
        Ok(Self { inner, rows: 0 })
    }

    /// Append a batch
    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.inner.write(batch)?;
        self.rows += batch.num_rows();
        Ok(())
    }

    /// Rows appended so far
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush the footer; returns the rows written
    pub fn close(self) -> Result<usize> {
        self.inner.close()?;
        Ok(self.rows)
    }
}

/// Write one batch to a Parquet file, returning the rows written
///
/// Parquet has no representation for a table without columns, so such
/// batches are rejected.
pub fn write_batch_to_parquet(
    path: impl AsRef<Path>,
    batch: &RecordBatch,
    config: Option<&ParquetWriterConfig>,
) -> Result<usize> {
    if batch.num_columns() == 0 {
        return Err(Error::output("No columns to write"));
    }

    let config = config.cloned().unwrap_or_default();
    let mut writer = ParquetWriter::new(path, batch.schema().as_ref(), &config)?;
    writer.write(batch)?;
    writer.close()
}
