//! Dataset assembly
//!
//! Pure, no I/O and no failure path.

use super::schema::dataset_to_arrow;
use super::writer::{write_batch_to_parquet, ParquetWriterConfig};
use crate::error::Result;
use crate::types::{JsonValue, Record};
use arrow::record_batch::RecordBatch;
use std::collections::HashMap;
use std::path::Path;

/// Tabular result of a fetch
///
/// Rows are records, columns are the union of the records' fields in
/// first-seen order. Every row has a value for every column; absent fields
/// are `null`. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<JsonValue>>,
}

impl Dataset {
    /// Column names in first-seen order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows, each aligned with [`Dataset::columns`]
    pub fn rows(&self) -> &[Vec<JsonValue>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// One row
    pub fn row(&self, index: usize) -> Option<&[JsonValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// One cell
    pub fn get(&self, row: usize, column: &str) -> Option<&JsonValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// All values of a column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&JsonValue>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// Rows as JSON objects with every column present
    pub fn records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Convert to an Arrow RecordBatch
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        dataset_to_arrow(self)
    }

    /// Write to a Parquet file, returning the number of rows written
    pub fn write_parquet(
        &self,
        path: impl AsRef<Path>,
        config: Option<&ParquetWriterConfig>,
    ) -> Result<usize> {
        let batch = self.to_record_batch()?;
        write_batch_to_parquet(path, &batch, config)
    }
}

/// Incremental dataset assembly
///
/// Records are appended batch by batch; the column union grows as new
/// fields appear and earlier rows are null-filled on [`DatasetBuilder::finish`].
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
    records: Vec<Record>,
}

impl DatasetBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one batch of records in order
    pub fn push_batch(&mut self, records: Vec<Record>) {
        for record in records {
            self.push(record);
        }
    }

    /// Append one record
    pub fn push(&mut self, record: Record) {
        for key in record.keys() {
            if !self.positions.contains_key(key) {
                self.positions.insert(key.clone(), self.columns.len());
                self.columns.push(key.clone());
            }
        }
        self.records.push(record);
    }

    /// Records appended so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build the dataset
    pub fn finish(self) -> Dataset {
        let width = self.columns.len();
        let rows = self
            .records
            .into_iter()
            .map(|record| {
                let mut row = vec![JsonValue::Null; width];
                for (key, value) in record {
                    row[self.positions[&key]] = value;
                }
                row
            })
            .collect();

        Dataset {
            columns: self.columns,
            rows,
        }
    }
}

/// Merge record batches into one dataset, preserving batch and record order
pub fn assemble<I>(batches: I) -> Dataset
where
    I: IntoIterator<Item = Vec<Record>>,
{
    let mut builder = DatasetBuilder::new();
    for batch in batches {
        builder.push_batch(batch);
    }
    builder.finish()
}
