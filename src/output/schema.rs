//! Dataset to Arrow conversion
//!
//! Each column gets one Arrow type covering its non-null cells. Integers
//! widen to floats; any other disagreement falls back to text, with
//! composite values rendered as JSON. Every field is nullable and columns
//! keep the dataset's order.

use super::dataset::Dataset;
use crate::error::{Error, Result};
use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, ListArray, NullArray, StringArray,
    StructArray,
};
use arrow::buffer::{NullBuffer, OffsetBuffer};
use arrow::datatypes::{DataType, Field, FieldRef, Fields, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use serde_json::Value;
use std::sync::Arc;

/// A column's cells, `None` where the value is absent or null
type Cells<'a> = Vec<Option<&'a Value>>;

/// Convert a dataset to an Arrow RecordBatch
pub fn dataset_to_arrow(dataset: &Dataset) -> Result<RecordBatch> {
    let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Cells<'_> = dataset
                .rows()
                .iter()
                .map(|row| present(&row[idx]))
                .collect();
            let data_type = infer_column_type(cells.iter().flatten().copied());
            let array = column_array(&cells, &data_type)?;
            Ok((Field::new(name, data_type, true), array))
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .unzip();

    // Keeps the row count when there are rows but no columns
    let options = RecordBatchOptions::new().with_row_count(Some(dataset.len()));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)
        .map_err(|e| Error::output(format!("Failed to build RecordBatch: {e}")))
}

/// One Arrow type covering every value given (`Null` when there are none)
pub fn infer_column_type<'a>(values: impl IntoIterator<Item = &'a Value>) -> DataType {
    values
        .into_iter()
        .map(value_type)
        .fold(DataType::Null, |acc, next| widen(&acc, &next))
}

fn present(value: &Value) -> Option<&Value> {
    (!value.is_null()).then_some(value)
}

fn value_type(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Number(n) if n.is_i64() => DataType::Int64,
        Value::Number(_) => DataType::Float64,
        Value::String(_) => DataType::Utf8,
        Value::Array(items) => list_of(infer_column_type(items.iter().filter_map(present))),
        // A struct without fields has no length in Arrow
        Value::Object(map) if map.is_empty() => DataType::Utf8,
        Value::Object(map) => DataType::Struct(
            map.iter()
                .map(|(key, v)| Field::new(key, value_type(v), true))
                .collect::<Fields>(),
        ),
    }
}

fn list_of(item: DataType) -> DataType {
    DataType::List(Arc::new(Field::new("item", item, true)))
}

fn widen(left: &DataType, right: &DataType) -> DataType {
    match (left, right) {
        _ if left == right => left.clone(),
        (DataType::Null, t) | (t, DataType::Null) => t.clone(),
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }
        (DataType::List(l), DataType::List(r)) => list_of(widen(l.data_type(), r.data_type())),
        _ => DataType::Utf8,
    }
}

fn column_array(cells: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    let array: ArrayRef = match data_type {
        DataType::Null => Arc::new(NullArray::new(cells.len())),
        DataType::Boolean => Arc::new(
            cells
                .iter()
                .map(|c| c.and_then(Value::as_bool))
                .collect::<BooleanArray>(),
        ),
        DataType::Int64 => Arc::new(
            cells
                .iter()
                .map(|c| c.and_then(Value::as_i64))
                .collect::<Int64Array>(),
        ),
        DataType::Float64 => Arc::new(
            cells
                .iter()
                .map(|c| c.and_then(Value::as_f64))
                .collect::<Float64Array>(),
        ),
        DataType::List(item) => list_column(cells, item)?,
        DataType::Struct(fields) => struct_column(cells, fields)?,
        _ => Arc::new(cells.iter().map(|c| c.map(text)).collect::<StringArray>()),
    };
    Ok(array)
}

/// Strings as-is, anything else as JSON text
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn list_column(cells: &[Option<&Value>], item: &FieldRef) -> Result<ArrayRef> {
    let mut lengths = Vec::with_capacity(cells.len());
    let mut items: Cells<'_> = Vec::new();

    for cell in cells {
        let elements: &[Value] = match cell {
            Some(Value::Array(elements)) => elements.as_slice(),
            _ => &[],
        };
        lengths.push(elements.len());
        items.extend(elements.iter().map(present));
    }

    if i32::try_from(items.len()).is_err() {
        return Err(Error::output("List column too large for 32-bit offsets"));
    }

    let values = column_array(&items, item.data_type())?;
    Ok(Arc::new(ListArray::new(
        Arc::clone(item),
        OffsetBuffer::from_lengths(lengths),
        values,
        validity(cells),
    )))
}

fn struct_column(cells: &[Option<&Value>], fields: &Fields) -> Result<ArrayRef> {
    let children = fields
        .iter()
        .map(|field| {
            let child: Cells<'_> = cells
                .iter()
                .map(|c| c.and_then(|v| v.get(field.name())).and_then(present))
                .collect();
            column_array(&child, field.data_type())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Arc::new(StructArray::new(
        fields.clone(),
        children,
        validity(cells),
    )))
}

/// Null buffer marking absent cells, `None` when every cell is present
fn validity(cells: &[Option<&Value>]) -> Option<NullBuffer> {
    cells
        .iter()
        .any(Option::is_none)
        .then(|| NullBuffer::from(cells.iter().map(Option::is_some).collect::<Vec<_>>()))
}
