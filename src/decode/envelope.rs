//! Envelope parser
//!
//! Pure: no I/O, deterministic given the input bytes.

use super::types::{Item, Paging, ResponseEnvelope};
use crate::error::{Error, Result};
use serde_json::Value;
use tracing::debug;

/// Decoder for the ODM response envelope
///
/// Paths are dot-separated and default to `data.paging` and `data.items`.
#[derive(Debug, Clone)]
pub struct EnvelopeDecoder {
    paging_path: String,
    items_path: String,
}

impl Default for EnvelopeDecoder {
    fn default() -> Self {
        Self {
            paging_path: "data.paging".to_string(),
            items_path: "data.items".to_string(),
        }
    }
}

impl EnvelopeDecoder {
    /// Create a decoder for the standard envelope layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with custom paging and items paths
    pub fn with_paths(paging_path: impl Into<String>, items_path: impl Into<String>) -> Self {
        Self {
            paging_path: paging_path.into(),
            items_path: items_path.into(),
        }
    }

    /// Decode a raw response body
    pub fn decode(&self, body: &str) -> Result<ResponseEnvelope> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::parse(format!("Failed to parse JSON: {e}")))?;
        self.decode_value(&value)
    }

    /// Decode an already-parsed JSON body
    pub fn decode_value(&self, value: &Value) -> Result<ResponseEnvelope> {
        let paging = extract_simple_path(value, &self.paging_path)
            .ok_or_else(|| Error::parse(format!("missing '{}'", self.paging_path)))?;

        let current_page = page_number(paging, &self.paging_path, "current_page")?;
        let number_of_pages = page_number(paging, &self.paging_path, "number_of_pages")?;

        let items = extract_simple_path(value, &self.items_path)
            .ok_or_else(|| Error::parse(format!("missing '{}'", self.items_path)))?
            .as_array()
            .ok_or_else(|| Error::parse(format!("'{}' is not an array", self.items_path)))?;

        let total = items.len();
        let items: Vec<Item> = items.iter().filter_map(parse_item).collect();
        if items.len() < total {
            debug!(
                "Dropped {} of {total} items without properties on page {current_page}",
                total - items.len()
            );
        }

        Ok(ResponseEnvelope {
            paging: Paging::new(current_page, number_of_pages),
            items,
        })
    }
}

/// Parse a raw body with the standard envelope layout
pub fn parse_envelope(body: &str) -> Result<ResponseEnvelope> {
    EnvelopeDecoder::new().decode(body)
}

fn page_number(paging: &Value, paging_path: &str, field: &str) -> Result<u32> {
    let raw = paging
        .get(field)
        .ok_or_else(|| Error::parse(format!("missing '{paging_path}.{field}'")))?;

    raw.as_u64()
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            Error::parse(format!(
                "'{paging_path}.{field}' must be a positive integer, got {raw}"
            ))
        })
}

fn parse_item(value: &Value) -> Option<Item> {
    let properties = value.get("properties")?.as_object()?.clone();
    let text = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let id = match value.get("uuid") {
        Some(Value::String(uuid)) => uuid.clone(),
        _ => text("id"),
    };

    Some(Item {
        item_type: text("type"),
        id,
        properties,
    })
}

/// Walk a dot-separated path through nested objects
fn extract_simple_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    path.split('.')
        .filter(|part| !part.is_empty())
        .try_fold(value, |current, part| current.get(part))
}
