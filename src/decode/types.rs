//! Envelope types

use crate::types::Record;

/// Paging metadata of one response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    /// Page this response belongs to (1-based)
    pub current_page: u32,
    /// Total pages of the logical query
    pub number_of_pages: u32,
}

impl Paging {
    /// Create paging metadata
    pub fn new(current_page: u32, number_of_pages: u32) -> Self {
        Self {
            current_page,
            number_of_pages,
        }
    }

    /// Whether more pages follow this one
    pub fn has_more(&self) -> bool {
        self.current_page < self.number_of_pages
    }
}

/// One provider-side item
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Provider type name (e.g. "Person")
    pub item_type: String,
    /// Provider identifier (`uuid` on the wire)
    pub id: String,
    /// Flattened properties
    pub properties: Record,
}

/// One parsed page of results
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    /// Paging metadata
    pub paging: Paging,
    /// Items carrying `properties`, in response order
    pub items: Vec<Item>,
}

impl ResponseEnvelope {
    /// Page this envelope belongs to
    pub fn current_page(&self) -> u32 {
        self.paging.current_page
    }

    /// Total pages of the logical query
    pub fn number_of_pages(&self) -> u32 {
        self.paging.number_of_pages
    }

    /// Consume the envelope, keeping only each item's properties
    pub fn into_records(self) -> Vec<Record> {
        self.items.into_iter().map(|item| item.properties).collect()
    }
}
