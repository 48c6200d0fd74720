//! Stub transport shared by unit tests

use crate::decode::{Item, Paging, ResponseEnvelope};
use crate::error::{Error, Result};
use crate::http::{page_of, Transport};
use crate::types::{Query, Record, ResourceKind};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Fixture {
    Records(Vec<Record>),
    Status(u16),
    Malformed,
}

/// Serves deterministic pages from memory
#[derive(Debug)]
pub struct FixtureTransport {
    total: u32,
    pages: HashMap<u32, Fixture>,
    delays: HashMap<u32, Duration>,
    totals: HashMap<u32, u32>,
    calls: Mutex<Vec<(ResourceKind, Query)>>,
}

/// Build a record `{"name": name}`
pub fn named(name: &str) -> Record {
    match json!({ "name": name }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    }
}

impl FixtureTransport {
    /// One page per slice entry, each record `{"name": ...}`
    pub fn paged(pages: &[&[&str]]) -> Self {
        let mut transport = Self {
            total: pages.len() as u32,
            pages: HashMap::new(),
            delays: HashMap::new(),
            totals: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        };
        for (i, names) in pages.iter().enumerate() {
            let records = names.iter().map(|n| named(n)).collect();
            transport.pages.insert(i as u32 + 1, Fixture::Records(records));
        }
        transport
    }

    /// Replace the records of a page
    pub fn with_records(mut self, page: u32, records: Vec<Record>) -> Self {
        self.pages.insert(page, Fixture::Records(records));
        self
    }

    /// Make a page answer with an HTTP status
    pub fn fail_page(mut self, page: u32, status: u16) -> Self {
        self.pages.insert(page, Fixture::Status(status));
        self
    }

    /// Make a page answer with an unparseable body
    pub fn malformed_page(mut self, page: u32) -> Self {
        self.pages.insert(page, Fixture::Malformed);
        self
    }

    /// Delay the answer for a page
    pub fn delay_page(mut self, page: u32, delay: Duration) -> Self {
        self.delays.insert(page, delay);
        self
    }

    /// Make a page report `total` as its page count
    pub fn report_total(mut self, page: u32, total: u32) -> Self {
        self.totals.insert(page, total);
        self
    }

    /// Queries received so far, in arrival order
    pub fn calls(&self) -> Vec<(ResourceKind, Query)> {
        self.calls.lock().unwrap().clone()
    }

    /// Page numbers requested so far, sorted
    pub fn requested_pages(&self) -> Vec<u32> {
        let mut pages: Vec<u32> = self.calls().iter().map(|(_, q)| page_of(q)).collect();
        pages.sort_unstable();
        pages
    }
}

#[async_trait]
impl Transport for FixtureTransport {
    async fn fetch(&self, resource: ResourceKind, query: &Query) -> Result<ResponseEnvelope> {
        self.calls.lock().unwrap().push((resource, query.clone()));
        let page = page_of(query);

        if let Some(delay) = self.delays.get(&page) {
            tokio::time::sleep(*delay).await;
        }

        let total = self.totals.get(&page).copied().unwrap_or(self.total);
        match self.pages.get(&page).cloned() {
            Some(Fixture::Records(records)) => Ok(ResponseEnvelope {
                paging: Paging::new(page, total),
                items: records
                    .into_iter()
                    .enumerate()
                    .map(|(i, properties)| Item {
                        item_type: "Fixture".to_string(),
                        id: format!("{page}-{i}"),
                        properties,
                    })
                    .collect(),
            }),
            Some(Fixture::Status(status)) => {
                Err(Error::http_status(resource, page, status, "fixture failure"))
            }
            Some(Fixture::Malformed) => Err(Error::parse("fixture malformed").at(resource, page)),
            None => Err(Error::http_status(resource, page, 404, "no such page")),
        }
    }
}
