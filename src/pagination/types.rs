//! Pagination types

use crate::decode::Paging;
use crate::types::Record;

/// Result of the first request of a logical query
#[derive(Debug, Clone, PartialEq)]
pub struct FirstPage {
    /// Records of the first request (page 1 unless the query names a page)
    pub records: Vec<Record>,
    /// Paging metadata reported with the first request
    pub paging: Paging,
}

impl FirstPage {
    /// Total pages of the logical query
    pub fn number_of_pages(&self) -> u32 {
        self.paging.number_of_pages
    }

    /// Pages `2..=number_of_pages`, ascending
    pub fn remaining_pages(&self) -> Vec<u32> {
        (2..=self.paging.number_of_pages).collect()
    }

    /// Whether the first request answered as page 1
    pub fn is_page_one(&self) -> bool {
        self.paging.current_page == 1
    }

    /// Whether the query fits in a single page
    pub fn is_single_page(&self) -> bool {
        self.paging.number_of_pages == 1
    }
}
