//! Response decoder module
//!
//! Parses the ODM response envelope:
//!
//! ```text
//! { "metadata": {...},
//!   "data": { "paging": { "current_page": 1, "number_of_pages": 7, ... },
//!             "items":  [ { "type": "Person", "uuid": "...", "properties": {...} } ] } }
//! ```
//!
//! Only `properties` of each item is surfaced as a record. Items without a
//! `properties` object are dropped.

mod envelope;
mod types;

pub use envelope::{parse_envelope, EnvelopeDecoder};
pub use types::{Item, Paging, ResponseEnvelope};
