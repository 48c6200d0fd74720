//! Tests for pagination module

use super::fetcher::check_paging;
use super::*;
use crate::decode::Paging;
use crate::error::ErrorKind;
use crate::test_support::{named, FixtureTransport};
use crate::types::{Query, ResourceKind};
use std::sync::Arc;

#[test]
fn test_first_page_remaining_pages() {
    let first = FirstPage {
        records: vec![],
        paging: Paging::new(1, 4),
    };
    assert_eq!(first.number_of_pages(), 4);
    assert_eq!(first.remaining_pages(), vec![2, 3, 4]);
    assert!(!first.is_single_page());

    let single = FirstPage {
        records: vec![],
        paging: Paging::new(1, 1),
    };
    assert!(single.remaining_pages().is_empty());
    assert!(single.is_single_page());
}

#[tokio::test]
async fn test_first_page_uses_query_untouched() {
    let transport = Arc::new(FixtureTransport::paged(&[&["X"], &["Y"]]));
    let fetcher = PageFetcher::new(transport.clone());
    let query = Query::new().with("name", "Data");

    let first = fetcher
        .first_page(ResourceKind::Organizations, &query)
        .await
        .unwrap();

    assert_eq!(first.records, vec![named("X")]);
    assert_eq!(first.number_of_pages(), 2);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, ResourceKind::Organizations);
    assert_eq!(calls[0].1, query);
}

#[tokio::test]
async fn test_page_overlays_page_number() {
    let transport = Arc::new(FixtureTransport::paged(&[&["X"], &["Y"], &["Z"]]));
    let fetcher = PageFetcher::new(transport.clone());
    let base = Query::new().with("name", "Steve").with("page", 1);

    let records = fetcher
        .page(ResourceKind::People, &base, 3, 3)
        .await
        .unwrap();
    assert_eq!(records, vec![named("Z")]);

    let calls = transport.calls();
    assert_eq!(calls[0].1.get("page"), Some("3"));
    assert_eq!(calls[0].1.get("name"), Some("Steve"));
}

#[tokio::test]
async fn test_page_propagates_failures_unchanged() {
    let transport = FixtureTransport::paged(&[&["X"], &["Y"]]).fail_page(2, 502);
    let fetcher = PageFetcher::from_transport(transport);

    let err = fetcher
        .page(ResourceKind::People, &Query::new(), 2, 2)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.page(), Some(2));
}

#[tokio::test]
async fn test_first_page_parse_failure() {
    let transport = FixtureTransport::paged(&[&["X"]]).malformed_page(1);
    let fetcher = PageFetcher::from_transport(transport);

    let err = fetcher
        .first_page(ResourceKind::People, &Query::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_check_paging() {
    let people = ResourceKind::People;
    assert!(check_paging(people, 2, 4, &Paging::new(2, 4)));
    assert!(!check_paging(people, 2, 4, &Paging::new(3, 4)));
    assert!(!check_paging(people, 2, 4, &Paging::new(2, 5)));
}

#[tokio::test]
async fn test_page_keeps_records_when_page_count_changes() {
    let transport = FixtureTransport::paged(&[&["X"], &["Y"], &["Z"]]).report_total(3, 5);
    let fetcher = PageFetcher::from_transport(transport);

    let records = fetcher
        .page(ResourceKind::Organizations, &Query::new(), 3, 3)
        .await
        .unwrap();
    assert_eq!(records, vec![named("Z")]);
}
