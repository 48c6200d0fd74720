//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: query → paged HTTP requests → Dataset/Parquet output

use clap::Parser;
use odm_fetch::cli::{Cli, Runner};
use odm_fetch::engine::Progress;
use odm_fetch::error::{Error, ErrorKind};
use odm_fetch::{ClientSettings, OdmClient, OrganizationsQuery, PeopleQuery};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate, Times};

const KEY: &str = "test-key";

fn page_body(current: u32, total: u32, items: &[Value]) -> Value {
    let items: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(i, properties)| {
            json!({
                "type": "Entity",
                "uuid": format!("{current}-{i}"),
                "properties": properties
            })
        })
        .collect();
    json!({
        "data": {
            "paging": {"current_page": current, "number_of_pages": total},
            "items": items
        }
    })
}

fn named(names: &[&str]) -> Vec<Value> {
    names.iter().map(|n| json!({ "name": n })).collect()
}

/// Mount one page of `endpoint`; page 1 is the request without a `page` parameter
async fn mount_page(
    server: &MockServer,
    endpoint: &str,
    page: u32,
    body: Value,
    hits: impl Into<Times>,
) {
    let mock = Mock::given(method("GET"))
        .and(path(endpoint))
        .and(header("x-rapidapi-key", KEY));
    let mock = if page == 1 {
        mock.and(query_param_is_missing("page"))
    } else {
        mock.and(query_param("page", page.to_string()))
    };
    mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(hits)
        .mount(server)
        .await;
}

async fn mount_pages(server: &MockServer, endpoint: &str, pages: &[&[&str]]) {
    let total = pages.len() as u32;
    for (i, names) in pages.iter().enumerate() {
        let page = i as u32 + 1;
        mount_page(server, endpoint, page, page_body(page, total, &named(names)), 1).await;
    }
}

fn client(server: &MockServer) -> OdmClient {
    let settings = ClientSettings {
        api_key: Some(KEY.to_string()),
        base_url: server.uri(),
        ..ClientSettings::default()
    };
    OdmClient::from_settings(&settings)
        .unwrap()
        .with_progress(Progress::to_writer(std::io::sink()))
}

fn names(dataset: &odm_fetch::Dataset) -> Vec<String> {
    dataset
        .column("name")
        .unwrap()
        .into_iter()
        .map(|v| v.as_str().unwrap_or_default().to_string())
        .collect()
}

fn sorted(mut v: Vec<String>) -> Vec<String> {
    v.sort();
    v
}

// ============================================================================
// Fetch Entry Points
// ============================================================================

#[tokio::test]
async fn test_people_three_pages_sequential() {
    let server = MockServer::start().await;
    mount_pages(&server, "/odm-people", &[&["X"], &["Y"], &["Z"]]).await;

    let dataset = client(&server).people(PeopleQuery::new()).await.unwrap();

    assert_eq!(names(&dataset), vec!["X", "Y", "Z"]);
    assert_eq!(dataset.columns(), &["name".to_string()]);
}

#[tokio::test]
async fn test_people_three_pages_parallel() {
    let server = MockServer::start().await;
    mount_pages(&server, "/odm-people", &[&["X"], &["Y"], &["Z"]]).await;

    let dataset = client(&server)
        .people(PeopleQuery::new().parallel(true).workers(2))
        .await
        .unwrap();

    let rows = names(&dataset);
    assert_eq!(rows[0], "X");
    assert_eq!(sorted(rows), vec!["X", "Y", "Z"]);
}

#[tokio::test]
async fn test_organizations_parallel_row_count() {
    let server = MockServer::start().await;
    mount_pages(
        &server,
        "/odm-organizations",
        &[&["a", "b"], &["c"], &["d", "e", "f"], &["g"], &["h", "i"]],
    )
    .await;

    let dataset = client(&server)
        .organizations(OrganizationsQuery::new().parallel(true).workers(3))
        .await
        .unwrap();

    assert_eq!(dataset.len(), 9);
    assert_eq!(
        sorted(names(&dataset)),
        vec!["a", "b", "c", "d", "e", "f", "g", "h", "i"]
    );
}

#[tokio::test]
async fn test_single_page_is_fetched_once() {
    let server = MockServer::start().await;
    mount_page(&server, "/odm-people", 1, page_body(1, 1, &named(&["Solo"])), 1).await;
    mount_page(&server, "/odm-people", 2, page_body(2, 1, &[]), 0).await;

    let dataset = client(&server)
        .people(PeopleQuery::new().parallel(true))
        .await
        .unwrap();

    assert_eq!(names(&dataset), vec!["Solo"]);
}

#[tokio::test]
async fn test_filters_reach_every_page() {
    let server = MockServer::start().await;
    for page in 1..=2u32 {
        let mock = Mock::given(method("GET"))
            .and(path("/odm-organizations"))
            .and(query_param("name", "Acme"))
            .and(query_param("domain_name", "acme.com"))
            .and(query_param("updated_since", "1500000000"))
            .and(query_param("sort_order", "asc"));
        let mock = if page == 1 {
            mock.and(query_param_is_missing("page"))
        } else {
            mock.and(query_param("page", "2"))
        };
        mock.respond_with(
            ResponseTemplate::new(200).set_body_json(page_body(page, 2, &named(&["Acme"]))),
        )
        .expect(1)
        .mount(&server)
        .await;
    }

    let dataset = client(&server)
        .organizations(
            OrganizationsQuery::new()
                .name("Acme")
                .domain_name("acme.com")
                .updated_since(1_500_000_000)
                .param("sort_order", "asc"),
        )
        .await
        .unwrap();

    assert_eq!(dataset.len(), 2);
}

#[tokio::test]
async fn test_column_union_across_pages() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/odm-people",
        1,
        page_body(1, 2, &[json!({"a": 1})]),
        1,
    )
    .await;
    mount_page(
        &server,
        "/odm-people",
        2,
        page_body(2, 2, &[json!({"b": 2})]),
        1,
    )
    .await;

    let dataset = client(&server).people(PeopleQuery::new()).await.unwrap();

    assert_eq!(dataset.columns(), &["a".to_string(), "b".to_string()]);
    assert_eq!(dataset.get(0, "b"), Some(&Value::Null));
    assert_eq!(dataset.get(1, "a"), Some(&Value::Null));
    assert_eq!(dataset.get(1, "b"), Some(&json!(2)));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_parallel_page_failure_fails_fetch() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/odm-people",
        1,
        page_body(1, 3, &named(&["X"])),
        1,
    )
    .await;
    mount_page(
        &server,
        "/odm-people",
        2,
        page_body(2, 3, &named(&["Y"])),
        0..=1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/odm-people"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&server)
        .await;

    let err = client(&server)
        .people(PeopleQuery::new().parallel(true).workers(2))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    match err {
        Error::HttpStatus {
            status, page, body, ..
        } => {
            assert_eq!(status, 503);
            assert_eq!(page, 3);
            assert_eq!(body, "try later");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_page_is_parse_error() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/odm-organizations",
        1,
        page_body(1, 2, &named(&["X"])),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/odm-organizations"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"items": []}})))
        .mount(&server)
        .await;

    let err = client(&server)
        .organizations(OrganizationsQuery::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.page(), Some(2));
    assert_eq!(
        err.resource(),
        Some(odm_fetch::ResourceKind::Organizations)
    );
}

#[tokio::test]
async fn test_missing_credential_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 1, &[])))
        .expect(0)
        .mount(&server)
        .await;

    let settings = ClientSettings {
        api_key: None,
        base_url: server.uri(),
        ..ClientSettings::default()
    };
    let err = OdmClient::from_settings(&settings)
        .unwrap()
        .people(PeopleQuery::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingCredential { .. }));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

// ============================================================================
// Output
// ============================================================================

#[tokio::test]
async fn test_dataset_to_parquet() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/odm-people",
        1,
        page_body(
            1,
            1,
            &[
                json!({"name": "Ada", "rank": 1}),
                json!({"name": "Grace", "rank": 2, "city": "Arlington"}),
            ],
        ),
        1,
    )
    .await;

    let dataset = client(&server).people(PeopleQuery::new()).await.unwrap();

    let batch = dataset.to_record_batch().unwrap();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 3);

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("people.parquet");
    let rows = dataset.write_parquet(&file, None).unwrap();
    assert_eq!(rows, 2);
    assert!(file.exists());
}

#[tokio::test]
async fn test_cli_writes_json_lines() {
    let server = MockServer::start().await;
    mount_pages(&server, "/odm-organizations", &[&["Acme"], &["Globex"]]).await;

    let uri = server.uri();
    let cli = Cli::try_parse_from([
        "odm-fetch",
        "--api-key",
        KEY,
        "--base-url",
        uri.as_str(),
        "orgs",
        "--parallel",
    ])
    .unwrap();

    let mut out = Vec::new();
    Runner::new(cli).run_to(&mut out).await.unwrap();

    let lines: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], json!({"name": "Acme"}));
}
