//! Tests for the auth module

use super::*;
use crate::error::{Error, ErrorKind};
use crate::types::ResourceKind;

#[test]
fn test_credential_configured() {
    assert!(Credential::new("abc123").is_configured());
    assert!(!Credential::new("").is_configured());
    assert!(!Credential::new("   ").is_configured());
    assert!(!Credential::default().is_configured());
}

#[test]
fn test_credential_debug_redacts_key() {
    let debug = format!("{:?}", Credential::new("super-secret"));
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("***"));

    let debug = format!("{:?}", Credential::default());
    assert!(debug.contains("<unset>"));
}

#[test]
fn test_authenticator_default_host() {
    let auth = Authenticator::new(Credential::new("k"));
    assert!(auth.is_configured());

    let req = auth
        .apply(
            reqwest::Client::new().get("http://localhost/odm-people"),
            ResourceKind::People,
        )
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(req.headers()[HOST_HEADER], DEFAULT_RAPIDAPI_HOST);
}

#[test]
fn test_missing_credential_is_configuration_error() {
    let auth = Authenticator::new(Credential::default());
    let err = auth.ensure_configured(ResourceKind::People).unwrap_err();

    assert!(matches!(
        err,
        Error::MissingCredential {
            resource: ResourceKind::People
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_apply_sets_rapidapi_headers() {
    let auth = Authenticator::with_host(Credential::new("key-1"), "example.test");
    let client = reqwest::Client::new();
    let req = auth
        .apply(client.get("http://localhost/odm-people"), ResourceKind::People)
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(req.headers()[HOST_HEADER], "example.test");
    assert_eq!(req.headers()[KEY_HEADER], "key-1");
}

#[test]
fn test_apply_without_key_fails() {
    let auth = Authenticator::new(Credential::new(""));
    let client = reqwest::Client::new();
    let result = auth.apply(
        client.get("http://localhost/odm-organizations"),
        ResourceKind::Organizations,
    );
    assert!(result.is_err());
}
