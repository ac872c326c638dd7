//! The session layer runs inside the retry loop: every attempt carries credentials.

use std::sync::Arc;

use httpmock::prelude::*;
use upkeep_http::{ExponentialBackoff, HttpClientBuilder, RETRY_ATTEMPT_HEADER, RetryConfig};
use upkeep_session::{DEFAULT_ORGANIZATION_HEADER, HttpClientBuilderExt, Session, SessionStore};
use url::Url;

fn fast_retry(max_retries: usize) -> RetryConfig {
    RetryConfig {
        max_retries,
        backoff: ExponentialBackoff::fast(),
        ..RetryConfig::default()
    }
}

#[tokio::test]
async fn every_attempt_is_authenticated() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/api/meters")
            .header("authorization", "Bearer tok-r")
            .header_missing(RETRY_ATTEMPT_HEADER);
        then.status(503);
    });
    let replays = server.mock(|when, then| {
        when.method(GET)
            .path("/api/meters")
            .header("authorization", "Bearer tok-r")
            .header_exists(RETRY_ATTEMPT_HEADER);
        then.status(503);
    });

    let store = Arc::new(SessionStore::signed_in(Session::new("tok-r").unwrap()));
    let client = HttpClientBuilder::new()
        .allow_insecure_http()
        .retry(Some(fast_retry(2)))
        .with_session(store, DEFAULT_ORGANIZATION_HEADER)
        .build()
        .unwrap();

    let url = Url::parse(&server.url("/api/meters")).unwrap();
    let resp = client.request(http::Method::GET, &url).send().await.unwrap();

    assert_eq!(resp.status(), http::StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(first.calls(), 1);
    assert_eq!(replays.calls(), 2);
}

#[tokio::test]
async fn sign_out_applies_to_the_next_request() {
    let server = MockServer::start();
    let authed = server.mock(|when, then| {
        when.method(GET).path("/api/people").header_exists("authorization");
        then.status(200).body("[]");
    });
    let anonymous = server.mock(|when, then| {
        when.method(GET).path("/api/people").header_missing("authorization");
        then.status(401);
    });

    let store = Arc::new(SessionStore::signed_in(Session::new("tok").unwrap()));
    let client = HttpClientBuilder::new()
        .allow_insecure_http()
        .retry(None)
        .with_session(store.clone(), DEFAULT_ORGANIZATION_HEADER)
        .build()
        .unwrap();
    let url = Url::parse(&server.url("/api/people")).unwrap();

    let resp = client.request(http::Method::GET, &url).send().await.unwrap();
    assert_eq!(resp.status(), http::StatusCode::OK);

    store.sign_out();
    let resp = client.request(http::Method::GET, &url).send().await.unwrap();
    assert_eq!(resp.status(), http::StatusCode::UNAUTHORIZED);

    assert_eq!(authed.calls(), 1);
    assert_eq!(anonymous.calls(), 1);
}
