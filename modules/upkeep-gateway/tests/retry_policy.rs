//! Gateway calls under the configured retry policy.

mod common;

use httpmock::prelude::*;
use serde_json::json;
use upkeep_gateway::{GatewayClient, ListQuery};
use upkeep_http::RETRY_ATTEMPT_HEADER;

use common::{client_for, config_for, init_tracing};

#[tokio::test]
async fn get_recovers_after_503() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/api/assets")
            .header_missing(RETRY_ATTEMPT_HEADER);
        then.status(503);
    });
    let retried = server.mock(|when, then| {
        when.method(GET)
            .path("/api/assets")
            .header_exists(RETRY_ATTEMPT_HEADER);
        then.status(200).json_body(json!([{"id": "a1"}]));
    });

    let client = client_for(&server);
    let assets = client.assets().list(&ListQuery::new()).await.unwrap();

    assert_eq!(assets.len(), 1);
    assert_eq!(first.calls(), 1);
    assert_eq!(retried.calls(), 1);
}

#[tokio::test]
async fn post_500_is_attempted_once() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/work-orders");
        then.status(500).body("db down");
    });

    let client = client_for(&server);
    let err = client
        .work_orders()
        .create(&json!({"title": "Leak"}))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to create work order");
    assert_eq!(err.status(), Some(http::StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn post_is_retried_on_429() {
    let server = MockServer::start();
    let limited = server.mock(|when, then| {
        when.method(POST)
            .path("/api/safety/incidents")
            .header_missing(RETRY_ATTEMPT_HEADER);
        then.status(429).header("retry-after", "0");
    });
    let accepted = server.mock(|when, then| {
        when.method(POST)
            .path("/api/safety/incidents")
            .header_exists(RETRY_ATTEMPT_HEADER);
        then.status(201).json_body(json!({"id": "n1"}));
    });

    let client = client_for(&server);
    let incident = client
        .safety()
        .incidents()
        .create(&json!({"title": "Slip"}))
        .await
        .unwrap();

    assert_eq!(incident.id, "n1");
    assert_eq!(limited.calls(), 1);
    assert_eq!(accepted.calls(), 1);
}

#[tokio::test]
async fn exhausted_retries_report_the_last_status() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/people/p1");
        then.status(502);
    });

    let client = client_for(&server);
    let err = client.people().get("p1").await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch person");
    assert_eq!(err.status(), Some(http::StatusCode::BAD_GATEWAY));
    // first attempt plus the default three retries
    assert_eq!(mock.calls(), 4);
}

#[tokio::test]
async fn disabled_retry_attempts_once() {
    init_tracing();
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/routes");
        then.status(503);
    });

    let mut config = config_for(&server);
    config.retry.enabled = false;
    let client = GatewayClient::anonymous(&config).unwrap();
    let err = client.routes().list(&ListQuery::new()).await.unwrap_err();

    assert_eq!(err.status(), Some(http::StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(mock.calls(), 1);
}
