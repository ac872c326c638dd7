#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use httpmock::MockServer;
use tracing_subscriber::EnvFilter;
use upkeep_gateway::{GatewayClient, GatewayConfig, RetrySettings, Session, SessionStore};
use url::Url;

pub const TOKEN: &str = "tok-123";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Plain-HTTP config pointed at the mock server, with millisecond backoff.
pub fn config_for(server: &MockServer) -> GatewayConfig {
    let mut config = GatewayConfig::new(Url::parse(&server.base_url()).unwrap());
    config.allow_insecure_http = true;
    config.request_timeout = Duration::from_secs(5);
    config.retry = RetrySettings {
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(5),
        jitter: false,
        ..RetrySettings::default()
    };
    config
}

pub fn store_with_token() -> Arc<SessionStore> {
    Arc::new(SessionStore::signed_in(Session::new(TOKEN).unwrap()))
}

/// Client signed in with [`TOKEN`], no organization.
pub fn client_for(server: &MockServer) -> GatewayClient {
    init_tracing();
    GatewayClient::new(&config_for(server), store_with_token()).unwrap()
}
