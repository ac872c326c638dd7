#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP transport for the Upkeep gateway client
//!
//! A hyper-based client wrapped in a tower middleware stack:
//! - TLS via rustls (HTTPS only unless explicitly relaxed for tests)
//! - Connection pooling
//! - Per-attempt timeout and an optional deadline across retries
//! - Retries with exponential backoff, jitter and `Retry-After` support
//! - User-Agent injection
//! - Transparent response decompression (gzip, brotli, deflate)
//! - A hook for request-decorating layers (session headers, see `upkeep-session`)
//!
//! `send()` returns `Ok` for every HTTP status; turning a non-2xx answer into
//! an error is the caller's decision.
//!
//! # Example
//!
//! ```ignore
//! use upkeep_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .user_agent("upkeep-cli/0.1")
//!     .build()?;
//!
//! let url = url::Url::parse("https://gateway.example.com/api/assets")?;
//! let assets: serde_json::Value = client
//!     .request(http::Method::GET, &url)
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod layers;
mod request;
mod response;
mod tls;

pub use builder::{HttpClientBuilder, InnerService};
pub use client::HttpClient;
pub use config::{
    DEFAULT_USER_AGENT, ExponentialBackoff, HttpClientConfig, IDEMPOTENCY_KEY_HEADER,
    RetryConfig, RetryTrigger, TlsRootConfig, TransportSecurity, is_idempotent_method,
};
pub use error::HttpError;
pub use layers::{RETRY_ATTEMPT_HEADER, RetryLayer, RetryService, UserAgentLayer, UserAgentService};
pub use request::RequestBuilder;
pub use response::{ERROR_BODY_PREVIEW_LIMIT, HttpResponse, ResponseBody};
