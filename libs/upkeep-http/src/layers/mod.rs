//! Tower layers composed by [`HttpClientBuilder`](crate::HttpClientBuilder)
//!
//! - [`UserAgentLayer`] sets `User-Agent` when the request has none
//! - [`RetryLayer`] replays failed attempts with exponential backoff

mod retry;
mod user_agent;

pub use retry::{RETRY_ATTEMPT_HEADER, RetryLayer, RetryService};
pub use user_agent::{UserAgentLayer, UserAgentService};
