use std::collections::HashSet;
use std::time::Duration;

/// Default User-Agent string for outbound requests
pub const DEFAULT_USER_AGENT: &str = concat!("upkeep-http/", env!("CARGO_PKG_VERSION"));

/// Header that marks a non-idempotent request as safe to replay
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Condition under which a failed attempt may be replayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RetryTrigger {
    /// Connection refused, reset, DNS failure and friends
    TransportError,
    /// The per-attempt timeout elapsed
    Timeout,
    /// The gateway answered with this status code
    Status(u16),
    /// Errors that must never be replayed (deadline, closed service, ...)
    NonRetryable,
}

impl RetryTrigger {
    pub const TOO_MANY_REQUESTS: Self = Self::Status(429);
    pub const REQUEST_TIMEOUT: Self = Self::Status(408);
    pub const INTERNAL_SERVER_ERROR: Self = Self::Status(500);
    pub const BAD_GATEWAY: Self = Self::Status(502);
    pub const SERVICE_UNAVAILABLE: Self = Self::Status(503);
    pub const GATEWAY_TIMEOUT: Self = Self::Status(504);
}

/// Whether replaying `method` cannot duplicate a side effect (RFC 9110).
///
/// GET, HEAD, PUT, DELETE, OPTIONS and TRACE are idempotent; POST and PATCH are not.
#[must_use]
pub fn is_idempotent_method(method: &http::Method) -> bool {
    matches!(
        *method,
        http::Method::GET
            | http::Method::HEAD
            | http::Method::PUT
            | http::Method::DELETE
            | http::Method::OPTIONS
            | http::Method::TRACE
    )
}

/// Exponential backoff: `min(initial * multiplier^attempt, max)`, plus up to 25% jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialBackoff {
    pub initial: Duration,
    pub max: Duration,
    pub multiplier: f64,
    pub jitter: bool,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(100),
            max: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl ExponentialBackoff {
    /// Backoff with custom bounds and the default multiplier
    #[must_use]
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            ..Default::default()
        }
    }

    /// Millisecond backoff without jitter, for tests
    #[must_use]
    pub fn fast() -> Self {
        Self {
            initial: Duration::from_millis(1),
            max: Duration::from_millis(20),
            multiplier: 2.0,
            jitter: false,
        }
    }
}

/// Retry policy
///
/// - `always_retry` triggers replay any method.
/// - `idempotent_retry` triggers replay only idempotent methods, or requests
///   that carry the idempotency key header.
///
/// With the default policy a POST or PATCH is only replayed on 429.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt; total attempts = 1 + `max_retries`
    pub max_retries: usize,
    pub backoff: ExponentialBackoff,
    pub always_retry: HashSet<RetryTrigger>,
    pub idempotent_retry: HashSet<RetryTrigger>,
    /// Use the backoff even when the gateway sends `Retry-After`
    pub ignore_retry_after: bool,
    /// Header that unlocks `idempotent_retry` for POST/PATCH; `None` disables it
    pub idempotency_key_header: Option<http::header::HeaderName>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: ExponentialBackoff::default(),
            always_retry: HashSet::from([RetryTrigger::TOO_MANY_REQUESTS]),
            idempotent_retry: HashSet::from([
                RetryTrigger::TransportError,
                RetryTrigger::Timeout,
                RetryTrigger::REQUEST_TIMEOUT,
                RetryTrigger::INTERNAL_SERVER_ERROR,
                RetryTrigger::BAD_GATEWAY,
                RetryTrigger::SERVICE_UNAVAILABLE,
                RetryTrigger::GATEWAY_TIMEOUT,
            ]),
            ignore_retry_after: false,
            idempotency_key_header: Some(http::header::HeaderName::from_static(
                IDEMPOTENCY_KEY_HEADER,
            )),
        }
    }
}

impl RetryConfig {
    /// Policy that never replays
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Decide whether `trigger` warrants another attempt of a `method` request.
    #[must_use]
    pub fn should_retry(
        &self,
        trigger: RetryTrigger,
        method: &http::Method,
        has_idempotency_key: bool,
    ) -> bool {
        if self.always_retry.contains(&trigger) {
            return true;
        }
        self.idempotent_retry.contains(&trigger)
            && (is_idempotent_method(method) || has_idempotency_key)
    }
}

/// Root certificates used to verify the gateway
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TlsRootConfig {
    /// Mozilla roots bundled through webpki-roots
    #[default]
    WebPki,
    /// The operating system certificate store
    Native,
}

/// Whether plain `http://` URLs are accepted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    #[default]
    TlsOnly,
    /// Local mock servers only
    AllowInsecureHttp,
}

/// Transport configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Timeout for a single attempt (default: 30s)
    pub request_timeout: Duration,
    /// Deadline across every attempt and backoff sleep (default: none)
    pub total_timeout: Option<Duration>,
    /// Cap on decoded response bytes (default: 10 MiB)
    pub max_body_size: usize,
    pub user_agent: String,
    /// `None` sends every request exactly once
    pub retry: Option<RetryConfig>,
    pub transport: TransportSecurity,
    pub tls_roots: TlsRootConfig,
    /// Requests queued ahead of the middleware stack (default: 1024, minimum 1)
    pub buffer_capacity: usize,
    pub pool_idle_timeout: Option<Duration>,
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            total_timeout: None,
            max_body_size: 10 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            retry: Some(RetryConfig::default()),
            transport: TransportSecurity::TlsOnly,
            tls_roots: TlsRootConfig::default(),
            buffer_capacity: 1024,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
        }
    }
}

impl HttpClientConfig {
    /// Plain HTTP allowed, no retries, short timeouts. Never use in production.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_body_size: 1024 * 1024,
            retry: None,
            transport: TransportSecurity::AllowInsecureHttp,
            buffer_capacity: 256,
            pool_idle_timeout: Some(Duration::from_secs(10)),
            pool_max_idle_per_host: 4,
            ..Default::default()
        }
    }
}
