use crate::config::{ExponentialBackoff, RetryConfig, RetryTrigger};
use crate::error::HttpError;
use crate::response::{ResponseBody, parse_retry_after};
use bytes::Bytes;
use http::{HeaderValue, Request, Response};
use http_body_util::{BodyExt, Full};
use rand::Rng;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::Instant;
use tower::{Layer, Service, ServiceExt};

/// 1-based retry counter added to replayed requests
pub const RETRY_ATTEMPT_HEADER: &str = "x-retry-attempt";

/// Bytes read from a discarded response so its connection can go back to the pool
const DRAIN_LIMIT: usize = 64 * 1024;

/// Replays failed attempts according to a [`RetryConfig`]
#[derive(Clone, Debug)]
pub struct RetryLayer {
    config: RetryConfig,
    total_timeout: Option<Duration>,
}

impl RetryLayer {
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            total_timeout: None,
        }
    }

    /// Same policy, bounded by a deadline across all attempts and sleeps
    #[must_use]
    pub fn with_total_timeout(config: RetryConfig, total_timeout: Option<Duration>) -> Self {
        Self {
            config,
            total_timeout,
        }
    }
}

impl<S> Layer<S> for RetryLayer {
    type Service = RetryService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RetryService {
            inner,
            config: Arc::new(self.config.clone()),
            total_timeout: self.total_timeout,
        }
    }
}

/// Retry middleware
///
/// Retries both `Err` (transport, timeout) and `Ok` responses with a retryable
/// status. Once retries are exhausted the last response is returned as `Ok`,
/// whatever its status.
#[derive(Clone, Debug)]
pub struct RetryService<S> {
    inner: S,
    config: Arc<RetryConfig>,
    total_timeout: Option<Duration>,
}

enum Outcome {
    Done(Result<Response<ResponseBody>, HttpError>),
    Retry {
        backoff: Duration,
        trigger: RetryTrigger,
        retry_after_used: bool,
    },
}

impl<S> Service<Request<Full<Bytes>>> for RetryService<S>
where
    S: Service<Request<Full<Bytes>>, Response = Response<ResponseBody>, Error = HttpError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = Response<ResponseBody>;
    type Error = HttpError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
        // Use the instance that was poll_ready'd; leave a fresh clone behind.
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);
        let config = Arc::clone(&self.config);
        let deadline = self.total_timeout.map(|t| (Instant::now() + t, t));

        let (parts, body) = req.into_parts();
        let has_idempotency_key = config
            .idempotency_key_header
            .as_ref()
            .is_some_and(|name| parts.headers.contains_key(name));

        Box::pin(async move {
            let method = parts.method.clone();
            let host = parts
                .uri
                .authority()
                .map_or_else(|| "unknown".to_owned(), ToString::to_string);
            let mut svc = inner;
            let mut attempt = 0usize;

            loop {
                if let Some((at, total)) = deadline
                    && Instant::now() >= at
                {
                    return Err(HttpError::DeadlineExceeded(total));
                }

                let mut req = Request::from_parts(parts.clone(), body.clone());
                if attempt > 0
                    && let Ok(value) = HeaderValue::try_from(attempt.to_string())
                {
                    req.headers_mut().insert(RETRY_ATTEMPT_HEADER, value);
                }

                let result = svc.ready().await?.call(req).await;
                let can_retry = attempt < config.max_retries;

                let outcome = match result {
                    Ok(resp) => {
                        let trigger = RetryTrigger::Status(resp.status().as_u16());
                        if can_retry && config.should_retry(trigger, &method, has_idempotency_key)
                        {
                            let retry_after = if config.ignore_retry_after {
                                None
                            } else {
                                parse_retry_after(resp.headers())
                            };
                            drain(resp).await;
                            Outcome::Retry {
                                backoff: retry_after
                                    .unwrap_or_else(|| calculate_backoff(&config.backoff, attempt)),
                                trigger,
                                retry_after_used: retry_after.is_some(),
                            }
                        } else {
                            Outcome::Done(Ok(resp))
                        }
                    }
                    Err(err) => {
                        let trigger = retry_trigger(&err);
                        if can_retry && config.should_retry(trigger, &method, has_idempotency_key)
                        {
                            tracing::debug!(error = %err, "attempt failed");
                            Outcome::Retry {
                                backoff: calculate_backoff(&config.backoff, attempt),
                                trigger,
                                retry_after_used: false,
                            }
                        } else {
                            Outcome::Done(Err(err))
                        }
                    }
                };

                let (backoff, trigger, retry_after_used) = match outcome {
                    Outcome::Done(result) => return result,
                    Outcome::Retry {
                        backoff,
                        trigger,
                        retry_after_used,
                    } => (backoff, trigger, retry_after_used),
                };

                let backoff = match deadline {
                    Some((at, total)) => {
                        let remaining = at.saturating_duration_since(Instant::now());
                        if remaining.is_zero() {
                            return Err(HttpError::DeadlineExceeded(total));
                        }
                        backoff.min(remaining)
                    }
                    None => backoff,
                };

                tracing::debug!(
                    retry = attempt + 1,
                    max_retries = config.max_retries,
                    trigger = ?trigger,
                    method = %method,
                    host = %host,
                    backoff_ms = backoff.as_millis(),
                    retry_after_used,
                    "retrying request"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
        })
    }
}

/// Read (and drop) up to [`DRAIN_LIMIT`] bytes so HTTP/1.1 can reuse the connection.
async fn drain(resp: Response<ResponseBody>) {
    let mut body = std::pin::pin!(resp.into_body());
    let mut drained = 0usize;
    while let Some(frame) = body.frame().await {
        let Ok(frame) = frame else {
            tracing::trace!("drain failed; connection will not be reused");
            return;
        };
        if let Some(chunk) = frame.data_ref() {
            drained += chunk.len();
            if drained >= DRAIN_LIMIT {
                return;
            }
        }
    }
}

fn retry_trigger(err: &HttpError) -> RetryTrigger {
    match err {
        HttpError::Transport(_) => RetryTrigger::TransportError,
        HttpError::Timeout(_) => RetryTrigger::Timeout,
        _ => RetryTrigger::NonRetryable,
    }
}

/// Delay before retry number `attempt + 1`.
///
/// Non-finite or negative inputs fall back to safe values; the result never
/// exceeds `backoff.max` (itself capped at one day).
pub fn calculate_backoff(backoff: &ExponentialBackoff, attempt: usize) -> Duration {
    const MAX_BACKOFF_SECS: f64 = 86_400.0;

    let max_secs = backoff.max.as_secs_f64().min(MAX_BACKOFF_SECS);
    let multiplier = if backoff.multiplier.is_finite() && backoff.multiplier >= 0.0 {
        backoff.multiplier
    } else {
        1.0
    };
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let raw = backoff.initial.as_secs_f64() * multiplier.powi(exponent);
    let secs = if raw.is_finite() {
        raw.clamp(0.0, max_secs)
    } else {
        max_secs
    };

    let mut delay = Duration::from_secs_f64(secs);
    if backoff.jitter {
        delay += delay.mul_f64(rand::rng().random_range(0.0..=0.25));
    }
    delay.min(Duration::from_secs_f64(max_secs))
}
