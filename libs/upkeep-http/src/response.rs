use crate::error::HttpError;
use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::de::DeserializeOwned;
use std::time::{Duration, SystemTime};

/// Bytes of a non-2xx body kept for diagnostics
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

/// Type-erased response body (possibly decompressed)
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// Parse `Retry-After` as either delay-seconds or an HTTP-date.
///
/// Returns `None` when the header is missing, malformed, negative or already in the past.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(http::header::RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    if value.starts_with('-') {
        return None;
    }

    let at = httpdate::parse_http_date(value).ok()?;
    at.duration_since(SystemTime::now()).ok()
}

/// Response from the transport
///
/// Every body read is capped at the client's `max_body_size`.
#[derive(Debug)]
pub struct HttpResponse {
    pub(crate) inner: Response<ResponseBody>,
    pub(crate) max_body_size: usize,
}

impl HttpResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Read the whole body without looking at the status.
    ///
    /// # Errors
    /// `BodyTooLarge` past the size cap, `Transport` if the stream fails.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        read_limited(self.inner.into_body(), self.max_body_size).await
    }

    /// Read and deserialize a JSON body, failing on non-2xx statuses.
    ///
    /// # Errors
    /// `HttpStatus` for non-2xx, `BodyTooLarge`, `Transport` or `Json` otherwise.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        if !self.status().is_success() {
            return Err(self.into_status_error().await);
        }
        let body = self.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Consume a (non-2xx) response into an `HttpStatus` error with a body preview.
    pub async fn into_status_error(self) -> HttpError {
        let status = self.inner.status();
        let retry_after = parse_retry_after(self.inner.headers());
        let body_preview = match read_limited(self.inner.into_body(), ERROR_BODY_PREVIEW_LIMIT).await {
            Ok(body) => String::from_utf8_lossy(&body).into_owned(),
            Err(HttpError::BodyTooLarge { .. }) => "<body too large for preview>".to_owned(),
            Err(_) => String::new(),
        };
        HttpError::HttpStatus {
            status,
            body_preview,
            retry_after,
        }
    }
}

async fn read_limited(body: ResponseBody, limit: usize) -> Result<Bytes, HttpError> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            Err(HttpError::BodyTooLarge { limit })
        }
        Err(err) => Err(HttpError::Transport(err)),
    }
}
