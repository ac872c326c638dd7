use crate::client::{BufferedService, map_buffer_error};
use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::response::HttpResponse;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, Request};
use http_body_util::Full;
use serde::Serialize;
use tower::{Service, ServiceExt};
use url::Url;

/// Request under construction
///
/// Created by [`HttpClient::request`](crate::HttpClient::request). Errors
/// raised while building (for example a body that fails to serialize) are
/// held back and returned by [`send`](Self::send).
#[must_use = "RequestBuilder does nothing until .send() is called"]
pub struct RequestBuilder {
    service: BufferedService,
    max_body_size: usize,
    method: http::Method,
    url: Url,
    headers: HeaderMap,
    body: Bytes,
    error: Option<HttpError>,
    transport_security: TransportSecurity,
}

impl RequestBuilder {
    pub(crate) fn new(
        service: BufferedService,
        max_body_size: usize,
        method: http::Method,
        url: Url,
        transport_security: TransportSecurity,
    ) -> Self {
        Self {
            service,
            max_body_size,
            method,
            url,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            error: None,
            transport_security,
        }
    }

    /// Set a header, replacing any previous value under the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Serialize `body` as JSON. Sets `Content-Type: application/json` unless
    /// a content type was already supplied.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        if self.error.is_some() {
            return self;
        }
        match serde_json::to_vec(body) {
            Ok(bytes) => {
                self.body = Bytes::from(bytes);
                if !self.headers.contains_key(CONTENT_TYPE) {
                    self.headers
                        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
            }
            Err(e) => self.error = Some(HttpError::Json(e)),
        }
        self
    }

    /// Raw body; the caller owns the content type.
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    fn validate_url(&self) -> Result<http::Uri, HttpError> {
        match self.url.scheme() {
            "https" => {}
            "http" if self.transport_security == TransportSecurity::AllowInsecureHttp => {}
            "http" => {
                return Err(HttpError::InvalidScheme {
                    scheme: "http".to_owned(),
                    reason: "HTTPS required (transport security is TlsOnly)".to_owned(),
                });
            }
            other => {
                return Err(HttpError::InvalidScheme {
                    scheme: other.to_owned(),
                    reason: "only http:// and https:// are supported".to_owned(),
                });
            }
        }

        self.url
            .as_str()
            .parse::<http::Uri>()
            .map_err(|e| HttpError::InvalidUrl {
                url: self.url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Send the request.
    ///
    /// Non-2xx statuses come back as `Ok`; see [`HttpResponse::json`] for a
    /// status-checking read.
    ///
    /// # Errors
    /// Deferred build errors, scheme violations, transport failures, timeouts
    /// and an exhausted deadline.
    pub async fn send(mut self) -> Result<HttpResponse, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        let uri = self.validate_url()?;

        let mut request = Request::builder()
            .method(self.method)
            .uri(uri)
            .body(Full::new(self.body))?;
        *request.headers_mut() = self.headers;

        let inner = self
            .service
            .ready()
            .await
            .map_err(map_buffer_error)?
            .call(request)
            .await
            .map_err(map_buffer_error)?;

        Ok(HttpResponse {
            inner,
            max_body_size: self.max_body_size,
        })
    }
}
