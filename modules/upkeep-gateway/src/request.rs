use bytes::Bytes;
use http::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use upkeep_http::HttpError;

use crate::error::GatewayError;

/// Resource name and failure message attached to every error of one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub resource: String,
    pub message: String,
}

impl CallSite {
    pub fn new(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub(crate) fn failed(&self, status: Option<StatusCode>, source: HttpError) -> GatewayError {
        GatewayError::RequestFailed {
            message: self.message.clone(),
            resource: self.resource.clone(),
            status,
            source: Some(source),
        }
    }

    pub(crate) fn decode<T: DeserializeOwned>(&self, value: Value) -> Result<T, GatewayError> {
        serde_json::from_value(value).map_err(|e| self.failed(None, HttpError::Json(e)))
    }
}

/// One call against the gateway, relative to `/api/`.
///
/// Static path pieces are split on `/`; dynamic pieces go through
/// [`segment`](Self::segment) and are percent-encoded on their own, so an
/// identifier such as `a/b` stays a single segment. A segment that is empty,
/// `.` or `..` fails the call without sending it.
#[derive(Debug)]
#[must_use]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) segments: Vec<String>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Result<Bytes, serde_json::Error>>,
    pub(crate) call_site: CallSite,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str) -> Self {
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
        let resource = segments.join("/");
        let call_site = CallSite::new(resource.clone(), format!("Request to {resource} failed"));
        Self {
            method,
            segments,
            query: Vec::new(),
            body: None,
            call_site,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: &str) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one path segment, escaped as a unit.
    pub fn segment(mut self, segment: impl AsRef<str>) -> Self {
        self.segments.push(segment.as_ref().to_owned());
        self
    }

    pub fn segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.segments
            .extend(segments.into_iter().map(|s| s.as_ref().to_owned()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn queries<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// JSON body. A serialization error is reported when the call runs.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.body = Some(serde_json::to_vec(body).map(Bytes::from));
        self
    }

    /// Resource name and message reported if the call fails.
    pub fn on_failure(mut self, resource: impl Into<String>, message: impl Into<String>) -> Self {
        self.call_site = CallSite::new(resource, message);
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn call_site(&self) -> &CallSite {
        &self.call_site
    }
}
