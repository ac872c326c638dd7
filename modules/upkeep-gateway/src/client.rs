use std::sync::Arc;

use http::HeaderValue;
use http::header::{CONTENT_TYPE, HeaderName};
use serde::de::DeserializeOwned;
use serde_json::Value;
use upkeep_http::{HttpClient, HttpClientBuilder, HttpError};
use upkeep_session::{Anonymous, HttpClientBuilderExt, SessionSource};
use url::Url;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::request::ApiRequest;

/// Entry point for every gateway call.
///
/// Cheap to clone; clones share the connection pool and the session source.
#[derive(Clone)]
pub struct GatewayClient {
    http: HttpClient,
    api_root: Arc<Url>,
}

impl GatewayClient {
    /// Build a client that reads credentials from `session` on every attempt.
    ///
    /// Must be called inside a Tokio runtime.
    ///
    /// # Errors
    /// `Config` for an unusable base URL (including `http://` without
    /// `allow_insecure_http`), an invalid organization header name or user
    /// agent, or TLS initialization failure.
    pub fn new(config: &GatewayConfig, session: Arc<dyn SessionSource>) -> Result<Self, GatewayError> {
        let api_root = api_root(config)?;
        let organization_header = HeaderName::from_bytes(
            config.organization_header.to_ascii_lowercase().as_bytes(),
        )
        .map_err(|e| {
            GatewayError::Config(format!(
                "organization header '{}': {e}",
                config.organization_header
            ))
        })?;

        let http = HttpClientBuilder::with_config(config.http_config())
            .with_session(session, organization_header)
            .build()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        tracing::debug!(api_root = %api_root, "gateway client ready");
        Ok(Self {
            http,
            api_root: Arc::new(api_root),
        })
    }

    /// Client that never sends credentials.
    ///
    /// # Errors
    /// Same as [`new`](Self::new).
    pub fn anonymous(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Self::new(config, Arc::new(Anonymous))
    }

    /// `<base_url>/api/`
    #[must_use]
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// Perform `request` and return the decoded JSON body.
    ///
    /// Every request carries `Content-Type: application/json`. An empty 2xx
    /// body decodes as `null`.
    ///
    /// # Errors
    /// `RequestFailed` with the request's call site on a non-2xx answer
    /// (`status` set) or when the exchange fails (`status` is `None`).
    pub async fn call_value(&self, request: ApiRequest) -> Result<Value, GatewayError> {
        let ApiRequest {
            method,
            segments,
            query,
            body,
            call_site,
        } = request;

        let url = self
            .url_for(&segments, &query)
            .map_err(|e| call_site.failed(None, e))?;
        let body = body
            .transpose()
            .map_err(|e| call_site.failed(None, HttpError::Json(e)))?;

        tracing::debug!(
            method = %method,
            path = %url.path(),
            resource = %call_site.resource,
            "gateway call"
        );

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(
                method = %method,
                path = %url.path(),
                resource = %call_site.resource,
                error = %e,
                "gateway call failed"
            );
            call_site.failed(None, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let err = response.into_status_error().await;
            tracing::warn!(
                method = %method,
                path = %url.path(),
                resource = %call_site.resource,
                status = status.as_u16(),
                "gateway rejected call"
            );
            return Err(call_site.failed(Some(status), err));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| call_site.failed(None, e))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| call_site.failed(None, HttpError::Json(e)))
    }

    /// [`call_value`](Self::call_value), decoded into `T`.
    ///
    /// # Errors
    /// As `call_value`, plus `RequestFailed` without a status when the body
    /// does not match `T`.
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, GatewayError> {
        let call_site = request.call_site.clone();
        let value = self.call_value(request).await?;
        call_site.decode(value)
    }

    /// `segments` are pushed one by one so `/`, `?` and `%` inside them are
    /// escaped. Empty, `.` and `..` segments would collapse into the parent
    /// path and are refused before anything is sent.
    fn url_for(&self, segments: &[String], query: &[(String, String)]) -> Result<Url, HttpError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| matches!(s.as_str(), "" | "." | ".."))
        {
            return Err(HttpError::InvalidUrl {
                url: format!("{}{}", self.api_root, segments.join("/")),
                reason: format!("path segment '{bad}' does not name a record"),
            });
        }

        let mut url = Url::clone(&self.api_root);
        // api_root was checked to be a base URL at construction
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("api_root", &self.api_root.as_str())
            .finish_non_exhaustive()
    }
}

fn api_root(config: &GatewayConfig) -> Result<Url, GatewayError> {
    let base = &config.base_url;
    match base.scheme() {
        "https" => {}
        "http" if config.allow_insecure_http => {
            tracing::warn!(base_url = %base, "gateway reached over plain HTTP");
        }
        "http" => {
            return Err(GatewayError::Config(format!(
                "base_url '{base}' uses http:// but allow_insecure_http is false"
            )));
        }
        other => {
            return Err(GatewayError::Config(format!(
                "base_url scheme '{other}' is not supported"
            )));
        }
    }

    let mut root = base.clone();
    root.set_query(None);
    root.set_fragment(None);
    root.path_segments_mut()
        .map_err(|()| GatewayError::Config(format!("base_url '{base}' cannot be a base")))?
        .pop_if_empty()
        .push("api")
        .push("");
    Ok(root)
}
