use http::StatusCode;
use thiserror::Error;
use upkeep_http::HttpError;

/// Errors returned by the gateway client
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// A call did not produce a usable 2xx answer.
    ///
    /// Displays as the fixed message of the call site, e.g. `Failed to fetch asset`.
    /// `status` is set when the gateway answered with a non-2xx status and is
    /// `None` when the exchange itself failed (transport, timeout, oversized or
    /// undecodable body).
    #[error("{message}")]
    RequestFailed {
        message: String,
        resource: String,
        status: Option<StatusCode>,
        #[source]
        source: Option<HttpError>,
    },

    /// The client could not be constructed
    #[error("invalid gateway configuration: {0}")]
    Config(String),
}

impl GatewayError {
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            Self::Config(_) => None,
        }
    }

    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::RequestFailed { resource, .. } => Some(resource.as_str()),
            Self::Config(_) => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }

    /// Body preview of the gateway's error answer, if any.
    #[must_use]
    pub fn body_preview(&self) -> Option<&str> {
        match self {
            Self::RequestFailed {
                source: Some(HttpError::HttpStatus { body_preview, .. }),
                ..
            } => Some(body_preview.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::error::Error;

    fn not_found() -> GatewayError {
        GatewayError::RequestFailed {
            message: "Failed to fetch asset".to_owned(),
            resource: "assets".to_owned(),
            status: Some(StatusCode::NOT_FOUND),
            source: Some(HttpError::HttpStatus {
                status: StatusCode::NOT_FOUND,
                body_preview: r#"{"error":"missing"}"#.to_owned(),
                retry_after: None,
            }),
        }
    }

    #[test]
    fn display_is_the_call_site_message() {
        assert_eq!(not_found().to_string(), "Failed to fetch asset");
    }

    #[test]
    fn accessors() {
        let err = not_found();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.resource(), Some("assets"));
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
        assert_eq!(err.body_preview(), Some(r#"{"error":"missing"}"#));
    }

    #[test]
    fn transport_source_is_preserved() {
        let err = GatewayError::RequestFailed {
            message: "Failed to fetch assets".to_owned(),
            resource: "assets".to_owned(),
            status: None,
            source: Some(HttpError::Timeout(std::time::Duration::from_secs(1))),
        };
        assert!(err.status().is_none());
        let source = err.source().unwrap();
        assert!(source.to_string().contains("timed out"));
    }

    #[test]
    fn config_error_has_no_status() {
        let err = GatewayError::Config("bad".to_owned());
        assert!(err.status().is_none());
        assert!(err.resource().is_none());
        assert_eq!(err.to_string(), "invalid gateway configuration: bad");
    }
}
