use std::sync::Arc;

use http::header::HeaderName;
use tower::ServiceExt;

use crate::layer::SessionLayer;
use crate::session::SessionSource;

/// Session support for [`upkeep_http::HttpClientBuilder`].
///
/// ```ignore
/// use upkeep_session::HttpClientBuilderExt;
///
/// let client = HttpClientBuilder::new()
///     .with_session(store, DEFAULT_ORGANIZATION_HEADER)
///     .build()?;
/// ```
pub trait HttpClientBuilderExt {
    /// Attach the session from `source` to every attempt, sending the active
    /// organization in `organization_header`.
    #[must_use]
    fn with_session(self, source: Arc<dyn SessionSource>, organization_header: HeaderName)
    -> Self;
}

impl HttpClientBuilderExt for upkeep_http::HttpClientBuilder {
    fn with_session(
        self,
        source: Arc<dyn SessionSource>,
        organization_header: HeaderName,
    ) -> Self {
        let layer = SessionLayer::with_organization_header(source, organization_header);
        self.with_auth_layer(move |svc| {
            tower::ServiceBuilder::new()
                .layer(layer)
                .service(svc)
                .boxed_clone()
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::session::{DEFAULT_ORGANIZATION_HEADER, Session, SessionStore};
    use httpmock::prelude::*;
    use upkeep_http::HttpClientBuilder;
    use url::Url;

    #[tokio::test]
    async fn session_headers_reach_the_server() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/assets")
                .header("authorization", "Bearer tok-e2e")
                .header("x-organization-id", "org-3");
            then.status(200).body("[]");
        });

        let store = Arc::new(SessionStore::signed_in(
            Session::new("tok-e2e")
                .unwrap()
                .with_organization(Some("org-3"))
                .unwrap(),
        ));
        let client = HttpClientBuilder::new()
            .allow_insecure_http()
            .retry(None)
            .with_session(store, DEFAULT_ORGANIZATION_HEADER)
            .build()
            .unwrap();

        let url = Url::parse(&server.url("/api/assets")).unwrap();
        let resp = client.request(http::Method::GET, &url).send().await.unwrap();
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn signed_out_client_sends_no_authorization() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/assets")
                .header_missing("authorization")
                .header_missing("x-organization-id");
            then.status(200).body("[]");
        });

        let client = HttpClientBuilder::new()
            .allow_insecure_http()
            .retry(None)
            .with_session(Arc::new(SessionStore::new()), DEFAULT_ORGANIZATION_HEADER)
            .build()
            .unwrap();

        let url = Url::parse(&server.url("/api/assets")).unwrap();
        client.request(http::Method::GET, &url).send().await.unwrap();
        assert_eq!(mock.calls(), 1);
    }
}
