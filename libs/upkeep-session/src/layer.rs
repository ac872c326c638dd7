use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use http::header::{AUTHORIZATION, HeaderName};
use http::{Request, Response};
use tower::{Layer, Service};
use upkeep_http::HttpError;

use crate::session::{DEFAULT_ORGANIZATION_HEADER, SessionSource};

/// Attaches the current session to outbound requests.
///
/// With a session: `Authorization: Bearer <token>`, plus the organization
/// header when an organization is active. Without one, neither header is sent.
#[derive(Clone)]
pub struct SessionLayer {
    source: Arc<dyn SessionSource>,
    organization_header: HeaderName,
}

impl SessionLayer {
    #[must_use]
    pub fn new(source: Arc<dyn SessionSource>) -> Self {
        Self::with_organization_header(source, DEFAULT_ORGANIZATION_HEADER)
    }

    #[must_use]
    pub fn with_organization_header(
        source: Arc<dyn SessionSource>,
        organization_header: HeaderName,
    ) -> Self {
        Self {
            source,
            organization_header,
        }
    }
}

impl std::fmt::Debug for SessionLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLayer")
            .field("organization_header", &self.organization_header)
            .finish_non_exhaustive()
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionService {
            inner,
            source: Arc::clone(&self.source),
            organization_header: self.organization_header.clone(),
        }
    }
}

/// Service produced by [`SessionLayer`]
#[derive(Clone)]
pub struct SessionService<S> {
    inner: S,
    source: Arc<dyn SessionSource>,
    organization_header: HeaderName,
}

impl<S, B, ResBody> Service<Request<B>> for SessionService<S>
where
    S: Service<Request<B>, Response = Response<ResBody>, Error = HttpError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
    B: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = HttpError;
    type Future = Pin<Box<dyn Future<Output = Result<Response<ResBody>, HttpError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let headers = req.headers_mut();
        headers.remove(AUTHORIZATION);
        headers.remove(&self.organization_header);

        if let Some(session) = self.source.current() {
            headers.insert(AUTHORIZATION, session.authorization_value().clone());
            if let Some(org) = session.organization_value() {
                headers.insert(self.organization_header.clone(), org.clone());
            }
        } else {
            tracing::trace!("no session; sending request without credentials");
        }

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}
