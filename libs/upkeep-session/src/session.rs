use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use http::HeaderValue;
use http::header::HeaderName;
use zeroize::Zeroizing;

use crate::error::SessionError;
use crate::secret::SecretString;

/// Header that carries the active organization unless configured otherwise
pub const DEFAULT_ORGANIZATION_HEADER: HeaderName = HeaderName::from_static("x-organization-id");

/// Signed-in user: bearer token plus the optional active organization.
///
/// Header values are validated and rendered once, at construction, so
/// attaching them to a request cannot fail.
#[derive(Clone)]
pub struct Session {
    token: SecretString,
    organization: Option<String>,
    authorization: HeaderValue,
    organization_value: Option<HeaderValue>,
}

impl Session {
    /// # Errors
    /// `EmptyToken` for a blank token, `InvalidToken` when it cannot be sent
    /// as a header value.
    pub fn new(token: impl Into<SecretString>) -> Result<Self, SessionError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let raw = Zeroizing::new(format!("Bearer {}", token.expose()));
        let mut authorization =
            HeaderValue::from_str(&raw).map_err(SessionError::InvalidToken)?;
        authorization.set_sensitive(true);

        Ok(Self {
            token,
            organization: None,
            authorization,
            organization_value: None,
        })
    }

    /// Select the active organization; `None` clears it.
    ///
    /// # Errors
    /// `InvalidOrganization` when the id cannot be sent as a header value.
    pub fn with_organization(
        mut self,
        organization: Option<impl Into<String>>,
    ) -> Result<Self, SessionError> {
        match organization.map(Into::into) {
            Some(id) => {
                let value = HeaderValue::from_str(&id).map_err(|source| {
                    SessionError::InvalidOrganization {
                        id: id.clone(),
                        source,
                    }
                })?;
                self.organization_value = Some(value);
                self.organization = Some(id);
            }
            None => {
                self.organization = None;
                self.organization_value = None;
            }
        }
        Ok(self)
    }

    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    #[must_use]
    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    /// `Bearer <token>`, flagged sensitive.
    #[must_use]
    pub fn authorization_value(&self) -> &HeaderValue {
        &self.authorization
    }

    #[must_use]
    pub fn organization_value(&self) -> Option<&HeaderValue> {
        self.organization_value.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token)
            .field("organization", &self.organization)
            .finish_non_exhaustive()
    }
}

/// Where the client looks up the current session.
///
/// Called once per attempt from inside the middleware stack, so it must not
/// block.
pub trait SessionSource: Send + Sync {
    fn current(&self) -> Option<Arc<Session>>;
}

/// Source with no session; requests go out without credentials.
#[derive(Clone, Copy, Debug, Default)]
pub struct Anonymous;

impl SessionSource for Anonymous {
    fn current(&self) -> Option<Arc<Session>> {
        None
    }
}

/// Swappable session slot.
///
/// Reads are lock-free, so signing in or out never waits on requests in
/// flight; those finish with whatever session they already loaded.
#[derive(Default)]
pub struct SessionStore {
    slot: ArcSwapOption<Session>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn signed_in(session: Session) -> Self {
        Self {
            slot: ArcSwapOption::from_pointee(session),
        }
    }

    pub fn sign_in(&self, session: Session) {
        tracing::debug!(organization = ?session.organization(), "session stored");
        self.slot.store(Some(Arc::new(session)));
    }

    pub fn sign_out(&self) {
        tracing::debug!("session cleared");
        self.slot.store(None);
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.slot.load().is_some()
    }

    /// Switch the active organization of the current session.
    ///
    /// # Errors
    /// `NotSignedIn` without a session, `InvalidOrganization` for an id that
    /// cannot be sent as a header value.
    pub fn set_organization(&self, organization: Option<&str>) -> Result<(), SessionError> {
        let current = self.slot.load_full().ok_or(SessionError::NotSignedIn)?;
        let updated = Session::clone(&current).with_organization(organization)?;
        tracing::debug!(organization = ?updated.organization(), "active organization changed");
        self.slot.store(Some(Arc::new(updated)));
        Ok(())
    }
}

impl SessionSource for SessionStore {
    fn current(&self) -> Option<Arc<Session>> {
        self.slot.load_full()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.slot.load().as_deref())
            .finish()
    }
}
