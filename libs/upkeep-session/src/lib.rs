#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Session state for the Upkeep gateway client
//!
//! A [`Session`] carries the bearer token and the active organization. The
//! client reads it through the [`SessionSource`] trait on every attempt, so a
//! sign-in, sign-out or organization switch applies to the next request
//! without rebuilding anything.
//!
//! ```ignore
//! use upkeep_session::{HttpClientBuilderExt, Session, SessionStore};
//!
//! let store = Arc::new(SessionStore::new());
//! let client = upkeep_http::HttpClient::builder()
//!     .with_session(store.clone(), DEFAULT_ORGANIZATION_HEADER.clone())
//!     .build()?;
//!
//! store.sign_in(Session::new("eyJhbGciOi...")?.with_organization(Some("org-7"))?);
//! ```

mod builder_ext;
mod error;
mod layer;
mod secret;
mod session;

pub use builder_ext::HttpClientBuilderExt;
pub use error::SessionError;
pub use layer::{SessionLayer, SessionService};
pub use secret::SecretString;
pub use session::{
    Anonymous, DEFAULT_ORGANIZATION_HEADER, Session, SessionSource, SessionStore,
};
