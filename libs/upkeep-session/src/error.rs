use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("access token is empty")]
    EmptyToken,

    /// The token contains bytes that cannot appear in a header value
    #[error("access token is not a valid header value")]
    InvalidToken(#[source] http::header::InvalidHeaderValue),

    #[error("organization id '{id}' is not a valid header value")]
    InvalidOrganization {
        id: String,
        #[source]
        source: http::header::InvalidHeaderValue,
    },

    /// An organization was selected while nobody is signed in
    #[error("no active session")]
    NotSignedIn,
}
