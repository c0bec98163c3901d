/// Errors returned by the API client.
///
/// Server-returned statuses (4xx/5xx included) are not errors at this
/// layer; they come back as a normal [`Response`](crate::Response).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request path did not begin with `/`. Raised before any network
    /// activity; carries the offending path.
    #[error("path must begin with '/': {0}")]
    InvalidPath(String),

    /// The transfer finished without producing any response. Connect
    /// failure, name resolution failure and timeout are indistinguishable
    /// here; callers needing detail must talk to the transport directly.
    #[error("request timed out or connection failed")]
    ServiceUnavailable,
}

impl Error {
    /// HTTP-style classification of this error.
    pub fn status(&self) -> u16 {
        match self {
            Error::InvalidPath(_) => 400,
            Error::ServiceUnavailable => 503,
        }
    }
}
