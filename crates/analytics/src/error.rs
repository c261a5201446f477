use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the OAuth credential exchange.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A credential field was empty or missing. No request was sent.
    #[error("Missing Zoom credential: {0}")]
    MissingCredential(&'static str),

    /// The token endpoint answered with a non-2xx status.
    #[error("Token exchange rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The token endpoint did not answer within the configured bound.
    #[error("Token exchange timed out")]
    Timeout,

    /// The token request could not be sent.
    #[error("Token exchange failed: {0}")]
    Transport(String),

    /// The token endpoint answered 2xx without a usable access token.
    #[error("Token response could not be read: {0}")]
    MalformedResponse(String),
}

/// Errors of the analytics pipeline. Missing or unparseable fields inside
/// records are never reported here; those records are dropped instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Authentication against the token endpoint failed.
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// An analytics page request returned a non-2xx status.
    #[error("Zoom API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// An analytics page request did not complete within its bound.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// An analytics page request could not be sent.
    #[error("Connection error: {0}")]
    Connection(String),

    /// An analytics page body was not a JSON object.
    #[error("Malformed analytics response: {0}")]
    MalformedResponse(String),

    /// The configured page cap was reached while the provider still returned
    /// a next page token.
    #[error("Stopped after {max_pages} pages, the provider kept returning a next page token")]
    PageLimitExceeded { max_pages: usize },
}

impl Error {
    /// Upstream HTTP status, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Auth(AuthError::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure happened while obtaining an access token.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}
