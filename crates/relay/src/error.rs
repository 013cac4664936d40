use crate::{ConfigError, RpcErrorPayload};
use reqwest::StatusCode;

/// Result type for [`RelayClient`] operations.
///
/// [`RelayClient`]: crate::RelayClient
pub type Result<T, E = RelayError> = std::result::Result<T, E>;

/// Errors returned by the [`RelayClient`].
///
/// Every variant produced from a relay response carries the raw response
/// body, so callers can report exactly what the relay said.
///
/// [`RelayClient`]: crate::RelayClient
#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    /// The bundle has no transactions. Raised before any request is made.
    #[error("bundle contains no transactions")]
    EmptyBundle,

    /// The relay could not be reached, or the request timed out.
    #[error("relay unavailable: {source}")]
    Unavailable {
        /// The transport error.
        #[source]
        source: reqwest::Error,
        /// The response body, if one was partially received.
        body: Option<String>,
    },

    /// The relay answered with an HTTP error status or a JSON-RPC error.
    #[error("relay rejected request (status: {status:?}): {body}")]
    Rejected {
        /// The HTTP status, if it was not a success status.
        status: Option<StatusCode>,
        /// The JSON-RPC error object, if the body contained one.
        payload: Option<RpcErrorPayload>,
        /// The raw response body.
        body: String,
    },

    /// The relay answered with something that is not the expected response.
    #[error("malformed relay response: {reason}")]
    Malformed {
        /// What was wrong with the response.
        reason: String,
        /// The raw response body.
        body: String,
    },

    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// An error occurred while parsing or joining a URL.
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// The client is missing configuration required for the request.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl RelayError {
    /// Create a [`RelayError::Malformed`].
    pub fn malformed(reason: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Malformed { reason: reason.into(), body: body.into() }
    }

    /// True if retrying the same request may succeed.
    ///
    /// Network failures, timeouts, rate limiting (429) and server errors
    /// (5xx) are transient. Resubmitting a whole bundle additionally needs a
    /// fresh blockhash, since the old one may have expired meanwhile.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable { .. } => true,
            Self::Rejected { status: Some(status), .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }

    /// The raw relay response body, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Unavailable { body, .. } => body.as_deref(),
            Self::Rejected { body, .. } | Self::Malformed { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The JSON-RPC error object, if the relay returned one.
    pub const fn payload(&self) -> Option<&RpcErrorPayload> {
        match self {
            Self::Rejected { payload: Some(payload), .. } => Some(payload),
            _ => None,
        }
    }
}
