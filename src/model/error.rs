use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The backend answered `ok: false`
    #[error("Request rejected: {0}")]
    Remote(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Song search unavailable: {0}")]
    SearchUnavailable(String),

    #[error("Network error: {0}")]
    Network(String),
}
