/// Errors surfaced by the client auth flow.
#[derive(Debug, thiserror::Error)]
pub enum AuthClientError {
    /// The auth service rejected the request. Carries the message from the
    /// service's `{"error": ...}` body, surfaced to the UI as-is.
    #[error("{0}")]
    Rejected(String),
    /// The request never produced a usable response.
    #[error("transport error")]
    Transport(#[from] anyhow::Error),
}
