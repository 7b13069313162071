#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("session storage: {0}")]
    Storage(#[from] std::io::Error),
    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    /// The server did not accept our credentials or token (401).
    #[error("not authenticated: {0}")]
    Unauthorized(String),
    /// Authenticated, but the role does not allow the call (403).
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("cart is empty")]
    EmptyCart,
}
