use thiserror::Error;

/// Transport failure in the relay server or client.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed HTTP request")]
    MalformedRequest,

    #[error("timed out waiting for the request")]
    Timeout,
}
