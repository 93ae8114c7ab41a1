//! Crate-wide error types. Library functions return one of these; the
//! binaries compose them behind `anyhow::Result` at the top level, matching
//! the teacher's `fn main() -> anyhow::Result<()>` convention.

use thiserror::Error;

/// A programmer error caught at construction time (§7, "Out-of-range
/// input"): misconfigured thresholds, inverted ROI, etc.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration for `{field}`: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

/// Errors raised while talking to an [`crate::backend::InputBackend`].
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend capability unavailable: {0}")]
    CapabilityUnavailable(String),
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

/// Errors raised by the relay or clipboard bridge's websocket handling.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Top-level crate error, used where a function can fail for more than one
/// of the reasons above.
#[derive(Debug, Error)]
pub enum HandpilotError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Net(#[from] NetError),
}
