//! Error types for the certificate renderer

use thiserror::Error;

/// Result type alias for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating or rendering a certificate
#[derive(Error, Debug)]
pub enum Error {
    /// One or more required fields are absent or empty
    #[error("Missing required parameters: {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    /// The request body could not be parsed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failed to build or rasterize the drawing surface
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to encode the finished surface
    #[error("Encoding failed: {0}")]
    EncodeError(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than the
    /// renderer itself.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation { .. } | Error::InvalidRequest(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidRequest(err.to_string())
    }
}
