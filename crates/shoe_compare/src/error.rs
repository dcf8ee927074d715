//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("API error: {0}")]
    Api(#[from] strava_client::StravaError),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for application operations.
pub type AppResult<T> = Result<T, AppError>;
