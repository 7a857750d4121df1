//! Shows service client errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShowsError {
    #[error("Shows service returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Shows service transport error: {0}")]
    Transport(String),

    #[error("Failed to decode shows service response: {0}")]
    Decode(String),
}
