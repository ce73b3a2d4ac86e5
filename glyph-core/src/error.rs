use thiserror::Error;

use crate::webauthn::CeremonyFailure;

#[derive(Error, Debug)]
pub enum GlyphError {
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Ceremony failed: {reason}")]
    Ceremony { reason: CeremonyFailure },

    /// Application-level backend error. The message is the backend's `detail`
    /// field when present, otherwise `HTTP <status>`.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A settings or session document failed to persist.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("No session token is present")]
    SessionAbsent,

    #[error("Persisted session token is corrupt")]
    SessionCorrupt,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GlyphError>;
