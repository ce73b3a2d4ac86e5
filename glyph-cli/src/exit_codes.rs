//! Exit codes following sysexits.h conventions.
//!
//! These codes give scripts and CI systems semantic failure modes beyond a
//! bare non-zero status.

#![allow(dead_code)] // Constants may be used in future or for documentation

use glyph_core::GlyphError;

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// General error (catch-all), including an absent session.
pub const GENERAL_ERROR: i32 = 1;

/// Invalid arguments or locally rejected input.
/// Maps to EX_USAGE from sysexits.h.
pub const USAGE_ERROR: i32 = 64;

/// Ceremony failure or corrupt data (bad encoding, corrupt session).
/// Maps to EX_DATAERR from sysexits.h.
pub const CEREMONY_FAILED: i32 = 65;

/// Backend unreachable or returned an error.
/// Maps to EX_UNAVAILABLE from sysexits.h.
pub const NETWORK_ERROR: i32 = 69;

/// Local I/O error (session file, settings persistence).
/// Maps to EX_IOERR from sysexits.h.
pub const IO_ERROR: i32 = 74;

/// Represents an exit code with optional error context.
pub struct ExitCode {
    pub code: i32,
    pub message: Option<String>,
}

impl ExitCode {
    pub const fn success() -> Self {
        Self {
            code: SUCCESS,
            message: None,
        }
    }

    /// Classify an error chain by its `GlyphError` root cause.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let code = match err.downcast_ref::<GlyphError>() {
            Some(GlyphError::Validation(_)) => USAGE_ERROR,
            Some(
                GlyphError::Ceremony { .. } | GlyphError::Encoding(_) | GlyphError::SessionCorrupt,
            ) => CEREMONY_FAILED,
            Some(GlyphError::Api { .. } | GlyphError::Http(_)) => NETWORK_ERROR,
            Some(GlyphError::Io(_) | GlyphError::Persistence(_)) => IO_ERROR,
            Some(GlyphError::SessionAbsent) | None => GENERAL_ERROR,
        };

        Self {
            code,
            message: Some(format!("{err:#}")),
        }
    }
}
