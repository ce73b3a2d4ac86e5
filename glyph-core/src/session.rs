//! Persisted session token store.
//!
//! One serialized `GlyphToken` document at a fixed path, wire schema
//! verbatim. All session access goes through this store; there are no
//! implicit background reads. Writers across processes are unserialized
//! (last write wins), but a reader always sees either a complete document
//! or none at all.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{GlyphError, Result};
use crate::token::GlyphToken;

pub struct TokenSessionStore {
    path: PathBuf,
}

impl TokenSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location `$HOME/.glyph/session.json`, overridable via the
    /// `GLYPH_SESSION_FILE` environment variable.
    pub fn from_env() -> Self {
        let path = std::env::var("GLYPH_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
                Path::new(&home).join(".glyph").join("session.json")
            });
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted token.
    ///
    /// An absent document is `Ok(None)`, not an error. An unparseable
    /// document clears the file and returns [`GlyphError::SessionCorrupt`],
    /// so the next `load` starts from a clean absent state.
    pub fn load(&self) -> Result<Option<GlyphToken>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No session document");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Session document is corrupt, clearing"
                );
                self.clear()?;
                Err(GlyphError::SessionCorrupt)
            }
        }
    }

    /// `load` for flows that need a session: absence becomes
    /// [`GlyphError::SessionAbsent`].
    pub fn require(&self) -> Result<GlyphToken> {
        self.load()?.ok_or(GlyphError::SessionAbsent)
    }

    /// Replace the persisted document atomically.
    ///
    /// The token is written to a sibling temp file and renamed over the
    /// target, so an interrupted save leaves the previous document intact.
    pub fn save(&self, token: &GlyphToken) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec(token)
            .map_err(|e| GlyphError::Persistence(format!("Failed to serialize session token: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Session token saved");
        Ok(())
    }

    /// Remove the persisted document. Idempotent.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session token cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
