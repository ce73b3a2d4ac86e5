//! Glyph Core - client library for Glyph identity assurance
//!
//! This crate implements the client side of Glyph multi-factor
//! authentication: WebAuthn ceremonies against the backend's `/auth`
//! surface, the assurance-score and trust-signal data model, and the
//! persisted session-token lifecycle.
//!
//! # Components
//!
//! - URL-safe binary codec for challenge/credential fields
//! - Typed API client with normalized backend errors
//! - Ceremony adapter bridging backend challenges to a platform
//!   authenticator
//! - Assurance score model (pure; the backend computes, the client checks
//!   and formats)
//! - Trust-signal registry with staged, atomically-saved settings
//! - File-backed session token store with corruption recovery
//!
//! # Example
//!
//! ```no_run
//! use glyph_core::{ApiClient, CeremonyAdapter, SoftwareAuthenticator, TokenSessionStore};
//!
//! # async fn example() -> glyph_core::Result<()> {
//! let adapter = CeremonyAdapter::new(ApiClient::from_env()?, SoftwareAuthenticator::new(0));
//!
//! // Registration enrolls a new credential and yields a session token.
//! let token = adapter.register("user@example.com").await?;
//! assert_eq!(token.token_type, "Bearer");
//!
//! // The token is persisted verbatim and owned by the session store.
//! let store = TokenSessionStore::from_env();
//! store.save(&token)?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod assurance;
pub mod codec;
pub mod error;
pub mod session;
pub mod token;
pub mod trust;
pub mod webauthn;

// Re-export main types for convenience
pub use api::{ApiClient, ApiConfig, AuthApi, OauthProvider, SettingsApi};
pub use assurance::{factor_label, AssuranceInconsistency, AssuranceLevel, AssuranceScore};
pub use error::{GlyphError, Result};
pub use session::TokenSessionStore;
pub use token::{AuthFactor, FactorType, GlyphToken, TokenExtensions, User};
pub use trust::{
    expected_band, PrivacySettings, RiskBand, SignalConfig, SignalSettings, TrustRisk,
    TrustSignal, TrustSignalRegistry,
};
pub use webauthn::{
    CeremonyAdapter, CeremonyFailure, CeremonyState, PlatformAuthenticator, SoftwareAuthenticator,
};
