//! WebAuthn ceremonies.
//!
//! Bridges backend-issued binary challenges to a platform authenticator and
//! back. The backend speaks URL-safe base64 text; the device speaks bytes;
//! everything crossing that boundary goes through [`crate::codec`].
//!
//! ## Quick start
//!
//! ```no_run
//! use glyph_core::webauthn::{CeremonyAdapter, SoftwareAuthenticator};
//! use glyph_core::api::ApiClient;
//!
//! # async fn example() -> glyph_core::Result<()> {
//! let adapter = CeremonyAdapter::new(ApiClient::from_env()?, SoftwareAuthenticator::new(0));
//! let token = adapter.register("user@example.com").await?;
//! println!("assurance level: {}", token.aegis_assurance.level);
//! # Ok(())
//! # }
//! ```

mod authenticator;
mod ceremony;
pub mod types;

pub use authenticator::{
    Assertion, AssertionRequest, CeremonyFailure, CreatedCredential, CredentialCreationRequest,
    PlatformAuthenticator, SoftwareAuthenticator,
};
pub use ceremony::{validate_email, CeremonyAdapter, CeremonyState};
