//! Platform authenticator boundary.
//!
//! Device interaction is an awaited external call whose only outcomes are a
//! credential or one of a closed set of platform failures. Ceremonies cannot
//! cancel it; the platform's own timeout is the only interruption and it
//! surfaces as [`CeremonyFailure::TimedOut`].

use std::fmt;

use async_trait::async_trait;
use sha3::{Digest, Sha3_256};

use crate::codec;

use super::types::{PubKeyCredParam, RelyingParty};

/// Closed set of ceremony failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeremonyFailure {
    /// The user dismissed the platform prompt.
    Cancelled,
    /// The platform timed out waiting for the user or the device.
    TimedOut,
    /// The authenticator does not support the requested options.
    Unsupported,
    /// No authenticator hardware is present.
    DeviceNotFound,
    /// Another ceremony on this adapter is still awaiting the device.
    AlreadyInFlight,
}

impl fmt::Display for CeremonyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled by the user"),
            Self::TimedOut => write!(f, "timed out waiting for the device"),
            Self::Unsupported => write!(f, "authenticator does not support the requested options"),
            Self::DeviceNotFound => write!(f, "no authenticator is available"),
            Self::AlreadyInFlight => write!(f, "another ceremony is already in flight"),
        }
    }
}

/// Decoded request handed to the device for credential creation.
/// Every byte field was produced by the codec from the backend options.
#[derive(Debug, Clone)]
pub struct CredentialCreationRequest {
    pub challenge: Vec<u8>,
    pub rp: RelyingParty,
    pub user_id: Vec<u8>,
    pub user_name: String,
    pub user_display_name: String,
    pub pub_key_cred_params: Vec<PubKeyCredParam>,
    pub timeout_ms: u32,
    pub attestation: String,
    pub user_verification: String,
}

/// Decoded request handed to the device for assertion.
#[derive(Debug, Clone)]
pub struct AssertionRequest {
    pub challenge: Vec<u8>,
    pub rp_id: String,
    pub timeout_ms: u32,
    pub user_verification: String,
    /// Credential ids the backend will accept, each decoded individually.
    pub allowed_credentials: Vec<Vec<u8>>,
}

/// Binary credential returned by the device on registration.
#[derive(Debug, Clone)]
pub struct CreatedCredential {
    pub id: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub attestation_object: Vec<u8>,
}

/// Binary assertion returned by the device on authentication.
#[derive(Debug, Clone)]
pub struct Assertion {
    pub credential_id: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub authenticator_data: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
}

/// Trait for platform authenticators.
///
/// Implementations must be thread-safe (`Send + Sync`). The call suspends
/// until the device responds or fails; implementations must not retry.
#[async_trait]
pub trait PlatformAuthenticator: Send + Sync {
    async fn create_credential(
        &self,
        request: &CredentialCreationRequest,
    ) -> Result<CreatedCredential, CeremonyFailure>;

    async fn get_assertion(&self, request: &AssertionRequest)
        -> Result<Assertion, CeremonyFailure>;
}

/// Deterministic software authenticator.
///
/// Derives all credential bytes from a seed, so repeated ceremonies with the
/// same seed produce the same credential id. The `clientDataJSON` it builds
/// is protocol-shaped (`webauthn.create` / `webauthn.get`, base64url
/// challenge, origin); the attestation and signature bytes are fabricated,
/// which a verifying backend will reject. Intended for demos and tests of
/// the byte plumbing, not as a secure credential store.
pub struct SoftwareAuthenticator {
    seed: u64,
    origin: String,
    fail_with: Option<CeremonyFailure>,
}

impl SoftwareAuthenticator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            origin: "https://glyph.id".into(),
            fail_with: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Make every device call fail with the given reason.
    pub fn fail_with(mut self, failure: CeremonyFailure) -> Self {
        self.fail_with = Some(failure);
        self
    }

    fn derive(&self, domain: &str, parts: &[&[u8]]) -> Vec<u8> {
        let mut hasher = Sha3_256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(domain.as_bytes());
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().to_vec()
    }

    fn client_data(&self, kind: &str, challenge: &[u8]) -> Vec<u8> {
        serde_json::json!({
            "type": kind,
            "challenge": codec::encode(challenge),
            "origin": self.origin,
            "crossOrigin": false,
        })
        .to_string()
        .into_bytes()
    }
}

#[async_trait]
impl PlatformAuthenticator for SoftwareAuthenticator {
    async fn create_credential(
        &self,
        request: &CredentialCreationRequest,
    ) -> Result<CreatedCredential, CeremonyFailure> {
        if let Some(failure) = self.fail_with {
            return Err(failure);
        }
        if request.pub_key_cred_params.is_empty() {
            return Err(CeremonyFailure::Unsupported);
        }

        let id = self.derive("credential-id", &[&request.user_id, request.rp.id.as_bytes()]);
        Ok(CreatedCredential {
            client_data_json: self.client_data("webauthn.create", &request.challenge),
            attestation_object: self.derive("attestation", &[&id, &request.challenge]),
            id,
        })
    }

    async fn get_assertion(
        &self,
        request: &AssertionRequest,
    ) -> Result<Assertion, CeremonyFailure> {
        if let Some(failure) = self.fail_with {
            return Err(failure);
        }

        // Honor the allow list when the backend supplies one.
        let credential_id = request
            .allowed_credentials
            .first()
            .cloned()
            .unwrap_or_else(|| self.derive("credential-id", &[request.rp_id.as_bytes()]));

        Ok(Assertion {
            client_data_json: self.client_data("webauthn.get", &request.challenge),
            authenticator_data: self.derive("authenticator-data", &[request.rp_id.as_bytes()]),
            signature: self.derive("signature", &[&credential_id, &request.challenge]),
            credential_id,
            user_handle: None,
        })
    }
}
