//! Registration and authentication ceremony orchestration.
//!
//! A ceremony walks `Idle → OptionsRequested → AwaitingDevice →
//! ResultSubmitted → Complete | Failed`, strictly in order: options are
//! fetched, binary fields decoded, the device invoked, the result encoded
//! and submitted. Any error makes the ceremony `Failed`; nothing is retried
//! automatically.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use tracing::{debug, info, instrument, warn};

use crate::api::AuthApi;
use crate::codec;
use crate::error::{GlyphError, Result};
use crate::token::GlyphToken;

use super::authenticator::{
    AssertionRequest, CeremonyFailure, CredentialCreationRequest, PlatformAuthenticator,
};
use super::types::{AuthenticationCredential, RegistrationCredential};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CeremonyState {
    Idle = 0,
    OptionsRequested = 1,
    AwaitingDevice = 2,
    ResultSubmitted = 3,
    Complete = 4,
    Failed = 5,
}

impl CeremonyState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::OptionsRequested,
            2 => Self::AwaitingDevice,
            3 => Self::ResultSubmitted,
            4 => Self::Complete,
            5 => Self::Failed,
            _ => Self::Idle,
        }
    }
}

/// Orchestrates WebAuthn ceremonies over a backend transport and a platform
/// authenticator.
///
/// One ceremony at a time per adapter instance: an advisory busy flag makes
/// a second concurrent start fail fast with
/// [`CeremonyFailure::AlreadyInFlight`]. The flag does not serialize other
/// adapter instances or other processes.
pub struct CeremonyAdapter<A, D> {
    api: A,
    device: D,
    busy: AtomicBool,
    state: AtomicU8,
}

/// Releases the busy flag on every exit path; an exit without an explicit
/// `complete()` records the ceremony as failed.
struct FlightGuard<'a> {
    busy: &'a AtomicBool,
    state: &'a AtomicU8,
    done: bool,
}

impl FlightGuard<'_> {
    fn transition(&self, state: CeremonyState) {
        debug!(state = ?state, "Ceremony state");
        self.state.store(state as u8, Ordering::Release);
    }

    fn complete(mut self) {
        self.done = true;
        self.state
            .store(CeremonyState::Complete as u8, Ordering::Release);
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.state
                .store(CeremonyState::Failed as u8, Ordering::Release);
        }
        self.busy.store(false, Ordering::Release);
    }
}

impl<A: AuthApi, D: PlatformAuthenticator> CeremonyAdapter<A, D> {
    pub fn new(api: A, device: D) -> Self {
        Self {
            api,
            device,
            busy: AtomicBool::new(false),
            state: AtomicU8::new(CeremonyState::Idle as u8),
        }
    }

    pub fn state(&self) -> CeremonyState {
        CeremonyState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn begin(&self) -> Result<FlightGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(GlyphError::Ceremony {
                reason: CeremonyFailure::AlreadyInFlight,
            });
        }
        Ok(FlightGuard {
            busy: &self.busy,
            state: &self.state,
            done: false,
        })
    }

    /// Run a registration ceremony and return the issued token.
    #[instrument(level = "info", skip_all)]
    pub async fn register(&self, email: &str) -> Result<GlyphToken> {
        validate_email(email)?;
        let guard = self.begin()?;

        guard.transition(CeremonyState::OptionsRequested);
        let options = self.api.register_start(email).await?;
        let challenge = codec::decode(&options.challenge)?;
        let user_id = codec::decode(&options.user.id)?;
        let request = CredentialCreationRequest {
            challenge,
            rp: options.rp,
            user_id,
            user_name: options.user.name,
            user_display_name: options.user.display_name,
            pub_key_cred_params: options.pub_key_cred_params,
            timeout_ms: options.timeout,
            attestation: options.attestation,
            user_verification: options.authenticator_selection.user_verification,
        };

        guard.transition(CeremonyState::AwaitingDevice);
        let created = self
            .device
            .create_credential(&request)
            .await
            .map_err(|reason| {
                warn!(%reason, "Authenticator failed during registration");
                GlyphError::Ceremony { reason }
            })?;

        guard.transition(CeremonyState::ResultSubmitted);
        let credential = RegistrationCredential::from_created(&created);
        let token = self.api.register_finish(email, &credential).await?;

        log_outcome(&token, "Registration ceremony complete");
        guard.complete();
        Ok(token)
    }

    /// Run an authentication ceremony and return the issued token.
    #[instrument(level = "info", skip_all)]
    pub async fn authenticate(&self, email: &str) -> Result<GlyphToken> {
        validate_email(email)?;
        let guard = self.begin()?;

        guard.transition(CeremonyState::OptionsRequested);
        let options = self.api.authenticate_start(email).await?;
        let challenge = codec::decode(&options.challenge)?;
        let allowed_credentials = options
            .allow_credentials
            .iter()
            .map(|c| codec::decode(&c.id))
            .collect::<Result<Vec<_>>>()?;
        let request = AssertionRequest {
            challenge,
            rp_id: options.rp_id,
            timeout_ms: options.timeout,
            user_verification: options.user_verification,
            allowed_credentials,
        };

        guard.transition(CeremonyState::AwaitingDevice);
        let assertion = self.device.get_assertion(&request).await.map_err(|reason| {
            warn!(%reason, "Authenticator failed during authentication");
            GlyphError::Ceremony { reason }
        })?;

        guard.transition(CeremonyState::ResultSubmitted);
        let credential = AuthenticationCredential::from_assertion(&assertion);
        let token = self.api.authenticate_finish(email, &credential).await?;

        log_outcome(&token, "Authentication ceremony complete");
        guard.complete();
        Ok(token)
    }
}

fn log_outcome(token: &GlyphToken, message: &'static str) {
    if let Some(warning) = token.aegis_assurance.consistency() {
        warn!(%warning, "Backend assurance pairing is inconsistent");
    }
    info!(
        score = token.aegis_assurance.clamped_score(),
        level = %token.aegis_assurance.level,
        "{message}"
    );
}

/// Minimal syntactic email check; the backend performs the authoritative
/// validation. Rejects before any network call is made.
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(GlyphError::Validation("Email is required".into()));
    }
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    });
    if !valid {
        return Err(GlyphError::Validation(format!(
            "Invalid email address: {email}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_accepts_plain_addresses() {
        validate_email("user@example.com").unwrap();
        validate_email("a.b+c@sub.example.org").unwrap();
        validate_email("  padded@example.com  ").unwrap();
    }

    #[test]
    fn test_validate_email_rejects_invalid_input() {
        for bad in ["", "   ", "no-at-sign", "@example.com", "a@b@c.com", "a@nodot", "a@.com", "a@com."] {
            assert!(
                matches!(validate_email(bad), Err(GlyphError::Validation(_))),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn test_state_round_trips_through_u8() {
        for state in [
            CeremonyState::Idle,
            CeremonyState::OptionsRequested,
            CeremonyState::AwaitingDevice,
            CeremonyState::ResultSubmitted,
            CeremonyState::Complete,
            CeremonyState::Failed,
        ] {
            assert_eq!(CeremonyState::from_u8(state as u8), state);
        }
    }
}
