//! Trust signals: wire types and the user-facing signal registry.
//!
//! Trust signals are auxiliary risk indicators computed by the backend and
//! carried in the token's extensions. The registry manages the user's
//! per-signal configuration: enablement, weighting and privacy retention.
//! Configuration changes are proposals submitted to the backend as one
//! document, never applied piecemeal.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::SettingsApi;
use crate::error::{GlyphError, Result};

/// Risk band thresholds, shared with the backend's scorer.
const BAND_HIGH_MIN: i64 = 70;
const BAND_MEDIUM_MIN: i64 = 30;

pub const RETENTION_MIN_DAYS: u32 = 30;
pub const RETENTION_MAX_DAYS: u32 = 365;

/// Trust signal block carried in a token's extensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustSignal {
    pub risk: TrustRisk,
}

/// Backend-computed risk summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustRisk {
    pub score: i64,
    pub band: RiskBand,
    pub updated_at: DateTime<Utc>,
    pub ttl_sec: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Band implied by a risk score. The band is always derived from the score;
/// the client never sets one independently.
pub fn expected_band(score: i64) -> RiskBand {
    let score = score.clamp(0, 100);
    if score >= BAND_HIGH_MIN {
        RiskBand::High
    } else if score >= BAND_MEDIUM_MIN {
        RiskBand::Medium
    } else {
        RiskBand::Low
    }
}

impl TrustRisk {
    /// Whether the backend's declared band matches the fixed thresholds.
    /// A mismatch is loggable, not fatal; the declared band is displayed.
    pub fn band_matches(&self) -> bool {
        expected_band(self.score) == self.band
    }
}

/// One configurable trust signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub provider: String,
    pub enabled: bool,
    pub weight: i32,
}

/// Privacy controls for trust-signal collection and retention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivacySettings {
    pub share_trust_signals: bool,
    pub anonymize_data: bool,
    pub retention_days: u32,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            share_trust_signals: true,
            anonymize_data: true,
            retention_days: 90,
        }
    }
}

/// The whole settings document. Fetched and submitted as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSettings {
    pub signals: Vec<SignalConfig>,
    pub privacy: PrivacySettings,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            signals: default_signals(),
            privacy: PrivacySettings::default(),
        }
    }
}

/// Fallback signal set, used only until the backend configuration is fetched.
fn default_signals() -> Vec<SignalConfig> {
    let signal = |id: &str, name: &str, description: &str, provider: &str, enabled, weight| {
        SignalConfig {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            provider: provider.into(),
            enabled,
            weight,
        }
    };
    vec![
        signal(
            "device_reputation",
            "Device reputation",
            "Scores device trustworthiness and flags known-bad devices",
            "Glyph Internal",
            true,
            30,
        ),
        signal(
            "ip_reputation",
            "IP reputation",
            "Detects abusive access via IP reputation databases",
            "MaxMind",
            true,
            25,
        ),
        signal(
            "behavioral_analysis",
            "Behavioral analysis",
            "Compares activity against the user's usual patterns",
            "Glyph ML",
            false,
            20,
        ),
        signal(
            "velocity_check",
            "Velocity check",
            "Flags bursts of login attempts in a short window",
            "Glyph Internal",
            true,
            25,
        ),
    ]
}

/// Staged view over the trust-signal configuration.
///
/// Edits accumulate in a staged copy; [`save`] submits the staged document
/// atomically. On failure the staged edits are rolled back so callers never
/// observe a partially-applied state.
///
/// [`save`]: TrustSignalRegistry::save
pub struct TrustSignalRegistry {
    applied: SignalSettings,
    staged: SignalSettings,
}

impl Default for TrustSignalRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TrustSignalRegistry {
    /// Registry seeded with the fallback defaults.
    pub fn new() -> Self {
        let settings = SignalSettings::default();
        Self {
            applied: settings.clone(),
            staged: settings,
        }
    }

    /// Current (staged) signal view.
    pub fn signals(&self) -> &[SignalConfig] {
        &self.staged.signals
    }

    /// Current (staged) privacy settings.
    pub fn privacy(&self) -> &PrivacySettings {
        &self.staged.privacy
    }

    /// Whether staged edits differ from the last applied state.
    pub fn dirty(&self) -> bool {
        self.staged != self.applied
    }

    /// Replace both applied and staged state with the backend configuration.
    pub async fn refresh<A: SettingsApi + ?Sized>(&mut self, api: &A) -> Result<()> {
        let settings = api.fetch_signal_settings().await?;
        debug!(signals = settings.signals.len(), "Fetched trust-signal settings");
        self.applied = settings.clone();
        self.staged = settings;
        Ok(())
    }

    /// Flip a signal's enablement in the staged state. Returns the new value.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        match self.staged.signals.iter_mut().find(|s| s.id == id) {
            Some(signal) => {
                signal.enabled = !signal.enabled;
                Ok(signal.enabled)
            }
            None => Err(GlyphError::Validation(format!("Unknown trust signal: {id}"))),
        }
    }

    /// Stage a new retention period. Rejected outside [30, 365] days.
    pub fn set_retention(&mut self, days: u32) -> Result<()> {
        if !(RETENTION_MIN_DAYS..=RETENTION_MAX_DAYS).contains(&days) {
            return Err(GlyphError::Validation(format!(
                "Retention must be between {RETENTION_MIN_DAYS} and {RETENTION_MAX_DAYS} days, got {days}"
            )));
        }
        self.staged.privacy.retention_days = days;
        Ok(())
    }

    /// Submit the staged document to the backend.
    ///
    /// On success the staged state becomes the applied state. On failure the
    /// staged edits are discarded and the registry reports a persistence
    /// error while remaining in the previous fully-applied state.
    pub async fn save<A: SettingsApi + ?Sized>(&mut self, api: &A) -> Result<()> {
        match api.submit_signal_settings(&self.staged).await {
            Ok(()) => {
                self.applied = self.staged.clone();
                info!("Trust-signal settings saved");
                Ok(())
            }
            Err(err) => {
                self.staged = self.applied.clone();
                Err(GlyphError::Persistence(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct StubSettingsApi {
        remote: Mutex<Option<SignalSettings>>,
        fail_submit: bool,
    }

    impl StubSettingsApi {
        fn new() -> Self {
            Self {
                remote: Mutex::new(None),
                fail_submit: false,
            }
        }

        fn failing() -> Self {
            Self {
                remote: Mutex::new(None),
                fail_submit: true,
            }
        }
    }

    #[async_trait]
    impl SettingsApi for StubSettingsApi {
        async fn fetch_signal_settings(&self) -> Result<SignalSettings> {
            Ok(self
                .remote
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_default())
        }

        async fn submit_signal_settings(&self, settings: &SignalSettings) -> Result<()> {
            if self.fail_submit {
                return Err(GlyphError::Api {
                    status: 503,
                    message: "settings service unavailable".into(),
                });
            }
            *self.remote.lock().unwrap() = Some(settings.clone());
            Ok(())
        }
    }

    #[test]
    fn test_expected_band_thresholds() {
        assert_eq!(expected_band(0), RiskBand::Low);
        assert_eq!(expected_band(29), RiskBand::Low);
        assert_eq!(expected_band(30), RiskBand::Medium);
        assert_eq!(expected_band(69), RiskBand::Medium);
        assert_eq!(expected_band(70), RiskBand::High);
        assert_eq!(expected_band(100), RiskBand::High);
        assert_eq!(expected_band(400), RiskBand::High);
    }

    #[test]
    fn test_retention_bounds() {
        let mut registry = TrustSignalRegistry::new();
        assert!(matches!(
            registry.set_retention(29),
            Err(GlyphError::Validation(_))
        ));
        assert!(matches!(
            registry.set_retention(366),
            Err(GlyphError::Validation(_))
        ));
        registry.set_retention(30).unwrap();
        assert_eq!(registry.privacy().retention_days, 30);
        registry.set_retention(365).unwrap();
        assert_eq!(registry.privacy().retention_days, 365);
    }

    #[test]
    fn test_toggle_flips_and_marks_dirty() {
        let mut registry = TrustSignalRegistry::new();
        assert!(!registry.dirty());

        let enabled = registry.toggle("behavioral_analysis").unwrap();
        assert!(enabled);
        assert!(registry.dirty());

        assert!(matches!(
            registry.toggle("nonexistent"),
            Err(GlyphError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_save_applies_staged_state() {
        let api = StubSettingsApi::new();
        let mut registry = TrustSignalRegistry::new();
        registry.toggle("ip_reputation").unwrap();
        registry.set_retention(180).unwrap();

        registry.save(&api).await.unwrap();
        assert!(!registry.dirty());

        let remote = api.remote.lock().unwrap().clone().unwrap();
        assert_eq!(remote.privacy.retention_days, 180);
        let ip = remote.signals.iter().find(|s| s.id == "ip_reputation").unwrap();
        assert!(!ip.enabled);
    }

    #[tokio::test]
    async fn test_failed_save_rolls_back_staged_edits() {
        let api = StubSettingsApi::failing();
        let mut registry = TrustSignalRegistry::new();
        registry.toggle("device_reputation").unwrap();

        let err = registry.save(&api).await.unwrap_err();
        assert!(matches!(err, GlyphError::Persistence(_)));

        // Previous fully-applied state is what callers see.
        assert!(!registry.dirty());
        let device = registry
            .signals()
            .iter()
            .find(|s| s.id == "device_reputation")
            .unwrap();
        assert!(device.enabled);
    }

    #[tokio::test]
    async fn test_refresh_replaces_defaults() {
        let api = StubSettingsApi::new();
        let mut custom = SignalSettings::default();
        custom.privacy.retention_days = 45;
        custom.signals.truncate(1);
        *api.remote.lock().unwrap() = Some(custom.clone());

        let mut registry = TrustSignalRegistry::new();
        registry.refresh(&api).await.unwrap();
        assert_eq!(registry.privacy().retention_days, 45);
        assert_eq!(registry.signals().len(), 1);
        assert!(!registry.dirty());
    }
}
