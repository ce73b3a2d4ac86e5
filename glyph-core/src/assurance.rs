//! Assurance score model.
//!
//! The backend computes scores and levels; this module only validates shape,
//! checks the declared pairing against the display contract, and formats
//! factors for display. It performs no network I/O and never rewrites
//! backend-provided values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Assurance level, ordered weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssuranceLevel {
    Alpha,
    Beta,
    Gamma,
}

impl fmt::Display for AssuranceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alpha => write!(f, "alpha"),
            Self::Beta => write!(f, "beta"),
            Self::Gamma => write!(f, "gamma"),
        }
    }
}

/// Assurance summary carried inside a Glyph token.
///
/// The raw `score` is kept verbatim so the persisted document matches the
/// wire response exactly; display paths go through [`clamped_score`].
///
/// [`clamped_score`]: AssuranceScore::clamped_score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssuranceScore {
    pub score: i64,
    pub level: AssuranceLevel,
    /// Factor type identifiers, order preserved for display.
    pub factors: Vec<String>,
    pub freshness_days: u32,
}

/// Backend-declared level disagrees with the display contract.
///
/// Non-fatal: the declared level stays authoritative, callers log this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssuranceInconsistency {
    pub declared: AssuranceLevel,
    pub expected: AssuranceLevel,
}

impl fmt::Display for AssuranceInconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "backend declared level {} where the score/factor pairing implies {}",
            self.declared, self.expected
        )
    }
}

impl AssuranceScore {
    /// Score clamped to the documented [0, 100] range.
    pub fn clamped_score(&self) -> u8 {
        self.score.clamp(0, 100) as u8
    }

    /// Level implied by the display contract: gamma needs a WebAuthn factor
    /// and a score of at least 80; beta needs at least 50.
    pub fn expected_level(&self) -> AssuranceLevel {
        expected_level(self.score, &self.factors)
    }

    /// Check the declared level against the display contract.
    pub fn consistency(&self) -> Option<AssuranceInconsistency> {
        let expected = self.expected_level();
        if expected == self.level {
            None
        } else {
            Some(AssuranceInconsistency {
                declared: self.level,
                expected,
            })
        }
    }
}

/// Display-contract level for a score and factor composition.
pub fn expected_level(score: i64, factors: &[String]) -> AssuranceLevel {
    let score = score.clamp(0, 100);
    if score >= 80 && factors.iter().any(|f| f == "webauthn") {
        AssuranceLevel::Gamma
    } else if score >= 50 {
        AssuranceLevel::Beta
    } else {
        AssuranceLevel::Alpha
    }
}

/// Human label for a factor type identifier.
///
/// Unknown identifiers render as-is so new backend factor types display
/// without a client update.
pub fn factor_label(factor: &str) -> &str {
    match factor {
        "webauthn" => "WebAuthn / Passkey",
        "google" => "Google",
        "microsoft" => "Microsoft",
        "github" => "GitHub",
        "x" | "twitter" => "X (Twitter)",
        "verified_email" => "Verified email",
        "kyc" => "KYC",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_gamma_requires_webauthn_and_80() {
        assert_eq!(
            expected_level(80, &factors(&["webauthn"])),
            AssuranceLevel::Gamma
        );
        assert_eq!(
            expected_level(100, &factors(&["webauthn", "google"])),
            AssuranceLevel::Gamma
        );
        // Same score without a WebAuthn factor is only beta.
        assert_eq!(
            expected_level(80, &factors(&["google"])),
            AssuranceLevel::Beta
        );
    }

    #[test]
    fn test_79_is_not_gamma() {
        assert_eq!(
            expected_level(79, &factors(&["webauthn"])),
            AssuranceLevel::Beta
        );
    }

    #[test]
    fn test_beta_band_ignores_factors() {
        for score in [50, 60, 79] {
            assert_eq!(expected_level(score, &[]), AssuranceLevel::Beta);
            assert_eq!(
                expected_level(score, &factors(&["webauthn"])),
                AssuranceLevel::Beta
            );
        }
    }

    #[test]
    fn test_alpha_band() {
        for score in [0, 25, 49] {
            assert_eq!(
                expected_level(score, &factors(&["webauthn", "google"])),
                AssuranceLevel::Alpha
            );
        }
    }

    #[test]
    fn test_out_of_range_scores_clamp() {
        assert_eq!(
            expected_level(150, &factors(&["webauthn"])),
            AssuranceLevel::Gamma
        );
        assert_eq!(expected_level(-10, &factors(&["webauthn"])), AssuranceLevel::Alpha);

        let score = AssuranceScore {
            score: 150,
            level: AssuranceLevel::Gamma,
            factors: factors(&["webauthn"]),
            freshness_days: 0,
        };
        assert_eq!(score.clamped_score(), 100);
    }

    #[test]
    fn test_consistency_flags_mismatch_without_correcting() {
        let score = AssuranceScore {
            score: 60,
            level: AssuranceLevel::Gamma,
            factors: factors(&["webauthn"]),
            freshness_days: 2,
        };
        let warning = score.consistency().expect("mismatch should be flagged");
        assert_eq!(warning.declared, AssuranceLevel::Gamma);
        assert_eq!(warning.expected, AssuranceLevel::Beta);
        // Declared level is untouched.
        assert_eq!(score.level, AssuranceLevel::Gamma);
    }

    #[test]
    fn test_consistency_ok_for_valid_pairing() {
        let score = AssuranceScore {
            score: 85,
            level: AssuranceLevel::Gamma,
            factors: factors(&["webauthn"]),
            freshness_days: 0,
        };
        assert!(score.consistency().is_none());
    }

    #[test]
    fn test_factor_labels() {
        assert_eq!(factor_label("webauthn"), "WebAuthn / Passkey");
        assert_eq!(factor_label("twitter"), "X (Twitter)");
        // Unknown factor types render generically.
        assert_eq!(factor_label("palmprint"), "palmprint");
    }

    #[test]
    fn test_level_serialization() {
        assert_eq!(
            serde_json::to_string(&AssuranceLevel::Gamma).unwrap(),
            "\"gamma\""
        );
        let level: AssuranceLevel = serde_json::from_str("\"alpha\"").unwrap();
        assert_eq!(level, AssuranceLevel::Alpha);
    }
}
