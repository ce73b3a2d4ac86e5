//! Wire types for users, factors and the Glyph session token.
//!
//! All of these are issued and mutated by the backend; the client receives,
//! validates shape and displays. Serde field names match the wire schema
//! exactly so persisted documents are byte-compatible with the responses
//! they came from.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assurance::AssuranceScore;
use crate::trust::TrustSignal;

/// Backend-issued identity record. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorType {
    Webauthn,
    Oauth,
}

/// One proof of identity attached to a user. The client treats the factor
/// list as read-only evidence contributing to an assurance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthFactor {
    pub id: String,
    pub user_id: String,
    pub factor_type: FactorType,
    pub provider: String,
    pub provider_user_id: String,
    /// Opaque per-factor payload; rendered without decoding.
    #[serde(default)]
    pub extra_data: serde_json::Map<String, serde_json::Value>,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Session artifact issued on ceremony or OAuth success.
///
/// Immutable once issued; any change requires re-authentication. This is the
/// unit of persistence for [`TokenSessionStore`].
///
/// [`TokenSessionStore`]: crate::session::TokenSessionStore
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphToken {
    pub access_token: String,
    pub token_type: String,
    pub aegis_assurance: AssuranceScore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<TokenExtensions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenExtensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_signals: Option<TrustSignal>,
}

impl GlyphToken {
    pub fn trust_signals(&self) -> Option<&TrustSignal> {
        self.extensions.as_ref().and_then(|e| e.trust_signals.as_ref())
    }
}

impl fmt::Debug for GlyphToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("aegis_assurance", &self.aegis_assurance)
            .field("extensions", &self.extensions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::assurance::AssuranceLevel;

    use super::*;

    fn sample_token() -> GlyphToken {
        serde_json::from_value(serde_json::json!({
            "access_token": "tok1",
            "token_type": "Bearer",
            "aegis_assurance": {
                "score": 85,
                "level": "gamma",
                "factors": ["webauthn"],
                "freshness_days": 0
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_wire_round_trip_is_verbatim() {
        let wire = serde_json::json!({
            "access_token": "tok1",
            "token_type": "Bearer",
            "aegis_assurance": {
                "score": 85,
                "level": "gamma",
                "factors": ["webauthn", "google"],
                "freshness_days": 3
            },
            "extensions": {
                "trust_signals": {
                    "risk": {
                        "score": 12,
                        "band": "low",
                        "updated_at": "2025-06-01T12:00:00Z",
                        "ttl_sec": 604800
                    }
                }
            }
        });
        let token: GlyphToken = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(serde_json::to_value(&token).unwrap(), wire);
    }

    #[test]
    fn test_missing_extensions_stay_absent() {
        let token = sample_token();
        assert!(token.extensions.is_none());
        assert!(token.trust_signals().is_none());
        let out = serde_json::to_value(&token).unwrap();
        assert!(out.get("extensions").is_none());
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let token = sample_token();
        let debug = format!("{token:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("tok1"));
    }

    #[test]
    fn test_unknown_factor_types_deserialize() {
        let token: GlyphToken = serde_json::from_value(serde_json::json!({
            "access_token": "t",
            "token_type": "Bearer",
            "aegis_assurance": {
                "score": 55,
                "level": "beta",
                "factors": ["webauthn", "palmprint"],
                "freshness_days": 1
            }
        }))
        .unwrap();
        assert_eq!(token.aegis_assurance.factors[1], "palmprint");
        assert_eq!(token.aegis_assurance.level, AssuranceLevel::Beta);
    }

    #[test]
    fn test_auth_factor_deserializes_with_opaque_extra_data() {
        let factor: AuthFactor = serde_json::from_value(serde_json::json!({
            "id": "f1",
            "user_id": "u1",
            "factor_type": "oauth",
            "provider": "google",
            "provider_user_id": "g-123",
            "extra_data": {"picture": "https://example.com/p.png", "nested": {"a": 1}},
            "weight": 25.0,
            "created_at": "2025-01-01T00:00:00Z",
            "last_used_at": "2025-06-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(factor.factor_type, FactorType::Oauth);
        assert!(factor.extra_data.contains_key("nested"));
    }
}
