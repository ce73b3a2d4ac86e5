//! WebAuthn wire types.
//!
//! Mirrors the backend's option and credential JSON: binary fields
//! (challenge, user handle, credential ids) travel as URL-safe base64 text
//! and are decoded/encoded at the adapter boundary by the codec.

use serde::{Deserialize, Serialize};

use crate::codec;

use super::authenticator::{Assertion, CreatedCredential};

/// Options returned by `/webauthn/register/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationOptions {
    /// Text-encoded challenge bytes.
    pub challenge: String,
    pub rp: RelyingParty,
    pub user: UserDescriptor,
    #[serde(rename = "pubKeyCredParams")]
    pub pub_key_cred_params: Vec<PubKeyCredParam>,
    /// Device interaction timeout in milliseconds.
    pub timeout: u32,
    pub attestation: String,
    #[serde(rename = "authenticatorSelection")]
    pub authenticator_selection: AuthenticatorSelection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelyingParty {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDescriptor {
    /// Text-encoded user handle bytes.
    pub id: String,
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubKeyCredParam {
    #[serde(rename = "type")]
    pub kind: String,
    /// COSE algorithm identifier.
    pub alg: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatorSelection {
    #[serde(rename = "userVerification")]
    pub user_verification: String,
}

/// Options returned by `/webauthn/authenticate/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationOptions {
    pub challenge: String,
    #[serde(rename = "rpId")]
    pub rp_id: String,
    pub timeout: u32,
    #[serde(rename = "userVerification")]
    pub user_verification: String,
    #[serde(rename = "allowCredentials")]
    pub allow_credentials: Vec<AllowCredential>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowCredential {
    #[serde(rename = "type")]
    pub kind: String,
    /// Text-encoded credential id.
    pub id: String,
}

/// Registration result submitted to `/webauthn/register/finish`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationCredential {
    pub id: String,
    #[serde(rename = "rawId")]
    pub raw_id: String,
    pub response: AttestationResponse,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttestationResponse {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    #[serde(rename = "attestationObject")]
    pub attestation_object: String,
}

/// Assertion result submitted to `/webauthn/authenticate/finish`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationCredential {
    pub id: String,
    #[serde(rename = "rawId")]
    pub raw_id: String,
    pub response: AssertionResponse,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionResponse {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    #[serde(rename = "authenticatorData")]
    pub authenticator_data: String,
    pub signature: String,
    #[serde(rename = "userHandle", default, skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<String>,
}

impl RegistrationCredential {
    /// Encode a device credential's binary fields back into wire text.
    pub fn from_created(created: &CreatedCredential) -> Self {
        let id = codec::encode(&created.id);
        Self {
            raw_id: id.clone(),
            id,
            response: AttestationResponse {
                client_data_json: codec::encode(&created.client_data_json),
                attestation_object: codec::encode(&created.attestation_object),
            },
            kind: "public-key".into(),
        }
    }
}

impl AuthenticationCredential {
    /// Encode a device assertion's binary fields back into wire text.
    pub fn from_assertion(assertion: &Assertion) -> Self {
        let id = codec::encode(&assertion.credential_id);
        Self {
            raw_id: id.clone(),
            id,
            response: AssertionResponse {
                client_data_json: codec::encode(&assertion.client_data_json),
                authenticator_data: codec::encode(&assertion.authenticator_data),
                signature: codec::encode(&assertion.signature),
                user_handle: assertion.user_handle.as_deref().map(codec::encode),
            },
            kind: "public-key".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_options_wire_names() {
        let options: RegistrationOptions = serde_json::from_value(serde_json::json!({
            "challenge": "AAE",
            "rp": {"id": "glyph.id", "name": "Glyph"},
            "user": {"id": "dXNlci0x", "name": "user@example.com", "displayName": "user@example.com"},
            "pubKeyCredParams": [{"type": "public-key", "alg": -7}],
            "timeout": 60000,
            "attestation": "none",
            "authenticatorSelection": {"userVerification": "preferred"}
        }))
        .unwrap();
        assert_eq!(options.pub_key_cred_params[0].alg, -7);
        assert_eq!(options.user.display_name, "user@example.com");
        assert_eq!(options.authenticator_selection.user_verification, "preferred");
    }

    #[test]
    fn test_registration_credential_encodes_camel_case() {
        let created = CreatedCredential {
            id: vec![0x00, 0x01],
            client_data_json: b"{}".to_vec(),
            attestation_object: vec![0xaa],
        };
        let wire = serde_json::to_value(RegistrationCredential::from_created(&created)).unwrap();
        assert_eq!(wire["id"], "AAE");
        assert_eq!(wire["rawId"], "AAE");
        assert_eq!(wire["type"], "public-key");
        assert!(wire["response"]["clientDataJSON"].is_string());
        assert!(wire["response"]["attestationObject"].is_string());
    }

    #[test]
    fn test_assertion_credential_omits_absent_user_handle() {
        let assertion = Assertion {
            credential_id: vec![1, 2, 3],
            client_data_json: b"{}".to_vec(),
            authenticator_data: vec![4],
            signature: vec![5],
            user_handle: None,
        };
        let wire = serde_json::to_value(AuthenticationCredential::from_assertion(&assertion)).unwrap();
        assert!(wire["response"].get("userHandle").is_none());
        assert!(wire["response"]["authenticatorData"].is_string());
    }
}
