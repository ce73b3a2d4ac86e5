//! URL-safe binary text codec.
//!
//! Challenges, user handles and credential ids cross the wire as URL-safe
//! base64 text. Encoding emits no padding, matching the backend's helpers;
//! decoding accepts padded and unpadded input interchangeably.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::error::{GlyphError, Result};

const CONFIG: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_encode_padding(false)
    .with_decode_padding_mode(DecodePaddingMode::Indifferent);

const URL_SAFE_FORGIVING: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, CONFIG);

/// Encode bytes as unpadded URL-safe base64 text.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_FORGIVING.encode(bytes)
}

/// Decode URL-safe base64 text into bytes.
///
/// Fails on characters outside the URL-safe alphabet and on input whose
/// length cannot correspond to any byte sequence.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    URL_SAFE_FORGIVING
        .decode(text)
        .map_err(|e| GlyphError::Encoding(format!("Invalid base64url input: {e}")))
}
