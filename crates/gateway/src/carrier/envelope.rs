//! Request envelope: canonical JSON, signature, `{data, sign}` wrapper, encryption.
//!
//! The carrier re-serialises nothing: it decrypts the body, reads `data` as
//! an opaque string and recomputes `md5(timestamp + secret + data)`. The text
//! that is signed and the text placed in `data` must therefore be the same
//! bytes, which is why [`canonical_text`] runs exactly once per request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::CarrierCallError;
use crate::crypto::{cipher, sign, CipherKey, CodecError};

/// Shared secret plus the cipher key derived from it.
#[derive(Clone)]
pub struct EnvelopeKeys {
    secret: String,
    cipher: CipherKey,
}

impl EnvelopeKeys {
    /// Derive the cipher key from `secret`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidKey`] if `secret` is empty.
    pub fn new(secret: &str) -> Result<Self, CodecError> {
        Ok(Self {
            secret: secret.to_owned(),
            cipher: CipherKey::derive(secret)?,
        })
    }

    pub fn cipher(&self) -> &CipherKey {
        &self.cipher
    }
}

impl std::fmt::Debug for EnvelopeKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EnvelopeKeys([REDACTED])")
    }
}

/// The plaintext structure that gets encrypted into the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    /// Canonical JSON text of the payload (object or array), as a string.
    pub data: String,
    /// Lowercase hex MD5 signature over `timestamp + secret + data`.
    pub sign: String,
}

impl SignedEnvelope {
    /// Recompute the signature for `timestamp_ms` and compare.
    pub fn verify(&self, timestamp_ms: i64, keys: &EnvelopeKeys) -> bool {
        sign::verify(
            &timestamp_ms.to_string(),
            &keys.secret,
            &self.data,
            &self.sign,
        )
    }

    /// Parse `data` back into a JSON value.
    pub fn payload(&self) -> Result<Value, CarrierCallError> {
        serde_json::from_str(&self.data)
            .map_err(|e| CarrierCallError::Protocol(format!("envelope data is not JSON: {e}")))
    }
}

/// Compact JSON text of `payload`, keys in insertion order, no whitespace.
pub fn canonical_text(payload: &Value) -> Result<String, CarrierCallError> {
    serde_json::to_string(payload)
        .map_err(|e| CarrierCallError::Protocol(format!("failed to serialise payload: {e}")))
}

/// Canonicalise and sign `payload` without encrypting it.
///
/// Arrays are not unwrapped: a one-element array payload ends up in `data` as
/// `[{...}]`, and the signature covers that text.
pub fn seal(
    payload: &Value,
    timestamp_ms: i64,
    keys: &EnvelopeKeys,
) -> Result<SignedEnvelope, CarrierCallError> {
    let data = canonical_text(payload)?;
    let sign = sign::sign(&timestamp_ms.to_string(), &keys.secret, &data);
    Ok(SignedEnvelope { data, sign })
}

/// Build the encrypted, base64-encoded request body for `payload`.
pub fn build_envelope(
    payload: &Value,
    timestamp_ms: i64,
    keys: &EnvelopeKeys,
) -> Result<String, CarrierCallError> {
    let sealed = seal(payload, timestamp_ms, keys)?;
    let inner = serde_json::to_string(&sealed)
        .map_err(|e| CarrierCallError::Protocol(format!("failed to serialise envelope: {e}")))?;
    Ok(cipher::encrypt_to_text(inner.as_bytes(), &keys.cipher)?)
}

/// Decrypt a request body produced by [`build_envelope`].
pub fn open_envelope(text: &str, keys: &EnvelopeKeys) -> Result<SignedEnvelope, CarrierCallError> {
    let plaintext = cipher::decrypt_text(text, &keys.cipher)?;
    serde_json::from_slice(&plaintext)
        .map_err(|e| CarrierCallError::Protocol(format!("envelope is not valid JSON: {e}")))
}
