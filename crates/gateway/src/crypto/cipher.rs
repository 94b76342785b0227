//! Triple-DES/CBC encryption of carrier request and response bodies.
//!
//! **Algorithm choice:** the carrier fixes the primitive: DES-family block
//! cipher in CBC mode, PKCS#5 padding, a published constant IV and base64
//! transport text. We run it as 3DES-EDE3 with a 24-byte key derived from the
//! shared secret. For the carrier's 8-byte secrets the derived key is
//! `K1 = K2 = K3`, which collapses EDE3 to single DES and is bit-compatible
//! with what the carrier computes on its side.
//!
//! **Do NOT swap this for a modern AEAD.** The carrier verifies and decrypts
//! with exactly this construction.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use des::TdesEde3;
use thiserror::Error;

type TdesCbcEnc = cbc::Encryptor<TdesEde3>;
type TdesCbcDec = cbc::Decryptor<TdesEde3>;

/// Byte length of a 3DES-EDE3 key.
pub const KEY_LEN: usize = 24;

/// Cipher block size in bytes.
pub const BLOCK_LEN: usize = 8;

/// Fixed CBC initialisation vector published by the carrier.
pub const IV: [u8; BLOCK_LEN] = [0x12, 0x34, 0x56, 0x78, 0x90, 0xAB, 0xCD, 0xEF];

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The configured secret cannot produce a key (it is empty).
    #[error("invalid cipher key: secret must not be empty")]
    InvalidKey,

    /// Ciphertext is empty or not a whole number of blocks.
    #[error("ciphertext length {0} is not a positive multiple of {BLOCK_LEN}")]
    BlockLength(usize),

    /// Decryption produced trailing bytes that are not valid PKCS#7 padding.
    #[error("invalid padding in decrypted block")]
    InvalidPadding,

    /// The transport text is not valid base64.
    #[error("ciphertext is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
}

/// Key material derived once from the shared secret.
///
/// Immutable after construction, so one instance can be shared by any number
/// of concurrent encrypt/decrypt calls. Zeroed on drop.
#[derive(Clone)]
pub struct CipherKey(Box<[u8; KEY_LEN]>);

impl CipherKey {
    /// Derive a [`KEY_LEN`]-byte key from `secret`.
    ///
    /// The secret's bytes are repeated until the key is full, or truncated if
    /// the secret is longer than [`KEY_LEN`].
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidKey`] if `secret` is empty.
    pub fn derive(secret: &str) -> Result<Self, CodecError> {
        if secret.is_empty() {
            return Err(CodecError::InvalidKey);
        }
        let mut key = Box::new([0u8; KEY_LEN]);
        for (dst, src) in key.iter_mut().zip(secret.as_bytes().iter().cycle()) {
            *dst = *src;
        }
        Ok(Self(key))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Drop for CipherKey {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CipherKey([REDACTED])")
    }
}

/// Encrypt `plaintext`, appending PKCS#7 padding.
///
/// The output is always a non-empty multiple of [`BLOCK_LEN`]; empty input
/// yields one full block of padding.
///
/// # Errors
///
/// Returns [`CodecError::InvalidKey`] if the key cannot initialise the cipher
/// (unreachable for keys built by [`CipherKey::derive`]).
pub fn encrypt(plaintext: &[u8], key: &CipherKey) -> Result<Vec<u8>, CodecError> {
    let enc = TdesCbcEnc::new_from_slices(key.as_bytes(), &IV).map_err(|_| CodecError::InvalidKey)?;
    Ok(enc.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt `ciphertext` and strip its PKCS#7 padding.
///
/// # Errors
///
/// Returns [`CodecError::BlockLength`] if the input is empty or not block
/// aligned, and [`CodecError::InvalidPadding`] if the trailing padding bytes
/// are malformed (which is also what a wrong key usually looks like).
pub fn decrypt(ciphertext: &[u8], key: &CipherKey) -> Result<Vec<u8>, CodecError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CodecError::BlockLength(ciphertext.len()));
    }
    let dec = TdesCbcDec::new_from_slices(key.as_bytes(), &IV).map_err(|_| CodecError::InvalidKey)?;
    dec.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CodecError::InvalidPadding)
}

/// Encrypt `plaintext` and encode it as standard padded base64.
pub fn encrypt_to_text(plaintext: &[u8], key: &CipherKey) -> Result<String, CodecError> {
    Ok(STANDARD.encode(encrypt(plaintext, key)?))
}

/// Decode base64 transport text and decrypt it.
///
/// Line breaks are ignored, since some carrier gateways wrap long base64
/// output.
pub fn decrypt_text(text: &str, key: &CipherKey) -> Result<Vec<u8>, CodecError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let ciphertext = STANDARD.decode(compact)?;
    decrypt(&ciphertext, key)
}
