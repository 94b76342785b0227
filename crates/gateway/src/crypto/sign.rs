//! Request signature: lowercase hex MD5 over `timestamp || secret || data`.
//!
//! MD5 is what the carrier verifies against; it serves as a shared-secret
//! integrity check, not as a security boundary.

use md5::{Digest, Md5};

/// Compute the carrier signature for one request.
///
/// `timestamp` must be the exact decimal string sent in the `timestamp` query
/// parameter, and `data` the exact canonical JSON text placed in the envelope.
pub fn sign(timestamp: &str, secret: &str, data: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(timestamp.as_bytes());
    hasher.update(secret.as_bytes());
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a received signature against a freshly computed one.
pub fn verify(timestamp: &str, secret: &str, data: &str, signature: &str) -> bool {
    sign(timestamp, secret, data).eq_ignore_ascii_case(signature)
}
