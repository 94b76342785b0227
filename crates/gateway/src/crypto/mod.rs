//! Carrier-mandated crypto primitives: 3DES/CBC body encryption and MD5 signing.
//!
//! This module is intentionally free of HTTP dependencies.
//!
//! # Ciphertext format
//!
//! ```text
//! base64(3DES-EDE3-CBC(key, IV = 12 34 56 78 90 AB CD EF, PKCS#7(plaintext)))
//! ```

pub mod cipher;
pub mod sign;

pub use cipher::{CipherKey, CodecError};
