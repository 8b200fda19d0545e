//! Salted payload hashing for RingRelay.
//!
//! Every node holds a private salt generated at startup. A payload hash is
//! the SHA-512 digest of the salt bytes followed by the payload bytes. Salts
//! and digests travel on the wire in base64 (standard alphabet), the fixed
//! reversible text encoding used across the protocol.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::fmt;

/// Length in bytes of a freshly generated salt.
pub const SALT_LEN: usize = 9;

/// A node salt.
///
/// Held as raw bytes; serialized as base64 text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salt(#[serde(with = "base64_serde")] Vec<u8>);

impl Salt {
    /// Generate a fresh random salt.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes.to_vec())
    }

    /// Parse a salt from its base64 text form.
    pub fn from_encoded(encoded: &str) -> Result<Self, base64::DecodeError> {
        Ok(Self(STANDARD.decode(encoded)?))
    }

    /// Get the raw salt bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the base64 text form.
    pub fn to_encoded(&self) -> String {
        STANDARD.encode(&self.0)
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_encoded())
    }
}

/// A salted SHA-512 digest in its base64 text form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadHash(String);

impl PayloadHash {
    /// Get as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PayloadHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute the salted hash of a payload.
///
/// Deterministic: identical `(payload, salt)` pairs always yield the
/// identical digest.
pub fn salted_hash(payload: &[u8], salt: &Salt) -> PayloadHash {
    let mut hasher = Sha512::new();
    hasher.update(salt.as_bytes());
    hasher.update(payload);
    PayloadHash(STANDARD.encode(hasher.finalize()))
}

// Serde helper for base64 encoding
mod base64_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let salt = Salt::generate();
        let h1 = salted_hash(b"hello", &salt);
        let h2 = salted_hash(b"hello", &salt);
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_hash_depends_on_salt() {
        let s1 = Salt::generate();
        let s2 = Salt::generate();
        assert_ne!(s1, s2);
        assert_ne!(salted_hash(b"hello", &s1), salted_hash(b"hello", &s2));
    }

    #[test]
    fn test_hash_depends_on_payload() {
        let salt = Salt::generate();
        assert_ne!(salted_hash(b"hello", &salt), salted_hash(b"hello!", &salt));
    }

    #[test]
    fn test_salt_encoding_roundtrip() {
        let salt = Salt::generate();
        let parsed = Salt::from_encoded(&salt.to_encoded()).unwrap();
        assert_eq!(salt, parsed);
        assert_eq!(salt.as_bytes().len(), SALT_LEN);
    }

    #[test]
    fn test_digest_is_sha512_sized() {
        let salt = Salt::generate();
        let hash = salted_hash(b"payload", &salt);
        let raw = STANDARD.decode(hash.as_str()).unwrap();
        assert_eq!(raw.len(), 64);
    }
}
