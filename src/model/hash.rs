//! Node hash type using keccak-256

use alloy_primitives::{keccak256, Keccak256};
use serde::{Serialize, Serializer};
use std::fmt;

/// A 32-byte keccak-256 digest, used for every leaf and node in both tree levels
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash([u8; 32]);

impl Hash {
    /// The zero hash, also the padding value for unfilled leaf slots
    pub const ZERO: Hash = Hash([0u8; 32]);

    /// Width of a digest in bytes
    pub const LEN: usize = 32;

    /// Hash arbitrary data
    pub fn digest(data: &[u8]) -> Self {
        Hash(keccak256(data).0)
    }

    /// Hash the concatenation of several byte strings
    pub fn digest_many(parts: &[&[u8]]) -> Self {
        let mut hasher = Keccak256::new();
        for part in parts {
            hasher.update(part);
        }
        Hash(hasher.finalize().0)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string (no prefix)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Hash(arr))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..8])
    }
}

impl Default for Hash {
    fn default() -> Self {
        Hash::ZERO
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_digest() {
        let h1 = Hash::digest(b"hello");
        let h2 = Hash::digest(b"hello");
        let h3 = Hash::digest(b"world");

        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_empty_input_is_keccak_of_nothing() {
        assert_eq!(
            Hash::digest(&[]).to_hex(),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_digest_many_matches_concatenation() {
        let joined = Hash::digest(b"leftright");
        assert_eq!(Hash::digest_many(&[b"left", b"right"]), joined);
    }

    #[test]
    fn test_hash_hex_roundtrip() {
        let h1 = Hash::digest(b"test data");
        assert_eq!(Hash::from_hex(&h1.to_hex()).unwrap(), h1);
        assert_eq!(Hash::from_hex(&h1.to_string()).unwrap(), h1);
        assert!(Hash::from_hex("abcd").is_err());
    }
}
