//! # Content Digest
//!
//! Defines `ContentDigest`, the SHA-256 digest used to bind escrow
//! records to property documents (title deeds, sale agreements) without
//! storing the documents themselves.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// A SHA-256 content digest.
///
/// Rendered as `sha256:` followed by 64 lowercase hex digits. The digest
/// is computed over the raw document bytes; the stack never inspects the
/// document content itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Compute the digest of a byte slice.
    pub fn of_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self(bytes)
    }

    /// Construct a digest from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse the `sha256:<hex>` rendering.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let hex_part = s.strip_prefix("sha256:").ok_or_else(|| ValidationError::InvalidDigest {
            value: s.to_string(),
        })?;
        if hex_part.len() != 64 {
            return Err(ValidationError::InvalidDigest {
                value: s.to_string(),
            });
        }
        let decoded = hex::decode(hex_part).map_err(|_| ValidationError::InvalidDigest {
            value: s.to_string(),
        })?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    /// Access the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as a lowercase hex string, without the prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ContentDigest::parse(&s).map_err(serde::de::Error::custom)
    }
}
