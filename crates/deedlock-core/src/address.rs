//! # Account Addresses
//!
//! Defines `Address`, the validated 20-byte account identifier used for
//! every participant, token contract, and wallet in the stack.
//!
//! ## Security Invariant
//!
//! Addresses are constructed only through [`Address::parse()`] or
//! [`Address::from_bytes()`]. The zero address is a reserved sentinel
//! meaning "unset" (e.g. an optional agent parameter); it is never a
//! valid participant, and validation layers reject it explicitly for
//! required fields.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A 20-byte account address.
///
/// Canonical rendering is `0x` followed by 40 lowercase hex digits.
/// Parsing accepts mixed case; the stored form is the raw bytes, so two
/// addresses that differ only in input casing compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// The zero address sentinel.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Parse an address from a `0x`-prefixed 40-hex-digit string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAddress`] if the prefix is
    /// missing, the length is wrong, or a character is not a hex digit.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let hex_part = s.strip_prefix("0x").ok_or_else(|| ValidationError::InvalidAddress {
            value: s.to_string(),
        })?;
        if hex_part.len() != 40 {
            return Err(ValidationError::InvalidAddress {
                value: s.to_string(),
            });
        }
        let bytes = hex::decode(hex_part).map_err(|_| ValidationError::InvalidAddress {
            value: s.to_string(),
        })?;
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }

    /// Construct an address from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Access the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Render the canonical `0x`-prefixed lowercase hex form.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Addresses cross the wire as their canonical hex string, not as byte
// arrays, so they are usable as JSON map keys.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(serde::de::Error::custom)
    }
}
