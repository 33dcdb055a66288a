//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the non-address identifiers in the stack. These
//! prevent accidental identifier confusion: you cannot pass a property
//! identifier where an escrow identifier is expected.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Sequential identifier for an escrow record.
///
/// Assigned by the platform's monotonic counter, starting at 0. Unique
/// within the owning platform and immutable for the life of the record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EscrowId(pub u64);

impl EscrowId {
    /// Access the inner counter value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EscrowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "escrow:{}", self.0)
    }
}

/// Opaque identifier for the property under sale.
///
/// Non-empty by construction; the content is owned by the listing system
/// and treated as opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(String);

impl PropertyId {
    /// Create a property identifier, rejecting empty input.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "property_id",
            });
        }
        Ok(Self(id))
    }

    /// Access the inner identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PropertyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
