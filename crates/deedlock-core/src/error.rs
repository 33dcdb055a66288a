//! # Error Types — Structured Error Families
//!
//! Defines the error families shared across the Deedlock Escrow Stack.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Validation errors name the violated rule and the offending field, so
//!   the most specific rule is always the one reported.
//! - Authorization errors identify the caller and the missing privilege.
//! - Every error aborts the whole operation with no partial effects;
//!   errors are never used for control flow inside the stack.

use thiserror::Error;

/// Parameter validation failures, detected before any state mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required address field was the zero sentinel.
    #[error("zero address for {field}")]
    ZeroAddress {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A required string field was empty.
    #[error("empty {field}")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// An amount field must be strictly positive.
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// A deadline must be strictly in the future.
    #[error("deadline {deadline} is not in the future")]
    DeadlineInPast {
        /// The rejected deadline, ISO8601.
        deadline: String,
    },

    /// A fee exceeds the platform-wide cap.
    #[error("fee of {requested} bps exceeds the cap of {cap} bps")]
    FeeAboveCap {
        /// The requested fee in basis points.
        requested: u16,
        /// The maximum permitted fee in basis points.
        cap: u16,
    },

    /// An address string could not be parsed.
    #[error("invalid address: {value:?}")]
    InvalidAddress {
        /// The rejected input.
        value: String,
    },

    /// A digest string could not be parsed.
    #[error("invalid digest: {value:?}")]
    InvalidDigest {
        /// The rejected input.
        value: String,
    },

    /// A timestamp string could not be parsed or was not UTC.
    #[error("invalid timestamp: {value:?}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
    },
}

/// Authorization failures, checked before state errors in every flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The caller does not hold the role the operation requires.
    #[error("{caller} is missing required role {role}")]
    MissingRole {
        /// The calling address.
        caller: String,
        /// The required role's wire name.
        role: String,
    },

    /// The caller has no relationship to the record that would permit
    /// the operation (not buyer, seller, agent, or arbiter as required).
    #[error("{caller} is not authorized to {action}")]
    NotAuthorized {
        /// The calling address.
        caller: String,
        /// The attempted action.
        action: &'static str,
    },
}

/// Pause-switch failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PauseError {
    /// A mutating call arrived while the component is paused, or the
    /// component was asked to pause twice.
    #[error("paused")]
    Paused,

    /// Unpause was requested while the component was not paused.
    #[error("not paused")]
    NotPaused,
}
