//! # deedlock-compliance — KYC/AML Participant Gating
//!
//! Tracks one compliance record per participant address and answers the
//! two questions the escrow core asks before honoring a transaction:
//! is this participant compliant, and may these two participants
//! transact this amount.
//!
//! ## Design
//!
//! - Mutation is gated on `COMPLIANCE_OFFICER_ROLE` and blocked while
//!   the registry is paused.
//! - Reads are always available and fail conservative: an address with
//!   no record is simply not compliant, never an error.
//! - Records are created at most once per address; updates require an
//!   existing record and refresh its `last_updated` stamp.

pub mod record;
pub mod registry;

pub use record::{ComplianceProfile, ComplianceRecord, RiskLevel};
pub use registry::{ComplianceError, ComplianceRegistry, RejectionReason, TransactionVerdict};
