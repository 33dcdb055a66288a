//! # Compliance Registry
//!
//! The per-address record store and its transaction-validation logic.
//!
//! ## Gating
//!
//! Record creation and update require `COMPLIANCE_OFFICER_ROLE` and an
//! unpaused registry. All read derivations stay available while paused
//! and answer conservatively for unknown addresses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use deedlock_core::{Address, AuthorizationContext, PauseError, PauseSwitch, Role, Timestamp};

use crate::record::{ComplianceProfile, ComplianceRecord, RiskLevel};

/// Errors from registry mutation.
#[derive(Error, Debug)]
pub enum ComplianceError {
    /// The target address was the zero sentinel.
    #[error("zero address cannot carry a compliance record")]
    ZeroAddress,

    /// A required metadata field was empty.
    #[error("empty {field} in compliance record")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A record already exists for the address.
    #[error("compliance record already exists for {address}")]
    DuplicateRecord {
        /// The already-registered address.
        address: String,
    },

    /// No record exists for the address.
    #[error("no compliance record for {address}")]
    RecordNotFound {
        /// The unregistered address.
        address: String,
    },

    /// Caller lacks the officer role.
    #[error(transparent)]
    Authorization(#[from] deedlock_core::AuthorizationError),

    /// The registry is paused.
    #[error(transparent)]
    Paused(#[from] PauseError),
}

/// Why a transaction was rejected by [`ComplianceRegistry::validate_transaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    /// The amount was zero.
    ZeroAmount,
    /// A participant address was the zero sentinel.
    ZeroAddress,
    /// A participant has no record or fails the compliance derivation.
    NotCompliant {
        /// The failing participant.
        address: Address,
    },
    /// A participant is at or above the high-risk threshold.
    HighRisk {
        /// The failing participant.
        address: Address,
    },
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroAmount => write!(f, "amount must be greater than zero"),
            Self::ZeroAddress => write!(f, "zero address cannot transact"),
            Self::NotCompliant { address } => write!(f, "{address} is not compliant"),
            Self::HighRisk { address } => write!(f, "{address} is high risk"),
        }
    }
}

/// Outcome of transaction validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionVerdict {
    /// Both participants passed independently.
    Allowed,
    /// At least one rule failed; the first violated rule is reported.
    Rejected(RejectionReason),
}

impl TransactionVerdict {
    /// Whether the transaction may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// The compliance record store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComplianceRegistry {
    records: HashMap<Address, ComplianceRecord>,
    pause: PauseSwitch,
}

impl ComplianceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Mutation (officer-gated, pausable) ──────────────────────────

    /// Create a record for `user`. Rejects the zero address, empty
    /// metadata, and duplicate registration.
    pub fn create_record(
        &mut self,
        caller: &Address,
        auth: &dyn AuthorizationContext,
        user: Address,
        profile: ComplianceProfile,
    ) -> Result<(), ComplianceError> {
        auth.require_role(caller, Role::ComplianceOfficer)?;
        self.pause.ensure_active()?;

        if user.is_zero() {
            return Err(ComplianceError::ZeroAddress);
        }
        validate_metadata(&profile.jurisdiction, "jurisdiction")?;
        validate_metadata(&profile.kyc_reference, "kyc_reference")?;
        if self.records.contains_key(&user) {
            return Err(ComplianceError::DuplicateRecord {
                address: user.to_string(),
            });
        }

        self.records.insert(user, ComplianceRecord::from_profile(profile));
        Ok(())
    }

    /// Update the KYC flag, risk tier, and KYC reference of an existing
    /// record, refreshing `last_updated`. Jurisdiction is fixed at
    /// creation.
    pub fn update_record(
        &mut self,
        caller: &Address,
        auth: &dyn AuthorizationContext,
        user: &Address,
        kyc_verified: bool,
        risk_level: RiskLevel,
        kyc_reference: &str,
    ) -> Result<(), ComplianceError> {
        auth.require_role(caller, Role::ComplianceOfficer)?;
        self.pause.ensure_active()?;

        validate_metadata(kyc_reference, "kyc_reference")?;
        let record = self.records.get_mut(user).ok_or_else(|| {
            ComplianceError::RecordNotFound {
                address: user.to_string(),
            }
        })?;

        record.kyc_verified = kyc_verified;
        record.risk_level = risk_level;
        record.kyc_reference = kyc_reference.to_string();
        record.last_updated = Timestamp::now();
        Ok(())
    }

    /// Pause mutation. Officer- or admin-gated.
    pub fn pause(
        &mut self,
        caller: &Address,
        auth: &dyn AuthorizationContext,
    ) -> Result<(), ComplianceError> {
        require_officer_or_admin(caller, auth)?;
        self.pause.pause()?;
        Ok(())
    }

    /// Resume mutation. Officer- or admin-gated.
    pub fn unpause(
        &mut self,
        caller: &Address,
        auth: &dyn AuthorizationContext,
    ) -> Result<(), ComplianceError> {
        require_officer_or_admin(caller, auth)?;
        self.pause.unpause()?;
        Ok(())
    }

    /// Whether mutation is currently paused.
    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    // ─── Reads (always available, conservative defaults) ─────────────

    /// The stored record for `user`, if any.
    pub fn record(&self, user: &Address) -> Option<&ComplianceRecord> {
        self.records.get(user)
    }

    /// Whether a record exists for `user`.
    pub fn has_record(&self, user: &Address) -> bool {
        self.records.contains_key(user)
    }

    /// Whether `user` has completed KYC. No record means `false`.
    pub fn is_kyc_verified(&self, user: &Address) -> bool {
        self.records.get(user).map(|r| r.kyc_verified).unwrap_or(false)
    }

    /// Whether `user` is at or above the high-risk tier. No record
    /// means `false`.
    pub fn is_high_risk(&self, user: &Address) -> bool {
        self.records
            .get(user)
            .map(|r| r.risk_level.is_high_risk())
            .unwrap_or(false)
    }

    /// The compliance derivation for `user`. No record means `false`.
    pub fn is_compliant(&self, user: &Address) -> bool {
        self.records.get(user).map(|r| r.is_compliant()).unwrap_or(false)
    }

    /// Validate a prospective transfer between two participants.
    ///
    /// Both participants must independently be compliant and below the
    /// high-risk threshold. The first violated rule is reported.
    pub fn validate_transaction(
        &self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> TransactionVerdict {
        if amount == 0 {
            return TransactionVerdict::Rejected(RejectionReason::ZeroAmount);
        }
        if from.is_zero() || to.is_zero() {
            return TransactionVerdict::Rejected(RejectionReason::ZeroAddress);
        }
        for participant in [from, to] {
            if !self.is_compliant(participant) {
                return TransactionVerdict::Rejected(RejectionReason::NotCompliant {
                    address: *participant,
                });
            }
            if self.is_high_risk(participant) {
                return TransactionVerdict::Rejected(RejectionReason::HighRisk {
                    address: *participant,
                });
            }
        }
        TransactionVerdict::Allowed
    }
}

fn validate_metadata(value: &str, field: &'static str) -> Result<(), ComplianceError> {
    if value.trim().is_empty() {
        return Err(ComplianceError::EmptyField { field });
    }
    Ok(())
}

fn require_officer_or_admin(
    caller: &Address,
    auth: &dyn AuthorizationContext,
) -> Result<(), ComplianceError> {
    if auth.has_role(caller, Role::ComplianceOfficer) || auth.has_role(caller, Role::Admin) {
        return Ok(());
    }
    Err(ComplianceError::Authorization(
        deedlock_core::AuthorizationError::MissingRole {
            caller: caller.to_string(),
            role: Role::ComplianceOfficer.to_string(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deedlock_core::RoleRegistry;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn clean_profile() -> ComplianceProfile {
        ComplianceProfile {
            kyc_verified: true,
            risk_level: RiskLevel::Low,
            jurisdiction: "AE".to_string(),
            kyc_reference: "KYC-001".to_string(),
            sanctions_check_passed: true,
            is_pep: false,
        }
    }

    /// Registry plus an auth context with an admin and a compliance officer.
    fn setup() -> (ComplianceRegistry, RoleRegistry, Address, Address) {
        let admin = addr(0xAA);
        let officer = addr(0xCC);
        let mut roles = RoleRegistry::with_admin(admin);
        roles
            .grant_role(&admin, officer, Role::ComplianceOfficer)
            .unwrap();
        (ComplianceRegistry::new(), roles, admin, officer)
    }

    // ── Record creation ──────────────────────────────────────────────

    #[test]
    fn test_create_and_read_record() {
        let (mut reg, roles, _, officer) = setup();
        let user = addr(1);
        reg.create_record(&officer, &roles, user, clean_profile()).unwrap();
        assert!(reg.has_record(&user));
        assert!(reg.is_kyc_verified(&user));
        assert!(reg.is_compliant(&user));
    }

    #[test]
    fn test_create_requires_officer_role() {
        let (mut reg, roles, _, _) = setup();
        let outsider = addr(0x77);
        let result = reg.create_record(&outsider, &roles, addr(1), clean_profile());
        assert!(matches!(result, Err(ComplianceError::Authorization(_))));
    }

    #[test]
    fn test_create_rejects_zero_address() {
        let (mut reg, roles, _, officer) = setup();
        let result = reg.create_record(&officer, &roles, Address::ZERO, clean_profile());
        assert!(matches!(result, Err(ComplianceError::ZeroAddress)));
    }

    #[test]
    fn test_create_rejects_empty_metadata() {
        let (mut reg, roles, _, officer) = setup();
        let mut profile = clean_profile();
        profile.jurisdiction = String::new();
        let result = reg.create_record(&officer, &roles, addr(1), profile);
        assert!(matches!(
            result,
            Err(ComplianceError::EmptyField { field: "jurisdiction" })
        ));
    }

    #[test]
    fn test_duplicate_creation_rejected() {
        let (mut reg, roles, _, officer) = setup();
        let user = addr(1);
        reg.create_record(&officer, &roles, user, clean_profile()).unwrap();
        let result = reg.create_record(&officer, &roles, user, clean_profile());
        assert!(matches!(result, Err(ComplianceError::DuplicateRecord { .. })));
    }

    // ── Updates ──────────────────────────────────────────────────────

    #[test]
    fn test_update_refreshes_record() {
        let (mut reg, roles, _, officer) = setup();
        let user = addr(1);
        reg.create_record(&officer, &roles, user, clean_profile()).unwrap();

        reg.update_record(&officer, &roles, &user, true, RiskLevel::High, "KYC-002")
            .unwrap();
        let record = reg.record(&user).unwrap();
        assert_eq!(record.risk_level, RiskLevel::High);
        assert_eq!(record.kyc_reference, "KYC-002");
        assert!(record.last_updated >= record.created_at);
    }

    #[test]
    fn test_update_without_record_rejected() {
        let (mut reg, roles, _, officer) = setup();
        let result =
            reg.update_record(&officer, &roles, &addr(1), true, RiskLevel::Low, "KYC-002");
        assert!(matches!(result, Err(ComplianceError::RecordNotFound { .. })));
    }

    #[test]
    fn test_update_rejects_empty_metadata() {
        let (mut reg, roles, _, officer) = setup();
        let user = addr(1);
        reg.create_record(&officer, &roles, user, clean_profile()).unwrap();
        let result = reg.update_record(&officer, &roles, &user, true, RiskLevel::Low, "");
        assert!(matches!(result, Err(ComplianceError::EmptyField { .. })));
    }

    // ── Conservative reads ───────────────────────────────────────────

    #[test]
    fn test_unknown_address_reads_conservative() {
        let (reg, _, _, _) = setup();
        let ghost = addr(0x99);
        assert!(!reg.has_record(&ghost));
        assert!(!reg.is_kyc_verified(&ghost));
        assert!(!reg.is_compliant(&ghost));
        assert!(!reg.is_high_risk(&ghost));
    }

    // ── Transaction validation ───────────────────────────────────────

    #[test]
    fn test_validate_transaction_both_clean() {
        let (mut reg, roles, _, officer) = setup();
        reg.create_record(&officer, &roles, addr(1), clean_profile()).unwrap();
        reg.create_record(&officer, &roles, addr(2), clean_profile()).unwrap();
        assert!(reg.validate_transaction(&addr(1), &addr(2), 1000).is_allowed());
    }

    #[test]
    fn test_validate_transaction_zero_amount() {
        let (reg, ..) = setup();
        assert_eq!(
            reg.validate_transaction(&addr(1), &addr(2), 0),
            TransactionVerdict::Rejected(RejectionReason::ZeroAmount)
        );
    }

    #[test]
    fn test_validate_transaction_zero_address() {
        let (reg, ..) = setup();
        assert_eq!(
            reg.validate_transaction(&Address::ZERO, &addr(2), 10),
            TransactionVerdict::Rejected(RejectionReason::ZeroAddress)
        );
    }

    #[test]
    fn test_validate_transaction_missing_record() {
        let (mut reg, roles, _, officer) = setup();
        reg.create_record(&officer, &roles, addr(1), clean_profile()).unwrap();
        let verdict = reg.validate_transaction(&addr(1), &addr(2), 10);
        assert_eq!(
            verdict,
            TransactionVerdict::Rejected(RejectionReason::NotCompliant { address: addr(2) })
        );
    }

    #[test]
    fn test_validate_transaction_prohibited_participant() {
        let (mut reg, roles, _, officer) = setup();
        reg.create_record(&officer, &roles, addr(1), clean_profile()).unwrap();
        reg.create_record(
            &officer,
            &roles,
            addr(2),
            ComplianceProfile {
                risk_level: RiskLevel::Prohibited,
                ..clean_profile()
            },
        )
        .unwrap();

        // Prohibited fails the compliance derivation outright.
        assert!(!reg.is_compliant(&addr(2)));
        let verdict = reg.validate_transaction(&addr(1), &addr(2), 10);
        assert_eq!(
            verdict,
            TransactionVerdict::Rejected(RejectionReason::NotCompliant { address: addr(2) })
        );
    }

    #[test]
    fn test_validate_transaction_high_risk_participant() {
        let (mut reg, roles, _, officer) = setup();
        reg.create_record(&officer, &roles, addr(1), clean_profile()).unwrap();
        reg.create_record(
            &officer,
            &roles,
            addr(2),
            ComplianceProfile {
                risk_level: RiskLevel::High,
                ..clean_profile()
            },
        )
        .unwrap();

        // High risk is compliant but still blocked from transacting.
        assert!(reg.is_compliant(&addr(2)));
        let verdict = reg.validate_transaction(&addr(1), &addr(2), 10);
        assert_eq!(
            verdict,
            TransactionVerdict::Rejected(RejectionReason::HighRisk { address: addr(2) })
        );
    }

    // ── Pause ────────────────────────────────────────────────────────

    #[test]
    fn test_paused_registry_blocks_mutation() {
        let (mut reg, roles, _, officer) = setup();
        reg.create_record(&officer, &roles, addr(1), clean_profile()).unwrap();
        reg.pause(&officer, &roles).unwrap();

        let result = reg.create_record(&officer, &roles, addr(2), clean_profile());
        assert!(matches!(result, Err(ComplianceError::Paused(_))));
        let result = reg.update_record(&officer, &roles, &addr(1), true, RiskLevel::Low, "K");
        assert!(matches!(result, Err(ComplianceError::Paused(_))));
    }

    #[test]
    fn test_paused_registry_reads_still_work() {
        let (mut reg, roles, _, officer) = setup();
        reg.create_record(&officer, &roles, addr(1), clean_profile()).unwrap();
        reg.pause(&officer, &roles).unwrap();

        assert!(reg.is_compliant(&addr(1)));
        assert!(reg.validate_transaction(&addr(1), &addr(1), 10).is_allowed());
    }

    #[test]
    fn test_admin_may_pause() {
        let (mut reg, roles, admin, _) = setup();
        reg.pause(&admin, &roles).unwrap();
        assert!(reg.is_paused());
        reg.unpause(&admin, &roles).unwrap();
        assert!(!reg.is_paused());
    }

    #[test]
    fn test_outsider_may_not_pause() {
        let (mut reg, roles, _, _) = setup();
        let result = reg.pause(&addr(0x77), &roles);
        assert!(matches!(result, Err(ComplianceError::Authorization(_))));
    }
}
