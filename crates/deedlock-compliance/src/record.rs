//! # Compliance Records
//!
//! The per-address compliance state: KYC verification, AML risk tier,
//! sanctions screening, and politically-exposed-person flag.

use serde::{Deserialize, Serialize};

use deedlock_core::Timestamp;

/// AML risk tier, ordered from least to most restrictive.
///
/// `Prohibited` principals can never be compliant; `High` principals may
/// hold a compliant record but are rejected by transaction validation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Standard retail participant.
    Low,
    /// Elevated monitoring.
    Medium,
    /// Enhanced due diligence required; blocked from transacting.
    High,
    /// Banned outright.
    Prohibited,
}

impl RiskLevel {
    /// Whether this tier is banned outright.
    pub fn is_prohibited(&self) -> bool {
        matches!(self, Self::Prohibited)
    }

    /// Whether this tier is at or above the transaction-blocking threshold.
    pub fn is_high_risk(&self) -> bool {
        *self >= Self::High
    }

    /// The canonical tier name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Prohibited => "PROHIBITED",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The officer-supplied content of a compliance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceProfile {
    /// Whether KYC verification has completed.
    pub kyc_verified: bool,
    /// Assessed AML risk tier.
    pub risk_level: RiskLevel,
    /// Jurisdiction of the participant (opaque to the stack).
    pub jurisdiction: String,
    /// Reference into the external KYC case system (opaque).
    pub kyc_reference: String,
    /// Whether sanctions screening passed.
    pub sanctions_check_passed: bool,
    /// Politically exposed person flag.
    pub is_pep: bool,
}

/// A stored compliance record with its bookkeeping stamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    /// Whether KYC verification has completed.
    pub kyc_verified: bool,
    /// Assessed AML risk tier.
    pub risk_level: RiskLevel,
    /// Jurisdiction of the participant.
    pub jurisdiction: String,
    /// Reference into the external KYC case system.
    pub kyc_reference: String,
    /// Whether sanctions screening passed.
    pub sanctions_check_passed: bool,
    /// Politically exposed person flag.
    pub is_pep: bool,
    /// When the record was created.
    pub created_at: Timestamp,
    /// Refreshed on every update.
    pub last_updated: Timestamp,
}

impl ComplianceRecord {
    /// Build a fresh record from an officer-supplied profile.
    pub fn from_profile(profile: ComplianceProfile) -> Self {
        let now = Timestamp::now();
        Self {
            kyc_verified: profile.kyc_verified,
            risk_level: profile.risk_level,
            jurisdiction: profile.jurisdiction,
            kyc_reference: profile.kyc_reference,
            sanctions_check_passed: profile.sanctions_check_passed,
            is_pep: profile.is_pep,
            created_at: now,
            last_updated: now,
        }
    }

    /// The compliance derivation: KYC verified, below the prohibited
    /// tier, and sanctions-clean. PEP status alone does not block.
    pub fn is_compliant(&self) -> bool {
        self.kyc_verified && !self.risk_level.is_prohibited() && self.sanctions_check_passed
    }
}
