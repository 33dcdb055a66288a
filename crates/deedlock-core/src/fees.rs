//! # Fee Arithmetic — Basis Points and the Release Split
//!
//! Defines cap-validated basis-point fee rates and the payout
//! decomposition applied when escrowed funds are released to the seller.
//!
//! ## Invariant
//!
//! For every deposit amount and every fee pair within the cap,
//! `seller + agent + platform == amount` exactly. Integer division
//! truncates each fee portion downward, so the rounding remainder always
//! accrues to the seller.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Denominator of the basis-point scale (100% == 10_000 bps).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// A fee rate in basis points, validated against the platform cap.
///
/// 1 basis point is 1/100th of a percent; 250 bps is 2.5%. The cap of
/// [`BasisPoints::MAX_FEE`] (5%) applies to the platform fee and the
/// agent fee independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BasisPoints(u16);

impl BasisPoints {
    /// Maximum permitted fee: 500 bps (5%).
    pub const MAX_FEE: u16 = 500;

    /// A zero fee.
    pub const ZERO: BasisPoints = BasisPoints(0);

    /// Create a fee rate, rejecting values above the cap.
    pub fn new(bps: u16) -> Result<Self, ValidationError> {
        if bps > Self::MAX_FEE {
            return Err(ValidationError::FeeAboveCap {
                requested: bps,
                cap: Self::MAX_FEE,
            });
        }
        Ok(Self(bps))
    }

    /// The raw basis-point value.
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Apply this rate to an amount, truncating downward.
    ///
    /// Computed as `amount / 10_000 * bps + amount % 10_000 * bps / 10_000`,
    /// which equals `floor(amount * bps / 10_000)` without overflowing for
    /// any `u128` amount.
    pub fn apply(&self, amount: u128) -> u128 {
        let bps = u128::from(self.0);
        (amount / BPS_DENOMINATOR) * bps + (amount % BPS_DENOMINATOR) * bps / BPS_DENOMINATOR
    }
}

impl std::fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} bps", self.0)
    }
}

/// The fee configuration applied on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee retained by the platform wallet.
    pub platform_fee: BasisPoints,
    /// Fee paid to the assigned agent, when one is assigned.
    pub agent_fee: BasisPoints,
}

impl FeeSchedule {
    /// A schedule with both fees at zero.
    pub fn free() -> Self {
        Self {
            platform_fee: BasisPoints::ZERO,
            agent_fee: BasisPoints::ZERO,
        }
    }

    /// Decompose a deposit amount into the release payout.
    ///
    /// The agent portion is zero when no agent is assigned; the seller
    /// receives the remainder, including all truncation dust.
    pub fn split(&self, amount: u128, agent_assigned: bool) -> FeeSplit {
        let platform = self.platform_fee.apply(amount);
        let agent = if agent_assigned {
            self.agent_fee.apply(amount)
        } else {
            0
        };
        FeeSplit {
            seller: amount - platform - agent,
            agent,
            platform,
        }
    }
}

/// The payout decomposition of a released deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    /// Amount paid to the seller.
    pub seller: u128,
    /// Amount paid to the assigned agent.
    pub agent: u128,
    /// Amount retained by the platform wallet.
    pub platform: u128,
}

impl FeeSplit {
    /// Total of all parts; equals the deposit amount by construction.
    pub fn total(&self) -> u128 {
        self.seller + self.agent + self.platform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bps(v: u16) -> BasisPoints {
        BasisPoints::new(v).unwrap()
    }

    // ── Cap enforcement ──────────────────────────────────────────────

    #[test]
    fn test_cap_accepted_at_boundary() {
        assert_eq!(bps(500).value(), 500);
        assert_eq!(bps(0).value(), 0);
    }

    #[test]
    fn test_cap_rejected_above_boundary() {
        let result = BasisPoints::new(501);
        assert!(matches!(
            result,
            Err(ValidationError::FeeAboveCap { requested: 501, cap: 500 })
        ));
    }

    // ── Rate application ─────────────────────────────────────────────

    #[test]
    fn test_apply_exact_percentages() {
        assert_eq!(bps(250).apply(1000), 25);
        assert_eq!(bps(500).apply(1000), 50);
        assert_eq!(bps(100).apply(10_000), 100);
    }

    #[test]
    fn test_apply_truncates_downward() {
        // 250 bps of 999 = 24.975 → 24
        assert_eq!(bps(250).apply(999), 24);
        assert_eq!(bps(1).apply(9_999), 0);
    }

    #[test]
    fn test_apply_zero_rate() {
        assert_eq!(BasisPoints::ZERO.apply(u128::MAX), 0);
    }

    #[test]
    fn test_apply_no_overflow_at_max_amount() {
        // Must not panic; 5% of u128::MAX.
        let fee = bps(500).apply(u128::MAX);
        assert!(fee < u128::MAX);
    }

    // ── Split ────────────────────────────────────────────────────────

    #[test]
    fn test_split_reference_scenario() {
        // amount 1000, platform 250 bps, no agent fee:
        // seller 975, platform 25.
        let schedule = FeeSchedule {
            platform_fee: bps(250),
            agent_fee: BasisPoints::ZERO,
        };
        let split = schedule.split(1000, false);
        assert_eq!(split.seller, 975);
        assert_eq!(split.platform, 25);
        assert_eq!(split.agent, 0);
    }

    #[test]
    fn test_split_with_agent() {
        let schedule = FeeSchedule {
            platform_fee: bps(250),
            agent_fee: bps(100),
        };
        let split = schedule.split(10_000, true);
        assert_eq!(split.platform, 250);
        assert_eq!(split.agent, 100);
        assert_eq!(split.seller, 9_650);
    }

    #[test]
    fn test_split_agent_fee_suppressed_when_unassigned() {
        let schedule = FeeSchedule {
            platform_fee: bps(250),
            agent_fee: bps(100),
        };
        let split = schedule.split(10_000, false);
        assert_eq!(split.agent, 0);
        assert_eq!(split.seller, 9_750);
    }

    #[test]
    fn test_split_remainder_goes_to_seller() {
        // 250 bps of 1001 = 25.025 → 25; seller takes the dust.
        let schedule = FeeSchedule {
            platform_fee: bps(250),
            agent_fee: BasisPoints::ZERO,
        };
        let split = schedule.split(1001, false);
        assert_eq!(split.platform, 25);
        assert_eq!(split.seller, 976);
        assert_eq!(split.total(), 1001);
    }

    // ── Conservation property ────────────────────────────────────────

    proptest! {
        #[test]
        fn prop_split_conserves_amount(
            amount in any::<u128>(),
            platform_bps in 0u16..=BasisPoints::MAX_FEE,
            agent_bps in 0u16..=BasisPoints::MAX_FEE,
            agent_assigned in any::<bool>(),
        ) {
            let schedule = FeeSchedule {
                platform_fee: BasisPoints::new(platform_bps).unwrap(),
                agent_fee: BasisPoints::new(agent_bps).unwrap(),
            };
            let split = schedule.split(amount, agent_assigned);
            prop_assert_eq!(split.total(), amount);
            prop_assert!(split.platform <= amount);
            prop_assert!(split.agent <= amount);
            if !agent_assigned {
                prop_assert_eq!(split.agent, 0);
            }
        }
    }
}
