//! # Escrow Record and Transitions
//!
//! One record per property sale, owning its lifecycle from creation
//! through release, cancellation, or arbitration.
//!
//! ## Operation discipline
//!
//! Every operation runs its checks in a fixed order (authorization,
//! then the status guard, then input validation) and mutates nothing
//! until all of them pass. Inbound token pulls (the deposit) run before
//! the status write, so a failed pull leaves the record in `Created`.
//! Outbound payouts (release, refund, resolution) run after the status
//! is finalized to its terminal value; with the custody invariant in
//! force those transfers cannot fail on funds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use deedlock_core::{
    Address, AuthorizationContext, ContentDigest, EscrowId, FeeSchedule, FeeSplit, PropertyId,
    Role, Timestamp,
};
use deedlock_token::{TokenError, TokenGateway};

use crate::custody::custody_address;
use crate::status::{ApprovalSet, EscrowStatus, Party};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from escrow operations.
#[derive(Error, Debug)]
pub enum EscrowError {
    /// The operation is not valid in the record's current status.
    #[error("invalid escrow state for {action}: {current}")]
    InvalidState {
        /// Current status.
        current: EscrowStatus,
        /// The attempted action.
        action: &'static str,
    },

    /// Deposit attempted by someone other than the buyer.
    #[error("only the buyer can deposit funds")]
    OnlyBuyer,

    /// Release attempted by someone other than the seller.
    #[error("only the seller can release funds")]
    OnlySeller,

    /// Resolution attempted by someone other than the arbiter.
    #[error("only the arbiter can resolve a dispute")]
    OnlyArbiter,

    /// The caller has no relationship to the record permitting the action.
    #[error("not authorized to {action}")]
    NotAuthorized {
        /// The attempted action.
        action: &'static str,
    },

    /// The party has already recorded its approval.
    #[error("{party} already approved")]
    AlreadyApproved {
        /// The double-approving party.
        party: Party,
    },

    /// Release attempted before every required approval was recorded.
    #[error("release conditions not met: missing approvals {missing:?}")]
    ApprovalsIncomplete {
        /// Parties whose approval is outstanding.
        missing: Vec<Party>,
    },

    /// Dispute raised with an empty reason.
    #[error("dispute reason must not be empty")]
    EmptyDisputeReason,

    /// Dispute resolved with empty resolution text.
    #[error("resolution text must not be empty")]
    EmptyResolution,

    /// Refund attempted on a settled record.
    #[error("cannot refund in current state: {current}")]
    CannotRefund {
        /// Current (terminal) status.
        current: EscrowStatus,
    },

    /// A token movement failed; propagated from the gateway.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// A role check failed; propagated from the authorization context.
    #[error(transparent)]
    Authorization(#[from] deedlock_core::AuthorizationError),
}

// ─── Transition Record ───────────────────────────────────────────────

/// Record of a single status transition.
///
/// Every transition is logged with its timestamp and acting address,
/// giving each record an immutable audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Status before the transition.
    pub from_status: EscrowStatus,
    /// Status after the transition.
    pub to_status: EscrowStatus,
    /// When the transition occurred.
    pub timestamp: Timestamp,
    /// The address that triggered the transition.
    pub actor: Address,
    /// Why the transition happened.
    pub reason: String,
}

// ─── Terms ───────────────────────────────────────────────────────────

/// The validated, immutable terms an escrow is created with.
///
/// Default resolution (factory defaults for agent/arbiter, whitelist and
/// compliance checks) happens in the platform layer before these terms
/// are built; by the time an `Escrow` exists its terms are final.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowTerms {
    /// The buying party.
    pub buyer: Address,
    /// The selling party.
    pub seller: Address,
    /// The assigned verification agent, if any.
    pub agent: Option<Address>,
    /// The dispute arbiter.
    pub arbiter: Address,
    /// Settlement token contract.
    pub token: Address,
    /// Deposit amount in the token's smallest unit; strictly positive.
    pub deposit_amount: u128,
    /// Deadline for the buyer's deposit (advisory).
    pub deposit_deadline: Timestamp,
    /// Deadline for verification (advisory).
    pub verification_deadline: Option<Timestamp>,
    /// The property under sale.
    pub property_id: PropertyId,
    /// Digest of the sale documents, if bound.
    pub document_digest: Option<ContentDigest>,
}

// ─── Escrow ──────────────────────────────────────────────────────────

/// An escrow record with its lifecycle state and transition history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Escrow {
    /// Sequential record identifier.
    pub id: EscrowId,
    /// The buying party.
    pub buyer: Address,
    /// The selling party.
    pub seller: Address,
    /// The assigned verification agent, if any.
    pub agent: Option<Address>,
    /// The dispute arbiter.
    pub arbiter: Address,
    /// Settlement token contract.
    pub token: Address,
    /// Deposit amount in the token's smallest unit.
    pub deposit_amount: u128,
    /// Deadline for the buyer's deposit (advisory).
    pub deposit_deadline: Timestamp,
    /// Deadline for verification (advisory).
    pub verification_deadline: Option<Timestamp>,
    /// The property under sale.
    pub property_id: PropertyId,
    /// Digest of the sale documents, if bound.
    pub document_digest: Option<ContentDigest>,
    /// Custody address holding the deposit while in flight.
    pub custody: Address,
    /// Current lifecycle status.
    pub status: EscrowStatus,
    /// Release approvals collected so far.
    pub approvals: ApprovalSet,
    /// Reason recorded when a dispute was raised.
    pub dispute_reason: Option<String>,
    /// Resolution text recorded by the arbiter.
    pub resolution: Option<String>,
    /// When the deposit landed in custody.
    pub funded_at: Option<Timestamp>,
    /// When the record was created.
    pub created_at: Timestamp,
    /// Ordered log of all status transitions.
    transitions: Vec<TransitionRecord>,
}

impl Escrow {
    /// Create a record in `Created` status under the given platform wallet.
    pub fn new(id: EscrowId, terms: EscrowTerms, platform_wallet: &Address) -> Self {
        let custody = custody_address(platform_wallet, id);
        Self {
            id,
            buyer: terms.buyer,
            seller: terms.seller,
            agent: terms.agent,
            arbiter: terms.arbiter,
            token: terms.token,
            deposit_amount: terms.deposit_amount,
            deposit_deadline: terms.deposit_deadline,
            verification_deadline: terms.verification_deadline,
            property_id: terms.property_id,
            document_digest: terms.document_digest,
            custody,
            status: EscrowStatus::Created,
            approvals: ApprovalSet::default(),
            dispute_reason: None,
            resolution: None,
            funded_at: None,
            created_at: Timestamp::now(),
            transitions: Vec::new(),
        }
    }

    // ─── Lifecycle operations ────────────────────────────────────────

    /// Pull the deposit from the buyer into custody (CREATED → FUNDED).
    ///
    /// Requires the buyer to have approved an allowance covering the
    /// deposit; allowance and balance failures propagate from the
    /// gateway and leave the record in `Created`.
    pub fn deposit_funds(
        &mut self,
        caller: &Address,
        tokens: &mut dyn TokenGateway,
    ) -> Result<(), EscrowError> {
        if caller != &self.buyer {
            return Err(EscrowError::OnlyBuyer);
        }
        self.require_status(EscrowStatus::Created, "deposit")?;

        tokens.transfer_from(
            &self.token,
            &self.custody,
            &self.buyer,
            &self.custody,
            self.deposit_amount,
        )?;

        self.funded_at = Some(Timestamp::now());
        self.transition(EscrowStatus::Funded, caller, "deposit received into custody");
        Ok(())
    }

    /// Mark property verification complete (FUNDED → VERIFIED).
    ///
    /// With an assigned agent, only that agent may verify. With no
    /// assigned agent, any holder of `AGENT_ROLE` may.
    pub fn complete_verification(
        &mut self,
        caller: &Address,
        auth: &dyn AuthorizationContext,
    ) -> Result<(), EscrowError> {
        match &self.agent {
            Some(agent) if caller == agent => {}
            Some(_) => {
                return Err(EscrowError::NotAuthorized {
                    action: "complete verification",
                });
            }
            None => auth.require_role(caller, Role::Agent)?,
        }
        self.require_status(EscrowStatus::Funded, "verification")?;

        self.transition(EscrowStatus::Verified, caller, "property verification complete");
        Ok(())
    }

    /// Record the caller's release approval (VERIFIED only).
    ///
    /// Each party approves at most once; the returned value names the
    /// party slot the approval filled.
    pub fn give_approval(&mut self, caller: &Address) -> Result<Party, EscrowError> {
        let party = self.party_of(caller).ok_or(EscrowError::NotAuthorized {
            action: "approve",
        })?;
        self.require_status(EscrowStatus::Verified, "approval")?;
        if self.approvals.has_approved(party) {
            return Err(EscrowError::AlreadyApproved { party });
        }

        self.approvals.record(party);
        Ok(party)
    }

    /// Pay out the deposit (VERIFIED → RELEASED).
    ///
    /// Only the seller may trigger the release, and only once every
    /// required approval is in. The status is finalized before any
    /// transfer leaves custody.
    pub fn release_funds(
        &mut self,
        caller: &Address,
        fees: &FeeSchedule,
        platform_wallet: &Address,
        tokens: &mut dyn TokenGateway,
    ) -> Result<FeeSplit, EscrowError> {
        if caller != &self.seller {
            return Err(EscrowError::OnlySeller);
        }
        self.require_status(EscrowStatus::Verified, "release")?;
        let missing = self.approvals.missing(self.agent.is_some());
        if !missing.is_empty() {
            return Err(EscrowError::ApprovalsIncomplete { missing });
        }

        let split = fees.split(self.deposit_amount, self.agent.is_some());
        self.transition(EscrowStatus::Released, caller, "funds released to seller");
        self.pay_out(&split, platform_wallet, tokens)?;
        Ok(split)
    }

    /// Raise a dispute (any non-terminal status → DISPUTED).
    ///
    /// Buyer, seller, or the assigned agent may dispute; a non-empty
    /// reason is required.
    pub fn raise_dispute(&mut self, caller: &Address, reason: &str) -> Result<(), EscrowError> {
        if self.party_of(caller).is_none() {
            return Err(EscrowError::NotAuthorized {
                action: "raise a dispute",
            });
        }
        if self.status.is_terminal() || self.status == EscrowStatus::Disputed {
            return Err(EscrowError::InvalidState {
                current: self.status,
                action: "dispute",
            });
        }
        if reason.trim().is_empty() {
            return Err(EscrowError::EmptyDisputeReason);
        }

        self.dispute_reason = Some(reason.to_string());
        self.transition(EscrowStatus::Disputed, caller, "dispute raised");
        Ok(())
    }

    /// Resolve a dispute (DISPUTED → CANCELLED or RELEASED).
    ///
    /// Only the arbiter may resolve. Ruling for the buyer refunds the
    /// full deposit and cancels the escrow; ruling for the seller runs
    /// the ordinary payout split. Unfunded records settle without any
    /// transfer.
    pub fn resolve_dispute(
        &mut self,
        caller: &Address,
        favor_buyer: bool,
        resolution: &str,
        fees: &FeeSchedule,
        platform_wallet: &Address,
        tokens: &mut dyn TokenGateway,
    ) -> Result<EscrowStatus, EscrowError> {
        if caller != &self.arbiter {
            return Err(EscrowError::OnlyArbiter);
        }
        self.require_status(EscrowStatus::Disputed, "resolution")?;
        if resolution.trim().is_empty() {
            return Err(EscrowError::EmptyResolution);
        }

        self.resolution = Some(resolution.to_string());
        if favor_buyer {
            self.transition(EscrowStatus::Cancelled, caller, "dispute resolved for buyer");
            if self.funded_at.is_some() {
                tokens.transfer(&self.token, &self.custody, &self.buyer, self.deposit_amount)?;
            }
        } else {
            let split = fees.split(self.deposit_amount, self.agent.is_some());
            self.transition(EscrowStatus::Released, caller, "dispute resolved for seller");
            if self.funded_at.is_some() {
                self.pay_out(&split, platform_wallet, tokens)?;
            }
        }
        Ok(self.status)
    }

    /// Cancel the escrow and refund the buyer (admin path).
    ///
    /// The platform's recourse for expired or abandoned escrows; the
    /// deadline fields are advisory inputs to whoever invokes this.
    /// Returns the refunded amount (zero when never funded).
    pub fn refund_buyer(
        &mut self,
        caller: &Address,
        auth: &dyn AuthorizationContext,
        tokens: &mut dyn TokenGateway,
    ) -> Result<u128, EscrowError> {
        auth.require_role(caller, Role::Admin)?;
        if self.status.is_terminal() {
            return Err(EscrowError::CannotRefund {
                current: self.status,
            });
        }

        let refunded = if self.funded_at.is_some() {
            self.deposit_amount
        } else {
            0
        };
        self.transition(EscrowStatus::Cancelled, caller, "escrow cancelled by admin");
        if refunded > 0 {
            tokens.transfer(&self.token, &self.custody, &self.buyer, refunded)?;
        }
        Ok(refunded)
    }

    // ─── Views ───────────────────────────────────────────────────────

    /// Whether the record is settled.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether `release_funds` would pass its guards right now.
    pub fn can_release(&self) -> bool {
        self.status == EscrowStatus::Verified && self.approvals.is_complete(self.agent.is_some())
    }

    /// Whether the deposit deadline has passed as of `now`.
    pub fn deposit_deadline_passed(&self, now: Timestamp) -> bool {
        now > self.deposit_deadline
    }

    /// The party slot `caller` occupies, if any.
    pub fn party_of(&self, caller: &Address) -> Option<Party> {
        if caller == &self.buyer {
            Some(Party::Buyer)
        } else if caller == &self.seller {
            Some(Party::Seller)
        } else if self.agent.as_ref() == Some(caller) {
            Some(Party::Agent)
        } else {
            None
        }
    }

    /// The immutable transition log.
    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    // ─── Internals ───────────────────────────────────────────────────

    fn require_status(
        &self,
        expected: EscrowStatus,
        action: &'static str,
    ) -> Result<(), EscrowError> {
        if self.status != expected {
            return Err(EscrowError::InvalidState {
                current: self.status,
                action,
            });
        }
        Ok(())
    }

    fn transition(&mut self, to: EscrowStatus, actor: &Address, reason: &str) {
        self.transitions.push(TransitionRecord {
            from_status: self.status,
            to_status: to,
            timestamp: Timestamp::now(),
            actor: *actor,
            reason: reason.to_string(),
        });
        self.status = to;
    }

    /// Drain custody into the split's recipients. Called only after the
    /// status has been finalized to a terminal value.
    fn pay_out(
        &self,
        split: &FeeSplit,
        platform_wallet: &Address,
        tokens: &mut dyn TokenGateway,
    ) -> Result<(), EscrowError> {
        tokens.transfer(&self.token, &self.custody, &self.seller, split.seller)?;
        if let Some(agent) = &self.agent {
            if split.agent > 0 {
                tokens.transfer(&self.token, &self.custody, agent, split.agent)?;
            }
        }
        if split.platform > 0 {
            tokens.transfer(&self.token, &self.custody, platform_wallet, split.platform)?;
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
