//! # Escrow Status and Approvals
//!
//! The lifecycle status enum, the approval-capable party set, and the
//! per-record approval flags.

use serde::{Deserialize, Serialize};

/// The lifecycle status of an escrow record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscrowStatus {
    /// Record created; awaiting the buyer's deposit.
    Created,
    /// Deposit held in custody; awaiting property verification.
    Funded,
    /// Verification complete; collecting party approvals.
    Verified,
    /// A participant has raised a dispute; awaiting the arbiter.
    Disputed,
    /// Funds paid out to seller, agent, and platform (terminal).
    Released,
    /// Escrow cancelled, any custody refunded to the buyer (terminal).
    Cancelled,
}

impl EscrowStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Cancelled)
    }

    /// The canonical status name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Funded => "FUNDED",
            Self::Verified => "VERIFIED",
            Self::Disputed => "DISPUTED",
            Self::Released => "RELEASED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for EscrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The approval-capable parties of an escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Party {
    /// The buying party.
    Buyer,
    /// The selling party.
    Seller,
    /// The assigned verification agent.
    Agent,
}

impl Party {
    /// The canonical party name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "BUYER",
            Self::Seller => "SELLER",
            Self::Agent => "AGENT",
        }
    }
}

impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Release approvals collected while an escrow is `Verified`.
///
/// Each flag is set at most once; there is no reset path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalSet {
    /// Buyer approval.
    pub buyer: bool,
    /// Seller approval.
    pub seller: bool,
    /// Agent approval (meaningful only when an agent is assigned).
    pub agent: bool,
}

impl ApprovalSet {
    /// Whether `party` has already approved.
    pub fn has_approved(&self, party: Party) -> bool {
        match party {
            Party::Buyer => self.buyer,
            Party::Seller => self.seller,
            Party::Agent => self.agent,
        }
    }

    /// Record an approval for `party`.
    pub fn record(&mut self, party: Party) {
        match party {
            Party::Buyer => self.buyer = true,
            Party::Seller => self.seller = true,
            Party::Agent => self.agent = true,
        }
    }

    /// Parties whose approval is still outstanding. Agent approval is
    /// required only when an agent is assigned.
    pub fn missing(&self, agent_assigned: bool) -> Vec<Party> {
        let mut missing = Vec::new();
        if !self.buyer {
            missing.push(Party::Buyer);
        }
        if !self.seller {
            missing.push(Party::Seller);
        }
        if agent_assigned && !self.agent {
            missing.push(Party::Agent);
        }
        missing
    }

    /// Whether every required approval is present.
    pub fn is_complete(&self, agent_assigned: bool) -> bool {
        self.missing(agent_assigned).is_empty()
    }
}
