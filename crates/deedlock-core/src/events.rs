//! # Platform Event Log
//!
//! An append-only log of everything observable that happens on the
//! platform: escrow lifecycle milestones, fund movements, and
//! administrative changes. External readers (indexers, UIs) consume this
//! log; the core never reads it back for decisions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::address::Address;
use crate::identity::EscrowId;
use crate::temporal::Timestamp;

/// Unique identifier for an emitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Generate a new random event identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "event:{}", self.0)
    }
}

/// Everything the platform announces to the outside world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformEvent {
    /// A new escrow record was created.
    EscrowCreated {
        /// The new record's identifier.
        escrow_id: EscrowId,
        /// Buying party.
        buyer: Address,
        /// Selling party.
        seller: Address,
        /// Settlement token contract.
        token: Address,
        /// Deposit amount in the token's smallest unit.
        amount: u128,
    },
    /// The buyer's deposit was pulled into custody.
    FundsDeposited {
        /// The funded record.
        escrow_id: EscrowId,
        /// The depositing address (the buyer).
        from: Address,
        /// Amount pulled into custody.
        amount: u128,
    },
    /// Property verification completed.
    VerificationCompleted {
        /// The verified record.
        escrow_id: EscrowId,
        /// The verifying agent.
        verifier: Address,
    },
    /// A party recorded its release approval.
    ApprovalGiven {
        /// The approved record.
        escrow_id: EscrowId,
        /// The approving address.
        approver: Address,
        /// Which party slot the approval filled (wire name).
        party: String,
    },
    /// Escrowed funds were paid out to seller, agent, and platform.
    FundsReleased {
        /// The released record.
        escrow_id: EscrowId,
        /// Seller payout.
        seller_amount: u128,
        /// Agent fee paid.
        agent_fee: u128,
        /// Platform fee retained.
        platform_fee: u128,
    },
    /// The escrow was cancelled and any custody refunded.
    EscrowCancelled {
        /// The cancelled record.
        escrow_id: EscrowId,
        /// Amount refunded to the buyer (zero if never funded).
        refunded: u128,
    },
    /// A participant raised a dispute.
    DisputeRaised {
        /// The disputed record.
        escrow_id: EscrowId,
        /// The disputing address.
        by: Address,
        /// The stated reason.
        reason: String,
    },
    /// The arbiter resolved a dispute.
    DisputeResolved {
        /// The resolved record.
        escrow_id: EscrowId,
        /// Whether the ruling favored the buyer (refund) or the seller
        /// (payout).
        favor_buyer: bool,
    },
    /// A settlement token was added to or removed from the whitelist.
    TokenWhitelisted {
        /// The token contract.
        token: Address,
        /// New whitelist position.
        enabled: bool,
    },
    /// The platform fee was changed.
    PlatformFeeUpdated {
        /// New fee in basis points.
        fee_bps: u16,
    },
    /// The default agent was changed.
    DefaultAgentSet {
        /// New default agent.
        agent: Address,
    },
    /// The default arbiter was changed.
    DefaultArbiterSet {
        /// New default arbiter.
        arbiter: Address,
    },
    /// The platform was paused.
    Paused,
    /// The platform was unpaused.
    Unpaused,
}

impl PlatformEvent {
    /// The escrow this event concerns, if it is escrow-scoped.
    pub fn escrow_id(&self) -> Option<EscrowId> {
        match self {
            Self::EscrowCreated { escrow_id, .. }
            | Self::FundsDeposited { escrow_id, .. }
            | Self::VerificationCompleted { escrow_id, .. }
            | Self::ApprovalGiven { escrow_id, .. }
            | Self::FundsReleased { escrow_id, .. }
            | Self::EscrowCancelled { escrow_id, .. }
            | Self::DisputeRaised { escrow_id, .. }
            | Self::DisputeResolved { escrow_id, .. } => Some(*escrow_id),
            _ => None,
        }
    }
}

/// One entry in the event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique identifier of this emission.
    pub id: EventId,
    /// When the event was recorded.
    pub at: Timestamp,
    /// The event payload.
    pub event: PlatformEvent,
}

/// Append-only event log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, returning its assigned identifier.
    pub fn append(&mut self, event: PlatformEvent) -> EventId {
        let id = EventId::new();
        self.records.push(EventRecord {
            id,
            at: Timestamp::now(),
            event,
        });
        id
    }

    /// All recorded events, oldest first.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Events concerning one escrow, oldest first.
    pub fn for_escrow(&self, id: EscrowId) -> Vec<&EventRecord> {
        self.records
            .iter()
            .filter(|r| r.event.escrow_id() == Some(id))
            .collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn test_append_assigns_unique_ids() {
        let mut log = EventLog::new();
        let a = log.append(PlatformEvent::Paused);
        let b = log.append(PlatformEvent::Unpaused);
        assert_ne!(a, b);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_for_escrow_filters() {
        let mut log = EventLog::new();
        log.append(PlatformEvent::FundsDeposited {
            escrow_id: EscrowId(0),
            from: addr(1),
            amount: 100,
        });
        log.append(PlatformEvent::Paused);
        log.append(PlatformEvent::VerificationCompleted {
            escrow_id: EscrowId(1),
            verifier: addr(2),
        });
        log.append(PlatformEvent::DisputeRaised {
            escrow_id: EscrowId(0),
            by: addr(1),
            reason: "late".to_string(),
        });

        let for_zero = log.for_escrow(EscrowId(0));
        assert_eq!(for_zero.len(), 2);
        let for_one = log.for_escrow(EscrowId(1));
        assert_eq!(for_one.len(), 1);
    }

    #[test]
    fn test_admin_events_have_no_escrow_id() {
        assert_eq!(PlatformEvent::Paused.escrow_id(), None);
        assert_eq!(
            PlatformEvent::PlatformFeeUpdated { fee_bps: 250 }.escrow_id(),
            None
        );
    }

    #[test]
    fn test_event_serde_uses_screaming_tags() {
        let event = PlatformEvent::TokenWhitelisted {
            token: addr(9),
            enabled: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"TOKEN_WHITELISTED\""));
        let parsed: PlatformEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
