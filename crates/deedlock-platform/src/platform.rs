//! # Platform — Factory, Registry, and Operation Routing
//!
//! A `Platform` instance is the single owner of the escrow table and
//! the platform-wide stores. It creates records with validated
//! parameters and routes every lifecycle operation to the right record
//! with pause checks and event emission around it.

use std::collections::BTreeMap;

use thiserror::Error;

use deedlock_compliance::{ComplianceRegistry, TransactionVerdict};
use deedlock_core::{
    Address, AuthorizationContext, BasisPoints, ContentDigest, EscrowId, EventLog, EventRecord,
    FeeSchedule, FeeSplit, PauseError, PauseSwitch, PlatformEvent, PropertyId, Role, RoleRegistry,
    Timestamp, ValidationError,
};
use deedlock_escrow::{Escrow, EscrowError, EscrowStatus, EscrowTerms};
use deedlock_token::TokenGateway;

use crate::config::PlatformConfig;
use crate::whitelist::{TokenWhitelist, WhitelistError, WhitelistMode};

// ─── Errors ──────────────────────────────────────────────────────────

/// Top-level error for platform entry points.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// A creation or configuration parameter violated a rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A role check failed.
    #[error(transparent)]
    Authorization(#[from] deedlock_core::AuthorizationError),

    /// The platform is paused.
    #[error(transparent)]
    Paused(#[from] PauseError),

    /// An escrow operation failed.
    #[error(transparent)]
    Escrow(#[from] EscrowError),

    /// A whitelist mutation failed.
    #[error(transparent)]
    Whitelist(#[from] WhitelistError),

    /// No escrow exists under the given id.
    #[error("unknown {id}")]
    UnknownEscrow {
        /// The unresolved identifier.
        id: EscrowId,
    },

    /// Escrow creation named a token outside the whitelist.
    #[error("token {token} not whitelisted")]
    TokenNotWhitelisted {
        /// The unlisted token.
        token: Address,
    },

    /// The compliance registry rejected a participant pair.
    #[error("compliance check failed: {reason}")]
    ComplianceRejected {
        /// The registry's rejection reason.
        reason: String,
    },
}

// ─── Creation Parameters ─────────────────────────────────────────────

/// Flat escrow-creation parameters as submitted by external callers.
///
/// The zero address in `agent` or `arbiter` means "use the platform
/// default"; an escrow may end up with no agent, but must have an
/// arbiter after default resolution.
#[derive(Debug, Clone)]
pub struct CreateEscrowParams {
    /// The buying party.
    pub buyer: Address,
    /// The selling party.
    pub seller: Address,
    /// Verification agent; zero means platform default.
    pub agent: Address,
    /// Dispute arbiter; zero means platform default.
    pub arbiter: Address,
    /// Settlement token contract; must be whitelisted.
    pub token: Address,
    /// Deposit amount in the token's smallest unit; strictly positive.
    pub deposit_amount: u128,
    /// Deadline for the buyer's deposit; strictly in the future.
    pub deposit_deadline: Timestamp,
    /// Optional verification deadline.
    pub verification_deadline: Option<Timestamp>,
    /// The property under sale; non-empty.
    pub property_id: String,
    /// Optional digest of the sale documents.
    pub document_digest: Option<ContentDigest>,
}

// ─── Platform ────────────────────────────────────────────────────────

/// The factory and registry owning all escrow records of a deployment.
#[derive(Debug)]
pub struct Platform {
    config: PlatformConfig,
    fees: FeeSchedule,
    whitelist: TokenWhitelist,
    roles: RoleRegistry,
    compliance: Option<ComplianceRegistry>,
    escrows: BTreeMap<EscrowId, Escrow>,
    next_id: u64,
    pause: PauseSwitch,
    events: EventLog,
}

impl Platform {
    /// Create a platform from a validated configuration, bootstrapping
    /// the role registry with the given admin.
    pub fn new(config: PlatformConfig, admin: Address) -> Result<Self, PlatformError> {
        config.validate()?;
        let fees = config.fee_schedule()?;
        let mode = if config.strict_whitelist {
            WhitelistMode::Strict
        } else {
            WhitelistMode::Idempotent
        };
        Ok(Self {
            whitelist: TokenWhitelist::new(mode),
            roles: RoleRegistry::with_admin(admin),
            compliance: None,
            escrows: BTreeMap::new(),
            next_id: 0,
            pause: PauseSwitch::new(),
            events: EventLog::new(),
            fees,
            config,
        })
    }

    /// Attach a compliance registry; from now on escrow creation gates
    /// buyer and seller through it.
    pub fn attach_compliance(&mut self, registry: ComplianceRegistry) {
        self.compliance = Some(registry);
    }

    // ─── Escrow creation ─────────────────────────────────────────────

    /// Validate parameters and create a new escrow record.
    ///
    /// Validation reports the most specific violated rule, checked in
    /// order: empty property id, zero buyer/seller, zero amount, past
    /// deadline, non-whitelisted token, compliance. Ids are assigned
    /// from a monotonic counter starting at 0.
    pub fn create_escrow(
        &mut self,
        caller: &Address,
        params: CreateEscrowParams,
    ) -> Result<EscrowId, PlatformError> {
        self.pause.ensure_active()?;

        let property_id = PropertyId::new(params.property_id)?;
        if params.buyer.is_zero() {
            return Err(ValidationError::ZeroAddress { field: "buyer" }.into());
        }
        if params.seller.is_zero() {
            return Err(ValidationError::ZeroAddress { field: "seller" }.into());
        }
        if params.deposit_amount == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }
        if params.deposit_deadline <= Timestamp::now() {
            return Err(ValidationError::DeadlineInPast {
                deadline: params.deposit_deadline.to_iso8601(),
            }
            .into());
        }
        if !self.whitelist.is_whitelisted(&params.token) {
            return Err(PlatformError::TokenNotWhitelisted {
                token: params.token,
            });
        }
        if let Some(compliance) = &self.compliance {
            if let TransactionVerdict::Rejected(reason) =
                compliance.validate_transaction(&params.buyer, &params.seller, params.deposit_amount)
            {
                return Err(PlatformError::ComplianceRejected {
                    reason: reason.to_string(),
                });
            }
        }

        let agent = resolve_default(params.agent, self.config.default_agent);
        let arbiter = resolve_default(params.arbiter, self.config.default_arbiter)
            .ok_or(ValidationError::ZeroAddress { field: "arbiter" })?;

        let id = EscrowId(self.next_id);
        self.next_id += 1;

        let escrow = Escrow::new(
            id,
            EscrowTerms {
                buyer: params.buyer,
                seller: params.seller,
                agent,
                arbiter,
                token: params.token,
                deposit_amount: params.deposit_amount,
                deposit_deadline: params.deposit_deadline,
                verification_deadline: params.verification_deadline,
                property_id,
                document_digest: params.document_digest,
            },
            &self.config.platform_wallet,
        );
        self.escrows.insert(id, escrow);

        self.events.append(PlatformEvent::EscrowCreated {
            escrow_id: id,
            buyer: params.buyer,
            seller: params.seller,
            token: params.token,
            amount: params.deposit_amount,
        });
        tracing::info!(
            escrow = %id,
            creator = %caller,
            amount = params.deposit_amount,
            "escrow created"
        );
        Ok(id)
    }

    // ─── Lifecycle routing ───────────────────────────────────────────

    /// Route the buyer's deposit to the record.
    pub fn deposit_funds(
        &mut self,
        caller: &Address,
        id: EscrowId,
        tokens: &mut dyn TokenGateway,
    ) -> Result<(), PlatformError> {
        self.pause.ensure_active()?;
        let escrow = self.escrows.get_mut(&id).ok_or(PlatformError::UnknownEscrow { id })?;
        escrow.deposit_funds(caller, tokens)?;
        let amount = escrow.deposit_amount;

        self.events.append(PlatformEvent::FundsDeposited {
            escrow_id: id,
            from: *caller,
            amount,
        });
        tracing::info!(escrow = %id, amount, "funds deposited");
        Ok(())
    }

    /// Route verification completion to the record.
    pub fn complete_verification(
        &mut self,
        caller: &Address,
        id: EscrowId,
    ) -> Result<(), PlatformError> {
        self.pause.ensure_active()?;
        let escrow = self.escrows.get_mut(&id).ok_or(PlatformError::UnknownEscrow { id })?;
        escrow.complete_verification(caller, &self.roles)?;

        self.events.append(PlatformEvent::VerificationCompleted {
            escrow_id: id,
            verifier: *caller,
        });
        tracing::info!(escrow = %id, verifier = %caller, "verification completed");
        Ok(())
    }

    /// Route a party approval to the record.
    pub fn give_approval(&mut self, caller: &Address, id: EscrowId) -> Result<(), PlatformError> {
        self.pause.ensure_active()?;
        let escrow = self.escrows.get_mut(&id).ok_or(PlatformError::UnknownEscrow { id })?;
        let party = escrow.give_approval(caller)?;

        self.events.append(PlatformEvent::ApprovalGiven {
            escrow_id: id,
            approver: *caller,
            party: party.to_string(),
        });
        tracing::info!(escrow = %id, party = %party, "approval given");
        Ok(())
    }

    /// Route the seller's release to the record.
    pub fn release_funds(
        &mut self,
        caller: &Address,
        id: EscrowId,
        tokens: &mut dyn TokenGateway,
    ) -> Result<FeeSplit, PlatformError> {
        self.pause.ensure_active()?;
        let escrow = self.escrows.get_mut(&id).ok_or(PlatformError::UnknownEscrow { id })?;
        let split =
            escrow.release_funds(caller, &self.fees, &self.config.platform_wallet, tokens)?;

        self.events.append(PlatformEvent::FundsReleased {
            escrow_id: id,
            seller_amount: split.seller,
            agent_fee: split.agent,
            platform_fee: split.platform,
        });
        tracing::info!(
            escrow = %id,
            seller_amount = split.seller,
            platform_fee = split.platform,
            "funds released"
        );
        Ok(split)
    }

    /// Route a dispute to the record.
    pub fn raise_dispute(
        &mut self,
        caller: &Address,
        id: EscrowId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        self.pause.ensure_active()?;
        let escrow = self.escrows.get_mut(&id).ok_or(PlatformError::UnknownEscrow { id })?;
        escrow.raise_dispute(caller, reason)?;

        self.events.append(PlatformEvent::DisputeRaised {
            escrow_id: id,
            by: *caller,
            reason: reason.to_string(),
        });
        tracing::warn!(escrow = %id, by = %caller, "dispute raised");
        Ok(())
    }

    /// Route the arbiter's resolution to the record.
    pub fn resolve_dispute(
        &mut self,
        caller: &Address,
        id: EscrowId,
        favor_buyer: bool,
        resolution: &str,
        tokens: &mut dyn TokenGateway,
    ) -> Result<EscrowStatus, PlatformError> {
        self.pause.ensure_active()?;
        let escrow = self.escrows.get_mut(&id).ok_or(PlatformError::UnknownEscrow { id })?;
        let outcome = escrow.resolve_dispute(
            caller,
            favor_buyer,
            resolution,
            &self.fees,
            &self.config.platform_wallet,
            tokens,
        )?;

        self.events.append(PlatformEvent::DisputeResolved {
            escrow_id: id,
            favor_buyer,
        });
        tracing::info!(escrow = %id, favor_buyer, outcome = %outcome, "dispute resolved");
        Ok(outcome)
    }

    /// Route an admin refund to the record.
    pub fn refund_buyer(
        &mut self,
        caller: &Address,
        id: EscrowId,
        tokens: &mut dyn TokenGateway,
    ) -> Result<u128, PlatformError> {
        self.pause.ensure_active()?;
        let escrow = self.escrows.get_mut(&id).ok_or(PlatformError::UnknownEscrow { id })?;
        let refunded = escrow.refund_buyer(caller, &self.roles, tokens)?;

        self.events.append(PlatformEvent::EscrowCancelled {
            escrow_id: id,
            refunded,
        });
        tracing::info!(escrow = %id, refunded, "escrow cancelled");
        Ok(refunded)
    }

    // ─── Administration ──────────────────────────────────────────────

    /// Enable or disable a settlement token. Admin only.
    pub fn whitelist_token(
        &mut self,
        caller: &Address,
        token: Address,
        enabled: bool,
    ) -> Result<(), PlatformError> {
        self.roles.require_role(caller, Role::Admin)?;
        self.whitelist.set(&token, enabled)?;

        self.events.append(PlatformEvent::TokenWhitelisted { token, enabled });
        tracing::info!(token = %token, enabled, "token whitelist updated");
        Ok(())
    }

    /// Update the platform fee, enforcing the cap. Admin only.
    pub fn set_platform_fee(&mut self, caller: &Address, fee_bps: u16) -> Result<(), PlatformError> {
        self.roles.require_role(caller, Role::Admin)?;
        self.fees.platform_fee = BasisPoints::new(fee_bps)?;
        self.config.platform_fee_bps = fee_bps;

        self.events.append(PlatformEvent::PlatformFeeUpdated { fee_bps });
        tracing::info!(fee_bps, "platform fee updated");
        Ok(())
    }

    /// Update the default agent. Admin only; rejects the zero address.
    pub fn set_default_agent(&mut self, caller: &Address, agent: Address) -> Result<(), PlatformError> {
        self.roles.require_role(caller, Role::Admin)?;
        if agent.is_zero() {
            return Err(ValidationError::ZeroAddress { field: "default_agent" }.into());
        }
        self.config.default_agent = Some(agent);

        self.events.append(PlatformEvent::DefaultAgentSet { agent });
        tracing::info!(agent = %agent, "default agent updated");
        Ok(())
    }

    /// Update the default arbiter. Admin only; rejects the zero address.
    pub fn set_default_arbiter(
        &mut self,
        caller: &Address,
        arbiter: Address,
    ) -> Result<(), PlatformError> {
        self.roles.require_role(caller, Role::Admin)?;
        if arbiter.is_zero() {
            return Err(ValidationError::ZeroAddress { field: "default_arbiter" }.into());
        }
        self.config.default_arbiter = Some(arbiter);

        self.events.append(PlatformEvent::DefaultArbiterSet { arbiter });
        tracing::info!(arbiter = %arbiter, "default arbiter updated");
        Ok(())
    }

    /// Pause the platform: creation and every lifecycle route fail
    /// closed until unpaused. Admin only.
    pub fn pause(&mut self, caller: &Address) -> Result<(), PlatformError> {
        self.roles.require_role(caller, Role::Admin)?;
        self.pause.pause()?;
        self.events.append(PlatformEvent::Paused);
        tracing::warn!("platform paused");
        Ok(())
    }

    /// Unpause the platform. Admin only.
    pub fn unpause(&mut self, caller: &Address) -> Result<(), PlatformError> {
        self.roles.require_role(caller, Role::Admin)?;
        self.pause.unpause()?;
        self.events.append(PlatformEvent::Unpaused);
        tracing::info!("platform unpaused");
        Ok(())
    }

    /// Grant a role. Admin only (enforced by the registry).
    pub fn grant_role(
        &mut self,
        caller: &Address,
        who: Address,
        role: Role,
    ) -> Result<(), PlatformError> {
        self.roles.grant_role(caller, who, role)?;
        Ok(())
    }

    /// Revoke a role. Admin only (enforced by the registry).
    pub fn revoke_role(
        &mut self,
        caller: &Address,
        who: &Address,
        role: Role,
    ) -> Result<(), PlatformError> {
        self.roles.revoke_role(caller, who, role)?;
        Ok(())
    }

    // ─── Views ───────────────────────────────────────────────────────

    /// Snapshot of one escrow record.
    pub fn escrow(&self, id: EscrowId) -> Option<&Escrow> {
        self.escrows.get(&id)
    }

    /// Number of escrows ever created (also the next id to be assigned).
    pub fn escrow_count(&self) -> u64 {
        self.next_id
    }

    /// Whether a release would pass its guards right now.
    pub fn can_release_funds(&self, id: EscrowId) -> Result<bool, PlatformError> {
        self.escrows
            .get(&id)
            .map(|e| e.can_release())
            .ok_or(PlatformError::UnknownEscrow { id })
    }

    /// Whether a token may settle escrows.
    pub fn is_token_whitelisted(&self, token: &Address) -> bool {
        self.whitelist.is_whitelisted(token)
    }

    /// Whether the platform is paused.
    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// The current fee schedule.
    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// The platform fee wallet.
    pub fn platform_wallet(&self) -> &Address {
        &self.config.platform_wallet
    }

    /// The event log, oldest first.
    pub fn events(&self) -> &[EventRecord] {
        self.events.records()
    }

    /// The attached compliance registry, if any.
    pub fn compliance(&self) -> Option<&ComplianceRegistry> {
        self.compliance.as_ref()
    }

    /// Mutable access to the attached compliance registry, if any.
    pub fn compliance_mut(&mut self) -> Option<&mut ComplianceRegistry> {
        self.compliance.as_mut()
    }

    /// The role registry, usable as an authorization context.
    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }
}

/// Zero-sentinel default resolution for agent/arbiter parameters.
fn resolve_default(param: Address, default: Option<Address>) -> Option<Address> {
    if param.is_zero() {
        default.filter(|a| !a.is_zero())
    } else {
        Some(param)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
