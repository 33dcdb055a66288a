//! # Role-Based Authorization
//!
//! Defines the platform's role set, the `AuthorizationContext` queried by
//! every role-gated entry point, and the concrete `RoleRegistry`.
//!
//! ## Design
//!
//! Authorization is an explicit permission-set abstraction, not
//! inheritance: each principal carries a set of granted roles, and an
//! operation declares its required role as a precondition checked before
//! any mutation. Components receive the context as a handle per call.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::AuthorizationError;

/// The roles recognized across the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Platform administration: configuration, pause, refunds, role grants.
    Admin,
    /// Verification agents for escrows with no individually assigned agent.
    Agent,
    /// Dispute arbiters.
    Arbiter,
    /// Compliance registry officers.
    ComplianceOfficer,
}

impl Role {
    /// The canonical wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN_ROLE",
            Self::Agent => "AGENT_ROLE",
            Self::Arbiter => "ARBITER_ROLE",
            Self::ComplianceOfficer => "COMPLIANCE_OFFICER_ROLE",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authorization query interface consulted by role-gated operations.
pub trait AuthorizationContext {
    /// Whether `who` holds `role`.
    fn has_role(&self, who: &Address, role: Role) -> bool;

    /// Require that `who` holds `role`, with a structured error otherwise.
    fn require_role(&self, who: &Address, role: Role) -> Result<(), AuthorizationError> {
        if self.has_role(who, role) {
            Ok(())
        } else {
            Err(AuthorizationError::MissingRole {
                caller: who.to_string(),
                role: role.to_string(),
            })
        }
    }
}

/// The concrete role store.
///
/// Constructed with a bootstrap admin. Grants and revocations require the
/// caller to hold [`Role::Admin`] and are idempotent on repetition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRegistry {
    grants: HashMap<Address, HashSet<Role>>,
}

impl RoleRegistry {
    /// Create a registry whose only grant is `Admin` for the given address.
    pub fn with_admin(admin: Address) -> Self {
        let mut grants = HashMap::new();
        grants.insert(admin, HashSet::from([Role::Admin]));
        Self { grants }
    }

    /// Grant `role` to `who`. Caller must hold `Admin`.
    pub fn grant_role(
        &mut self,
        caller: &Address,
        who: Address,
        role: Role,
    ) -> Result<(), AuthorizationError> {
        self.require_role(caller, Role::Admin)?;
        self.grants.entry(who).or_default().insert(role);
        Ok(())
    }

    /// Revoke `role` from `who`. Caller must hold `Admin`.
    pub fn revoke_role(
        &mut self,
        caller: &Address,
        who: &Address,
        role: Role,
    ) -> Result<(), AuthorizationError> {
        self.require_role(caller, Role::Admin)?;
        if let Some(roles) = self.grants.get_mut(who) {
            roles.remove(&role);
        }
        Ok(())
    }

    /// All roles currently granted to `who`.
    pub fn roles_of(&self, who: &Address) -> Vec<Role> {
        self.grants
            .get(who)
            .map(|roles| roles.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl AuthorizationContext for RoleRegistry {
    fn has_role(&self, who: &Address, role: Role) -> bool {
        self.grants
            .get(who)
            .map(|roles| roles.contains(&role))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn registry() -> (RoleRegistry, Address) {
        let admin = addr(0xAA);
        (RoleRegistry::with_admin(admin), admin)
    }

    #[test]
    fn test_bootstrap_admin() {
        let (reg, admin) = registry();
        assert!(reg.has_role(&admin, Role::Admin));
        assert!(!reg.has_role(&admin, Role::Agent));
    }

    #[test]
    fn test_grant_requires_admin() {
        let (mut reg, _admin) = registry();
        let outsider = addr(0x01);
        let result = reg.grant_role(&outsider, addr(0x02), Role::Agent);
        assert!(matches!(result, Err(AuthorizationError::MissingRole { .. })));
    }

    #[test]
    fn test_grant_and_revoke() {
        let (mut reg, admin) = registry();
        let agent = addr(0x01);
        reg.grant_role(&admin, agent, Role::Agent).unwrap();
        assert!(reg.has_role(&agent, Role::Agent));

        reg.revoke_role(&admin, &agent, Role::Agent).unwrap();
        assert!(!reg.has_role(&agent, Role::Agent));
    }

    #[test]
    fn test_grant_idempotent() {
        let (mut reg, admin) = registry();
        let agent = addr(0x01);
        reg.grant_role(&admin, agent, Role::Agent).unwrap();
        reg.grant_role(&admin, agent, Role::Agent).unwrap();
        assert_eq!(reg.roles_of(&agent), vec![Role::Agent]);
    }

    #[test]
    fn test_revoke_unknown_grant_is_noop() {
        let (mut reg, admin) = registry();
        reg.revoke_role(&admin, &addr(0x01), Role::Arbiter).unwrap();
        assert!(!reg.has_role(&addr(0x01), Role::Arbiter));
    }

    #[test]
    fn test_multiple_roles_per_principal() {
        let (mut reg, admin) = registry();
        let multi = addr(0x03);
        reg.grant_role(&admin, multi, Role::Agent).unwrap();
        reg.grant_role(&admin, multi, Role::Arbiter).unwrap();
        assert!(reg.has_role(&multi, Role::Agent));
        assert!(reg.has_role(&multi, Role::Arbiter));
        assert_eq!(reg.roles_of(&multi).len(), 2);
    }

    #[test]
    fn test_require_role_error_names_role() {
        let (reg, _) = registry();
        let err = reg.require_role(&addr(0x01), Role::Arbiter).unwrap_err();
        assert!(err.to_string().contains("ARBITER_ROLE"));
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(Role::Admin.to_string(), "ADMIN_ROLE");
        assert_eq!(Role::Agent.to_string(), "AGENT_ROLE");
        assert_eq!(Role::Arbiter.to_string(), "ARBITER_ROLE");
        assert_eq!(Role::ComplianceOfficer.to_string(), "COMPLIANCE_OFFICER_ROLE");
    }
}
