//! # In-Memory Ledger
//!
//! A multi-token balance and allowance store implementing
//! [`TokenGateway`]. Backs the workspace test suites and local operation;
//! a production deployment substitutes a gateway backed by real token
//! contracts.

use std::collections::{HashMap, HashSet};

use deedlock_core::Address;

use crate::gateway::{TokenError, TokenGateway};

/// In-memory multi-token ledger.
///
/// Tokens must be registered before they can be minted or moved;
/// balance and allowance reads on unknown tokens answer zero.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    tokens: HashSet<Address>,
    balances: HashMap<(Address, Address), u128>,
    allowances: HashMap<(Address, Address, Address), u128>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token contract address.
    pub fn register_token(&mut self, token: Address) {
        self.tokens.insert(token);
    }

    /// Whether a token is registered.
    pub fn is_registered(&self, token: &Address) -> bool {
        self.tokens.contains(token)
    }

    /// Credit `amount` to `to`. Test and bootstrap helper.
    pub fn mint(&mut self, token: &Address, to: &Address, amount: u128) -> Result<(), TokenError> {
        self.require_token(token)?;
        *self.balances.entry((*token, *to)).or_insert(0) += amount;
        Ok(())
    }

    fn require_token(&self, token: &Address) -> Result<(), TokenError> {
        if self.tokens.contains(token) {
            Ok(())
        } else {
            Err(TokenError::UnknownToken {
                token: token.to_string(),
            })
        }
    }

    fn debit(&mut self, token: &Address, from: &Address, amount: u128) -> Result<(), TokenError> {
        let have = self.balance_of(token, from);
        if have < amount {
            return Err(TokenError::InsufficientBalance {
                token: token.to_string(),
                holder: from.to_string(),
                have,
                need: amount,
            });
        }
        self.balances.insert((*token, *from), have - amount);
        Ok(())
    }

    fn credit(&mut self, token: &Address, to: &Address, amount: u128) {
        *self.balances.entry((*token, *to)).or_insert(0) += amount;
    }
}

impl TokenGateway for InMemoryLedger {
    fn balance_of(&self, token: &Address, holder: &Address) -> u128 {
        self.balances.get(&(*token, *holder)).copied().unwrap_or(0)
    }

    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(*token, *owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn approve(
        &mut self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.require_token(token)?;
        self.allowances.insert((*token, *owner, *spender), amount);
        Ok(())
    }

    fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.require_token(token)?;
        self.debit(token, from, amount)?;
        self.credit(token, to, amount);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        token: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.require_token(token)?;

        // Both the allowance and the balance check must pass before
        // either side mutates.
        let allowed = self.allowance(token, from, spender);
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance {
                token: token.to_string(),
                owner: from.to_string(),
                spender: spender.to_string(),
                have: allowed,
                need: amount,
            });
        }
        self.debit(token, from, amount)?;
        self.credit(token, to, amount);
        self.allowances.insert((*token, *from, *spender), allowed - amount);
        Ok(())
    }
}
