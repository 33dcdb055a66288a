//! # Token Gateway
//!
//! The trait boundary between the escrow core and whatever actually holds
//! token balances. Semantics follow the standard fungible-token contract
//! surface: `transfer`, `transfer_from` (allowance-consuming), `approve`,
//! `balance_of`, `allowance`, keyed by the token's contract address.

use thiserror::Error;

use deedlock_core::Address;

/// Failures surfaced by a token implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The holder's balance does not cover the transfer.
    #[error("insufficient balance of {token} for {holder}: have {have}, need {need}")]
    InsufficientBalance {
        /// Token contract.
        token: String,
        /// The short-funded holder.
        holder: String,
        /// Current balance.
        have: u128,
        /// Required amount.
        need: u128,
    },

    /// The spender's allowance does not cover the pull.
    #[error("insufficient allowance of {token} from {owner} to {spender}: have {have}, need {need}")]
    InsufficientAllowance {
        /// Token contract.
        token: String,
        /// The allowance grantor.
        owner: String,
        /// The spender attempting the pull.
        spender: String,
        /// Current allowance.
        have: u128,
        /// Required amount.
        need: u128,
    },

    /// The token contract is not known to this gateway.
    #[error("unknown token {token}")]
    UnknownToken {
        /// The unrecognized contract address.
        token: String,
    },
}

/// Access to fungible-token balances and allowances.
///
/// Implementations must be atomic per call: every check passes before any
/// balance or allowance moves, and a returned error implies no mutation.
pub trait TokenGateway {
    /// Balance of `holder` in `token`'s smallest unit.
    fn balance_of(&self, token: &Address, holder: &Address) -> u128;

    /// Remaining allowance granted by `owner` to `spender`.
    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> u128;

    /// Set the allowance granted by `owner` to `spender`.
    fn approve(
        &mut self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to`.
    fn transfer(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to` on behalf of `spender`,
    /// consuming `spender`'s allowance from `from`.
    fn transfer_from(
        &mut self,
        token: &Address,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TokenError>;
}
