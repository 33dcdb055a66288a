//! # deedlock-token — Fungible-Token Abstraction
//!
//! The escrow core consumes fungible tokens, it does not implement them.
//! This crate defines the seam: [`TokenGateway`], a trait with standard
//! transfer/allowance semantics over a token contract address, and
//! [`InMemoryLedger`], a multi-token implementation backing the test
//! suites and local operation.
//!
//! ## Crate Policy
//!
//! - Token failures (insufficient balance or allowance) are structured
//!   errors propagated to the caller, never swallowed.
//! - All checks precede any mutation: a failed transfer leaves every
//!   balance and allowance untouched.

pub mod gateway;
pub mod ledger;

pub use gateway::{TokenError, TokenGateway};
pub use ledger::InMemoryLedger;
