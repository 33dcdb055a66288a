//! # deedlock-escrow — The Escrow Lifecycle State Machine
//!
//! One escrow record per property sale, enforcing the lifecycle:
//!
//! ```text
//! Created ──deposit_funds()──▶ Funded ──complete_verification()──▶ Verified
//!                                                                     │
//!                                           give_approval() × parties │
//!                                                                     ▼
//!                                              release_funds() ──▶ Released
//!
//! any non-terminal ──raise_dispute()──▶ Disputed ──resolve_dispute()──▶ Released | Cancelled
//! any non-terminal ──refund_buyer()───▶ Cancelled
//! ```
//!
//! Terminal states: `Released`, `Cancelled`. Once terminal, every
//! mutating call on the record fails.
//!
//! ## Design
//!
//! Each operation checks authorization first, then the state guard, then
//! input validation; any failure leaves the record untouched. Inbound
//! token pulls happen before the status write so a failed deposit
//! mutates nothing; outbound payouts happen strictly after the status is
//! finalized to its terminal value. Between `Funded` and a terminal
//! state, the record's custody address holds exactly the deposit amount.

pub mod custody;
pub mod escrow;
pub mod status;

pub use custody::custody_address;
pub use escrow::{Escrow, EscrowError, EscrowTerms, TransitionRecord};
pub use status::{ApprovalSet, EscrowStatus, Party};
