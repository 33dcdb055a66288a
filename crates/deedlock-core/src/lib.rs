//! # deedlock-core — Foundational Types for the Deedlock Escrow Stack
//!
//! This crate is the bedrock of the Deedlock Escrow Stack. It defines the
//! domain primitives every other crate builds on: validated account
//! addresses, escrow and property identifiers, UTC-only timestamps,
//! basis-point fee arithmetic, the role-based authorization model, the
//! pause switch, and the platform event log. Every other crate in the
//! workspace depends on `deedlock-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `Address`, `EscrowId`,
//!    `PropertyId`, `BasisPoints`, `ContentDigest` — all newtypes with
//!    validated constructors. No bare strings or bare integers for
//!    identifiers and fee rates.
//!
//! 2. **Authorization is an explicit handle.** Components query an
//!    [`AuthorizationContext`] passed per call. There are no ambient
//!    globals; role checks happen before any mutation.
//!
//! 3. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision, with epoch-seconds constructors for
//!    ledger-style deadline fields.
//!
//! 4. **Fees conserve the principal.** `FeeSchedule::split` returns a
//!    decomposition whose parts sum to the input amount exactly, for every
//!    amount and every fee pair within the cap.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `deedlock-*` crates (this is the leaf of the
//!   DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug` and `Clone`, and implement
//!   `Serialize`/`Deserialize` where they cross a wire or a config file.

pub mod address;
pub mod digest;
pub mod error;
pub mod events;
pub mod fees;
pub mod identity;
pub mod pause;
pub mod roles;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use address::Address;
pub use digest::ContentDigest;
pub use error::{AuthorizationError, PauseError, ValidationError};
pub use events::{EventId, EventLog, EventRecord, PlatformEvent};
pub use fees::{BasisPoints, FeeSchedule, FeeSplit};
pub use identity::{EscrowId, PropertyId};
pub use pause::PauseSwitch;
pub use roles::{AuthorizationContext, Role, RoleRegistry};
pub use temporal::Timestamp;
