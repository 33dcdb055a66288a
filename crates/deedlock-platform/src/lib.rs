//! # deedlock-platform — The Escrow Factory and Registry
//!
//! The outward face of the stack. A [`Platform`] owns the escrow table,
//! the token whitelist, the role registry, the platform configuration,
//! the pause switch, and the event log; it validates creation
//! parameters, assigns sequential escrow ids, optionally gates
//! participants through a compliance registry, and routes every
//! per-escrow operation with pause checks and event emission.
//!
//! ## Design
//!
//! - The stores (escrow table, whitelist, roles, compliance) are owned
//!   by the platform instance and mutated only through its gated
//!   methods; there are no ambient globals.
//! - The token gateway is passed into fund-moving operations as an
//!   explicit `&mut dyn TokenGateway` handle.
//! - Creation-parameter validation reports the most specific violated
//!   rule, in a fixed order: empty property id, zero buyer/seller, zero
//!   amount, past deadline, non-whitelisted token, compliance.

pub mod config;
pub mod platform;
pub mod whitelist;

pub use config::{ConfigError, PlatformConfig};
pub use platform::{CreateEscrowParams, Platform, PlatformError};
pub use whitelist::{TokenWhitelist, WhitelistError, WhitelistMode};
