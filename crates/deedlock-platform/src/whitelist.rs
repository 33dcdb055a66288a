//! # Settlement Token Whitelist
//!
//! The set of token contracts escrows may settle in. Mutation is
//! admin-gated at the platform layer; this module owns the set itself
//! and the strictness policy.
//!
//! Two strictness modes exist in the field: strict registries reject
//! re-enabling an already-listed token, idempotent ones treat `set` as
//! a plain flag write. The mode is fixed at construction from platform
//! configuration; strict is the default.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use deedlock_core::Address;

/// Whitelist mutation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WhitelistError {
    /// The zero address can never be whitelisted.
    #[error("zero address cannot be whitelisted")]
    ZeroTokenAddress,

    /// Strict mode: the token is already whitelisted.
    #[error("token {token} already whitelisted")]
    AlreadyWhitelisted {
        /// The already-listed token.
        token: String,
    },

    /// Strict mode: the token is not on the whitelist.
    #[error("token {token} not whitelisted")]
    NotWhitelisted {
        /// The unlisted token.
        token: String,
    },
}

/// Strictness policy for whitelist mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WhitelistMode {
    /// Double-enable and absent-disable are rejected.
    Strict,
    /// `set` writes the flag unconditionally.
    Idempotent,
}

/// The whitelist itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenWhitelist {
    mode: WhitelistMode,
    entries: HashSet<Address>,
}

impl TokenWhitelist {
    /// Create an empty whitelist with the given strictness.
    pub fn new(mode: WhitelistMode) -> Self {
        Self {
            mode,
            entries: HashSet::new(),
        }
    }

    /// The configured strictness mode.
    pub fn mode(&self) -> WhitelistMode {
        self.mode
    }

    /// Enable or disable a token.
    ///
    /// Rejects the zero address in both modes. In strict mode,
    /// re-enabling a listed token or disabling an unlisted one is an
    /// error; in idempotent mode the flag simply takes the given value.
    pub fn set(&mut self, token: &Address, enabled: bool) -> Result<(), WhitelistError> {
        if token.is_zero() {
            return Err(WhitelistError::ZeroTokenAddress);
        }
        let listed = self.entries.contains(token);
        if self.mode == WhitelistMode::Strict {
            if enabled && listed {
                return Err(WhitelistError::AlreadyWhitelisted {
                    token: token.to_string(),
                });
            }
            if !enabled && !listed {
                return Err(WhitelistError::NotWhitelisted {
                    token: token.to_string(),
                });
            }
        }
        if enabled {
            self.entries.insert(*token);
        } else {
            self.entries.remove(token);
        }
        Ok(())
    }

    /// Whether a token may settle escrows.
    pub fn is_whitelisted(&self, token: &Address) -> bool {
        self.entries.contains(token)
    }

    /// Number of whitelisted tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the whitelist is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
