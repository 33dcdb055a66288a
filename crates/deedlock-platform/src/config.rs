//! # Platform Configuration
//!
//! Deployment-time parameters of a platform instance: the platform fee
//! wallet, the fee schedule, default agent and arbiter assignments, and
//! the whitelist strictness. Loadable from a YAML document.
//!
//! Fee values are stored as raw basis points in the file format and
//! validated against the cap when the configuration is checked, so a
//! mis-edited file fails at load rather than at first release.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use deedlock_core::{Address, BasisPoints, FeeSchedule, ValidationError};

/// Configuration load failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The YAML document could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The parsed document violates a platform rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Deployment-time platform parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Wallet receiving the platform's fee share.
    pub platform_wallet: Address,
    /// Platform fee in basis points (capped).
    #[serde(default)]
    pub platform_fee_bps: u16,
    /// Agent fee in basis points (capped).
    #[serde(default)]
    pub agent_fee_bps: u16,
    /// Agent assigned when creation parameters leave the agent unset.
    #[serde(default)]
    pub default_agent: Option<Address>,
    /// Arbiter assigned when creation parameters leave the arbiter unset.
    #[serde(default)]
    pub default_arbiter: Option<Address>,
    /// Whether the token whitelist rejects redundant mutations.
    #[serde(default = "default_strict")]
    pub strict_whitelist: bool,
}

fn default_strict() -> bool {
    true
}

impl PlatformConfig {
    /// A minimal configuration: the given fee wallet, zero fees, strict
    /// whitelist, no defaults.
    pub fn new(platform_wallet: Address) -> Self {
        Self {
            platform_wallet,
            platform_fee_bps: 0,
            agent_fee_bps: 0,
            default_agent: None,
            default_arbiter: None,
            strict_whitelist: true,
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(doc: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(doc)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the platform rules: non-zero fee wallet, fees within cap.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.platform_wallet.is_zero() {
            return Err(ValidationError::ZeroAddress {
                field: "platform_wallet",
            });
        }
        BasisPoints::new(self.platform_fee_bps)?;
        BasisPoints::new(self.agent_fee_bps)?;
        Ok(())
    }

    /// The validated fee schedule.
    ///
    /// Call [`PlatformConfig::validate()`] first; this re-validates so a
    /// config that skipped validation still cannot smuggle an over-cap
    /// fee into a split.
    pub fn fee_schedule(&self) -> Result<FeeSchedule, ValidationError> {
        Ok(FeeSchedule {
            platform_fee: BasisPoints::new(self.platform_fee_bps)?,
            agent_fee: BasisPoints::new(self.agent_fee_bps)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet() -> Address {
        Address::from_bytes([0xFF; 20])
    }

    #[test]
    fn test_minimal_config_validates() {
        let config = PlatformConfig::new(wallet());
        assert!(config.validate().is_ok());
        let fees = config.fee_schedule().unwrap();
        assert_eq!(fees.platform_fee.value(), 0);
    }

    #[test]
    fn test_zero_wallet_rejected() {
        let config = PlatformConfig::new(Address::ZERO);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::ZeroAddress { field: "platform_wallet" })
        ));
    }

    #[test]
    fn test_over_cap_fee_rejected() {
        let mut config = PlatformConfig::new(wallet());
        config.platform_fee_bps = 501;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::FeeAboveCap { .. })
        ));
    }

    #[test]
    fn test_from_yaml() {
        let doc = r#"
platform_wallet: "0xffffffffffffffffffffffffffffffffffffffff"
platform_fee_bps: 250
agent_fee_bps: 100
default_arbiter: "0x0404040404040404040404040404040404040404"
strict_whitelist: false
"#;
        let config = PlatformConfig::from_yaml(doc).unwrap();
        assert_eq!(config.platform_wallet, wallet());
        assert_eq!(config.platform_fee_bps, 250);
        assert_eq!(config.agent_fee_bps, 100);
        assert!(config.default_agent.is_none());
        assert!(config.default_arbiter.is_some());
        assert!(!config.strict_whitelist);
    }

    #[test]
    fn test_from_yaml_defaults() {
        let doc = r#"
platform_wallet: "0xffffffffffffffffffffffffffffffffffffffff"
"#;
        let config = PlatformConfig::from_yaml(doc).unwrap();
        assert_eq!(config.platform_fee_bps, 0);
        assert!(config.strict_whitelist);
    }

    #[test]
    fn test_from_yaml_rejects_over_cap() {
        let doc = r#"
platform_wallet: "0xffffffffffffffffffffffffffffffffffffffff"
platform_fee_bps: 9999
"#;
        assert!(matches!(
            PlatformConfig::from_yaml(doc),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_from_yaml_rejects_garbage() {
        assert!(matches!(
            PlatformConfig::from_yaml(": not yaml : ["),
            Err(ConfigError::Parse(_))
        ));
    }
}
