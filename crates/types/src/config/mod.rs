// Path: crates/types/src/config/mod.rs

//! Configuration structures for the staking ledger.
use crate::error::ConfigError;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Governance-controlled parameters of the staking ledger.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Encode, Decode)]
pub struct StakingParams {
    /// Seconds a withdrawal or redelegation waits before it matures.
    #[serde(default = "default_unbonding_time_secs")]
    pub unbonding_time_secs: u64,
    /// Maximum entries per unbonding or redelegation record.
    #[serde(default = "default_max_entries")]
    pub max_entries: u32,
    /// Denomination of the staking token.
    #[serde(default = "default_bond_denom")]
    pub bond_denom: String,
}

fn default_unbonding_time_secs() -> u64 {
    21 * 24 * 60 * 60
}
fn default_max_entries() -> u32 {
    7
}
fn default_bond_denom() -> String {
    "stake".to_string()
}

impl Default for StakingParams {
    fn default() -> Self {
        Self {
            unbonding_time_secs: default_unbonding_time_secs(),
            max_entries: default_max_entries(),
            bond_denom: default_bond_denom(),
        }
    }
}

impl StakingParams {
    /// Checks that every parameter is inside its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unbonding_time_secs == 0 {
            return Err(ConfigError::Invalid(
                "unbonding_time_secs must be positive".into(),
            ));
        }
        if self.max_entries == 0 {
            return Err(ConfigError::Invalid("max_entries must be positive".into()));
        }
        if self.bond_denom.trim().is_empty() {
            return Err(ConfigError::Invalid("bond_denom cannot be blank".into()));
        }
        Ok(())
    }
}

/// Output format for log records.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable text.
    Pretty,
}

/// Settings for the tracing subscriber.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_directive")]
    pub default_directive: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_directive() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_directive: default_log_directive(),
            format: LogFormat::default(),
        }
    }
}

/// Top-level configuration file for a node running the staking ledger.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct StakingConfig {
    /// Genesis staking parameters.
    #[serde(default)]
    pub params: StakingParams,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StakingConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.params.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
