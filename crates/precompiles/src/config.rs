//! Upgrade-gated precompile configuration.
//!
//! An [`UpgradeConfig`] says *when* a feature toggles; a [`PrecompileConfig`]
//! binds one to a fixed address and its dispatch table. Configs are built
//! once when the chain configuration loads, compared verbatim whenever two
//! nodes check they are running identical upgrade schedules, and never
//! mutated afterward.

use crate::{
    contract::StatefulPrecompile,
    ed25519::{ed25519_contract, Ed25519Config, ED25519_PRECOMPILE_ADDR},
    errors::ConfigError,
    state::{BlockContext, ChainConfig, StateDB},
};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Activation window for a network-upgrade-gated feature.
///
/// Two configs are equal iff both fields match exactly; an unset timestamp
/// is not equal to any set one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeConfig {
    /// Timestamp at which the feature toggles. `None` means never activated.
    #[serde(default)]
    pub block_timestamp: Option<u64>,
    /// Turns the feature off at [`Self::block_timestamp`] instead of on.
    #[serde(default, skip_serializing_if = "is_false")]
    pub disable: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl UpgradeConfig {
    /// Config that activates a feature at `block_timestamp`.
    pub const fn new(block_timestamp: Option<u64>) -> Self {
        Self { block_timestamp, disable: false }
    }

    /// Config that deactivates a feature at `block_timestamp`.
    pub const fn new_disable(block_timestamp: u64) -> Self {
        Self { block_timestamp: Some(block_timestamp), disable: true }
    }

    /// The activation timestamp, if one is scheduled.
    pub const fn timestamp(&self) -> Option<u64> {
        self.block_timestamp
    }

    /// Whether this config turns its feature off rather than on.
    pub const fn is_disable(&self) -> bool {
        self.disable
    }

    /// Whether the upgrade has taken effect at `timestamp`.
    pub const fn active_at(&self, timestamp: u64) -> bool {
        matches!(self.block_timestamp, Some(activation) if timestamp >= activation)
    }

    /// Whether `current` is the first block at or past activation, given the
    /// parent block's timestamp (`None` at genesis).
    pub const fn transitions_at(&self, parent: Option<u64>, current: u64) -> bool {
        self.active_at(current)
            && match parent {
                Some(parent) => !self.active_at(parent),
                None => true,
            }
    }
}

/// A network-upgrade-gated precompile configuration.
///
/// Closed set of the precompile features this chain knows how to run, one
/// variant per registered address. Equality is per-variant and folds in all
/// of the variant's fields; configs of different variants never compare
/// equal. The serialized form is externally tagged, which is also the
/// upgrade-schedule wire format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrecompileConfig {
    /// Native ED25519 signature verification.
    #[serde(rename = "ed25519Config")]
    Ed25519(Ed25519Config),
}

impl PrecompileConfig {
    /// The fixed, constant address this feature occupies.
    ///
    /// Unique per variant; no two concurrently-active configs share one.
    pub const fn address(&self) -> Address {
        match self {
            Self::Ed25519(_) => ED25519_PRECOMPILE_ADDR,
        }
    }

    /// The process-wide dispatch table singleton for this address.
    pub fn contract(&self) -> &'static StatefulPrecompile {
        match self {
            Self::Ed25519(_) => ed25519_contract(),
        }
    }

    /// The embedded activation window.
    pub const fn upgrade(&self) -> &UpgradeConfig {
        match self {
            Self::Ed25519(config) => config.upgrade(),
        }
    }

    /// Validates internal consistency, independent of chain state.
    ///
    /// Called once at chain-configuration load time; an error here is fatal
    /// to startup.
    pub fn verify(&self) -> Result<(), ConfigError> {
        match self {
            Self::Ed25519(config) => config.verify(),
        }
    }

    /// Performs one-time state setup at the block where activation takes
    /// effect. Must be invoked exactly once per config.
    pub fn configure(
        &self,
        chain: &dyn ChainConfig,
        state: &mut dyn StateDB,
        block: &BlockContext,
    ) {
        tracing::info!(
            target: "precompiles",
            address = %self.address(),
            block = block.number,
            timestamp = block.timestamp,
            "configuring activated precompile"
        );
        match self {
            Self::Ed25519(config) => config.configure(chain, state, block),
        }
    }

    /// The activation timestamp, if one is scheduled.
    pub const fn timestamp(&self) -> Option<u64> {
        self.upgrade().timestamp()
    }

    /// Whether this config turns its feature off rather than on.
    pub const fn is_disable(&self) -> bool {
        self.upgrade().is_disable()
    }

    /// Whether the upgrade has taken effect at `timestamp`.
    pub const fn active_at(&self, timestamp: u64) -> bool {
        self.upgrade().active_at(timestamp)
    }
}

impl From<Ed25519Config> for PrecompileConfig {
    fn from(config: Ed25519Config) -> Self {
        Self::Ed25519(config)
    }
}

impl fmt::Display for PrecompileConfig {
    /// Canonical JSON of the config's fields, for diagnostics and equality
    /// display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
