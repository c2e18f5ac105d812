//! Precompile upgrade schedules.
//!
//! A schedule is the ordered list of precompile upgrades a chain has
//! committed to. Every node must hold an identical schedule; equality is
//! exact, and the active set at any timestamp is a pure function of
//! `(schedule, timestamp)`.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tern_precompiles::{
    BlockContext, ChainConfig, ConfigError, PrecompileConfig, StateDB,
};

/// Ordered precompile upgrade schedule.
///
/// Entries for the same address form that feature's history: later entries
/// supersede earlier ones, and a disable entry turns the feature off again.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpgradeSchedule {
    upgrades: Vec<PrecompileConfig>,
}

impl UpgradeSchedule {
    /// Schedule over the given upgrades, in declaration order.
    pub const fn new(upgrades: Vec<PrecompileConfig>) -> Self {
        Self { upgrades }
    }

    /// Whether the schedule declares no upgrades.
    pub fn is_empty(&self) -> bool {
        self.upgrades.is_empty()
    }

    /// Number of declared upgrades.
    pub fn len(&self) -> usize {
        self.upgrades.len()
    }

    /// The declared upgrades, in order.
    pub fn iter(&self) -> impl Iterator<Item = &PrecompileConfig> {
        self.upgrades.iter()
    }

    /// Validates the schedule at chain-configuration load time.
    ///
    /// Checks each config's own consistency, requires every entry to carry
    /// an activation timestamp, and rejects entries that would move a
    /// feature's activation backwards. An error is fatal to startup: the
    /// node refuses to run with an invalid schedule.
    pub fn verify(&self) -> Result<(), ConfigError> {
        for upgrade in &self.upgrades {
            upgrade.verify()?;
            if upgrade.timestamp().is_none() {
                return Err(ConfigError::MissingTimestamp(upgrade.address()));
            }
        }
        for (index, upgrade) in self.upgrades.iter().enumerate() {
            for earlier in &self.upgrades[..index] {
                if earlier.address() == upgrade.address()
                    && earlier.timestamp() > upgrade.timestamp()
                {
                    return Err(ConfigError::OutOfOrder(upgrade.address()));
                }
            }
        }
        Ok(())
    }

    /// The governing config for `address` at `timestamp`: the last entry
    /// whose activation is at or before the timestamp.
    pub fn active_config(&self, address: Address, timestamp: u64) -> Option<&PrecompileConfig> {
        self.upgrades
            .iter()
            .rev()
            .find(|upgrade| upgrade.address() == address && upgrade.active_at(timestamp))
    }

    /// Whether the precompile at `address` is enabled at `timestamp`.
    pub fn is_enabled(&self, address: Address, timestamp: u64) -> bool {
        self.active_config(address, timestamp)
            .is_some_and(|upgrade| !upgrade.is_disable())
    }

    /// The enabled configs at `timestamp`, one per address, in declaration
    /// order. This is the set every node must agree on byte-for-byte.
    pub fn enabled_configs(&self, timestamp: u64) -> Vec<&PrecompileConfig> {
        let mut enabled = Vec::new();
        let mut governed: Vec<Address> = Vec::new();
        for upgrade in self.upgrades.iter().rev() {
            let address = upgrade.address();
            if governed.contains(&address) || !upgrade.active_at(timestamp) {
                continue;
            }
            governed.push(address);
            if !upgrade.is_disable() {
                enabled.push(upgrade);
            }
        }
        enabled.reverse();
        enabled
    }

    /// Configs whose activation falls in the window `(parent, current]`.
    ///
    /// With `parent` set to each block's parent timestamp (`None` at
    /// genesis), every config is yielded exactly once over the chain's
    /// lifetime: at the first block at or past its activation.
    pub fn transitioning(
        &self,
        parent: Option<u64>,
        current: u64,
    ) -> impl Iterator<Item = &PrecompileConfig> {
        self.upgrades
            .iter()
            .filter(move |upgrade| upgrade.upgrade().transitions_at(parent, current))
    }

    /// Runs one-time activation setup for every config whose activation
    /// falls at this block.
    pub fn configure_transitions(
        &self,
        chain: &dyn ChainConfig,
        state: &mut dyn StateDB,
        block: &BlockContext,
        parent_timestamp: Option<u64>,
    ) {
        for upgrade in self.transitioning(parent_timestamp, block.timestamp) {
            upgrade.configure(chain, state, block);
        }
    }
}

impl FromIterator<PrecompileConfig> for UpgradeSchedule {
    fn from_iter<I: IntoIterator<Item = PrecompileConfig>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
