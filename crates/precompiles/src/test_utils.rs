//! In-memory doubles for the host-boundary traits, for use in tests.

use crate::state::{AccessibleState, BlockContext, ChainConfig, StateDB};
use alloy_primitives::{Address, B256};
use std::collections::HashMap;

/// In-memory [`StateDB`] and [`AccessibleState`] implementation.
///
/// Unset storage slots read as zero, mirroring the host engine's behavior.
#[derive(Clone, Debug, Default)]
pub struct MemoryState {
    storage: HashMap<(Address, B256), B256>,
    block: BlockContext,
}

impl MemoryState {
    /// State positioned at the given block.
    pub fn at_block(block: BlockContext) -> Self {
        Self { storage: HashMap::new(), block }
    }
}

impl StateDB for MemoryState {
    fn get_state(&self, address: Address, key: B256) -> B256 {
        self.storage.get(&(address, key)).copied().unwrap_or_default()
    }

    fn set_state(&mut self, address: Address, key: B256, value: B256) {
        self.storage.insert((address, key), value);
    }
}

impl AccessibleState for MemoryState {
    fn state_db(&mut self) -> &mut dyn StateDB {
        self
    }

    fn block_context(&self) -> BlockContext {
        self.block
    }
}

/// Fixed-value [`ChainConfig`] implementation.
#[derive(Clone, Copy, Debug)]
pub struct StaticChainConfig {
    /// The chain id reported to configuration hooks.
    pub chain_id: u64,
}

impl ChainConfig for StaticChainConfig {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }
}
