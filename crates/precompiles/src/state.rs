//! Boundary traits for the host execution engine.
//!
//! The framework never owns state: every read or write goes through the
//! handles declared here, supplied per call by the host. Their concurrency
//! discipline (per-block isolation, journaling) is the host's concern.

use alloy_primitives::{Address, B256};

/// Minimal mutable view over the host's account storage.
pub trait StateDB {
    /// Reads the storage word at `key` under `address`.
    fn get_state(&self, address: Address, key: B256) -> B256;

    /// Writes the storage word at `key` under `address`.
    fn set_state(&mut self, address: Address, key: B256, value: B256);
}

/// Block-level context visible to precompile calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockContext {
    /// Height of the block being executed.
    pub number: u64,
    /// Timestamp of the block being executed.
    pub timestamp: u64,
}

impl BlockContext {
    /// Creates a block context.
    pub const fn new(number: u64, timestamp: u64) -> Self {
        Self { number, timestamp }
    }
}

/// State reachable from within a precompile call.
///
/// Bundles the storage handle with the executing block's context.
pub trait AccessibleState {
    /// The mutable state handle.
    fn state_db(&mut self) -> &mut dyn StateDB;

    /// Context of the block being executed.
    fn block_context(&self) -> BlockContext;
}

/// Chain-level parameters visible to precompile configuration hooks.
///
/// Declared here rather than in the chainspec crate so that configs can
/// accept any chain configuration without depending on its concrete type.
pub trait ChainConfig {
    /// The chain id of the network being executed.
    fn chain_id(&self) -> u64;
}
