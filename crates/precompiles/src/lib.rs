//! # Tern Stateful Precompiles
//!
//! Framework for extending the EVM with custom native precompiled
//! operations that behave like contract calls but execute as compiled
//! logic, plus the precompiles built on it.
//!
//! ## Available Precompiles
//!
//! | Address | Name | Description |
//! |---------|------|-------------|
//! | `0x0300..01` | [`ed25519`] | Native ED25519 signature verification |
//!
//! ## Architecture
//!
//! All precompiles follow the same pattern:
//!
//! 1. **Dispatch**: a per-address [`StatefulPrecompile`] table routes calls
//!    by their 4-byte ABI selector, built once at process start and shared
//!    immutably thereafter
//! 2. **Metering**: every handler deducts its fixed gas cost before doing
//!    any work
//! 3. **Write protection**: handlers not marked read-safe reject read-only
//!    call contexts
//! 4. **Upgrade gating**: each precompile carries a [`PrecompileConfig`]
//!    binding it to an activation timestamp that all nodes agree on
//!
//! Activation schedules are loaded and validated by the `tern-chainspec`
//! crate; the host engine supplies state access through the traits in
//! [`state`].

/// Upgrade windows and per-precompile configuration.
pub mod config;

/// Dispatch tables, call inputs and outputs, gas metering.
pub mod contract;

/// ED25519 signature-verification precompile.
pub mod ed25519;

/// Call-level and configuration-level error types.
pub mod errors;

/// Boundary traits implemented by the host execution engine.
pub mod state;

/// In-memory doubles for the host-boundary traits.
pub mod test_utils;

pub use config::{PrecompileConfig, UpgradeConfig};
pub use contract::{
    deduct_gas, PrecompileFailure, PrecompileFn, PrecompileFunction, PrecompileInput,
    PrecompileOutput, PrecompileResult, StatefulPrecompile, SELECTOR_LEN,
};
pub use errors::{ConfigError, PrecompileError};
pub use state::{AccessibleState, BlockContext, ChainConfig, StateDB};
