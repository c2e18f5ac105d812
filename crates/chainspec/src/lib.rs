//! Chain configuration for upgrade-gated precompiles.
//!
//! This crate is the chain-configuration loader: it parses declared
//! precompile upgrade schedules from chainspec JSON, validates them before
//! the chain is allowed to run, answers which precompiles are active at a
//! given timestamp, and drives each precompile's one-time activation setup.

/// Chain spec parsing and the [`ChainSpec`] type.
pub mod spec;

/// Upgrade schedules and activation queries.
pub mod upgrades;

pub use spec::{parse_precompile_upgrades, ChainSpec, ChainSpecError};
pub use upgrades::UpgradeSchedule;
