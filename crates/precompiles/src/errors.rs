use alloy_primitives::{Address, Selector};
use thiserror::Error;

/// Call-level failures surfaced to the host engine.
///
/// Every variant is terminal for the call that triggered it; the host is
/// responsible for translating it into transaction-level revert behavior.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PrecompileError {
    /// The supplied gas does not cover the operation's fixed cost.
    #[error("out of gas")]
    OutOfGas,
    /// The call was made in a read-only context.
    #[error("write protection")]
    WriteProtection,
    /// Call data is shorter than a function selector.
    #[error("missing function selector")]
    MissingSelector,
    /// No registered function matches the selector.
    #[error("invalid function selector {0}")]
    InvalidSelector(Selector),
    /// Call data did not decode into the function's typed arguments.
    #[error("invalid call data: {0}")]
    AbiDecode(String),
}

/// Rejections raised while validating precompile upgrade configuration.
///
/// These are caught at chain-configuration load time, before any block is
/// processed; a node refuses to run with an invalid schedule.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A config's own consistency check failed.
    #[error("invalid precompile config: {0}")]
    Invalid(String),
    /// An upgrade entry was declared without an activation timestamp.
    #[error("precompile upgrade for {0} has no activation timestamp")]
    MissingTimestamp(Address),
    /// A later upgrade entry for the same address activates earlier.
    #[error("precompile upgrades for {0} regress in activation time")]
    OutOfOrder(Address),
}
