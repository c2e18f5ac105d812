//! Selector-based dispatch for stateful precompiled contracts.
//!
//! A [`StatefulPrecompile`] owns the function table for one registered
//! address. Tables are built once during process initialization and shared
//! immutably for the process lifetime, so call-processing threads read them
//! without synchronization.

use crate::{errors::PrecompileError, state::AccessibleState};
use alloy_primitives::{Address, Bytes, Selector};
use std::{collections::HashMap, fmt};

/// Length in bytes of an ABI function selector.
pub const SELECTOR_LEN: usize = 4;

/// Call context handed to every precompile function.
///
/// The dispatch layer strips the leading selector before invoking a
/// registered handler; fallback handlers receive the data unmodified.
pub struct PrecompileInput<'a> {
    /// State reachable from the call.
    pub state: &'a mut dyn AccessibleState,
    /// Address that initiated the call.
    pub caller: Address,
    /// Address the precompile is registered under.
    pub target_address: Address,
    /// Call data.
    pub data: &'a [u8],
    /// Gas supplied to the call.
    pub gas: u64,
    /// Whether the call context forbids state mutation.
    pub read_only: bool,
}

impl fmt::Debug for PrecompileInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrecompileInput")
            .field("caller", &self.caller)
            .field("target_address", &self.target_address)
            .field("data_len", &self.data.len())
            .field("gas", &self.gas)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

/// Successful call result: output bytes plus the gas left over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrecompileOutput {
    /// Returned bytes.
    pub bytes: Bytes,
    /// Gas remaining after the call.
    pub gas_remaining: u64,
}

impl PrecompileOutput {
    /// Creates a call result.
    pub const fn new(bytes: Bytes, gas_remaining: u64) -> Self {
        Self { bytes, gas_remaining }
    }
}

/// Failed call result: the error plus the gas to report back to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrecompileFailure {
    /// What went wrong.
    pub error: PrecompileError,
    /// Gas remaining after the failure.
    pub gas_remaining: u64,
}

impl PrecompileFailure {
    /// Creates a failure that reports `gas_remaining` to the host.
    pub const fn new(error: PrecompileError, gas_remaining: u64) -> Self {
        Self { error, gas_remaining }
    }

    /// Out-of-gas failure. Consumes everything that was supplied.
    pub const fn out_of_gas() -> Self {
        Self::new(PrecompileError::OutOfGas, 0)
    }
}

/// What a precompile call hands back to the host engine.
pub type PrecompileResult = Result<PrecompileOutput, PrecompileFailure>;

/// A precompile function handler.
///
/// Handlers are plain function pointers: stateless with respect to other
/// invocations, synchronous, and CPU-bound. Any state access goes through
/// the input's state handle.
pub type PrecompileFn = fn(PrecompileInput<'_>) -> PrecompileResult;

/// A single callable operation: an ABI selector paired with its handler.
#[derive(Clone, Copy)]
pub struct PrecompileFunction {
    selector: Selector,
    handler: PrecompileFn,
}

impl PrecompileFunction {
    /// Pairs `handler` with the function selector it serves.
    pub const fn new(selector: [u8; SELECTOR_LEN], handler: PrecompileFn) -> Self {
        Self { selector: Selector::new(selector), handler }
    }

    /// The selector this function is registered under.
    pub const fn selector(&self) -> Selector {
        self.selector
    }
}

impl fmt::Debug for PrecompileFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrecompileFunction").field("selector", &self.selector).finish_non_exhaustive()
    }
}

/// Selector-indexed dispatch table for one precompile address.
///
/// Immutable once built. When no registered selector matches, the call goes
/// to the fallback handler if one is installed; otherwise it is rejected.
pub struct StatefulPrecompile {
    functions: HashMap<Selector, PrecompileFn>,
    fallback: Option<PrecompileFn>,
}

impl StatefulPrecompile {
    /// Builds the dispatch table from the registered functions.
    ///
    /// # Panics
    ///
    /// Panics if two functions share a selector. Tables are constructed
    /// during process initialization, where a malformed function set is a
    /// broken build artifact rather than a recoverable runtime condition.
    pub fn new(
        fallback: Option<PrecompileFn>,
        functions: impl IntoIterator<Item = PrecompileFunction>,
    ) -> Self {
        let mut table = HashMap::new();
        for function in functions {
            let previous = table.insert(function.selector, function.handler);
            assert!(previous.is_none(), "duplicate function selector {}", function.selector);
        }
        Self { functions: table, fallback }
    }

    /// Routes `input` to the function matching its leading selector.
    ///
    /// No gas is deducted here; metering is each handler's first action, so
    /// a rejected dispatch reports the supplied gas untouched.
    pub fn run(&self, input: PrecompileInput<'_>) -> PrecompileResult {
        if input.data.len() < SELECTOR_LEN {
            let Some(fallback) = self.fallback else {
                return Err(PrecompileFailure::new(PrecompileError::MissingSelector, input.gas));
            };
            return fallback(input);
        }

        let (selector, data) = input.data.split_at(SELECTOR_LEN);
        let selector = Selector::from_slice(selector);
        let Some(handler) = self.functions.get(&selector) else {
            let Some(fallback) = self.fallback else {
                tracing::debug!(target: "precompiles", %selector, "rejecting unrecognized selector");
                return Err(PrecompileFailure::new(
                    PrecompileError::InvalidSelector(selector),
                    input.gas,
                ));
            };
            return fallback(input);
        };

        tracing::debug!(
            target: "precompiles",
            %selector,
            caller = %input.caller,
            gas = input.gas,
            "dispatching precompile call"
        );
        handler(PrecompileInput { data, ..input })
    }

    /// Selectors this table routes, in no particular order.
    pub fn selectors(&self) -> impl Iterator<Item = Selector> + '_ {
        self.functions.keys().copied()
    }

    /// Whether a fallback handler is installed.
    pub const fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

impl fmt::Debug for StatefulPrecompile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatefulPrecompile")
            .field("selectors", &self.functions.keys().collect::<Vec<_>>())
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Deducts a fixed cost from the supplied gas, before any side effect.
///
/// Insufficient gas consumes the whole supply: the failure reports zero
/// remaining.
pub fn deduct_gas(supplied_gas: u64, required_gas: u64) -> Result<u64, PrecompileFailure> {
    supplied_gas.checked_sub(required_gas).ok_or_else(PrecompileFailure::out_of_gas)
}
