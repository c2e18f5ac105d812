//! ED25519 signature-verification precompile.
//!
//! Exposes native ED25519 verification behind the ordinary contract call
//! convention: a `verify` method selected by its ABI selector, a fixed gas
//! fee charged before any work, and a single status byte as output.
//!
//! ## Interface
//!
//! ```solidity
//! interface IEd25519 {
//!     function verify(bytes signature, bytes32 message, bytes32 publicKey)
//!         external returns (bool);
//! }
//! ```
//!
//! The operation reports validity, not well-formedness: malformed public
//! keys and signatures verify as `false` rather than erroring, so a caller
//! can always distinguish "the call failed" from "the signature is bad".

use crate::{
    config::UpgradeConfig,
    contract::{
        deduct_gas, PrecompileFailure, PrecompileFunction, PrecompileInput, PrecompileOutput,
        PrecompileResult, StatefulPrecompile,
    },
    errors::{ConfigError, PrecompileError},
    state::{BlockContext, ChainConfig, StateDB},
};
use alloy_primitives::{address, Address, Bytes, B256};
use alloy_sol_types::{sol, SolCall};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

sol! {
    /// Native ED25519 signature verification.
    interface IEd25519 {
        /// Reports whether `signature` is a valid signature of `message`
        /// under `publicKey`.
        function verify(bytes signature, bytes32 message, bytes32 publicKey)
            external
            returns (bool);
    }
}

/// Address the ED25519 precompile is registered under.
pub const ED25519_PRECOMPILE_ADDR: Address =
    address!("0x0300000000000000000000000000000000000001");

/// Fixed fee for a verification call, independent of input size.
///
/// Protocol-level constant; changing it is a network-upgrade decision.
pub const VERIFY_GAS_COST: u64 = 40_000;

/// Upgrade config that enables or disables the ED25519 precompile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ed25519Config {
    upgrade: UpgradeConfig,
}

impl Ed25519Config {
    /// Config for a network upgrade at `block_timestamp` that enables
    /// ED25519 verification.
    pub const fn new(block_timestamp: Option<u64>) -> Self {
        Self { upgrade: UpgradeConfig::new(block_timestamp) }
    }

    /// Config for a network upgrade at `block_timestamp` that disables
    /// ED25519 verification.
    pub const fn new_disable(block_timestamp: u64) -> Self {
        Self { upgrade: UpgradeConfig::new_disable(block_timestamp) }
    }

    /// The activation window.
    pub const fn upgrade(&self) -> &UpgradeConfig {
        &self.upgrade
    }

    /// Checks internal consistency. The base config has nothing to reject.
    pub fn verify(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// One-time setup at the activation block. Verification keeps no state,
    /// so there is nothing to initialize.
    pub fn configure(
        &self,
        _chain: &dyn ChainConfig,
        _state: &mut dyn StateDB,
        _block: &BlockContext,
    ) {
    }
}

/// The process-wide dispatch table for the ED25519 precompile.
///
/// Built on first use and immutable afterward. No fallback is installed:
/// calls carrying an unrecognized selector are rejected.
pub fn ed25519_contract() -> &'static StatefulPrecompile {
    static CONTRACT: OnceLock<StatefulPrecompile> = OnceLock::new();
    CONTRACT.get_or_init(|| {
        StatefulPrecompile::new(
            None,
            [PrecompileFunction::new(IEd25519::verifyCall::SELECTOR, verify)],
        )
    })
}

/// ABI-encodes a `verify` call, selector included. Used by hosts and tests.
pub fn pack_verify(signature: &[u8], message: B256, public_key: B256) -> Bytes {
    IEd25519::verifyCall {
        signature: Bytes::copy_from_slice(signature),
        message,
        publicKey: public_key,
    }
    .abi_encode()
    .into()
}

/// Decodes selector-stripped `verify` call data into its three fields.
pub fn unpack_verify_input(input: &[u8]) -> Result<(Bytes, B256, B256), PrecompileError> {
    let call = IEd25519::verifyCall::abi_decode_raw(input)
        .map_err(|err| PrecompileError::AbiDecode(err.to_string()))?;
    Ok((call.signature, call.message, call.publicKey))
}

fn verify(input: PrecompileInput<'_>) -> PrecompileResult {
    let gas_remaining = deduct_gas(input.gas, VERIFY_GAS_COST)?;

    // Not marked read-safe: reject read-only contexts like every other
    // stateful precompile, even though verification writes nothing.
    if input.read_only {
        return Err(PrecompileFailure::new(PrecompileError::WriteProtection, gas_remaining));
    }

    let (signature, message, public_key) = unpack_verify_input(input.data)
        .map_err(|error| PrecompileFailure::new(error, gas_remaining))?;

    let valid = verify_signature(&signature, message, public_key);
    tracing::debug!(
        target: "ed25519",
        caller = %input.caller,
        valid,
        "verified signature"
    );

    let status: &'static [u8] = if valid { &[1] } else { &[0] };
    Ok(PrecompileOutput::new(Bytes::from_static(status), gas_remaining))
}

fn verify_signature(signature: &[u8], message: B256, public_key: B256) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    verifying_key.verify(message.as_slice(), &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryState;
    use alloy_primitives::address;
    use ed25519_dalek::{Signer, SigningKey};

    const CALLER: Address = address!("0x00000000000000000000000000000000000000c1");

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[0x42; 32])
    }

    /// `"hello"` left-aligned in a 32-byte word, the shape the ABI carries.
    fn hello_message() -> B256 {
        let mut message = [0u8; 32];
        message[..5].copy_from_slice(b"hello");
        B256::new(message)
    }

    fn run(data: &[u8], gas: u64, read_only: bool) -> PrecompileResult {
        let mut state = MemoryState::default();
        ed25519_contract().run(PrecompileInput {
            state: &mut state,
            caller: CALLER,
            target_address: ED25519_PRECOMPILE_ADDR,
            data,
            gas,
            read_only,
        })
    }

    #[test]
    fn valid_signature_returns_one_byte_true() {
        let key = signing_key();
        let message = hello_message();
        let signature = key.sign(message.as_slice());

        let calldata = pack_verify(
            &signature.to_bytes(),
            message,
            B256::new(key.verifying_key().to_bytes()),
        );

        let output = run(&calldata, VERIFY_GAS_COST, false).expect("verify succeeds");
        assert_eq!(output.bytes.as_ref(), &[1]);
        assert_eq!(output.gas_remaining, 0);
    }

    #[test]
    fn tampered_message_returns_false_not_error() {
        let key = signing_key();
        let message = hello_message();
        let signature = key.sign(message.as_slice());

        let mut tampered = message;
        tampered.0[0] ^= 0x01;

        let calldata = pack_verify(
            &signature.to_bytes(),
            tampered,
            B256::new(key.verifying_key().to_bytes()),
        );

        let output = run(&calldata, VERIFY_GAS_COST, false).expect("verify still succeeds");
        assert_eq!(output.bytes.as_ref(), &[0]);
        assert_eq!(output.gas_remaining, 0);
    }

    #[test]
    fn tampered_signature_returns_false() {
        let key = signing_key();
        let message = hello_message();
        let mut signature = key.sign(message.as_slice()).to_bytes();
        signature[10] ^= 0xff;

        let calldata =
            pack_verify(&signature, message, B256::new(key.verifying_key().to_bytes()));

        let output = run(&calldata, VERIFY_GAS_COST, false).expect("verify succeeds");
        assert_eq!(output.bytes.as_ref(), &[0]);
    }

    #[test]
    fn wrong_key_returns_false() {
        let key = signing_key();
        let other_key = SigningKey::from_bytes(&[0x07; 32]);
        let message = hello_message();
        let signature = key.sign(message.as_slice());

        let calldata = pack_verify(
            &signature.to_bytes(),
            message,
            B256::new(other_key.verifying_key().to_bytes()),
        );

        let output = run(&calldata, VERIFY_GAS_COST, false).expect("verify succeeds");
        assert_eq!(output.bytes.as_ref(), &[0]);
    }

    #[test]
    fn malformed_public_key_returns_false() {
        let key = signing_key();
        let message = hello_message();
        let signature = key.sign(message.as_slice());

        // 0xFF..FF is not a canonical curve point encoding.
        let calldata = pack_verify(&signature.to_bytes(), message, B256::new([0xff; 32]));

        let output = run(&calldata, VERIFY_GAS_COST, false).expect("verify succeeds");
        assert_eq!(output.bytes.as_ref(), &[0]);
    }

    #[test]
    fn wrong_length_signature_returns_false() {
        let key = signing_key();
        let message = hello_message();

        let calldata =
            pack_verify(&[0xaa; 31], message, B256::new(key.verifying_key().to_bytes()));

        let output = run(&calldata, VERIFY_GAS_COST, false).expect("verify succeeds");
        assert_eq!(output.bytes.as_ref(), &[0]);
    }

    #[test]
    fn insufficient_gas_fails_and_consumes_everything() {
        let key = signing_key();
        let message = hello_message();
        let signature = key.sign(message.as_slice());
        let calldata = pack_verify(
            &signature.to_bytes(),
            message,
            B256::new(key.verifying_key().to_bytes()),
        );

        let failure = run(&calldata, VERIFY_GAS_COST - 1, false).unwrap_err();
        assert_eq!(failure.error, PrecompileError::OutOfGas);
        assert_eq!(failure.gas_remaining, 0);
    }

    #[test]
    fn read_only_context_is_rejected_after_gas_deduction() {
        let key = signing_key();
        let message = hello_message();
        let signature = key.sign(message.as_slice());
        let calldata = pack_verify(
            &signature.to_bytes(),
            message,
            B256::new(key.verifying_key().to_bytes()),
        );

        let failure = run(&calldata, VERIFY_GAS_COST + 123, true).unwrap_err();
        assert_eq!(failure.error, PrecompileError::WriteProtection);
        assert_eq!(failure.gas_remaining, 123, "only the fixed fee is deducted");
    }

    #[test]
    fn undecodable_call_data_is_a_decode_error() {
        let mut calldata = IEd25519::verifyCall::SELECTOR.to_vec();
        calldata.extend_from_slice(b"definitely not abi");

        let failure = run(&calldata, VERIFY_GAS_COST, false).unwrap_err();
        assert!(matches!(failure.error, PrecompileError::AbiDecode(_)));
        assert_eq!(failure.gas_remaining, 0, "the fixed fee is charged before decoding");
    }

    #[test]
    fn unrecognized_selector_is_rejected_with_gas_untouched() {
        let failure = run(&[0xde, 0xad, 0xbe, 0xef], VERIFY_GAS_COST, false).unwrap_err();
        assert_eq!(
            failure.error,
            PrecompileError::InvalidSelector([0xde, 0xad, 0xbe, 0xef].into())
        );
        assert_eq!(failure.gas_remaining, VERIFY_GAS_COST);
    }

    #[test]
    fn pack_unpack_round_trips() {
        let signature = [0x5a; 64];
        let message = hello_message();
        let public_key = B256::new([0x99; 32]);

        let calldata = pack_verify(&signature, message, public_key);
        let (sig, msg, key) =
            unpack_verify_input(&calldata[crate::contract::SELECTOR_LEN..]).expect("decodes");

        assert_eq!(sig.as_ref(), signature.as_slice());
        assert_eq!(msg, message);
        assert_eq!(key, public_key);
    }

    #[test]
    fn contract_registers_exactly_the_verify_selector() {
        let contract = ed25519_contract();
        let selectors: Vec<_> = contract.selectors().collect();
        assert_eq!(selectors, vec![alloy_primitives::Selector::from(IEd25519::verifyCall::SELECTOR)]);
        assert!(!contract.has_fallback());
    }
}
