//! Chain-level configuration.

use crate::upgrades::UpgradeSchedule;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tern_precompiles::{ChainConfig, ConfigError};
use thiserror::Error;

/// Failures while loading a chain spec.
#[derive(Debug, Error)]
pub enum ChainSpecError {
    /// The spec JSON did not parse into the expected shape.
    #[error("invalid chain spec: {0}")]
    Parse(String),
    /// The declared upgrade schedule failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Chain configuration relevant to precompile execution.
///
/// Constructed once at startup from the chain's declared configuration and
/// immutable thereafter. Two specs are equal iff their fields match exactly,
/// which is how independent nodes check they agree on the same schedule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSpec {
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Declared precompile upgrade schedule.
    #[serde(default, skip_serializing_if = "UpgradeSchedule::is_empty")]
    pub precompile_upgrades: UpgradeSchedule,
}

impl ChainSpec {
    /// Spec with the given chain id and upgrade schedule.
    pub const fn new(chain_id: u64, precompile_upgrades: UpgradeSchedule) -> Self {
        Self { chain_id, precompile_upgrades }
    }

    /// Parses a spec from its JSON representation and verifies the declared
    /// schedule before accepting it.
    pub fn from_json(json: &str) -> Result<Self, ChainSpecError> {
        let spec: Self =
            serde_json::from_str(json).map_err(|err| ChainSpecError::Parse(err.to_string()))?;
        spec.precompile_upgrades.verify()?;
        tracing::debug!(
            target: "chainspec",
            chain_id = spec.chain_id,
            upgrades = spec.precompile_upgrades.len(),
            "loaded chain spec"
        );
        Ok(spec)
    }
}

impl ChainConfig for ChainSpec {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

/// Reads `precompileUpgrades` from a chainspec extras blob.
///
/// An absent key is an empty schedule; a present one must parse and verify.
pub fn parse_precompile_upgrades(extras: &Value) -> Result<UpgradeSchedule, ChainSpecError> {
    let Some(value) = extras.get("precompileUpgrades") else {
        return Ok(UpgradeSchedule::default());
    };
    let schedule: UpgradeSchedule = serde_json::from_value(value.clone())
        .map_err(|err| ChainSpecError::Parse(err.to_string()))?;
    schedule.verify()?;
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tern_precompiles::ed25519::{Ed25519Config, ED25519_PRECOMPILE_ADDR};

    #[test]
    fn parses_a_full_spec() {
        let spec = ChainSpec::from_json(
            r#"{
                "chainId": 43214,
                "precompileUpgrades": [
                    { "ed25519Config": { "blockTimestamp": 100 } },
                    { "ed25519Config": { "blockTimestamp": 200, "disable": true } }
                ]
            }"#,
        )
        .expect("spec parses");

        assert_eq!(spec.chain_id, 43214);
        assert_eq!(spec.precompile_upgrades.len(), 2);
        assert!(spec.precompile_upgrades.is_enabled(ED25519_PRECOMPILE_ADDR, 150));
        assert!(!spec.precompile_upgrades.is_enabled(ED25519_PRECOMPILE_ADDR, 200));
    }

    #[test]
    fn rejects_invalid_schedules_at_load() {
        let err = ChainSpec::from_json(
            r#"{
                "chainId": 1,
                "precompileUpgrades": [
                    { "ed25519Config": {} }
                ]
            }"#,
        )
        .unwrap_err();

        assert!(matches!(err, ChainSpecError::Config(ConfigError::MissingTimestamp(_))));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ChainSpec::from_json(r#"{ "chainId": "not a number" }"#).unwrap_err();
        assert!(matches!(err, ChainSpecError::Parse(_)));
    }

    #[test]
    fn missing_upgrades_key_means_empty_schedule() {
        let spec = ChainSpec::from_json(r#"{ "chainId": 7 }"#).expect("spec parses");
        assert!(spec.precompile_upgrades.is_empty());

        let schedule = parse_precompile_upgrades(&json!({})).expect("parses");
        assert!(schedule.is_empty());
    }

    #[test]
    fn extras_blob_round_trips_the_schedule() {
        let extras = json!({
            "precompileUpgrades": [
                { "ed25519Config": { "blockTimestamp": 100 } }
            ]
        });

        let schedule = parse_precompile_upgrades(&extras).expect("parses");
        let expected: UpgradeSchedule =
            [Ed25519Config::new(Some(100)).into()].into_iter().collect();
        assert_eq!(schedule, expected);
    }

    #[test]
    fn unknown_upgrade_kinds_are_rejected() {
        let extras = json!({
            "precompileUpgrades": [
                { "notAConfig": { "blockTimestamp": 100 } }
            ]
        });

        let err = parse_precompile_upgrades(&extras).unwrap_err();
        assert!(matches!(err, ChainSpecError::Parse(_)));
    }

    #[test]
    fn specs_serialize_identically_across_nodes() {
        let spec = ChainSpec::new(
            99,
            [Ed25519Config::new(Some(100)).into()].into_iter().collect(),
        );
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(
            json,
            r#"{"chainId":99,"precompileUpgrades":[{"ed25519Config":{"blockTimestamp":100}}]}"#
        );

        let decoded = ChainSpec::from_json(&json).expect("round trips");
        assert_eq!(spec, decoded);
    }
}
