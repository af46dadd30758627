//! Typed configuration, built from the raw `key = value` map.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::hashpower::{parse_hashpower_changes, HashPowerChangeEntry};
use crate::parser::parse_lines;

/// Minimum and maximum chain length the reveal rule uses when the config
/// leaves them unset.
const DEFAULT_MIN_CHAIN_LENGTH: u64 = 2;
const DEFAULT_MAX_CHAIN_LENGTH: u64 = 15;

/// Inclusive `sim.numSimulations.From`..=`sim.numSimulations.To` range. A
/// bare `sim.numSimulations` sets both ends to the same value. Absent
/// entirely, a single run (`1..=1`) is assumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationCountRange {
    pub from: u32,
    pub to: u32,
}

impl SimulationCountRange {
    pub fn count(&self) -> u32 {
        self.to.saturating_sub(self.from) + 1
    }
}

impl Default for SimulationCountRange {
    fn default() -> Self {
        SimulationCountRange { from: 1, to: 1 }
    }
}

/// Which CSV reporters are active. Each flag defaults to `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportFlags {
    pub events: bool,
    pub block_events: bool,
    pub structure_events: bool,
    pub attack_events: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub simulation_count: SimulationCountRange,
    pub terminate_at_time: f64,

    pub num_honest_nodes: u32,
    pub num_malicious_nodes: u32,
    pub throughput_mean: f64,
    pub throughput_sd: f64,
    pub propagation_time: f64,

    pub workload_lambda: f64,
    pub num_transactions: u64,
    pub tx_size_mean: f64,
    pub tx_size_sd: f64,
    pub tx_fee_value_mean: f64,
    pub tx_fee_value_sd: f64,
    pub has_conflicts: bool,
    pub conflict_dispersion: f64,
    pub conflict_likelihood: f64,
    pub target_transaction: Option<u64>,

    pub pow_difficulty: f64,
    pub hash_power_mean: f64,
    pub hash_power_sd: f64,

    pub max_block_size: u64,
    pub min_size_to_mine: u64,
    pub min_value_to_mine: f64,

    pub required_confirmations: Option<u64>,
    pub min_chain_length: u64,
    pub max_chain_length: u64,

    pub hash_power_changes: Vec<HashPowerChangeEntry>,
    pub report: ReportFlags,
}

impl Config {
    pub fn load_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Config::load_str(&text)
    }

    pub fn load_str(text: &str) -> Result<Config, ConfigError> {
        Config::from_map(&parse_lines(text))
    }

    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Config, ConfigError> {
        let simulation_count = match (map.get("sim.numSimulations"), map.get("sim.numSimulations.From"), map.get("sim.numSimulations.To")) {
            (Some(single), None, None) => {
                let value = parse_u32("sim.numSimulations", single)?;
                SimulationCountRange { from: value, to: value }
            }
            (None, from, to) => SimulationCountRange {
                from: match from {
                    Some(v) => parse_u32("sim.numSimulations.From", v)?,
                    None => SimulationCountRange::default().from,
                },
                to: match to {
                    Some(v) => parse_u32("sim.numSimulations.To", v)?,
                    None => SimulationCountRange::default().to,
                },
            },
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                SimulationCountRange::default()
            }
        };

        let num_malicious_nodes = optional_u32(map, "net.numOfMaliciousNodes")?.unwrap_or(0);

        Ok(Config {
            simulation_count,
            terminate_at_time: required_f64(map, "sim.terminate.atTime")?,

            num_honest_nodes: required_u32(map, "net.numOfHonestNodes")?,
            num_malicious_nodes,
            throughput_mean: optional_f64(map, "net.throughputMean")?.unwrap_or(0.0),
            throughput_sd: optional_f64(map, "net.throughputSD")?.unwrap_or(0.0),
            propagation_time: optional_f64(map, "net.propagationTime")?.unwrap_or(0.0),

            workload_lambda: required_f64(map, "workload.lambda")?,
            num_transactions: required_u64(map, "workload.numTransactions")?,
            tx_size_mean: optional_f64(map, "workload.txSizeMean")?.unwrap_or(250.0),
            tx_size_sd: optional_f64(map, "workload.txSizeSD")?.unwrap_or(20.0),
            tx_fee_value_mean: optional_f64(map, "workload.txFeeValueMean")?.unwrap_or(1.0),
            tx_fee_value_sd: optional_f64(map, "workload.txFeeValueSD")?.unwrap_or(0.1),
            has_conflicts: optional_bool(map, "workload.hasConflicts")?.unwrap_or(false),
            conflict_dispersion: optional_f64(map, "workload.conflicts.dispersion")?.unwrap_or(0.0),
            conflict_likelihood: optional_f64(map, "workload.conflicts.likelihood")?.unwrap_or(0.0),
            target_transaction: if num_malicious_nodes > 0 {
                Some(required_u64(map, "workload.targetTransaction")?)
            } else {
                optional_u64(map, "workload.targetTransaction")?
            },

            pow_difficulty: required_f64(map, "pow.difficulty")?,
            hash_power_mean: required_f64(map, "pow.hashPowerMean")?,
            hash_power_sd: optional_f64(map, "pow.hashPowerSD")?.unwrap_or(0.0),

            max_block_size: required_u64(map, "bitcoin.maxBlockSize")?,
            min_size_to_mine: optional_u64(map, "bitcoin.minSizeToMine")?.unwrap_or(0),
            min_value_to_mine: required_f64(map, "bitcoin.minValueToMine")?,

            required_confirmations: if num_malicious_nodes > 0 {
                Some(required_u64(map, "attack.requiredConfirmations")?)
            } else {
                optional_u64(map, "attack.requiredConfirmations")?
            },
            min_chain_length: optional_u64(map, "attack.minChainLength")?
                .unwrap_or(DEFAULT_MIN_CHAIN_LENGTH),
            max_chain_length: optional_u64(map, "attack.maxChainLength")?
                .unwrap_or(DEFAULT_MAX_CHAIN_LENGTH),

            hash_power_changes: match map.get("node.hashPowerChanges") {
                Some(raw) => parse_hashpower_changes(raw)?,
                None => Vec::new(),
            },
            report: ReportFlags {
                events: optional_bool(map, "reporter.reportEvents")?.unwrap_or(false),
                block_events: optional_bool(map, "reporter.reportBlockEvents")?.unwrap_or(false),
                structure_events: optional_bool(map, "reporter.reportStructureEvents")?
                    .unwrap_or(false),
                attack_events: optional_bool(map, "reporter.reportAttackEvents")?.unwrap_or(false),
            },
        })
    }
}

fn required_f64(map: &BTreeMap<String, String>, key: &str) -> Result<f64, ConfigError> {
    let raw = map.get(key).ok_or_else(|| ConfigError::MissingKey { key: key.to_string() })?;
    parse_f64(key, raw)
}

fn optional_f64(map: &BTreeMap<String, String>, key: &str) -> Result<Option<f64>, ConfigError> {
    map.get(key).map(|raw| parse_f64(key, raw)).transpose()
}

fn parse_f64(key: &str, raw: &str) -> Result<f64, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidNumber {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn required_u32(map: &BTreeMap<String, String>, key: &str) -> Result<u32, ConfigError> {
    let raw = map.get(key).ok_or_else(|| ConfigError::MissingKey { key: key.to_string() })?;
    parse_u32(key, raw)
}

fn optional_u32(map: &BTreeMap<String, String>, key: &str) -> Result<Option<u32>, ConfigError> {
    map.get(key).map(|raw| parse_u32(key, raw)).transpose()
}

fn parse_u32(key: &str, raw: &str) -> Result<u32, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidNumber {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn required_u64(map: &BTreeMap<String, String>, key: &str) -> Result<u64, ConfigError> {
    let raw = map.get(key).ok_or_else(|| ConfigError::MissingKey { key: key.to_string() })?;
    parse_u64(key, raw)
}

fn optional_u64(map: &BTreeMap<String, String>, key: &str) -> Result<Option<u64>, ConfigError> {
    map.get(key).map(|raw| parse_u64(key, raw)).transpose()
}

fn parse_u64(key: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidNumber {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn optional_bool(map: &BTreeMap<String, String>, key: &str) -> Result<Option<bool>, ConfigError> {
    match map.get(key) {
        None => Ok(None),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidBool {
                key: key.to_string(),
                value: raw.to_string(),
            }),
        },
    }
}
