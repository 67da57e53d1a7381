//! Node configuration with TOML file support.

use std::path::Path;

use serde::{Deserialize, Serialize};

use gridpledge_types::params::MAX_BATCH_LIMIT;
use gridpledge_types::{DistributorParams, EngineParams, LedgerParams, Principal};

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for a GridPledge node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Principal allowed to run events and submit readings.
    #[serde(default = "default_oracle")]
    pub oracle: Principal,

    /// Administrator of the pool ledger and the distributor.
    #[serde(default = "default_admin")]
    pub admin: Principal,

    /// Account holding pool funds and receiving slashed stakes.
    #[serde(default = "default_treasury")]
    pub treasury: Principal,

    /// Identity the distributor presents to the ledger when claiming.
    #[serde(default = "default_distributor_operator")]
    pub distributor_operator: Principal,

    /// Hex-encoded Ed25519 public key that signs meter readings.
    #[serde(default)]
    pub oracle_public_key: Option<String>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub engine: EngineParams,

    #[serde(default)]
    pub ledger: LedgerParams,

    #[serde(default)]
    pub distributor: DistributorParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_oracle() -> Principal {
    Principal::new("oracle")
}

fn default_admin() -> Principal {
    Principal::new("admin")
}

fn default_treasury() -> Principal {
    Principal::new("treasury")
}

fn default_distributor_operator() -> Principal {
    Principal::new("distributor")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn parsed_log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }

    /// Reject configurations no node could run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        for (name, who) in [
            ("oracle", &self.oracle),
            ("admin", &self.admin),
            ("treasury", &self.treasury),
            ("distributor_operator", &self.distributor_operator),
        ] {
            if who.is_null() {
                return Err(NodeError::Config(format!("{name} must not be the null principal")));
            }
        }
        for (table, limit) in [
            ("engine", self.engine.batch_limit),
            ("distributor", self.distributor.batch_limit),
        ] {
            if limit > MAX_BATCH_LIMIT {
                return Err(NodeError::Config(format!(
                    "{table}.batch_limit {limit} exceeds {MAX_BATCH_LIMIT}"
                )));
            }
        }
        self.parsed_log_format()?;
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            oracle: default_oracle(),
            admin: default_admin(),
            treasury: default_treasury(),
            distributor_operator: default_distributor_operator(),
            oracle_public_key: None,
            engine: EngineParams::default(),
            ledger: LedgerParams::default(),
            distributor: DistributorParams::default(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
