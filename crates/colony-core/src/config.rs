//! Configuration loading and typed config structures for the colony simulation.
//!
//! The canonical configuration lives in `colony-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure and a loader that reads the file. Every field has a default, so
//! a partial (or empty) file is valid.

use std::path::Path;

use colony_agents::NeedsConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level colony configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColonyConfig {
    /// World-level settings (name, seed, starting population).
    #[serde(default)]
    pub world: WorldConfig,

    /// Turn and season settings.
    #[serde(default)]
    pub time: TimeConfig,

    /// Needs, sleep, and meal parameters.
    #[serde(default)]
    pub needs: NeedsConfig,

    /// Work and harvest parameters.
    #[serde(default)]
    pub work: WorkConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Run bounds.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl ColonyConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the YAML is invalid.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Human-readable colony name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for population generation.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of pawns spawned at start.
    #[serde(default = "default_initial_pawns")]
    pub initial_pawns: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            initial_pawns: default_initial_pawns(),
        }
    }
}

/// Turn and season configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Number of turns in one season.
    #[serde(default = "default_ticks_per_season")]
    pub ticks_per_season: u64,

    /// Ordered list of season names forming the annual cycle.
    #[serde(default = "default_seasons")]
    pub seasons: Vec<String>,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            ticks_per_season: default_ticks_per_season(),
            seasons: default_seasons(),
        }
    }
}

/// Work and harvest configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkConfig {
    /// Units harvested per point of priority at efficiency 1.0.
    #[serde(default = "default_base_harvest_rate")]
    pub base_harvest_rate: Decimal,

    /// Priority of the activity in a synthesized default assignment.
    #[serde(default = "default_priority")]
    pub default_priority: u8,
}

impl Default for WorkConfig {
    fn default() -> Self {
        Self {
            base_harvest_rate: default_base_harvest_rate(),
            default_priority: default_priority(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Run bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Stop after this many turns (0 = unlimited).
    #[serde(default = "default_max_turns")]
    pub max_turns: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "New Hope".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_initial_pawns() -> u32 {
    5
}

const fn default_ticks_per_season() -> u64 {
    30
}

fn default_seasons() -> Vec<String> {
    vec![
        "spring".to_owned(),
        "summer".to_owned(),
        "autumn".to_owned(),
        "winter".to_owned(),
    ]
}

fn default_base_harvest_rate() -> Decimal {
    Decimal::ONE
}

const fn default_priority() -> u8 {
    5
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_max_turns() -> u64 {
    120
}
