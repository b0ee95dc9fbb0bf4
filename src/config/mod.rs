use crate::error::{MigrationError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// schemashift user configuration
///
/// Stored at ~/.schemashift/config.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON snapshot used by the CLI store
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Reject execute/rollback requests that don't match the lifecycle graph
    #[serde(default = "default_strict_transitions")]
    pub strict_transitions: bool,

    /// Probability that a simulated execution succeeds
    #[serde(default = "default_success_rate")]
    pub success_rate: f64,

    /// Probability of the data-integrity warning on success
    #[serde(default = "default_data_warning_rate")]
    pub data_warning_rate: f64,

    /// Probability of the file-permissions warning on success
    #[serde(default = "default_permissions_warning_rate")]
    pub permissions_warning_rate: f64,

    /// Pause before each staged execution log line (milliseconds)
    #[serde(default = "default_execute_delays")]
    pub execute_delays_ms: [u64; 4],

    /// Pause after each of the first two rollback log lines (milliseconds)
    #[serde(default = "default_rollback_delays")]
    pub rollback_delays_ms: [u64; 2],
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".schemashift")
}

fn default_store_path() -> PathBuf {
    config_dir().join("store.json")
}

fn default_strict_transitions() -> bool {
    true
}

fn default_success_rate() -> f64 {
    0.8
}

fn default_data_warning_rate() -> f64 {
    0.3
}

fn default_permissions_warning_rate() -> f64 {
    0.2
}

fn default_execute_delays() -> [u64; 4] {
    [1000, 1000, 1500, 1000]
}

fn default_rollback_delays() -> [u64; 2] {
    [1000, 1500]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            strict_transitions: default_strict_transitions(),
            success_rate: default_success_rate(),
            data_warning_rate: default_data_warning_rate(),
            permissions_warning_rate: default_permissions_warning_rate(),
            execute_delays_ms: default_execute_delays(),
            rollback_delays_ms: default_rollback_delays(),
        }
    }
}

impl Config {
    /// Config file path
    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load from the config file (defaults when the file is missing)
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| MigrationError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to the config file
    ///
    /// # Examples
    /// ```no_run
    /// use schemashift::config::Config;
    ///
    /// let mut config = Config::default();
    /// config.success_rate = 1.0;
    /// config.save().unwrap();
    /// ```
    pub fn save(&self) -> Result<()> {
        let dir = config_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| MigrationError::ConfigError(e.to_string()))?;

        fs::write(Self::config_path(), toml_string)?;

        Ok(())
    }

    /// Write the default configuration
    pub fn init() -> Result<()> {
        Self::default().save()
    }

    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("success_rate", self.success_rate),
            ("data_warning_rate", self.data_warning_rate),
            ("permissions_warning_rate", self.permissions_warning_rate),
        ];

        for (name, rate) in rates {
            if !(0.0..=1.0).contains(&rate) {
                return Err(MigrationError::ConfigError(format!(
                    "{} must be between 0 and 1, got {}",
                    name, rate
                )));
            }
        }

        Ok(())
    }

    /// Simulation parameters for the executor
    pub fn simulation(&self) -> SimulationConfig {
        SimulationConfig {
            success_rate: self.success_rate,
            data_warning_rate: self.data_warning_rate,
            permissions_warning_rate: self.permissions_warning_rate,
            execute_delays: self.execute_delays_ms.map(Duration::from_millis),
            rollback_delays: self.rollback_delays_ms.map(Duration::from_millis),
            strict_transitions: self.strict_transitions,
        }
    }
}

/// Runtime knobs of the simulated execution
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub success_rate: f64,
    pub data_warning_rate: f64,
    pub permissions_warning_rate: f64,
    pub execute_delays: [Duration; 4],
    pub rollback_delays: [Duration; 2],
    pub strict_transitions: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Config::default().simulation()
    }
}

impl SimulationConfig {
    /// Same rates, no pauses between stages
    pub fn instant() -> Self {
        Self::default().without_delays()
    }

    pub fn without_delays(mut self) -> Self {
        self.execute_delays = [Duration::ZERO; 4];
        self.rollback_delays = [Duration::ZERO; 2];
        self
    }

    pub fn with_strict_transitions(mut self, strict: bool) -> Self {
        self.strict_transitions = strict;
        self
    }
}
