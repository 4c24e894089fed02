//! TOML-based analysis configuration.
//!
//! Holds:
//! - The reference label set
//! - Default input and report paths
//! - Simulation trials, seed and tie-break policy
//! - Balance and distribution thresholds
//!
//! An explicit path wins; otherwise `~/.config/quizcheck/config.toml` is used
//! when it exists, and built-in defaults apply when it does not.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::quiz::{reference_labels, Label};
use crate::scoring::TieBreak;
use crate::simulation::SimulationConfig;

/// Simulation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    #[serde(default = "default_trials")]
    pub trials: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub tie_break: TieBreak,
}

/// Per-question balance thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSettings {
    #[serde(default = "default_expected_options")]
    pub expected_options: usize,
    #[serde(default = "default_min_distinct_labels")]
    pub min_distinct_labels: usize,
}

/// Label distribution thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSettings {
    #[serde(default = "default_imbalance_tolerance")]
    pub imbalance_tolerance: f64,
}

/// Analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizCheckConfig {
    /// Labels every quiz should cover, in canonical order
    #[serde(default = "reference_labels")]
    pub reference_labels: Vec<Label>,
    /// Quiz source analyzed when no path is given
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Where the JSON report is written
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub balance: BalanceSettings,
    #[serde(default)]
    pub distribution: DistributionSettings,
}

// Default functions
fn default_trials() -> usize {
    1000
}
fn default_expected_options() -> usize {
    4
}
fn default_min_distinct_labels() -> usize {
    3
}
fn default_imbalance_tolerance() -> f64 {
    2.0
}
fn default_input() -> PathBuf {
    PathBuf::from("quiz-consuelo/quiz.html")
}
fn default_output() -> PathBuf {
    PathBuf::from("quiz_validation_report.json")
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            seed: None,
            tie_break: TieBreak::default(),
        }
    }
}

impl Default for BalanceSettings {
    fn default() -> Self {
        Self {
            expected_options: default_expected_options(),
            min_distinct_labels: default_min_distinct_labels(),
        }
    }
}

impl Default for DistributionSettings {
    fn default() -> Self {
        Self {
            imbalance_tolerance: default_imbalance_tolerance(),
        }
    }
}

impl Default for QuizCheckConfig {
    fn default() -> Self {
        Self {
            reference_labels: reference_labels(),
            input: default_input(),
            output: default_output(),
            simulation: SimulationSettings::default(),
            balance: BalanceSettings::default(),
            distribution: DistributionSettings::default(),
        }
    }
}

impl From<&SimulationSettings> for SimulationConfig {
    fn from(settings: &SimulationSettings) -> Self {
        Self {
            trials: settings.trials,
            seed: settings.seed,
            tie_break: settings.tie_break,
        }
    }
}

impl QuizCheckConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// `~/.config/quizcheck/config.toml`, if a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("quizcheck").join("config.toml"))
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML for this schema or
    /// fails [`QuizCheckConfig::validate`].
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let cfg: QuizCheckConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit path, the default path, or built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path cannot be read, or if the chosen
    /// file cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(found) => found,
                None => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Persist as pretty TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Reject settings the analyses cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.trials == 0 {
            return Err(ConfigError::InvalidValue {
                key: "simulation.trials".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.reference_labels.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "reference_labels".into(),
                message: "must name at least one label".into(),
            });
        }
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = self.reference_labels.iter().find(|l| !seen.insert(*l)) {
            return Err(ConfigError::InvalidValue {
                key: "reference_labels".into(),
                message: format!("'{dup}' is listed more than once"),
            });
        }
        let tolerance = self.distribution.imbalance_tolerance;
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "distribution.imbalance_tolerance".into(),
                message: "must be a non-negative number".into(),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some("null".into()),
            other => Some(other.to_string()),
        }
    }

    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig::from(&self.simulation)
    }
}
