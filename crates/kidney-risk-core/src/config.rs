//! Pipeline configuration.
//!
//! Loaded from YAML. Every key is optional; missing keys take the values the
//! bundled model and dashboard were built with.
//!
//! ```yaml
//! model_path: models/kidney.json
//! positive_label: 0
//! unknown_categorical: lenient
//! gauges:
//!   hemoglobin:
//!     min: 0
//!     max: 18
//!     thresholds: [12, 13.5]
//!     danger_direction: descending
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoder::{FeatureLayout, LayoutError, UnknownCategoricalPolicy};
use crate::models::{DangerDirection, Field};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "KIDNEY_RISK_CONFIG";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid feature order: {0}")]
    Layout(#[from] LayoutError),

    #[error("Invalid gauge '{gauge}': {reason}")]
    InvalidGauge { gauge: String, reason: String },

    #[error("Positive label must be 0 or 1, got {0}")]
    InvalidLabel(u8),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Axis and color bands of one gauge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GaugeSettings {
    pub min: f64,
    pub max: f64,
    /// Band breakpoints, low then high
    pub thresholds: [f64; 2],
    #[serde(default)]
    pub danger_direction: DangerDirection,
}

impl GaugeSettings {
    fn validate(&self, gauge: &str) -> ConfigResult<()> {
        let [low, high] = self.thresholds;
        let ordered = self.min <= low && low <= high && high <= self.max;
        let finite = [self.min, self.max, low, high].iter().all(|v| v.is_finite());
        if !(finite && ordered) {
            return Err(ConfigError::InvalidGauge {
                gauge: gauge.to_string(),
                reason: format!(
                    "need min <= thresholds[0] <= thresholds[1] <= max, got min={} thresholds=[{}, {}] max={}",
                    self.min, low, high, self.max
                ),
            });
        }
        Ok(())
    }
}

/// The three dashboard gauges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GaugeConfig {
    pub blood_pressure: GaugeSettings,
    pub creatinine: GaugeSettings,
    pub hemoglobin: GaugeSettings,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            blood_pressure: GaugeSettings {
                min: 0.0,
                max: 200.0,
                thresholds: [120.0, 140.0],
                danger_direction: DangerDirection::Ascending,
            },
            creatinine: GaugeSettings {
                min: 0.0,
                max: 10.0,
                thresholds: [1.2, 1.5],
                danger_direction: DangerDirection::Ascending,
            },
            // Ascending like the other two gauges, although low hemoglobin is
            // the clinical danger. Set `descending` to color it that way.
            hemoglobin: GaugeSettings {
                min: 0.0,
                max: 18.0,
                thresholds: [12.0, 13.5],
                danger_direction: DangerDirection::Ascending,
            },
        }
    }
}

impl GaugeConfig {
    /// Gauges in dashboard order with their title and field.
    pub fn entries(&self) -> [(&'static str, Field, GaugeSettings); 3] {
        [
            ("Blood Pressure", Field::BloodPressure, self.blood_pressure),
            ("Creatinine", Field::SerumCreatinine, self.creatinine),
            ("Hemoglobin", Field::Haemoglobin, self.hemoglobin),
        ]
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.blood_pressure.validate("blood_pressure")?;
        self.creatinine.validate("creatinine")?;
        self.hemoglobin.validate("hemoglobin")
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Model column order
    pub feature_order: Vec<String>,
    /// Raw model label that means disease present
    pub positive_label: u8,
    /// Handling of categorical values outside the lookup table
    pub unknown_categorical: UnknownCategoricalPolicy,
    /// Dashboard gauges
    pub gauges: GaugeConfig,
    /// Model artifact location
    pub model_path: Option<PathBuf>,
    /// Identifier stamped on report exports
    pub system_id: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feature_order: FeatureLayout::default()
                .names()
                .into_iter()
                .map(String::from)
                .collect(),
            positive_label: 0,
            unknown_categorical: UnknownCategoricalPolicy::Lenient,
            gauges: GaugeConfig::default(),
            model_path: None,
            system_id: None,
        }
    }
}

impl PipelineConfig {
    /// Check every setting and return the resolved feature layout.
    pub fn validate(&self) -> ConfigResult<FeatureLayout> {
        if self.positive_label > 1 {
            return Err(ConfigError::InvalidLabel(self.positive_label));
        }
        self.gauges.validate()?;
        Ok(FeatureLayout::from_names(&self.feature_order)?)
    }
}

/// Parse a configuration from YAML text.
pub fn parse_config(yaml: &str) -> ConfigResult<PipelineConfig> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Load a configuration from a YAML file at `path`.
pub fn load_config(path: &Path) -> ConfigResult<PipelineConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&contents)
}
