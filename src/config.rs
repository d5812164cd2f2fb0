//! Configuration management for batch fraud risk scoring

use crate::error::ScoringError;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub scoring: ScoringConfig,
    pub calibration: CalibrationConfig,
    pub classifier: ClassifierConfig,
    pub logging: LoggingConfig,
}

/// Anomaly scoring configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Zero-based feature indices averaged by the multi-feature mode
    #[serde(default = "default_feature_subset")]
    pub feature_subset: Vec<usize>,

    /// Zero-based index of the single most discriminative feature.
    /// Re-derived per dataset by the calibration pipeline, never assumed.
    #[serde(default = "default_designated_feature")]
    pub designated_feature: usize,
}

fn default_feature_subset() -> Vec<usize> {
    (0..5).collect()
}

fn default_designated_feature() -> usize {
    // V14 in the reference dataset
    13
}

/// Threshold calibration configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CalibrationConfig {
    /// Candidate thresholds swept against the labeled batch
    #[serde(default = "default_candidates")]
    pub candidates: Vec<f64>,
}

fn default_candidates() -> Vec<f64> {
    vec![0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 5.0, 6.0, 8.0]
}

/// Classifier decision list configuration.
///
/// All values are outputs of calibration against a specific dataset and
/// must be re-derivable, so none of them is a compiled-in constant.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Score above which an exact-amount match blocks immediately
    pub block_threshold: f64,

    /// Score above which small amounts go to high-priority review
    pub review_threshold: f64,

    /// Score above which a transaction is monitored closely
    pub monitor_threshold: f64,

    /// Amounts below this combine with the review threshold
    pub small_amount_cutoff: f64,

    /// Exact amounts associated with known fraud patterns
    pub flagged_amounts: Vec<f64>,
}

impl ClassifierConfig {
    /// Check the decision list configuration before any scoring begins.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.flagged_amounts.is_empty() {
            return Err(ScoringError::InvalidConfig(
                "classifier.flagged_amounts must not be empty".to_string(),
            ));
        }
        if self.small_amount_cutoff <= 0.0 {
            return Err(ScoringError::InvalidConfig(format!(
                "classifier.small_amount_cutoff must be positive, got {}",
                self.small_amount_cutoff
            )));
        }
        for (name, value) in [
            ("block_threshold", self.block_threshold),
            ("review_threshold", self.review_threshold),
            ("monitor_threshold", self.monitor_threshold),
        ] {
            if !value.is_finite() {
                return Err(ScoringError::InvalidConfig(format!(
                    "classifier.{name} must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Check the whole configuration before any scoring begins.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.scoring.feature_subset.is_empty() {
            return Err(ScoringError::InvalidConfig(
                "scoring.feature_subset must not be empty".to_string(),
            ));
        }
        if self.calibration.candidates.is_empty() {
            return Err(ScoringError::InvalidConfig(
                "calibration.candidates must not be empty".to_string(),
            ));
        }
        self.classifier.validate()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig {
                feature_subset: default_feature_subset(),
                designated_feature: default_designated_feature(),
            },
            calibration: CalibrationConfig {
                candidates: default_candidates(),
            },
            classifier: ClassifierConfig {
                block_threshold: 3.5,
                review_threshold: 2.5,
                monitor_threshold: 1.5,
                small_amount_cutoff: 100.0,
                flagged_amounts: vec![1.00, 99.99, 0.01],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
