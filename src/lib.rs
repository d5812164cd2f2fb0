//! Batch Fraud Risk Scoring Library
//!
//! Computes population statistics over a closed batch of transactions,
//! derives per-transaction anomaly scores, sweeps candidate thresholds
//! against ground-truth labels to pick operating points, and assigns
//! action tiers through a calibrated decision list.

pub mod calibrate;
pub mod classify;
pub mod compare;
pub mod config;
pub mod detection;
pub mod error;
pub mod report;
pub mod scorer;
pub mod stats;
pub mod types;

pub use calibrate::{CalibrationResult, ThresholdCalibrator, ThresholdCandidate};
pub use classify::Classifier;
pub use compare::{MethodComparator, MethodReport};
pub use config::AppConfig;
pub use detection::{
    AmountDeviation, DetectionMethod, MultiFeatureZScore, SingleFeaturePattern,
};
pub use error::ScoringError;
pub use report::BatchReport;
pub use scorer::{AnomalyScorer, ScoredTransaction, ScoringMode};
pub use stats::FeatureStatistics;
pub use types::classification::{ActionTier, RiskAlert};
pub use types::transaction::{LabeledTransaction, Transaction};
