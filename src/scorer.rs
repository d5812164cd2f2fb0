//! Per-transaction anomaly scoring against batch statistics

use crate::error::ScoringError;
use crate::stats::{z_score, FeatureStatistics};
use crate::types::transaction::Transaction;
use rayon::prelude::*;

/// How the composite anomaly score is derived from per-feature z-scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoringMode {
    /// Arithmetic mean of the z-scores of a feature subset
    MultiFeatureAverage { features: Vec<usize> },
    /// Z-score of one designated feature
    SingleFeature { feature: usize },
}

impl ScoringMode {
    fn validate(&self, stats: &FeatureStatistics) -> Result<(), ScoringError> {
        match self {
            ScoringMode::MultiFeatureAverage { features } => {
                if features.is_empty() {
                    return Err(ScoringError::InvalidConfig(
                        "multi-feature mode requires a non-empty feature subset".to_string(),
                    ));
                }
                for &index in features {
                    if index >= stats.feature_count() {
                        return Err(ScoringError::InvalidConfig(format!(
                            "feature index {index} out of range (batch has {} features)",
                            stats.feature_count()
                        )));
                    }
                }
                Ok(())
            }
            ScoringMode::SingleFeature { feature } => {
                if *feature >= stats.feature_count() {
                    return Err(ScoringError::InvalidConfig(format!(
                        "designated feature {feature} out of range (batch has {} features)",
                        stats.feature_count()
                    )));
                }
                Ok(())
            }
        }
    }
}

/// A transaction together with its z-scores and composite anomaly score.
#[derive(Debug, Clone)]
pub struct ScoredTransaction {
    pub transaction: Transaction,

    /// Z-score of the amount against the batch amount distribution
    pub amount_z: f64,

    /// Per-feature z-scores, in feature order
    pub feature_z: Vec<f64>,

    /// Composite score for the configured scoring mode
    pub composite: f64,
}

/// Pure scoring function over one batch's statistics.
///
/// Holds a reference to the statistics it was built from, so a stale scorer
/// cannot outlive its batch.
#[derive(Debug)]
pub struct AnomalyScorer<'a> {
    stats: &'a FeatureStatistics,
    mode: ScoringMode,
}

impl<'a> AnomalyScorer<'a> {
    /// Build a scorer, rejecting modes that reference features the batch
    /// does not have.
    pub fn new(stats: &'a FeatureStatistics, mode: ScoringMode) -> Result<Self, ScoringError> {
        mode.validate(stats)?;
        Ok(Self { stats, mode })
    }

    /// Composite score for one transaction without materializing the full
    /// per-feature vector.
    pub fn composite(&self, tx: &Transaction) -> f64 {
        match &self.mode {
            ScoringMode::MultiFeatureAverage { features } => {
                subset_average_z(self.stats, features, tx)
            }
            ScoringMode::SingleFeature { feature } => feature_z(self.stats, *feature, tx),
        }
    }

    /// Score one transaction.
    pub fn score(&self, tx: &Transaction) -> ScoredTransaction {
        let feature_z: Vec<f64> = tx
            .features
            .iter()
            .zip(&self.stats.features)
            .map(|(&value, stats)| z_score(value, stats))
            .collect();

        ScoredTransaction {
            amount_z: z_score(tx.amount, &self.stats.amount),
            composite: self.composite(tx),
            transaction: tx.clone(),
            feature_z,
        }
    }

    /// Score a whole batch; transactions are independent, so this is
    /// parallel with no ordering guarantee beyond input order of the result.
    pub fn score_batch(&self, batch: &[Transaction]) -> Vec<ScoredTransaction> {
        batch.par_iter().map(|tx| self.score(tx)).collect()
    }
}

/// Z-score of one feature of a transaction. 0.0 for out-of-range indices,
/// which `AnomalyScorer::new` rejects up front.
pub(crate) fn feature_z(stats: &FeatureStatistics, index: usize, tx: &Transaction) -> f64 {
    match (tx.features.get(index), stats.feature(index)) {
        (Some(&value), Some(feature_stats)) => z_score(value, feature_stats),
        _ => 0.0,
    }
}

/// Mean z-score over a feature subset.
pub(crate) fn subset_average_z(
    stats: &FeatureStatistics,
    features: &[usize],
    tx: &Transaction,
) -> f64 {
    if features.is_empty() {
        return 0.0;
    }
    let sum: f64 = features
        .iter()
        .map(|&index| feature_z(stats, index, tx))
        .sum();
    sum / features.len() as f64
}
