//! Multi-feature z-score average detection method

use crate::detection::DetectionMethod;
use crate::error::ScoringError;
use crate::scorer::subset_average_z;
use crate::stats::FeatureStatistics;
use crate::types::transaction::Transaction;

/// Flags transactions by the mean z-score of a configured feature subset.
pub struct MultiFeatureZScore<'a> {
    stats: &'a FeatureStatistics,
    features: Vec<usize>,
}

impl<'a> MultiFeatureZScore<'a> {
    /// Build the method, rejecting an empty or out-of-range feature subset.
    pub fn new(stats: &'a FeatureStatistics, features: Vec<usize>) -> Result<Self, ScoringError> {
        if features.is_empty() {
            return Err(ScoringError::InvalidConfig(
                "multi-feature method requires a non-empty feature subset".to_string(),
            ));
        }
        for &index in &features {
            if index >= stats.feature_count() {
                return Err(ScoringError::InvalidConfig(format!(
                    "feature index {index} out of range (batch has {} features)",
                    stats.feature_count()
                )));
            }
        }
        Ok(Self { stats, features })
    }
}

impl DetectionMethod for MultiFeatureZScore<'_> {
    fn name(&self) -> &str {
        "multi_feature_zscore"
    }

    fn score(&self, tx: &Transaction) -> f64 {
        subset_average_z(self.stats, &self.features, tx)
    }
}
