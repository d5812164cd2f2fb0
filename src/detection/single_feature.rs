//! Single-feature pattern detection method

use crate::detection::DetectionMethod;
use crate::error::ScoringError;
use crate::scorer::feature_z;
use crate::stats::FeatureStatistics;
use crate::types::transaction::Transaction;

/// Flags transactions by the z-score of one designated feature.
///
/// The designated index is the empirically most discriminative feature for
/// the calibrated dataset; it arrives through configuration so a new
/// dataset can re-derive it instead of inheriting a stale choice.
#[derive(Debug)]
pub struct SingleFeaturePattern<'a> {
    stats: &'a FeatureStatistics,
    feature: usize,
}

impl<'a> SingleFeaturePattern<'a> {
    /// Build the method, rejecting an out-of-range feature index.
    pub fn new(stats: &'a FeatureStatistics, feature: usize) -> Result<Self, ScoringError> {
        if feature >= stats.feature_count() {
            return Err(ScoringError::InvalidConfig(format!(
                "designated feature {feature} out of range (batch has {} features)",
                stats.feature_count()
            )));
        }
        Ok(Self { stats, feature })
    }

    /// The designated feature index.
    pub fn feature(&self) -> usize {
        self.feature
    }
}

impl DetectionMethod for SingleFeaturePattern<'_> {
    fn name(&self) -> &str {
        "single_feature_pattern"
    }

    fn score(&self, tx: &Transaction) -> f64 {
        feature_z(self.stats, self.feature, tx)
    }
}
