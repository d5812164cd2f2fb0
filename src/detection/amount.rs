//! Amount-deviation detection method

use crate::detection::DetectionMethod;
use crate::stats::{z_score, FeatureStatistics};
use crate::types::transaction::Transaction;

/// Flags transactions whose amount deviates from the batch mean.
///
/// The weakest of the built-in methods on the reference dataset; kept as
/// the comparison baseline.
pub struct AmountDeviation<'a> {
    stats: &'a FeatureStatistics,
}

impl<'a> AmountDeviation<'a> {
    pub fn new(stats: &'a FeatureStatistics) -> Self {
        Self { stats }
    }
}

impl DetectionMethod for AmountDeviation<'_> {
    fn name(&self) -> &str {
        "amount_deviation"
    }

    fn score(&self, tx: &Transaction) -> f64 {
        z_score(tx.amount, &self.stats.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_outlier_scores_high() {
        let batch = vec![
            Transaction::new("a", 10.0, 0, vec![]),
            Transaction::new("b", 12.0, 0, vec![]),
            Transaction::new("c", 11.0, 0, vec![]),
            Transaction::new("d", 5000.0, 0, vec![]),
        ];
        let stats = FeatureStatistics::from_batch(&batch).unwrap();
        let method = AmountDeviation::new(&stats);

        assert!(method.score(&batch[3]) > method.score(&batch[0]));
        assert!(method.flag(&batch[3], 1.0));
        assert!(!method.flag(&batch[0], 1.0));
    }
}
