//! Interchangeable detection methods evaluated by the method comparator
//!
//! Each method is a small stateless strategy over one batch's statistics:
//! it scores a transaction and flags it against a threshold. New methods
//! plug into calibration and comparison without touching either.

pub mod amount;
pub mod multi_feature;
pub mod single_feature;

pub use amount::AmountDeviation;
pub use multi_feature::MultiFeatureZScore;
pub use single_feature::SingleFeaturePattern;

use crate::types::transaction::Transaction;

/// A detection method: anomaly score plus threshold flagging.
pub trait DetectionMethod: Send + Sync {
    /// Stable method name used in calibration and comparison reports.
    fn name(&self) -> &str;

    /// Anomaly score for one transaction.
    fn score(&self, tx: &Transaction) -> f64;

    /// Whether the transaction is flagged at the given threshold.
    fn flag(&self, tx: &Transaction, threshold: f64) -> bool {
        self.score(tx) > threshold
    }
}
