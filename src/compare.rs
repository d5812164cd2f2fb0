//! Side-by-side evaluation of detection methods over one labeled batch

use crate::detection::DetectionMethod;
use crate::error::ScoringError;
use crate::types::transaction::LabeledTransaction;
use rayon::prelude::*;
use serde::Serialize;

/// Evaluation of one method at its calibrated threshold.
#[derive(Debug, Clone, Serialize)]
pub struct MethodReport {
    /// Method name
    pub method: String,

    /// Calibrated threshold the method was evaluated at
    pub threshold: f64,

    /// Transactions flagged by the method
    pub flagged: usize,

    /// Flagged transactions labeled fraud
    pub true_positives: usize,

    /// Flagged transactions not labeled fraud
    pub false_positives: usize,

    /// true_positives / flagged; `None` when nothing was flagged
    pub precision: Option<f64>,

    /// true_positives / total fraud in the batch
    pub recall: f64,
}

/// Runs every detection method over the same labeled batch and reports
/// comparative precision/recall.
///
/// Reporting only: the comparator performs no classification and treats
/// methods as interchangeable implementations of [`DetectionMethod`], so
/// new methods join the comparison without changing this code.
pub struct MethodComparator;

impl MethodComparator {
    /// Evaluate each `(method, threshold)` pair against the batch.
    pub fn compare(
        methods: &[(&dyn DetectionMethod, f64)],
        batch: &[LabeledTransaction],
    ) -> Result<Vec<MethodReport>, ScoringError> {
        if batch.is_empty() {
            return Err(ScoringError::EmptyBatch);
        }

        let fraud_count = batch.iter().filter(|labeled| labeled.is_fraud).count();

        Ok(methods
            .iter()
            .map(|&(method, threshold)| {
                Self::evaluate(method, threshold, batch, fraud_count)
            })
            .collect())
    }

    fn evaluate(
        method: &dyn DetectionMethod,
        threshold: f64,
        batch: &[LabeledTransaction],
        fraud_count: usize,
    ) -> MethodReport {
        let (flagged, true_positives) = batch
            .par_iter()
            .map(|labeled| {
                if method.flag(&labeled.transaction, threshold) {
                    (1usize, labeled.is_fraud as usize)
                } else {
                    (0, 0)
                }
            })
            .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

        let precision = if flagged > 0 {
            Some(true_positives as f64 / flagged as f64)
        } else {
            None
        };
        let recall = if fraud_count > 0 {
            true_positives as f64 / fraud_count as f64
        } else {
            0.0
        };

        MethodReport {
            method: method.name().to_string(),
            threshold,
            flagged,
            true_positives,
            false_positives: flagged - true_positives,
            precision,
            recall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{AmountDeviation, SingleFeaturePattern};
    use crate::stats::FeatureStatistics;
    use crate::types::transaction::Transaction;

    fn labeled_batch() -> Vec<LabeledTransaction> {
        // One clear feature-space outlier (fraud) and one amount outlier
        // that is legitimate
        let mut batch = vec![
            LabeledTransaction::new(Transaction::new("a", 10.0, 0, vec![0.1]), false),
            LabeledTransaction::new(Transaction::new("b", 12.0, 0, vec![-0.2]), false),
            LabeledTransaction::new(Transaction::new("c", 11.0, 0, vec![0.3]), false),
            LabeledTransaction::new(Transaction::new("d", 2000.0, 0, vec![0.0]), false),
        ];
        batch.push(LabeledTransaction::new(
            Transaction::new("e", 15.0, 0, vec![25.0]),
            true,
        ));
        batch
    }

    #[test]
    fn test_methods_ranked_by_their_own_merits() {
        let batch = labeled_batch();
        let transactions: Vec<Transaction> =
            batch.iter().map(|l| l.transaction.clone()).collect();
        let stats = FeatureStatistics::from_batch(&transactions).unwrap();

        let amount = AmountDeviation::new(&stats);
        let single = SingleFeaturePattern::new(&stats, 0).unwrap();

        let reports = MethodComparator::compare(
            &[(&amount, 1.5), (&single, 1.5)],
            &batch,
        )
        .unwrap();

        assert_eq!(reports.len(), 2);

        let amount_report = &reports[0];
        assert_eq!(amount_report.method, "amount_deviation");
        // The amount outlier is legitimate, so the amount method pays for it
        assert!(amount_report.false_positives >= 1);

        let single_report = &reports[1];
        assert_eq!(single_report.method, "single_feature_pattern");
        assert_eq!(single_report.true_positives, 1);
        assert_eq!(single_report.false_positives, 0);
        assert_eq!(single_report.precision, Some(1.0));
        assert_eq!(single_report.recall, 1.0);
    }

    #[test]
    fn test_unflagging_threshold_reports_undefined_precision() {
        let batch = labeled_batch();
        let transactions: Vec<Transaction> =
            batch.iter().map(|l| l.transaction.clone()).collect();
        let stats = FeatureStatistics::from_batch(&transactions).unwrap();
        let single = SingleFeaturePattern::new(&stats, 0).unwrap();

        let reports = MethodComparator::compare(&[(&single, 1e9)], &batch).unwrap();

        assert_eq!(reports[0].flagged, 0);
        assert!(reports[0].precision.is_none());
        assert_eq!(reports[0].recall, 0.0);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let err = MethodComparator::compare(&[], &[]).unwrap_err();
        assert!(matches!(err, ScoringError::EmptyBatch));
    }
}
