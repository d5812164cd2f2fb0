//! Threshold calibration by sweeping candidates against a labeled batch

use crate::detection::DetectionMethod;
use crate::error::ScoringError;
use crate::types::transaction::LabeledTransaction;
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;

/// One evaluated candidate threshold.
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdCandidate {
    /// Candidate threshold value
    pub threshold: f64,

    /// Transactions scoring strictly above the threshold
    pub flagged: usize,

    /// Flagged transactions that are labeled fraud
    pub true_positives: usize,

    /// true_positives / flagged; `None` when nothing was flagged
    pub precision: Option<f64>,

    /// true_positives / total fraud in the batch
    pub recall: f64,
}

/// Full sweep outcome for one method over one batch, ranked best-first.
///
/// Valid only for the batch it was computed from; a changed batch
/// invalidates the result and the sweep must be re-run.
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationResult {
    /// Method the sweep was run for
    pub method: String,

    /// Candidates ranked by precision desc, recall desc, threshold asc;
    /// undefined-precision candidates sort last
    pub candidates: Vec<ThresholdCandidate>,

    /// Total fraud cases in the batch
    pub fraud_count: usize,
}

impl CalibrationResult {
    /// The argmax candidate: highest precision, ties broken by higher
    /// recall, then by lower threshold (broader detection). Candidates
    /// that flagged nothing never win.
    pub fn best(&self) -> Option<&ThresholdCandidate> {
        self.candidates.iter().find(|c| c.precision.is_some())
    }
}

/// Sweeps candidate thresholds for one detection method.
pub struct ThresholdCalibrator<'a> {
    method: &'a dyn DetectionMethod,
}

impl<'a> ThresholdCalibrator<'a> {
    pub fn new(method: &'a dyn DetectionMethod) -> Self {
        Self { method }
    }

    /// Evaluate every candidate against the labeled batch.
    ///
    /// Scores are computed once per transaction; candidates are evaluated
    /// independently in parallel and ranked in a single final sort.
    pub fn sweep(
        &self,
        batch: &[LabeledTransaction],
        candidates: &[f64],
    ) -> Result<CalibrationResult, ScoringError> {
        if batch.is_empty() {
            return Err(ScoringError::EmptyBatch);
        }
        if candidates.is_empty() {
            return Err(ScoringError::InvalidConfig(
                "calibration requires a non-empty candidate set".to_string(),
            ));
        }

        let scored: Vec<(f64, bool)> = batch
            .par_iter()
            .map(|labeled| (self.method.score(&labeled.transaction), labeled.is_fraud))
            .collect();
        let fraud_count = scored.iter().filter(|(_, fraud)| *fraud).count();

        let mut evaluated: Vec<ThresholdCandidate> = candidates
            .par_iter()
            .map(|&threshold| evaluate_candidate(threshold, &scored, fraud_count))
            .collect();
        rank(&mut evaluated);

        Ok(CalibrationResult {
            method: self.method.name().to_string(),
            candidates: evaluated,
            fraud_count,
        })
    }
}

fn evaluate_candidate(
    threshold: f64,
    scored: &[(f64, bool)],
    fraud_count: usize,
) -> ThresholdCandidate {
    let mut flagged = 0;
    let mut true_positives = 0;
    for &(score, is_fraud) in scored {
        if score > threshold {
            flagged += 1;
            if is_fraud {
                true_positives += 1;
            }
        }
    }

    // Undefined, not zero: a threshold that flags nothing has no precision
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

    ThresholdCandidate {
        threshold,
        flagged,
        true_positives,
        precision,
        recall,
    }
}

fn rank(candidates: &mut [ThresholdCandidate]) {
    candidates.sort_by(|a, b| match (a.precision, b.precision) {
        (Some(pa), Some(pb)) => pb
            .partial_cmp(&pa)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.recall.partial_cmp(&a.recall).unwrap_or(Ordering::Equal))
            .then_with(|| a.threshold.partial_cmp(&b.threshold).unwrap_or(Ordering::Equal)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .threshold
            .partial_cmp(&b.threshold)
            .unwrap_or(Ordering::Equal),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::transaction::Transaction;

    /// Method scoring a transaction by its first feature value directly.
    struct RawFeature;

    impl DetectionMethod for RawFeature {
        fn name(&self) -> &str {
            "raw_feature"
        }

        fn score(&self, tx: &Transaction) -> f64 {
            tx.features[0]
        }
    }

    fn labeled(score: f64, is_fraud: bool, id: usize) -> LabeledTransaction {
        LabeledTransaction::new(
            Transaction::new(format!("tx_{id}"), 10.0, 0, vec![score]),
            is_fraud,
        )
    }

    /// 10 non-fraud below 2.0, 2 fraud above 8.0
    fn separable_batch() -> Vec<LabeledTransaction> {
        let mut batch: Vec<LabeledTransaction> = (0..10)
            .map(|i| labeled(0.1 + i as f64 * 0.15, false, i))
            .collect();
        batch.push(labeled(8.5, true, 10));
        batch.push(labeled(9.5, true, 11));
        batch
    }

    #[test]
    fn test_argmax_is_lowest_threshold_with_perfect_precision() {
        let candidates: Vec<f64> = (1..=9).map(|t| t as f64).collect();
        let result = ThresholdCalibrator::new(&RawFeature)
            .sweep(&separable_batch(), &candidates)
            .unwrap();

        // Thresholds 2..=8 all separate the classes perfectly; the tie
        // breaks toward the broadest (lowest) of them
        let best = result.best().unwrap();
        assert_eq!(best.threshold, 2.0);
        assert_eq!(best.precision, Some(1.0));
        assert_eq!(best.recall, 1.0);
        assert_eq!(best.true_positives, 2);
    }

    #[test]
    fn test_undefined_precision_excluded_from_argmax() {
        // Threshold 100 flags nothing; it must rank last and never win
        let result = ThresholdCalibrator::new(&RawFeature)
            .sweep(&separable_batch(), &[100.0, 8.0])
            .unwrap();

        assert_eq!(result.best().unwrap().threshold, 8.0);
        let last = result.candidates.last().unwrap();
        assert_eq!(last.threshold, 100.0);
        assert_eq!(last.flagged, 0);
        assert!(last.precision.is_none());
    }

    #[test]
    fn test_precision_trades_off_against_recall() {
        let batch = separable_batch();
        let candidates: Vec<f64> = (0..=9).map(|t| t as f64).collect();
        let result = ThresholdCalibrator::new(&RawFeature).sweep(&batch, &candidates).unwrap();

        // Re-order by ascending threshold to check the classic trade-off
        let mut by_threshold = result.candidates.clone();
        by_threshold.sort_by(|a, b| a.threshold.partial_cmp(&b.threshold).unwrap());

        let mut last_precision = 0.0;
        let mut last_recall = 1.0;
        for candidate in by_threshold.iter().filter(|c| c.precision.is_some()) {
            let precision = candidate.precision.unwrap();
            assert!(precision >= last_precision);
            assert!(candidate.recall <= last_recall);
            last_precision = precision;
            last_recall = candidate.recall;
        }
    }

    #[test]
    fn test_ties_break_toward_higher_recall_then_lower_threshold() {
        // Scores 5.0 and 9.0, both fraud: thresholds 1..4 all give
        // precision 1.0 / recall 1.0, thresholds 6..8 give recall 0.5
        let batch = vec![labeled(5.0, true, 0), labeled(9.0, true, 1)];
        let candidates = [8.0, 4.0, 1.0, 6.0];
        let result = ThresholdCalibrator::new(&RawFeature).sweep(&batch, &candidates).unwrap();

        assert_eq!(result.best().unwrap().threshold, 1.0);
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let err = ThresholdCalibrator::new(&RawFeature)
            .sweep(&[], &[1.0])
            .unwrap_err();
        assert!(matches!(err, ScoringError::EmptyBatch));

        let err = ThresholdCalibrator::new(&RawFeature)
            .sweep(&separable_batch(), &[])
            .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidConfig(_)));
    }

    #[test]
    fn test_sweep_is_rerunnable_with_new_candidates() {
        let batch = separable_batch();
        let calibrator = ThresholdCalibrator::new(&RawFeature);

        let coarse = calibrator.sweep(&batch, &[2.0, 8.0]).unwrap();
        let fine = calibrator.sweep(&batch, &[7.9, 8.1, 8.3]).unwrap();

        assert_eq!(coarse.best().unwrap().threshold, 8.0);
        assert_eq!(fine.best().unwrap().threshold, 7.9);
    }
}
