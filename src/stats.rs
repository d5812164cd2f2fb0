//! Population statistics over a transaction batch

use crate::error::ScoringError;
use crate::types::transaction::Transaction;
use rayon::prelude::*;
use serde::Serialize;

/// Welford accumulator for one variable.
///
/// Merging two accumulators is commutative and associative, so a batch may
/// be partitioned freely; only floating-point rounding depends on the
/// partition order, bounded by the usual f64 error terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    /// Fold one observation into the accumulator.
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Combine two partial accumulators.
    pub fn merge(self, other: Self) -> Self {
        if self.count == 0 {
            return other;
        }
        if other.count == 0 {
            return self;
        }
        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let mean = self.mean + delta * other.count as f64 / count as f64;
        let m2 = self.m2
            + other.m2
            + delta * delta * self.count as f64 * other.count as f64 / count as f64;
        Self { count, mean, m2 }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation. Never negative; exactly 0 for a
    /// constant input.
    pub fn std_dev(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.m2 / self.count as f64).max(0.0).sqrt()
        }
    }

    fn finish(self) -> VariableStats {
        VariableStats {
            mean: self.mean(),
            std_dev: self.std_dev(),
        }
    }
}

/// Mean and population standard deviation for one variable.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VariableStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Z-score magnitude of a value against a variable's population statistics.
///
/// Defined as exactly 0.0 when the population shows no variance: a constant
/// feature carries no signal, not infinite anomaly.
pub fn z_score(value: f64, stats: &VariableStats) -> f64 {
    if stats.std_dev == 0.0 {
        0.0
    } else {
        (value - stats.mean).abs() / stats.std_dev
    }
}

/// Immutable per-batch statistics for the amount and every feature.
///
/// A value object computed once per batch and passed explicitly to every
/// downstream component; nothing caches it across batches.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureStatistics {
    /// Number of transactions the statistics were computed over
    pub transaction_count: usize,

    /// Amount statistics
    pub amount: VariableStats,

    /// Per-feature statistics, in feature order
    pub features: Vec<VariableStats>,
}

/// Partial per-batch accumulator; one per rayon partition.
#[derive(Debug, Clone)]
struct BatchAccumulator {
    amount: RunningStats,
    features: Vec<RunningStats>,
}

impl BatchAccumulator {
    fn new(feature_count: usize) -> Self {
        Self {
            amount: RunningStats::default(),
            features: vec![RunningStats::default(); feature_count],
        }
    }

    fn push(&mut self, tx: &Transaction) {
        self.amount.push(tx.amount);
        for (acc, &value) in self.features.iter_mut().zip(&tx.features) {
            acc.push(value);
        }
    }

    fn merge(mut self, other: Self) -> Self {
        self.amount = self.amount.merge(other.amount);
        for (acc, other_acc) in self.features.iter_mut().zip(other.features) {
            *acc = acc.merge(other_acc);
        }
        self
    }
}

impl FeatureStatistics {
    /// Compute statistics over a non-empty batch in one parallel pass.
    ///
    /// Fails with [`ScoringError::EmptyBatch`] rather than returning zeroed
    /// statistics, and with [`ScoringError::RaggedBatch`] if transactions
    /// disagree on feature count.
    pub fn from_batch(batch: &[Transaction]) -> Result<Self, ScoringError> {
        let first = batch.first().ok_or(ScoringError::EmptyBatch)?;
        let feature_count = first.features.len();

        for tx in batch {
            if tx.features.len() != feature_count {
                return Err(ScoringError::RaggedBatch {
                    expected: feature_count,
                    actual: tx.features.len(),
                    transaction_id: tx.transaction_id.clone(),
                });
            }
        }

        let acc = batch
            .par_iter()
            .fold(
                || BatchAccumulator::new(feature_count),
                |mut acc, tx| {
                    acc.push(tx);
                    acc
                },
            )
            .reduce(|| BatchAccumulator::new(feature_count), BatchAccumulator::merge);

        Ok(Self {
            transaction_count: batch.len(),
            amount: acc.amount.finish(),
            features: acc.features.into_iter().map(RunningStats::finish).collect(),
        })
    }

    /// Statistics for one feature by zero-based index.
    pub fn feature(&self, index: usize) -> Option<&VariableStats> {
        self.features.get(index)
    }

    /// Number of features per transaction in this batch.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}
