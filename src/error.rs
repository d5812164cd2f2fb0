//! Error types for the scoring core

use thiserror::Error;

/// Errors surfaced by the scoring core.
///
/// Two conditions are deliberately not errors: a z-score against a
/// zero-variance feature is defined as 0.0, and precision at a threshold
/// that flags nothing is reported as `None`. Both are recovered where they
/// occur instead of propagating.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Statistics requested over a batch with no transactions.
    #[error("cannot compute statistics over an empty batch")]
    EmptyBatch,

    /// Transactions within one batch disagree on feature count.
    #[error(
        "inconsistent feature count in batch: expected {expected}, \
         transaction '{transaction_id}' has {actual}"
    )]
    RaggedBatch {
        expected: usize,
        actual: usize,
        transaction_id: String,
    },

    /// Configuration missing or inconsistent; surfaced before any scoring.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
