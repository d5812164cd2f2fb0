//! Core data types for the scoring pipeline

pub mod classification;
pub mod transaction;

pub use classification::{ActionTier, RiskAlert};
pub use transaction::{LabeledTransaction, Transaction};
