//! Ordered decision list assigning action tiers to scored transactions

use crate::config::ClassifierConfig;
use crate::error::ScoringError;
use crate::scorer::ScoredTransaction;
use crate::types::classification::{ActionTier, RiskAlert};
use rayon::prelude::*;
use std::collections::HashSet;

/// Stateless classifier applying the calibrated decision list.
///
/// Rules are evaluated top to bottom and the first match wins; no
/// transaction revisits a rule. The ground-truth label is structurally
/// invisible here: classification consumes only scores and amounts.
#[derive(Debug)]
pub struct Classifier {
    block_threshold: f64,
    review_threshold: f64,
    monitor_threshold: f64,
    small_amount_cutoff: f64,
    flagged_cents: HashSet<i64>,
}

impl Classifier {
    /// Build a classifier from a validated decision list configuration.
    pub fn new(config: &ClassifierConfig) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self {
            block_threshold: config.block_threshold,
            review_threshold: config.review_threshold,
            monitor_threshold: config.monitor_threshold,
            small_amount_cutoff: config.small_amount_cutoff,
            flagged_cents: config.flagged_amounts.iter().map(|&a| to_cents(a)).collect(),
        })
    }

    /// Assign exactly one action tier, first matching rule wins:
    ///
    /// 1. score above the block threshold AND amount in the flagged set
    /// 2. score above the review threshold AND amount below the cutoff
    /// 3. score above the monitor threshold
    /// 4. normal processing otherwise
    pub fn classify(&self, scored: &ScoredTransaction) -> ActionTier {
        let score = scored.composite;
        let amount = scored.transaction.amount;

        if score > self.block_threshold && self.flagged_cents.contains(&to_cents(amount)) {
            ActionTier::ImmediateBlock
        } else if score > self.review_threshold && amount < self.small_amount_cutoff {
            ActionTier::HighPriorityReview
        } else if score > self.monitor_threshold {
            ActionTier::MonitorClosely
        } else {
            ActionTier::NormalProcessing
        }
    }

    /// Classify a whole batch; transactions are independent.
    pub fn classify_batch(&self, scored: &[ScoredTransaction]) -> Vec<ActionTier> {
        scored.par_iter().map(|s| self.classify(s)).collect()
    }

    /// Alert record for a scored transaction, `None` for normal processing.
    pub fn alert_for(&self, scored: &ScoredTransaction) -> Option<RiskAlert> {
        let tier = self.classify(scored);
        tier.is_actionable().then(|| {
            RiskAlert::new(
                scored.transaction.transaction_id.clone(),
                tier,
                scored.composite,
                scored.transaction.amount,
            )
        })
    }
}

/// Exact-amount membership is resolved at cent granularity, so 99.99
/// matches 99.99 and nothing else.
fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::types::transaction::Transaction;

    fn config() -> ClassifierConfig {
        ClassifierConfig {
            block_threshold: 3.0,
            review_threshold: 2.0,
            monitor_threshold: 1.0,
            small_amount_cutoff: 100.0,
            flagged_amounts: vec![1.00, 99.99, 0.01],
        }
    }

    fn scored(amount: f64, composite: f64) -> ScoredTransaction {
        ScoredTransaction {
            transaction: Transaction::new("tx", amount, 0, vec![]),
            amount_z: 0.0,
            feature_z: vec![],
            composite,
        }
    }

    #[test]
    fn test_decision_list_order() {
        let classifier = Classifier::new(&config()).unwrap();

        // Flagged amount + extreme score: rule 1 fires before rule 2
        // would, even though the amount is also below the cutoff
        assert_eq!(
            classifier.classify(&scored(99.99, 5.0)),
            ActionTier::ImmediateBlock
        );
        // Same score, unflagged amount: falls through to review
        assert_eq!(
            classifier.classify(&scored(42.50, 5.0)),
            ActionTier::HighPriorityReview
        );
        // Same score, large unflagged amount: monitor only
        assert_eq!(
            classifier.classify(&scored(500.0, 5.0)),
            ActionTier::MonitorClosely
        );
        // Moderate score
        assert_eq!(
            classifier.classify(&scored(42.50, 1.5)),
            ActionTier::MonitorClosely
        );
        // Quiet transaction
        assert_eq!(
            classifier.classify(&scored(42.50, 0.5)),
            ActionTier::NormalProcessing
        );
    }

    #[test]
    fn test_exactly_one_tier_for_any_input() {
        let classifier = Classifier::new(&config()).unwrap();

        for amount in [0.01, 1.00, 9.99, 99.99, 100.0, 5000.0] {
            for composite in [0.0, 0.99, 1.01, 2.5, 3.5, 50.0] {
                // classify is total: every combination lands in a tier
                let tier = classifier.classify(&scored(amount, composite));
                assert!(ActionTier::ALL.contains(&tier));
            }
        }
    }

    #[test]
    fn test_amount_matching_is_exact_to_the_cent() {
        let classifier = Classifier::new(&config()).unwrap();

        assert_eq!(
            classifier.classify(&scored(99.99, 4.0)),
            ActionTier::ImmediateBlock
        );
        // One cent off the pattern: not a block
        assert_eq!(
            classifier.classify(&scored(99.98, 4.0)),
            ActionTier::HighPriorityReview
        );
        // Float noise within a cent still matches
        assert_eq!(
            classifier.classify(&scored(0.01 + 1e-12, 4.0)),
            ActionTier::ImmediateBlock
        );
    }

    #[test]
    fn test_threshold_boundaries_are_strict() {
        let classifier = Classifier::new(&config()).unwrap();

        // Exactly at the monitor threshold is not above it
        assert_eq!(
            classifier.classify(&scored(42.50, 1.0)),
            ActionTier::NormalProcessing
        );
        assert_eq!(
            classifier.classify(&scored(42.50, 1.0 + 1e-9)),
            ActionTier::MonitorClosely
        );
    }

    #[test]
    fn test_alerts_only_for_actionable_tiers() {
        let classifier = Classifier::new(&config()).unwrap();

        assert!(classifier.alert_for(&scored(42.50, 0.5)).is_none());

        let alert = classifier.alert_for(&scored(99.99, 5.0)).unwrap();
        assert_eq!(alert.tier, ActionTier::ImmediateBlock);
        assert_eq!(alert.amount, 99.99);
    }

    #[test]
    fn test_empty_flagged_amounts_rejected() {
        let mut config = config();
        config.flagged_amounts.clear();

        let err = Classifier::new(&config).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidConfig(_)));
    }
}
