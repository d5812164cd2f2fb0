//! Batch-level reporting projections over scored, classified transactions
//!
//! Pure grouping and formatting; every decision is made upstream by the
//! scorer and classifier.

use crate::scorer::ScoredTransaction;
use crate::types::classification::ActionTier;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Fixed amount segments used for risk reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSegment {
    UpTo10,
    UpTo50,
    UpTo200,
    UpTo1000,
    Over1000,
}

impl AmountSegment {
    /// Segment for an amount; first matching boundary wins, the final
    /// segment is unbounded.
    pub fn of(amount: f64) -> Self {
        if amount <= 10.0 {
            AmountSegment::UpTo10
        } else if amount <= 50.0 {
            AmountSegment::UpTo50
        } else if amount <= 200.0 {
            AmountSegment::UpTo200
        } else if amount <= 1000.0 {
            AmountSegment::UpTo1000
        } else {
            AmountSegment::Over1000
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AmountSegment::UpTo10 => "<=10",
            AmountSegment::UpTo50 => "<=50",
            AmountSegment::UpTo200 => "<=200",
            AmountSegment::UpTo1000 => "<=1000",
            AmountSegment::Over1000 => ">1000",
        }
    }

    /// All segments in boundary order.
    pub const ALL: [AmountSegment; 5] = [
        AmountSegment::UpTo10,
        AmountSegment::UpTo50,
        AmountSegment::UpTo200,
        AmountSegment::UpTo1000,
        AmountSegment::Over1000,
    ];
}

/// Counts for one hour-of-day bucket.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct HourBucket {
    pub transactions: u64,
    pub actionable: u64,
    pub total_amount: f64,
}

/// Counts for one amount segment.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SegmentBucket {
    pub transactions: u64,
    pub actionable: u64,
    pub total_amount: f64,
}

/// Aggregated view of one classified batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Report generation timestamp
    pub generated_at: DateTime<Utc>,

    /// Transactions in the batch
    pub transaction_count: usize,

    /// Sum of all amounts
    pub total_amount: f64,

    /// Transactions per action tier
    pub tier_counts: BTreeMap<ActionTier, u64>,

    /// Hour-of-day breakdown (24 buckets)
    pub hourly: Vec<HourBucket>,

    /// Amount-segment breakdown, in boundary order
    pub segments: BTreeMap<AmountSegment, SegmentBucket>,
}

impl BatchReport {
    /// Aggregate a classified batch. `scored` and `tiers` are produced
    /// pairwise by the scorer and classifier.
    pub fn build(scored: &[ScoredTransaction], tiers: &[ActionTier]) -> Self {
        debug_assert_eq!(scored.len(), tiers.len());

        let mut tier_counts: BTreeMap<ActionTier, u64> =
            ActionTier::ALL.iter().map(|&tier| (tier, 0)).collect();
        let mut hourly = vec![HourBucket::default(); 24];
        let mut segments: BTreeMap<AmountSegment, SegmentBucket> = AmountSegment::ALL
            .iter()
            .map(|&segment| (segment, SegmentBucket::default()))
            .collect();
        let mut total_amount = 0.0;

        for (scored_tx, &tier) in scored.iter().zip(tiers) {
            let tx = &scored_tx.transaction;
            let actionable = tier.is_actionable() as u64;
            total_amount += tx.amount;

            *tier_counts.entry(tier).or_default() += 1;

            let hour = tx.hour_of_day() as usize;
            hourly[hour].transactions += 1;
            hourly[hour].actionable += actionable;
            hourly[hour].total_amount += tx.amount;

            let bucket = segments.entry(AmountSegment::of(tx.amount)).or_default();
            bucket.transactions += 1;
            bucket.actionable += actionable;
            bucket.total_amount += tx.amount;
        }

        Self {
            generated_at: Utc::now(),
            transaction_count: scored.len(),
            total_amount,
            tier_counts,
            hourly,
            segments,
        }
    }

    /// Count for one tier.
    pub fn tier_count(&self, tier: ActionTier) -> u64 {
        self.tier_counts.get(&tier).copied().unwrap_or(0)
    }

    /// Transactions in any tier above normal processing.
    pub fn actionable_count(&self) -> u64 {
        ActionTier::ALL
            .iter()
            .filter(|tier| tier.is_actionable())
            .map(|&tier| self.tier_count(tier))
            .sum()
    }

    /// Log a human-readable summary of the batch.
    pub fn log_summary(&self) {
        let actionable = self.actionable_count();
        let actionable_rate = if self.transaction_count > 0 {
            actionable as f64 / self.transaction_count as f64 * 100.0
        } else {
            0.0
        };

        info!("═══════════════ BATCH RISK SUMMARY ═══════════════");
        info!(
            "Transactions: {:>8}  │  Total amount: {:>12.2}",
            self.transaction_count, self.total_amount
        );
        info!(
            "Actionable:   {:>8}  │  Rate: {:>5.1}%",
            actionable, actionable_rate
        );
        info!("Action tiers:");
        for &tier in &ActionTier::ALL {
            info!("  {:?}: {}", tier, self.tier_count(tier));
        }
        info!("By amount segment:");
        for (segment, bucket) in &self.segments {
            info!(
                "  {:>6}: {:>6} tx, {:>4} actionable, amount {:>12.2}",
                segment.label(),
                bucket.transactions,
                bucket.actionable,
                bucket.total_amount
            );
        }
        info!("By hour of day:");
        for (hour, bucket) in self.hourly.iter().enumerate() {
            if bucket.transactions > 0 {
                info!(
                    "  {:02}h: {:>6} tx, {:>4} actionable",
                    hour, bucket.transactions, bucket.actionable
                );
            }
        }
        info!("══════════════════════════════════════════════════");
    }
}
