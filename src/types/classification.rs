//! Action tiers and alert records produced by classification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Action tier assigned to a scored transaction.
///
/// Tiers are ordered by severity; every transaction lands in exactly one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ActionTier {
    NormalProcessing,
    MonitorClosely,
    HighPriorityReview,
    ImmediateBlock,
}

impl ActionTier {
    /// True for any tier that warrants analyst attention.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, ActionTier::NormalProcessing)
    }

    /// All tiers, most severe first.
    pub const ALL: [ActionTier; 4] = [
        ActionTier::ImmediateBlock,
        ActionTier::HighPriorityReview,
        ActionTier::MonitorClosely,
        ActionTier::NormalProcessing,
    ];
}

/// Alert record emitted for transactions classified above normal processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAlert {
    /// Unique alert identifier
    pub alert_id: String,

    /// Associated transaction ID
    pub transaction_id: String,

    /// Assigned action tier
    pub tier: ActionTier,

    /// Anomaly score that triggered the tier
    pub score: f64,

    /// Transaction amount
    pub amount: f64,

    /// Alert generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl RiskAlert {
    /// Create a new alert for a classified transaction.
    pub fn new(transaction_id: String, tier: ActionTier, score: f64, amount: f64) -> Self {
        Self {
            alert_id: uuid::Uuid::new_v4().to_string(),
            transaction_id,
            tier,
            score,
            amount,
            timestamp: Utc::now(),
        }
    }
}
