//! Synthetic Batch Generator
//!
//! Generates a labeled JSON batch of transactions with injected fraud
//! patterns for exercising the scoring pipeline end to end.

use anyhow::{Context, Result};
use fraud_risk_scoring::types::transaction::{LabeledTransaction, Transaction};
use rand::Rng;
use std::fs;
use tracing::info;

const FEATURE_COUNT: usize = 28;

/// Exact amounts the generator injects for known fraud patterns; mirrors
/// the default classifier configuration.
const FLAGGED_AMOUNTS: [f64; 3] = [1.00, 99.99, 0.01];

/// Labeled transaction generator
struct BatchGenerator {
    rng: rand::rngs::ThreadRng,
    transaction_counter: u64,
    /// Feature index carrying the injected fraud signal
    designated_feature: usize,
}

impl BatchGenerator {
    fn new(designated_feature: usize) -> Self {
        Self {
            rng: rand::thread_rng(),
            transaction_counter: 0,
            designated_feature,
        }
    }

    fn next_id(&mut self) -> String {
        self.transaction_counter += 1;
        format!("tx_{:012}", self.transaction_counter)
    }

    /// Generate a legitimate transaction: features are mild noise around 0
    fn generate_legitimate(&mut self, elapsed_seconds: u64) -> LabeledTransaction {
        let features: Vec<f64> = (0..FEATURE_COUNT)
            .map(|_| self.rng.gen_range(-1.5..1.5))
            .collect();

        LabeledTransaction::new(
            Transaction::new(
                self.next_id(),
                self.rng.gen_range(5.0..500.0),
                elapsed_seconds,
                features,
            ),
            false,
        )
    }

    /// Generate a fraudulent transaction: the designated feature is pushed
    /// far out of distribution and the amount often matches a known pattern
    fn generate_fraud(&mut self, elapsed_seconds: u64) -> LabeledTransaction {
        let mut features: Vec<f64> = (0..FEATURE_COUNT)
            .map(|_| self.rng.gen_range(-1.5..1.5))
            .collect();
        features[self.designated_feature] = self.rng.gen_range(8.0..15.0);

        let amount = if self.rng.gen_bool(0.5) {
            FLAGGED_AMOUNTS[self.rng.gen_range(0..FLAGGED_AMOUNTS.len())]
        } else {
            self.rng.gen_range(1000.0..9000.0)
        };

        LabeledTransaction::new(
            Transaction::new(self.next_id(), amount, elapsed_seconds, features),
            true,
        )
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gen_batch=info".parse()?),
        )
        .init();

    info!("Starting synthetic batch generator");

    let args: Vec<String> = std::env::args().collect();
    let output_path = args.get(1).map(String::as_str).unwrap_or("data/batch.json");
    let count: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1000);
    let fraud_rate: f64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0.02);
    let designated_feature: usize = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(13);

    info!(
        output = %output_path,
        count = count,
        fraud_rate = fraud_rate,
        designated_feature = designated_feature,
        "Configuration loaded"
    );

    let mut generator = BatchGenerator::new(designated_feature);
    let mut rng = rand::thread_rng();

    let mut batch = Vec::with_capacity(count);
    let mut fraud_count = 0;

    for i in 0..count {
        // Spread the batch over a two-day capture window
        let elapsed_seconds = (i as u64 * 172_800) / count.max(1) as u64;

        let labeled = if rng.gen_bool(fraud_rate) {
            fraud_count += 1;
            generator.generate_fraud(elapsed_seconds)
        } else {
            generator.generate_legitimate(elapsed_seconds)
        };
        batch.push(labeled);
    }

    if let Some(parent) = std::path::Path::new(output_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(&batch)?;
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write batch to {output_path}"))?;

    info!(
        "Completed! Wrote {} transactions ({} legitimate, {} fraud) to {}",
        count,
        count - fraud_count,
        fraud_count,
        output_path
    );

    Ok(())
}
