//! Batch Fraud Risk Scoring - Main Entry Point
//!
//! Loads a labeled batch from JSON, calibrates every detection method,
//! compares them side by side, classifies the batch with the calibrated
//! decision list, and logs a summary report.

use anyhow::{Context, Result};
use fraud_risk_scoring::{
    calibrate::ThresholdCalibrator,
    classify::Classifier,
    compare::MethodComparator,
    config::AppConfig,
    detection::{AmountDeviation, DetectionMethod, MultiFeatureZScore, SingleFeaturePattern},
    report::BatchReport,
    scorer::{AnomalyScorer, ScoringMode},
    stats::FeatureStatistics,
    types::transaction::{LabeledTransaction, Transaction},
};
use std::fs;
use tracing::{info, warn};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let batch_path = args.get(1).map(String::as_str).unwrap_or("data/batch.json");
    let config_path = args
        .get(2)
        .map(String::as_str)
        .unwrap_or("config/config.toml");

    // Load configuration before logging so the configured level applies
    let config = AppConfig::load_from_path(config_path)?;
    config.validate()?;
    init_logging(&config)?;

    info!("Starting batch fraud risk scoring");
    info!(
        batch = %batch_path,
        config = %config_path,
        designated_feature = config.scoring.designated_feature,
        "Configuration loaded"
    );

    // Load the labeled batch
    let raw = fs::read_to_string(batch_path)
        .with_context(|| format!("Failed to read batch file {batch_path}"))?;
    let batch: Vec<LabeledTransaction> =
        serde_json::from_str(&raw).context("Failed to deserialize batch")?;
    let fraud_count = batch.iter().filter(|labeled| labeled.is_fraud).count();
    info!(
        count = batch.len(),
        fraud = fraud_count,
        "Batch loaded"
    );

    // Batch statistics feed every downstream component
    let transactions: Vec<Transaction> = batch
        .iter()
        .map(|labeled| labeled.transaction.clone())
        .collect();
    let stats = FeatureStatistics::from_batch(&transactions)?;
    info!(
        features = stats.feature_count(),
        amount_mean = stats.amount.mean,
        amount_std_dev = stats.amount.std_dev,
        "Batch statistics computed"
    );

    // Detection methods over this batch's statistics
    let amount = AmountDeviation::new(&stats);
    let multi = MultiFeatureZScore::new(&stats, config.scoring.feature_subset.clone())?;
    let single = SingleFeaturePattern::new(&stats, config.scoring.designated_feature)?;
    let methods: Vec<&dyn DetectionMethod> = vec![&amount, &multi, &single];

    // Calibrate each method and collect its operating threshold
    let mut calibrated: Vec<(&dyn DetectionMethod, f64)> = Vec::with_capacity(methods.len());
    for method in methods {
        let result =
            ThresholdCalibrator::new(method).sweep(&batch, &config.calibration.candidates)?;
        match result.best() {
            Some(best) => {
                info!(
                    method = method.name(),
                    threshold = best.threshold,
                    flagged = best.flagged,
                    precision = best.precision.unwrap_or(f64::NAN),
                    recall = best.recall,
                    "Calibrated"
                );
                calibrated.push((method, best.threshold));
            }
            None => {
                warn!(
                    method = method.name(),
                    fallback = config.classifier.monitor_threshold,
                    "No candidate flagged anything; falling back to monitor threshold"
                );
                calibrated.push((method, config.classifier.monitor_threshold));
            }
        }
    }

    // Side-by-side comparison at the calibrated thresholds
    let reports = MethodComparator::compare(&calibrated, &batch)?;
    info!("Method comparison:");
    for report in &reports {
        info!(
            method = %report.method,
            threshold = report.threshold,
            flagged = report.flagged,
            true_positives = report.true_positives,
            false_positives = report.false_positives,
            precision = report.precision.unwrap_or(f64::NAN),
            recall = report.recall,
            "  evaluated"
        );
    }

    // Operational scoring: single-feature score through the decision list
    let scorer = AnomalyScorer::new(
        &stats,
        ScoringMode::SingleFeature {
            feature: config.scoring.designated_feature,
        },
    )?;
    let scored = scorer.score_batch(&transactions);
    let classifier = Classifier::new(&config.classifier)?;
    let tiers = classifier.classify_batch(&scored);

    let alerts: Vec<_> = scored
        .iter()
        .filter_map(|s| classifier.alert_for(s))
        .collect();
    info!(alerts = alerts.len(), "Classification complete");

    let report = BatchReport::build(&scored, &tiers);
    report.log_summary();

    Ok(())
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        format!("fraud_risk_scoring={}", config.logging.level).parse()?,
    );

    if config.logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    Ok(())
}
