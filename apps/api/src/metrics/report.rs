use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::ScoringError;
use crate::metrics::correlation::{kendall_tau, mean_absolute_error, spearman};
use crate::metrics::ranking::{ndcg_at_k, pairwise_accuracy, precision_at_k, recall_at_k};
use crate::metrics::tiers::{tier_separation, TierSeparation};
use crate::metrics::{check_lengths, RelevanceThreshold};
use crate::models::candidate::GroundTruth;
use crate::models::result::ScoredRecord;

/// Every ranking metric for one evaluation, plus the parameters used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub ndcg_at_k: f64,
    pub precision_at_k: f64,
    pub recall_at_k: f64,
    pub kendall_tau: f64,
    pub spearman_r: f64,
    pub mae: f64,
    pub pairwise_acc: f64,
    pub tier_separation: TierSeparation,
    pub k: usize,
    pub relevance_threshold: RelevanceThreshold,
    /// Candidates that had a ground-truth label.
    pub evaluated: usize,
}

pub fn compute_metrics(
    predicted: &[f64],
    ground_truth: &[f64],
    k: usize,
    threshold: RelevanceThreshold,
) -> Result<MetricsReport, ScoringError> {
    check_lengths(predicted, ground_truth)?;

    Ok(MetricsReport {
        ndcg_at_k: ndcg_at_k(predicted, ground_truth, k)?,
        precision_at_k: precision_at_k(predicted, ground_truth, k, threshold)?,
        recall_at_k: recall_at_k(predicted, ground_truth, k, threshold)?,
        kendall_tau: kendall_tau(predicted, ground_truth)?,
        spearman_r: spearman(predicted, ground_truth)?,
        mae: mean_absolute_error(predicted, ground_truth)?,
        pairwise_acc: pairwise_accuracy(predicted, ground_truth)?,
        tier_separation: tier_separation(predicted, ground_truth)?,
        k,
        relevance_threshold: threshold,
        evaluated: predicted.len(),
    })
}

/// Joins scored records with their labels, in record order, then computes metrics.
///
/// Records without a label are logged and left out.
pub fn compute_metrics_for_records(
    records: &[ScoredRecord],
    ground_truth: &GroundTruth,
    k: usize,
    threshold: RelevanceThreshold,
) -> Result<MetricsReport, ScoringError> {
    let mut predicted = Vec::with_capacity(records.len());
    let mut labels = Vec::with_capacity(records.len());

    for record in records {
        match ground_truth.get(&record.id) {
            Some(label) => {
                predicted.push(record.final_score);
                labels.push(label);
            }
            None => warn!("No ground-truth label for '{}'; skipped for metrics", record.id),
        }
    }

    compute_metrics(&predicted, &labels, k, threshold)
}
