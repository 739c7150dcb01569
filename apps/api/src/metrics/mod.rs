//! Ranking-quality metrics over parallel `predicted` / `ground_truth` arrays.
//!
//! Everything here is pure. Empty input yields 0.0 (or `false`) for every
//! metric; a length mismatch between the two arrays is `MalformedInput`.

pub mod correlation;
pub mod ranking;
pub mod report;
pub mod tiers;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ScoringError;

pub use correlation::{kendall_tau, mean_absolute_error, spearman};
pub use ranking::{ndcg_at_k, pairwise_accuracy, precision_at_k, recall_at_k};
pub use report::{compute_metrics, compute_metrics_for_records, MetricsReport};
pub use tiers::{tier_separation, TierSeparation};

/// Minimum ground-truth label counted as "relevant" for Precision/Recall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceThreshold {
    /// 0.7
    #[default]
    Lenient,
    /// 0.8
    Strict,
}

impl RelevanceThreshold {
    pub const ALL: [RelevanceThreshold; 2] = [RelevanceThreshold::Lenient, RelevanceThreshold::Strict];

    pub fn value(self) -> f64 {
        match self {
            RelevanceThreshold::Lenient => 0.7,
            RelevanceThreshold::Strict => 0.8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RelevanceThreshold::Lenient => "lenient",
            RelevanceThreshold::Strict => "strict",
        }
    }

    pub fn is_relevant(self, label: f64) -> bool {
        label >= self.value()
    }
}

impl fmt::Display for RelevanceThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RelevanceThreshold {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelevanceThreshold::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown relevance threshold '{s}' (expected lenient or strict)"))
    }
}

pub(crate) fn check_lengths(predicted: &[f64], ground_truth: &[f64]) -> Result<(), ScoringError> {
    if predicted.len() != ground_truth.len() {
        return Err(ScoringError::malformed(format!(
            "predicted has {} scores but ground truth has {} labels",
            predicted.len(),
            ground_truth.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_values() {
        assert_eq!(RelevanceThreshold::Lenient.value(), 0.7);
        assert_eq!(RelevanceThreshold::Strict.value(), 0.8);
        assert_eq!("strict".parse::<RelevanceThreshold>().unwrap(), RelevanceThreshold::Strict);
        assert!("loose".parse::<RelevanceThreshold>().is_err());
    }

    #[test]
    fn test_is_relevant_is_inclusive() {
        assert!(RelevanceThreshold::Lenient.is_relevant(0.7));
        assert!(!RelevanceThreshold::Strict.is_relevant(0.7));
        assert!(RelevanceThreshold::Strict.is_relevant(1.0));
        assert!(!RelevanceThreshold::Lenient.is_relevant(0.5));
    }

    #[test]
    fn test_check_lengths() {
        assert!(check_lengths(&[0.1], &[1.0]).is_ok());
        assert!(matches!(
            check_lengths(&[0.1, 0.2], &[1.0]),
            Err(ScoringError::MalformedInput(_))
        ));
    }
}
