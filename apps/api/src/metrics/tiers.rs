use serde::{Deserialize, Serialize};

use crate::errors::ScoringError;
use crate::metrics::check_lengths;

const TIER_EPSILON: f64 = 1e-9;

/// Mean predicted score per ground-truth tier. A tier with no members has no mean.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TierSeparation {
    pub good_mean: Option<f64>,
    pub partial_mean: Option<f64>,
    pub poor_mean: Option<f64>,
    /// `good > partial > poor`; false if any tier is empty.
    pub separated: bool,
}

fn mean_for_tier(predicted: &[f64], ground_truth: &[f64], tier: f64) -> Option<f64> {
    let members: Vec<f64> = predicted
        .iter()
        .zip(ground_truth)
        .filter(|(_, label)| (**label - tier).abs() < TIER_EPSILON)
        .map(|(&score, _)| score)
        .collect();

    if members.is_empty() {
        None
    } else {
        Some(members.iter().sum::<f64>() / members.len() as f64)
    }
}

/// Labels off the 0.0 / 0.5 / 1.0 tiers belong to no tier and are ignored.
pub fn tier_separation(predicted: &[f64], ground_truth: &[f64]) -> Result<TierSeparation, ScoringError> {
    check_lengths(predicted, ground_truth)?;

    let good_mean = mean_for_tier(predicted, ground_truth, 1.0);
    let partial_mean = mean_for_tier(predicted, ground_truth, 0.5);
    let poor_mean = mean_for_tier(predicted, ground_truth, 0.0);

    let separated = match (good_mean, partial_mean, poor_mean) {
        (Some(good), Some(partial), Some(poor)) => good > partial && partial > poor,
        _ => false,
    };

    Ok(TierSeparation {
        good_mean,
        partial_mean,
        poor_mean,
        separated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_separated_tiers() {
        let result = tier_separation(
            &[0.9, 0.8, 0.55, 0.5, 0.2, 0.1],
            &[1.0, 1.0, 0.5, 0.5, 0.0, 0.0],
        )
        .unwrap();
        assert!(result.separated);
        assert!((result.good_mean.unwrap() - 0.85).abs() < 1e-9);
        assert!((result.partial_mean.unwrap() - 0.525).abs() < 1e-9);
        assert!((result.poor_mean.unwrap() - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_inverted_tiers_not_separated() {
        let result = tier_separation(&[0.9, 0.6, 0.3], &[1.0, 0.0, 0.5]).unwrap();
        assert!(!result.separated);
        assert_eq!(result.poor_mean, Some(0.6));
    }

    #[test]
    fn test_missing_tier_is_not_separated() {
        let result = tier_separation(&[0.9, 0.1], &[1.0, 0.0]).unwrap();
        assert_eq!(result.partial_mean, None);
        assert!(!result.separated);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tier_separation(&[], &[]).unwrap(), TierSeparation::default());
    }
}
