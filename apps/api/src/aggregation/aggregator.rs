use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregation::signal::{Signal, Signals};
use crate::errors::{ScoringError, WEIGHT_SUM_TOLERANCE};
use crate::models::result::{ComponentContribution, ComponentScore};

/// Output of [`combine`]: the clamped final score plus one audit row per component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    pub final_score: f64,
    pub contributions: BTreeMap<String, ComponentContribution>,
}

/// Rejects negative or non-finite weights, then checks `|Σ w − 1| ≤ tolerance`.
/// Never rescales.
pub fn validate_weights<I>(weights: I) -> Result<f64, ScoringError>
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    for weight in weights {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ScoringError::malformed(format!(
                "weight {weight} must be a finite value ≥ 0"
            )));
        }
        sum += weight;
    }

    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ScoringError::InvalidWeights {
            sum,
            tolerance: WEIGHT_SUM_TOLERANCE,
        });
    }
    Ok(sum)
}

/// `final = clamp(Σ value × weight, 0, 1)`.
///
/// Weights are validated before anything is summed. Component values outside
/// [0, 1] are kept as-is in the audit rows but logged; only the final is clamped.
pub fn combine(components: &[ComponentScore]) -> Result<Aggregate, ScoringError> {
    validate_weights(components.iter().map(|c| c.weight))?;

    let mut contributions = BTreeMap::new();
    let mut total = 0.0;

    for component in components {
        if !component.value.is_finite() {
            return Err(ScoringError::malformed(format!(
                "component '{}' has a non-finite value",
                component.name
            )));
        }
        if !(0.0..=1.0).contains(&component.value) {
            warn!(
                "Component '{}' value {} is outside [0, 1]; final score will be clamped",
                component.name, component.value
            );
        }

        let row = ComponentContribution::from(component);
        if contributions.insert(component.name.clone(), row).is_some() {
            return Err(ScoringError::malformed(format!(
                "component '{}' appears more than once",
                component.name
            )));
        }
        total += row.contribution;
    }

    Ok(Aggregate {
        final_score: total.clamp(0.0, 1.0),
        contributions,
    })
}

/// Weighted combination over named signals, reconfigurable at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreAggregator {
    weights: BTreeMap<Signal, f64>,
}

impl ScoreAggregator {
    pub fn new(weights: BTreeMap<Signal, f64>) -> Result<Self, ScoringError> {
        validate_weights(weights.values().copied())?;
        Ok(Self { weights })
    }

    /// Skips validation; only for the built-in engine tables, which are tested to sum to 1.
    pub(crate) fn from_trusted(weights: BTreeMap<Signal, f64>) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &BTreeMap<Signal, f64> {
        &self.weights
    }

    pub fn required_signals(&self) -> impl Iterator<Item = Signal> + '_ {
        self.weights.keys().copied()
    }

    /// Same contract as [`ScoreAggregator::new`]. On error the previous weights stay in place.
    pub fn update_weights(&mut self, weights: BTreeMap<Signal, f64>) -> Result<(), ScoringError> {
        validate_weights(weights.values().copied())?;
        debug!(?weights, "Aggregator weights updated");
        self.weights = weights;
        Ok(())
    }

    /// Pairs each configured weight with its signal value. A missing signal is an error.
    pub fn components(&self, signals: &Signals) -> Result<Vec<ComponentScore>, ScoringError> {
        self.weights
            .iter()
            .map(|(&signal, &weight)| {
                let value = signals.get(&signal).copied().ok_or_else(|| {
                    ScoringError::malformed(format!("missing required signal '{signal}'"))
                })?;
                Ok(ComponentScore::new(signal.name(), value, weight))
            })
            .collect()
    }

    pub fn aggregate(&self, signals: &Signals) -> Result<Aggregate, ScoringError> {
        combine(&self.components(signals)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(weights: &[f64]) -> Vec<ComponentScore> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &w)| ComponentScore::new(format!("c{i}"), 0.5, w))
            .collect()
    }

    #[test]
    fn test_combine_rejects_weights_summing_above_tolerance() {
        let err = combine(&components(&[0.5, 0.3, 0.3])).unwrap_err();
        match err {
            ScoringError::InvalidWeights { sum, .. } => assert!((sum - 1.1).abs() < 1e-9),
            other => panic!("expected InvalidWeights, got {other:?}"),
        }
    }

    #[test]
    fn test_combine_accepts_weights_summing_to_one() {
        let result = combine(&components(&[0.5, 0.3, 0.2])).unwrap();
        assert!((result.final_score - 0.5).abs() < 1e-9);
        assert_eq!(result.contributions.len(), 3);
    }

    #[test]
    fn test_combine_tolerance_boundary() {
        assert!(combine(&components(&[0.5, 0.3, 0.205])).is_ok());
        assert!(combine(&components(&[0.5, 0.3, 0.22])).is_err());
    }

    #[test]
    fn test_combine_two_component_weighted_sum() {
        let result = combine(&[
            ComponentScore::new("deterministic", 0.8, 0.6),
            ComponentScore::new("semantic", 0.4, 0.4),
        ])
        .unwrap();
        assert!((result.final_score - 0.64).abs() < 1e-9);
        assert!((result.contributions["deterministic"].contribution - 0.48).abs() < 1e-9);
        assert!((result.contributions["semantic"].contribution - 0.16).abs() < 1e-9);
    }

    #[test]
    fn test_combine_empty_is_invalid_weights() {
        assert!(matches!(
            combine(&[]),
            Err(ScoringError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn test_combine_clamps_out_of_range_final() {
        let result = combine(&[
            ComponentScore::new("llm", 1.5, 0.5),
            ComponentScore::new("semantic", 1.0, 0.5),
        ])
        .unwrap();
        assert_eq!(result.final_score, 1.0);
        // audit rows keep the raw input
        assert_eq!(result.contributions["llm"].score, 1.5);

        let low = combine(&[ComponentScore::new("llm", -0.4, 1.0)]).unwrap();
        assert_eq!(low.final_score, 0.0);
    }

    #[test]
    fn test_combine_rejects_negative_or_nan_inputs() {
        assert!(matches!(
            combine(&[
                ComponentScore::new("a", 0.5, 1.2),
                ComponentScore::new("b", 0.5, -0.2),
            ]),
            Err(ScoringError::MalformedInput(_))
        ));
        assert!(matches!(
            combine(&[ComponentScore::new("a", f64::NAN, 1.0)]),
            Err(ScoringError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_combine_rejects_duplicate_names() {
        let err = combine(&[
            ComponentScore::new("llm", 0.5, 0.5),
            ComponentScore::new("llm", 0.7, 0.5),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_combine_is_deterministic() {
        let input = [
            ComponentScore::new("semantic", 0.33, 0.35),
            ComponentScore::new("deterministic", 0.71, 0.25),
            ComponentScore::new("llm", 0.9, 0.40),
        ];
        assert_eq!(combine(&input).unwrap(), combine(&input).unwrap());
    }

    #[test]
    fn test_update_weights_validates_and_keeps_previous_on_error() {
        let mut aggregator = ScoreAggregator::new(BTreeMap::from([
            (Signal::Deterministic, 0.7),
            (Signal::Semantic, 0.3),
        ]))
        .unwrap();

        let err = aggregator
            .update_weights(BTreeMap::from([(Signal::Llm, 0.5), (Signal::Semantic, 0.3)]))
            .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidWeights { .. }));
        assert_eq!(aggregator.weights()[&Signal::Deterministic], 0.7);

        aggregator
            .update_weights(BTreeMap::from([(Signal::Llm, 0.6), (Signal::Deterministic, 0.4)]))
            .unwrap();
        assert_eq!(
            aggregator.required_signals().collect::<Vec<_>>(),
            vec![Signal::Deterministic, Signal::Llm]
        );
    }

    #[test]
    fn test_new_rejects_invalid_weights() {
        assert!(ScoreAggregator::new(BTreeMap::from([(Signal::Llm, 0.9)])).is_err());
        assert!(ScoreAggregator::new(BTreeMap::new()).is_err());
    }

    #[test]
    fn test_aggregate_requires_every_configured_signal() {
        let aggregator = ScoreAggregator::new(BTreeMap::from([
            (Signal::Llm, 0.6),
            (Signal::Deterministic, 0.4),
        ]))
        .unwrap();

        let err = aggregator
            .aggregate(&Signals::from([(Signal::Deterministic, 0.5)]))
            .unwrap_err();
        assert!(err.to_string().contains("llm"));

        let ok = aggregator
            .aggregate(&Signals::from([
                (Signal::Deterministic, 0.5),
                (Signal::Llm, 1.0),
                (Signal::Semantic, 0.2),
            ]))
            .unwrap();
        assert!((ok.final_score - 0.8).abs() < 1e-9);
        assert!(!ok.contributions.contains_key("semantic"));
    }
}
