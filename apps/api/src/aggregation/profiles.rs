//! Named engine configurations. Each engine is a fixed weight table over
//! signals; none is "the" formula, and every one stays selectable by name.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregation::aggregator::ScoreAggregator;
use crate::aggregation::signal::Signal;
use crate::errors::ScoringError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Rule-based facts with a light semantic blend.
    #[default]
    Deterministic,
    EmbeddingRules,
    LlmSemantic,
    /// LLM judgment conditioned on verified facts.
    SequentialHybrid,
    ParallelEnsemble,
    /// Parse-then-score LLM pipeline over three dimensions.
    TwoStage,
    /// Two-stage with the experience weight cut after review.
    TwoStageAudited,
    LlmOnly,
}

impl EngineKind {
    pub const ALL: [EngineKind; 8] = [
        EngineKind::Deterministic,
        EngineKind::EmbeddingRules,
        EngineKind::LlmSemantic,
        EngineKind::SequentialHybrid,
        EngineKind::ParallelEnsemble,
        EngineKind::TwoStage,
        EngineKind::TwoStageAudited,
        EngineKind::LlmOnly,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EngineKind::Deterministic => "deterministic",
            EngineKind::EmbeddingRules => "embedding_rules",
            EngineKind::LlmSemantic => "llm_semantic",
            EngineKind::SequentialHybrid => "sequential_hybrid",
            EngineKind::ParallelEnsemble => "parallel_ensemble",
            EngineKind::TwoStage => "two_stage",
            EngineKind::TwoStageAudited => "two_stage_audited",
            EngineKind::LlmOnly => "llm_only",
        }
    }

    pub fn default_weights(self) -> BTreeMap<Signal, f64> {
        let table: &[(Signal, f64)] = match self {
            EngineKind::Deterministic => &[(Signal::Deterministic, 0.70), (Signal::Semantic, 0.30)],
            EngineKind::EmbeddingRules => &[(Signal::Semantic, 0.60), (Signal::Deterministic, 0.40)],
            EngineKind::LlmSemantic => &[(Signal::Llm, 0.70), (Signal::Semantic, 0.30)],
            EngineKind::SequentialHybrid => &[(Signal::Llm, 0.60), (Signal::Deterministic, 0.40)],
            EngineKind::ParallelEnsemble => &[
                (Signal::Semantic, 0.35),
                (Signal::Deterministic, 0.25),
                (Signal::Llm, 0.40),
            ],
            EngineKind::TwoStage => &[
                (Signal::SkillMatch, 0.50),
                (Signal::ExperienceDepth, 0.30),
                (Signal::DomainFit, 0.20),
            ],
            EngineKind::TwoStageAudited => &[
                (Signal::SkillMatch, 0.55),
                (Signal::DomainFit, 0.30),
                (Signal::ExperienceDepth, 0.15),
            ],
            EngineKind::LlmOnly => &[(Signal::Llm, 1.0)],
        };
        table.iter().copied().collect()
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineKind::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| format!("unknown engine '{s}'"))
    }
}

/// One live [`ScoreAggregator`] per engine. Weights can be swapped at runtime
/// without rebuilding the registry.
#[derive(Debug, Clone)]
pub struct EngineRegistry {
    aggregators: BTreeMap<EngineKind, ScoreAggregator>,
}

impl EngineRegistry {
    pub fn get(&self, engine: EngineKind) -> Option<&ScoreAggregator> {
        self.aggregators.get(&engine)
    }

    pub fn update_weights(
        &mut self,
        engine: EngineKind,
        weights: BTreeMap<Signal, f64>,
    ) -> Result<&ScoreAggregator, ScoringError> {
        let aggregator = self
            .aggregators
            .entry(engine)
            .or_insert_with(|| ScoreAggregator::from_trusted(engine.default_weights()));
        aggregator.update_weights(weights)?;
        Ok(aggregator)
    }

    pub fn reset(&mut self, engine: EngineKind) {
        self.aggregators
            .insert(engine, ScoreAggregator::from_trusted(engine.default_weights()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (EngineKind, &ScoreAggregator)> {
        self.aggregators.iter().map(|(&kind, agg)| (kind, agg))
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self {
            aggregators: EngineKind::ALL
                .into_iter()
                .map(|kind| (kind, ScoreAggregator::from_trusted(kind.default_weights())))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::aggregator::validate_weights;
    use crate::aggregation::signal::Signals;

    #[test]
    fn test_every_engine_table_is_valid() {
        for engine in EngineKind::ALL {
            let weights = engine.default_weights();
            assert!(
                validate_weights(weights.values().copied()).is_ok(),
                "{engine} weights do not sum to 1"
            );
            assert!(ScoreAggregator::new(weights).is_ok());
        }
    }

    #[test]
    fn test_engine_names_round_trip() {
        for engine in EngineKind::ALL {
            assert_eq!(engine.name().parse::<EngineKind>().unwrap(), engine);
            assert_eq!(
                serde_json::to_value(engine).unwrap(),
                serde_json::json!(engine.name())
            );
        }
        assert!("hybrid".parse::<EngineKind>().is_err());
    }

    #[test]
    fn test_documented_weight_tables() {
        let ensemble = EngineKind::ParallelEnsemble.default_weights();
        assert_eq!(ensemble[&Signal::Semantic], 0.35);
        assert_eq!(ensemble[&Signal::Deterministic], 0.25);
        assert_eq!(ensemble[&Signal::Llm], 0.40);

        let audited = EngineKind::TwoStageAudited.default_weights();
        assert_eq!(audited[&Signal::ExperienceDepth], 0.15);
        assert_eq!(EngineKind::LlmOnly.default_weights().len(), 1);
    }

    #[test]
    fn test_uniform_signals_score_identically_across_engines() {
        let signals: Signals = Signal::ALL.into_iter().map(|s| (s, 0.6)).collect();
        let registry = EngineRegistry::default();
        for (engine, aggregator) in registry.iter() {
            let result = aggregator.aggregate(&signals).unwrap();
            assert!((result.final_score - 0.6).abs() < 1e-9, "{engine}");
        }
    }

    #[test]
    fn test_registry_update_and_reset() {
        let mut registry = EngineRegistry::default();
        registry
            .update_weights(
                EngineKind::TwoStage,
                BTreeMap::from([
                    (Signal::SkillMatch, 0.55),
                    (Signal::DomainFit, 0.30),
                    (Signal::ExperienceDepth, 0.15),
                ]),
            )
            .unwrap();
        assert_eq!(
            registry.get(EngineKind::TwoStage).unwrap().weights(),
            &EngineKind::TwoStageAudited.default_weights()
        );

        assert!(registry
            .update_weights(EngineKind::TwoStage, BTreeMap::from([(Signal::SkillMatch, 0.2)]))
            .is_err());

        registry.reset(EngineKind::TwoStage);
        assert_eq!(
            registry.get(EngineKind::TwoStage).unwrap().weights(),
            &EngineKind::TwoStage.default_weights()
        );
    }
}
