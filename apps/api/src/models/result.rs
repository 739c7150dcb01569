use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ScoringError;
use crate::extraction::DeterministicFacts;
use crate::round_to;

/// One named, weighted contributor to a final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub name: String,
    pub value: f64,
    pub weight: f64,
}

impl ComponentScore {
    pub fn new(name: impl Into<String>, value: f64, weight: f64) -> Self {
        Self {
            name: name.into(),
            value,
            weight,
        }
    }

    pub fn contribution(&self) -> f64 {
        self.value * self.weight
    }
}

/// Audit row for one component: `contribution == score × weight`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentContribution {
    pub score: f64,
    pub weight: f64,
    pub contribution: f64,
}

impl From<&ComponentScore> for ComponentContribution {
    fn from(component: &ComponentScore) -> Self {
        Self {
            score: component.value,
            weight: component.weight,
            contribution: component.contribution(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// final ≥ 0.7
    Strong,
    /// 0.4 ≤ final < 0.7
    Partial,
    Weak,
}

impl MatchTier {
    pub const STRONG_THRESHOLD: f64 = 0.7;
    pub const PARTIAL_THRESHOLD: f64 = 0.4;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::STRONG_THRESHOLD {
            MatchTier::Strong
        } else if score >= Self::PARTIAL_THRESHOLD {
            MatchTier::Partial
        } else {
            MatchTier::Weak
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchTier::Strong => "strong",
            MatchTier::Partial => "partial",
            MatchTier::Weak => "weak",
        })
    }
}

/// A reviewer's replacement score, kept next to the machine score it replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanOverride {
    pub score: f64,
    pub reason: String,
    pub original_score: f64,
}

/// Canonical per-candidate output of one evaluation run.
///
/// Fields are private: a result is built once and only ever replaced
/// wholesale (see [`EvaluationResult::with_override`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(rename = "id", alias = "candidate_id")]
    candidate_id: String,
    final_score: f64,
    engine: String,
    match_tier: MatchTier,
    components: BTreeMap<String, ComponentContribution>,
    #[serde(default)]
    breakdown: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    facts: Option<DeterministicFacts>,
    #[serde(default)]
    explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    human_override: Option<HumanOverride>,
}

impl EvaluationResult {
    pub fn new(
        candidate_id: impl Into<String>,
        engine: impl Into<String>,
        final_score: f64,
        components: BTreeMap<String, ComponentContribution>,
        breakdown: BTreeMap<String, f64>,
        facts: Option<DeterministicFacts>,
        explanation: String,
    ) -> Self {
        let final_score = round_to(final_score, 3);
        Self {
            candidate_id: candidate_id.into(),
            final_score,
            engine: engine.into(),
            match_tier: MatchTier::from_score(final_score),
            components,
            breakdown,
            facts,
            explanation,
            human_override: None,
        }
    }

    pub fn candidate_id(&self) -> &str {
        &self.candidate_id
    }

    pub fn final_score(&self) -> f64 {
        self.final_score
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn match_tier(&self) -> MatchTier {
        self.match_tier
    }

    pub fn components(&self) -> &BTreeMap<String, ComponentContribution> {
        &self.components
    }

    pub fn breakdown(&self) -> &BTreeMap<String, f64> {
        &self.breakdown
    }

    pub fn facts(&self) -> Option<&DeterministicFacts> {
        self.facts.as_ref()
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn human_override(&self) -> Option<&HumanOverride> {
        self.human_override.as_ref()
    }

    /// Returns a copy whose final score is the reviewer's. Re-overriding keeps
    /// the first machine score as `original_score`.
    pub fn with_override(&self, score: f64, reason: impl Into<String>) -> Result<Self, ScoringError> {
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(ScoringError::malformed(format!(
                "override score {score} for '{}' is outside [0, 1]",
                self.candidate_id
            )));
        }

        let original_score = self
            .human_override
            .as_ref()
            .map_or(self.final_score, |o| o.original_score);
        let score = round_to(score, 3);

        Ok(Self {
            final_score: score,
            match_tier: MatchTier::from_score(score),
            human_override: Some(HumanOverride {
                score,
                reason: reason.into(),
                original_score,
            }),
            ..self.clone()
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Producer records
// ────────────────────────────────────────────────────────────────────────────

/// Wire shape of a scored record before key normalization.
#[derive(Deserialize)]
pub struct RawScoredRecord {
    #[serde(alias = "candidate_id")]
    id: String,
    final_score: Option<f64>,
    score: Option<f64>,
}

/// Minimal `{id, final_score}` pair produced by any engine.
///
/// Accepts `id|candidate_id` and `final_score|score`; a record with neither
/// score key is rejected instead of defaulting to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScoredRecord")]
pub struct ScoredRecord {
    pub id: String,
    pub final_score: f64,
}

impl TryFrom<RawScoredRecord> for ScoredRecord {
    type Error = ScoringError;

    fn try_from(raw: RawScoredRecord) -> Result<Self, Self::Error> {
        let final_score = raw.final_score.or(raw.score).ok_or_else(|| {
            ScoringError::malformed(format!("scored record '{}' has no final_score or score", raw.id))
        })?;
        if !final_score.is_finite() {
            return Err(ScoringError::malformed(format!(
                "scored record '{}' has a non-finite score",
                raw.id
            )));
        }
        Ok(Self {
            id: raw.id,
            final_score,
        })
    }
}

impl From<&EvaluationResult> for ScoredRecord {
    fn from(result: &EvaluationResult) -> Self {
        Self {
            id: result.candidate_id.clone(),
            final_score: result.final_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> EvaluationResult {
        let components = BTreeMap::from([
            (
                "deterministic".to_string(),
                ComponentContribution::from(&ComponentScore::new("deterministic", 0.8, 0.6)),
            ),
            (
                "semantic".to_string(),
                ComponentContribution::from(&ComponentScore::new("semantic", 0.4, 0.4)),
            ),
        ]);
        EvaluationResult::new(
            "resume_001",
            "embedding_rules",
            0.64000000001,
            components,
            BTreeMap::new(),
            None,
            String::new(),
        )
    }

    #[test]
    fn test_match_tier_thresholds() {
        assert_eq!(MatchTier::from_score(0.7), MatchTier::Strong);
        assert_eq!(MatchTier::from_score(0.69), MatchTier::Partial);
        assert_eq!(MatchTier::from_score(0.4), MatchTier::Partial);
        assert_eq!(MatchTier::from_score(0.39), MatchTier::Weak);
    }

    #[test]
    fn test_new_rounds_final_score() {
        let result = sample();
        assert_eq!(result.final_score(), 0.64);
        assert_eq!(result.match_tier(), MatchTier::Partial);
        assert!((result.components()["deterministic"].contribution - 0.48).abs() < 1e-12);
    }

    #[test]
    fn test_serialized_shape_uses_id_and_component_map() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["id"], "resume_001");
        assert_eq!(value["final_score"], 0.64);
        assert_eq!(value["components"]["semantic"]["weight"], 0.4);
        assert!(value.get("human_override").is_none());

        let back: EvaluationResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_with_override_leaves_original_untouched() {
        let original = sample();
        let overridden = original.with_override(0.9, "unique domain experience").unwrap();

        assert_eq!(original.final_score(), 0.64);
        assert!(original.human_override().is_none());

        assert_eq!(overridden.final_score(), 0.9);
        assert_eq!(overridden.match_tier(), MatchTier::Strong);
        let hitl = overridden.human_override().unwrap();
        assert_eq!(hitl.original_score, 0.64);
        assert_eq!(hitl.reason, "unique domain experience");
        assert_eq!(overridden.components(), original.components());

        let twice = overridden.with_override(0.1, "second look").unwrap();
        assert_eq!(twice.human_override().unwrap().original_score, 0.64);
    }

    #[test]
    fn test_with_override_rejects_out_of_range() {
        assert!(matches!(
            sample().with_override(1.2, "too generous"),
            Err(ScoringError::MalformedInput(_))
        ));
        assert!(sample().with_override(f64::NAN, "nan").is_err());
    }

    #[test]
    fn test_scored_record_normalizes_producer_keys() {
        let a: ScoredRecord =
            serde_json::from_value(json!({"candidate_id": "r1", "score": 0.5})).unwrap();
        let b: ScoredRecord =
            serde_json::from_value(json!({"id": "r1", "final_score": 0.5})).unwrap();
        assert_eq!(a, b);

        let both: ScoredRecord =
            serde_json::from_value(json!({"id": "r1", "final_score": 0.7, "score": 0.1})).unwrap();
        assert_eq!(both.final_score, 0.7);
    }

    #[test]
    fn test_scored_record_without_score_is_rejected() {
        let result: Result<ScoredRecord, _> = serde_json::from_value(json!({"id": "r1"}));
        assert!(result.is_err());
    }
}
