//! Evaluation orchestrator — runs every candidate through extraction and the
//! selected engine, ranks the results, and scores the ranking against labels.
//!
//! The output order depends only on final scores: results are collected first,
//! then stably sorted.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregation::explain::build_explanation;
use crate::aggregation::{EngineKind, ScoreAggregator, Signal, Signals};
use crate::errors::ScoringError;
use crate::extraction::scoring::DeterministicProfile;
use crate::extraction::FeatureExtractor;
use crate::metrics::{compute_metrics_for_records, MetricsReport, RelevanceThreshold};
use crate::models::candidate::{CandidateText, GroundTruth};
use crate::models::result::{EvaluationResult, ScoredRecord};

/// Externally produced signals, keyed by candidate id.
pub type SignalTable = BTreeMap<String, Signals>;

/// Orders results by final score, highest first. Ties keep their current order.
pub fn rank_results(results: &mut [EvaluationResult]) {
    results.sort_by(|a, b| b.final_score().total_cmp(&a.final_score()));
}

/// One engine bound to an extractor and deterministic profile.
pub struct Evaluator<'a> {
    extractor: &'a FeatureExtractor,
    engine: EngineKind,
    aggregator: &'a ScoreAggregator,
    profile: DeterministicProfile,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        extractor: &'a FeatureExtractor,
        engine: EngineKind,
        aggregator: &'a ScoreAggregator,
        profile: DeterministicProfile,
    ) -> Self {
        Self {
            extractor,
            engine,
            aggregator,
            profile,
        }
    }

    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    pub fn profile(&self) -> DeterministicProfile {
        self.profile
    }

    pub fn evaluate_candidate(
        &self,
        candidate: &CandidateText,
        signals: &Signals,
    ) -> Result<EvaluationResult, ScoringError> {
        let facts = self.extractor.extract(candidate);
        let deterministic = self.extractor.score(&facts, self.profile);

        let mut merged = signals.clone();
        if let Some(supplied) = merged.insert(Signal::Deterministic, deterministic.score) {
            if supplied != deterministic.score {
                warn!(
                    "Ignoring supplied deterministic score {supplied} for '{}'; computed {}",
                    candidate.id, deterministic.score
                );
            }
        }

        let aggregate = self.aggregator.aggregate(&merged).map_err(|e| match e {
            ScoringError::MalformedInput(msg) => {
                ScoringError::malformed(format!("candidate '{}': {msg}", candidate.id))
            }
            other => other,
        })?;

        debug!(
            candidate = %candidate.id,
            engine = %self.engine,
            final_score = aggregate.final_score,
            "Candidate scored"
        );

        let explanation = build_explanation(aggregate.final_score, &aggregate.contributions, Some(&facts));

        Ok(EvaluationResult::new(
            candidate.id.clone(),
            self.engine.name(),
            aggregate.final_score,
            aggregate.contributions,
            deterministic.breakdown,
            Some(facts),
            explanation,
        ))
    }

    /// Scores every candidate and returns them ranked. Duplicate ids are rejected.
    pub fn rank(
        &self,
        candidates: &[CandidateText],
        signals: &SignalTable,
    ) -> Result<Vec<EvaluationResult>, ScoringError> {
        let mut seen = BTreeSet::new();
        for candidate in candidates {
            if !seen.insert(candidate.id.as_str()) {
                return Err(ScoringError::malformed(format!(
                    "duplicate candidate id '{}'",
                    candidate.id
                )));
            }
        }
        for id in signals.keys().filter(|id| !seen.contains(id.as_str())) {
            warn!("Signals supplied for unknown candidate '{id}'");
        }

        let empty = Signals::new();
        let mut results = candidates
            .iter()
            .map(|candidate| {
                let candidate_signals = signals.get(&candidate.id).unwrap_or(&empty);
                self.evaluate_candidate(candidate, candidate_signals)
            })
            .collect::<Result<Vec<_>, _>>()?;

        rank_results(&mut results);
        Ok(results)
    }
}

/// Everything one evaluation produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRun {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub engine: EngineKind,
    pub deterministic_profile: DeterministicProfile,
    pub weights: BTreeMap<Signal, f64>,
    pub results: Vec<EvaluationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsReport>,
}

pub fn run_evaluation(
    evaluator: &Evaluator<'_>,
    candidates: &[CandidateText],
    signals: &SignalTable,
    ground_truth: Option<&GroundTruth>,
    k: usize,
    threshold: RelevanceThreshold,
) -> Result<EvaluationRun, ScoringError> {
    info!(
        "Evaluating {} candidates with engine '{}' ({} profile)",
        candidates.len(),
        evaluator.engine(),
        evaluator.profile()
    );

    let results = evaluator.rank(candidates, signals)?;

    let metrics = match ground_truth {
        Some(gt) => {
            let records: Vec<ScoredRecord> = results.iter().map(ScoredRecord::from).collect();
            let report = compute_metrics_for_records(&records, gt, k, threshold)?;
            info!(
                "nDCG@{k}={:.3} P@{k}={:.3} R@{k}={:.3} pairwise={:.3}",
                report.ndcg_at_k, report.precision_at_k, report.recall_at_k, report.pairwise_acc
            );
            Some(report)
        }
        None => None,
    };

    Ok(EvaluationRun {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        engine: evaluator.engine(),
        deterministic_profile: evaluator.profile(),
        weights: evaluator.aggregator.weights().clone(),
        results,
        metrics,
    })
}
