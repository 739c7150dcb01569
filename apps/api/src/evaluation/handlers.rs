use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::aggregation::{deserialize_signal_table, EngineKind, Signal, SignalMap};
use crate::errors::{AppError, AppJson};
use crate::evaluation::orchestrator::{run_evaluation, EvaluationRun, Evaluator, SignalTable};
use crate::extraction::scoring::{DeterministicProfile, DeterministicScore, DeterministicWeights};
use crate::extraction::DeterministicFacts;
use crate::metrics::{compute_metrics_for_records, MetricsReport, RelevanceThreshold};
use crate::models::candidate::{CandidateText, GroundTruth};
use crate::models::result::ScoredRecord;
use crate::state::AppState;

#[derive(Serialize)]
pub struct EngineProfile {
    pub name: EngineKind,
    pub weights: BTreeMap<Signal, f64>,
}

#[derive(Serialize)]
pub struct DeterministicProfileView {
    pub name: DeterministicProfile,
    pub weights: DeterministicWeights,
}

#[derive(Serialize)]
pub struct ProfilesResponse {
    pub engines: Vec<EngineProfile>,
    pub deterministic_profiles: Vec<DeterministicProfileView>,
    pub default_engine: EngineKind,
    pub default_deterministic_profile: DeterministicProfile,
}

/// GET /api/v1/profiles
pub async fn handle_list_profiles(State(state): State<AppState>) -> Json<ProfilesResponse> {
    let engines = state.engines.read().await;
    Json(ProfilesResponse {
        engines: engines
            .iter()
            .map(|(name, aggregator)| EngineProfile {
                name,
                weights: aggregator.weights().clone(),
            })
            .collect(),
        deterministic_profiles: DeterministicProfile::ALL
            .into_iter()
            .map(|name| DeterministicProfileView {
                name,
                weights: name.weights(),
            })
            .collect(),
        default_engine: state.config.engine,
        default_deterministic_profile: state.config.deterministic_profile,
    })
}

fn parse_engine(raw: &str) -> Result<EngineKind, AppError> {
    raw.parse::<EngineKind>().map_err(AppError::NotFound)
}

/// PUT /api/v1/profiles/:engine/weights
pub async fn handle_update_weights(
    State(state): State<AppState>,
    Path(engine): Path<String>,
    AppJson(weights): AppJson<SignalMap>,
) -> Result<Json<EngineProfile>, AppError> {
    let engine = parse_engine(&engine)?;
    let mut engines = state.engines.write().await;
    let aggregator = engines.update_weights(engine, weights.into_inner())?;
    tracing::info!("Weights for engine '{engine}' updated");
    Ok(Json(EngineProfile {
        name: engine,
        weights: aggregator.weights().clone(),
    }))
}

#[derive(Deserialize)]
pub struct ExtractRequest {
    #[serde(alias = "candidate_id")]
    pub id: String,
    #[serde(alias = "raw_text")]
    pub text: String,
    pub deterministic_profile: Option<DeterministicProfile>,
}

#[derive(Serialize)]
pub struct ExtractResponse {
    pub id: String,
    pub facts: DeterministicFacts,
    pub deterministic: DeterministicScore,
}

/// POST /api/v1/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    AppJson(req): AppJson<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    if req.id.trim().is_empty() {
        return Err(AppError::Validation("id must not be empty".to_string()));
    }
    let profile = req
        .deterministic_profile
        .unwrap_or(state.config.deterministic_profile);
    let candidate = CandidateText::new(req.id, req.text);
    let facts = state.extractor.extract(&candidate);
    let deterministic = state.extractor.score(&facts, profile);
    Ok(Json(ExtractResponse {
        id: candidate.id,
        facts,
        deterministic,
    }))
}

#[derive(Deserialize)]
pub struct EvaluationRequest {
    pub candidates: Vec<CandidateText>,
    #[serde(default, deserialize_with = "deserialize_signal_table")]
    pub signals: SignalTable,
    pub engine: Option<EngineKind>,
    pub deterministic_profile: Option<DeterministicProfile>,
    pub ground_truth: Option<GroundTruth>,
    pub k: Option<usize>,
    pub relevance_threshold: Option<RelevanceThreshold>,
}

/// POST /api/v1/evaluations
pub async fn handle_create_evaluation(
    State(state): State<AppState>,
    AppJson(req): AppJson<EvaluationRequest>,
) -> Result<Json<EvaluationRun>, AppError> {
    let engine = req.engine.unwrap_or(state.config.engine);
    let profile = req
        .deterministic_profile
        .unwrap_or(state.config.deterministic_profile);

    let engines = state.engines.read().await;
    let aggregator = engines
        .get(engine)
        .ok_or_else(|| AppError::NotFound(format!("Engine '{engine}' not configured")))?;
    let evaluator = Evaluator::new(&state.extractor, engine, aggregator, profile);

    let run = run_evaluation(
        &evaluator,
        &req.candidates,
        &req.signals,
        req.ground_truth.as_ref(),
        req.k.unwrap_or(state.config.default_k),
        req.relevance_threshold
            .unwrap_or(state.config.relevance_threshold),
    )?;
    Ok(Json(run))
}

#[derive(Deserialize)]
pub struct MetricsRequest {
    pub results: Vec<ScoredRecord>,
    pub ground_truth: GroundTruth,
    pub k: Option<usize>,
    pub relevance_threshold: Option<RelevanceThreshold>,
}

/// POST /api/v1/metrics
pub async fn handle_compute_metrics(
    State(state): State<AppState>,
    AppJson(req): AppJson<MetricsRequest>,
) -> Result<Json<MetricsReport>, AppError> {
    if req.results.is_empty() && !req.ground_truth.is_empty() {
        tracing::warn!("Metrics requested with labels but no scored results");
    }
    let report = compute_metrics_for_records(
        &req.results,
        &req.ground_truth,
        req.k.unwrap_or(state.config.default_k),
        req.relevance_threshold
            .unwrap_or(state.config.relevance_threshold),
    )?;
    Ok(Json(report))
}
