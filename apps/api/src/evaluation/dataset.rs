//! Dataset I/O for batch runs: candidate text files, ground truth, signals,
//! and the per-run output folder.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::aggregation::deserialize_signal_table;
use crate::evaluation::orchestrator::{EvaluationRun, SignalTable};
use crate::models::candidate::{CandidateText, GroundTruth};

/// Every `*.txt` file in `dir`, id = file stem, sorted by id.
pub fn load_candidates(dir: &Path) -> Result<Vec<CandidateText>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read candidate directory {}", dir.display()))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let raw_text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read candidate file {}", path.display()))?;
        candidates.push(CandidateText::new(id, raw_text));
    }

    candidates.sort_by(|a, b| a.id.cmp(&b.id));
    info!("Loaded {} candidates from {}", candidates.len(), dir.display());
    Ok(candidates)
}

pub fn load_ground_truth(path: &Path) -> Result<GroundTruth> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ground truth {}", path.display()))?;
    let ground_truth: GroundTruth = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid ground truth in {}", path.display()))?;
    info!("Loaded {} ground-truth labels", ground_truth.len());
    Ok(ground_truth)
}

/// `{candidate_id: {signal: value}}`. A missing file means no external signals.
pub fn load_signals(path: &Path) -> Result<SignalTable> {
    if !path.exists() {
        return Ok(SignalTable::new());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read signals {}", path.display()))?;
    let mut de = serde_json::Deserializer::from_str(&raw);
    let table = deserialize_signal_table(&mut de)
        .and_then(|table| de.end().map(|()| table))
        .with_context(|| format!("Invalid signals in {}", path.display()))?;
    Ok(table)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))
}

/// Writes `results.json` (and `metrics.json` when labels were given) into
/// `runs_dir/run_<timestamp>_<run id prefix>/`, returning that folder.
pub fn write_run(runs_dir: &Path, run: &EvaluationRun) -> Result<PathBuf> {
    let run_id = run.run_id.simple().to_string();
    let folder = runs_dir.join(format!(
        "run_{}_{}",
        run.generated_at.format("%Y%m%d_%H%M%S"),
        &run_id[..8]
    ));
    fs::create_dir_all(&folder)
        .with_context(|| format!("Failed to create run folder {}", folder.display()))?;

    write_json(&folder.join("results.json"), &run.results)?;
    if let Some(metrics) = &run.metrics {
        write_json(&folder.join("metrics.json"), metrics)?;
    }
    write_json(
        &folder.join("run.json"),
        &serde_json::json!({
            "run_id": run.run_id,
            "generated_at": run.generated_at,
            "engine": run.engine,
            "deterministic_profile": run.deterministic_profile,
            "weights": run.weights,
            "candidates": run.results.len(),
        }),
    )?;

    info!("Run {} written to {}", run.run_id, folder.display());
    Ok(folder)
}
