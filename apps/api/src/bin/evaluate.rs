//! Batch evaluation: scores every candidate under `DATA_DIR/resumes`, compares
//! the ranking with `DATA_DIR/ground_truth.json`, and writes a run folder.
//!
//! External signals (semantic, LLM, two-stage dimensions) are read from
//! `DATA_DIR/signals.json` when present.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ranker_api::aggregation::EngineRegistry;
use ranker_api::config::Config;
use ranker_api::evaluation::dataset::{load_candidates, load_ground_truth, load_signals, write_run};
use ranker_api::evaluation::{run_evaluation, Evaluator};
use ranker_api::extraction::FeatureExtractor;

fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("ranker_api={0},evaluate={0}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let candidates = load_candidates(&config.data_dir.join("resumes"))?;
    let ground_truth_path = config.data_dir.join("ground_truth.json");
    let ground_truth = if ground_truth_path.exists() {
        Some(load_ground_truth(&ground_truth_path)?)
    } else {
        warn!("No ground truth at {}; metrics skipped", ground_truth_path.display());
        None
    };
    let signals = load_signals(&config.data_dir.join("signals.json"))?;

    let extractor = FeatureExtractor::new(config.extraction);
    let registry = EngineRegistry::default();
    let aggregator = registry
        .get(config.engine)
        .with_context(|| format!("Engine '{}' is not registered", config.engine))?;
    let evaluator = Evaluator::new(&extractor, config.engine, aggregator, config.deterministic_profile);

    let run = run_evaluation(
        &evaluator,
        &candidates,
        &signals,
        ground_truth.as_ref(),
        config.default_k,
        config.relevance_threshold,
    )?;

    for (rank, result) in run.results.iter().enumerate() {
        info!(
            "#{} {} {:.3} ({})",
            rank + 1,
            result.candidate_id(),
            result.final_score(),
            result.match_tier()
        );
    }

    let folder = write_run(&config.runs_dir, &run)?;
    println!("{}", folder.display());
    Ok(())
}
