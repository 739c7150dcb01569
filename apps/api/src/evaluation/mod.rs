pub mod dataset;
pub mod handlers;
pub mod orchestrator;

pub use orchestrator::{rank_results, run_evaluation, EvaluationRun, Evaluator, SignalTable};
