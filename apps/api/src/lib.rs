//! Candidate ranking core: deterministic feature extraction, weighted score
//! aggregation across named engines, and ranking-quality metrics.

pub mod aggregation;
pub mod config;
pub mod errors;
pub mod evaluation;
pub mod extraction;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod state;

/// Rounds to `places` decimals on the exact binary value, ties to even.
///
/// `value * 10^places` is itself inexact, so scaling and calling `round` can
/// land on the wrong side of a tie. Float formatting expands the exact value.
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.places$}").parse().unwrap_or(value)
}
