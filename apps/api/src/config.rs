use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::aggregation::profiles::EngineKind;
use crate::extraction::scoring::DeterministicProfile;
use crate::extraction::ExtractionConfig;
use crate::metrics::RelevanceThreshold;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub extraction: ExtractionConfig,
    pub default_k: usize,
    pub relevance_threshold: RelevanceThreshold,
    pub deterministic_profile: DeterministicProfile,
    pub engine: EngineKind,
    pub data_dir: PathBuf,
    pub runs_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            extraction: ExtractionConfig::default(),
            default_k: 3,
            relevance_threshold: RelevanceThreshold::Lenient,
            deterministic_profile: DeterministicProfile::Balanced,
            engine: EngineKind::Deterministic,
            data_dir: PathBuf::from("data"),
            runs_dir: PathBuf::from("runs"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            extraction: ExtractionConfig {
                reference_year: parse_env("REFERENCE_YEAR", defaults.extraction.reference_year)?,
                education_cutoff_year: parse_env(
                    "EDUCATION_CUTOFF_YEAR",
                    defaults.extraction.education_cutoff_year,
                )?,
            },
            default_k: parse_env("DEFAULT_K", defaults.default_k)?,
            relevance_threshold: parse_env("RELEVANCE_THRESHOLD", defaults.relevance_threshold)?,
            deterministic_profile: parse_env(
                "DETERMINISTIC_PROFILE",
                defaults.deterministic_profile,
            )?,
            engine: parse_env("ENGINE", defaults.engine)?,
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            runs_dir: std::env::var("RUNS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.runs_dir),
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
}
