use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::errors::ScoringError;

/// Raw candidate text as supplied by the loader. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateText {
    #[serde(alias = "candidate_id")]
    pub id: String,
    #[serde(alias = "text")]
    pub raw_text: String,
}

impl CandidateText {
    pub fn new(id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            raw_text: raw_text.into(),
        }
    }
}

/// The three labelled tiers: poor / partial / good.
pub const LABEL_TIERS: [f64; 3] = [0.0, 0.5, 1.0];

/// One labelled candidate in the list-of-records ground truth shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundTruthLabel {
    #[serde(alias = "candidate_id")]
    pub id: String,
    #[serde(alias = "relevance", alias = "score")]
    pub label: f64,
}

/// Either ground-truth shape: `{resumes: [{id, label}]}` or `{id: label}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GroundTruthFile {
    Records { resumes: Vec<GroundTruthLabel> },
    Map(BTreeMap<String, f64>),
}

/// Normalized ground truth: `candidate_id → label`, labels validated to [0, 1].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "GroundTruthFile")]
pub struct GroundTruth {
    labels: BTreeMap<String, f64>,
}

impl GroundTruth {
    pub fn from_labels(labels: BTreeMap<String, f64>) -> Result<Self, ScoringError> {
        for (id, &label) in &labels {
            if !label.is_finite() || !(0.0..=1.0).contains(&label) {
                return Err(ScoringError::malformed(format!(
                    "ground-truth label for '{id}' is {label}, expected a value in [0, 1]"
                )));
            }
            if !LABEL_TIERS.iter().any(|tier| (tier - label).abs() < f64::EPSILON) {
                warn!("Ground-truth label for '{id}' is {label}, not one of 0.0 / 0.5 / 1.0");
            }
        }
        Ok(Self { labels })
    }

    pub fn from_records(records: Vec<GroundTruthLabel>) -> Result<Self, ScoringError> {
        let mut labels = BTreeMap::new();
        for record in records {
            if labels.insert(record.id.clone(), record.label).is_some() {
                return Err(ScoringError::malformed(format!(
                    "duplicate ground-truth label for '{}'",
                    record.id
                )));
            }
        }
        Self::from_labels(labels)
    }

    pub fn get(&self, candidate_id: &str) -> Option<f64> {
        self.labels.get(candidate_id).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &BTreeMap<String, f64> {
        &self.labels
    }
}

impl TryFrom<GroundTruthFile> for GroundTruth {
    type Error = ScoringError;

    fn try_from(file: GroundTruthFile) -> Result<Self, Self::Error> {
        match file {
            GroundTruthFile::Records { resumes } => Self::from_records(resumes),
            GroundTruthFile::Map(labels) => Self::from_labels(labels),
        }
    }
}

impl Serialize for GroundTruth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.labels.serialize(serializer)
    }
}
