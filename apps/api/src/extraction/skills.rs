use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::extraction::vocabulary::SkillVocabulary;
use crate::round_to;

/// Required skills dominate coverage.
pub const REQUIRED_COVERAGE_WEIGHT: f64 = 0.7;
pub const PREFERRED_COVERAGE_WEIGHT: f64 = 0.3;

/// Rule-based skill match against the fixed vocabularies.
///
/// Every required skill is in exactly one of `matched_required` / `missing_required`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillProfile {
    pub matched_required: BTreeSet<String>,
    pub matched_preferred: BTreeSet<String>,
    pub missing_required: BTreeSet<String>,
    /// 0.7 × required coverage + 0.3 × preferred coverage, 3 decimals.
    pub coverage_score: f64,
}

pub fn extract_skills(text: &str, vocabulary: &SkillVocabulary) -> SkillProfile {
    let text_lower = text.to_lowercase();

    let mut matched_required = BTreeSet::new();
    let mut missing_required = BTreeSet::new();
    for term in &vocabulary.required {
        if term.is_present_in(&text_lower) {
            matched_required.insert(term.text.to_string());
        } else {
            missing_required.insert(term.text.to_string());
        }
    }

    let matched_preferred: BTreeSet<String> = vocabulary
        .preferred
        .iter()
        .filter(|term| term.is_present_in(&text_lower))
        .map(|term| term.text.to_string())
        .collect();

    let required_coverage = ratio(matched_required.len(), vocabulary.required.len());
    let preferred_coverage = ratio(matched_preferred.len(), vocabulary.preferred.len());
    let coverage_score = REQUIRED_COVERAGE_WEIGHT * required_coverage
        + PREFERRED_COVERAGE_WEIGHT * preferred_coverage;

    SkillProfile {
        matched_required,
        matched_preferred,
        missing_required,
        coverage_score: round_to(coverage_score, 3),
    }
}

fn ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}
