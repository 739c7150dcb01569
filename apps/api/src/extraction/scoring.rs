//! Deterministic score: a weighted sum of experience, skill coverage, AI and
//! support relevance, and (degree-aware profile only) education.
//!
//! Two tuned profiles exist and both stay selectable by name.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::extraction::domain::DomainRelevance;
use crate::extraction::skills::SkillProfile;
use crate::round_to;

/// Years at which the experience sub-score saturates.
pub const EXPERIENCE_TARGET_YEARS: f64 = 3.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeterministicProfile {
    /// 20 / 40 / 20 / 20
    #[default]
    Balanced,
    /// 15 / 35 / 35 / 5 / 10 with a binary relevant-degree flag
    DegreeAware,
}

impl DeterministicProfile {
    pub const ALL: [DeterministicProfile; 2] =
        [DeterministicProfile::Balanced, DeterministicProfile::DegreeAware];

    pub fn name(self) -> &'static str {
        match self {
            DeterministicProfile::Balanced => "balanced",
            DeterministicProfile::DegreeAware => "degree_aware",
        }
    }

    pub fn weights(self) -> DeterministicWeights {
        match self {
            DeterministicProfile::Balanced => DeterministicWeights {
                experience: 0.20,
                skill_coverage: 0.40,
                ai_relevance: 0.20,
                support_relevance: 0.20,
                education: None,
            },
            DeterministicProfile::DegreeAware => DeterministicWeights {
                experience: 0.15,
                skill_coverage: 0.35,
                ai_relevance: 0.35,
                support_relevance: 0.05,
                education: Some(0.10),
            },
        }
    }
}

impl fmt::Display for DeterministicProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeterministicProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeterministicProfile::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown deterministic profile '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeterministicWeights {
    pub experience: f64,
    pub skill_coverage: f64,
    pub ai_relevance: f64,
    pub support_relevance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<f64>,
}

impl DeterministicWeights {
    pub fn sum(&self) -> f64 {
        self.experience
            + self.skill_coverage
            + self.ai_relevance
            + self.support_relevance
            + self.education.unwrap_or(0.0)
    }
}

/// Final deterministic score with its audit breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeterministicScore {
    pub score: f64,
    pub profile: DeterministicProfile,
    pub breakdown: BTreeMap<String, f64>,
}

pub fn calculate_final_deterministic_score(
    years_experience: f64,
    skills: &SkillProfile,
    domain: &DomainRelevance,
    has_relevant_degree: bool,
    profile: DeterministicProfile,
) -> DeterministicScore {
    let weights = profile.weights();

    let experience_score = (years_experience / EXPERIENCE_TARGET_YEARS).clamp(0.0, 1.0);
    let skill_score = skills.coverage_score;
    let ai_score = domain.ai_relevance;
    let support_score = domain.support_relevance;

    let mut total = weights.experience * experience_score
        + weights.skill_coverage * skill_score
        + weights.ai_relevance * ai_score
        + weights.support_relevance * support_score;

    let mut breakdown = BTreeMap::from([
        ("experience_score".to_string(), round_to(experience_score, 3)),
        ("skill_coverage_score".to_string(), round_to(skill_score, 3)),
        ("ai_relevance_score".to_string(), round_to(ai_score, 3)),
        ("support_relevance_score".to_string(), round_to(support_score, 3)),
    ]);

    if let Some(education_weight) = weights.education {
        let education_score = if has_relevant_degree { 1.0 } else { 0.0 };
        total += education_weight * education_score;
        breakdown.insert("education_score".to_string(), education_score);
    }

    let score = round_to(total, 3);
    breakdown.insert("deterministic_final".to_string(), score);

    DeterministicScore {
        score,
        profile,
        breakdown,
    }
}
