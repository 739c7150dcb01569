//! Feature extraction — deterministic, regex/keyword facts from raw candidate text.
//!
//! No external calls and no wall-clock reads: the same text always yields the
//! same `DeterministicFacts`. Empty text yields the zero/empty defaults.

pub mod domain;
pub mod education;
pub mod experience;
pub mod scoring;
pub mod skills;
pub mod vocabulary;

use serde::{Deserialize, Serialize};

use crate::extraction::domain::DomainRelevance;
use crate::extraction::scoring::{DeterministicProfile, DeterministicScore};
use crate::extraction::skills::SkillProfile;
use crate::extraction::vocabulary::SkillVocabulary;
use crate::models::candidate::CandidateText;

/// Fixed reference points for date-range parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// The year `present` resolves to in a date range.
    pub reference_year: i32,
    /// Ranges starting before this year are treated as education.
    pub education_cutoff_year: i32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            reference_year: 2026,
            education_cutoff_year: 2010,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeterministicFacts {
    pub years_experience: f64,
    pub skill_profile: SkillProfile,
    pub ai_relevance: f64,
    pub support_relevance: f64,
    pub has_relevant_degree: bool,
}

impl DeterministicFacts {
    pub fn domain_relevance(&self) -> DomainRelevance {
        DomainRelevance {
            ai_relevance: self.ai_relevance,
            support_relevance: self.support_relevance,
        }
    }
}

/// Extractor bound to one configuration and vocabulary. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: ExtractionConfig,
    vocabulary: SkillVocabulary,
}

impl FeatureExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self::with_vocabulary(config, SkillVocabulary::default())
    }

    pub fn with_vocabulary(config: ExtractionConfig, vocabulary: SkillVocabulary) -> Self {
        Self { config, vocabulary }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn extract_years_of_experience(&self, text: &str) -> f64 {
        experience::extract_years_of_experience(text, &self.config)
    }

    pub fn extract_skills(&self, text: &str) -> SkillProfile {
        skills::extract_skills(text, &self.vocabulary)
    }

    pub fn calculate_domain_relevance(&self, text: &str) -> DomainRelevance {
        domain::calculate_domain_relevance(text)
    }

    pub fn has_relevant_degree(&self, text: &str) -> bool {
        education::has_relevant_degree(text)
    }

    pub fn extract(&self, candidate: &CandidateText) -> DeterministicFacts {
        let text = candidate.raw_text.as_str();
        let domain = self.calculate_domain_relevance(text);

        DeterministicFacts {
            years_experience: self.extract_years_of_experience(text),
            skill_profile: self.extract_skills(text),
            ai_relevance: domain.ai_relevance,
            support_relevance: domain.support_relevance,
            has_relevant_degree: self.has_relevant_degree(text),
        }
    }

    pub fn score(&self, facts: &DeterministicFacts, profile: DeterministicProfile) -> DeterministicScore {
        scoring::calculate_final_deterministic_score(
            facts.years_experience,
            &facts.skill_profile,
            &facts.domain_relevance(),
            facts.has_relevant_degree,
            profile,
        )
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = r#"
        Jane Doe — AI Support Engineer
        Summary: 4+ years supporting SaaS customers with Python tooling and LLM workflows.
        Experience:
          Acme AI, Technical Support Engineer, 2021 - Present
            - Troubleshooting production incidents, REST API and JSON integration debugging
            - Built LangChain RAG assistants and observability dashboards on AWS
          Initech, Support Analyst, 2019 - 2021
        Education: B.S. Computer Science, 2012 - 2016
    "#;

    fn candidate(text: &str) -> CandidateText {
        CandidateText::new("resume_001", text)
    }

    #[test]
    fn test_extract_is_idempotent() {
        let extractor = FeatureExtractor::default();
        let first = extractor.extract(&candidate(RESUME));
        let second = extractor.extract(&candidate(RESUME));
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_extract_realistic_resume() {
        let facts = FeatureExtractor::default().extract(&candidate(RESUME));
        // ranges: (2026-2021) + (2021-2019) + (2016-2012) = 11, which beats the 4+ mention
        assert_eq!(facts.years_experience, 11.0);
        assert!(facts.has_relevant_degree);
        for skill in ["python", "saas", "technical support", "troubleshooting", "production", "rest", "api", "json"] {
            assert!(facts.skill_profile.matched_required.contains(skill), "missing {skill}");
        }
        assert!(facts.skill_profile.matched_preferred.contains("langchain"));
        assert!(facts.ai_relevance > 0.0);
        assert!(facts.support_relevance > 0.0);
    }

    #[test]
    fn test_empty_text_yields_defaults() {
        let extractor = FeatureExtractor::default();
        let facts = extractor.extract(&candidate(""));
        assert_eq!(facts.years_experience, 0.0);
        assert!(facts.skill_profile.matched_required.is_empty());
        assert_eq!(facts.skill_profile.coverage_score, 0.0);
        assert_eq!(facts.ai_relevance, 0.0);
        assert_eq!(facts.support_relevance, 0.0);
        assert!(!facts.has_relevant_degree);

        for profile in DeterministicProfile::ALL {
            assert_eq!(extractor.score(&facts, profile).score, 0.0);
        }
    }

    #[test]
    fn test_score_respects_profile_selection() {
        let extractor = FeatureExtractor::default();
        let facts = extractor.extract(&candidate(RESUME));
        let balanced = extractor.score(&facts, DeterministicProfile::Balanced);
        let degree_aware = extractor.score(&facts, DeterministicProfile::DegreeAware);
        assert_eq!(balanced.profile, DeterministicProfile::Balanced);
        assert_eq!(degree_aware.profile, DeterministicProfile::DegreeAware);
        assert!(degree_aware.breakdown.contains_key("education_score"));
        assert!(!balanced.breakdown.contains_key("education_score"));
    }
}
