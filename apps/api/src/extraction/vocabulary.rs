//! Fixed vocabularies for the AI Applications Engineer role.
//!
//! All terms are lower-case; matching lower-cases the candidate text first.

use once_cell::sync::Lazy;
use regex::Regex;

pub const REQUIRED_SKILLS: &[&str] = &[
    "python",
    "api",
    "rest",
    "json",
    "troubleshooting",
    "production",
    "technical support",
    "saas",
];

pub const PREFERRED_SKILLS: &[&str] = &[
    "genai",
    "llm",
    "ml",
    "langchain",
    "prompt engineering",
    "observability",
    "logging",
    "dashboard",
    "aws",
    "gcp",
    "crm",
    "ats",
    "soap",
    "integration",
];

/// Substring keywords for AI keyword density. Multi-word entries never match a
/// single whitespace token; they are kept so the set mirrors the skill taxonomy.
pub const AI_KEYWORDS: &[&str] = &[
    "ai",
    "artificial intelligence",
    "machine learning",
    "ml",
    "llm",
    "large language model",
    "genai",
    "generative ai",
    "langchain",
    "langgraph",
    "prompt",
    "rag",
    "embedding",
];

pub const SUPPORT_KEYWORDS: &[&str] = &[
    "support",
    "customer success",
    "technical support",
    "troubleshooting",
    "debugging",
    "production issues",
    "incident",
    "ticket",
    "escalation",
    "customer-facing",
];

/// A vocabulary term with its compiled whole-word matcher.
#[derive(Debug, Clone)]
pub struct Term {
    pub text: &'static str,
    pattern: Regex,
}

impl Term {
    fn new(text: &'static str) -> Self {
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(text)))
            .unwrap_or_else(|e| panic!("invalid vocabulary term '{text}': {e}"));
        Self { text, pattern }
    }

    /// Whole-word match against already lower-cased text.
    pub fn is_present_in(&self, text_lower: &str) -> bool {
        self.pattern.is_match(text_lower)
    }
}

/// Required and preferred skill sets with compiled matchers.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    pub required: Vec<Term>,
    pub preferred: Vec<Term>,
}

impl SkillVocabulary {
    pub fn new(required: &[&'static str], preferred: &[&'static str]) -> Self {
        Self {
            required: required.iter().copied().map(Term::new).collect(),
            preferred: preferred.iter().copied().map(Term::new).collect(),
        }
    }
}

static DEFAULT_VOCABULARY: Lazy<SkillVocabulary> =
    Lazy::new(|| SkillVocabulary::new(REQUIRED_SKILLS, PREFERRED_SKILLS));

impl Default for SkillVocabulary {
    fn default() -> Self {
        DEFAULT_VOCABULARY.clone()
    }
}
