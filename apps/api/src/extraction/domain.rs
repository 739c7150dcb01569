use serde::{Deserialize, Serialize};

use crate::extraction::vocabulary::{AI_KEYWORDS, SUPPORT_KEYWORDS};
use crate::round_to;

/// Keyword density rarely exceeds 10% of tokens; scale so typical densities
/// fill [0, 1].
const DENSITY_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainRelevance {
    pub ai_relevance: f64,
    pub support_relevance: f64,
}

/// Keyword density per domain: words containing any keyword (substring, not
/// whole-word), normalized as `min(count / total_words × 10, 1.0)`.
pub fn calculate_domain_relevance(text: &str) -> DomainRelevance {
    let text_lower = text.to_lowercase();
    let words: Vec<&str> = text_lower.split_whitespace().collect();

    if words.is_empty() {
        return DomainRelevance::default();
    }

    DomainRelevance {
        ai_relevance: density(&words, AI_KEYWORDS),
        support_relevance: density(&words, SUPPORT_KEYWORDS),
    }
}

fn density(words: &[&str], keywords: &[&str]) -> f64 {
    let count = words
        .iter()
        .filter(|word| keywords.iter().any(|kw| word.contains(kw)))
        .count();
    let scaled = (count as f64 / words.len() as f64 * DENSITY_SCALE).min(1.0);
    round_to(scaled, 3)
}
