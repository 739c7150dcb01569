use std::collections::BTreeMap;

use crate::extraction::DeterministicFacts;
use crate::models::result::{ComponentContribution, MatchTier};

/// Plain-text score explanation. Same inputs, same text.
pub fn build_explanation(
    final_score: f64,
    contributions: &BTreeMap<String, ComponentContribution>,
    facts: Option<&DeterministicFacts>,
) -> String {
    let tier = MatchTier::from_score(final_score);
    let mut lines = vec![
        format!("Final score: {final_score:.3} ({tier} match)"),
        "Breakdown:".to_string(),
    ];
    lines.extend(contributions.iter().map(|(name, row)| {
        format!(
            "  - {} ({:.0}%): {:.2} -> contributes {:.3}",
            title_case(name),
            row.weight * 100.0,
            row.score,
            row.contribution
        )
    }));

    if let Some(facts) = facts {
        let profile = &facts.skill_profile;
        lines.push(format!(
            "Matched required skills ({}): {}",
            profile.matched_required.len(),
            join_or_none(profile.matched_required.iter())
        ));
        lines.push(format!(
            "Missing required skills ({}): {}",
            profile.missing_required.len(),
            join_or_none(profile.missing_required.iter())
        ));
        lines.push(format!(
            "Matched preferred skills ({}): {}",
            profile.matched_preferred.len(),
            join_or_none(profile.matched_preferred.iter())
        ));
        lines.push(format!("Total experience: {:.1} years", facts.years_experience));
    }

    lines.join("\n")
}

fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_or_none<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let joined = items.map(String::as_str).collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "None".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::FeatureExtractor;
    use crate::models::candidate::CandidateText;
    use crate::models::result::ComponentScore;

    fn rows() -> BTreeMap<String, ComponentContribution> {
        [
            ComponentScore::new("deterministic", 0.8, 0.6),
            ComponentScore::new("skill_match", 0.4, 0.4),
        ]
        .iter()
        .map(|c| (c.name.clone(), ComponentContribution::from(c)))
        .collect()
    }

    #[test]
    fn test_explanation_lists_each_component() {
        let text = build_explanation(0.64, &rows(), None);
        assert!(text.starts_with("Final score: 0.640 (partial match)"));
        assert!(text.contains("Deterministic (60%): 0.80 -> contributes 0.480"));
        assert!(text.contains("Skill Match (40%): 0.40 -> contributes 0.160"));
        assert!(!text.contains("skills"));
    }

    #[test]
    fn test_explanation_includes_facts_when_present() {
        let facts = FeatureExtractor::default()
            .extract(&CandidateText::new("r1", "5 years of experience in Python, REST APIs"));
        let text = build_explanation(0.5, &rows(), Some(&facts));
        assert!(text.contains("Matched required skills (2): python, rest"));
        assert!(text.contains("Missing required skills (6)"));
        assert!(text.contains("Matched preferred skills (0): None"));
        assert!(text.ends_with("Total experience: 5.0 years"));
    }

    #[test]
    fn test_explanation_one_line_per_row() {
        let text = build_explanation(0.64, &rows(), None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "Breakdown:");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_explanation_is_deterministic() {
        assert_eq!(
            build_explanation(0.9, &rows(), None),
            build_explanation(0.9, &rows(), None)
        );
    }
}
