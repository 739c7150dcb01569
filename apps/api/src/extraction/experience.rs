//! Years-of-experience extraction.
//!
//! Two heuristics over the lower-cased text, combined with `max`:
//! 1. the largest explicit mention ("5 years", "3+ yrs")
//! 2. the summed length of `YYYY - YYYY|present` ranges, skipping ranges that
//!    start before the education cutoff

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::ExtractionConfig;
use crate::round_to;

static YEARS_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)\+?\s*years?").unwrap());

static YEARS_ABBREVIATED: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)\s*yrs?").unwrap());

static DATE_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{4})\s*[-–]\s*([0-9]{4}|present)").unwrap());

pub fn extract_years_of_experience(text: &str, config: &ExtractionConfig) -> f64 {
    let text_lower = text.to_lowercase();

    let from_mentions = years_from_mentions(&text_lower);
    let from_ranges = years_from_ranges(&text_lower, config);

    round_to(from_mentions.max(from_ranges), 1)
}

fn years_from_mentions(text_lower: &str) -> f64 {
    [&*YEARS_MENTION, &*YEARS_ABBREVIATED]
        .iter()
        .flat_map(|pattern| pattern.captures_iter(text_lower))
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .fold(0.0, f64::max)
}

fn years_from_ranges(text_lower: &str, config: &ExtractionConfig) -> f64 {
    DATE_RANGE
        .captures_iter(text_lower)
        .filter_map(|caps| {
            let start: i32 = caps[1].parse().ok()?;
            // Likely education, or too old to count for this role.
            if start < config.education_cutoff_year {
                return None;
            }
            let end: i32 = match &caps[2] {
                "present" => config.reference_year,
                year => year.parse().ok()?,
            };
            // Reversed ranges are typos, not negative experience.
            (end >= start).then(|| f64::from(end - start))
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExtractionConfig {
        ExtractionConfig::default()
    }

    #[test]
    fn test_explicit_mention() {
        let text = "5 years of experience in Python, REST APIs, production support";
        assert_eq!(extract_years_of_experience(text, &config()), 5.0);
    }

    #[test]
    fn test_plus_and_abbreviation_take_maximum() {
        let text = "3+ years backend, 7 yrs overall, 1 year of Go";
        assert_eq!(extract_years_of_experience(text, &config()), 7.0);
    }

    #[test]
    fn test_date_range_without_mention() {
        assert_eq!(extract_years_of_experience("2020 - 2023", &config()), 3.0);
    }

    #[test]
    fn test_ranges_are_summed_and_present_uses_reference_year() {
        let text = "Acme Corp 2018 – 2021\nInitech 2022 - Present";
        // 3 + (2026 - 2022)
        assert_eq!(extract_years_of_experience(text, &config()), 7.0);
    }

    #[test]
    fn test_reference_year_is_configurable() {
        let cfg = ExtractionConfig {
            reference_year: 2030,
            ..ExtractionConfig::default()
        };
        assert_eq!(extract_years_of_experience("2025 - present", &cfg), 5.0);
    }

    #[test]
    fn test_ranges_before_cutoff_are_excluded() {
        let text = "B.S. Computer Science 2004 - 2008\nEngineer 2019 - 2021";
        assert_eq!(extract_years_of_experience(text, &config()), 2.0);
    }

    #[test]
    fn test_range_beats_smaller_mention() {
        let text = "2 years of Python. Worked 2015-2021 at Globex.";
        assert_eq!(extract_years_of_experience(text, &config()), 6.0);
    }

    #[test]
    fn test_reversed_range_is_ignored() {
        assert_eq!(extract_years_of_experience("2023 - 2020", &config()), 0.0);
    }

    #[test]
    fn test_no_matches_is_zero() {
        assert_eq!(extract_years_of_experience("", &config()), 0.0);
        assert_eq!(
            extract_years_of_experience("Enthusiastic fresh graduate", &config()),
            0.0
        );
    }
}
