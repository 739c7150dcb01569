use once_cell::sync::Lazy;
use regex::Regex;

static DEGREE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(bachelor'?s?|master'?s?|ph\.?d|doctorate|b\.?tech|m\.?tech|b\.s|m\.s|bsc|msc)\b")
        .unwrap()
});

static RELEVANT_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(computer science|computer engineering|software engineering|data science|information technology|artificial intelligence|machine learning|electrical engineering|mathematics|statistics)\b",
    )
    .unwrap()
});

/// True when the text names both a degree and a field relevant to the role.
pub fn has_relevant_degree(text: &str) -> bool {
    let text_lower = text.to_lowercase();
    DEGREE.is_match(&text_lower) && RELEVANT_FIELD.is_match(&text_lower)
}
