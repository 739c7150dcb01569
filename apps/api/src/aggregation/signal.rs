use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ScoringError;

/// Canonical names of the scoring signals an engine can combine.
///
/// Producer spellings (`rule`, `semantic_score`, …) normalize here at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    #[serde(alias = "semantic_score", alias = "embedding")]
    Semantic,
    #[serde(alias = "rule", alias = "rule_score", alias = "deterministic_score")]
    Deterministic,
    #[serde(alias = "llm_score")]
    Llm,
    SkillMatch,
    ExperienceDepth,
    DomainFit,
}

/// Signal values for one candidate.
pub type Signals = BTreeMap<Signal, f64>;

/// A [`Signals`] map read from untrusted input.
///
/// Two spellings of one signal (`rule` and `deterministic`) are rejected
/// rather than letting the last one win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalMap(pub Signals);

impl SignalMap {
    pub fn into_inner(self) -> Signals {
        self.0
    }
}

impl<'de> Deserialize<'de> for SignalMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SignalMapVisitor;

        impl<'de> Visitor<'de> for SignalMapVisitor {
            type Value = SignalMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of signal names to scores")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut signals = Signals::new();
                while let Some(signal) = access.next_key::<Signal>()? {
                    let value: f64 = access.next_value()?;
                    if signals.insert(signal, value).is_some() {
                        return Err(de::Error::custom(ScoringError::malformed(format!(
                            "signal '{signal}' given more than once"
                        ))));
                    }
                }
                Ok(SignalMap(signals))
            }
        }

        deserializer.deserialize_map(SignalMapVisitor)
    }
}

/// `{candidate_id: {signal: value}}` with [`SignalMap`] checks on every row.
pub fn deserialize_signal_table<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Signals>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = BTreeMap::<String, SignalMap>::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|(id, row)| (id, row.into_inner()))
        .collect())
}

impl Signal {
    pub const ALL: [Signal; 6] = [
        Signal::Semantic,
        Signal::Deterministic,
        Signal::Llm,
        Signal::SkillMatch,
        Signal::ExperienceDepth,
        Signal::DomainFit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Signal::Semantic => "semantic",
            Signal::Deterministic => "deterministic",
            Signal::Llm => "llm",
            Signal::SkillMatch => "skill_match",
            Signal::ExperienceDepth => "experience_depth",
            Signal::DomainFit => "domain_fit",
        }
    }

    /// Computed locally by the feature extractor rather than supplied by a collaborator.
    pub fn is_local(self) -> bool {
        matches!(self, Signal::Deterministic)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| format!("unknown signal '{s}'"))
    }
}
