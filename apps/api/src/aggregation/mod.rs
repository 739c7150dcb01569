//! Score aggregation — weighted combination of named signals into one final score.

pub mod aggregator;
pub mod explain;
pub mod profiles;
pub mod signal;

pub use aggregator::{combine, validate_weights, Aggregate, ScoreAggregator};
pub use profiles::{EngineKind, EngineRegistry};
pub use signal::{deserialize_signal_table, Signal, SignalMap, Signals};
