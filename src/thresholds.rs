//! Per-metric cutoffs with fixed defaults and override merging.
//!
//! A [`ThresholdSet`] is resolved once per evaluation from the built-in
//! defaults merged with caller overrides (override wins, key by key).
//! Unknown override keys are retained in the merged set but read by no
//! current rule. Invalid override values are rejected at resolution time,
//! before any metric runs.

use crate::errors::{EvalError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Metric name keys understood by the scoring and advice logic.
pub const SEMANTIC_COHERENCE: &str = "semantic_coherence";
pub const STRUCTURAL_BALANCE: &str = "structural_balance";
pub const TOPIC_FLOW: &str = "topic_flow";
pub const SEQUENCE_COVERAGE: &str = "sequence_coverage";
pub const GRAPH_COVERAGE: &str = "graph_coverage";
pub const REDUNDANCY: &str = "redundancy";
pub const RELEVANCE: &str = "relevance";
pub const EXTRA_TOPICS_PENALTY: &str = "extra_topics_penalty";
pub const FINAL_SCORE: &str = "final_score";

/// Fixed default cutoff for every known metric name.
pub const DEFAULT_THRESHOLDS: &[(&str, f64)] = &[
    (SEMANTIC_COHERENCE, 0.5),
    (STRUCTURAL_BALANCE, 0.6),
    (TOPIC_FLOW, 0.3),
    (SEQUENCE_COVERAGE, 0.6),
    (GRAPH_COVERAGE, 0.6),
    (REDUNDANCY, 0.4),
    (RELEVANCE, 0.5),
    (EXTRA_TOPICS_PENALTY, 0.4),
    (FINAL_SCORE, 0.6),
];

/// Resolved per-metric cutoffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    values: FxHashMap<String, f64>,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        let values = DEFAULT_THRESHOLDS
            .iter()
            .map(|&(name, value)| (name.to_string(), value))
            .collect();
        Self { values }
    }
}

impl ThresholdSet {
    /// Merge caller overrides over the defaults, validating every override
    /// value. Fails fast: a non-finite value or one outside [0, 1] is an
    /// [`EvalError::InvalidThreshold`].
    pub fn resolve(overrides: Option<&FxHashMap<String, f64>>) -> Result<Self> {
        let mut set = Self::default();
        if let Some(overrides) = overrides {
            for (name, &value) in overrides {
                if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                    return Err(EvalError::invalid_threshold(format!(
                        "{name} must be a finite value in [0, 1], got {value}"
                    )));
                }
                set.values.insert(name.clone(), value);
            }
        }
        Ok(set)
    }

    /// The configured cutoff for `metric`, if present in the merged set.
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.values.get(metric).copied()
    }

    /// Cutoff for `metric`, falling back to the built-in default and then
    /// to 0.0 for names with no default. Total: never panics.
    pub(crate) fn cutoff(&self, metric: &str) -> f64 {
        self.get(metric)
            .or_else(|| default_for(metric))
            .unwrap_or(0.0)
    }
}

/// Built-in default for a metric name, if it is a known one.
pub fn default_for(metric: &str) -> Option<f64> {
    DEFAULT_THRESHOLDS
        .iter()
        .find(|&&(name, _)| name == metric)
        .map(|&(_, value)| value)
}
