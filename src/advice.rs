//! Rule-based advice generation from sub-scores and thresholds.
//!
//! A fixed rule list is evaluated in order; each rule appends at most one
//! message when its sub-score crosses its cutoff (below for quality
//! metrics, above for penalty metrics). Rules over reference-gated
//! metrics are skipped entirely without a reference. When nothing fires,
//! exactly one positive message is emitted.

use crate::evaluation::EvaluationResult;
use crate::thresholds::{
    ThresholdSet, FINAL_SCORE, REDUNDANCY, SEMANTIC_COHERENCE, SEQUENCE_COVERAGE,
    STRUCTURAL_BALANCE, TOPIC_FLOW,
};

/// Sections hold weakly related topics
pub const WEAK_COHERENCE: &str =
    "Topics within sections are weakly related; consider rewording them or grouping them differently.";
/// Topic counts vary too much between sections
pub const UNEVEN_STRUCTURE: &str =
    "Topics are distributed unevenly; try to balance the number of topics per section.";
/// Course order disagrees with the reference order
pub const ORDER_MISMATCH: &str =
    "The topic order differs from the reference; consider restructuring.";
/// Too few reference topics are covered
pub const LOW_COVERAGE: &str =
    "Topic coverage is insufficient; some key reference topics are missing.";
/// Duplicated or near-duplicate topics present
pub const HIGH_REDUNDANCY: &str =
    "Duplicate or very similar topics were found; consider merging or removing them.";
/// Composite score under the recommended level
pub const LOW_FINAL_SCORE: &str =
    "The overall score is below the recommended level; look at the weakest metrics.";
/// Emitted when no other rule fires
pub const WELL_STRUCTURED: &str =
    "The course is well structured. Topics are logical and balanced!";

/// Evaluate the advice rules against a result and resolved thresholds.
pub fn generate_advice(
    result: &EvaluationResult,
    thresholds: &ThresholdSet,
    has_reference: bool,
) -> Vec<String> {
    let mut advice = Vec::new();

    if result.semantic_coherence < thresholds.cutoff(SEMANTIC_COHERENCE) {
        advice.push(WEAK_COHERENCE.to_string());
    }
    if result.structural_balance < thresholds.cutoff(STRUCTURAL_BALANCE) {
        advice.push(UNEVEN_STRUCTURE.to_string());
    }

    if has_reference {
        if result.topic_flow < thresholds.cutoff(TOPIC_FLOW) {
            advice.push(ORDER_MISMATCH.to_string());
        }
        // sequence_coverage is always Some when a reference was supplied.
        if let Some(coverage) = result.sequence_coverage {
            if coverage < thresholds.cutoff(SEQUENCE_COVERAGE) {
                advice.push(LOW_COVERAGE.to_string());
            }
        }
    }

    if result.redundancy > thresholds.cutoff(REDUNDANCY) {
        advice.push(HIGH_REDUNDANCY.to_string());
    }
    if result.final_score < thresholds.cutoff(FINAL_SCORE) {
        advice.push(LOW_FINAL_SCORE.to_string());
    }

    if advice.is_empty() {
        advice.push(WELL_STRUCTURED.to_string());
    }
    advice
}
