//! Score aggregation and the evaluation entry points.
//!
//! One evaluation call parses the course (and optional reference) text,
//! runs every metric through a fresh [`EmbeddingSession`], folds the
//! sub-scores into a final score, and attaches generated advice. A call
//! either completes or fails atomically: an oracle failure aborts the
//! whole evaluation with no partial result.

use crate::advice::generate_advice;
use crate::embedding::{Embedder, EmbeddingSession};
use crate::errors::Result;
use crate::metrics::{independent, reference};
use crate::outline::parse_outline;
use crate::thresholds::ThresholdSet;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Normalization ceiling for raw semantic coherence
const COHERENCE_NORM: f64 = 0.65;
/// Normalization ceiling for raw structural balance
const BALANCE_NORM: f64 = 0.8;
/// Cap on the extra-topics penalty before it is subtracted from relevance
const EXTRA_PENALTY_CAP: f64 = 0.5;

/// Sub-scores, final score, and advice for one evaluated course outline.
///
/// Reference-gated fields are `None` exactly when no (non-blank)
/// reference text was supplied; every other field is always present.
/// All scores live in [0, 1] after their documented clamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub final_score: f64,
    pub structural_score: f64,
    pub semantic_coherence: f64,
    pub topic_flow: f64,
    pub structural_balance: f64,
    pub sequence_coverage: Option<f64>,
    pub graph_coverage: Option<f64>,
    pub redundancy: f64,
    pub relevance: Option<f64>,
    pub extra_topics_penalty: f64,
    pub coverage_score: Option<f64>,
    pub relevance_score: Option<f64>,
    pub advice: Vec<String>,
}

/// Reference-dependent sub-scores, present only when a reference was
/// supplied.
struct ReferenceScores {
    sequence_coverage: f64,
    graph_coverage: f64,
    relevance: f64,
    extra_topics_penalty: f64,
}

/// Round to three decimal places.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Fold raw sub-scores into the result record (advice filled in later).
fn aggregate(
    semantic_coherence: f64,
    topic_flow: f64,
    structural_balance: f64,
    redundancy: f64,
    reference_scores: Option<ReferenceScores>,
) -> EvaluationResult {
    let semantic_norm = (semantic_coherence / COHERENCE_NORM).min(1.0);
    let balance_norm = (structural_balance / BALANCE_NORM).min(1.0);
    let structural_score = (semantic_norm + topic_flow + balance_norm) / 3.0;

    match reference_scores {
        Some(r) => {
            let coverage_score =
                (r.sequence_coverage + r.graph_coverage - redundancy.min(1.0)) / 2.0;
            let relevance_score =
                (r.relevance - r.extra_topics_penalty.min(EXTRA_PENALTY_CAP)).max(0.0);
            let final_score =
                ((structural_score + coverage_score + relevance_score) / 3.0).min(1.0);
            EvaluationResult {
                final_score,
                structural_score,
                semantic_coherence,
                topic_flow,
                structural_balance,
                sequence_coverage: Some(r.sequence_coverage),
                graph_coverage: Some(r.graph_coverage),
                redundancy,
                relevance: Some(r.relevance),
                extra_topics_penalty: r.extra_topics_penalty,
                coverage_score: Some(coverage_score),
                relevance_score: Some(relevance_score),
                advice: Vec::new(),
            }
        }
        None => EvaluationResult {
            final_score: round3(structural_score),
            structural_score,
            semantic_coherence,
            topic_flow,
            structural_balance,
            sequence_coverage: None,
            graph_coverage: None,
            redundancy,
            relevance: None,
            extra_topics_penalty: 0.0,
            coverage_score: None,
            relevance_score: None,
            advice: Vec::new(),
        },
    }
}

/// Evaluates course outlines against an injected embedding oracle.
///
/// Holds the oracle and a resolved threshold set; evaluations share no
/// other state, so one `Evaluator` may serve concurrent callers as long
/// as the oracle itself is safe for concurrent use.
#[derive(Debug)]
pub struct Evaluator<E> {
    oracle: E,
    thresholds: ThresholdSet,
}

impl<E: Embedder> Evaluator<E> {
    /// Create an evaluator with the default thresholds
    pub fn new(oracle: E) -> Self {
        Self {
            oracle,
            thresholds: ThresholdSet::default(),
        }
    }

    /// Create an evaluator with caller threshold overrides, rejecting
    /// invalid override values before anything is scored.
    pub fn with_overrides(oracle: E, overrides: &FxHashMap<String, f64>) -> Result<Self> {
        Ok(Self {
            oracle,
            thresholds: ThresholdSet::resolve(Some(overrides))?,
        })
    }

    /// The resolved threshold set
    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    /// Score `course_text`, optionally against `reference_text`.
    ///
    /// Reference text that is `None` or blank after trimming is treated
    /// as absent: the reference-gated result fields come back `None` and
    /// `topic_flow` is fixed at 0.0. Malformed outline text is never an
    /// error — unparseable input degrades to zero/neutral scores.
    pub fn evaluate(
        &self,
        course_text: &str,
        reference_text: Option<&str>,
    ) -> Result<EvaluationResult> {
        let reference_text = reference_text.map(str::trim).filter(|t| !t.is_empty());
        let course = parse_outline(course_text);
        let reference_outline = reference_text.map(parse_outline);
        tracing::debug!(
            sections = course.section_count(),
            topics = course.total_topic_count(),
            has_reference = reference_outline.is_some(),
            "evaluating course outline"
        );

        let mut session = EmbeddingSession::new(&self.oracle);

        let semantic_coherence = independent::semantic_coherence(&course, &mut session)?;
        let structural_balance = independent::structural_balance(&course);
        let redundancy = reference::redundancy(&course, &mut session)?;

        let (topic_flow, reference_scores) = match &reference_outline {
            Some(reference_outline) => {
                let reference_topics = reference_outline.flatten();
                let topic_flow = reference::topic_flow(&course, &reference_topics);
                let scores = ReferenceScores {
                    sequence_coverage: reference::sequence_coverage(
                        &course,
                        &reference_topics,
                        &mut session,
                    )?,
                    graph_coverage: reference::graph_coverage(
                        &course,
                        reference_outline,
                        &mut session,
                    )?,
                    relevance: reference::relevance(&course, &reference_topics, &mut session)?,
                    extra_topics_penalty: reference::extra_topics_penalty(
                        &course,
                        &reference_topics,
                        &mut session,
                    )?,
                };
                (topic_flow, Some(scores))
            }
            None => (0.0, None),
        };

        let mut result = aggregate(
            semantic_coherence,
            topic_flow,
            structural_balance,
            redundancy,
            reference_scores,
        );
        result.advice = generate_advice(&result, &self.thresholds, reference_outline.is_some());

        tracing::debug!(
            final_score = result.final_score,
            distinct_strings = session.cached_count(),
            "course evaluation complete"
        );
        Ok(result)
    }
}

/// One-shot evaluation: resolve thresholds, score, and generate advice.
pub fn evaluate_course<E: Embedder + ?Sized>(
    course_text: &str,
    reference_text: Option<&str>,
    threshold_overrides: Option<&FxHashMap<String, f64>>,
    oracle: &E,
) -> Result<EvaluationResult> {
    let evaluator = Evaluator {
        oracle,
        thresholds: ThresholdSet::resolve(threshold_overrides)?,
    };
    evaluator.evaluate(course_text, reference_text)
}
