//! Metrics comparing a course outline against a reference.
//!
//! Apart from [`redundancy`], every metric here needs a reference topic
//! list or a full reference outline. The similarity cutoffs are
//! deliberately not uniform: relevance (0.7) and extraneousness (0.85)
//! leave a gray zone of topics that are neither confidently relevant nor
//! confidently extra.

use super::{mean, row_max};
use crate::embedding::{self_similarity_matrix, similarity_matrix, Embedder, EmbeddingSession};
use crate::errors::Result;
use crate::graph::{semantic_node_mapping, TopicGraph};
use crate::outline::Outline;
use rustc_hash::{FxHashMap, FxHashSet};

/// Similarity above which a course topic counts as covering a reference topic
const MATCH_CUTOFF: f64 = 0.8;
/// Similarity above which a course/reference graph node pair may map
const NODE_MATCH_CUTOFF: f64 = 0.8;
/// Similarity above which a topic pair counts as near-duplicate
const NEAR_DUPLICATE_CUTOFF: f64 = 0.8;
/// Similarity above which a near-duplicate pair draws the extra cubic penalty
const SEVERE_DUPLICATE_CUTOFF: f64 = 0.95;
/// Fixed penalty for a case-insensitive exact duplicate pair
const LEXICAL_DUPLICATE_PENALTY: f64 = 0.9;
/// Per lexical duplicate boost to the redundancy correction factor
const LEXICAL_DUPLICATE_WEIGHT: f64 = 0.05;
/// Similarity above which a course topic counts as relevant
const RELEVANCE_CUTOFF: f64 = 0.7;
/// Similarity below which a course topic counts as extraneous
const EXTRA_CUTOFF: f64 = 0.85;

/// Ordering fidelity of course topics against a reference topic order.
///
/// The course is flattened and filtered to topics that literally occur in
/// the reference sequence; the surviving topics' reference indices are
/// scored by normalized pairwise inversions, then damped by a position
/// penalty for introducing the first reference topic late in the course.
/// Scores 0 when nothing survives the filter.
pub fn topic_flow(outline: &Outline, reference_order: &[&str]) -> f64 {
    let all_topics = outline.flatten();
    let reference_set: FxHashSet<&str> = reference_order.iter().copied().collect();
    let filtered: Vec<&str> = all_topics
        .iter()
        .copied()
        .filter(|t| reference_set.contains(t))
        .collect();
    if filtered.is_empty() {
        return 0.0;
    }

    // First occurrence wins for duplicated reference topics.
    let mut reference_positions: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, topic) in reference_order.iter().enumerate() {
        reference_positions.entry(topic).or_insert(i);
    }
    let sequence: Vec<usize> = filtered
        .iter()
        .filter_map(|t| reference_positions.get(t).copied())
        .collect();

    let inversions = count_inversions(&sequence) as f64;
    let max_inversions = if sequence.len() > 1 {
        (sequence.len() * (sequence.len() - 1) / 2) as f64
    } else {
        1.0
    };

    let first_position = all_topics
        .iter()
        .position(|t| *t == filtered[0])
        .unwrap_or(0);
    let position_penalty = first_position as f64 / all_topics.len() as f64;

    ((1.0 - inversions / max_inversions) * (1.0 - position_penalty)).max(0.0)
}

/// Pairs (i < j) with `sequence[i] > sequence[j]`.
fn count_inversions(sequence: &[usize]) -> usize {
    let mut inversions = 0;
    for i in 0..sequence.len() {
        for j in (i + 1)..sequence.len() {
            if sequence[i] > sequence[j] {
                inversions += 1;
            }
        }
    }
    inversions
}

/// Fraction of the reference list covered by semantically matching course
/// topics.
///
/// Counts distinct course topics whose best reference similarity exceeds
/// 0.8, normalized by the reference list length (duplicates included) and
/// capped at 1. The count side and the normalization side are asymmetric
/// on purpose; the default thresholds are calibrated against exactly this
/// shape.
pub fn sequence_coverage<E: Embedder + ?Sized>(
    outline: &Outline,
    reference_topics: &[&str],
    session: &mut EmbeddingSession<'_, E>,
) -> Result<f64> {
    let course_topics = outline.distinct_topics();
    if course_topics.is_empty() || reference_topics.is_empty() {
        return Ok(0.0);
    }

    let course_vectors = session.embed(&course_topics)?;
    let reference_vectors = session.embed(reference_topics)?;
    let matrix = similarity_matrix(&course_vectors, &reference_vectors);

    let matched = matrix
        .iter()
        .filter(|row| row_max(row) > MATCH_CUTOFF)
        .count();
    Ok((matched as f64 / reference_topics.len() as f64).min(1.0))
}

/// Structural coverage via topic-graph alignment.
///
/// Builds both topic graphs, greedily maps course nodes onto their most
/// similar reference nodes (cutoff 0.8, many-to-one allowed), translates
/// course edges through the mapping, and scores matched nodes plus
/// matched edges against the reference graph's size. An empty reference
/// graph scores 0.
pub fn graph_coverage<E: Embedder + ?Sized>(
    course: &Outline,
    reference: &Outline,
    session: &mut EmbeddingSession<'_, E>,
) -> Result<f64> {
    let course_graph = TopicGraph::from_outline(course);
    let reference_graph = TopicGraph::from_outline(reference);

    let total = reference_graph.node_count() + reference_graph.edge_count();
    if total == 0 {
        return Ok(0.0);
    }

    let mapping = semantic_node_mapping(
        &course_graph,
        &reference_graph,
        session,
        NODE_MATCH_CUTOFF,
    )?;
    let matched_nodes = mapping.len();

    let translated: FxHashSet<(u32, u32)> = course_graph
        .edges()
        .iter()
        .filter_map(|&(a, b)| {
            let ma = *mapping.get(&a)?;
            let mb = *mapping.get(&b)?;
            Some((ma.min(mb), ma.max(mb)))
        })
        .collect();
    let matched_edges = translated
        .iter()
        .filter(|edge| reference_graph.edges().contains(edge))
        .count();

    Ok(((matched_nodes + matched_edges) as f64 / total as f64).min(1.0))
}

/// Near-duplicate pressure among course topics (course only, no
/// reference).
///
/// Every unordered topic pair contributes either a fixed 0.9 penalty for
/// a case-insensitive exact duplicate, or a nonlinear `(sim - 0.8)^2`
/// penalty above the near-duplicate cutoff with an extra cubic term past
/// 0.95. The mean penalty is then shaped by a correction factor that
/// grows with the share of offending pairs and the lexical duplicate
/// count. Fewer than two topics score 0.
pub fn redundancy<E: Embedder + ?Sized>(
    outline: &Outline,
    session: &mut EmbeddingSession<'_, E>,
) -> Result<f64> {
    let all_topics = outline.flatten();
    if all_topics.len() < 2 {
        return Ok(0.0);
    }

    let vectors = session.embed(&all_topics)?;
    let matrix = self_similarity_matrix(&vectors);

    let mut penalties = Vec::new();
    let mut lexical_duplicates = 0usize;
    for i in 0..all_topics.len() {
        for j in (i + 1)..all_topics.len() {
            let sim = matrix[i][j];
            if all_topics[i].to_lowercase() == all_topics[j].to_lowercase() {
                lexical_duplicates += 1;
                penalties.push(LEXICAL_DUPLICATE_PENALTY);
            } else if sim > NEAR_DUPLICATE_CUTOFF {
                let mut penalty = (sim - NEAR_DUPLICATE_CUTOFF).powi(2);
                if sim > SEVERE_DUPLICATE_CUTOFF {
                    penalty += (sim - NEAR_DUPLICATE_CUTOFF).powi(3);
                }
                penalties.push(penalty);
            }
        }
    }

    let base_score = mean(&penalties);
    let correction = ((penalties.len() as f64 / all_topics.len() as f64).powf(0.8)
        + lexical_duplicates as f64 * LEXICAL_DUPLICATE_WEIGHT)
        .min(1.0);
    Ok((base_score * correction).min(1.0))
}

/// Fraction of distinct course topics with a confidently relevant
/// reference match (similarity above 0.7), capped at 1.
pub fn relevance<E: Embedder + ?Sized>(
    outline: &Outline,
    reference_topics: &[&str],
    session: &mut EmbeddingSession<'_, E>,
) -> Result<f64> {
    let course_topics = outline.distinct_topics();
    if course_topics.is_empty() || reference_topics.is_empty() {
        return Ok(0.0);
    }

    let course_vectors = session.embed(&course_topics)?;
    let reference_vectors = session.embed(reference_topics)?;
    let matrix = similarity_matrix(&course_vectors, &reference_vectors);

    let relevant = matrix
        .iter()
        .filter(|row| row_max(row) > RELEVANCE_CUTOFF)
        .count();
    Ok((relevant as f64 / course_topics.len() as f64).min(1.0))
}

/// Fraction of distinct course topics with no strong reference match
/// (best similarity below 0.85), capped at 1.
///
/// With no reference topics at all, every course topic is extraneous.
pub fn extra_topics_penalty<E: Embedder + ?Sized>(
    outline: &Outline,
    reference_topics: &[&str],
    session: &mut EmbeddingSession<'_, E>,
) -> Result<f64> {
    let course_topics = outline.distinct_topics();
    if course_topics.is_empty() {
        return Ok(0.0);
    }
    if reference_topics.is_empty() {
        return Ok(1.0);
    }

    let course_vectors = session.embed(&course_topics)?;
    let reference_vectors = session.embed(reference_topics)?;
    let matrix = similarity_matrix(&course_vectors, &reference_vectors);

    let extra = matrix
        .iter()
        .filter(|row| row_max(row) < EXTRA_CUTOFF)
        .count();
    Ok((extra as f64 / course_topics.len() as f64).min(1.0))
}
