//! Metrics computed from a single outline, no reference required.

use super::{mean, std_pop};
use crate::embedding::{self_similarity_matrix, Embedder, EmbeddingSession};
use crate::errors::Result;
use crate::outline::Outline;

/// Spread damping cap for section coherence
const COHERENCE_STD_CAP: f64 = 0.5;

/// Flat penalty applied when one section-to-section jump dominates
const JUMP_PENALTY: f64 = 0.1;

/// Mean intra-section topic similarity, damped by its spread.
///
/// For every section with at least two topics, the full pairwise cosine
/// matrix of its topics (diagonal included) is reduced to
/// `mean * (1 - min(std, 0.5))`. Sections with fewer than two topics are
/// skipped entirely — they contribute nothing, not zero. The overall
/// score is the mean over qualifying sections, floored at 0; an outline
/// with no qualifying section scores 0.
pub fn semantic_coherence<E: Embedder + ?Sized>(
    outline: &Outline,
    session: &mut EmbeddingSession<'_, E>,
) -> Result<f64> {
    let mut scores = Vec::new();
    for section in outline.sections() {
        if section.topics.len() < 2 {
            continue;
        }
        let texts: Vec<&str> = section.topics.iter().map(String::as_str).collect();
        let vectors = session.embed(&texts)?;
        let matrix = self_similarity_matrix(&vectors);
        let cells: Vec<f64> = matrix.iter().flatten().copied().collect();
        let mean_sim = mean(&cells);
        let std_sim = std_pop(&cells);
        scores.push(mean_sim * (1.0 - std_sim.min(COHERENCE_STD_CAP)));
    }

    if scores.is_empty() {
        return Ok(0.0);
    }
    Ok(mean(&scores).max(0.0))
}

/// How evenly topics are distributed across sections.
///
/// Combines the coefficient of variation of per-section topic counts with
/// the largest jump between sections adjacent in outline order, plus a
/// flat 0.1 penalty when that jump exceeds half the mean count. Outlines
/// with fewer than two sections are trivially balanced (1.0). Clamped at
/// 0 — the penalty subtraction can overshoot.
pub fn structural_balance(outline: &Outline) -> f64 {
    let counts: Vec<f64> = outline.topic_counts().iter().map(|&c| c as f64).collect();
    if counts.len() < 2 {
        return 1.0;
    }

    let mean_topics = mean(&counts);
    if mean_topics == 0.0 {
        // Every section is empty: nothing to weigh against anything.
        return 1.0;
    }
    let max_count = counts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let max_jump = counts
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .fold(0.0, f64::max);

    let mut balance = 1.0 - ((std_pop(&counts) / mean_topics) + (max_jump / max_count)) / 2.0;
    if max_jump > 0.5 * mean_topics {
        balance -= JUMP_PENALTY;
    }
    balance.max(0.0)
}
