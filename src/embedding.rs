//! Embedding oracle seam and similarity helpers.
//!
//! The oracle is an injected capability rather than process-wide state:
//! every metric that needs vectors receives an [`EmbeddingSession`], which
//! memoizes embeddings by exact string identity for the lifetime of one
//! evaluation and batches cache misses into a single oracle call. The
//! memoization is a pure performance optimization — it never changes
//! observable results, since the oracle contract requires deterministic
//! output for identical input text.

use crate::errors::{EvalError, Result};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

/// External text-embedding service.
///
/// # Contract
///
/// - **Input**: a batch of strings.
/// - **Output**: one fixed-length vector per input string, in input order.
/// - **Deterministic**: identical input text yields identical vectors.
///
/// A failure (timeout, unavailable backend, malformed response) is terminal
/// for the evaluation that triggered it; the engine performs no retries and
/// no metric-level fallback.
pub trait Embedder {
    /// Embed a batch of texts, one vector per input in input order.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
}

impl<E: Embedder + ?Sized> Embedder for &E {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        (**self).embed(texts)
    }
}

/// Cosine similarity between two vectors, in [-1, 1].
///
/// Returns 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = f64::from(*x);
        let y = f64::from(*y);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Full course × reference similarity matrix.
///
/// Rows are filled in parallel; every cell is an independent pure
/// computation, so the result is bit-identical across runs.
pub fn similarity_matrix(rows: &[Vec<f32>], cols: &[Vec<f32>]) -> Vec<Vec<f64>> {
    rows.par_iter()
        .map(|row| cols.iter().map(|col| cosine_similarity(row, col)).collect())
        .collect()
}

/// Full pairwise similarity matrix of a vector set against itself,
/// with the diagonal pinned to exactly 1.0.
pub fn self_similarity_matrix(vectors: &[Vec<f32>]) -> Vec<Vec<f64>> {
    let mut matrix = similarity_matrix(vectors, vectors);
    for (i, row) in matrix.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    matrix
}

/// Per-evaluation embedding cache over an injected oracle.
///
/// Constructed fresh for each evaluation call and discarded after it;
/// there is no cross-request caching.
pub struct EmbeddingSession<'a, E: Embedder + ?Sized> {
    oracle: &'a E,
    cache: FxHashMap<String, Vec<f32>>,
}

impl<'a, E: Embedder + ?Sized> EmbeddingSession<'a, E> {
    /// Create a session over the given oracle with an empty cache.
    pub fn new(oracle: &'a E) -> Self {
        Self {
            oracle,
            cache: FxHashMap::default(),
        }
    }

    /// Embed `texts`, returning one vector per input in input order.
    ///
    /// Cache misses are deduplicated and sent to the oracle in a single
    /// batch call; hits are served from the session cache.
    pub fn embed(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let misses: Vec<&str> = texts
            .iter()
            .copied()
            .filter(|t| !self.cache.contains_key(*t) && seen.insert(*t))
            .collect();

        if !misses.is_empty() {
            let vectors = self.oracle.embed(&misses)?;
            if vectors.len() != misses.len() {
                return Err(EvalError::embedding(format!(
                    "oracle returned {} vectors for {} inputs",
                    vectors.len(),
                    misses.len()
                )));
            }
            for (text, vector) in misses.into_iter().zip(vectors) {
                self.cache.insert(text.to_string(), vector);
            }
        }

        texts
            .iter()
            .map(|t| {
                self.cache
                    .get(*t)
                    .cloned()
                    .ok_or_else(|| EvalError::internal(format!("missing cached embedding for {t:?}")))
            })
            .collect()
    }

    /// Number of distinct strings embedded so far in this session.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Oracle double that serves fixed-dimension basis-like vectors and
    /// counts how many batch calls it received.
    struct CountingEmbedder {
        calls: Cell<usize>,
    }

    impl CountingEmbedder {
        fn new() -> Self {
            Self { calls: Cell::new(0) }
        }
    }

    impl Embedder for CountingEmbedder {
        fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            self.calls.set(self.calls.get() + 1);
            Ok(texts
                .iter()
                .map(|t| {
                    let mut v = vec![0.0f32; 4];
                    v[t.len() % 4] = 1.0;
                    v
                })
                .collect())
        }
    }

    struct TruncatingEmbedder;

    impl Embedder for TruncatingEmbedder {
        fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().skip(1).map(|_| vec![1.0]).collect())
        }
    }

    #[test]
    fn test_cosine_identical() {
        let v = vec![0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 2.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_self_similarity_diagonal_is_one() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 2.0], vec![0.0, 0.0]];
        let matrix = self_similarity_matrix(&vectors);
        for (i, row) in matrix.iter().enumerate() {
            assert_eq!(row[i], 1.0);
        }
        assert!(matrix[0][1].abs() < 1e-9);
    }

    #[test]
    fn test_session_memoizes_across_calls() {
        let oracle = CountingEmbedder::new();
        let mut session = EmbeddingSession::new(&oracle);

        session.embed(&["alpha", "beta"]).unwrap();
        assert_eq!(oracle.calls.get(), 1);

        // Both strings cached: no further oracle round trip.
        session.embed(&["beta", "alpha"]).unwrap();
        assert_eq!(oracle.calls.get(), 1);

        // One miss triggers exactly one more batch call.
        session.embed(&["alpha", "gamma"]).unwrap();
        assert_eq!(oracle.calls.get(), 2);
        assert_eq!(session.cached_count(), 3);
    }

    #[test]
    fn test_session_dedups_within_one_call() {
        let oracle = CountingEmbedder::new();
        let mut session = EmbeddingSession::new(&oracle);

        let vectors = session.embed(&["x", "x", "x"]).unwrap();
        assert_eq!(oracle.calls.get(), 1);
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0], vectors[2]);
    }

    #[test]
    fn test_session_rejects_short_oracle_response() {
        let mut session = EmbeddingSession::new(&TruncatingEmbedder);
        let err = session.embed(&["a", "b"]).unwrap_err();
        assert!(err.is_embedding_failure());
    }

    #[test]
    fn test_similarity_matrix_shape() {
        let rows = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let cols = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
        let matrix = similarity_matrix(&rows, &cols);
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix[0].len(), 3);
        assert!((matrix[0][0] - 1.0).abs() < 1e-9);
        assert!((matrix[0][2] - (0.5f64).sqrt()).abs() < 1e-9);
    }
}
