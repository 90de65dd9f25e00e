//! Shared embedding-oracle doubles for integration and property tests.

// Not every test binary uses every double.
#![allow(dead_code)]

use outline_eval::{Embedder, EvalError, Result};
use std::collections::HashMap;

/// Deterministic oracle with an explicit vocabulary; words outside the
/// vocabulary fall back to a one-hot vector chosen by string hash, so
/// distinct unknown words are almost always orthogonal and identical
/// words always coincide.
pub struct VocabEmbedder {
    vocab: HashMap<String, Vec<f32>>,
}

impl VocabEmbedder {
    pub fn new(entries: &[(&str, &[f32])]) -> Self {
        let vocab = entries
            .iter()
            .map(|(word, vector)| (word.to_string(), vector.to_vec()))
            .collect();
        Self { vocab }
    }

    pub fn empty() -> Self {
        Self {
            vocab: HashMap::new(),
        }
    }
}

impl Embedder for VocabEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                self.vocab
                    .get(*t)
                    .cloned()
                    .unwrap_or_else(|| fallback_vector(t))
            })
            .collect())
    }
}

/// One-hot fallback over 32 dimensions, keyed by FNV-1a of the text.
pub fn fallback_vector(text: &str) -> Vec<f32> {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in text.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    let mut vector = vec![0.0f32; 32];
    vector[(hash % 32) as usize] = 1.0;
    vector
}

/// Oracle that always fails, for terminal-error tests.
pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Err(EvalError::embedding("backend unavailable"))
    }
}
