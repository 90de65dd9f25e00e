//! # outline_eval
//!
//! Structural and semantic quality scoring for outline-style course
//! documents.
//!
//! A course outline (ordered sections, each holding an ordered list of
//! topic strings) is scored by a set of independent metrics (semantic
//! coherence, structural balance) and, when a reference outline is
//! supplied, reference-relative metrics (topic flow, sequence and graph
//! coverage, redundancy, relevance, extra-topics penalty). Sub-scores are
//! folded into a bounded [0, 1] composite with deterministic,
//! explainable components and rule-generated advice.
//!
//! ## Features
//!
//! - **Injected oracle**: text embedding is a trait seam
//!   ([`Embedder`]), never process-wide state, so evaluations are
//!   isolated and trivially testable with doubles
//! - **Deterministic**: identical inputs and a deterministic oracle
//!   produce bit-identical results
//! - **Graceful degradation**: malformed or empty outline text scores as
//!   degenerate values, never an error; only an oracle failure aborts an
//!   evaluation
//!
//! ## Example
//!
//! ```no_run
//! use outline_eval::{evaluate_course, Embedder, Result};
//!
//! struct MyOracle;
//! impl Embedder for MyOracle {
//!     fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
//!         // call your embedding backend here
//!         unimplemented!()
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let course = "1. Basics\n- Variables\n- Types\n2. Control Flow\n- Loops\n";
//! let result = evaluate_course(course, None, None, &MyOracle)?;
//! println!("final score: {}", result.final_score);
//! # Ok(())
//! # }
//! ```

pub mod advice;
pub mod embedding;
pub mod errors;
pub mod evaluation;
pub mod graph;
pub mod metrics;
pub mod outline;
pub mod thresholds;

// Re-export commonly used types
pub use embedding::{cosine_similarity, Embedder, EmbeddingSession};
pub use errors::{EvalError, Result};
pub use evaluation::{evaluate_course, EvaluationResult, Evaluator};
pub use graph::{semantic_node_mapping, TopicGraph};
pub use outline::{parse_outline, Outline, Section};
pub use thresholds::ThresholdSet;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
