//! Topic adjacency graphs and greedy semantic node alignment.
//!
//! A [`TopicGraph`] links topics that sit next to each other inside the
//! same section: every section contributes a path graph over its topic
//! list. Nodes carry exact topic strings, so graphs of different sections
//! share a node only when topic strings collide verbatim.

use crate::embedding::{similarity_matrix, Embedder, EmbeddingSession};
use crate::errors::Result;
use crate::outline::Outline;
use rustc_hash::{FxHashMap, FxHashSet};

/// Undirected graph over distinct topic strings, edges between topics
/// adjacent within the same section.
#[derive(Debug, Clone, Default)]
pub struct TopicGraph {
    /// Maps topic string -> node ID
    topic_to_id: FxHashMap<String, u32>,
    /// Node storage, insertion order
    nodes: Vec<String>,
    /// Canonicalized (lo, hi) node-ID pairs
    edges: FxHashSet<(u32, u32)>,
}

impl TopicGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the topic graph of an outline.
    ///
    /// Adjacent duplicate topics produce a self-loop, which counts as an
    /// edge like any other.
    pub fn from_outline(outline: &Outline) -> Self {
        let mut graph = Self::new();
        for section in outline.sections() {
            for topic in &section.topics {
                graph.get_or_create_node(topic);
            }
            for pair in section.topics.windows(2) {
                let a = graph.get_or_create_node(&pair[0]);
                let b = graph.get_or_create_node(&pair[1]);
                graph.add_edge(a, b);
            }
        }
        graph
    }

    /// Get or create a node for the given topic, returning its ID
    pub fn get_or_create_node(&mut self, topic: &str) -> u32 {
        if let Some(&id) = self.topic_to_id.get(topic) {
            return id;
        }
        let id = self.nodes.len() as u32;
        self.topic_to_id.insert(topic.to_string(), id);
        self.nodes.push(topic.to_string());
        id
    }

    /// Insert the undirected edge (a, b)
    pub fn add_edge(&mut self, a: u32, b: u32) {
        self.edges.insert((a.min(b), a.max(b)));
    }

    /// Node topic strings in insertion order
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Canonicalized edge set
    pub fn edges(&self) -> &FxHashSet<(u32, u32)> {
        &self.edges
    }

    /// Node ID for a topic string, if present
    pub fn node_id(&self, topic: &str) -> Option<u32> {
        self.topic_to_id.get(topic).copied()
    }

    /// Whether the undirected edge (a, b) exists
    pub fn has_edge(&self, a: u32, b: u32) -> bool {
        self.edges.contains(&(a.min(b), a.max(b)))
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no nodes (and therefore no edges)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Greedy best-similarity mapping from course-graph nodes to
/// reference-graph nodes.
///
/// Each course node independently maps to the reference node of maximum
/// cosine similarity, recorded only when that maximum exceeds `cutoff`.
/// The matching is deliberately not a global bipartite assignment: two
/// course nodes may map to the same reference node, and no mapping is
/// revisited once made. Ties keep the earliest reference node.
pub fn semantic_node_mapping<E: Embedder + ?Sized>(
    course: &TopicGraph,
    reference: &TopicGraph,
    session: &mut EmbeddingSession<'_, E>,
    cutoff: f64,
) -> Result<FxHashMap<u32, u32>> {
    if course.is_empty() || reference.is_empty() {
        return Ok(FxHashMap::default());
    }

    let course_texts: Vec<&str> = course.nodes().iter().map(String::as_str).collect();
    let reference_texts: Vec<&str> = reference.nodes().iter().map(String::as_str).collect();
    let course_vectors = session.embed(&course_texts)?;
    let reference_vectors = session.embed(&reference_texts)?;
    let matrix = similarity_matrix(&course_vectors, &reference_vectors);

    let mut mapping = FxHashMap::default();
    for (i, row) in matrix.iter().enumerate() {
        let mut best_sim = 0.0f64;
        let mut best_ref: Option<u32> = None;
        for (j, &sim) in row.iter().enumerate() {
            if sim > best_sim {
                best_sim = sim;
                best_ref = Some(j as u32);
            }
        }
        if best_sim > cutoff {
            if let Some(j) = best_ref {
                mapping.insert(i as u32, j);
            }
        }
    }
    Ok(mapping)
}
