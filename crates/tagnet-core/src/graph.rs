//! Tag co-occurrence graph: the contract between graph builder and layout.
//!
//! This is a trait rather than a concrete type so that the layout engine
//! and exporters don't depend on the graph backend.

use serde::{Deserialize, Serialize};

/// A core tag selected into the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagNode {
    /// The tag name, unique within a graph.
    pub id: String,
    pub category: String,
    /// Number of filtered records whose active core tags include this tag.
    pub mention_count: u64,
    /// Display colour (hex) of the node's category.
    pub color: String,
}

/// An undirected edge between two core tags.
///
/// `u` sorts before `v`. The weight is always strictly above the
/// builder's threshold (> 1 by default).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEdge {
    pub u: String,
    pub v: String,
    pub weight: u64,
}

/// Read-only view of a built tag graph.
pub trait TagGraph {
    /// Nodes in construction order.
    fn nodes(&self) -> Vec<&TagNode>;

    /// Edges in construction order.
    fn edges(&self) -> Vec<&TagEdge>;

    /// Look up a node by tag name.
    fn node(&self, id: &str) -> Option<&TagNode>;

    /// Edge between two tags, in either orientation.
    fn edge(&self, a: &str, b: &str) -> Option<&TagEdge>;

    /// Neighbours of a tag with the connecting edge weight.
    fn neighbors(&self, id: &str) -> Vec<(&TagNode, u64)>;

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    /// An empty graph means "insufficient data", not a failure.
    fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Largest edge weight, or 0 without edges.
    fn max_edge_weight(&self) -> u64 {
        self.edges().iter().map(|e| e.weight).max().unwrap_or(0)
    }

    /// Largest node mention count, or 0 without nodes.
    fn max_mention_count(&self) -> u64 {
        self.nodes().iter().map(|n| n.mention_count).max().unwrap_or(0)
    }
}
