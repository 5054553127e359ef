//! Edge-list exporter: weighted tag pairs with summary statistics.
//!
//! Exports a built tag graph as (source, target, weight) rows, heaviest
//! first, suitable for downstream tables or a renderer.

use crate::analysis::TargetAnalysis;
use serde::Serialize;
use std::path::Path;
use tagnet_core::error::Result;
use tagnet_core::graph::{TagGraph, TagNode};
use tagnet_core::types::Position;

/// One co-occurrence edge with its endpoint categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedEdge {
    pub source: String,
    pub source_category: String,
    pub target: String,
    pub target_category: String,
    pub weight: u64,
}

/// Export all edges, heaviest first; ties by endpoint names.
pub fn export_edges<G: TagGraph + ?Sized>(graph: &G) -> Vec<WeightedEdge> {
    let category = |id: &str| {
        graph
            .node(id)
            .map(|n| n.category.clone())
            .unwrap_or_else(|| "?".to_string())
    };

    let mut edges: Vec<WeightedEdge> = graph
        .edges()
        .into_iter()
        .map(|e| WeightedEdge {
            source: e.u.clone(),
            source_category: category(e.u.as_str()),
            target: e.v.clone(),
            target_category: category(e.v.as_str()),
            weight: e.weight,
        })
        .collect();

    edges.sort_by(|a, b| {
        b.weight
            .cmp(&a.weight)
            .then_with(|| a.source.cmp(&b.source))
            .then_with(|| a.target.cmp(&b.target))
    });
    edges
}

/// Statistics about exported edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EdgeStats {
    pub total: usize,
    pub mean_weight: f64,
    pub median_weight: f64,
    pub max_weight: u64,
    pub min_weight: u64,
}

/// Weight statistics over an edge list. All zero when empty.
pub fn edge_stats(edges: &[WeightedEdge]) -> EdgeStats {
    if edges.is_empty() {
        return EdgeStats::default();
    }

    let mut weights: Vec<u64> = edges.iter().map(|e| e.weight).collect();
    weights.sort_unstable();
    let total = weights.len();
    let mean_weight = weights.iter().sum::<u64>() as f64 / total as f64;
    let median_weight = if total % 2 == 0 {
        (weights[total / 2 - 1] + weights[total / 2]) as f64 / 2.0
    } else {
        weights[total / 2] as f64
    };

    EdgeStats {
        total,
        mean_weight,
        median_weight,
        max_weight: weights[total - 1],
        min_weight: weights[0],
    }
}

/// A node with its layout position.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedNode {
    #[serde(flatten)]
    pub node: TagNode,
    pub position: Option<Position>,
}

/// Full export of one target analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisExport {
    pub target: String,
    pub filtered_records: usize,
    pub insufficient_data: bool,
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<WeightedEdge>,
    pub stats: EdgeStats,
}

impl AnalysisExport {
    pub fn from_analysis(analysis: &TargetAnalysis) -> Self {
        let edges = export_edges(&analysis.graph);
        let stats = edge_stats(&edges);
        let nodes = analysis
            .graph
            .nodes()
            .into_iter()
            .map(|n| PlacedNode {
                node: n.clone(),
                position: analysis.layout.get(&n.id),
            })
            .collect();
        Self {
            target: analysis.target.clone(),
            filtered_records: analysis.filtered_records,
            insufficient_data: analysis.is_insufficient(),
            nodes,
            edges,
            stats,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;
    use crate::corpus::Corpus;
    use tagnet_core::dictionary::TagDictionary;
    use tagnet_core::filter::RecordFilter;

    fn edge(source: &str, target: &str, weight: u64) -> WeightedEdge {
        WeightedEdge {
            source: source.into(),
            source_category: "color".into(),
            target: target.into(),
            target_category: "tech".into(),
            weight,
        }
    }

    #[test]
    fn stats_of_empty_list_are_zero() {
        assert_eq!(edge_stats(&[]), EdgeStats::default());
    }

    #[test]
    fn stats_use_midpoint_median() {
        let edges = vec![edge("a", "b", 2), edge("a", "c", 8), edge("b", "c", 4), edge("c", "d", 6)];
        let stats = edge_stats(&edges);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.mean_weight, 5.0);
        assert_eq!(stats.median_weight, 5.0);
        assert_eq!((stats.min_weight, stats.max_weight), (2, 8));
    }

    #[test]
    fn export_is_sorted_and_serializable() {
        let dict = TagDictionary::builtin();
        let corpus = Corpus::from_embedded(&dict);
        let analysis = Analyzer::new(&dict)
            .analyze(corpus.records(), &RecordFilter::marker("whitening"), "whitening")
            .unwrap();
        let export = AnalysisExport::from_analysis(&analysis);

        assert!(!export.insufficient_data);
        assert!(export.edges.windows(2).all(|w| w[0].weight >= w[1].weight));
        assert!(export.nodes.iter().all(|n| n.position.is_some()));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whitening.json");
        export.write_json(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["target"], "whitening");
        assert!(value["nodes"][0]["id"].is_string());
    }
}
