//! Scene geometry: what an external renderer needs to draw a tag graph.
//!
//! Marker sizes and line widths are relative to the largest node and
//! edge of the graph, so scenes from different targets are comparable
//! in shape but not in absolute scale.

use serde::Serialize;
use tagnet_core::dictionary::TagDictionary;
use tagnet_core::error::Result;
use tagnet_core::graph::TagGraph;
use tagnet_core::types::{Position, Tag};
use tagnet_runtime::analysis::TargetAnalysis;
use tagnet_runtime::layout::Layout;

/// Smallest marker size; the largest node gets this plus [`NODE_SIZE_RANGE`].
pub const NODE_SIZE_MIN: f64 = 10.0;
pub const NODE_SIZE_RANGE: f64 = 50.0;
/// Thinnest line; the heaviest edge gets this plus [`EDGE_WIDTH_RANGE`].
pub const EDGE_WIDTH_MIN: f64 = 0.5;
pub const EDGE_WIDTH_RANGE: f64 = 8.0;

const UNSPECIFIED_COLOR: &str = "#A9A9A9";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub id: String,
    pub category: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: String,
    /// Hover text, e.g. `brown (12)`.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneEdge {
    pub source: String,
    pub target: String,
    pub from: Position,
    pub to: Position,
    pub width: f64,
    pub weight: u64,
}

/// A laid-out graph ready for drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub title: String,
    /// Set when the graph is empty; renderers show a notice instead.
    pub insufficient_data: bool,
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
}

impl Scene {
    /// Combine a graph with its layout. Nodes missing from the layout
    /// are placed at the origin.
    pub fn build<G: TagGraph + ?Sized>(title: impl Into<String>, graph: &G, layout: &Layout) -> Self {
        let max_mentions = graph.max_mention_count().max(1) as f64;
        let max_weight = graph.max_edge_weight().max(1) as f64;
        let position = |id: &str| layout.get(id).unwrap_or_default();

        let nodes = graph
            .nodes()
            .into_iter()
            .map(|n| {
                let p = position(n.id.as_str());
                SceneNode {
                    id: n.id.clone(),
                    category: n.category.clone(),
                    x: p.x,
                    y: p.y,
                    size: n.mention_count as f64 / max_mentions * NODE_SIZE_RANGE + NODE_SIZE_MIN,
                    color: n.color.clone(),
                    label: format!("{} ({})", n.id, n.mention_count),
                }
            })
            .collect();

        let edges = graph
            .edges()
            .into_iter()
            .map(|e| SceneEdge {
                source: e.u.clone(),
                target: e.v.clone(),
                from: position(e.u.as_str()),
                to: position(e.v.as_str()),
                width: e.weight as f64 / max_weight * EDGE_WIDTH_RANGE + EDGE_WIDTH_MIN,
                weight: e.weight,
            })
            .collect();

        Self {
            title: title.into(),
            insufficient_data: graph.is_empty(),
            nodes,
            edges,
        }
    }

    pub fn from_analysis(analysis: &TargetAnalysis) -> Self {
        Self::build(analysis.target.clone(), &analysis.graph, &analysis.layout)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One bar of a per-tag weight ranking, coloured with the tag's swatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwatchBar {
    pub label: String,
    pub total_weight: f64,
    pub color: String,
}

/// Bars for a `weight_sum_by_tag` ranking. Tags without a swatch fall
/// back to the category colour; `Unspecified` is grey.
pub fn swatch_bars(ranking: &[(Tag, f64)], dictionary: &TagDictionary, category: &str) -> Vec<SwatchBar> {
    let category_color = dictionary.category_color(category).unwrap_or(UNSPECIFIED_COLOR);
    ranking
        .iter()
        .map(|(tag, total)| {
            let color = match tag {
                Tag::Named(name) => dictionary.tag_color(category, name).unwrap_or(category_color),
                Tag::Unspecified => UNSPECIFIED_COLOR,
            };
            SwatchBar {
                label: tag.to_string(),
                total_weight: *total,
                color: color.to_string(),
            }
        })
        .collect()
}
