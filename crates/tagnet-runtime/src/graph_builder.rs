//! Graph builder: top-K core tags and their thresholded co-occurrence edges.
//!
//! The built graph is backed by petgraph's `Graph` with a HashMap index
//! for O(1) node lookup by tag name. It is constructed fresh per
//! analysis target and never mutated afterwards.

use crate::aggregate::co_occurrence;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Undirected;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tagnet_core::dictionary::TagDictionary;
use tagnet_core::error::{Result, TagnetError};
use tagnet_core::filter::RecordPredicate;
use tagnet_core::graph::{TagEdge, TagGraph, TagNode};
use tagnet_core::types::Record;
use tracing::debug;

/// Default number of core tags selected per category.
pub const DEFAULT_TOP_K: usize = 5;

/// Edges need a weight strictly above this.
pub const DEFAULT_EDGE_THRESHOLD: u64 = 1;

const FALLBACK_COLOR: &str = "#888888";

/// Petgraph-backed tag co-occurrence graph.
#[derive(Debug, Clone)]
pub struct PetTagGraph {
    graph: Graph<TagNode, TagEdge, Undirected>,
    node_index: HashMap<String, NodeIndex>,
}

impl PetTagGraph {
    pub fn new() -> Self {
        Self {
            graph: Graph::new_undirected(),
            node_index: HashMap::new(),
        }
    }

    fn add_node(&mut self, node: TagNode) {
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
    }

    fn add_edge(&mut self, edge: TagEdge) {
        let Some(&a) = self.node_index.get(&edge.u) else {
            return;
        };
        let Some(&b) = self.node_index.get(&edge.v) else {
            return;
        };
        self.graph.add_edge(a, b, edge);
    }
}

impl Default for PetTagGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TagGraph for PetTagGraph {
    fn nodes(&self) -> Vec<&TagNode> {
        self.graph.node_indices().map(|idx| &self.graph[idx]).collect()
    }

    fn edges(&self) -> Vec<&TagEdge> {
        self.graph.edge_indices().map(|idx| &self.graph[idx]).collect()
    }

    fn node(&self, id: &str) -> Option<&TagNode> {
        self.node_index.get(id).map(|idx| &self.graph[*idx])
    }

    fn edge(&self, a: &str, b: &str) -> Option<&TagEdge> {
        let a = self.node_index.get(a)?;
        let b = self.node_index.get(b)?;
        let edge_idx = self.graph.find_edge(*a, *b)?;
        Some(&self.graph[edge_idx])
    }

    fn neighbors(&self, id: &str) -> Vec<(&TagNode, u64)> {
        let Some(&node_idx) = self.node_index.get(id) else {
            return Vec::new();
        };

        self.graph
            .edges(node_idx)
            .map(|edge| {
                let other_idx = if edge.source() == node_idx {
                    edge.target()
                } else {
                    edge.source()
                };
                (&self.graph[other_idx], edge.weight().weight)
            })
            .collect()
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Configurable graph construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphBuilder {
    top_k: usize,
    categories: Option<Vec<String>>,
    edge_threshold: u64,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            categories: None,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
        }
    }
}

impl GraphBuilder {
    pub fn new(top_k: usize) -> Self {
        Self {
            top_k,
            ..Self::default()
        }
    }

    /// Restrict core-node selection to these categories, in this order.
    /// Defaults to every dictionary category.
    pub fn categories<S: Into<String>>(mut self, categories: impl IntoIterator<Item = S>) -> Self {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    pub fn edge_threshold(mut self, threshold: u64) -> Self {
        self.edge_threshold = threshold;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Build the graph over the records matching `predicate`.
    ///
    /// Fails only on configuration defects: `top_k == 0` or a category
    /// the dictionary does not define.
    pub fn build<P: RecordPredicate + ?Sized>(
        &self,
        records: &[Record],
        predicate: &P,
        dictionary: &TagDictionary,
    ) -> Result<PetTagGraph> {
        if self.top_k == 0 {
            return Err(TagnetError::invalid_config(
                "top_k",
                "0",
                "at least one tag per category is required",
            ));
        }
        let categories: Vec<String> = match &self.categories {
            Some(list) => {
                dictionary.require_categories(list.as_slice())?;
                list.clone()
            }
            None => dictionary
                .category_names()
                .into_iter()
                .map(String::from)
                .collect(),
        };
        Ok(assemble(
            records,
            predicate,
            dictionary,
            categories.as_slice(),
            self.top_k,
            self.edge_threshold,
        ))
    }
}

/// Build the top-K tag graph over every dictionary category, with the
/// default edge threshold.
///
/// Zero filtered records, or `k == 0`, yield an empty graph.
pub fn build_graph<P: RecordPredicate + ?Sized>(
    records: &[Record],
    predicate: &P,
    dictionary: &TagDictionary,
    k: usize,
) -> PetTagGraph {
    let categories: Vec<&str> = dictionary.category_names();
    assemble(
        records,
        predicate,
        dictionary,
        categories.as_slice(),
        k,
        DEFAULT_EDGE_THRESHOLD,
    )
}

fn assemble<P, S>(
    records: &[Record],
    predicate: &P,
    dictionary: &TagDictionary,
    categories: &[S],
    k: usize,
    edge_threshold: u64,
) -> PetTagGraph
where
    P: RecordPredicate + ?Sized,
    S: AsRef<str>,
{
    let frequencies = co_occurrence(records, predicate, categories);

    // Core tags in category order, then rank. A tag that ranks in
    // several categories keeps the first one.
    let mut core: Vec<(String, String)> = Vec::new();
    let mut core_index: HashMap<String, usize> = HashMap::new();
    for category in categories {
        let category = category.as_ref();
        for tag in frequencies.get(category).top_k(k) {
            if !core_index.contains_key(&tag) {
                core_index.insert(tag.clone(), core.len());
                core.push((tag, category.to_string()));
            }
        }
    }

    let mut mentions = vec![0u64; core.len()];
    let mut pairs: BTreeMap<(String, String), u64> = BTreeMap::new();
    for record in records.iter().filter(|r| predicate.matches(r)) {
        let active: BTreeSet<&str> = record
            .tags
            .all_tags()
            .filter(|t| core_index.contains_key(*t))
            .collect();
        for tag in &active {
            mentions[core_index[*tag]] += 1;
        }
        let active: Vec<&str> = active.into_iter().collect();
        for (i, a) in active.iter().enumerate() {
            for b in &active[i + 1..] {
                *pairs.entry((a.to_string(), b.to_string())).or_insert(0) += 1;
            }
        }
    }

    let mut graph = PetTagGraph::new();
    for ((tag, category), mention_count) in core.into_iter().zip(mentions) {
        if mention_count == 0 {
            continue;
        }
        let color = dictionary
            .category_color(&category)
            .unwrap_or(FALLBACK_COLOR)
            .to_string();
        graph.add_node(TagNode {
            id: tag,
            category,
            mention_count,
            color,
        });
    }
    for ((u, v), weight) in pairs {
        if weight > edge_threshold {
            graph.add_edge(TagEdge { u, v, weight });
        }
    }

    debug!(
        filtered = frequencies.filtered_records,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "tag graph built"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Corpus, RawRecord};
    use tagnet_core::filter::RecordFilter;
    use tagnet_core::types::{RecordId, SourceKind, TagAssignment};

    fn dict() -> TagDictionary {
        TagDictionary::builder("graph-test")
            .category("color", |c| {
                c.color("#B85C5C")
                    .tag("brown", ["brown"])
                    .tag("red", ["red"])
                    .tag("ash", ["ash"])
            })
            .category("tech", |c| {
                c.color("#E08A6F")
                    .tag("foam", ["foam"])
                    .tag("botanical", ["plant"])
            })
            .build()
            .unwrap()
    }

    fn record(id: usize, color: &[&str], tech: &[&str]) -> Record {
        let mut tags = TagAssignment::new();
        tags.push("color", color.iter().map(|s| s.to_string()).collect());
        tags.push("tech", tech.iter().map(|s| s.to_string()).collect());
        Record {
            id: RecordId(id),
            text: String::new(),
            weight: 0.0,
            platform: "xhs".into(),
            source: SourceKind::Post,
            tags,
            markers: Default::default(),
        }
    }

    #[test]
    fn edges_need_more_than_one_record() {
        let records = vec![
            record(0, &["brown"], &["foam"]),
            record(1, &["brown"], &["foam"]),
            record(2, &["red"], &["foam"]),
        ];
        let graph = build_graph(&records, &RecordFilter::All, &dict(), 5);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge("foam", "brown").map(|e| e.weight), Some(2));
        assert!(graph.edge("red", "foam").is_none());
        assert_eq!(graph.node("foam").unwrap().mention_count, 3);
        assert_eq!(graph.node("brown").unwrap().color, "#B85C5C");
    }

    #[test]
    fn shared_tag_name_is_one_node_in_its_first_category() {
        let d = TagDictionary::builder("shared")
            .category("tech", |c| c.color("#E08A6F").tag("foam", ["foam"]))
            .category("archetype", |c| {
                c.color("#A9A9A9")
                    .tag("foam", ["foam", "bubble"])
                    .tag("classic", ["cream"])
            })
            .build()
            .unwrap();
        let raw = vec![
            RawRecord::new("foam cream"),
            RawRecord::new("foam cream"),
            RawRecord::new("bubble"),
        ];
        let corpus = Corpus::from_raw("shared", &raw, &d);
        let graph = build_graph(corpus.records(), &RecordFilter::All, &d, 5);

        assert_eq!(graph.node_count(), 2);
        let foam = graph.node("foam").unwrap();
        assert_eq!(foam.category, "tech");
        assert_eq!(foam.color, "#E08A6F");
        // Once per record, even when both categories matched.
        assert_eq!(foam.mention_count, 3);
        assert_eq!(graph.edge("foam", "classic").map(|e| e.weight), Some(2));
    }

    #[test]
    fn top_k_limits_core_nodes() {
        let records = vec![
            record(0, &["brown", "red"], &[]),
            record(1, &["brown"], &[]),
            record(2, &["ash"], &[]),
        ];
        let graph = build_graph(&records, &RecordFilter::All, &dict(), 1);
        let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["brown"]);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn neighbors_report_weights() {
        let records = vec![
            record(0, &["brown"], &["foam", "botanical"]),
            record(1, &["brown"], &["foam", "botanical"]),
        ];
        let graph = build_graph(&records, &RecordFilter::All, &dict(), 5);
        let mut neighbors: Vec<(String, u64)> = graph
            .neighbors("brown")
            .into_iter()
            .map(|(n, w)| (n.id.clone(), w))
            .collect();
        neighbors.sort();
        assert_eq!(neighbors, vec![("botanical".to_string(), 2), ("foam".to_string(), 2)]);
        assert_eq!(graph.max_edge_weight(), 2);
    }

    #[test]
    fn empty_subset_builds_empty_graph() {
        let records = vec![record(0, &["brown"], &["foam"])];
        let graph = build_graph(&records, &RecordFilter::marker("absent"), &dict(), 5);
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn builder_validates_configuration() {
        let records = vec![record(0, &["brown"], &["foam"])];
        let d = dict();
        assert!(GraphBuilder::new(0)
            .build(&records, &RecordFilter::All, &d)
            .unwrap_err()
            .is_config());
        assert!(GraphBuilder::new(5)
            .categories(["color", "nope"])
            .build(&records, &RecordFilter::All, &d)
            .is_err());
    }

    #[test]
    fn builder_restricts_categories_and_threshold() {
        let records = vec![
            record(0, &["brown"], &["foam"]),
            record(1, &["brown"], &["foam"]),
        ];
        let graph = GraphBuilder::new(5)
            .categories(["tech"])
            .build(&records, &RecordFilter::All, &dict())
            .unwrap();
        assert_eq!(graph.node_count(), 1);

        let strict = GraphBuilder::new(5)
            .edge_threshold(2)
            .build(&records, &RecordFilter::All, &dict())
            .unwrap();
        assert_eq!(strict.edge_count(), 0);
    }
}
