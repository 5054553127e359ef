//! Per-target analysis: frequencies, matrix, graph and layout in one pass.
//!
//! Each target gets its own private counters and graph, so several
//! targets over the same records run in parallel without any locking.

use crate::aggregate::{co_matrix, co_occurrence, CoMatrix, CoOccurrence};
use crate::graph_builder::{GraphBuilder, PetTagGraph};
use crate::layout::{layout_with, Layout, LayoutConfig};
use rayon::prelude::*;
use tagnet_core::dictionary::TagDictionary;
use tagnet_core::error::Result;
use tagnet_core::filter::{RecordFilter, RecordPredicate};
use tagnet_core::graph::TagGraph;
use tagnet_core::types::Record;
use tracing::{info, warn};

/// Everything computed for one target filter.
#[derive(Debug, Clone)]
pub struct TargetAnalysis {
    /// Label of the target filter.
    pub target: String,
    pub filtered_records: usize,
    pub frequencies: CoOccurrence,
    pub matrix: CoMatrix,
    pub graph: PetTagGraph,
    pub layout: Layout,
}

impl TargetAnalysis {
    /// An empty graph must be shown as "insufficient data".
    pub fn is_insufficient(&self) -> bool {
        self.graph.is_empty()
    }
}

/// Pipeline runner bound to one dictionary configuration.
#[derive(Debug, Clone)]
pub struct Analyzer<'d> {
    dictionary: &'d TagDictionary,
    builder: GraphBuilder,
    layout: LayoutConfig,
    matrix_axes: Option<(String, String)>,
}

impl<'d> Analyzer<'d> {
    pub fn new(dictionary: &'d TagDictionary) -> Self {
        Self {
            dictionary,
            builder: GraphBuilder::default(),
            layout: LayoutConfig::default(),
            matrix_axes: None,
        }
    }

    pub fn with_builder(mut self, builder: GraphBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Categories for the co-occurrence matrix (rows, columns).
    pub fn with_matrix(mut self, rows: impl Into<String>, cols: impl Into<String>) -> Self {
        self.matrix_axes = Some((rows.into(), cols.into()));
        self
    }

    pub fn dictionary(&self) -> &'d TagDictionary {
        self.dictionary
    }

    /// Check the configuration without running anything.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        if let Some((rows, cols)) = &self.matrix_axes {
            self.dictionary.require_categories(&[rows, cols])?;
        }
        Ok(())
    }

    /// Run the pipeline for a single target.
    pub fn analyze<P>(&self, records: &[Record], target: &P, label: &str) -> Result<TargetAnalysis>
    where
        P: RecordPredicate + ?Sized,
    {
        self.validate()?;
        let frequencies = co_occurrence(records, target, self.dictionary.category_names().as_slice());
        if frequencies.filtered_records == 0 {
            warn!(target = label, "no records match target");
        }

        let k = self.builder.top_k();
        let matrix = match &self.matrix_axes {
            Some((rows, cols)) => co_matrix(records, target, rows, cols, k, k),
            None => CoMatrix::default(),
        };
        let graph = self.builder.build(records, target, self.dictionary)?;
        let layout = layout_with(&graph, &self.layout)?;

        if graph.is_empty() {
            warn!(target = label, "insufficient data for a tag graph");
        } else {
            info!(
                target = label,
                records = frequencies.filtered_records,
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "target analysed"
            );
        }

        Ok(TargetAnalysis {
            target: label.to_string(),
            filtered_records: frequencies.filtered_records,
            frequencies,
            matrix,
            graph,
            layout,
        })
    }

    /// Run several targets in parallel. Results keep the input order.
    pub fn analyze_targets(&self, records: &[Record], targets: &[RecordFilter]) -> Result<Vec<TargetAnalysis>> {
        targets
            .par_iter()
            .map(|target| self.analyze(records, target, &target.label()))
            .collect()
    }
}
