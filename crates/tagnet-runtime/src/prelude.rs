//! Tagnet Runtime Prelude: convenient imports for common usage.
//!
//! ```rust
//! use tagnet_runtime::prelude::*;
//! ```

// Re-export corpus
pub use crate::corpus::{Corpus, RawRecord, coerce_weight, embedded_raw};

// Re-export aggregation
pub use crate::aggregate::{
    FrequencyCounter, CoOccurrence, CoMatrix, TopicWeight,
    co_occurrence, co_matrix,
    weighted_mean_by_topic, weight_sum_by_tag, primary_distribution,
};

// Re-export graph construction and layout
pub use crate::graph_builder::{GraphBuilder, PetTagGraph, build_graph, DEFAULT_TOP_K};
pub use crate::layout::{Layout, LayoutConfig, layout, layout_with};

// Re-export caching
pub use crate::cache::{CorpusCache, CacheStats, Fingerprint};
pub use crate::summary::{CorpusSummary, ProcessedCorpus};

// Re-export analysis and export
pub use crate::analysis::{Analyzer, TargetAnalysis};
pub use crate::export::{AnalysisExport, EdgeStats, WeightedEdge, edge_stats, export_edges};

// Re-export from core
pub use tagnet_core::prelude::*;
