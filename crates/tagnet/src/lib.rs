//! # Tagnet
//!
//! Keyword tagging, tag co-occurrence graphs and force-directed layout
//! for corpora of product listings and social posts.
//!
//! Records are tagged by plain substring matching against a versioned
//! dictionary. Over a filtered subset (for example, records mentioning
//! a target concept) the pipeline counts tag frequencies and pairwise
//! co-occurrence, keeps the top-K tags per category as graph nodes,
//! drops edges seen in only one record and lays the graph out
//! deterministically.
//!
//! ## Quick Start
//!
//! ```rust
//! use tagnet::prelude::*;
//!
//! let dict = TagDictionary::builtin();
//! let corpus = Corpus::from_embedded(&dict);
//!
//! let analysis = Analyzer::new(&dict)
//!     .with_matrix("color", "tech")
//!     .analyze(corpus.records(), &RecordFilter::marker("whitening"), "whitening")
//!     .unwrap();
//!
//! if analysis.is_insufficient() {
//!     println!("insufficient data");
//! }
//! for edge in export_edges(&analysis.graph) {
//!     println!("{} - {} ({})", edge.source, edge.target, edge.weight);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`tagnet_core`] - Shared types, dictionary, tagger, filters, graph trait
//! - [`tagnet_runtime`] - Corpus, aggregation, graph builder, layout, cache
//! - `tagnet_viz` - Scene geometry for renderers (feature `viz`)
//!
//! ## Pipeline
//!
//! | Stage | Input | Output |
//! |-------|-------|--------|
//! | Tag | text + dictionary | per-category tag lists |
//! | Aggregate | records + predicate | frequency counters, co-matrix |
//! | Build | records + predicate + top-K | graph (edges with weight > 1) |
//! | Layout | graph + seed | node positions |

// Re-export all subcrates
pub use tagnet_core as core;
pub use tagnet_runtime as runtime;

#[cfg(feature = "viz")]
pub use tagnet_viz as viz;

/// Prelude module for convenient imports.
///
/// ```rust
/// use tagnet::prelude::*;
/// ```
pub mod prelude {
    pub use tagnet_runtime::prelude::*;

    #[cfg(feature = "viz")]
    pub use tagnet_viz::{swatch_bars, Scene, SceneEdge, SceneNode, SwatchBar};
}
