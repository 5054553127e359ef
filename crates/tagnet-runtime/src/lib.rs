//! # Tagnet Runtime
//!
//! Corpus loading, co-occurrence aggregation, graph construction and
//! layout.
//!
//! The runtime turns raw listings and posts into tagged records, counts
//! tag frequency and co-occurrence over a filtered subset, selects the
//! top-K tags per category as graph nodes and places them with a seeded
//! force-directed layout. A processed-corpus cache sits in front of the
//! tagging scan.

pub mod corpus;
pub mod aggregate;
pub mod graph_builder;
pub mod layout;
pub mod cache;
pub mod summary;
pub mod analysis;
pub mod export;
pub mod prelude;
