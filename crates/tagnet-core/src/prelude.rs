//! Tagnet Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use tagnet_core::prelude::*;
//! ```

pub use crate::types::{
    Tag, TagAssignment, CategoryTags,
    Record, RecordId, SourceKind,
    Position,
};

pub use crate::dictionary::{TagDictionary, CategoryDef, TagDef, MarkerDef};

pub use crate::tagger::{tag, detect_markers, Tagger};

pub use crate::filter::{RecordFilter, RecordPredicate};

pub use crate::graph::{TagGraph, TagNode, TagEdge};

pub use crate::error::{TagnetError, ConfigError, CorpusError, Result};
