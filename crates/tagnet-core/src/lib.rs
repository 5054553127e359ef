//! # Tagnet Core
//!
//! Core types for keyword tagging and tag co-occurrence analysis.
//!
//! - **Dictionary**: versioned `category → tag → keyword variants` configuration
//! - **Tagger**: pure text → per-category tag lists (substring matching)
//! - **Filters**: record predicates selecting an analysis subset
//! - **Graph contract**: the `TagGraph` trait consumed by layout and export
//!
//! ## Quick Start
//!
//! ```rust
//! use tagnet_core::prelude::*;
//!
//! let dict = TagDictionary::builder("demo")
//!     .category("color", |c| c.tag("brown", ["brown", "tea"]))
//!     .category("tech", |c| c.tag("foam", ["foam"]))
//!     .build()
//!     .unwrap();
//!
//! let tags = tag("Brown foam dye", &dict);
//! assert_eq!(tags.get("color"), ["brown".to_string()]);
//! assert_eq!(tags.get("tech"), ["foam".to_string()]);
//! ```

pub mod types;
pub mod dictionary;
pub mod tagger;
pub mod filter;
pub mod graph;
pub mod error;
pub mod prelude;
