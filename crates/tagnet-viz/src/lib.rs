//! # Tagnet Viz
//!
//! Render-ready geometry for tag co-occurrence graphs.
//!
//! Combines a built graph with its layout into a [`Scene`]: node
//! positions, colours and relative marker sizes, plus edge segments with
//! relative line widths. Drawing itself is left to an external renderer,
//! which consumes the scene as JSON.

pub mod scene;

pub use scene::{swatch_bars, Scene, SceneEdge, SceneNode, SwatchBar};
