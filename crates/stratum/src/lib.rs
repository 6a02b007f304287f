#![forbid(unsafe_code)]

//! Layered (Sugiyama-style) layout for diagram editors.
//!
//! The engine partitions figures into layers, reduces edge crossings with a barycenter
//! heuristic and assigns coordinates. It never mutates the diagram: the result is a reversible
//! [`CompositeEdit`](stratum_graph::CompositeEdit).

pub use stratum_graph as graph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod distance;
pub mod error;
pub mod grid;
pub mod layering;
pub mod model;
pub mod order;
pub mod pipeline;
pub mod position;

pub use distance::DistanceOracle;
pub use error::{Error, Result};
pub use layering::{Layering, build_layers};
pub use model::{BarycenterScope, Direction, LayoutOptions, Margins};
pub use pipeline::{layout, layout_all};
