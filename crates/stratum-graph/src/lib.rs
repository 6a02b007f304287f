#![forbid(unsafe_code)]

//! Graph model APIs used by `stratum`.
//!
//! A diagram is a directed multigraph (nodes, anchors, edges) plus the figures that draw it.
//! Layout never mutates a [`Diagram`] directly: it returns [`Edit`]s that the editor applies and
//! registers with its own undo history.

pub mod diagram;
pub mod edit;
pub mod error;
pub mod geometry;
pub mod graph;

pub use diagram::{Binding, Diagram, Figure};
pub use edit::{CompositeEdit, Edit};
pub use error::{GraphError, Result};
pub use geometry::{Point, Rect};
pub use graph::Graph;
