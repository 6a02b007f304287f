//! Layout items: the transient occupants of layers.
//!
//! Items live in one arena per layout call and refer to each other by [`ItemId`]. Nothing here
//! outlives the call that built it.

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

pub type ItemId = usize;
pub type ItemSet = IndexSet<ItemId, FxBuildHasher>;

/// What an item stands for in the drawing.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A model node; `figure` is the diagram index of the figure drawing it, if laid out.
    Node { node: String, figure: Option<usize> },
    /// One link of a chain that carries `edge` across an intermediate layer. `remaining` counts
    /// the layers left until `target` is reached.
    EdgeDummy {
        edge: String,
        target: String,
        remaining: usize,
        figure: Option<usize>,
    },
    /// A layer-0 figure: a free decoration, or an edge figure (`edge` set) that the renderer
    /// re-routes from the final node positions.
    Decoration { figure: usize, edge: Option<String> },
}

/// Whether an item really occupies its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    Placed,
    /// Placeholder for `stands_for`, which is `distance` layers away.
    Reference { distance: usize, stands_for: ItemId },
}

#[derive(Debug, Clone)]
pub struct LayoutItem {
    pub layer: usize,
    pub first_layer: usize,
    pub occupancy: Occupancy,
    pub weight: f64,
    pub position: usize,
    pub payload: Payload,
    pub predecessors: ItemSet,
    pub successors: ItemSet,
}

impl LayoutItem {
    pub(crate) fn new(layer: usize, first_layer: usize, position: usize, payload: Payload) -> Self {
        Self {
            layer,
            first_layer,
            occupancy: Occupancy::Placed,
            weight: 0.0,
            position,
            payload,
            predecessors: ItemSet::default(),
            successors: ItemSet::default(),
        }
    }

    /// `Placed -> Reference`. An item only ever makes this transition once.
    pub(crate) fn make_reference(&mut self, distance: usize, stands_for: ItemId) {
        debug_assert!(distance >= 1);
        debug_assert_eq!(self.occupancy, Occupancy::Placed);
        self.occupancy = Occupancy::Reference {
            distance,
            stands_for,
        };
    }

    pub fn reference_distance(&self) -> Option<usize> {
        match self.occupancy {
            Occupancy::Placed => None,
            Occupancy::Reference { distance, .. } => Some(distance),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.occupancy, Occupancy::Reference { .. })
    }

    pub fn is_dummy(&self) -> bool {
        matches!(self.payload, Payload::EdgeDummy { .. })
    }

    pub fn is_decoration(&self) -> bool {
        matches!(self.payload, Payload::Decoration { .. })
    }

    /// Real node occupant (not a reference, not a dummy).
    pub fn is_real_node(&self) -> bool {
        !self.is_reference() && matches!(self.payload, Payload::Node { .. })
    }

    pub fn node(&self) -> Option<&str> {
        match &self.payload {
            Payload::Node { node, .. } => Some(node),
            _ => None,
        }
    }

    pub fn edge(&self) -> Option<&str> {
        match &self.payload {
            Payload::EdgeDummy { edge, .. } => Some(edge),
            Payload::Decoration { edge, .. } => edge.as_deref(),
            Payload::Node { .. } => None,
        }
    }

    pub fn figure(&self) -> Option<usize> {
        match self.payload {
            Payload::Node { figure, .. } | Payload::EdgeDummy { figure, .. } => figure,
            Payload::Decoration { figure, .. } => Some(figure),
        }
    }

    pub fn remaining(&self) -> Option<usize> {
        match self.payload {
            Payload::EdgeDummy { remaining, .. } => Some(remaining),
            _ => None,
        }
    }
}
