//! Figures: the visual bindings of nodes, edges and free-standing decorations.

use crate::edit::Edit;
use crate::error::{GraphError, Result};
use crate::geometry::{Point, Rect};
use crate::graph::Graph;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    Node(String),
    Edge(String),
    /// A figure with no model element behind it (notes, titles, free shapes).
    Decoration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub id: String,
    pub binding: Binding,
    pub bounds: Rect,
    /// Routing points of an edge figure, endpoints included. Empty for other figures.
    #[serde(default)]
    pub path: Vec<Point>,
}

impl Figure {
    pub fn node(id: impl Into<String>, node: impl Into<String>, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            binding: Binding::Node(node.into()),
            bounds,
            path: Vec::new(),
        }
    }

    pub fn edge(id: impl Into<String>, edge: impl Into<String>, path: Vec<Point>) -> Self {
        Self {
            id: id.into(),
            binding: Binding::Edge(edge.into()),
            bounds: Rect::default(),
            path,
        }
    }

    pub fn decoration(id: impl Into<String>, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            binding: Binding::Decoration,
            bounds,
            path: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.bounds.width
    }

    pub fn height(&self) -> f64 {
        self.bounds.height
    }

    pub fn node_id(&self) -> Option<&str> {
        match &self.binding {
            Binding::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn edge_id(&self) -> Option<&str> {
        match &self.binding {
            Binding::Edge(e) => Some(e),
            _ => None,
        }
    }

    /// Deterministic total order used to break ties between otherwise equal figures.
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagram {
    graph: Graph,
    figures: Vec<Figure>,
    figure_index: HashMap<String, usize>,
}

impl Diagram {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            figures: Vec::new(),
            figure_index: HashMap::default(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Adds a figure, replacing any figure with the same id in place.
    pub fn insert_figure(&mut self, figure: Figure) -> &mut Self {
        if let Some(&idx) = self.figure_index.get(&figure.id) {
            self.figures[idx] = figure;
            return self;
        }
        self.figure_index
            .insert(figure.id.clone(), self.figures.len());
        self.figures.push(figure);
        self
    }

    pub fn remove_figure(&mut self, id: &str) -> Option<Figure> {
        let idx = self.figure_index.remove(id)?;
        let figure = self.figures.remove(idx);
        for (i, f) in self.figures.iter().enumerate().skip(idx) {
            if let Some(slot) = self.figure_index.get_mut(&f.id) {
                *slot = i;
            }
        }
        Some(figure)
    }

    pub fn figure(&self, id: &str) -> Option<&Figure> {
        self.figure_index.get(id).map(|&idx| &self.figures[idx])
    }

    pub fn figure_mut(&mut self, id: &str) -> Option<&mut Figure> {
        self.figure_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.figures[idx])
    }

    pub fn figure_ix(&self, id: &str) -> Option<usize> {
        self.figure_index.get(id).copied()
    }

    pub fn figure_at(&self, ix: usize) -> Option<&Figure> {
        self.figures.get(ix)
    }

    pub fn figures(&self) -> impl Iterator<Item = &Figure> {
        self.figures.iter()
    }

    pub fn figure_ids(&self) -> Vec<String> {
        self.figures.iter().map(|f| f.id.clone()).collect()
    }

    /// First figure (in diagram order) bound to `node`.
    pub fn figure_for_node(&self, node: &str) -> Option<&Figure> {
        self.figures.iter().find(|f| f.node_id() == Some(node))
    }

    /// Checks the graph and that every figure binding resolves.
    pub fn validate(&self) -> Result<()> {
        self.graph.validate()?;
        for f in &self.figures {
            self.validate_binding(f)?;
        }
        Ok(())
    }

    pub fn validate_binding(&self, figure: &Figure) -> Result<()> {
        match &figure.binding {
            Binding::Node(n) if !self.graph.has_node(n) => {
                Err(GraphError::UnknownNode { id: n.clone() })
            }
            Binding::Edge(e) if !self.graph.has_edge(e) => {
                Err(GraphError::UnknownEdge { id: e.clone() })
            }
            _ => Ok(()),
        }
    }

    fn figure_or_err(&mut self, id: &str) -> Result<&mut Figure> {
        self.figure_mut(id).ok_or_else(|| GraphError::UnknownFigure { id: id.to_string() })
    }

    /// Performs one edit.
    pub fn apply(&mut self, edit: &Edit) -> Result<()> {
        match edit {
            Edit::Move { figure, to, .. } => {
                let f = self.figure_or_err(figure)?;
                f.bounds = f.bounds.moved_to(*to);
            }
            Edit::RemovePathPoint { figure, index, .. } => {
                let f = self.figure_or_err(figure)?;
                if *index >= f.path.len() {
                    return Err(GraphError::PathPointOutOfRange {
                        figure: figure.clone(),
                        index: *index,
                        len: f.path.len(),
                    });
                }
                f.path.remove(*index);
            }
        }
        Ok(())
    }

    /// Reverts one previously applied edit.
    pub fn revert(&mut self, edit: &Edit) -> Result<()> {
        match edit {
            Edit::Move { figure, from, .. } => {
                let f = self.figure_or_err(figure)?;
                f.bounds = f.bounds.moved_to(*from);
            }
            Edit::RemovePathPoint {
                figure,
                index,
                point,
            } => {
                let f = self.figure_or_err(figure)?;
                if *index > f.path.len() {
                    return Err(GraphError::PathPointOutOfRange {
                        figure: figure.clone(),
                        index: *index,
                        len: f.path.len(),
                    });
                }
                f.path.insert(*index, *point);
            }
        }
        Ok(())
    }
}
