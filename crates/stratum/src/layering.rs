//! Layer assignment.
//!
//! Figures are partitioned into ordered layers: layer 0 holds decorations and edge figures,
//! layer 1 the entry nodes, and every further layer is derived from the one before it by
//! following outgoing edges. Edges that must span more than one layer boundary are carried by
//! chains of [`Payload::EdgeDummy`] items; edges that would run backwards are represented by
//! reference placeholders ([`Occupancy::Reference`]) instead of duplicating the node.

mod item;

pub use item::{ItemId, ItemSet, LayoutItem, Occupancy, Payload};

use crate::distance::DistanceOracle;
use crate::error::Result;
use rustc_hash::FxHashMap as HashMap;
use std::collections::VecDeque;
use stratum_graph::{Binding, Diagram, Edit, Graph, GraphError};

/// Output of [`build_layers`]: the item arena, the layer lists and the routing-point removals
/// recorded while stripping edge figures.
#[derive(Debug, Clone, Default)]
pub struct Layering {
    items: Vec<LayoutItem>,
    layers: Vec<Vec<ItemId>>,
    removals: Vec<Edit>,
}

impl Layering {
    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> &LayoutItem {
        &self.items[id]
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> &mut LayoutItem {
        &mut self.items[id]
    }

    pub fn layers(&self) -> &[Vec<ItemId>] {
        &self.layers
    }

    pub fn layer(&self, layer: usize) -> &[ItemId] {
        self.layers.get(layer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Items of `layer` sorted by their current position.
    pub fn ordered_layer(&self, layer: usize) -> Vec<ItemId> {
        let mut ids = self.layer(layer).to_vec();
        ids.sort_by_key(|&id| self.items[id].position);
        ids
    }

    pub fn removals(&self) -> &[Edit] {
        &self.removals
    }

    pub(crate) fn take_removals(&mut self) -> Vec<Edit> {
        std::mem::take(&mut self.removals)
    }

    /// `true` when some layer other than the decoration layer has items.
    pub fn has_content(&self) -> bool {
        self.layers.iter().skip(1).any(|l| !l.is_empty())
    }

    /// The real (non-reference) item placed for `node`.
    pub fn real_item(&self, node: &str) -> Option<ItemId> {
        self.items
            .iter()
            .position(|it| it.is_real_node() && it.node() == Some(node))
    }

    fn push(&mut self, layer: usize, first_layer: usize, payload: Payload) -> ItemId {
        while self.layers.len() <= layer {
            self.layers.push(Vec::new());
        }
        let id = self.items.len();
        let position = self.layers[layer].len();
        self.items
            .push(LayoutItem::new(layer, first_layer, position, payload));
        self.layers[layer].push(id);
        id
    }

    fn link(&mut self, from: ItemId, to: ItemId) {
        self.items[from].successors.insert(to);
        self.items[to].predecessors.insert(from);
    }
}

/// Partitions `figures` (diagram figure ids, in input order) into layers.
pub fn build_layers<S: AsRef<str>>(diagram: &Diagram, figures: &[S]) -> Result<Layering> {
    diagram.graph().validate()?;
    let mut builder = LayerBuilder::new(diagram);
    builder.classify(figures)?;
    builder.derive_layers()?;
    let layering = builder.finish();
    tracing::debug!(
        layers = layering.layer_count(),
        items = layering.items().len(),
        removals = layering.removals().len(),
        "built layers"
    );
    Ok(layering)
}

struct LayerBuilder<'d> {
    diagram: &'d Diagram,
    graph: &'d Graph,
    oracle: DistanceOracle<'d>,
    layering: Layering,
    /// Node index -> its real item.
    placed: HashMap<usize, ItemId>,
    /// Node index -> figure index, first figure in input order wins.
    node_figures: HashMap<usize, usize>,
    /// Edge id -> figure index.
    edge_figures: HashMap<String, usize>,
    distances: HashMap<(usize, usize), Option<usize>>,
    reach: HashMap<(usize, usize), bool>,
}

impl<'d> LayerBuilder<'d> {
    fn new(diagram: &'d Diagram) -> Self {
        let mut layering = Layering::default();
        layering.layers.push(Vec::new());
        layering.layers.push(Vec::new());
        Self {
            diagram,
            graph: diagram.graph(),
            oracle: DistanceOracle::new(diagram.graph()),
            layering,
            placed: HashMap::default(),
            node_figures: HashMap::default(),
            edge_figures: HashMap::default(),
            distances: HashMap::default(),
            reach: HashMap::default(),
        }
    }

    fn node_ix(&self, node: &str) -> Result<usize> {
        Ok(self
            .graph
            .node_ix(node)
            .ok_or_else(|| GraphError::UnknownNode {
                id: node.to_string(),
            })?)
    }

    fn node_id(&self, ix: usize) -> &'d str {
        self.graph.node_id(ix).unwrap_or_default()
    }

    fn classify<S: AsRef<str>>(&mut self, figures: &[S]) -> Result<()> {
        let mut entries: Vec<usize> = Vec::new();
        let mut deferred: Vec<usize> = Vec::new();
        let diagram = self.diagram;

        for id in figures {
            let id = id.as_ref();
            let (fix, figure) = diagram
                .figure_ix(id)
                .and_then(|fix| Some((fix, diagram.figure_at(fix)?)))
                .ok_or_else(|| GraphError::UnknownFigure { id: id.to_string() })?;
            diagram.validate_binding(figure)?;

            match &figure.binding {
                Binding::Node(node) => {
                    let n_ix = self.node_ix(node)?;
                    if self.node_figures.contains_key(&n_ix) {
                        tracing::debug!(figure = id, node = %node, "node already has a figure");
                        continue;
                    }
                    self.node_figures.insert(n_ix, fix);
                    let mut has_incoming = false;
                    self.graph
                        .for_each_in_edge_ix(n_ix, |_e, u| has_incoming |= u != n_ix);
                    if has_incoming {
                        deferred.push(n_ix);
                    } else {
                        entries.push(n_ix);
                    }
                }
                Binding::Edge(edge) => {
                    self.graph.edge_nodes(edge)?;
                    self.edge_figures.entry(edge.clone()).or_insert(fix);
                    self.strip_path(fix);
                    self.layering.push(
                        0,
                        0,
                        Payload::Decoration {
                            figure: fix,
                            edge: Some(edge.clone()),
                        },
                    );
                }
                Binding::Decoration => {
                    self.layering.push(
                        0,
                        0,
                        Payload::Decoration {
                            figure: fix,
                            edge: None,
                        },
                    );
                }
            }
        }

        // Components that no entry reaches (cycles, or nodes whose predecessors are not being
        // laid out) are seeded by their first figure in input order. For strongly connected
        // graphs the result therefore depends on input order.
        let mut reached = vec![false; self.graph.node_count()];
        for &n_ix in &entries {
            self.mark_reachable(n_ix, &mut reached);
        }
        for n_ix in deferred {
            if !reached[n_ix] {
                tracing::debug!(node = self.node_id(n_ix), "seeding cyclic component");
                entries.push(n_ix);
                self.mark_reachable(n_ix, &mut reached);
            }
        }

        for n_ix in entries {
            let id = self.layering.push(
                1,
                1,
                Payload::Node {
                    node: self.node_id(n_ix).to_string(),
                    figure: self.node_figures.get(&n_ix).copied(),
                },
            );
            self.placed.insert(n_ix, id);
        }
        Ok(())
    }

    fn mark_reachable(&self, start: usize, reached: &mut [bool]) {
        let mut queue: VecDeque<usize> = VecDeque::new();
        reached[start] = true;
        queue.push_back(start);
        let mut next: Vec<usize> = Vec::new();
        while let Some(v) = queue.pop_front() {
            next.clear();
            self.graph.for_each_out_edge_ix(v, |_e, w| next.push(w));
            for &w in &next {
                if !reached[w] {
                    reached[w] = true;
                    queue.push_back(w);
                }
            }
        }
    }

    /// Records the removal of every intermediate routing point of an edge figure.
    fn strip_path(&mut self, fix: usize) {
        let diagram = self.diagram;
        let Some(figure) = diagram.figure_at(fix) else {
            return;
        };
        if figure.path.len() <= 2 {
            return;
        }
        // Always index 1: each removal shifts the next intermediate point into that slot, and
        // undoing in reverse order re-inserts them in their original order.
        for point in &figure.path[1..figure.path.len() - 1] {
            self.layering.removals.push(Edit::RemovePathPoint {
                figure: figure.id.clone(),
                index: 1,
                point: *point,
            });
        }
    }

    fn derive_layers(&mut self) -> Result<()> {
        let mut current = 1;
        while !self.layering.layer(current).is_empty() {
            let next = current + 1;
            if self.layering.layers.len() <= next {
                self.layering.layers.push(Vec::new());
            }
            let ids = self.layering.layer(current).to_vec();
            for id in ids {
                self.expand(id, next)?;
            }
            current = next;
        }
        while self.layering.layers.len() > 1
            && self.layering.layers.last().is_some_and(Vec::is_empty)
        {
            self.layering.layers.pop();
        }
        Ok(())
    }

    fn expand(&mut self, id: ItemId, next: usize) -> Result<()> {
        let item = self.layering.item(id);
        if item.is_reference() {
            return Ok(());
        }
        match item.payload.clone() {
            Payload::Node { node, .. } => {
                let u = self.node_ix(&node)?;
                let mut out: Vec<(usize, usize)> = Vec::new();
                self.graph.for_each_out_edge_ix(u, |e, w| out.push((e, w)));
                for (e, w) in out {
                    if w == u {
                        continue;
                    }
                    self.route(id, u, e, w, next)?;
                }
            }
            Payload::EdgeDummy {
                edge,
                target,
                remaining,
                figure,
            } => {
                if remaining > 1 {
                    let first_layer = self.layering.item(id).first_layer;
                    let dummy = self.layering.push(
                        next,
                        first_layer,
                        Payload::EdgeDummy {
                            edge,
                            target,
                            remaining: remaining - 1,
                            figure,
                        },
                    );
                    self.layering.link(id, dummy);
                } else {
                    let (source, _) = self.graph.edge_nodes(&edge)?;
                    let u = self.node_ix(source)?;
                    let w = self.node_ix(&target)?;
                    self.place(id, u, w, next);
                }
            }
            Payload::Decoration { .. } => {}
        }
        Ok(())
    }

    /// Places the target `w` of edge `e` leaving node `u` (item `pred`) relative to layer `next`.
    fn route(&mut self, pred: ItemId, u: usize, e: usize, w: usize, next: usize) -> Result<()> {
        if self.placed.contains_key(&w) {
            self.place(pred, u, w, next);
            return Ok(());
        }
        let distance = self.max_distance(u, w).unwrap_or(1).max(1);
        if distance == 1 {
            self.place(pred, u, w, next);
            return Ok(());
        }

        let edge = self.graph.edge_id(e).unwrap_or_default().to_string();
        tracing::trace!(edge = %edge, distance, layer = next, "starting dummy chain");
        let figure = self.edge_figures.get(&edge).copied();
        let dummy = self.layering.push(
            next,
            next,
            Payload::EdgeDummy {
                edge,
                target: self.node_id(w).to_string(),
                remaining: distance - 1,
                figure,
            },
        );
        self.layering.link(pred, dummy);
        Ok(())
    }

    /// Puts node `w` into layer `next` as a successor of `pred`, reached from node `u`.
    fn place(&mut self, pred: ItemId, u: usize, w: usize, next: usize) {
        let Some(&existing) = self.placed.get(&w) else {
            let id = self.push_node(w, next, next);
            self.placed.insert(w, id);
            self.layering.link(pred, id);
            return;
        };

        let (layer, first_layer) = {
            let it = self.layering.item(existing);
            (it.layer, it.first_layer)
        };
        if layer == next {
            self.layering.link(pred, existing);
            return;
        }

        let distance = next - layer;
        if self.reaches(w, u) {
            // The edge closes a cycle: keep `w` where it is and stand in for it here.
            tracing::trace!(
                node = self.node_id(w),
                from = self.node_id(u),
                distance,
                "back edge, adding reference"
            );
            let id = self.push_node(w, next, first_layer);
            self.layering.item_mut(id).make_reference(distance, existing);
            self.layering.link(pred, id);
        } else {
            // `w` was placed too early through a shorter path: move it down.
            tracing::trace!(
                node = self.node_id(w),
                from = layer,
                to = next,
                "demoting node"
            );
            let id = self.push_node(w, next, first_layer);
            self.layering.item_mut(existing).make_reference(distance, id);
            self.layering.link(existing, id);
            self.layering.link(pred, id);
            self.placed.insert(w, id);
        }
    }

    fn push_node(&mut self, n_ix: usize, layer: usize, first_layer: usize) -> ItemId {
        self.layering.push(
            layer,
            first_layer,
            Payload::Node {
                node: self.node_id(n_ix).to_string(),
                figure: self.node_figures.get(&n_ix).copied(),
            },
        )
    }

    fn max_distance(&mut self, u: usize, w: usize) -> Option<usize> {
        if let Some(&d) = self.distances.get(&(u, w)) {
            return d;
        }
        let d = self.oracle.max_distance_ix(u, w);
        self.distances.insert((u, w), d);
        d
    }

    fn reaches(&mut self, from: usize, to: usize) -> bool {
        if let Some(&r) = self.reach.get(&(from, to)) {
            return r;
        }
        let r = self.oracle.reaches_ix(from, to);
        self.reach.insert((from, to), r);
        r
    }

    fn finish(self) -> Layering {
        self.layering
    }
}
