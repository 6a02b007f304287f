//! Directed multigraph of nodes, anchors and edges.
//!
//! Edges do not connect nodes directly: each end attaches to an anchor, and every anchor belongs
//! to exactly one node. Ids are caller-chosen strings; insertion order is preserved everywhere
//! because the layout engine uses it as its deterministic iteration order.

mod adj_cache;
mod entries;

use crate::error::{GraphError, Result};
use adj_cache::DirectedAdjCache;
use entries::{AnchorEntry, EdgeEntry, NodeEntry};
use rustc_hash::FxBuildHasher;
use std::cell::{Ref, RefCell};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<NodeEntry>,
    node_index: HashMap<String, usize>,

    anchors: Vec<AnchorEntry>,
    anchor_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry>,
    edge_index: HashMap<String, usize>,

    // Adjacency queries resolve edge -> anchor -> node. The resolved view is rebuilt lazily
    // whenever the generation moves; interior mutability keeps query APIs on `&self`.
    adj_gen: u64,
    adj_cache: RefCell<Option<DirectedAdjCache>>,
}

impl Clone for Graph {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            node_index: self.node_index.clone(),
            anchors: self.anchors.clone(),
            anchor_index: self.anchor_index.clone(),
            edges: self.edges.clone(),
            edge_index: self.edge_index.clone(),
            adj_gen: self.adj_gen,
            adj_cache: RefCell::new(None),
        }
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    fn invalidate_adj(&mut self) {
        self.adj_gen = self.adj_gen.wrapping_add(1);
        *self.adj_cache.get_mut() = None;
    }

    fn ensure_adj(&self) -> Ref<'_, DirectedAdjCache> {
        let stale = self
            .adj_cache
            .borrow()
            .as_ref()
            .is_none_or(|c| c.generation != self.adj_gen);
        if stale {
            let ends = self
                .edges
                .iter()
                .map(|e| Some((self.anchor_node_ix(&e.source)?, self.anchor_node_ix(&e.target)?)))
                .collect();
            *self.adj_cache.borrow_mut() =
                Some(DirectedAdjCache::build(self.adj_gen, self.nodes.len(), ends));
        }
        Ref::map(self.adj_cache.borrow(), |c| {
            c.as_ref()
                .expect("adjacency cache should be present after ensure")
        })
    }

    fn anchor_node_ix(&self, anchor: &str) -> Option<usize> {
        let &a_ix = self.anchor_index.get(anchor)?;
        self.node_index.get(&self.anchors[a_ix].node).copied()
    }

    fn reindex_nodes(&mut self) {
        self.node_index.clear();
        for (i, n) in self.nodes.iter().enumerate() {
            self.node_index.insert(n.id.clone(), i);
        }
    }

    fn reindex_anchors(&mut self) {
        self.anchor_index.clear();
        for (i, a) in self.anchors.iter().enumerate() {
            self.anchor_index.insert(a.id.clone(), i);
        }
    }

    fn reindex_edges(&mut self) {
        self.edge_index.clear();
        for (i, e) in self.edges.iter().enumerate() {
            self.edge_index.insert(e.id.clone(), i);
        }
    }

    // ---- nodes -------------------------------------------------------------------------------

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Adds `id` if it is not present yet.
    pub fn set_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if self.node_index.contains_key(&id) {
            return self;
        }
        self.invalidate_adj();
        let idx = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            anchors: Vec::new(),
        });
        self.node_index.insert(id, idx);
        self
    }

    /// Removes a node together with its anchors and every edge attached to them.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(idx) = self.node_index.get(id).copied() else {
            return false;
        };
        let node = self.nodes.remove(idx);
        self.anchors.retain(|a| a.node != node.id);
        self.edges
            .retain(|e| !node.anchors.contains(&e.source) && !node.anchors.contains(&e.target));
        self.reindex_nodes();
        self.reindex_anchors();
        self.reindex_edges();
        self.invalidate_adj();
        true
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ix(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub fn node_id(&self, ix: usize) -> Option<&str> {
        self.nodes.get(ix).map(|n| n.id.as_str())
    }

    // ---- anchors -----------------------------------------------------------------------------

    /// Appends an anchor to `node`'s ordered anchor list.
    pub fn add_anchor(&mut self, node: &str, anchor: impl Into<String>) -> Result<&mut Self> {
        let anchor = anchor.into();
        let Some(&n_ix) = self.node_index.get(node) else {
            return Err(GraphError::UnknownNode {
                id: node.to_string(),
            });
        };
        if let Some(&a_ix) = self.anchor_index.get(&anchor) {
            return Err(GraphError::DuplicateAnchor {
                id: anchor,
                node: self.anchors[a_ix].node.clone(),
            });
        }
        self.invalidate_adj();
        self.nodes[n_ix].anchors.push(anchor.clone());
        self.anchor_index.insert(anchor.clone(), self.anchors.len());
        self.anchors.push(AnchorEntry {
            id: anchor,
            node: node.to_string(),
        });
        Ok(self)
    }

    /// Detaches an anchor from its node.
    ///
    /// Edges attached to the anchor keep referencing it until they are moved with
    /// [`Graph::reconnect`] or removed; until then [`Graph::validate`] reports them.
    pub fn remove_anchor(&mut self, anchor: &str) -> bool {
        let Some(a_ix) = self.anchor_index.get(anchor).copied() else {
            return false;
        };
        let entry = self.anchors.remove(a_ix);
        if let Some(&n_ix) = self.node_index.get(&entry.node) {
            self.nodes[n_ix].anchors.retain(|a| a != anchor);
        }
        self.reindex_anchors();
        self.invalidate_adj();
        true
    }

    pub fn has_anchor(&self, anchor: &str) -> bool {
        self.anchor_index.contains_key(anchor)
    }

    /// Anchors of `node` in attachment order.
    pub fn anchors(&self, node: &str) -> Vec<&str> {
        self.node_index
            .get(node)
            .map(|&ix| self.nodes[ix].anchors.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn anchor_node(&self, anchor: &str) -> Result<&str> {
        let Some(&a_ix) = self.anchor_index.get(anchor) else {
            return Err(GraphError::UnknownAnchor {
                id: anchor.to_string(),
            });
        };
        Ok(self.anchors[a_ix].node.as_str())
    }

    // ---- edges -------------------------------------------------------------------------------

    pub fn add_edge(
        &mut self,
        id: impl Into<String>,
        source_anchor: &str,
        target_anchor: &str,
    ) -> Result<&mut Self> {
        for anchor in [source_anchor, target_anchor] {
            if !self.anchor_index.contains_key(anchor) {
                return Err(GraphError::UnknownAnchor {
                    id: anchor.to_string(),
                });
            }
        }
        let id = id.into();
        self.invalidate_adj();
        if let Some(&idx) = self.edge_index.get(&id) {
            self.edges[idx].source = source_anchor.to_string();
            self.edges[idx].target = target_anchor.to_string();
            return Ok(self);
        }
        self.edge_index.insert(id.clone(), self.edges.len());
        self.edges.push(EdgeEntry {
            id,
            source: source_anchor.to_string(),
            target: target_anchor.to_string(),
        });
        Ok(self)
    }

    /// Moves both ends of an existing edge onto other anchors.
    pub fn reconnect(
        &mut self,
        edge: &str,
        source_anchor: &str,
        target_anchor: &str,
    ) -> Result<&mut Self> {
        if !self.edge_index.contains_key(edge) {
            return Err(GraphError::UnknownEdge {
                id: edge.to_string(),
            });
        }
        self.add_edge(edge, source_anchor, target_anchor)
    }

    /// Connects `v` to `w` through two fresh anchors and returns the new edge id.
    ///
    /// Missing nodes are created. Generated ids are `"{v}->{w}"` (suffixed `#1`, `#2`, ... for
    /// parallel edges); anchors are `"{edge}@out"` and `"{edge}@in"`.
    pub fn connect(&mut self, v: &str, w: &str) -> String {
        self.set_node(v);
        self.set_node(w);
        let base = format!("{v}->{w}");
        let mut id = base.clone();
        for i in 1usize.. {
            if !self.edge_index.contains_key(&id)
                && !self.anchor_index.contains_key(&format!("{id}@out"))
                && !self.anchor_index.contains_key(&format!("{id}@in"))
            {
                break;
            }
            id = format!("{base}#{i}");
        }
        let out = format!("{id}@out");
        let inc = format!("{id}@in");
        self.push_anchor_unchecked(v, out.clone());
        self.push_anchor_unchecked(w, inc.clone());
        self.invalidate_adj();
        self.edge_index.insert(id.clone(), self.edges.len());
        self.edges.push(EdgeEntry {
            id: id.clone(),
            source: out,
            target: inc,
        });
        id
    }

    fn push_anchor_unchecked(&mut self, node: &str, anchor: String) {
        let n_ix = self.node_index[node];
        self.nodes[n_ix].anchors.push(anchor.clone());
        self.anchor_index.insert(anchor.clone(), self.anchors.len());
        self.anchors.push(AnchorEntry {
            id: anchor,
            node: node.to_string(),
        });
    }

    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        if nodes.len() < 2 {
            return self;
        }
        for pair in nodes.windows(2) {
            self.connect(pair[0], pair[1]);
        }
        self
    }

    pub fn remove_edge(&mut self, id: &str) -> bool {
        let Some(idx) = self.edge_index.get(id).copied() else {
            return false;
        };
        self.edges.remove(idx);
        self.reindex_edges();
        self.invalidate_adj();
        true
    }

    pub fn has_edge(&self, id: &str) -> bool {
        self.edge_index.contains_key(id)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &str> {
        self.edges.iter().map(|e| e.id.as_str())
    }

    pub fn edge_id(&self, ix: usize) -> Option<&str> {
        self.edges.get(ix).map(|e| e.id.as_str())
    }

    /// `(source anchor, target anchor)` of `edge`.
    pub fn edge_anchors(&self, edge: &str) -> Result<(&str, &str)> {
        let Some(&idx) = self.edge_index.get(edge) else {
            return Err(GraphError::UnknownEdge {
                id: edge.to_string(),
            });
        };
        let e = &self.edges[idx];
        Ok((e.source.as_str(), e.target.as_str()))
    }

    /// `(source node, target node)` of `edge`, resolved through its anchors.
    pub fn edge_nodes(&self, edge: &str) -> Result<(&str, &str)> {
        let (source, target) = self.edge_anchors(edge)?;
        let resolve = |anchor: &str| {
            self.anchor_node(anchor)
                .ok()
                .filter(|n| self.has_node(n))
                .ok_or_else(|| GraphError::DanglingAnchor {
                    edge: edge.to_string(),
                    anchor: anchor.to_string(),
                })
        };
        Ok((resolve(source)?, resolve(target)?))
    }

    /// Checks that every edge end resolves to a node of this graph.
    pub fn validate(&self) -> Result<()> {
        for e in &self.edges {
            self.edge_nodes(&e.id)?;
        }
        Ok(())
    }

    // ---- adjacency ---------------------------------------------------------------------------

    pub fn out_edges(&self, v: &str) -> Vec<&str> {
        let Some(v_ix) = self.node_ix(v) else {
            return Vec::new();
        };
        let cache = self.ensure_adj();
        cache
            .out_edges(v_ix)
            .iter()
            .map(|&e| self.edges[e].id.as_str())
            .collect()
    }

    pub fn in_edges(&self, v: &str) -> Vec<&str> {
        let Some(v_ix) = self.node_ix(v) else {
            return Vec::new();
        };
        let cache = self.ensure_adj();
        cache
            .in_edges(v_ix)
            .iter()
            .map(|&e| self.edges[e].id.as_str())
            .collect()
    }

    pub fn successors(&self, v: &str) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(v_ix) = self.node_ix(v) {
            self.for_each_out_edge_ix(v_ix, |_e, w_ix| out.push(self.nodes[w_ix].id.as_str()));
        }
        out
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(v_ix) = self.node_ix(v) {
            self.for_each_in_edge_ix(v_ix, |_e, u_ix| out.push(self.nodes[u_ix].id.as_str()));
        }
        out
    }

    /// Nodes without incoming edges from other nodes; self-loops do not count.
    pub fn sources(&self) -> Vec<&str> {
        let cache = self.ensure_adj();
        self.nodes
            .iter()
            .enumerate()
            .filter(|(ix, _)| {
                cache
                    .in_edges(*ix)
                    .iter()
                    .all(|&e| cache.ends[e].is_some_and(|(u, _)| u == *ix))
            })
            .map(|(_, n)| n.id.as_str())
            .collect()
    }

    /// Calls `f(edge_ix, target_ix)` for every outgoing edge of `v_ix`, in insertion order.
    pub fn for_each_out_edge_ix<F>(&self, v_ix: usize, mut f: F)
    where
        F: FnMut(usize, usize),
    {
        if v_ix >= self.nodes.len() {
            return;
        }
        let cache = self.ensure_adj();
        for &e in cache.out_edges(v_ix) {
            if let Some((_, w)) = cache.ends[e] {
                f(e, w);
            }
        }
    }

    /// Calls `f(edge_ix, source_ix)` for every incoming edge of `v_ix`, in insertion order.
    pub fn for_each_in_edge_ix<F>(&self, v_ix: usize, mut f: F)
    where
        F: FnMut(usize, usize),
    {
        if v_ix >= self.nodes.len() {
            return;
        }
        let cache = self.ensure_adj();
        for &e in cache.in_edges(v_ix) {
            if let Some((u, _)) = cache.ends[e] {
                f(e, u);
            }
        }
    }
}
