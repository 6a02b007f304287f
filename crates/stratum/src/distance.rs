//! Longest directed-hop distance between two nodes.
//!
//! The layering builder sizes dummy chains with this: an edge `u -> v` whose target is also
//! reachable from `u` through a longer path must span that many layers, otherwise the longer
//! path would have to run backwards.
//!
//! The search is best-first over outgoing edges with the open set ordered by *descending*
//! distance. A candidate that reaches the target only raises the lower bound; the search runs
//! until the open set is exhausted because later (longer) paths may still arrive. Cycles are
//! handled per candidate: a candidate whose node already occurs in its own ownership chain is a
//! loop and is never expanded.

use rustc_hash::FxHashMap as HashMap;
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use stratum_graph::{Graph, GraphError};

#[derive(Debug)]
struct DistanceCandidate {
    node: usize,
    distance: usize,
    /// Index of the candidate this one was expanded from.
    parent: Option<usize>,
    is_loop: OnceCell<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    distance: usize,
    seq: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on distance; among equal distances the older candidate pops first.
        self.distance
            .cmp(&other.distance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DistanceOracle<'g> {
    graph: &'g Graph,
}

impl<'g> DistanceOracle<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Longest number of edge hops from `from` to `to`, or `None` when `to` is unreachable.
    ///
    /// `from == to` yields the length of the longest cycle through `from` (1 for a self-loop).
    /// Callers placing an edge target treat `None` as a distance of 1.
    pub fn max_distance(&self, from: &str, to: &str) -> Result<Option<usize>, GraphError> {
        let from_ix = self.require(from)?;
        let to_ix = self.require(to)?;
        Ok(self.max_distance_ix(from_ix, to_ix))
    }

    /// Whether `to` can be reached from `from` (a node always reaches itself).
    pub fn reaches(&self, from: &str, to: &str) -> Result<bool, GraphError> {
        let from_ix = self.require(from)?;
        let to_ix = self.require(to)?;
        Ok(self.reaches_ix(from_ix, to_ix))
    }

    fn require(&self, id: &str) -> Result<usize, GraphError> {
        self.graph
            .node_ix(id)
            .ok_or_else(|| GraphError::UnknownNode { id: id.to_string() })
    }

    pub(crate) fn max_distance_ix(&self, from: usize, to: usize) -> Option<usize> {
        let mut candidates: Vec<DistanceCandidate> = vec![DistanceCandidate {
            node: from,
            distance: 0,
            parent: None,
            is_loop: OnceCell::new(),
        }];
        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
        open.push(OpenEntry {
            distance: 0,
            seq: 0,
        });
        // Best distance each node has been expanded with.
        let mut closed: HashMap<usize, usize> = HashMap::default();
        let mut best: Option<usize> = None;
        let mut targets: Vec<usize> = Vec::new();

        while let Some(entry) = open.pop() {
            let c_ix = entry.seq;
            let node = candidates[c_ix].node;
            let distance = candidates[c_ix].distance;

            if node == to && distance > 0 {
                if node == from || !is_loop(&candidates, c_ix) {
                    best = Some(best.map_or(distance, |b| b.max(distance)));
                }
                continue;
            }
            if is_loop(&candidates, c_ix) {
                continue;
            }
            if closed.get(&node).is_some_and(|&d| d >= distance) {
                continue;
            }
            closed.insert(node, distance);

            targets.clear();
            self.graph
                .for_each_out_edge_ix(node, |_edge, w| targets.push(w));
            for &w in &targets {
                let seq = candidates.len();
                candidates.push(DistanceCandidate {
                    node: w,
                    distance: distance + 1,
                    parent: Some(c_ix),
                    is_loop: OnceCell::new(),
                });
                open.push(OpenEntry {
                    distance: distance + 1,
                    seq,
                });
            }
        }

        tracing::trace!(
            from = self.graph.node_id(from).unwrap_or_default(),
            to = self.graph.node_id(to).unwrap_or_default(),
            distance = ?best,
            candidates = candidates.len(),
            "max_distance"
        );
        best
    }

    pub(crate) fn reaches_ix(&self, from: usize, to: usize) -> bool {
        if from == to {
            return true;
        }
        let mut seen = vec![false; self.graph.node_count()];
        let mut queue: VecDeque<usize> = VecDeque::new();
        seen[from] = true;
        queue.push_back(from);
        let mut next: Vec<usize> = Vec::new();
        while let Some(v) = queue.pop_front() {
            next.clear();
            self.graph.for_each_out_edge_ix(v, |_edge, w| next.push(w));
            for &w in &next {
                if w == to {
                    return true;
                }
                if !seen[w] {
                    seen[w] = true;
                    queue.push_back(w);
                }
            }
        }
        false
    }
}

fn is_loop(candidates: &[DistanceCandidate], c_ix: usize) -> bool {
    let candidate = &candidates[c_ix];
    *candidate.is_loop.get_or_init(|| {
        let mut cur = candidate.parent;
        while let Some(p) = cur {
            if candidates[p].node == candidate.node {
                return true;
            }
            cur = candidates[p].parent;
        }
        false
    })
}
