//! Adjacency cache used by [`Graph`](super::Graph).
//!
//! Layering and the distance oracle query outgoing edges repeatedly; resolving
//! edge → anchor → node on every query is O(E) per call.

#[derive(Debug, Clone)]
pub(in crate::graph) struct DirectedAdjCache {
    pub(in crate::graph) generation: u64,
    pub(in crate::graph) out_offsets: Vec<usize>,
    pub(in crate::graph) out_edges: Vec<usize>,
    pub(in crate::graph) in_offsets: Vec<usize>,
    pub(in crate::graph) in_edges: Vec<usize>,
    /// `(source node ix, target node ix)` per edge; `None` while an end anchor dangles.
    pub(in crate::graph) ends: Vec<Option<(usize, usize)>>,
}

impl DirectedAdjCache {
    pub(in crate::graph) fn build(
        generation: u64,
        node_count: usize,
        ends: Vec<Option<(usize, usize)>>,
    ) -> Self {
        let mut out_counts = vec![0usize; node_count + 1];
        let mut in_counts = vec![0usize; node_count + 1];
        for &(v, w) in ends.iter().flatten() {
            out_counts[v + 1] += 1;
            in_counts[w + 1] += 1;
        }
        for i in 0..node_count {
            out_counts[i + 1] += out_counts[i];
            in_counts[i + 1] += in_counts[i];
        }

        let mut out_edges = vec![0usize; out_counts[node_count]];
        let mut in_edges = vec![0usize; in_counts[node_count]];
        let mut out_fill = out_counts.clone();
        let mut in_fill = in_counts.clone();
        // Edge insertion order is preserved inside each node's slice.
        for (edge_ix, end) in ends.iter().enumerate() {
            let Some((v, w)) = *end else {
                continue;
            };
            out_edges[out_fill[v]] = edge_ix;
            out_fill[v] += 1;
            in_edges[in_fill[w]] = edge_ix;
            in_fill[w] += 1;
        }

        Self {
            generation,
            out_offsets: out_counts,
            out_edges,
            in_offsets: in_counts,
            in_edges,
            ends,
        }
    }

    pub(in crate::graph) fn out_edges(&self, v_ix: usize) -> &[usize] {
        let start = self.out_offsets[v_ix];
        let end = self.out_offsets[v_ix + 1];
        &self.out_edges[start..end]
    }

    pub(in crate::graph) fn in_edges(&self, v_ix: usize) -> &[usize] {
        let start = self.in_offsets[v_ix];
        let end = self.in_offsets[v_ix + 1];
        &self.in_edges[start..end]
    }
}
