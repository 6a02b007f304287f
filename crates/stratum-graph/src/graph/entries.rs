//! Internal storage entries for [`Graph`](super::Graph).

#[derive(Debug, Clone)]
pub(in crate::graph) struct NodeEntry {
    pub(in crate::graph) id: String,
    pub(in crate::graph) anchors: Vec<String>,
}

#[derive(Debug, Clone)]
pub(in crate::graph) struct AnchorEntry {
    pub(in crate::graph) id: String,
    pub(in crate::graph) node: String,
}

#[derive(Debug, Clone)]
pub(in crate::graph) struct EdgeEntry {
    pub(in crate::graph) id: String,
    pub(in crate::graph) source: String,
    pub(in crate::graph) target: String,
}
