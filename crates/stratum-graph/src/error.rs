#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("unknown node: {id}")]
    UnknownNode { id: String },
    #[error("unknown anchor: {id}")]
    UnknownAnchor { id: String },
    #[error("unknown edge: {id}")]
    UnknownEdge { id: String },
    #[error("unknown figure: {id}")]
    UnknownFigure { id: String },
    #[error("anchor {id} is already attached to node {node}")]
    DuplicateAnchor { id: String, node: String },
    #[error("anchor {anchor} of edge {edge} does not belong to a node in the graph")]
    DanglingAnchor { edge: String, anchor: String },
    #[error("figure {figure} has no routing point at index {index} (path length {len})")]
    PathPointOutOfRange {
        figure: String,
        index: usize,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, GraphError>;
