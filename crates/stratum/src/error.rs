use stratum_graph::GraphError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The diagram violates a graph-model invariant (dangling anchor, binding to a missing
    /// node or edge). Layout is not attempted on a malformed model.
    #[error("structural inconsistency: {0}")]
    Structure(#[from] GraphError),
    #[error("invalid layout options: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
