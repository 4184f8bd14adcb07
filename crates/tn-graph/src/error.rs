//! Graph-subsystem error type.

use thiserror::Error;

use tn_core::{CoreError, EdgeId, NodeId, TransportMode};

/// Errors produced by `tn-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("no node with key {0:?}")]
    UnknownNodeKey(String),

    #[error("duplicate node key {0:?}")]
    DuplicateNode(String),

    /// An edge with the same unordered endpoints and transport type exists.
    #[error("duplicate {mode} edge between {a:?} and {b:?}")]
    DuplicateEdge { a: String, b: String, mode: TransportMode },

    #[error("self-loop on node {0:?}")]
    SelfLoop(String),

    #[error("edge {a:?}-{b:?}: attribute {attribute} must be finite and non-negative, got {value}")]
    InvalidAttribute { a: String, b: String, attribute: &'static str, value: f64 },

    /// An edge lacks an attribute the selected cost function reads.
    #[error("edge {edge} has no {attribute} attribute")]
    MissingAttribute { edge: EdgeId, attribute: &'static str },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("graph JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
