//! Algorithm error type.

use thiserror::Error;

use tn_core::NodeId;

/// Errors produced by `tn-algo`.
#[derive(Debug, Error, PartialEq)]
pub enum AlgoError {
    /// An element index outside `0..len` was passed to a dense structure.
    #[error("index {index} out of range for {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("node {0} listed twice in vertex universe")]
    DuplicateVertex(NodeId),

    /// The candidate edges could not connect every required vertex.
    #[error("disconnected: accepted {accepted} of {required} edges, {components} components remain")]
    Disconnected { accepted: usize, required: usize, components: usize },
}

pub type AlgoResult<T> = Result<T, AlgoError>;
