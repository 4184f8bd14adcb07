//! Router error type.

use thiserror::Error;

use tn_core::{CoreError, NodeId};

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("no node with key {0:?}")]
    UnknownNodeKey(String),

    /// Budgets must be finite and non-negative.
    #[error("invalid budget {0}")]
    InvalidBudget(f64),

    #[error(transparent)]
    Config(#[from] CoreError),
}

pub type RouterResult<T> = Result<T, RouterError>;
