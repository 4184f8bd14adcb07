//! Design error types.

use thiserror::Error;

use tn_algo::AlgoError;
use tn_core::{NodeId, RegionTag};
use tn_graph::GraphError;

/// Errors that abort a design run.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Algo(#[from] AlgoError),

    #[error("invalid design options: {0}")]
    Options(String),
}

pub type DesignResult<T> = Result<T, DesignError>;

/// A problem confined to one region or one station pair.
///
/// Recorded in the plan; the rest of the run continues.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DesignFailure {
    /// Every candidate of the region has an unreachable fellow member.
    #[error("region {region} has no station reaching all of its members")]
    NoValidStation { region: RegionTag },

    /// The owner's shortest-path tree has no parent chain from `to` back to
    /// `from`.
    #[error("no path recorded from station {from} to station {to}")]
    NoPathRecorded { from: NodeId, to: NodeId },

    /// A tree step `from → to` has no matching edge in the graph.
    #[error("no graph edge joins {from} and {to}")]
    MissingEdge { from: NodeId, to: NodeId },

    /// The backbone could not connect every station.
    #[error("backbone is disconnected: {components} components remain")]
    Disconnected { components: usize },
}
