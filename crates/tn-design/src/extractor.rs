//! Station subgraph extraction.
//!
//! Every station's retained tree is walked backwards from each *other*
//! station until the owner is reached.  Each step `child → parent` is
//! resolved to an edge of the graph joining the two vertices (either
//! orientation, cheapest under the design cost, lowest `EdgeId` on ties).
//!
//! A missing parent pointer yields [`DesignFailure::NoPathRecorded`]; a step
//! with no joining edge yields [`DesignFailure::MissingEdge`].  Either way
//! the partial path of that pair is discarded.
//!
//! Edges collected over all pairs are deduplicated on the unordered endpoint
//! pair, so `(a, b)` and `(b, a)` count once.

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use tn_algo::ShortestPathTree;
use tn_core::{EdgeId, NodeId};
use tn_graph::{CityGraph, EdgeCost};

use crate::selector::StationChoice;
use crate::DesignFailure;

/// Edges and vertices connecting the selected stations.
#[derive(Clone, Debug, Default)]
pub struct StationSubgraph {
    /// Deduplicated edges in discovery order.
    pub edges: Vec<EdgeId>,
    /// Every vertex touched by `edges`, ascending.
    pub nodes: Vec<NodeId>,
    pub failures: Vec<DesignFailure>,
}

/// Cheapest finite edge joining `x` and `y`.
pub(crate) fn resolve_step<C>(graph: &CityGraph, x: NodeId, y: NodeId, cost: &C) -> Option<EdgeId>
where
    C: EdgeCost + ?Sized,
{
    graph
        .edges_between(x, y)
        .map(|e| (cost.cost(e), e.id))
        .filter(|(c, _)| c.is_finite())
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(_, id)| id)
}

/// Walk `tree` from `target` back to its source, resolving each step to an
/// edge.  Edges are returned target-first.
pub(crate) fn trace_back<C>(
    graph: &CityGraph,
    tree: &ShortestPathTree,
    target: NodeId,
    cost: &C,
) -> Result<Vec<EdgeId>, DesignFailure>
where
    C: EdgeCost + ?Sized,
{
    let owner = tree.source();
    let mut path = Vec::new();
    let mut cur = target;
    while cur != owner {
        let Some(parent) = tree.parent(cur) else {
            return Err(DesignFailure::NoPathRecorded { from: owner, to: target });
        };
        let edge = resolve_step(graph, parent, cur, cost)
            .ok_or(DesignFailure::MissingEdge { from: parent, to: cur })?;
        path.push(edge);
        cur = parent;
    }
    Ok(path)
}

/// Build the subgraph joining every pair of `stations` along their retained
/// shortest-path trees.
pub fn extract_station_subgraph<C>(graph: &CityGraph, stations: &[StationChoice], cost: &C) -> StationSubgraph
where
    C: EdgeCost + ?Sized,
{
    let mut out = StationSubgraph::default();
    let mut seen_pairs: FxHashSet<(NodeId, NodeId)> = FxHashSet::default();
    let mut touched: FxHashSet<NodeId> = FxHashSet::default();
    // Each unordered station pair is reported at most once.
    let mut failed_pairs: FxHashSet<(NodeId, NodeId)> = FxHashSet::default();

    for owner in stations {
        for other in stations {
            if other.station == owner.station {
                continue;
            }
            match trace_back(graph, &owner.tree, other.station, cost) {
                Ok(path) => {
                    for id in path {
                        let e = graph.edge(id);
                        if seen_pairs.insert(e.endpoints()) {
                            out.edges.push(id);
                            touched.insert(e.a);
                            touched.insert(e.b);
                        }
                    }
                }
                Err(failure) => {
                    let (a, b) = (owner.station, other.station);
                    if failed_pairs.insert((a.min(b), a.max(b))) {
                        warn!(%failure, "station pair not connected");
                        out.failures.push(failure);
                    }
                }
            }
        }
    }

    out.nodes = touched.into_iter().collect();
    out.nodes.sort_unstable();
    debug!(edges = out.edges.len(), nodes = out.nodes.len(), failures = out.failures.len(), "station subgraph extracted");
    out
}
