//! Single-source shortest paths (Dijkstra with decrease-key).
//!
//! Unlike a point-to-point router, the search runs until the queue is empty:
//! station selection needs the distance to *every* region member from each
//! candidate, and the path extractor needs the full parent-pointer tree.
//!
//! # Settlement
//!
//! A vertex is settled exactly once, when it is popped.  Edges into settled
//! vertices are never relaxed, and edges whose cost is `f64::INFINITY` are
//! treated as absent.  Settlement order is recorded and is non-decreasing in
//! distance.

use tn_core::{EdgeId, NodeId};
use tn_graph::{CityGraph, EdgeCost};

use crate::heap::IndexedMinHeap;
use crate::{AlgoError, AlgoResult};

// ── ShortestPathTree ──────────────────────────────────────────────────────────

/// Distances and parent pointers from one source to every vertex.
///
/// Unreached vertices have infinite distance and no parent.  The source has
/// distance 0 and no parent.
#[derive(Clone, Debug)]
pub struct ShortestPathTree {
    source:  NodeId,
    dist:    Vec<f64>,
    /// `(parent vertex, edge used to reach this vertex)`.
    parent:  Vec<Option<(NodeId, EdgeId)>>,
    settled: Vec<NodeId>,
}

impl ShortestPathTree {
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Shortest distance to `v`, or `None` if `v` is unreachable.
    #[inline]
    pub fn distance(&self, v: NodeId) -> Option<f64> {
        let d = self.dist[v.index()];
        d.is_finite().then_some(d)
    }

    /// Raw distance vector indexed by `NodeId`; unreachable = `f64::INFINITY`.
    pub fn distances(&self) -> &[f64] {
        &self.dist
    }

    #[inline]
    pub fn is_reachable(&self, v: NodeId) -> bool {
        self.dist[v.index()].is_finite()
    }

    /// Predecessor of `v` on its shortest path.
    #[inline]
    pub fn parent(&self, v: NodeId) -> Option<NodeId> {
        self.parent[v.index()].map(|(p, _)| p)
    }

    /// The edge through which `v` was last relaxed.
    #[inline]
    pub fn parent_edge(&self, v: NodeId) -> Option<EdgeId> {
        self.parent[v.index()].map(|(_, e)| e)
    }

    /// Vertices in the order they were settled (the source first).
    pub fn settle_order(&self) -> &[NodeId] {
        &self.settled
    }

    pub fn reachable_count(&self) -> usize {
        self.settled.len()
    }

    /// Vertex sequence `source → … → target`, or `None` if unreachable.
    pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
        if !self.is_reachable(target) {
            return None;
        }
        let mut path = vec![target];
        let mut cur = target;
        while let Some(p) = self.parent(cur) {
            path.push(p);
            cur = p;
        }
        path.reverse();
        Some(path)
    }

    /// Edge sequence `source → … → target`, or `None` if unreachable.
    pub fn edges_to(&self, target: NodeId) -> Option<Vec<EdgeId>> {
        if !self.is_reachable(target) {
            return None;
        }
        let mut edges = Vec::new();
        let mut cur = target;
        while let Some((p, e)) = self.parent[cur.index()] {
            edges.push(e);
            cur = p;
        }
        edges.reverse();
        Some(edges)
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Shortest paths from `source` to every vertex of `graph` under `cost`.
///
/// `cost` must return non-negative values; `f64::INFINITY` hides an edge.
/// O((V + E) log V).
pub fn shortest_paths<C>(graph: &CityGraph, source: NodeId, cost: &C) -> AlgoResult<ShortestPathTree>
where
    C: EdgeCost + ?Sized,
{
    if !graph.contains_node(source) {
        return Err(AlgoError::NodeNotFound(source));
    }

    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut parent: Vec<Option<(NodeId, EdgeId)>> = vec![None; n];
    let mut done = vec![false; n];
    let mut settled = Vec::new();

    let mut queue = IndexedMinHeap::with_capacity(n);
    dist[source.index()] = 0.0;
    queue.push_or_decrease(source.index(), 0.0);

    while let Some((u, d)) = queue.pop() {
        done[u] = true;
        let node = NodeId(u as u32);
        settled.push(node);

        for inc in graph.neighbors(node) {
            let v = inc.to.index();
            if done[v] {
                continue;
            }
            let w = cost.cost(graph.edge(inc.edge));
            debug_assert!(!(w < 0.0), "negative edge cost {w} on {}", inc.edge);
            if !w.is_finite() {
                continue;
            }
            let candidate = d + w;
            if candidate < dist[v] {
                dist[v] = candidate;
                parent[v] = Some((node, inc.edge));
                queue.push_or_decrease(v, candidate);
            }
        }
    }

    Ok(ShortestPathTree { source, dist, parent, settled })
}
