//! Kruskal's minimum spanning tree / forest.
//!
//! Candidates are sorted ascending by weight, ties broken by
//! `(lower endpoint, higher endpoint, input position)`, so the selected edge
//! set is reproducible for a given input.  Each candidate joining two
//! different union-find sets is accepted; the scan stops as soon as
//! `vertices - 1` edges are accepted.
//!
//! If the candidates cannot connect every vertex the result is a forest.
//! [`SpanningForest::is_spanning`] reports which, and
//! [`SpanningForest::into_tree`] turns a forest into an
//! [`AlgoError::Disconnected`].

use rustc_hash::FxHashMap;
use tracing::debug;

use tn_core::{EdgeId, NodeId};
use tn_graph::{CityGraph, EdgeCost};

use crate::union_find::DisjointSet;
use crate::{AlgoError, AlgoResult};

/// An edge offered to [`kruskal`], between dense vertex indices.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateEdge<T> {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
    /// Caller data carried through to the result (an `EdgeId`, a pair of
    /// station indices, …).
    pub payload: T,
}

impl<T> CandidateEdge<T> {
    pub fn new(a: usize, b: usize, weight: f64, payload: T) -> Self {
        Self { a, b, weight, payload }
    }

    #[inline]
    fn ordered(&self) -> (usize, usize) {
        if self.a <= self.b { (self.a, self.b) } else { (self.b, self.a) }
    }
}

/// Result of [`kruskal`]: accepted edges and connectivity summary.
#[derive(Clone, Debug)]
pub struct SpanningForest<T> {
    /// Accepted edges in acceptance (ascending weight) order.
    pub edges: Vec<CandidateEdge<T>>,
    vertex_count: usize,
    components:   usize,
    total_weight: f64,
}

impl<T> SpanningForest<T> {
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Connected components among the vertices after all accepted unions.
    pub fn components(&self) -> usize {
        self.components
    }

    /// `true` if the accepted edges connect every vertex.
    pub fn is_spanning(&self) -> bool {
        self.edges.len() + 1 >= self.vertex_count
    }

    /// The forest as a tree, or `Disconnected` if it does not span.
    pub fn into_tree(self) -> AlgoResult<Self> {
        if self.is_spanning() {
            Ok(self)
        } else {
            Err(AlgoError::Disconnected {
                accepted:   self.edges.len(),
                required:   self.vertex_count.saturating_sub(1),
                components: self.components,
            })
        }
    }
}

/// Minimum spanning forest over vertices `0..vertex_count`.
///
/// Candidates with a non-finite weight are ignored, as are self-loops.  An
/// endpoint outside `0..vertex_count` is an error.
pub fn kruskal<T>(vertex_count: usize, candidates: Vec<CandidateEdge<T>>) -> AlgoResult<SpanningForest<T>> {
    if let Some(bad) = candidates.iter().find(|c| c.a >= vertex_count || c.b >= vertex_count) {
        return Err(AlgoError::IndexOutOfRange {
            index: bad.a.max(bad.b),
            len:   vertex_count,
        });
    }

    let mut candidates: Vec<CandidateEdge<T>> =
        candidates.into_iter().filter(|c| c.weight.is_finite() && c.a != c.b).collect();
    // Stable sort keeps input order as the last tie-breaker.
    candidates.sort_by(|x, y| x.weight.total_cmp(&y.weight).then_with(|| x.ordered().cmp(&y.ordered())));

    let required = vertex_count.saturating_sub(1);
    let mut sets = DisjointSet::new(vertex_count);
    let mut edges = Vec::with_capacity(required);
    let mut total_weight = 0.0;

    for c in candidates {
        if edges.len() == required {
            break;
        }
        if sets.union(c.a, c.b) {
            total_weight += c.weight;
            edges.push(c);
        }
    }

    debug!(
        vertices = vertex_count,
        accepted = edges.len(),
        components = sets.set_count(),
        total_weight,
        "kruskal finished"
    );

    Ok(SpanningForest {
        edges,
        vertex_count,
        components: sets.set_count(),
        total_weight,
    })
}

/// Kruskal over graph edges restricted to a vertex `universe`.
///
/// Each edge in `edge_ids` with both endpoints in `universe` is weighted by
/// `cost`; the rest are ignored.  In the result, `CandidateEdge::a`/`b` index
/// into `universe` and the payload is the graph `EdgeId`.
pub fn kruskal_on_graph<C>(
    graph: &CityGraph,
    universe: &[NodeId],
    edge_ids: impl IntoIterator<Item = EdgeId>,
    cost: &C,
) -> AlgoResult<SpanningForest<EdgeId>>
where
    C: EdgeCost + ?Sized,
{
    let mut local: FxHashMap<NodeId, usize> =
        FxHashMap::with_capacity_and_hasher(universe.len(), Default::default());
    for (i, &v) in universe.iter().enumerate() {
        if !graph.contains_node(v) {
            return Err(AlgoError::NodeNotFound(v));
        }
        if local.insert(v, i).is_some() {
            return Err(AlgoError::DuplicateVertex(v));
        }
    }

    let candidates = edge_ids
        .into_iter()
        .filter_map(|id| {
            let e = graph.edge(id);
            let a = *local.get(&e.a)?;
            let b = *local.get(&e.b)?;
            Some(CandidateEdge::new(a, b, cost.cost(e), id))
        })
        .collect();

    kruskal(universe.len(), candidates)
}
