//! Network distances among a chosen set of points.

use tn_core::NodeId;
use tn_graph::{CityGraph, EdgeCost};

use crate::mst::CandidateEdge;
use crate::sssp::{shortest_paths, ShortestPathTree};
use crate::AlgoResult;

/// Square matrix of shortest-path distances between `points`.
///
/// Row `i` comes from the shortest-path tree rooted at `points[i]`.
/// Unreachable pairs hold `f64::INFINITY`.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    points: Vec<NodeId>,
    dist:   Vec<f64>,
}

impl DistanceMatrix {
    /// Run one SSSP per point and tabulate the results.
    pub fn build<C>(graph: &CityGraph, points: &[NodeId], cost: &C) -> AlgoResult<Self>
    where
        C: EdgeCost + ?Sized,
    {
        let trees = points
            .iter()
            .map(|&p| shortest_paths(graph, p, cost))
            .collect::<AlgoResult<Vec<_>>>()?;
        Ok(Self::from_trees(&trees))
    }

    /// Tabulate already computed trees; the points are the trees' sources.
    pub fn from_trees<'a>(trees: impl IntoIterator<Item = &'a ShortestPathTree>) -> Self {
        let trees: Vec<&ShortestPathTree> = trees.into_iter().collect();
        let points: Vec<NodeId> = trees.iter().map(|t| t.source()).collect();
        let dist = trees
            .iter()
            .flat_map(|t| points.iter().map(move |&p| t.distances()[p.index()]))
            .collect();
        Self { points, dist }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[NodeId] {
        &self.points
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.dist[i * self.points.len() + j]
    }

    /// One candidate per unordered finite pair `i < j`, payload `(i, j)`.
    pub fn candidate_edges(&self) -> Vec<CandidateEdge<(usize, usize)>> {
        let n = self.points.len();
        let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in i + 1..n {
                let d = self.get(i, j);
                if d.is_finite() {
                    out.push(CandidateEdge::new(i, j, d, (i, j)));
                }
            }
        }
        out
    }
}
