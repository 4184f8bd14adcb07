//! Greedy nearest-unvisited ordering.
//!
//! Used to turn a set of bus stops into a line.  This is the classic
//! nearest-neighbour heuristic; the resulting tour can be far from the
//! optimal travelling-salesman tour.

use crate::matrix::DistanceMatrix;

/// An open path over matrix indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tour {
    /// Matrix indices in visiting order.
    pub order: Vec<usize>,
    /// Sum of the distances between consecutive stops.
    pub length: f64,
    /// Members never reached because no finite distance led to them.
    pub unreached: Vec<usize>,
}

/// Visit `members` starting at `start`, always moving to the nearest
/// unvisited member.
///
/// Ties go to the member listed first.  If `start` is not in `members` it is
/// still visited first.
pub fn greedy_tour(matrix: &DistanceMatrix, members: &[usize], start: usize) -> Tour {
    let mut remaining: Vec<usize> = members.iter().copied().filter(|&m| m != start).collect();
    let mut tour = Tour { order: vec![start], ..Default::default() };
    let mut here = start;

    loop {
        let mut best: Option<(usize, f64)> = None;
        for (pos, &m) in remaining.iter().enumerate() {
            let d = matrix.get(here, m);
            if d.is_finite() && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((pos, d));
            }
        }
        let Some((pos, d)) = best else { break };
        here = remaining.remove(pos);
        tour.order.push(here);
        tour.length += d;
    }

    tour.unreached = remaining;
    tour
}
