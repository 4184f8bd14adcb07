//! Region representative selection (min-max eccentricity).
//!
//! For each region every member is tried as the station.  A full SSSP is run
//! from the candidate and its score is the largest distance to any other
//! member of the same region.  Candidates that cannot reach some member are
//! dropped rather than scored as infinitely bad; if that leaves no candidate,
//! the region yields [`DesignFailure::NoValidStation`].
//!
//! The lowest eccentricity wins and ties go to the member listed first.  The
//! winner's tree is kept in the [`StationChoice`] so the extractor can walk
//! its parent pointers without recomputing it.

use tracing::{debug, info, warn};

use tn_algo::{shortest_paths, ShortestPathTree};
use tn_core::{NodeId, RegionId};
use tn_graph::{CityGraph, EdgeCost, Region};

use crate::{DesignFailure, DesignResult};

/// The station chosen for one region.
#[derive(Clone, Debug)]
pub struct StationChoice {
    pub region: RegionId,
    pub station: NodeId,
    /// Largest in-region distance from `station`.
    pub eccentricity: f64,
    /// Shortest-path tree rooted at `station`.
    pub tree: ShortestPathTree,
}

/// Output of [`select_stations`].
#[derive(Clone, Debug, Default)]
pub struct Selection {
    /// At most one station per region, in region order.
    pub stations: Vec<StationChoice>,
    pub failures: Vec<DesignFailure>,
}

impl Selection {
    pub fn station_nodes(&self) -> Vec<NodeId> {
        self.stations.iter().map(|s| s.station).collect()
    }
}

/// Largest distance from the tree's source to any of `members`, or `None`
/// if one of them is unreachable.
pub(crate) fn eccentricity(tree: &ShortestPathTree, members: &[NodeId]) -> Option<f64> {
    members
        .iter()
        .try_fold(0.0_f64, |worst, &m| tree.distance(m).map(|d| worst.max(d)))
}

/// Pick the station of a single region.
///
/// `Ok(None)` means no member reaches every other member (or the region is
/// empty).
pub fn select_station<C>(graph: &CityGraph, region: &Region, cost: &C) -> DesignResult<Option<StationChoice>>
where
    C: EdgeCost + Sync + ?Sized,
{
    let scored = evaluate_candidates(graph, &region.members, cost)?;

    let mut best: Option<StationChoice> = None;
    for (station, result) in region.members.iter().copied().zip(scored) {
        let Some((ecc, tree)) = result else {
            debug!(region = %region.tag, %station, "candidate cannot reach every member");
            continue;
        };
        debug!(region = %region.tag, %station, eccentricity = ecc, "candidate scored");
        if best.as_ref().is_none_or(|b| ecc < b.eccentricity) {
            best = Some(StationChoice { region: region.id, station, eccentricity: ecc, tree });
        }
    }
    Ok(best)
}

/// Pick one station per region of `graph`.
pub fn select_stations<C>(graph: &CityGraph, cost: &C) -> DesignResult<Selection>
where
    C: EdgeCost + Sync + ?Sized,
{
    let mut selection = Selection::default();
    for region in graph.regions() {
        match select_station(graph, region, cost)? {
            Some(choice) => selection.stations.push(choice),
            None => {
                warn!(region = %region.tag, members = region.len(), "no valid station for region");
                selection.failures.push(DesignFailure::NoValidStation { region: region.tag.clone() });
            }
        }
    }
    info!(
        stations = selection.stations.len(),
        failed = selection.failures.len(),
        "stations selected"
    );
    Ok(selection)
}

// ── Candidate evaluation ──────────────────────────────────────────────────────

type Scored = Option<(f64, ShortestPathTree)>;

/// One SSSP per member; `None` for members that miss some fellow member.
/// Results are in member order.
fn evaluate_candidates<C>(graph: &CityGraph, members: &[NodeId], cost: &C) -> DesignResult<Vec<Scored>>
where
    C: EdgeCost + Sync + ?Sized,
{
    let score = |candidate: NodeId| -> DesignResult<Scored> {
        let tree = shortest_paths(graph, candidate, cost)?;
        Ok(eccentricity(&tree, members).map(|ecc| (ecc, tree)))
    };

    #[cfg(not(feature = "parallel"))]
    {
        members.iter().map(|&m| score(m)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        members.par_iter().map(|&m| score(m)).collect()
    }
}
