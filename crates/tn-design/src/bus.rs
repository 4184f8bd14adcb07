//! Bus network designer.
//!
//! # Stops
//!
//! Each region gets up to `stops_per_region` stops.  The first is the
//! region's min-max centre (the same choice the metro selector makes).  The
//! others are taken from the region's members in order: a member qualifies
//! if its network distance to every stop already chosen in the region is at
//! least `min_stop_spacing`.
//!
//! # Links and lines
//!
//! All stops of all regions are tabulated in one distance matrix; its MST
//! gives the bus links.  Stops joined by links form a line, and each line is
//! ordered with the nearest-unvisited heuristic starting from its first stop.
//! The ordering is a heuristic, not an optimal tour.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tn_algo::{greedy_tour, kruskal, shortest_paths, DisjointSet, DistanceMatrix, ShortestPathTree};
use tn_core::{EdgeId, NodeId, RegionId, TransitConfig, TransportMode};
use tn_graph::{CityGraph, EdgeAttrs, EdgeCost, GraphResult, LandUse, Region};

use crate::extractor::trace_back;
use crate::selector::select_station;
use crate::{DesignError, DesignFailure, DesignResult};

// ── Options ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusOptions {
    /// Upper bound on stops per region (at least 1).
    pub stops_per_region: usize,
    /// Minimum network distance between two stops of the same region.
    pub min_stop_spacing: f64,
}

impl Default for BusOptions {
    fn default() -> Self {
        Self { stops_per_region: 3, min_stop_spacing: 800.0 }
    }
}

impl BusOptions {
    pub fn validate(&self) -> DesignResult<()> {
        if self.stops_per_region == 0 {
            return Err(DesignError::Options("stops_per_region must be at least 1".into()));
        }
        if !(self.min_stop_spacing.is_finite() && self.min_stop_spacing >= 0.0) {
            return Err(DesignError::Options(format!(
                "min_stop_spacing must be a non-negative number, got {}",
                self.min_stop_spacing
            )));
        }
        Ok(())
    }
}

// ── Plan ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BusStop {
    pub region: RegionId,
    pub node: NodeId,
}

/// A bus connection between two stops along their shortest street path.
#[derive(Clone, Debug, PartialEq)]
pub struct BusLink {
    pub a: NodeId,
    pub b: NodeId,
    /// Street length of the path in metres.
    pub distance: f64,
    /// Design cost of the path.
    pub cost: f64,
    /// Streets followed, from `a` to `b`.
    pub path: Vec<EdgeId>,
}

/// Stops served by one connected group of links, in riding order.
#[derive(Clone, Debug, PartialEq)]
pub struct BusLine {
    pub stops: Vec<NodeId>,
    /// Design-cost length of the ordered stop sequence.
    pub length: f64,
    /// Properties along the streets the line's links follow.
    pub coverage: LandUse,
}

#[derive(Clone, Debug, Default)]
pub struct BusPlan {
    pub stops: Vec<BusStop>,
    pub links: Vec<BusLink>,
    pub lines: Vec<BusLine>,
    /// Sum of link costs.
    pub total_cost: f64,
    pub failures: Vec<DesignFailure>,
}

impl BusPlan {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Add a `bus` edge for every link whose stops are not already joined by
    /// one.  The edge carries the street distance of the link, bus travel
    /// time and no price (the fare is charged on boarding).
    pub fn apply_to(&self, graph: CityGraph, config: &TransitConfig) -> GraphResult<CityGraph> {
        let mut b = graph.into_builder();
        let mut added = 0usize;
        for link in &self.links {
            if b.has_edge(link.a, link.b, TransportMode::Bus) {
                continue;
            }
            let attrs = EdgeAttrs::new(
                link.distance,
                0.0,
                config.travel_minutes(TransportMode::Bus, link.distance),
            );
            b.add_edge(link.a, link.b, TransportMode::Bus, attrs)?;
            added += 1;
        }
        debug!(added, "bus edges laid");
        Ok(b.build())
    }
}

// ── BusDesigner ───────────────────────────────────────────────────────────────

pub struct BusDesigner<C> {
    cost: C,
    options: BusOptions,
}

impl<C: EdgeCost + Sync> BusDesigner<C> {
    pub fn new(cost: C) -> Self {
        Self { cost, options: BusOptions::default() }
    }

    pub fn with_options(mut self, options: BusOptions) -> Self {
        self.options = options;
        self
    }

    pub fn design(&self, graph: &CityGraph) -> DesignResult<BusPlan> {
        self.options.validate()?;
        graph.validate_cost(&self.cost)?;

        let mut plan = BusPlan::default();
        let mut trees: Vec<ShortestPathTree> = Vec::new();

        for region in graph.regions() {
            let Some(picked) = self.place_stops(graph, region)? else {
                warn!(region = %region.tag, "no valid bus stop for region");
                plan.failures.push(DesignFailure::NoValidStation { region: region.tag.clone() });
                continue;
            };
            debug!(region = %region.tag, stops = picked.len(), "bus stops placed");
            for tree in picked {
                plan.stops.push(BusStop { region: region.id, node: tree.source() });
                trees.push(tree);
            }
        }

        let matrix = DistanceMatrix::from_trees(&trees);
        let forest = kruskal(matrix.len(), matrix.candidate_edges())?;
        if !forest.is_spanning() {
            warn!(components = forest.components(), "bus links do not connect every stop");
            plan.failures.push(DesignFailure::Disconnected { components: forest.components() });
        }

        let mut groups = DisjointSet::new(matrix.len());
        for c in &forest.edges {
            let (i, j) = c.payload;
            match trace_back(graph, &trees[i], trees[j].source(), &self.cost) {
                Ok(mut path) => {
                    path.reverse();
                    groups.union(i, j);
                    plan.links.push(BusLink {
                        a: trees[i].source(),
                        b: trees[j].source(),
                        distance: path.iter().map(|&e| graph.edge(e).attrs.distance).sum(),
                        cost: c.weight,
                        path,
                    });
                }
                Err(failure) => {
                    warn!(%failure, "bus link could not be expanded");
                    plan.failures.push(failure);
                }
            }
        }
        plan.total_cost = plan.links.iter().map(|l| l.cost).sum();
        plan.lines = self.order_lines(graph, &matrix, &mut groups, &plan.links);

        info!(
            stops = plan.stops.len(),
            links = plan.links.len(),
            lines = plan.lines.len(),
            total_cost = plan.total_cost,
            "bus network designed"
        );
        Ok(plan)
    }

    /// Trees of the stops chosen in `region`, centre first; `None` if the
    /// region has no valid centre.
    fn place_stops(&self, graph: &CityGraph, region: &Region) -> DesignResult<Option<Vec<ShortestPathTree>>> {
        let Some(centre) = select_station(graph, region, &self.cost)? else {
            return Ok(None);
        };
        let mut picked = vec![centre.tree];

        for &m in &region.members {
            if picked.len() >= self.options.stops_per_region {
                break;
            }
            let spaced = picked.iter().all(|t| {
                t.source() != m && t.distance(m).is_some_and(|d| d >= self.options.min_stop_spacing)
            });
            if spaced {
                picked.push(shortest_paths(graph, m, &self.cost)?);
            }
        }
        Ok(Some(picked))
    }

    /// One line per group of stops joined by links, ordered greedily.
    fn order_lines(
        &self,
        graph: &CityGraph,
        matrix: &DistanceMatrix,
        groups: &mut DisjointSet,
        links: &[BusLink],
    ) -> Vec<BusLine> {
        let mut members_of: Vec<Vec<usize>> = vec![Vec::new(); matrix.len()];
        for i in 0..matrix.len() {
            members_of[groups.find(i)].push(i);
        }

        let mut lines = Vec::new();
        for members in members_of.into_iter().filter(|m| m.len() > 1) {
            let tour = greedy_tour(matrix, &members, members[0]);
            let stops: Vec<NodeId> = tour.order.iter().map(|&i| matrix.points()[i]).collect();

            let mut coverage = LandUse::default();
            for link in links.iter().filter(|l| stops.contains(&l.a)) {
                for &e in &link.path {
                    coverage += graph.edge(e).attrs.land_use;
                }
            }
            lines.push(BusLine { stops, length: tour.length, coverage });
        }
        lines
    }
}
