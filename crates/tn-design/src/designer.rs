//! Metro backbone designer.
//!
//! `MetroDesigner` chains the selector, the extractor and Kruskal:
//!
//! 1. Reject the graph if an edge lacks an attribute the cost reads.
//! 2. Select one station per region.
//! 3. Connect the stations with the chosen [`BackboneStrategy`].
//! 4. Return a [`MetroPlan`] with the backbone, its cost and every
//!    per-region / per-pair failure met on the way.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tn_algo::{kruskal, kruskal_on_graph, DistanceMatrix};
use tn_core::{EdgeId, NodeId, TransitConfig, TransportMode};
use tn_graph::{CityGraph, EdgeAttrs, EdgeCost, GraphResult};

use crate::bus::BusOptions;
use crate::extractor::{extract_station_subgraph, trace_back};
use crate::selector::{select_stations, StationChoice};
use crate::{DesignFailure, DesignResult};

// ── Options ───────────────────────────────────────────────────────────────────

/// How the selected stations are joined.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackboneStrategy {
    /// MST of the subgraph formed by the stations' shortest paths to each
    /// other.
    #[default]
    ShortestPathSubgraph,
    /// MST of the complete station distance matrix; each accepted link is
    /// expanded to the physical edges of its shortest path.
    StationDistanceMatrix,
}

/// Knobs for [`MetroDesigner`] and [`BusDesigner`](crate::BusDesigner).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignOptions {
    pub backbone: BackboneStrategy,
    pub bus: BusOptions,
}

impl DesignOptions {
    pub fn validate(&self) -> DesignResult<()> {
        self.bus.validate()
    }
}

// ── MetroPlan ─────────────────────────────────────────────────────────────────

/// Result of a metro design run.
#[derive(Clone, Debug)]
pub struct MetroPlan {
    pub stations: Vec<StationChoice>,
    /// Graph edges forming the backbone.
    pub backbone: Vec<EdgeId>,
    /// Sum of the design cost over `backbone`.
    pub total_cost: f64,
    pub failures: Vec<DesignFailure>,
}

impl MetroPlan {
    /// `true` if every region got a station and every station is connected.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn station_nodes(&self) -> Vec<NodeId> {
        self.stations.iter().map(|s| s.station).collect()
    }

    /// Lay `metro` edges along the backbone.
    ///
    /// Each backbone street gets a metro edge with the street's length and
    /// excavation cost, the metro fare as price and the metro travel time.
    /// Streets that already carry a metro edge are left alone.
    pub fn apply_to(&self, graph: CityGraph, config: &TransitConfig) -> GraphResult<CityGraph> {
        let streets: Vec<_> = self
            .backbone
            .iter()
            .map(|&id| graph.edge(id).clone())
            .collect();
        let mut b = graph.into_builder();
        for e in streets {
            if b.has_edge(e.a, e.b, TransportMode::Metro) {
                continue;
            }
            let d = e.attrs.distance;
            let mut attrs = EdgeAttrs::new(d, config.fares.metro, config.travel_minutes(TransportMode::Metro, d));
            attrs.excavation = e.attrs.excavation;
            b.add_edge(e.a, e.b, TransportMode::Metro, attrs)?;
        }
        Ok(b.build())
    }
}

// ── MetroDesigner ─────────────────────────────────────────────────────────────

/// Designs a metro backbone under the edge cost `C` (typically
/// [`CostAttribute::Excavation`](tn_graph::CostAttribute::Excavation)).
pub struct MetroDesigner<C> {
    cost: C,
    options: DesignOptions,
}

impl<C: EdgeCost + Sync> MetroDesigner<C> {
    pub fn new(cost: C) -> Self {
        Self { cost, options: DesignOptions::default() }
    }

    pub fn with_options(mut self, options: DesignOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DesignOptions {
        &self.options
    }

    pub fn design(&self, graph: &CityGraph) -> DesignResult<MetroPlan> {
        self.options.validate()?;
        graph.validate_cost(&self.cost)?;

        let selection = select_stations(graph, &self.cost)?;
        let mut failures = selection.failures;
        let stations = selection.stations;

        let (backbone, spanning, components) = match self.options.backbone {
            BackboneStrategy::ShortestPathSubgraph => self.subgraph_backbone(graph, &stations, &mut failures)?,
            BackboneStrategy::StationDistanceMatrix => self.matrix_backbone(graph, &stations, &mut failures)?,
        };
        if !spanning {
            warn!(components, "metro backbone does not connect every station");
            failures.push(DesignFailure::Disconnected { components });
        }

        let total_cost: f64 = backbone.iter().map(|&id| self.cost.cost(graph.edge(id))).sum();
        info!(
            stations = stations.len(),
            edges = backbone.len(),
            total_cost,
            failures = failures.len(),
            "metro backbone designed"
        );
        Ok(MetroPlan { stations, backbone, total_cost, failures })
    }

    /// Returns `(edges, spanning, components)`.
    fn subgraph_backbone(
        &self,
        graph: &CityGraph,
        stations: &[StationChoice],
        failures: &mut Vec<DesignFailure>,
    ) -> DesignResult<(Vec<EdgeId>, bool, usize)> {
        let sub = extract_station_subgraph(graph, stations, &self.cost);
        failures.extend(sub.failures);

        // Stations with no extracted edge still have to be spanned.
        let mut universe = sub.nodes;
        universe.extend(stations.iter().map(|s| s.station));
        universe.sort_unstable();
        universe.dedup();

        let forest = kruskal_on_graph(graph, &universe, sub.edges, &self.cost)?;
        let spanning = forest.is_spanning();
        let components = forest.components();
        Ok((forest.edges.into_iter().map(|c| c.payload).collect(), spanning, components))
    }

    fn matrix_backbone(
        &self,
        graph: &CityGraph,
        stations: &[StationChoice],
        failures: &mut Vec<DesignFailure>,
    ) -> DesignResult<(Vec<EdgeId>, bool, usize)> {
        let matrix = DistanceMatrix::from_trees(stations.iter().map(|s| &s.tree));
        let forest = kruskal(matrix.len(), matrix.candidate_edges())?;

        let mut seen: FxHashSet<(NodeId, NodeId)> = FxHashSet::default();
        let mut edges = Vec::new();
        for link in &forest.edges {
            let (i, j) = link.payload;
            match trace_back(graph, &stations[i].tree, stations[j].station, &self.cost) {
                Ok(path) => {
                    for id in path.into_iter().rev() {
                        if seen.insert(graph.edge(id).endpoints()) {
                            edges.push(id);
                        }
                    }
                }
                Err(failure) => {
                    warn!(%failure, "station link could not be expanded");
                    failures.push(failure);
                }
            }
        }
        Ok((edges, forest.is_spanning(), forest.components()))
    }
}
