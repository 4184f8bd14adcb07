//! JSON graph loader.
//!
//! # File format
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "node_0_0", "location": [0, 0],
//!       "transport_options": ["taxi", "non_motorized"], "region": "51000" }
//!   ],
//!   "edges": [
//!     { "from": "node_0_0", "to": "node_0_1", "transport_type": "walk",
//!       "distance": 200, "price_cost": 0, "time_cost": 133.3,
//!       "max_speed": 1.5, "excavation_cost": 200,
//!       "num_residential": 3, "num_commercial": 1 }
//!   ]
//! }
//! ```
//!
//! `distance`, `price_cost` and `time_cost` are required on every edge; a
//! record without them is rejected before a graph is produced.  `region` may
//! be a string or an integer.
//!
//! Exports commonly list each street twice (once per direction).  Because
//! the graph is undirected, the second record of the same `(pair, mode)` is
//! skipped and counted in [`LoadReport::skipped_duplicates`].

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use tn_core::{Point, RegionTag, TransportMode};

use crate::graph::{CityGraph, CityGraphBuilder, EdgeAttrs, LandUse, Node};
use crate::GraphResult;

// ── JSON records ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GraphFile {
    #[serde(default)]
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    edges: Vec<EdgeRecord>,
}

#[derive(Deserialize)]
struct NodeRecord {
    id:       String,
    location: Point,
    #[serde(default)]
    transport_options: Vec<String>,
    #[serde(default)]
    region: Option<RegionTag>,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:           String,
    to:             String,
    transport_type: String,
    distance:       f64,
    price_cost:     f64,
    time_cost:      f64,
    #[serde(default)]
    excavation_cost: Option<f64>,
    #[serde(default)]
    max_speed: Option<f64>,
    #[serde(default, alias = "num_residencial")]
    num_residential: u32,
    #[serde(default)]
    num_commercial: u32,
    #[serde(default)]
    num_touristic: u32,
    #[serde(default)]
    num_industrial: u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Summary of a load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub nodes: usize,
    pub edges: usize,
    /// Edge records skipped as exact reverse-direction copies of a loaded edge.
    pub skipped_duplicates: usize,
}

/// Load a graph from a JSON file.
pub fn load_graph_json(path: &Path) -> GraphResult<(CityGraph, LoadReport)> {
    let file = std::fs::File::open(path)?;
    let (graph, report) = load_graph_reader(std::io::BufReader::new(file))?;
    info!(
        path = %path.display(),
        nodes = report.nodes,
        edges = report.edges,
        skipped = report.skipped_duplicates,
        "graph loaded"
    );
    Ok((graph, report))
}

/// Like [`load_graph_json`] but accepts any `Read` source.
pub fn load_graph_reader<R: Read>(reader: R) -> GraphResult<(CityGraph, LoadReport)> {
    let file: GraphFile = serde_json::from_reader(reader)?;

    let mut builder = CityGraphBuilder::with_capacity(file.nodes.len(), file.edges.len() / 2);
    let mut report = LoadReport::default();

    for rec in file.nodes {
        let options = rec
            .transport_options
            .iter()
            .map(|s| s.parse::<TransportMode>())
            .collect::<Result<Vec<_>, _>>()?;
        let mut node = Node::new(rec.id, rec.location).with_options(options);
        node.region = rec.region;
        builder.add_node(node)?;
        report.nodes += 1;
    }

    for rec in file.edges {
        let mode: TransportMode = rec.transport_type.parse()?;
        let a = builder
            .node_by_key(&rec.from)
            .ok_or_else(|| crate::GraphError::UnknownNodeKey(rec.from.clone()))?;
        let b = builder
            .node_by_key(&rec.to)
            .ok_or_else(|| crate::GraphError::UnknownNodeKey(rec.to.clone()))?;

        let mut attrs = EdgeAttrs::new(rec.distance, rec.price_cost, rec.time_cost)
            .with_land_use(LandUse {
                residential: rec.num_residential,
                commercial:  rec.num_commercial,
                touristic:   rec.num_touristic,
                industrial:  rec.num_industrial,
            });
        attrs.excavation = rec.excavation_cost;
        attrs.max_speed = rec.max_speed;

        // Files list each street in both directions; only an exact mirror of
        // a loaded edge is skipped.  Any other repeat fails in `add_edge`.
        let mirrored = builder
            .find_edge(a, b, mode)
            .is_some_and(|e| e.a == b && e.b == a && e.attrs == attrs);
        if mirrored {
            debug!(from = %rec.from, to = %rec.to, %mode, "skipping mirrored edge record");
            report.skipped_duplicates += 1;
            continue;
        }

        builder.add_edge(a, b, mode, attrs)?;
        report.edges += 1;
    }

    Ok((builder.build(), report))
}
