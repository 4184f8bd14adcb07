//! grid_city — end-to-end run of the transit-network planner.
//!
//! Builds (or loads) a city, lays a metro backbone along the cheapest streets
//! to dig, adds bus lines, then answers a few fastest-route queries under
//! growing budgets.
//!
//! ```text
//! grid_city [CITY_JSON [TRANSIT_CONFIG_JSON]]
//! ```
//!
//! Without arguments a seeded 24 × 16 grid city is generated.  Set
//! `RUST_LOG=debug` for per-region and per-query detail.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tn_core::{NodeId, TransitConfig, TransportMode};
use tn_design::{BusDesigner, MetroDesigner};
use tn_graph::{
    generate_grid_city, load_graph_json, CityGraph, CostAttribute, GridCityConfig, ModeFiltered,
};
use tn_router::{BudgetRouter, Router};

// ── Constants ─────────────────────────────────────────────────────────────────

const BUDGETS: [f64; 5] = [0.0, 3.5, 5.0, 12.0, 40.0];

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // 1. City.
    let city = match args.first() {
        Some(path) => {
            let (graph, report) = load_graph_json(Path::new(path))
                .with_context(|| format!("loading city from {path}"))?;
            if report.skipped_duplicates > 0 {
                warn!(skipped = report.skipped_duplicates, "duplicate edges ignored");
            }
            graph
        }
        None => generate_grid_city(&GridCityConfig::default())?,
    };
    info!(
        nodes = city.node_count(),
        edges = city.edge_count(),
        regions = city.regions().len(),
        "city ready"
    );

    // 2. Fares and speeds.
    let config = match args.get(1) {
        Some(path) => TransitConfig::from_path(Path::new(path))
            .with_context(|| format!("loading transit config from {path}"))?,
        None => TransitConfig::default(),
    };

    // 3. Metro: dig along walkable streets, minimizing excavation.
    let t0 = Instant::now();
    let metro = MetroDesigner::new(ModeFiltered::new([TransportMode::Walk], CostAttribute::Excavation))
        .design(&city)?;
    info!(
        stations = metro.stations.len(),
        backbone_edges = metro.backbone.len(),
        total_cost = metro.total_cost,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "metro designed"
    );
    for failure in &metro.failures {
        warn!(%failure, "metro design incomplete");
    }

    // 4. Buses: follow the shortest streets between stops.
    let t0 = Instant::now();
    let buses = BusDesigner::new(ModeFiltered::new([TransportMode::Walk], CostAttribute::Distance))
        .design(&city)?;
    info!(
        stops = buses.stops.len(),
        lines = buses.lines.len(),
        total_cost = buses.total_cost,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "bus network designed"
    );
    for (i, line) in buses.lines.iter().enumerate() {
        info!(
            line = i,
            stops = line.stops.len(),
            length = line.length,
            residential = line.coverage.residential,
            commercial = line.coverage.commercial,
            "bus line"
        );
    }

    // 5. Lay both networks.
    let network = buses.apply_to(metro.apply_to(city, &config)?, &config)?;
    info!(edges = network.edge_count(), "transit network laid");

    // 6. Route between the first and last crossing under growing budgets.
    let router = BudgetRouter::new(config)?;
    let (from, to) = corners(&network).context("city has no nodes")?;
    for budget in BUDGETS {
        match router.route(&network, from, to, budget)? {
            Some(route) => {
                let modes: Vec<&str> = route.modes().iter().map(|m| m.as_str()).collect();
                info!(
                    budget,
                    minutes = route.total_time,
                    spent = route.total_cost,
                    legs = route.legs().len(),
                    modes = %modes.join(" > "),
                    "route"
                );
            }
            None => info!(budget, "no route within budget"),
        }
    }

    Ok(())
}

/// The first and last node of the graph.
fn corners(graph: &CityGraph) -> Option<(NodeId, NodeId)> {
    let last = graph.node_count().checked_sub(1)?;
    Some((NodeId(0), NodeId(last as u32)))
}
