//! `tn-design` — transit network design over a `CityGraph`.
//!
//! # Pipeline
//!
//! ```text
//! regions ──► select_stations ──► StationChoice (station + retained SSSP tree)
//!                                     │
//!            ┌────────────────────────┴─────────────────────────┐
//!            ▼                                                  ▼
//!   extract_station_subgraph                         DistanceMatrix::from_trees
//!            │                                                  │
//!            ▼                                                  ▼
//!   kruskal_on_graph ─────────► MetroPlan ◄──────── kruskal + path expansion
//! ```
//!
//! [`BusDesigner`] reuses the selector to place several stops per region and
//! links them with an MST over the stop distance matrix.
//!
//! Per-region and per-pair problems are collected as [`DesignFailure`]s in
//! the returned plan; only malformed input aborts a run with a
//! [`DesignError`].

pub mod bus;
pub mod designer;
pub mod error;
pub mod extractor;
pub mod selector;


pub use bus::{BusDesigner, BusLine, BusLink, BusOptions, BusPlan, BusStop};
pub use designer::{BackboneStrategy, DesignOptions, MetroDesigner, MetroPlan};
pub use error::{DesignError, DesignFailure, DesignResult};
pub use extractor::{extract_station_subgraph, StationSubgraph};
pub use selector::{select_station, select_stations, Selection, StationChoice};
