//! `tn-graph` — the city graph every planner algorithm runs on.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`graph`]  | `CityGraph` (adjacency + R-tree), `CityGraphBuilder`, `Region` |
//! | [`cost`]   | `EdgeCost` trait, `CostAttribute`, `ModeFiltered`, `LandUseWeighted` |
//! | [`loader`] | JSON graph ingestion (`load_graph_json`, `load_graph_reader`) |
//! | [`synth`]  | Synthetic grid city generator (`GridCityConfig`)             |
//! | [`error`]  | `GraphError`, `GraphResult<T>`                               |
//!
//! A graph is assembled with [`CityGraphBuilder`] and frozen with
//! [`CityGraphBuilder::build`]; the resulting [`CityGraph`] is read-only and
//! can be shared by any number of concurrent queries.

pub mod cost;
pub mod error;
pub mod graph;
pub mod loader;
pub mod synth;

#[cfg(test)]
mod tests;

pub use cost::{CostAttribute, EdgeCost, LandUseWeighted, LandUseWeights, ModeFiltered};
pub use error::{GraphError, GraphResult};
pub use graph::{CityGraph, CityGraphBuilder, Edge, EdgeAttrs, Incidence, LandUse, Node, Region};
pub use loader::{load_graph_json, load_graph_reader, LoadReport};
pub use synth::{generate_grid_city, GridCityConfig};
