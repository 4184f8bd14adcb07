//! `tn-algo` — graph algorithm primitives for the transit-network planner.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`union_find`] | `DisjointSet`: path compression + union by size            |
//! | [`heap`]       | `IndexedMinHeap`: binary heap with decrease-key            |
//! | [`sssp`]       | `shortest_paths` → `ShortestPathTree` (Dijkstra)           |
//! | [`mst`]        | `kruskal`, `kruskal_on_graph` → `SpanningForest`           |
//! | [`matrix`]     | `DistanceMatrix`: network distances among a point set      |
//! | [`tour`]       | greedy nearest-unvisited ordering over a `DistanceMatrix`  |
//! | [`error`]      | `AlgoError`, `AlgoResult`                                  |
//!
//! Every function allocates its working state per call; nothing is cached
//! between calls, so concurrent callers can share one `&CityGraph`.

pub mod error;
pub mod heap;
pub mod matrix;
pub mod mst;
pub mod sssp;
pub mod tour;
pub mod union_find;


pub use error::{AlgoError, AlgoResult};
pub use heap::IndexedMinHeap;
pub use matrix::DistanceMatrix;
pub use mst::{kruskal, kruskal_on_graph, CandidateEdge, SpanningForest};
pub use sssp::{shortest_paths, ShortestPathTree};
pub use tour::{greedy_tour, Tour};
pub use union_find::DisjointSet;
