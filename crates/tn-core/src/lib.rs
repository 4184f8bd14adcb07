//! `tn-core` — foundational types for the transit-network planner.
//!
//! This crate is a dependency of every other `tn-*` crate.  It intentionally
//! has no `tn-*` dependencies and minimal external ones (`thiserror`, `serde`
//! and `serde_json` for configuration files).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`, `RegionId`                        |
//! | [`geo`]         | `Point`, planar distance                              |
//! | [`region`]      | `RegionTag` (string or integer region label)          |
//! | [`transport`]   | `TransportMode` enum                                  |
//! | [`config`]      | `TransitConfig` (speeds, fares, taxi metering)        |
//! | [`error`]       | `CoreError`, `CoreResult`                             |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod region;
pub mod transport;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{FareTable, SpeedTable, TransitConfig};
pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{EdgeId, NodeId, RegionId};
pub use region::RegionTag;
pub use transport::TransportMode;
