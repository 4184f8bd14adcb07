//! Synthetic grid city generator.
//!
//! Produces a `rows × cols` street grid in which each crossing is dropped
//! with probability `drop_probability`, so the grid has holes like a real
//! street map.  Every street carries a `walk` edge and a `taxi` edge.  A row
//! street bridges over dropped crossings to the next surviving one; a column
//! street is only laid between vertically adjacent crossings.
//!
//! Crossings are split into four regions by grid position:
//!
//! ```text
//!   rows [0, R/4)           → "51000"
//!   rows [R/4, 3R/4], left  → "52000"
//!   rows [R/4, 3R/4], right → "53000"
//!   rows (3R/4, R)          → "54000"
//! ```
//!
//! Generation is deterministic for a given `seed`.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use tn_core::{CoreError, NodeId, Point, TransportMode};

use crate::graph::{CityGraph, CityGraphBuilder, EdgeAttrs, LandUse, Node};
use crate::GraphResult;

/// Parameters of [`generate_grid_city`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridCityConfig {
    pub rows: usize,
    pub cols: usize,
    /// Probability that a crossing is left out of the grid.
    pub drop_probability: f64,
    /// Length of one block in metres.
    pub street_length: f64,
    /// Walking speed in m/s (recorded `time` of walk edges).
    pub walk_speed: f64,
    /// Street speed limit in m/s (recorded `time` of taxi edges).
    pub max_speed: f64,
    /// Recorded taxi price per kilometre.
    pub taxi_rate: f64,
    /// Excavation cost per metre of street.
    pub excavation_per_m: f64,
    /// Properties generated along each street.
    pub properties_per_street: u32,
    pub seed: u64,
}

impl Default for GridCityConfig {
    fn default() -> Self {
        Self {
            rows: 24,
            cols: 16,
            drop_probability: 0.3,
            street_length: 200.0,
            walk_speed: 1.5,
            max_speed: 15.0,
            taxi_rate: 4.0,
            excavation_per_m: 1.0,
            properties_per_street: 10,
            seed: 42,
        }
    }
}

impl GridCityConfig {
    fn validate(&self) -> GraphResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(CoreError::Config("grid must have at least one row and column".into()).into());
        }
        if !(0.0..1.0).contains(&self.drop_probability) {
            return Err(CoreError::Config(format!(
                "drop_probability must be in [0, 1), got {}",
                self.drop_probability
            ))
            .into());
        }
        for (name, v) in [
            ("street_length", self.street_length),
            ("walk_speed", self.walk_speed),
            ("max_speed", self.max_speed),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(CoreError::Config(format!("{name} must be positive, got {v}")).into());
            }
        }
        Ok(())
    }

    fn region_of(&self, row: usize, col: usize) -> &'static str {
        let quarter = self.rows / 4;
        let three_quarters = 3 * self.rows / 4;
        if row < quarter {
            "51000"
        } else if row > three_quarters {
            "54000"
        } else if col < self.cols / 2 {
            "52000"
        } else {
            "53000"
        }
    }
}

/// Generate a grid city.
pub fn generate_grid_city(cfg: &GridCityConfig) -> GraphResult<CityGraph> {
    cfg.validate()?;
    let mut rng = SmallRng::seed_from_u64(cfg.seed);
    let mut b = CityGraphBuilder::with_capacity(cfg.rows * cfg.cols, cfg.rows * cfg.cols * 4);

    // ── Crossings ─────────────────────────────────────────────────────────
    let mut grid: Vec<Option<NodeId>> = vec![None; cfg.rows * cfg.cols];
    for row in 0..cfg.rows {
        for col in 0..cfg.cols {
            if rng.gen_bool(cfg.drop_probability) {
                continue;
            }
            let node = Node::new(
                format!("node_{row}_{col}"),
                Point::new(col as f64 * cfg.street_length, row as f64 * cfg.street_length),
            )
            .in_region(cfg.region_of(row, col))
            .with_options([TransportMode::Taxi, TransportMode::Walk]);
            grid[row * cfg.cols + col] = Some(b.add_node(node)?);
        }
    }

    // ── Streets ───────────────────────────────────────────────────────────
    for row in 0..cfg.rows {
        for col in 0..cfg.cols {
            let Some(here) = grid[row * cfg.cols + col] else { continue };

            // Row street: bridge to the next surviving crossing on the right.
            if let Some(k) = (col + 1..cfg.cols).find(|&k| grid[row * cfg.cols + k].is_some()) {
                if let Some(right) = grid[row * cfg.cols + k] {
                    let length = cfg.street_length * (k - col) as f64;
                    lay_street(&mut b, &mut rng, cfg, here, right, length)?;
                }
            }

            // Column street: only to the crossing directly below.
            if row + 1 < cfg.rows {
                if let Some(below) = grid[(row + 1) * cfg.cols + col] {
                    lay_street(&mut b, &mut rng, cfg, here, below, cfg.street_length)?;
                }
            }
        }
    }

    debug!(nodes = b.node_count(), edges = b.edge_count(), seed = cfg.seed, "grid city generated");
    Ok(b.build())
}

/// Add the walk and taxi edges of one street.
fn lay_street(
    b: &mut CityGraphBuilder,
    rng: &mut SmallRng,
    cfg: &GridCityConfig,
    from: NodeId,
    to: NodeId,
    length: f64,
) -> GraphResult<()> {
    let mut land_use = LandUse::default();
    for _ in 0..cfg.properties_per_street {
        match rng.gen_range(0..4) {
            0 => land_use.residential += 1,
            1 => land_use.commercial += 1,
            2 => land_use.industrial += 1,
            _ => land_use.touristic += 1,
        }
    }
    let excavation = length * cfg.excavation_per_m;

    let walk = EdgeAttrs::new(length, 0.0, length / cfg.walk_speed)
        .with_max_speed(cfg.walk_speed)
        .with_excavation(excavation)
        .with_land_use(land_use);
    let taxi = EdgeAttrs::new(length, length / 1_000.0 * cfg.taxi_rate, length / cfg.max_speed)
        .with_max_speed(cfg.max_speed)
        .with_excavation(excavation)
        .with_land_use(land_use);

    b.add_edge(from, to, TransportMode::Walk, walk)?;
    b.add_edge(from, to, TransportMode::Taxi, taxi)?;
    Ok(())
}
