//! Edge-cost strategies.
//!
//! The same graph is scored differently by different algorithms: network
//! design minimizes excavation cost, a fare table prices routes, a planner
//! may prefer streets with commercial frontage.  Every algorithm in the
//! workspace therefore takes the weight function as a parameter implementing
//! [`EdgeCost`]. A plain closure works too:
//!
//! ```
//! use tn_graph::{CostAttribute, Edge, EdgeCost};
//!
//! fn total<C: EdgeCost + ?Sized>(edges: &[Edge], cost: &C) -> f64 {
//!     edges.iter().map(|e| cost.cost(e)).sum()
//! }
//!
//! let by_length = |e: &Edge| e.attrs.distance;
//! assert_eq!(total(&[], &by_length), 0.0);
//! assert_eq!(total(&[], &CostAttribute::Excavation), 0.0);
//! ```
//!
//! Costs must be non-negative.  `f64::INFINITY` means "this edge does not
//! exist for this purpose"; shortest-path search never relaxes it.

use serde::{Deserialize, Serialize};

use tn_core::TransportMode;

use crate::graph::{Edge, EdgeAttrs};

// ── EdgeCost ──────────────────────────────────────────────────────────────────

/// A weight function over edges.
pub trait EdgeCost {
    /// Non-negative weight of `edge`; `f64::INFINITY` excludes it.
    fn cost(&self, edge: &Edge) -> f64;

    /// Report the attribute this function needs but `edge` lacks.
    ///
    /// Used by [`CityGraph::validate_cost`](crate::CityGraph::validate_cost)
    /// to reject malformed input before any algorithm runs.
    fn check(&self, _edge: &Edge) -> Result<(), &'static str> {
        Ok(())
    }
}

impl<F> EdgeCost for F
where
    F: Fn(&Edge) -> f64,
{
    #[inline]
    fn cost(&self, edge: &Edge) -> f64 {
        self(edge)
    }
}

// ── CostAttribute ─────────────────────────────────────────────────────────────

/// Use one stored attribute as the weight.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostAttribute {
    Distance,
    Price,
    Time,
    Excavation,
}

impl CostAttribute {
    pub fn name(self) -> &'static str {
        match self {
            CostAttribute::Distance   => "distance",
            CostAttribute::Price      => "price",
            CostAttribute::Time       => "time",
            CostAttribute::Excavation => "excavation",
        }
    }

    /// The attribute value, or `None` if the edge does not carry it.
    #[inline]
    pub fn read(self, attrs: &EdgeAttrs) -> Option<f64> {
        match self {
            CostAttribute::Distance   => Some(attrs.distance),
            CostAttribute::Price      => Some(attrs.price),
            CostAttribute::Time       => Some(attrs.time),
            CostAttribute::Excavation => attrs.excavation,
        }
    }
}

impl EdgeCost for CostAttribute {
    #[inline]
    fn cost(&self, edge: &Edge) -> f64 {
        self.read(&edge.attrs).unwrap_or(f64::INFINITY)
    }

    fn check(&self, edge: &Edge) -> Result<(), &'static str> {
        match self.read(&edge.attrs) {
            Some(_) => Ok(()),
            None => Err(self.name()),
        }
    }
}

// ── ModeFiltered ──────────────────────────────────────────────────────────────

/// Restrict another cost function to edges of the given transport types.
///
/// Edges of any other mode cost `f64::INFINITY` and are neither relaxed nor
/// validated.
#[derive(Clone, Debug)]
pub struct ModeFiltered<C> {
    allowed: [bool; 4],
    inner:   C,
}

impl<C: EdgeCost> ModeFiltered<C> {
    pub fn new(modes: impl IntoIterator<Item = TransportMode>, inner: C) -> Self {
        let mut allowed = [false; 4];
        for m in modes {
            allowed[m.index()] = true;
        }
        Self { allowed, inner }
    }

    #[inline]
    pub fn allows(&self, mode: TransportMode) -> bool {
        self.allowed[mode.index()]
    }
}

impl<C: EdgeCost> EdgeCost for ModeFiltered<C> {
    #[inline]
    fn cost(&self, edge: &Edge) -> f64 {
        if self.allows(edge.mode) {
            self.inner.cost(edge)
        } else {
            f64::INFINITY
        }
    }

    fn check(&self, edge: &Edge) -> Result<(), &'static str> {
        if self.allows(edge.mode) {
            self.inner.check(edge)
        } else {
            Ok(())
        }
    }
}

// ── LandUseWeighted ───────────────────────────────────────────────────────────

/// Per-property penalties added on top of a base cost.
///
/// Penalties must be non-negative so the combined cost stays non-negative; a
/// street lined with industrial lots can be made "longer" for scenic routing,
/// never shorter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandUseWeights {
    pub residential: f64,
    pub commercial:  f64,
    pub touristic:   f64,
    pub industrial:  f64,
}

/// Base cost plus land-use penalties as secondary objective terms.
#[derive(Clone, Debug)]
pub struct LandUseWeighted<C> {
    pub base:    C,
    pub weights: LandUseWeights,
}

impl<C: EdgeCost> EdgeCost for LandUseWeighted<C> {
    fn cost(&self, edge: &Edge) -> f64 {
        let lu = &edge.attrs.land_use;
        let w = &self.weights;
        let penalty = w.residential * lu.residential as f64
            + w.commercial * lu.commercial as f64
            + w.touristic * lu.touristic as f64
            + w.industrial * lu.industrial as f64;
        self.base.cost(edge) + penalty.max(0.0)
    }

    fn check(&self, edge: &Edge) -> Result<(), &'static str> {
        self.base.check(edge)
    }
}
