//! Planar coordinate type.
//!
//! City graphs are laid out on a local metric plane (metres east / north of
//! an arbitrary origin), so straight-line distance is plain Euclidean.

use serde::{Deserialize, Serialize};

/// A 2-D location on the city plane, in metres.
///
/// Deserializes from either `{"x": .., "y": ..}` or a two-element array
/// `[x, y]`; the latter is what graph files use.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "PointRepr")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Pair([f64; 2]),
    Named { x: f64, y: f64 },
}

impl From<PointRepr> for Point {
    fn from(repr: PointRepr) -> Self {
        match repr {
            PointRepr::Pair([x, y]) => Point { x, y },
            PointRepr::Named { x, y } => Point { x, y },
        }
    }
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        self.distance_2(other).sqrt()
    }

    /// Squared Euclidean distance, for comparisons only.
    #[inline]
    pub fn distance_2(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn as_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}
