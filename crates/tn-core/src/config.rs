//! Speed and fare configuration shared by the router and the bus designer.
//!
//! # Units
//!
//! | Quantity | Unit                  |
//! |----------|-----------------------|
//! | distance | metres                |
//! | speed    | km/h                  |
//! | time     | minutes               |
//! | money    | currency units (R$)   |
//!
//! Typically loaded from a JSON file by the application and passed to the
//! router.  Every field has a default, so a partial file is fine:
//!
//! ```
//! use tn_core::TransitConfig;
//!
//! let cfg = TransitConfig::from_json_str(r#"{ "fares": { "metro": 5.0 } }"#).unwrap();
//! assert_eq!(cfg.fares.metro, 5.0);
//! assert_eq!(cfg.fares.bus, 3.50);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, TransportMode};

// ── SpeedTable ────────────────────────────────────────────────────────────────

/// Average speed of each mode in km/h.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedTable {
    pub walk:  f64,
    pub metro: f64,
    pub bus:   f64,
    pub taxi:  f64,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self { walk: 5.0, metro: 70.0, bus: 50.0, taxi: 50.0 }
    }
}

impl SpeedTable {
    #[inline]
    pub fn kmh(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Walk  => self.walk,
            TransportMode::Metro => self.metro,
            TransportMode::Bus   => self.bus,
            TransportMode::Taxi  => self.taxi,
        }
    }
}

// ── FareTable ─────────────────────────────────────────────────────────────────

/// Monetary rules for the paid modes.  Walking is always free.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FareTable {
    /// Flat fare charged when boarding the metro.
    pub metro: f64,
    /// Flat fare charged when boarding a bus.
    pub bus: f64,
    /// Taxi meter rate per kilometre.
    pub taxi_per_km: f64,
    /// Minimum charge for a taxi ride (applied when boarding).
    pub taxi_min_fare: f64,
}

impl Default for FareTable {
    fn default() -> Self {
        Self { metro: 4.40, bus: 3.50, taxi_per_km: 2.50, taxi_min_fare: 10.0 }
    }
}

// ── TransitConfig ─────────────────────────────────────────────────────────────

/// Speeds and fares for every transport mode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitConfig {
    pub speeds: SpeedTable,
    pub fares:  FareTable,
}

impl TransitConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let cfg: TransitConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject speeds that are not strictly positive and money values that are
    /// negative or non-finite.
    pub fn validate(&self) -> CoreResult<()> {
        for mode in TransportMode::ALL {
            let v = self.speeds.kmh(mode);
            if !(v.is_finite() && v > 0.0) {
                return Err(CoreError::Config(format!(
                    "speed for {mode} must be a positive number, got {v}"
                )));
            }
        }
        let money = [
            ("fares.metro", self.fares.metro),
            ("fares.bus", self.fares.bus),
            ("fares.taxi_per_km", self.fares.taxi_per_km),
            ("fares.taxi_min_fare", self.fares.taxi_min_fare),
        ];
        for (name, v) in money {
            if !(v.is_finite() && v >= 0.0) {
                return Err(CoreError::Config(format!(
                    "{name} must be a non-negative number, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Minutes needed to cover `distance_m` metres in `mode`.
    #[inline]
    pub fn travel_minutes(&self, mode: TransportMode, distance_m: f64) -> f64 {
        distance_m / 1_000.0 / self.speeds.kmh(mode) * 60.0
    }

    /// The one-time boarding fare of `mode`, or `None` for modes without one.
    pub fn flat_fare(&self, mode: TransportMode) -> Option<f64> {
        match mode {
            TransportMode::Metro => Some(self.fares.metro),
            TransportMode::Bus   => Some(self.fares.bus),
            TransportMode::Walk | TransportMode::Taxi => None,
        }
    }

    /// Taxi charge for one edge of `distance_m` metres.
    ///
    /// The minimum fare only applies to the edge on which the taxi is
    /// boarded; later edges of the same ride are metered.
    pub fn taxi_fare(&self, distance_m: f64, boarding: bool) -> f64 {
        let metered = self.fares.taxi_per_km * distance_m / 1_000.0;
        if boarding {
            metered.max(self.fares.taxi_min_fare)
        } else {
            metered
        }
    }
}
