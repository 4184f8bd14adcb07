//! Transport mode enum shared by the graph, the designers and the router.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// The transport type carried by an edge, and the mode a traveller is in.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// On foot (the initial mode of every journey).
    #[default]
    Walk,
    /// Underground rail; a flat fare is charged on boarding.
    Metro,
    /// Bus line; a flat fare is charged on boarding.
    Bus,
    /// Metered taxi with a minimum fare.
    Taxi,
}

impl TransportMode {
    /// Every mode, in declaration order.
    pub const ALL: [TransportMode; 4] = [
        TransportMode::Walk,
        TransportMode::Metro,
        TransportMode::Bus,
        TransportMode::Taxi,
    ];

    /// `true` for modes that charge a one-time fare when boarded.
    #[inline]
    pub fn has_flat_fare(self) -> bool {
        matches!(self, TransportMode::Metro | TransportMode::Bus)
    }

    /// Dense index in `0..4`, used to key per-mode tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lower-case label, as used in graph files.
    pub fn as_str(self) -> &'static str {
        match self {
            TransportMode::Walk  => "walk",
            TransportMode::Metro => "metro",
            TransportMode::Bus   => "bus",
            TransportMode::Taxi  => "taxi",
        }
    }
}

impl FromStr for TransportMode {
    type Err = CoreError;

    /// Accepts the canonical labels plus the aliases found in older graph
    /// exports (`non_motorized`, `deslocamento`, `onibus`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walk" | "non_motorized" | "deslocamento" => Ok(TransportMode::Walk),
            "metro"                                   => Ok(TransportMode::Metro),
            "bus" | "onibus"                          => Ok(TransportMode::Bus),
            "taxi"                                    => Ok(TransportMode::Taxi),
            other => Err(CoreError::UnknownTransport(other.to_owned())),
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
