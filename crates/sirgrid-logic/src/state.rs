//! Per-cell health states.

use serde::{Deserialize, Serialize};

/// Health state of a single grid cell.
///
/// Transitions only move forward: `Susceptible → Infected → Recovered`.
/// `Recovered` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    /// Can be infected by an infected neighbor.
    #[default]
    Susceptible,
    /// Spreads to susceptible neighbors; may recover each step.
    Infected,
    /// Immune for the rest of the run.
    Recovered,
}

impl CellState {
    /// All states in reporting order (S, I, R).
    pub const ALL: [CellState; 3] = [Self::Susceptible, Self::Infected, Self::Recovered];

    /// Whether moving from `self` to `next` is a legal single-step transition.
    pub fn can_become(self, next: CellState) -> bool {
        matches!(
            (self, next),
            (Self::Susceptible, Self::Susceptible | Self::Infected)
                | (Self::Infected, Self::Infected | Self::Recovered)
                | (Self::Recovered, Self::Recovered)
        )
    }

    /// Short label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Susceptible => "susceptible",
            Self::Infected => "infected",
            Self::Recovered => "recovered",
        }
    }
}
