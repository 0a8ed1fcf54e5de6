//! Per-step state counts.
//!
//! A [`TimeSeries`] holds three equal-length sequences (susceptible,
//! infected, recovered). Entry `t` is the grid as it stood *before* step
//! `t`'s transition, so entry 0 is the initial grid.

use serde::{Deserialize, Serialize};

use crate::state::CellState;

/// Number of cells in each state at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateCounts {
    pub susceptible: u64,
    pub infected: u64,
    pub recovered: u64,
}

impl StateCounts {
    pub fn new(susceptible: u64, infected: u64, recovered: u64) -> Self {
        Self {
            susceptible,
            infected,
            recovered,
        }
    }

    /// `s + i + r`; always `N*N` for counts taken from a grid.
    pub fn total(&self) -> u64 {
        self.susceptible + self.infected + self.recovered
    }

    /// Count for a single state.
    pub fn of(&self, state: CellState) -> u64 {
        match state {
            CellState::Susceptible => self.susceptible,
            CellState::Infected => self.infected,
            CellState::Recovered => self.recovered,
        }
    }

    /// Share of the population in each state, in S, I, R order.
    /// All zeros for an empty population.
    pub fn proportions(&self) -> [f64; 3] {
        let total = self.total();
        if total == 0 {
            return [0.0; 3];
        }
        let t = total as f64;
        [
            self.susceptible as f64 / t,
            self.infected as f64 / t,
            self.recovered as f64 / t,
        ]
    }
}

/// Recorded counts, one entry per step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    pub susceptible: Vec<u64>,
    pub infected: Vec<u64>,
    pub recovered: Vec<u64>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(steps: usize) -> Self {
        Self {
            susceptible: Vec::with_capacity(steps),
            infected: Vec::with_capacity(steps),
            recovered: Vec::with_capacity(steps),
        }
    }

    /// Append one step's counts to all three sequences.
    pub fn push(&mut self, counts: StateCounts) {
        self.susceptible.push(counts.susceptible);
        self.infected.push(counts.infected);
        self.recovered.push(counts.recovered);
    }

    pub fn len(&self) -> usize {
        self.infected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infected.is_empty()
    }

    /// Counts recorded at step `t`.
    pub fn get(&self, t: usize) -> Option<StateCounts> {
        Some(StateCounts::new(
            *self.susceptible.get(t)?,
            *self.infected.get(t)?,
            *self.recovered.get(t)?,
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = StateCounts> + '_ {
        (0..self.len()).filter_map(move |t| self.get(t))
    }

    /// Highest infected count and the first step at which it was recorded.
    pub fn peak_infected(&self) -> Option<(usize, u64)> {
        let max = *self.infected.iter().max()?;
        let step = self.infected.iter().position(|&i| i == max)?;
        Some((step, max))
    }

    /// Last recorded entry.
    pub fn final_counts(&self) -> Option<StateCounts> {
        self.len().checked_sub(1).and_then(|t| self.get(t))
    }

    /// First step whose counts do not sum to `population`.
    pub fn conservation_violation(&self, population: u64) -> Option<usize> {
        self.iter().position(|c| c.total() != population)
    }

    /// First step `t + 1` at which the recovered count dropped below step `t`.
    pub fn recovered_regression(&self) -> Option<usize> {
        self.recovered
            .windows(2)
            .position(|w| w[1] < w[0])
            .map(|t| t + 1)
    }
}
