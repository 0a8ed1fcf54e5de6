//! Simulation engine: the stochastic SIR transition rule and the run driver.
//!
//! Every step reads only the current grid and writes a separate next grid,
//! then the two buffers swap. No cell ever sees a neighbor's new state
//! within the same step.
//!
//! Per cell:
//! - `Susceptible` with `k ≥ 1` infected neighbors becomes `Infected` with
//!   probability `1 - (1 - beta)^k`; with `k = 0` it stays put and no draw
//!   is consumed.
//! - `Infected` becomes `Recovered` with probability `gamma`.
//! - `Recovered` never changes and consumes no draw.

use tracing::{debug, info};

use crate::config::{check_rates, SimConfig};
use crate::error::SimError;
use crate::grid::Grid;
use crate::rng::{RandomSource, SeededSource};
use crate::series::{StateCounts, TimeSeries};
use crate::state::CellState;

/// Validated infection and recovery probabilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRates {
    beta: f64,
    gamma: f64,
}

impl TransitionRates {
    pub fn new(beta: f64, gamma: f64) -> Result<Self, SimError> {
        check_rates(beta, gamma)?;
        Ok(Self { beta, gamma })
    }

    /// Per-neighbor infection probability.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Per-step recovery probability.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

/// Chance that a susceptible cell with `infected_neighbors` infected
/// neighbors is infected this step: `1 - (1 - beta)^k`.
pub fn infection_probability(beta: f64, infected_neighbors: u8) -> f64 {
    if infected_neighbors == 0 {
        return 0.0;
    }
    1.0 - (1.0 - beta).powi(i32::from(infected_neighbors))
}

/// Next state of one cell. Draws from `rng` only when a decision is needed.
pub fn transition<R: RandomSource + ?Sized>(
    cell: CellState,
    infected_neighbors: u8,
    rates: TransitionRates,
    rng: &mut R,
) -> CellState {
    match cell {
        CellState::Susceptible if infected_neighbors > 0 => {
            let p = infection_probability(rates.beta, infected_neighbors);
            if rng.next_unit() < p {
                CellState::Infected
            } else {
                CellState::Susceptible
            }
        }
        CellState::Susceptible => CellState::Susceptible,
        CellState::Infected => {
            if rng.next_unit() < rates.gamma {
                CellState::Recovered
            } else {
                CellState::Infected
            }
        }
        CellState::Recovered => CellState::Recovered,
    }
}

/// Fill `next` from `current` by applying [`transition`] to every cell in
/// row-major order.
pub fn step<R: RandomSource + ?Sized>(
    current: &Grid,
    next: &mut Grid,
    rates: TransitionRates,
    rng: &mut R,
) {
    assert_eq!(
        current.size(),
        next.size(),
        "step buffers must have the same dimensions"
    );
    let n = current.size();
    for x in 0..n {
        for y in 0..n {
            let cell = current.get(x, y);
            let k = match cell {
                CellState::Susceptible => current.count_infected_neighbors(x, y),
                _ => 0,
            };
            next.set(x, y, transition(cell, k, rates, rng));
        }
    }
}

/// A double-buffered simulation in progress.
pub struct Simulation<R = SeededSource> {
    current: Grid,
    next: Grid,
    rates: TransitionRates,
    rng: R,
    steps_taken: usize,
}

impl<R: RandomSource> Simulation<R> {
    pub fn new(initial: Grid, rates: TransitionRates, rng: R) -> Self {
        let next = initial.clone();
        Self {
            current: initial,
            next,
            rates,
            rng,
            steps_taken: 0,
        }
    }

    /// The grid as of the last completed step.
    pub fn current(&self) -> &Grid {
        &self.current
    }

    /// Number of transitions applied so far.
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Counts for the current grid.
    pub fn counts(&self) -> StateCounts {
        self.current.count_states()
    }

    /// Apply one synchronous transition to every cell.
    pub fn advance(&mut self) {
        step(&self.current, &mut self.next, self.rates, &mut self.rng);
        std::mem::swap(&mut self.current, &mut self.next);
        self.steps_taken += 1;
    }

    /// Record counts then advance, `steps` times.
    ///
    /// The series holds pre-step snapshots only: the grid produced by the
    /// final transition is left in [`Simulation::current`] but not recorded.
    pub fn run(&mut self, steps: usize) -> TimeSeries {
        info!(
            grid_size = self.current.size(),
            beta = self.rates.beta(),
            gamma = self.rates.gamma(),
            steps,
            "starting simulation"
        );

        let mut series = TimeSeries::with_capacity(steps);
        for t in 0..steps {
            let counts = self.counts();
            debug!(
                step = t,
                susceptible = counts.susceptible,
                infected = counts.infected,
                recovered = counts.recovered,
                "recorded step"
            );
            series.push(counts);
            self.advance();
        }

        if let (Some((peak_step, peak)), Some(last)) =
            (series.peak_infected(), series.final_counts())
        {
            info!(
                peak_infected = peak,
                peak_step,
                susceptible = last.susceptible,
                infected = last.infected,
                recovered = last.recovered,
                "simulation finished"
            );
        }
        series
    }
}

impl Simulation<SeededSource> {
    /// Validate `config` and build a simulation seeded from it, starting
    /// from the single-center-infection grid.
    pub fn from_config(config: &SimConfig) -> Result<Self, SimError> {
        config.check()?;
        let rates = TransitionRates::new(config.beta, config.gamma)?;
        let grid = Grid::initialize(config.grid_size)?;
        let rng = SeededSource::new(config.seed);
        info!(seed = rng.seed(), "seeded simulation");
        Ok(Self::new(grid, rates, rng))
    }

    /// Seed actually in use (drawn fresh if the config had none).
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}

/// Run `steps` steps from `initial_grid` and return the pre-step counts.
///
/// Rates are checked before any work is done.
pub fn run<R: RandomSource>(
    initial_grid: Grid,
    steps: usize,
    beta: f64,
    gamma: f64,
    rng: R,
) -> Result<TimeSeries, SimError> {
    let rates = TransitionRates::new(beta, gamma)?;
    let mut sim = Simulation::new(initial_grid, rates, rng);
    Ok(sim.run(steps))
}

/// Run the standard scenario described by `config`.
pub fn run_config(config: &SimConfig) -> Result<TimeSeries, SimError> {
    let mut sim = Simulation::from_config(config)?;
    Ok(sim.run(config.steps))
}
