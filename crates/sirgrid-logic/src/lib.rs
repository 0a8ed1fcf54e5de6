//! Pure simulation logic for SirGrid.
//!
//! SirGrid spreads an epidemic across a toroidal grid of cells using a
//! probabilistic SIR cellular automaton and reports how many cells sit in
//! each state at every step. Functions take plain data and return results,
//! so everything here is unit-testable and free of rendering concerns.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Run parameters (size, beta, gamma, steps, seed) and validation |
//! | [`engine`] | Transition rule, synchronous step, multi-step run driver |
//! | [`error`] | Error taxonomy for rejected parameters and config documents |
//! | [`grid`] | Cell-state matrix with toroidal von Neumann adjacency |
//! | [`rng`] | Seedable uniform random source used by the transition rule |
//! | [`series`] | Per-step state counts and derived peak / final statistics |
//! | [`state`] | The three per-cell health states |
//!
//! ```
//! use sirgrid_logic::config::SimConfig;
//! use sirgrid_logic::engine::run_config;
//!
//! let config = SimConfig {
//!     grid_size: 11,
//!     steps: 20,
//!     seed: Some(7),
//!     ..SimConfig::default()
//! };
//! let series = run_config(&config).unwrap();
//! assert_eq!(series.len(), 20);
//! assert_eq!(series.get(0).unwrap().infected, 1);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod rng;
pub mod series;
pub mod state;

pub use config::SimConfig;
pub use engine::{run, run_config, Simulation};
pub use error::SimError;
pub use grid::Grid;
pub use series::{StateCounts, TimeSeries};
pub use state::CellState;
