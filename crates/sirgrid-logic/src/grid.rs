//! Toroidal cell-state matrix.
//!
//! The grid is an `N×N` row-major array of [`CellState`]. Edges wrap in both
//! axes, so every cell has exactly four von Neumann neighbors (for `N < 3`
//! some of those neighbors are the same cell, or the cell itself).

use crate::config::cell_count;
use crate::error::SimError;
use crate::series::StateCounts;
use crate::state::CellState;

/// Von Neumann neighborhood offsets as (dx, dy).
pub const VON_NEUMANN: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Square grid of cell states with fixed side length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// All cells `Susceptible` except the center `(N/2, N/2)`, which is `Infected`.
    pub fn initialize(size: usize) -> Result<Self, SimError> {
        let mut grid = Self::filled(size, CellState::Susceptible)?;
        let center = size / 2;
        grid.set(center, center, CellState::Infected);
        Ok(grid)
    }

    /// Every cell set to `state`.
    pub fn filled(size: usize, state: CellState) -> Result<Self, SimError> {
        let population = cell_count(size)?;
        Ok(Self {
            size,
            cells: vec![state; population],
        })
    }

    /// Side length `N`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells, `N*N`.
    pub fn population(&self) -> usize {
        self.cells.len()
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.size && y < self.size,
            "cell ({x}, {y}) outside {n}x{n} grid",
            n = self.size
        );
        x * self.size + y
    }

    /// State at `(x, y)`. Panics if the coordinate is outside the grid.
    pub fn get(&self, x: usize, y: usize) -> CellState {
        self.cells[self.index(x, y)]
    }

    /// Overwrite the state at `(x, y)`. Panics if the coordinate is outside the grid.
    pub fn set(&mut self, x: usize, y: usize, state: CellState) {
        let idx = self.index(x, y);
        self.cells[idx] = state;
    }

    /// Shift `coord` by `delta` with wrap-around modulo `N`.
    pub fn wrap(&self, coord: usize, delta: isize) -> usize {
        let n = self.size as isize;
        (coord as isize + delta).rem_euclid(n) as usize
    }

    /// The four von Neumann neighbor coordinates of `(x, y)`, wrapped.
    pub fn neighbors(&self, x: usize, y: usize) -> [(usize, usize); 4] {
        VON_NEUMANN.map(|(dx, dy)| (self.wrap(x, dx), self.wrap(y, dy)))
    }

    /// Number of von Neumann neighbors of `(x, y)` currently `Infected` (0..=4).
    pub fn count_infected_neighbors(&self, x: usize, y: usize) -> u8 {
        self.neighbors(x, y)
            .iter()
            .filter(|&&(nx, ny)| self.get(nx, ny) == CellState::Infected)
            .count() as u8
    }

    /// Single pass tally of cells per state.
    pub fn count_states(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for &cell in &self.cells {
            match cell {
                CellState::Susceptible => counts.susceptible += 1,
                CellState::Infected => counts.infected += 1,
                CellState::Recovered => counts.recovered += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_seeds_center() {
        let grid = Grid::initialize(5).unwrap();
        assert_eq!(grid.size(), 5);
        assert_eq!(grid.get(2, 2), CellState::Infected);
        let counts = grid.count_states();
        assert_eq!(counts.susceptible, 24);
        assert_eq!(counts.infected, 1);
        assert_eq!(counts.recovered, 0);
    }

    #[test]
    fn test_initialize_even_size_uses_floor_center() {
        let grid = Grid::initialize(50).unwrap();
        assert_eq!(grid.get(25, 25), CellState::Infected);
        assert_eq!(grid.count_states().infected, 1);
    }

    #[test]
    fn test_initialize_size_one() {
        let grid = Grid::initialize(1).unwrap();
        assert_eq!(grid.get(0, 0), CellState::Infected);
        assert_eq!(grid.population(), 1);
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = Grid::initialize(0).unwrap_err();
        assert!(err.to_string().contains("grid_size"));
    }

    #[test]
    fn test_overflowing_size_rejected() {
        let err = Grid::initialize(usize::MAX).unwrap_err();
        assert_eq!(err.parameter(), Some("grid_size"));
        assert!(Grid::filled(usize::MAX / 2, CellState::Recovered).is_err());
    }

    #[test]
    fn test_wrap_both_directions() {
        let grid = Grid::filled(3, CellState::Susceptible).unwrap();
        assert_eq!(grid.wrap(0, -1), 2);
        assert_eq!(grid.wrap(2, 1), 0);
        assert_eq!(grid.wrap(1, 1), 2);
    }

    #[test]
    fn test_corner_neighbors_wrap_across_edges() {
        let grid = Grid::filled(3, CellState::Susceptible).unwrap();
        let n = grid.neighbors(0, 0);
        assert!(n.contains(&(2, 0)));
        assert!(n.contains(&(0, 2)));
        assert!(n.contains(&(1, 0)));
        assert!(n.contains(&(0, 1)));
    }

    #[test]
    fn test_count_infected_neighbors_across_boundary() {
        let mut grid = Grid::filled(3, CellState::Susceptible).unwrap();
        grid.set(2, 0, CellState::Infected);
        grid.set(0, 2, CellState::Infected);
        assert_eq!(grid.count_infected_neighbors(0, 0), 2);
        // Diagonal does not count
        let mut diag = Grid::filled(3, CellState::Susceptible).unwrap();
        diag.set(2, 2, CellState::Infected);
        assert_eq!(diag.count_infected_neighbors(0, 0), 0);
    }

    #[test]
    fn test_count_infected_neighbors_max_four() {
        let mut grid = Grid::filled(5, CellState::Infected).unwrap();
        grid.set(2, 2, CellState::Susceptible);
        assert_eq!(grid.count_infected_neighbors(2, 2), 4);
    }

    #[test]
    fn test_recovered_neighbors_do_not_count() {
        let mut grid = Grid::filled(4, CellState::Recovered).unwrap();
        grid.set(1, 1, CellState::Susceptible);
        assert_eq!(grid.count_infected_neighbors(1, 1), 0);
    }

    #[test]
    fn test_tiny_grids_stay_in_bounds() {
        // 1x1: every neighbor is the cell itself
        let single = Grid::initialize(1).unwrap();
        assert_eq!(single.count_infected_neighbors(0, 0), 4);
        // 2x2: left and right neighbors coincide
        let mut pair = Grid::filled(2, CellState::Susceptible).unwrap();
        pair.set(1, 0, CellState::Infected);
        assert_eq!(pair.count_infected_neighbors(0, 0), 2);
    }

    #[test]
    #[should_panic(expected = "outside 3x3 grid")]
    fn test_out_of_bounds_access_panics() {
        let grid = Grid::filled(3, CellState::Susceptible).unwrap();
        grid.get(3, 0);
    }

    #[test]
    fn test_count_states_sums_to_population() {
        let mut grid = Grid::initialize(7).unwrap();
        grid.set(0, 0, CellState::Recovered);
        grid.set(6, 6, CellState::Infected);
        let counts = grid.count_states();
        assert_eq!(counts.total(), 49);
        assert_eq!(counts.recovered, 1);
        assert_eq!(counts.infected, 2);
    }
}
