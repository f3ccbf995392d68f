//! Grid engine: owns the arena and everything that replaces it
//!
//! Ticks, resets, resizes and refreshes all swap in a whole new `Grid`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::grid::{self, Grid};
use crate::color::Rgba;
use crate::consts::{REFRESH_THRESHOLD_PERCENT, RESIZE_DEBOUNCE_MS};
use crate::options::CellShape;

/// Result of asking the engine for a population rescue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Population is above the threshold
    NotNeeded,
    /// Population is low but the last refresh was too recent
    Debounced,
    /// Dead cells were re-seeded
    Applied,
}

#[derive(Debug, Clone)]
pub struct GridEngine {
    grid: Grid,
    num_rows: u32,
    num_cols: u32,
    cell_size: f32,
    shape: CellShape,
    color: Rgba,
    last_refresh: f64,
    last_resize: Option<f64>,
    generation: u64,
    rng: Pcg32,
}

impl GridEngine {
    /// Create an engine with a freshly seeded `num_rows x num_cols` grid
    pub fn new(
        num_rows: u32,
        num_cols: u32,
        cell_size: f32,
        shape: CellShape,
        color: Rgba,
        seed: u64,
        now: f64,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = grid::generate(num_rows, num_cols, cell_size, shape, color, &mut rng);
        Self {
            grid,
            num_rows,
            num_cols,
            cell_size,
            shape,
            color,
            last_refresh: now,
            last_resize: None,
            generation: 0,
            rng,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Requested grid dimensions as `(rows, cols)`
    pub fn dims(&self) -> (u32, u32) {
        (self.num_rows, self.num_cols)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_refresh(&self) -> f64 {
        self.last_refresh
    }

    pub fn alive_count(&self) -> usize {
        self.grid.alive_count()
    }

    /// Live cells as a percentage of the requested dimensions
    pub fn population_percent(&self) -> f64 {
        let total = self.num_rows as f64 * self.num_cols as f64;
        if total == 0.0 {
            return 0.0;
        }
        self.alive_count() as f64 / total * 100.0
    }

    pub fn should_refresh(&self) -> bool {
        self.population_percent() <= REFRESH_THRESHOLD_PERCENT
    }

    /// Advance one simulation tick
    pub fn tick(&mut self, timestamp: f64) {
        self.grid = grid::step(&self.grid, timestamp);
        self.generation += 1;
        log::trace!(
            "Generation {}: {} alive",
            self.generation,
            self.grid.alive_count()
        );
    }

    /// Re-seed dead cells if due; restarts the refresh clock when applied
    pub fn refresh(&mut self, now: f64) -> RefreshOutcome {
        match grid::refresh(&self.grid, self.last_refresh, now, &mut self.rng) {
            Some(grid) => {
                self.grid = grid;
                self.last_refresh = now;
                log::info!(
                    "Refreshed population at generation {}: {} alive",
                    self.generation,
                    self.grid.alive_count()
                );
                RefreshOutcome::Applied
            }
            None => RefreshOutcome::Debounced,
        }
    }

    /// Refresh only when the population has collapsed
    pub fn rescue_population(&mut self, now: f64) -> RefreshOutcome {
        if !self.should_refresh() {
            return RefreshOutcome::NotNeeded;
        }
        self.refresh(now)
    }

    /// Regenerate the grid with the current dimensions
    pub fn reset(&mut self, now: f64) {
        self.regenerate(now);
        log::info!("Grid reset ({}x{})", self.num_rows, self.num_cols);
    }

    /// Regenerate for new dimensions, at most once per `RESIZE_DEBOUNCE_MS`
    ///
    /// Returns true when the grid was replaced.
    pub fn resize(&mut self, num_rows: u32, num_cols: u32, now: f64) -> bool {
        if let Some(last) = self.last_resize {
            if now - last < RESIZE_DEBOUNCE_MS {
                return false;
            }
        }
        self.last_resize = Some(now);

        if (num_rows, num_cols) == (self.num_rows, self.num_cols) {
            return false;
        }

        log::info!(
            "Resizing grid {}x{} -> {}x{}",
            self.num_rows,
            self.num_cols,
            num_rows,
            num_cols
        );
        self.num_rows = num_rows;
        self.num_cols = num_cols;
        self.regenerate(now);
        true
    }

    /// Apply new cell shape and colour to current and future cells
    pub fn restyle(&mut self, shape: CellShape, color: Rgba) {
        self.shape = shape;
        self.color = color;
        self.grid.restyle(shape, color);
    }

    #[cfg(test)]
    pub(crate) fn replace_grid(&mut self, grid: Grid) {
        self.grid = grid;
    }

    fn regenerate(&mut self, now: f64) {
        self.grid = grid::generate(
            self.num_rows,
            self.num_cols,
            self.cell_size,
            self.shape,
            self.color,
            &mut self.rng,
        );
        self.generation = 0;
        self.last_refresh = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Cell;

    const C: Rgba = Rgba::rgb(226, 78, 27);

    fn engine(seed: u64) -> GridEngine {
        GridEngine::new(20, 30, 25.0, CellShape::Circle, C, seed, 0.0)
    }

    /// Engine whose grid is entirely dead
    fn empty_engine() -> GridEngine {
        let mut e = engine(1);
        let cells = e
            .grid
            .cells()
            .iter()
            .map(|c| Cell::new(c.col, c.row, false, c.shape, c.color))
            .collect();
        e.replace_grid(Grid::from_cells(e.grid.rows(), e.grid.cols(), 25.0, cells));
        e
    }

    #[test]
    fn test_same_seed_same_grid() {
        assert_eq!(engine(42).grid(), engine(42).grid());
        let mut a = engine(42);
        let mut b = engine(42);
        for t in 1..20 {
            a.tick(t as f64 * 100.0);
            b.tick(t as f64 * 100.0);
        }
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.generation(), 19);
    }

    #[test]
    fn test_population_uses_requested_dims() {
        let e = engine(3);
        let expected = e.alive_count() as f64 / 600.0 * 100.0;
        assert!((e.population_percent() - expected).abs() < 1e-9);
        assert_eq!(e.grid().rows(), 19);
        assert_eq!(e.grid().cols(), 29);
    }

    #[test]
    fn test_rescue_not_needed_when_populated() {
        let mut e = engine(5);
        assert!(e.population_percent() > 5.0);
        assert_eq!(e.rescue_population(60_000.0), RefreshOutcome::NotNeeded);
    }

    #[test]
    fn test_rescue_debounced_then_applied() {
        let mut e = empty_engine();
        assert!(e.should_refresh());

        assert_eq!(e.rescue_population(5_000.0), RefreshOutcome::Debounced);
        assert_eq!(e.rescue_population(10_000.0), RefreshOutcome::Applied);
        assert_eq!(e.last_refresh(), 10_000.0);
        assert!(e.alive_count() > 0);
    }

    #[test]
    fn test_resize_regenerates_on_change() {
        let mut e = engine(9);
        e.tick(100.0);
        assert!(e.resize(10, 12, 1_000.0));
        assert_eq!(e.dims(), (10, 12));
        assert_eq!((e.grid().rows(), e.grid().cols()), (9, 11));
        assert_eq!(e.generation(), 0);
        assert_eq!(e.last_refresh(), 1_000.0);
    }

    #[test]
    fn test_resize_debounced() {
        let mut e = engine(9);
        assert!(e.resize(10, 12, 1_000.0));
        assert!(!e.resize(40, 40, 1_100.0));
        assert_eq!(e.dims(), (10, 12));
        assert!(e.resize(40, 40, 1_250.0));
        assert_eq!(e.dims(), (40, 40));
    }

    #[test]
    fn test_resize_same_dims_keeps_grid() {
        let mut e = engine(9);
        let before = e.grid().clone();
        assert!(!e.resize(20, 30, 1_000.0));
        assert_eq!(e.grid(), &before);
    }

    #[test]
    fn test_restyle_applies_to_regenerated_grid() {
        let mut e = engine(2);
        e.restyle(CellShape::Square, Rgba::rgb(0, 0, 255));
        assert!(e.grid().cells().iter().all(|c| c.shape == CellShape::Square));
        e.reset(0.0);
        assert!(e.grid().cells().iter().all(|c| c.color == Rgba::rgb(0, 0, 255)));
    }
}
