//! Grid arena and the B3/S23 rule
//!
//! A `Grid` is never mutated in place by the rule. `step` and `refresh`
//! read the current arena and build a new one, so every neighbour count in
//! a tick sees the state from before that tick.

use rand::Rng;

use super::cell::Cell;
use crate::color::Rgba;
use crate::consts::{REFRESH_INTERVAL_MS, SPAWN_CHANCE};
use crate::options::CellShape;

/// Row-major arena of cells addressed by `(row, col)`
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: u32,
    cols: u32,
    cell_size: f32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid from an existing row-major cell list
    ///
    /// Panics if `cells.len() != rows * cols`.
    pub fn from_cells(rows: u32, cols: u32, cell_size: f32, cells: Vec<Cell>) -> Self {
        assert_eq!(
            cells.len(),
            rows as usize * cols as usize,
            "cell count does not match {}x{} grid",
            rows,
            cols
        );
        Self {
            rows,
            cols,
            cell_size,
            cells,
        }
    }

    /// Build a grid from rows of liveness flags (all cells dead-never or alive)
    pub fn from_pattern(pattern: &[&[bool]], cell_size: f32, shape: CellShape, color: Rgba) -> Self {
        let rows = pattern.len() as u32;
        let cols = pattern.first().map_or(0, |r| r.len()) as u32;
        let mut cells = Vec::with_capacity(rows as usize * cols as usize);
        for (r, line) in pattern.iter().enumerate() {
            assert_eq!(line.len() as u32, cols, "ragged pattern");
            for (c, &alive) in line.iter().enumerate() {
                cells.push(Cell::new(c as u32, r as u32, alive, shape, color));
            }
        }
        Self::from_cells(rows, cols, cell_size, cells)
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(self.index(row, col))
    }

    /// Liveness at a signed position; anything off the grid is dead
    pub fn is_alive(&self, row: i64, col: i64) -> bool {
        let (Ok(row), Ok(col)) = (u32::try_from(row), u32::try_from(col)) else {
            return false;
        };
        self.get(row, col).is_some_and(|c| c.alive)
    }

    /// Live cells among the 8 surrounding positions
    pub fn live_neighbors(&self, row: u32, col: u32) -> u8 {
        let (row, col) = (row as i64, col as i64);
        let mut count = 0;
        for dr in -1..=1 {
            for dc in -1..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                if self.is_alive(row + dr, col + dc) {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|c| c.alive).count()
    }

    /// Apply a new shape and colour to every cell
    pub fn restyle(&mut self, shape: CellShape, color: Rgba) {
        for cell in &mut self.cells {
            cell.shape = shape;
            cell.color = color;
        }
    }

    fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.cols as usize + col as usize
    }
}

/// One Bernoulli trial at `SPAWN_CHANCE`
fn spawn_roll<R: Rng>(rng: &mut R) -> bool {
    rng.random::<f64>() <= SPAWN_CHANCE
}

/// Seed a fresh grid for a `num_rows x num_cols` viewport
///
/// The arena is one row and one column smaller than requested; that margin
/// stays unpopulated.
pub fn generate<R: Rng>(
    num_rows: u32,
    num_cols: u32,
    cell_size: f32,
    shape: CellShape,
    color: Rgba,
    rng: &mut R,
) -> Grid {
    let rows = num_rows.saturating_sub(1);
    let cols = num_cols.saturating_sub(1);

    let mut cells = Vec::with_capacity(rows as usize * cols as usize);
    for row in 0..rows {
        for col in 0..cols {
            cells.push(Cell::new(col, row, spawn_roll(rng), shape, color));
        }
    }
    Grid::from_cells(rows, cols, cell_size, cells)
}

/// Next state of a single cell given its live neighbour count
fn next_cell(cell: &Cell, live_neighbors: u8, timestamp: f64) -> Cell {
    match (cell.alive, live_neighbors) {
        (true, 2 | 3) => *cell,
        (true, _) => cell.killed(timestamp),
        (false, 3) => cell.revived(),
        (false, _) if cell.fade_expired(timestamp) => cell.forgotten(),
        (false, _) => *cell,
    }
}

/// Advance the automaton one tick
pub fn step(grid: &Grid, timestamp: f64) -> Grid {
    let cells = grid
        .cells
        .iter()
        .map(|cell| next_cell(cell, grid.live_neighbors(cell.row, cell.col), timestamp))
        .collect();

    Grid {
        rows: grid.rows,
        cols: grid.cols,
        cell_size: grid.cell_size,
        cells,
    }
}

/// Re-seed dead cells if at least `REFRESH_INTERVAL_MS` passed since the
/// last refresh; `None` when not due
pub fn refresh<R: Rng>(grid: &Grid, last_refresh: f64, now: f64, rng: &mut R) -> Option<Grid> {
    if now - last_refresh < REFRESH_INTERVAL_MS {
        return None;
    }

    let cells = grid
        .cells
        .iter()
        .map(|cell| {
            if cell.alive {
                *cell
            } else {
                Cell {
                    alive: spawn_roll(rng),
                    died_at: None,
                    ..*cell
                }
            }
        })
        .collect();

    Some(Grid {
        rows: grid.rows,
        cols: grid.cols,
        cell_size: grid.cell_size,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const C: Rgba = Rgba::rgb(10, 20, 30);

    fn pattern(rows: &[&[bool]]) -> Grid {
        Grid::from_pattern(rows, 10.0, CellShape::Circle, C)
    }

    fn liveness(grid: &Grid) -> Vec<Vec<bool>> {
        (0..grid.rows())
            .map(|r| (0..grid.cols()).map(|c| grid.get(r, c).unwrap().alive).collect())
            .collect()
    }

    const O: bool = false;
    const X: bool = true;

    #[test]
    fn test_generate_leaves_margin() {
        let mut rng = Pcg32::seed_from_u64(7);
        let grid = generate(10, 8, 25.0, CellShape::Square, C, &mut rng);
        assert_eq!(grid.rows(), 9);
        assert_eq!(grid.cols(), 7);
        assert_eq!(grid.cells().len(), 63);
        assert!(grid.get(9, 0).is_none());
        assert!(grid.get(0, 7).is_none());

        let last = grid.cells().last().unwrap();
        assert_eq!((last.row, last.col), (8, 6));
        assert!(grid.cells().iter().all(|c| c.died_at.is_none()));
    }

    #[test]
    fn test_generate_degenerate_sizes() {
        let mut rng = Pcg32::seed_from_u64(7);
        let grid = generate(1, 0, 25.0, CellShape::Square, C, &mut rng);
        assert_eq!((grid.rows(), grid.cols()), (0, 0));
        assert!(grid.cells().is_empty());
    }

    #[test]
    fn test_generate_density_near_spawn_chance() {
        let mut rng = Pcg32::seed_from_u64(1234);
        let grid = generate(201, 201, 1.0, CellShape::Circle, C, &mut rng);
        let fraction = grid.alive_count() as f64 / grid.cells().len() as f64;
        assert!((fraction - SPAWN_CHANCE).abs() < 0.02, "fraction {}", fraction);
    }

    #[test]
    fn test_out_of_bounds_is_dead() {
        let grid = pattern(&[&[X, X], &[X, X]]);
        assert!(!grid.is_alive(-1, 0));
        assert!(!grid.is_alive(0, -1));
        assert!(!grid.is_alive(2, 0));
        assert!(!grid.is_alive(0, 2));
        assert_eq!(grid.live_neighbors(0, 0), 3);
    }

    #[test]
    fn test_plus_shape_step() {
        let grid = pattern(&[
            &[O, X, O],
            &[X, X, X],
            &[O, X, O],
        ]);
        let next = step(&grid, 500.0);

        // Corners have 3 live neighbours and are born; the centre has 4 and
        // dies; edge cells have 3 and survive.
        assert_eq!(
            liveness(&next),
            vec![vec![X, X, X], vec![X, O, X], vec![X, X, X]]
        );
        assert_eq!(next.get(1, 1).unwrap().died_at, Some(500.0));
        assert_eq!(next.get(0, 0).unwrap().died_at, None);
        assert_eq!(next.get(0, 1).unwrap(), grid.get(0, 1).unwrap());
    }

    #[test]
    fn test_lonely_cell_dies() {
        let grid = pattern(&[&[O, O, O], &[O, X, O], &[O, O, O]]);
        let next = step(&grid, 2000.0);
        let cell = next.get(1, 1).unwrap();
        assert!(!cell.alive);
        assert_eq!(cell.died_at, Some(2000.0));
        assert_eq!(next.alive_count(), 0);
        assert_eq!(cell.fill(3500.0, true), None);
    }

    #[test]
    fn test_blinker_oscillates() {
        let grid = pattern(&[
            &[O, O, O, O, O],
            &[O, O, X, O, O],
            &[O, O, X, O, O],
            &[O, O, X, O, O],
            &[O, O, O, O, O],
        ]);
        let once = step(&grid, 1.0);
        assert_eq!(
            liveness(&once)[2],
            vec![O, X, X, X, O],
        );
        let twice = step(&once, 2.0);
        assert_eq!(liveness(&twice), liveness(&grid));
    }

    #[test]
    fn test_expired_death_record_is_cleared() {
        let mut cells = pattern(&[&[O, O], &[O, O]]).cells().to_vec();
        cells[0] = cells[0].killed(0.0);
        cells[1] = cells[1].killed(900.0);
        let grid = Grid::from_cells(2, 2, 10.0, cells);

        let next = step(&grid, 1500.0);
        assert_eq!(next.cells()[0].died_at, None);
        assert_eq!(next.cells()[1].died_at, Some(900.0));
        assert!(next.cells().iter().all(|c| !c.alive));
    }

    #[test]
    fn test_refresh_debounced() {
        let grid = pattern(&[&[O, O], &[O, O]]);
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(refresh(&grid, 0.0, 9_999.0, &mut rng).is_none());
        assert!(refresh(&grid, 5_000.0, 14_000.0, &mut rng).is_none());
        assert!(refresh(&grid, 0.0, 10_000.0, &mut rng).is_some());
    }

    #[test]
    fn test_refresh_only_rolls_dead_cells() {
        let mut cells = pattern(&[&[X, O, O], &[O, O, O]]).cells().to_vec();
        cells[1] = cells[1].killed(100.0);
        let grid = Grid::from_cells(2, 3, 10.0, cells);
        let mut rng = Pcg32::seed_from_u64(99);

        let refreshed = refresh(&grid, 0.0, 20_000.0, &mut rng).unwrap();
        assert!(refreshed.cells()[0].alive);
        assert!(refreshed.cells().iter().all(|c| c.died_at.is_none()));
    }

    #[test]
    fn test_refresh_density() {
        let rows: Vec<Vec<bool>> = vec![vec![false; 200]; 200];
        let refs: Vec<&[bool]> = rows.iter().map(|r| r.as_slice()).collect();
        let grid = pattern(&refs);
        let mut rng = Pcg32::seed_from_u64(5);

        let refreshed = refresh(&grid, 0.0, 10_000.0, &mut rng).unwrap();
        let fraction = refreshed.alive_count() as f64 / refreshed.cells().len() as f64;
        assert!((fraction - SPAWN_CHANCE).abs() < 0.02, "fraction {}", fraction);
    }

    #[test]
    fn test_restyle() {
        let mut grid = pattern(&[&[X, O]]);
        grid.restyle(CellShape::Square, Rgba::rgb(1, 2, 3));
        assert!(grid.cells().iter().all(|c| c.shape == CellShape::Square));
        assert!(grid.cells().iter().all(|c| c.color == Rgba::rgb(1, 2, 3)));
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (1u32..8, 1u32..8).prop_flat_map(|(rows, cols)| {
            proptest::collection::vec(any::<bool>(), (rows * cols) as usize).prop_map(move |flags| {
                let cells = flags
                    .iter()
                    .enumerate()
                    .map(|(i, &alive)| {
                        let i = i as u32;
                        Cell::new(i % cols, i / cols, alive, CellShape::Circle, C)
                    })
                    .collect();
                Grid::from_cells(rows, cols, 10.0, cells)
            })
        })
    }

    proptest! {
        #[test]
        fn prop_step_is_deterministic(grid in arb_grid(), ts in 0.0f64..1.0e6) {
            prop_assert_eq!(step(&grid, ts), step(&grid, ts));
        }

        #[test]
        fn prop_step_follows_rule(grid in arb_grid(), ts in 0.0f64..1.0e6) {
            let next = step(&grid, ts);
            for (before, after) in grid.cells().iter().zip(next.cells()) {
                let n = grid.live_neighbors(before.row, before.col);
                match (before.alive, n) {
                    (true, 2 | 3) => prop_assert_eq!(after, before),
                    (true, _) => {
                        prop_assert!(!after.alive);
                        prop_assert_eq!(after.died_at, Some(ts));
                    }
                    (false, 3) => {
                        prop_assert!(after.alive);
                        prop_assert_eq!(after.died_at, None);
                    }
                    (false, _) => prop_assert!(!after.alive),
                }
            }
        }
    }
}
