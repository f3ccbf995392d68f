//! Simulation context
//!
//! Owns the options, the grid engine and the viewport. The entry point
//! creates one and hands it by reference to the loop phases and the UI.

use crate::consts::CELL_SIZE;
use crate::options::{CellShape, GameOptions};
use crate::render::{Painter, RenderStyle, render_frame};
use crate::sim::{GridEngine, RefreshOutcome};

/// Size of the drawing surface in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// `(rows, cols)` needed to cover the viewport with `cell_size` cells
    pub fn grid_dims(&self, cell_size: f32) -> (u32, u32) {
        if cell_size <= 0.0 {
            return (0, 0);
        }
        let rows = (self.height.max(0.0) / cell_size).ceil() as u32;
        let cols = (self.width.max(0.0) / cell_size).ceil() as u32;
        (rows, cols)
    }
}

/// Status counters refreshed by the coarse update cadence
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stats {
    pub generation: u64,
    pub alive: usize,
    pub population_percent: f64,
}

/// What a draw pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawReport {
    pub alive: usize,
    pub refresh: RefreshOutcome,
}

pub struct Simulation {
    options: GameOptions,
    style: RenderStyle,
    engine: GridEngine,
    viewport: Viewport,
    stats: Stats,
}

impl Simulation {
    pub fn new(options: GameOptions, viewport: Viewport, seed: u64, now: f64) -> Self {
        let (rows, cols) = viewport.grid_dims(CELL_SIZE);
        let engine = GridEngine::new(
            rows,
            cols,
            CELL_SIZE,
            options.cell_shape,
            options.cell_rgba(),
            seed,
            now,
        );
        log::info!(
            "Simulation created: {}x{} cells, {} alive (seed {})",
            rows,
            cols,
            engine.alive_count(),
            seed
        );

        let mut sim = Self {
            style: RenderStyle::from_options(&options),
            options,
            engine,
            viewport,
            stats: Stats::default(),
        };
        sim.update(now);
        sim
    }

    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    pub fn engine(&self) -> &GridEngine {
        &self.engine
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    // === Loop phases ===

    /// Render pass; rescues a collapsed population afterwards
    pub fn draw(&mut self, painter: &mut dyn Painter, timestamp: f64) -> DrawReport {
        let alive = render_frame(
            painter,
            self.engine.grid(),
            &self.style,
            self.viewport,
            timestamp,
        );
        let refresh = self.engine.rescue_population(timestamp);
        DrawReport { alive, refresh }
    }

    /// Draw phase with surface tracking
    ///
    /// The resize debounce runs on the wall clock `now`, the render on the
    /// frame `timestamp`. A paused redraw repeats its frame timestamp, so
    /// only `now` moves the debounce forward.
    pub fn draw_fitted(
        &mut self,
        painter: &mut dyn Painter,
        viewport: Viewport,
        now: f64,
        timestamp: f64,
    ) -> DrawReport {
        self.resize(viewport, now);
        self.draw(painter, timestamp)
    }

    /// Coarse update: recompute the status counters
    pub fn update(&mut self, _timestamp: f64) -> Stats {
        self.stats = Stats {
            generation: self.engine.generation(),
            alive: self.engine.alive_count(),
            population_percent: self.engine.population_percent(),
        };
        self.stats
    }

    /// Simulation tick
    pub fn tick(&mut self, timestamp: f64) {
        self.engine.tick(timestamp);
    }

    // === Controls ===

    /// Track the drawing surface; the grid is regenerated (debounced) when
    /// its dimensions change
    pub fn resize(&mut self, viewport: Viewport, now: f64) -> bool {
        self.viewport = viewport;
        let (rows, cols) = viewport.grid_dims(self.engine.cell_size());
        self.engine.resize(rows, cols, now)
    }

    pub fn reset(&mut self, now: f64) {
        self.engine.reset(now);
        self.update(now);
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.options.show_grid = !self.options.show_grid;
        self.apply_options();
        self.options.show_grid
    }

    pub fn toggle_fade(&mut self) -> bool {
        self.options.fade_dead_cells = !self.options.fade_dead_cells;
        self.apply_options();
        self.options.fade_dead_cells
    }

    pub fn set_cell_shape(&mut self, shape: CellShape) {
        self.options.cell_shape = shape;
        self.apply_options();
    }

    /// Replace every option at once
    pub fn set_options(&mut self, options: GameOptions) {
        self.options = options;
        self.apply_options();
    }

    fn apply_options(&mut self) {
        self.style = RenderStyle::from_options(&self.options);
        self.engine
            .restyle(self.options.cell_shape, self.options.cell_rgba());
        log::debug!("Options applied: {:?}", self.options);
    }
}
