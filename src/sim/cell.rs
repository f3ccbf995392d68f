//! A single grid cell and its death/fade lifecycle

use glam::Vec2;

use crate::color::Rgba;
use crate::consts::{FADE_RGB, FADE_WINDOW_MS};
use crate::options::CellShape;
use crate::render::Painter;
use crate::{ease_out, normalize};

/// One grid position
///
/// `died_at` is only meaningful while the cell is dead. `None` means the
/// cell has never died, or its fade window has elapsed and was cleared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub col: u32,
    pub row: u32,
    pub alive: bool,
    pub died_at: Option<f64>,
    pub shape: CellShape,
    pub color: Rgba,
}

impl Cell {
    pub fn new(col: u32, row: u32, alive: bool, shape: CellShape, color: Rgba) -> Self {
        Self {
            col,
            row,
            alive,
            died_at: None,
            shape,
            color,
        }
    }

    /// Copy of this cell, dead as of `timestamp`
    pub fn killed(&self, timestamp: f64) -> Self {
        Self {
            alive: false,
            died_at: Some(timestamp),
            ..*self
        }
    }

    /// Copy of this cell, alive with no death record
    pub fn revived(&self) -> Self {
        Self {
            alive: true,
            died_at: None,
            ..*self
        }
    }

    /// Copy of this cell with its death record dropped
    pub fn forgotten(&self) -> Self {
        Self {
            died_at: None,
            ..*self
        }
    }

    /// Milliseconds since death, if the cell is dead and still has a record
    pub fn since_death(&self, timestamp: f64) -> Option<f64> {
        if self.alive {
            return None;
        }
        self.died_at.map(|t| timestamp - t)
    }

    /// Whether the fade window has run out and `died_at` can be cleared
    pub fn fade_expired(&self, timestamp: f64) -> bool {
        self.since_death(timestamp)
            .is_some_and(|elapsed| elapsed > FADE_WINDOW_MS)
    }

    /// Colour to paint this cell with at `timestamp`, or `None` for no paint
    pub fn fill(&self, timestamp: f64, fade_enabled: bool) -> Option<Rgba> {
        if self.alive {
            return Some(self.color);
        }
        let elapsed = self.since_death(timestamp)?;
        if elapsed > FADE_WINDOW_MS || !fade_enabled {
            return None;
        }
        let (r, g, b) = FADE_RGB;
        Some(Rgba::rgb(r, g, b).with_alpha(fade_alpha(elapsed)))
    }

    /// Paint the cell, if it is visible at `timestamp`
    pub fn draw(
        &self,
        painter: &mut dyn Painter,
        timestamp: f64,
        fade_enabled: bool,
        show_grid: bool,
        cell_size: f32,
    ) {
        let Some(color) = self.fill(timestamp, fade_enabled) else {
            return;
        };

        let origin = Vec2::new(self.col as f32 * cell_size, self.row as f32 * cell_size);
        match self.shape {
            CellShape::Circle => {
                let half = cell_size / 2.0;
                painter.draw_circle(color, origin + Vec2::splat(half), half);
            }
            CellShape::Square if show_grid => {
                // Keep the grid lines visible
                painter.draw_rect(color, origin + Vec2::ONE, Vec2::splat(cell_size - 2.0));
            }
            CellShape::Square => {
                painter.draw_rect(color, origin, Vec2::splat(cell_size));
            }
        }
    }
}

/// Opacity of a dead cell `elapsed` ms after death
pub fn fade_alpha(elapsed: f64) -> f32 {
    (1.0 - ease_out(normalize(elapsed, FADE_WINDOW_MS, 0.0))).max(0.0) as f32
}
