//! Render pass
//!
//! Walks the grid once per draw tick: background, optional grid lines, then
//! every live or fading cell. Pixel work goes through a `Painter`, so the
//! pass runs the same against a canvas or a recording in tests.

pub mod recording;

use glam::Vec2;

use crate::color::Rgba;
use crate::game::Viewport;
use crate::options::GameOptions;
use crate::sim::Grid;

/// Paint operations consumed by the render pass
pub trait Painter {
    /// One-pixel stroke between two points
    fn draw_line(&mut self, from: Vec2, to: Vec2);
    /// Filled axis-aligned rectangle
    fn draw_rect(&mut self, color: Rgba, origin: Vec2, dimensions: Vec2);
    /// Filled circle
    fn draw_circle(&mut self, color: Rgba, center: Vec2, radius: f32);
}

/// Option values the render pass reads, with colours already parsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub background: Rgba,
    pub show_grid: bool,
    pub fade_dead_cells: bool,
}

impl RenderStyle {
    pub fn from_options(options: &GameOptions) -> Self {
        Self {
            background: options.bg_rgba(),
            show_grid: options.show_grid,
            fade_dead_cells: options.fade_dead_cells,
        }
    }
}

/// Paint one frame and return the number of live cells seen
pub fn render_frame(
    painter: &mut dyn Painter,
    grid: &Grid,
    style: &RenderStyle,
    viewport: Viewport,
    timestamp: f64,
) -> usize {
    let size = Vec2::new(viewport.width, viewport.height);
    painter.draw_rect(style.background, Vec2::ZERO, size);

    if style.show_grid {
        draw_grid_lines(painter, grid.cell_size(), size);
    }

    let mut alive = 0;
    for cell in grid.cells() {
        if cell.alive {
            alive += 1;
        }
        cell.draw(
            painter,
            timestamp,
            style.fade_dead_cells,
            style.show_grid,
            grid.cell_size(),
        );
    }
    alive
}

/// Vertical then horizontal lines on cell boundaries across the viewport
fn draw_grid_lines(painter: &mut dyn Painter, cell_size: f32, size: Vec2) {
    if cell_size <= 0.0 {
        return;
    }

    let mut x = 0.0;
    while x <= size.x {
        painter.draw_line(Vec2::new(x, 0.0), Vec2::new(x, size.y));
        x += cell_size;
    }

    let mut y = 0.0;
    while y <= size.y {
        painter.draw_line(Vec2::new(0.0, y), Vec2::new(size.x, y));
        y += cell_size;
    }
}
