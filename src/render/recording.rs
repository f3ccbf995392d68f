//! A painter that records operations instead of drawing them
//!
//! Used by the headless native run and by tests.

use glam::Vec2;

use super::Painter;
use crate::color::Rgba;

/// A single recorded paint operation
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Line { from: Vec2, to: Vec2 },
    Rect { color: Rgba, origin: Vec2, dimensions: Vec2 },
    Circle { color: Rgba, center: Vec2, radius: f32 },
}

#[derive(Debug, Default)]
pub struct RecordingPainter {
    pub paints: Vec<Paint>,
}

impl RecordingPainter {
    pub fn clear(&mut self) {
        self.paints.clear();
    }

    pub fn lines(&self) -> usize {
        self.paints
            .iter()
            .filter(|p| matches!(p, Paint::Line { .. }))
            .count()
    }

    pub fn circles(&self) -> usize {
        self.paints
            .iter()
            .filter(|p| matches!(p, Paint::Circle { .. }))
            .count()
    }

    /// Rectangles filled with exactly `color`
    pub fn rects_with(&self, color: Rgba) -> usize {
        self.paints
            .iter()
            .filter(|p| matches!(p, Paint::Rect { color: c, .. } if *c == color))
            .count()
    }
}

impl Painter for RecordingPainter {
    fn draw_line(&mut self, from: Vec2, to: Vec2) {
        self.paints.push(Paint::Line { from, to });
    }

    fn draw_rect(&mut self, color: Rgba, origin: Vec2, dimensions: Vec2) {
        self.paints.push(Paint::Rect {
            color,
            origin,
            dimensions,
        });
    }

    fn draw_circle(&mut self, color: Rgba, center: Vec2, radius: f32) {
        self.paints.push(Paint::Circle {
            color,
            center,
            radius,
        });
    }
}
