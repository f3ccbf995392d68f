//! Canvas Life - Conway's Game of Life on a 2D canvas
//!
//! Core modules:
//! - `sim`: Cell lifecycle and the grid engine (rule, generation, refresh)
//! - `scheduler`: Frame-driven loop with independent draw/update/tick cadences
//! - `render`: Render pass over the grid, painting through a `Painter`
//! - `game`: Simulation context tying options, engine and viewport together
//! - `options`: User-facing options, persisted in LocalStorage on web
//! - `platform`: Frame host and canvas bindings

pub mod color;
pub mod game;
pub mod options;
pub mod platform;
pub mod render;
pub mod scheduler;
pub mod sim;

pub use color::Rgba;
pub use game::{DrawReport, Simulation, Stats, Viewport};
pub use options::{CellShape, GameOptions};
pub use scheduler::{GameLoop, LoopPhases};

/// Simulation constants
pub mod consts {
    /// Edge length of a cell in CSS pixels
    pub const CELL_SIZE: f32 = 25.0;
    /// Chance for a cell to be alive when seeded or refreshed
    pub const SPAWN_CHANCE: f64 = 0.15;

    /// How long a dead cell keeps fading out (ms)
    pub const FADE_WINDOW_MS: f64 = 1000.0;
    /// Fixed hue of fading cells
    pub const FADE_RGB: (u8, u8, u8) = (226, 78, 27);

    /// Minimum time between two refreshes (ms)
    pub const REFRESH_INTERVAL_MS: f64 = 10_000.0;
    /// Population percentage at or below which a refresh is requested
    pub const REFRESH_THRESHOLD_PERCENT: f64 = 5.0;

    /// Minimum wall-clock time between two resizes (ms)
    pub const RESIZE_DEBOUNCE_MS: f64 = 250.0;

    /// One display refresh at 60 Hz (ms)
    pub const FRAME_MS: f64 = 16.67;
}

/// Ease-out curve on [0, 1]
#[inline]
pub fn ease_out(x: f64) -> f64 {
    (x * std::f64::consts::PI / 2.0).sin()
}

/// Map `x` from [min, max] onto [0, 1] (unclamped)
#[inline]
pub fn normalize(x: f64, max: f64, min: f64) -> f64 {
    (x - min) / (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        assert!(ease_out(0.0).abs() < 1e-12);
        assert!((ease_out(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(500.0, 1000.0, 0.0), 0.5);
        assert_eq!(normalize(15.0, 20.0, 10.0), 0.5);
        assert_eq!(normalize(1500.0, 1000.0, 0.0), 1.5);
    }
}
