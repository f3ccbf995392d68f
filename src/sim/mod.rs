//! Deterministic simulation module
//!
//! All automaton logic lives here. This module must stay pure:
//! - Timestamps are passed in, never read from a clock
//! - Seeded RNG only
//! - Stable row-major iteration order
//! - No platform dependencies; drawing goes through `render::Painter`

pub mod cell;
pub mod engine;
pub mod grid;

pub use cell::{Cell, fade_alpha};
pub use engine::{GridEngine, RefreshOutcome};
pub use grid::{Grid, generate, refresh, step};
