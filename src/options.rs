//! Game options
//!
//! Changed by UI controls between frames, never mid-tick. Persisted in
//! LocalStorage so toggles survive a reload; the simulation itself is not.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::consts::FRAME_MS;

/// How live cells are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CellShape {
    #[default]
    Circle,
    Square,
}

impl CellShape {
    /// The other shape
    pub fn toggled(&self) -> Self {
        match self {
            CellShape::Circle => CellShape::Square,
            CellShape::Square => CellShape::Circle,
        }
    }
}

/// Default background, a burnt orange
pub const DEFAULT_BG: Rgba = Rgba::rgb(218, 118, 53);
/// Default live cell colour
pub const DEFAULT_CELL: Rgba = Rgba::rgb(226, 78, 27);

/// Options for drawing and pacing the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameOptions {
    // === Drawing ===
    /// Draw grid lines between cells
    pub show_grid: bool,
    /// Fade dead cells out instead of removing them at once
    pub fade_dead_cells: bool,
    /// Shape of live cells
    pub cell_shape: CellShape,
    /// Background colour (CSS)
    pub bg_color: String,
    /// Live cell colour (CSS)
    pub cell_color: String,

    // === Cadences (ms) ===
    /// Interval between simulation ticks
    pub update_cells_ms: f64,
    /// Interval between coarse updates (status counters)
    pub update_ms: f64,
    /// Interval between draw passes
    pub draw_ms: f64,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            show_grid: false,
            fade_dead_cells: true,
            cell_shape: CellShape::Circle,
            bg_color: DEFAULT_BG.to_css(),
            cell_color: DEFAULT_CELL.to_css(),

            update_cells_ms: FRAME_MS * 5.0,
            update_ms: 250.0,
            draw_ms: FRAME_MS,
        }
    }
}

impl GameOptions {
    /// Parsed background colour, falling back to the default
    pub fn bg_rgba(&self) -> Rgba {
        Rgba::parse(&self.bg_color).unwrap_or_else(|| {
            log::warn!("Invalid background colour {:?}, using default", self.bg_color);
            DEFAULT_BG
        })
    }

    /// Parsed live cell colour, falling back to the default
    pub fn cell_rgba(&self) -> Rgba {
        Rgba::parse(&self.cell_color).unwrap_or_else(|| {
            log::warn!("Invalid cell colour {:?}, using default", self.cell_color);
            DEFAULT_CELL
        })
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "canvas_life_options";

    /// Load options from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(options) => {
                        log::info!("Loaded options from LocalStorage");
                        return options;
                    }
                    Err(e) => log::warn!("Ignoring stored options: {}", e),
                }
            }
        }

        log::info!("Using default options");
        Self::default()
    }

    /// Save options to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::debug!("Options saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GameOptions::default();
        assert!(!options.show_grid);
        assert!(options.fade_dead_cells);
        assert_eq!(options.cell_shape, CellShape::Circle);
        assert_eq!(options.bg_rgba(), DEFAULT_BG);
        assert_eq!(options.cell_rgba(), DEFAULT_CELL);
        assert!((options.update_cells_ms - 83.35).abs() < 1e-9);
    }

    #[test]
    fn test_config_shape() {
        let json = r##"{
            "showGrid": true,
            "fadeDeadCells": false,
            "cellShape": "square",
            "updateCellsMs": 100,
            "updateMs": 500,
            "drawMs": 33,
            "bgColor": "#000000",
            "cellColor": "rgb(0, 255, 0)"
        }"##;
        let options: GameOptions = serde_json::from_str(json).unwrap();
        assert!(options.show_grid);
        assert!(!options.fade_dead_cells);
        assert_eq!(options.cell_shape, CellShape::Square);
        assert_eq!(options.update_cells_ms, 100.0);
        assert_eq!(options.update_ms, 500.0);
        assert_eq!(options.draw_ms, 33.0);
        assert_eq!(options.bg_rgba(), Rgba::rgb(0, 0, 0));
        assert_eq!(options.cell_rgba(), Rgba::rgb(0, 255, 0));

        let back = serde_json::to_value(&options).unwrap();
        assert_eq!(back["cellShape"], "square");
        assert_eq!(back["showGrid"], true);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let options: GameOptions = serde_json::from_str(r#"{"showGrid": true}"#).unwrap();
        assert!(options.show_grid);
        assert_eq!(options.draw_ms, GameOptions::default().draw_ms);
    }

    #[test]
    fn test_invalid_colour_falls_back() {
        let options = GameOptions {
            cell_color: "not a colour".into(),
            ..Default::default()
        };
        assert_eq!(options.cell_rgba(), DEFAULT_CELL);
    }

    #[test]
    fn test_shape_toggle_and_serde_names() {
        assert_eq!(CellShape::Circle.toggled(), CellShape::Square);
        assert_eq!(CellShape::Square.toggled(), CellShape::Circle);
        assert_eq!(serde_json::to_value(CellShape::Circle).unwrap(), "circle");
        assert!(serde_json::from_str::<CellShape>(r#""hexagon""#).is_err());
    }
}
