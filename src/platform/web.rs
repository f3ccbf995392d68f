//! Browser bindings: `requestAnimationFrame` host and 2D canvas painter

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::{FrameHandle, FrameHost, SetupError};
use crate::color::Rgba;
use crate::game::Viewport;
use crate::render::Painter;

/// Shared slot for the frame callback, filled in once the loop exists
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Frame host over `window.requestAnimationFrame`
pub struct BrowserFrames {
    window: Window,
    callback: FrameCallback,
}

impl BrowserFrames {
    pub fn new(window: Window, callback: FrameCallback) -> Self {
        Self { window, callback }
    }
}

impl FrameHost for BrowserFrames {
    fn request_frame(&mut self) -> FrameHandle {
        let callback = self.callback.borrow();
        let Some(closure) = callback.as_ref() else {
            log::error!("Frame requested before the callback was installed");
            return FrameHandle(0);
        };
        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(id) => FrameHandle(id),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancelAnimationFrame failed: {:?}", e);
        }
    }
}

/// Painter over a `CanvasRenderingContext2d`
pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Look up `<canvas id=...>` and its 2D context
    pub fn from_document(window: &Window, id: &str) -> Result<(HtmlCanvasElement, Self), SetupError> {
        let document = window.document().ok_or(SetupError::NoDocument)?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(id)
            .ok_or_else(|| SetupError::MissingCanvas(id.to_string()))?
            .dyn_into()
            .map_err(|_| SetupError::NotACanvas(id.to_string()))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or(SetupError::NoContext2d)?
            .dyn_into()
            .map_err(|_| SetupError::NoContext2d)?;
        Ok((canvas, Self::new(ctx)))
    }
}

impl Painter for CanvasPainter {
    fn draw_line(&mut self, from: Vec2, to: Vec2) {
        self.ctx.set_line_width(1.0);
        self.ctx.set_line_join("round");
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
        self.ctx.close_path();
    }

    fn draw_rect(&mut self, color: Rgba, origin: Vec2, dimensions: Vec2) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(
            origin.x as f64,
            origin.y as f64,
            dimensions.x as f64,
            dimensions.y as f64,
        );
    }

    fn draw_circle(&mut self, color: Rgba, center: Vec2, radius: f32) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.fill();
    }
}

/// Current inner size of the browser window
pub fn window_viewport(window: &Window) -> Viewport {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    Viewport::new(width as f32, height as f32)
}

/// Match the canvas backing size to the viewport
pub fn fit_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) {
    let (width, height) = (viewport.width as u32, viewport.height as u32);
    if canvas.width() != width || canvas.height() != height {
        canvas.set_width(width);
        canvas.set_height(height);
    }
}
