//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling (`requestAnimationFrame` on web, manual elsewhere)
//! - The 2D canvas painter
//! - Setup failures while locating the drawing surface

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::fmt;

/// Opaque id of an outstanding frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Host side of the per-frame callback
///
/// The host already knows which callback to run; the loop only asks for the
/// next frame and cancels a pending one.
pub trait FrameHost {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Frame host driven by hand: the caller passes timestamps to
/// `GameLoop::frame` itself. Used by the native binary and tests.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next_id: i32,
    pending: Option<FrameHandle>,
    /// Total frame requests seen
    pub requested: u32,
    /// Total cancellations seen
    pub cancelled: u32,
}

impl ManualFrames {
    /// The frame request that has not yet been cancelled or superseded
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }
}

impl FrameHost for ManualFrames {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled += 1;
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Fatal problems while wiring the simulation to the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    NoWindow,
    NoDocument,
    /// No element with this id
    MissingCanvas(String),
    /// Element exists but is not a `<canvas>`
    NotACanvas(String),
    NoContext2d,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::NoWindow => write!(f, "no global window"),
            SetupError::NoDocument => write!(f, "window has no document"),
            SetupError::MissingCanvas(id) => write!(f, "no element with id {:?}", id),
            SetupError::NotACanvas(id) => write!(f, "element {:?} is not a canvas", id),
            SetupError::NoContext2d => write!(f, "canvas has no 2d context"),
        }
    }
}

impl std::error::Error for SetupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_frames_tracks_pending() {
        let mut host = ManualFrames::default();
        let a = host.request_frame();
        let b = host.request_frame();
        assert_ne!(a, b);
        assert_eq!(host.pending(), Some(b));

        // Cancelling a superseded handle leaves the newest one pending
        host.cancel_frame(a);
        assert_eq!(host.pending(), Some(b));
        host.cancel_frame(b);
        assert_eq!(host.pending(), None);
        assert_eq!((host.requested, host.cancelled), (2, 2));
    }

    #[test]
    fn test_setup_error_messages() {
        assert_eq!(
            SetupError::MissingCanvas("canvas".into()).to_string(),
            "no element with id \"canvas\""
        );
        assert_eq!(SetupError::NoContext2d.to_string(), "canvas has no 2d context");
    }
}
