//! Frame-driven game loop
//!
//! One callback per display refresh drives three independent cadences:
//! draw, coarse update and simulation tick. Each cadence keeps its own
//! clock and fires when more than its interval has passed, in that fixed
//! order, so one frame may fire any combination of them.

use crate::options::GameOptions;
use crate::platform::{FrameHandle, FrameHost};

/// A recurring phase with its own interval and last-fired clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cadence {
    pub interval_ms: f64,
    pub last_fired: f64,
}

impl Cadence {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_fired: 0.0,
        }
    }

    /// Fire if more than `interval_ms` elapsed; advances the clock when it does
    pub fn poll(&mut self, timestamp: f64) -> bool {
        if timestamp - self.last_fired > self.interval_ms {
            self.last_fired = timestamp;
            true
        } else {
            false
        }
    }
}

type Phase = Box<dyn FnMut(f64)>;

/// Callbacks run by the loop, each receiving the frame timestamp
pub struct LoopPhases {
    pub draw: Phase,
    pub update: Phase,
    pub simulate: Phase,
}

impl LoopPhases {
    pub fn new(
        draw: impl FnMut(f64) + 'static,
        update: impl FnMut(f64) + 'static,
        simulate: impl FnMut(f64) + 'static,
    ) -> Self {
        Self {
            draw: Box::new(draw),
            update: Box::new(update),
            simulate: Box::new(simulate),
        }
    }
}

pub struct GameLoop<H: FrameHost> {
    host: H,
    phases: LoopPhases,
    draw: Cadence,
    update: Cadence,
    simulate: Cadence,
    running: bool,
    pending: Option<FrameHandle>,
    last_timestamp: f64,
}

impl<H: FrameHost> GameLoop<H> {
    pub fn new(host: H, phases: LoopPhases, options: &GameOptions) -> Self {
        Self {
            host,
            phases,
            draw: Cadence::new(options.draw_ms),
            update: Cadence::new(options.update_ms),
            simulate: Cadence::new(options.update_cells_ms),
            running: false,
            pending: None,
            last_timestamp: 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_timestamp(&self) -> f64 {
        self.last_timestamp
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Retune the three cadences; takes effect from the next frame
    pub fn set_intervals(&mut self, options: &GameOptions) {
        self.draw.interval_ms = options.draw_ms;
        self.update.interval_ms = options.update_ms;
        self.simulate.interval_ms = options.update_cells_ms;
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.pending = Some(self.host.request_frame());
        log::info!("Loop started");
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
        log::info!("Loop stopped");
    }

    pub fn toggle(&mut self) {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
    }

    /// The per-frame callback
    pub fn frame(&mut self, timestamp: f64) {
        if !self.running {
            return;
        }
        self.pending = Some(self.host.request_frame());
        self.last_timestamp = timestamp;

        if self.draw.poll(timestamp) {
            (self.phases.draw)(timestamp);
        }
        if self.update.poll(timestamp) {
            (self.phases.update)(timestamp);
        }
        if self.simulate.poll(timestamp) {
            (self.phases.simulate)(timestamp);
        }
    }

    /// Draw once with the last known timestamp while paused, so option
    /// changes show up immediately
    pub fn draw_last_frame(&mut self) {
        if self.running {
            return;
        }
        (self.phases.draw)(self.last_timestamp);
    }

    /// Run one tick while paused, then refresh counters and redraw
    pub fn step_once(&mut self) {
        if self.running {
            return;
        }
        let timestamp = self.last_timestamp;
        (self.phases.simulate)(timestamp);
        (self.phases.update)(timestamp);
        (self.phases.draw)(timestamp);
    }
}
