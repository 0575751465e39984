//! Platform glue shared by the browser host and the native demo
//!
//! - Loop start/stop ([`LoopControl`])
//! - Wall-clock to fixed-tick conversion ([`FrameClock`])
//! - Client to surface coordinate mapping

use std::cell::Cell;

use glam::Vec2;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta honoured; anything longer (tab switch) is clamped
pub const MAX_FRAME_DT: f32 = 0.1;

/// Run/stop switch for the render-driven callback chain
///
/// Owned by the single UI thread, so plain `Cell`s are enough.
#[derive(Debug)]
pub struct LoopControl {
    running: Cell<bool>,
    /// Handle of the pending animation frame, if one is scheduled
    frame: Cell<Option<i32>>,
}

impl Default for LoopControl {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopControl {
    pub fn new() -> Self {
        Self {
            running: Cell::new(true),
            frame: Cell::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Halt scheduling. Returns the pending frame handle so the caller can
    /// cancel it with the host.
    pub fn stop(&self) -> Option<i32> {
        if self.running.replace(false) {
            log::info!("Loop stopped");
        }
        self.frame.take()
    }

    /// Allow scheduling again after a stop
    pub fn resume(&self) {
        if !self.running.replace(true) {
            log::info!("Loop resumed");
        }
    }

    /// Remember the handle of a newly scheduled frame
    pub fn set_frame(&self, handle: i32) {
        self.frame.set(Some(handle));
    }

    /// The pending frame has fired; forget its handle
    pub fn take_frame(&self) -> Option<i32> {
        self.frame.take()
    }
}

/// Turns variable frame times into whole simulation ticks
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    /// Host timestamp of the previous frame (ms); `None` before the first
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a host timestamp (ms) and get how many ticks of `SIM_DT` to run.
    ///
    /// The first frame runs exactly one tick. Leftover time carries over;
    /// at most `MAX_SUBSTEPS` ticks run per frame and any excess is dropped.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => SIM_DT,
        };
        self.last_time = Some(now_ms);
        self.accumulate(dt)
    }

    /// Add `dt` seconds and return the number of whole ticks now due
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        // Small epsilon so a frame of exactly SIM_DT is not lost to rounding
        while self.accumulator + 1e-6 >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Dropping {:.3}s of backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        self.accumulator = self.accumulator.max(0.0);
        steps
    }

    /// Forget timing history, e.g. after the loop was stopped
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Map a pointer position in client (viewport) pixels to surface-local
/// pixels, given the surface's top-left corner in client space
pub fn client_to_surface(client: Vec2, surface_origin: Vec2) -> Vec2 {
    client - surface_origin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_returns_pending_frame() {
        let control = LoopControl::new();
        assert!(control.is_running());
        control.set_frame(42);
        assert_eq!(control.stop(), Some(42));
        assert!(!control.is_running());
        // Nothing left to cancel on a second stop
        assert_eq!(control.stop(), None);
    }

    #[test]
    fn test_resume_after_stop() {
        let control = LoopControl::new();
        control.stop();
        control.resume();
        assert!(control.is_running());
        control.set_frame(7);
        assert_eq!(control.take_frame(), Some(7));
        assert_eq!(control.take_frame(), None);
    }

    #[test]
    fn test_first_frame_runs_one_tick() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1000.0), 1);
    }

    #[test]
    fn test_sixty_hz_frames_run_one_tick_each() {
        let mut clock = FrameClock::new();
        let mut total = 0;
        let mut now = 0.0;
        for _ in 0..60 {
            total += clock.advance(now);
            now += 16.0;
        }
        assert_eq!(total, 60);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        // A 5 second stall is clamped to MAX_FRAME_DT, then to MAX_SUBSTEPS
        let steps = clock.advance(5000.0);
        assert!(steps <= MAX_SUBSTEPS);
        assert!(steps >= 1);
    }

    #[test]
    fn test_leftover_time_carries_over() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.accumulate(SIM_DT * 0.5), 0);
        assert_eq!(clock.accumulate(SIM_DT * 0.5), 1);
    }

    #[test]
    fn test_backwards_time_runs_nothing() {
        let mut clock = FrameClock::new();
        clock.advance(1000.0);
        assert_eq!(clock.advance(900.0), 0);
    }

    #[test]
    fn test_client_to_surface() {
        let p = client_to_surface(Vec2::new(120.0, 80.0), Vec2::new(20.0, 30.0));
        assert_eq!(p, Vec2::new(100.0, 50.0));
    }
}
