//! Turns redraw callbacks into animation frame counts.
//!
//! With [`Timestep::PerFrame`] every redraw is one animation frame, so the
//! animation runs at the display refresh rate. [`Timestep::Fixed`] uses the
//! "Fix Your Timestep" accumulator to emit frames at a constant wall-clock
//! rate instead.

use std::time::Instant;

use orrery_config::Timestep;
use tracing::warn;

/// Longest wall-clock gap one callback may consume. Longer stalls slow the
/// animation down instead of bursting.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Weight of the newest sample in the smoothed frame rate.
const FPS_SMOOTHING: f64 = 0.1;

pub struct FrameClock {
    timestep: Timestep,
    previous_time: Instant,
    accumulator: f64,
    frame_count: u64,
    advanced_frames: u64,
    last_frame_time: f64,
    fps: f64,
}

impl FrameClock {
    /// A `Fixed` rate that is not a positive finite number falls back to
    /// `PerFrame`.
    pub fn new(timestep: Timestep) -> Self {
        let timestep = match timestep {
            Timestep::Fixed { hz } if !(hz.is_finite() && hz > 0.0) => {
                warn!(hz, "invalid fixed timestep rate, advancing once per frame");
                Timestep::PerFrame
            }
            other => other,
        };
        Self {
            timestep,
            previous_time: Instant::now(),
            accumulator: 0.0,
            frame_count: 0,
            advanced_frames: 0,
            last_frame_time: 0.0,
            fps: 0.0,
        }
    }

    /// Measures the time since the previous call and returns how many
    /// animation frames to apply.
    pub fn tick(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.tick_with(frame_time)
    }

    /// [`tick`](Self::tick) with an explicit elapsed time in seconds.
    pub fn tick_with(&mut self, frame_time: f64) -> u32 {
        let frame_time = frame_time.max(0.0);
        self.frame_count += 1;
        self.last_frame_time = frame_time;
        if frame_time > 0.0 {
            let instant = 1.0 / frame_time;
            self.fps = if self.fps == 0.0 {
                instant
            } else {
                self.fps + FPS_SMOOTHING * (instant - self.fps)
            };
        }

        let steps = match self.timestep {
            Timestep::PerFrame => 1,
            Timestep::Fixed { hz } => {
                let dt = 1.0 / hz;
                let mut clamped = frame_time;
                if clamped > MAX_FRAME_TIME {
                    warn!(
                        "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                        frame_time * 1000.0,
                        MAX_FRAME_TIME * 1000.0
                    );
                    clamped = MAX_FRAME_TIME;
                }
                self.accumulator += clamped;
                let steps = (self.accumulator / dt).floor();
                self.accumulator -= steps * dt;
                steps as u32
            }
        };
        self.advanced_frames += u64::from(steps);
        steps
    }

    pub fn timestep(&self) -> Timestep {
        self.timestep
    }

    /// Callbacks seen so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Animation frames emitted so far.
    pub fn advanced_frames(&self) -> u64 {
        self.advanced_frames
    }

    /// Seconds.
    pub fn last_frame_time(&self) -> f64 {
        self.last_frame_time
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}
