//! Fixed-timestep run loop
//!
//! A [`RunHandle`] exists only while the simulation runs: `start` creates it
//! and `stop` consumes it, handing the companion back.

use crate::consts::{MAX_SUBSTEPS, NOMINAL_TICK_MS};
use crate::sim::{Command, Companion, Snapshot};

/// Longest frame the accumulator will accept (ms)
pub const MAX_FRAME_MS: f32 = 100.0;

/// Run loop configuration
#[derive(Debug, Clone, Copy)]
pub struct Runner {
    tick_ms: f32,
    max_substeps: u32,
    max_frame_ms: f32,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            tick_ms: NOMINAL_TICK_MS,
            max_substeps: MAX_SUBSTEPS,
            max_frame_ms: MAX_FRAME_MS,
        }
    }
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps.max(1);
        self
    }

    pub fn with_max_frame_ms(mut self, max_frame_ms: f32) -> Self {
        if max_frame_ms.is_finite() && max_frame_ms > 0.0 {
            self.max_frame_ms = max_frame_ms;
        }
        self
    }

    /// Begin running `companion`
    pub fn start(self, companion: Companion) -> RunHandle {
        log::info!(
            "Simulation started ({} ms tick, up to {} substeps)",
            self.tick_ms,
            self.max_substeps
        );
        RunHandle {
            runner: self,
            companion,
            accumulator_ms: 0.0,
            frames: 0,
        }
    }
}

/// A running simulation
#[derive(Debug)]
pub struct RunHandle {
    runner: Runner,
    companion: Companion,
    accumulator_ms: f32,
    frames: u64,
}

impl RunHandle {
    /// Account for `frame_ms` of wall time and run the fixed ticks it covers
    pub fn advance(&mut self, frame_ms: f32) -> Snapshot {
        let frame_ms = if frame_ms.is_finite() {
            frame_ms.clamp(0.0, self.runner.max_frame_ms)
        } else {
            0.0
        };
        self.accumulator_ms += frame_ms;
        self.frames += 1;

        let mut substeps = 0;
        while self.accumulator_ms >= self.runner.tick_ms && substeps < self.runner.max_substeps {
            self.companion.tick(self.runner.tick_ms);
            self.accumulator_ms -= self.runner.tick_ms;
            substeps += 1;
        }
        // Drop time we couldn't catch up on instead of spiraling
        if substeps == self.runner.max_substeps {
            self.accumulator_ms = self.accumulator_ms.min(self.runner.tick_ms);
        }

        self.companion.snapshot()
    }

    /// Queue a command for the next tick
    pub fn push(&mut self, command: Command) {
        self.companion.push(command);
    }

    pub fn companion(&self) -> &Companion {
        &self.companion
    }

    pub fn snapshot(&self) -> Snapshot {
        self.companion.snapshot()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// End the run and hand the companion back
    pub fn stop(self) -> Companion {
        log::info!(
            "Simulation stopped after {} frames, {} ticks",
            self.frames,
            self.companion.ticks()
        );
        self.companion
    }
}
