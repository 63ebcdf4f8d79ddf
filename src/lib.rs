//! Roaming Pet - physics and animation core for an on-screen companion
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, rope, roll, animation, reactions)
//! - `runner`: Fixed-timestep run loop with an explicit start/stop handle
//! - `settings`: Data-driven tuning loaded from JSON
//! - `error`: Configuration errors

pub mod error;
pub mod runner;
pub mod settings;
pub mod sim;

pub use error::SettingsError;
pub use runner::{RunHandle, Runner};
pub use settings::Settings;

/// Simulation configuration constants
pub mod consts {
    /// Nominal tick duration (60 Hz). Velocities are in pixels per nominal tick.
    pub const NOMINAL_TICK_MS: f32 = 16.0;
    /// Largest tick scale a single update may integrate (prevents tunneling on stalls)
    pub const MAX_TICK_SCALE: f32 = 4.0;
    /// Maximum fixed ticks run per rendered frame
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default companion footprint (pixels)
    pub const COMPANION_WIDTH: f32 = 200.0;
    pub const COMPANION_HEIGHT: f32 = 200.0;

    /// Downward acceleration (pixels per tick squared)
    pub const GRAVITY: f32 = 0.5;
    /// Velocity multiplier per tick while airborne
    pub const AIR_RESISTANCE: f32 = 0.98;
    /// Velocity multiplier per tick while grounded
    pub const GROUND_FRICTION: f32 = 0.85;
    /// Energy retained after bouncing off a screen edge
    pub const BOUNCE_DAMPENING: f32 = 0.6;
    /// Terminal fall speed
    pub const MAX_FALL_SPEED: f32 = 15.0;
    /// Hard cap on total speed (flings included)
    pub const MAX_SPEED: f32 = 40.0;
    /// Collidable strip at the top of each foreign window
    pub const TITLE_BAR_HEIGHT: f32 = 30.0;
    /// Horizontal walk speed
    pub const WALK_SPEED: f32 = 2.0;
    /// Initial upward velocity for a jump
    pub const JUMP_FORCE: f32 = -12.0;

    /// Rope defaults
    pub const ROPE_LENGTH: f32 = 100.0;
    pub const ROPE_GRAVITY: f32 = 0.5;
    pub const ROPE_DAMPING: f32 = 0.995;

    /// Roll defaults
    pub const ROLL_TILT_SENSITIVITY: f32 = 0.1;
    pub const ROLL_FRICTION: f32 = 0.98;
    pub const ROLL_DEFAULT_SPEED: f32 = 5.0;
    pub const GRIND_TOLERANCE: f32 = 6.0;

    /// How long an externally triggered reaction is held before reverting to idle
    pub const REACTION_HOLD_MS: f32 = 2000.0;

    /// Pointer follow smoothing (0-1, lower = smoother)
    pub const GAZE_SMOOTHING: f32 = 0.15;
    /// Pointer distance for full gaze intensity
    pub const GAZE_SENSITIVITY_PX: f32 = 200.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    if !angle.is_finite() {
        return 0.0;
    }
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Replace a non-positive or non-finite delta with one nominal tick.
#[inline]
pub fn sanitize_delta_ms(delta_ms: f32) -> f32 {
    if delta_ms.is_finite() && delta_ms > 0.0 {
        delta_ms
    } else {
        consts::NOMINAL_TICK_MS
    }
}

/// Sanitized delta as a multiple of the nominal tick, capped at
/// [`consts::MAX_TICK_SCALE`].
#[inline]
pub fn tick_scale(delta_ms: f32) -> f32 {
    (sanitize_delta_ms(delta_ms) / consts::NOMINAL_TICK_MS).min(consts::MAX_TICK_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_scale_sanitizes_delta() {
        assert_eq!(tick_scale(16.0), 1.0);
        assert_eq!(tick_scale(8.0), 0.5);
        assert_eq!(tick_scale(0.0), 1.0);
        assert_eq!(tick_scale(-5.0), 1.0);
        assert_eq!(tick_scale(f32::NAN), 1.0);
        assert_eq!(tick_scale(10_000.0), consts::MAX_TICK_SCALE);
        assert_eq!(sanitize_delta_ms(250.0), 250.0);
    }

    #[test]
    fn test_normalize_angle() {
        use std::f32::consts::PI;
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(-1.5 * PI) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(normalize_angle(f32::INFINITY), 0.0);
    }
}
