//! Simulation tuning and preferences
//!
//! Loaded from a JSON file by the host; every field falls back to the
//! defaults in [`crate::consts`] when omitted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Companion footprint in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionSize {
    pub width: f32,
    pub height: f32,
}

impl Default for CompanionSize {
    fn default() -> Self {
        Self {
            width: COMPANION_WIDTH,
            height: COMPANION_HEIGHT,
        }
    }
}

impl CompanionSize {
    /// Half width/height, as used by the collision box
    pub fn half_extents(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Free-fall and collision tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    pub gravity: f32,
    pub air_resistance: f32,
    pub ground_friction: f32,
    pub bounce_dampening: f32,
    pub max_fall_speed: f32,
    pub max_speed: f32,
    pub title_bar_height: f32,
    pub walk_speed: f32,
    pub jump_force: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            air_resistance: AIR_RESISTANCE,
            ground_friction: GROUND_FRICTION,
            bounce_dampening: BOUNCE_DAMPENING,
            max_fall_speed: MAX_FALL_SPEED,
            max_speed: MAX_SPEED,
            title_bar_height: TITLE_BAR_HEIGHT,
            walk_speed: WALK_SPEED,
            jump_force: JUMP_FORCE,
        }
    }
}

/// Pendulum tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RopeParams {
    /// Default rope length when an attach command doesn't give one
    pub length: f32,
    pub gravity: f32,
    /// Angular velocity multiplier per tick
    pub damping: f32,
}

impl Default for RopeParams {
    fn default() -> Self {
        Self {
            length: ROPE_LENGTH,
            gravity: ROPE_GRAVITY,
            damping: ROPE_DAMPING,
        }
    }
}

/// Skateboard tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollParams {
    pub tilt_sensitivity: f32,
    pub friction: f32,
    /// Max gap between the board and the grind surface
    pub grind_tolerance: f32,
}

impl Default for RollParams {
    fn default() -> Self {
        Self {
            tilt_sensitivity: ROLL_TILT_SENSITIVITY,
            friction: ROLL_FRICTION,
            grind_tolerance: GRIND_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationParams {
    /// How long a reaction plays before the companion returns to idle
    pub reaction_hold_ms: f32,
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            reaction_hold_ms: REACTION_HOLD_MS,
        }
    }
}

/// Pointer tracking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeParams {
    pub smoothing: f32,
    pub sensitivity_px: f32,
}

impl Default for GazeParams {
    fn default() -> Self {
        Self {
            smoothing: GAZE_SMOOTHING,
            sensitivity_px: GAZE_SENSITIVITY_PX,
        }
    }
}

/// Horizontal speeds separating idle / walking / running
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParams {
    pub walk_threshold: f32,
    pub run_threshold: f32,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            walk_threshold: 0.5,
            run_threshold: 4.0,
        }
    }
}

/// All simulation settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for trick/reaction selection
    pub seed: u64,
    pub companion: CompanionSize,
    pub physics: PhysicsParams,
    pub rope: RopeParams,
    pub roll: RollParams,
    pub animation: AnimationParams,
    pub gaze: GazeParams,
    pub motion: MotionParams,
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Reject values the integrator can't stay stable with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let c = &self.companion;
        check(c.width > 0.0 && c.width.is_finite(), "companion.width", "must be positive")?;
        check(c.height > 0.0 && c.height.is_finite(), "companion.height", "must be positive")?;

        let p = &self.physics;
        check(p.gravity >= 0.0, "physics.gravity", "must be non-negative")?;
        check(unit_interval(p.air_resistance), "physics.air_resistance", "must be in (0, 1]")?;
        check(unit_interval(p.ground_friction), "physics.ground_friction", "must be in (0, 1]")?;
        check(
            (0.0..1.0).contains(&p.bounce_dampening),
            "physics.bounce_dampening",
            "must be in [0, 1)",
        )?;
        check(p.max_fall_speed > 0.0, "physics.max_fall_speed", "must be positive")?;
        check(p.max_speed > 0.0, "physics.max_speed", "must be positive")?;
        check(p.title_bar_height >= 0.0, "physics.title_bar_height", "must be non-negative")?;

        let r = &self.rope;
        check(r.length > 0.0 && r.length.is_finite(), "rope.length", "must be positive")?;
        check(r.gravity >= 0.0, "rope.gravity", "must be non-negative")?;
        check(r.damping > 0.0 && r.damping < 1.0, "rope.damping", "must be in (0, 1)")?;

        let roll = &self.roll;
        check(unit_interval(roll.friction), "roll.friction", "must be in (0, 1]")?;
        check(roll.grind_tolerance >= 0.0, "roll.grind_tolerance", "must be non-negative")?;

        check(
            self.animation.reaction_hold_ms > 0.0,
            "animation.reaction_hold_ms",
            "must be positive",
        )?;
        check(unit_interval(self.gaze.smoothing), "gaze.smoothing", "must be in (0, 1]")?;
        check(self.gaze.sensitivity_px > 0.0, "gaze.sensitivity_px", "must be positive")?;
        check(
            self.motion.walk_threshold >= 0.0
                && self.motion.run_threshold >= self.motion.walk_threshold,
            "motion.run_threshold",
            "must be at least walk_threshold",
        )?;
        Ok(())
    }
}

fn unit_interval(v: f32) -> bool {
    v > 0.0 && v <= 1.0
}

fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), SettingsError> {
    if ok {
        Ok(())
    } else {
        Err(SettingsError::Invalid { field, reason })
    }
}
