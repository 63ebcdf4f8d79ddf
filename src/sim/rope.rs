//! Pendulum swing from a fixed anchor (status bar / rope mechanic)
//!
//! While active the rope owns the companion's position: it is derived from
//! the angle each tick, never integrated. Angle 0 hangs straight down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Position, Velocity};
use crate::settings::RopeParams;
use crate::{normalize_angle, tick_scale};

/// Angular velocity below which a rope counts as hanging still
pub const HANG_THRESHOLD: f32 = 0.002;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RopeState {
    pub anchor: Position,
    pub length: f32,
    /// Radians from straight down, positive swings toward +x
    pub angle: f32,
    pub angular_velocity: f32,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct RopePhysics {
    state: RopeState,
    position: Position,
    params: RopeParams,
}

impl RopePhysics {
    pub fn new(params: RopeParams) -> Self {
        Self {
            state: RopeState {
                anchor: Vec2::ZERO,
                length: params.length,
                angle: 0.0,
                angular_velocity: 0.0,
                is_active: false,
            },
            position: Vec2::ZERO,
            params,
        }
    }

    /// Attach to `anchor`, starting from the companion's current position and
    /// carrying the tangential part of its velocity into the swing.
    pub fn attach(&mut self, anchor: Position, length: f32, from: Position, velocity: Velocity) {
        let length = if length.is_finite() && length > 0.0 {
            length
        } else {
            self.params.length
        };
        let offset = from - anchor;
        let angle = if offset.length_squared() > f32::EPSILON {
            offset.x.atan2(offset.y)
        } else {
            0.0
        };
        let angular_velocity = if velocity.is_finite() {
            velocity.dot(tangent(angle)) / length
        } else {
            0.0
        };

        self.state = RopeState {
            anchor,
            length,
            angle: normalize_angle(angle),
            angular_velocity,
            is_active: true,
        };
        self.position = self.derive_position();
        log::debug!(
            "Rope attached at ({:.0}, {:.0}), length {:.0}, angle {:.2}",
            anchor.x,
            anchor.y,
            length,
            self.state.angle
        );
    }

    /// Detach and return the linear launch velocity at the rope's end
    pub fn release(&mut self) -> Velocity {
        if !self.state.is_active {
            return Vec2::ZERO;
        }
        self.state.is_active = false;
        let velocity = tangent(self.state.angle) * self.state.angular_velocity * self.state.length;
        log::debug!("Rope released, launch velocity ({:.2}, {:.2})", velocity.x, velocity.y);
        velocity
    }

    pub fn update(&mut self, delta_ms: f32) {
        if !self.state.is_active {
            return;
        }
        let scale = tick_scale(delta_ms);
        let s = &mut self.state;

        let angular_acceleration = -(self.params.gravity / s.length) * s.angle.sin();
        s.angular_velocity += angular_acceleration * scale;
        s.angular_velocity *= self.params.damping;
        s.angle = normalize_angle(s.angle + s.angular_velocity * scale);

        self.position = self.derive_position();
    }

    /// Push the swing, e.g. from a drag gesture
    pub fn apply_force(&mut self, force: f32) {
        if self.state.is_active && force.is_finite() {
            self.state.angular_velocity += force;
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> RopeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    /// Barely moving at the bottom of the arc
    pub fn is_hanging(&self) -> bool {
        self.state.angular_velocity.abs() < HANG_THRESHOLD && self.state.angle.abs() < 0.05
    }

    fn derive_position(&self) -> Position {
        let s = &self.state;
        let position = s.anchor + Vec2::new(s.angle.sin(), s.angle.cos()) * s.length;
        // Re-clamp against drift every tick
        let offset = position - s.anchor;
        let distance = offset.length();
        if distance > s.length {
            s.anchor + offset * (s.length / distance)
        } else {
            position
        }
    }
}

/// Unit direction of motion for increasing angle
fn tangent(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), -angle.sin())
}
