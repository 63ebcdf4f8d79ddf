//! Free-fall physics: gravity, friction, integration and collision
//!
//! Velocities are in pixels per nominal tick; `update` scales only the
//! position step by `delta / NOMINAL_TICK_MS`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{self, Resolution};
use super::geometry::{Bounds, Position, Region, Velocity};
use crate::settings::PhysicsParams;
use crate::tick_scale;

/// Roaming state owned by the physics core
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoamingState {
    pub position: Position,
    pub velocity: Velocity,
    pub is_grounded: bool,
    pub is_swinging: bool,
    pub rope_anchor: Option<Position>,
}

/// Walk direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Share of walk speed available while airborne
const AIR_CONTROL: f32 = 0.3;

#[derive(Debug, Clone)]
pub struct PhysicsCore {
    state: RoamingState,
    half_extents: Vec2,
    bounds: Bounds,
    regions: Vec<Region>,
    params: PhysicsParams,
    /// Region the companion stood on after the last resolution
    support: Option<usize>,
}

impl PhysicsCore {
    pub fn new(position: Position, half_extents: Vec2, bounds: Bounds, params: PhysicsParams) -> Self {
        Self {
            state: RoamingState {
                position,
                velocity: Vec2::ZERO,
                is_grounded: false,
                is_swinging: false,
                rope_anchor: None,
            },
            half_extents,
            bounds,
            regions: Vec::new(),
            params,
            support: None,
        }
    }

    /// Advance one tick
    pub fn update(&mut self, delta_ms: f32) {
        let scale = tick_scale(delta_ms);
        let p = &self.params;
        let mut vel = self.state.velocity;

        if !self.state.is_grounded {
            vel.y = (vel.y + p.gravity).min(p.max_fall_speed);
        }

        vel *= if self.state.is_grounded {
            p.ground_friction
        } else {
            p.air_resistance
        };
        vel = cap_speed(vel, p.max_speed);

        let pos = self.state.position + vel * scale;
        let res = collision::resolve(pos, vel, self.half_extents, self.bounds, &self.regions, p);
        self.adopt(res);
    }

    fn adopt(&mut self, res: Resolution) {
        self.state.position = res.position;
        self.state.velocity = res.velocity;
        self.state.is_grounded = res.grounded;
        self.support = res.support;
    }

    pub fn set_position(&mut self, position: Position) {
        self.state.position = sanitize(position, self.state.position);
    }

    pub fn position(&self) -> Position {
        self.state.position
    }

    /// Replace velocity. Leaving the ground requires an upward component.
    pub fn set_velocity(&mut self, velocity: Velocity) {
        self.state.velocity = cap_speed(sanitize(velocity, Vec2::ZERO), self.params.max_speed);
        if self.state.velocity.y < 0.0 {
            self.state.is_grounded = false;
        } else if self.state.is_grounded {
            self.state.velocity.y = 0.0;
        }
    }

    pub fn velocity(&self) -> Velocity {
        self.state.velocity
    }

    /// Add an impulse; takes effect at the next integration step.
    pub fn apply_force(&mut self, fx: f32, fy: f32) {
        let force = sanitize(Vec2::new(fx, fy), Vec2::ZERO);
        self.set_velocity(self.state.velocity + force);
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn update_regions(&mut self, regions: Vec<Region>) {
        self.regions = regions;
        self.support = None;
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Region currently stood on
    pub fn support(&self) -> Option<&Region> {
        self.support.and_then(|i| self.regions.get(i))
    }

    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    pub fn is_grounded(&self) -> bool {
        self.state.is_grounded
    }

    pub fn state(&self) -> RoamingState {
        self.state
    }

    /// Jump off the ground. No-op while airborne.
    pub fn jump(&mut self) {
        if self.state.is_grounded {
            self.state.velocity.y = self.params.jump_force;
            self.state.is_grounded = false;
        }
    }

    /// Walk on the ground, or steer a little while airborne
    pub fn walk(&mut self, direction: Direction) {
        let speed = direction.sign() * self.params.walk_speed;
        if self.state.is_grounded {
            self.state.velocity.x = speed;
        } else {
            self.state.velocity.x += speed * AIR_CONTROL;
        }
    }

    /// Hand position ownership to the rope
    pub fn begin_swing(&mut self, anchor: Position) {
        self.state.is_swinging = true;
        self.state.rope_anchor = Some(anchor);
        self.state.is_grounded = false;
        self.support = None;
    }

    /// Take position ownership back from the rope
    pub fn end_swing(&mut self) {
        self.state.is_swinging = false;
        self.state.rope_anchor = None;
    }

    pub fn is_swinging(&self) -> bool {
        self.state.is_swinging
    }

    /// Position a sub-simulation produced; the next `update` resolves it.
    pub fn follow(&mut self, position: Position) {
        self.state.position = sanitize(position, self.state.position);
        self.state.velocity = Vec2::ZERO;
        self.state.is_grounded = false;
    }
}

fn cap_speed(v: Vec2, max: f32) -> Vec2 {
    if v.length_squared() > max * max {
        v.normalize() * max
    } else {
        v
    }
}

/// Replace non-finite vectors so one bad sample can't poison the state
fn sanitize(v: Vec2, fallback: Vec2) -> Vec2 {
    if v.is_finite() { v } else { fallback }
}
