//! Skateboard rolling: friction-damped horizontal speed with tilt input,
//! tricks and grinding along a tracked surface (the navigation bar).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::clamp_axis;
use super::geometry::{Bounds, Position, Region};
use crate::settings::RollParams;
use crate::tick_scale;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollState {
    pub position: Position,
    pub speed: f32,
    pub is_grinding: bool,
    pub is_active: bool,
}

/// Tricks the board can throw. Purely advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trick {
    Kickflip,
    Ollie,
    Grind,
}

impl Trick {
    pub const ALL: [Trick; 3] = [Trick::Kickflip, Trick::Ollie, Trick::Grind];
}

#[derive(Debug, Clone)]
pub struct RollPhysics {
    state: RollState,
    surface: Option<Region>,
    params: RollParams,
}

impl RollPhysics {
    pub fn new(params: RollParams) -> Self {
        Self {
            state: RollState {
                position: Vec2::ZERO,
                speed: 0.0,
                is_grinding: false,
                is_active: false,
            },
            surface: None,
            params,
        }
    }

    pub fn start(&mut self, x: f32, y: f32, initial_speed: f32) {
        self.state = RollState {
            position: Vec2::new(x, y),
            speed: if initial_speed.is_finite() { initial_speed } else { 0.0 },
            is_grinding: false,
            is_active: true,
        };
        log::debug!("Roll started at ({x:.0}, {y:.0}), speed {:.2}", self.state.speed);
    }

    pub fn stop(&mut self) {
        self.state.is_active = false;
        self.state.is_grinding = false;
        self.state.speed = 0.0;
    }

    /// Advance one tick. `tilt` is the device lean in [-1, 1]-ish units.
    pub fn update(&mut self, delta_ms: f32, tilt: f32, bounds: Bounds, half_extents: Vec2, bounce: f32) {
        if !self.state.is_active {
            return;
        }
        let scale = tick_scale(delta_ms);
        let tilt = if tilt.is_finite() { tilt } else { 0.0 };
        let s = &mut self.state;

        s.speed += tilt * self.params.tilt_sensitivity;
        s.speed *= self.params.friction;
        let x = s.position.x + s.speed * scale;

        let (x, speed, _) = clamp_axis(x, s.speed, half_extents.x, bounds.width, bounce);
        let (y, _, _) = clamp_axis(s.position.y, 0.0, half_extents.y, bounds.height, 0.0);
        s.position = Vec2::new(x, y);
        s.speed = speed;

        self.state.is_grinding = self.on_surface(half_extents);
    }

    fn on_surface(&self, half_extents: Vec2) -> bool {
        let Some(surface) = &self.surface else {
            return false;
        };
        if surface.is_degenerate() {
            return false;
        }
        let p = self.state.position;
        let feet = p.y + half_extents.y;
        (feet - surface.y).abs() <= self.params.grind_tolerance
            && p.x >= surface.x
            && p.x <= surface.right()
    }

    /// Move the board and bring it to a stop. Ignored while inactive.
    pub fn place(&mut self, position: Position) {
        if self.state.is_active && position.is_finite() {
            self.state.position = position;
            self.state.speed = 0.0;
        }
    }

    /// Track the surface the board can grind on
    pub fn set_surface(&mut self, surface: Option<Region>) {
        self.surface = surface;
    }

    /// Pick a trick uniformly at random. Does not change the board's motion.
    pub fn perform_trick<R: Rng + ?Sized>(&self, rng: &mut R) -> Trick {
        Trick::ALL[rng.random_range(0..Trick::ALL.len())]
    }

    pub fn position(&self) -> Position {
        self.state.position
    }

    pub fn speed(&self) -> f32 {
        self.state.speed
    }

    pub fn is_grinding(&self) -> bool {
        self.state.is_grinding
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    pub fn state(&self) -> RollState {
        self.state
    }
}
