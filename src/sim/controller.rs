//! Companion controller: the composition root
//!
//! Owns every sub-simulation and is the only thing that mutates them. Inputs
//! arrive as [`Command`]s, are queued, and are applied at the start of the
//! next [`Companion::tick`]. Rendering reads a [`Snapshot`].

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::{PetState, StateMachine};
use super::collision::clamp_to_screen;
use super::geometry::{Bounds, Position, Region};
use super::physics::PhysicsCore;
use super::reaction::{
    DomainEvent, PetPersonality, StreakStatus, event_to_state, preferred_reaction,
    streak_to_state, tap_reaction,
};
use super::roll::{RollPhysics, Trick};
use super::rope::RopePhysics;
use crate::consts::{NOMINAL_TICK_MS, ROLL_DEFAULT_SPEED};
use crate::sanitize_delta_ms;
use crate::settings::Settings;

/// Discrete gestures recognized by the host's input layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Gesture {
    Tap,
    DoubleTap,
    LongPress,
    /// Pointer moved by (dx, dy) pixels since the last drag sample
    Drag { dx: f32, dy: f32 },
    /// Release velocity in pixels per second
    Fling { vx: f32, vy: f32 },
}

fn default_roll_speed() -> f32 {
    ROLL_DEFAULT_SPEED
}

/// Everything a collaborator can ask of the companion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "args", rename_all = "snake_case")]
pub enum Command {
    SetPetState(PetState),
    UpdatePosition {
        x: f32,
        y: f32,
    },
    ApplyForce {
        fx: f32,
        fy: f32,
    },
    AttachRope {
        anchor: Position,
        #[serde(default)]
        length: Option<f32>,
    },
    ReleaseRope,
    StartRoll {
        x: f32,
        y: f32,
        #[serde(default = "default_roll_speed")]
        speed: f32,
    },
    StopRoll,
    Gesture(Gesture),
    Event(DomainEvent),
    Streak(StreakStatus),
    Regions(Vec<Region>),
    GrindSurface(Option<Region>),
    Resize(Bounds),
    Pointer {
        x: f32,
        y: f32,
    },
    Tilt(f32),
    Personality(PetPersonality),
}

/// Read-only view handed to the renderer once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub position: Position,
    pub state: PetState,
    pub frame: u32,
    /// Eye offset toward the pointer, each axis in [-1, 1]
    pub gaze: Vec2,
}

#[derive(Debug, Clone)]
pub struct Companion {
    settings: Settings,
    physics: PhysicsCore,
    rope: RopePhysics,
    roll: RollPhysics,
    animation: StateMachine,
    personality: PetPersonality,
    rng: Pcg32,
    pending: VecDeque<Command>,
    /// Clock time at which a held reaction reverts to idle
    reaction_deadline: Option<f64>,
    /// Milliseconds since creation; f64 so days of uptime keep 16ms resolution
    clock_ms: f64,
    ticks: u64,
    pointer: Option<Position>,
    gaze: Vec2,
    tilt: f32,
}

impl Companion {
    pub fn new(settings: Settings, bounds: Bounds, position: Position) -> Self {
        let physics = PhysicsCore::new(
            position,
            settings.companion.half_extents(),
            bounds,
            settings.physics,
        );
        log::info!(
            "Companion created at ({:.0}, {:.0}) on {}x{} screen, seed {}",
            position.x,
            position.y,
            bounds.width,
            bounds.height,
            settings.seed
        );
        Self {
            physics,
            rope: RopePhysics::new(settings.rope),
            roll: RollPhysics::new(settings.roll),
            animation: StateMachine::new(),
            personality: PetPersonality::default(),
            rng: Pcg32::seed_from_u64(settings.seed),
            pending: VecDeque::new(),
            reaction_deadline: None,
            clock_ms: 0.0,
            ticks: 0,
            pointer: None,
            gaze: Vec2::ZERO,
            tilt: 0.0,
            settings,
        }
    }

    // --- Command surface; everything is applied on the next tick ---

    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    pub fn set_pet_state(&mut self, state: PetState) {
        self.push(Command::SetPetState(state));
    }

    pub fn update_position(&mut self, x: f32, y: f32) {
        self.push(Command::UpdatePosition { x, y });
    }

    pub fn apply_force(&mut self, fx: f32, fy: f32) {
        self.push(Command::ApplyForce { fx, fy });
    }

    pub fn attach_rope(&mut self, anchor: Position) {
        self.push(Command::AttachRope {
            anchor,
            length: None,
        });
    }

    pub fn release_rope(&mut self) {
        self.push(Command::ReleaseRope);
    }

    pub fn start_roll(&mut self, x: f32, y: f32, speed: f32) {
        self.push(Command::StartRoll { x, y, speed });
    }

    pub fn stop_roll(&mut self) {
        self.push(Command::StopRoll);
    }

    /// Advance the whole companion by one tick
    pub fn tick(&mut self, delta_ms: f32) {
        while let Some(command) = self.pending.pop_front() {
            self.apply(command);
        }

        let delta_ms = sanitize_delta_ms(delta_ms);
        self.clock_ms += f64::from(delta_ms);
        self.ticks += 1;

        if self
            .reaction_deadline
            .is_some_and(|deadline| self.clock_ms >= deadline)
        {
            log::debug!("Reaction {:?} expired", self.animation.current_state());
            self.enter(PetState::IdleStand);
        }

        if self.rope.is_active() {
            self.rope.update(delta_ms);
            self.follow_on_screen(self.rope.position());
        } else if self.roll.is_active() {
            let bounce = self.settings.physics.bounce_dampening;
            self.roll.update(
                delta_ms,
                self.tilt,
                self.physics.bounds(),
                self.physics.half_extents(),
                bounce,
            );
            self.follow_on_screen(self.roll.position());
        } else {
            self.physics.update(delta_ms);
        }

        // The launch flourish plays out before motion takes over again
        let launching = self.animation.current_state() == PetState::RopeLaunch
            && !self.animation.is_complete();
        if self.reaction_deadline.is_none() && !launching {
            let state = self.motion_state();
            self.enter(state);
        }

        self.update_gaze();
        self.animation.update(delta_ms);

        if self.ticks % 600 == 0 {
            log::trace!("Tick {}: {:?}", self.ticks, self.snapshot());
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            position: self.physics.position(),
            state: self.animation.current_state(),
            frame: self.animation.current_frame(),
            gaze: self.gaze,
        }
    }

    fn apply(&mut self, command: Command) {
        log::debug!("Applying {command:?}");
        match command {
            Command::SetPetState(state) => self.react(state),
            Command::UpdatePosition { x, y } => self.move_to(Vec2::new(x, y)),
            Command::ApplyForce { fx, fy } => self.push_body(fx, fy),
            Command::AttachRope { anchor, length } => self.begin_rope(anchor, length),
            Command::ReleaseRope => self.end_rope(),
            Command::StartRoll { x, y, speed } => self.begin_roll(x, y, speed),
            Command::StopRoll => self.end_roll(),
            Command::Gesture(gesture) => self.gesture(gesture),
            Command::Event(event) => {
                let state = preferred_reaction(event_to_state(event), &self.personality);
                self.react(state);
            }
            Command::Streak(status) => {
                let state = preferred_reaction(streak_to_state(status), &self.personality);
                self.react(state);
            }
            Command::Regions(regions) => self.physics.update_regions(regions),
            Command::GrindSurface(surface) => self.roll.set_surface(surface),
            Command::Resize(bounds) => {
                log::info!("Screen resized to {}x{}", bounds.width, bounds.height);
                self.physics.set_bounds(bounds);
            }
            Command::Pointer { x, y } => {
                let pointer = Vec2::new(x, y);
                if pointer.is_finite() {
                    self.pointer = Some(pointer);
                }
            }
            Command::Tilt(tilt) => self.tilt = if tilt.is_finite() { tilt } else { 0.0 },
            Command::Personality(personality) => self.personality = personality,
        }
    }

    /// Enter a state and hold it for the reaction period
    fn react(&mut self, state: PetState) {
        self.animation.set_state(state);
        let hold = f64::from(self.settings.animation.reaction_hold_ms);
        self.reaction_deadline = Some(self.clock_ms + hold);
    }

    /// Enter a state with no hold; drops any pending reversion
    fn enter(&mut self, state: PetState) {
        self.animation.set_state(state);
        self.reaction_deadline = None;
    }

    fn push_body(&mut self, fx: f32, fy: f32) {
        if self.rope.is_active() {
            let length = self.rope.state().length;
            self.rope.apply_force(fx / length);
        } else {
            self.physics.apply_force(fx, fy);
        }
    }

    fn begin_rope(&mut self, anchor: Position, length: Option<f32>) {
        if !anchor.is_finite() {
            log::warn!("Ignoring rope attach to non-finite anchor");
            return;
        }
        if self.roll.is_active() {
            self.roll.stop();
        }
        let length = length.unwrap_or(self.settings.rope.length);
        self.rope
            .attach(anchor, length, self.physics.position(), self.physics.velocity());
        self.physics.begin_swing(anchor);
        self.follow_on_screen(self.rope.position());
        self.enter(PetState::RopeSwing);
    }

    fn end_rope(&mut self) {
        if !self.rope.is_active() {
            return;
        }
        let launch = self.rope.release();
        self.physics.end_swing();
        self.physics.set_velocity(launch);
        self.enter(PetState::RopeLaunch);
    }

    fn begin_roll(&mut self, x: f32, y: f32, speed: f32) {
        if self.rope.is_active() {
            self.end_rope();
        }
        self.roll.start(x, y, speed);
        self.follow_on_screen(self.roll.position());
        self.enter(PetState::SkateboardRide);
    }

    fn end_roll(&mut self) {
        if !self.roll.is_active() {
            return;
        }
        let speed = self.roll.speed();
        self.roll.stop();
        self.physics.set_velocity(Vec2::new(speed, 0.0));
    }

    /// Put the companion at `target` and stop it, in whichever sub-simulation owns position
    fn move_to(&mut self, target: Position) {
        if !target.is_finite() {
            return;
        }
        if self.rope.is_active() {
            let rope = self.rope.state();
            self.rope.attach(rope.anchor, rope.length, target, Vec2::ZERO);
            self.follow_on_screen(self.rope.position());
        } else if self.roll.is_active() {
            self.roll.place(target);
            self.follow_on_screen(self.roll.position());
        } else {
            self.physics.follow(target);
        }
    }

    /// Sub-simulation positions are shown clamped to the screen
    fn follow_on_screen(&mut self, position: Position) {
        let clamped =
            clamp_to_screen(position, self.physics.half_extents(), self.physics.bounds());
        self.physics.follow(clamped);
    }

    fn gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Tap => {
                let state = if self.roll.is_active() {
                    match self.roll.perform_trick(&mut self.rng) {
                        Trick::Kickflip => PetState::SkateboardKickflip,
                        Trick::Ollie => PetState::SkateboardOllie,
                        Trick::Grind => PetState::SkateboardGrind,
                    }
                } else {
                    tap_reaction(&self.personality, &mut self.rng)
                };
                self.react(state);
            }
            Gesture::DoubleTap => self.react(PetState::HappyDance),
            Gesture::LongPress => self.react(PetState::Celebrating),
            Gesture::Drag { dx, dy } => {
                if self.rope.is_active() {
                    self.push_body(dx, 0.0);
                } else {
                    let offset = Vec2::new(dx, dy);
                    if offset.is_finite() {
                        self.move_to(self.physics.position() + offset);
                    }
                }
            }
            Gesture::Fling { vx, vy } => {
                // px/s -> px per nominal tick
                let per_tick = NOMINAL_TICK_MS / 1000.0;
                self.push_body(vx * per_tick, vy * per_tick);
            }
        }
    }

    /// Animation implied by how the companion is currently moving
    fn motion_state(&self) -> PetState {
        if self.rope.is_active() {
            return if self.rope.is_hanging() {
                PetState::RopeHang
            } else {
                PetState::RopeSwing
            };
        }
        if self.roll.is_active() {
            return if self.roll.is_grinding() {
                PetState::SkateboardGrind
            } else {
                PetState::SkateboardRide
            };
        }

        let velocity = self.physics.velocity();
        if !self.physics.is_grounded() {
            return if velocity.y < 0.0 {
                PetState::Jumping
            } else {
                PetState::Falling
            };
        }

        let motion = &self.settings.motion;
        let speed = velocity.x.abs();
        if speed >= motion.run_threshold {
            PetState::Running
        } else if speed >= motion.walk_threshold {
            PetState::Walking
        } else {
            PetState::IdleStand
        }
    }

    fn update_gaze(&mut self) {
        let gaze = &self.settings.gaze;
        let target = match self.pointer {
            Some(pointer) => {
                let offset = (pointer - self.physics.position()) / gaze.sensitivity_px;
                offset.clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
            }
            None => Vec2::ZERO,
        };
        self.gaze += (target - self.gaze) * gaze.smoothing;
    }

    // --- Accessors ---

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn physics(&self) -> &PhysicsCore {
        &self.physics
    }

    pub fn rope(&self) -> &RopePhysics {
        &self.rope
    }

    pub fn roll(&self) -> &RollPhysics {
        &self.roll
    }

    pub fn animation(&self) -> &StateMachine {
        &self.animation
    }

    pub fn personality(&self) -> &PetPersonality {
        &self.personality
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Commands waiting for the next tick
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Whether a reaction is being held
    pub fn is_reacting(&self) -> bool {
        self.reaction_deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn companion() -> Companion {
        let mut settings = Settings::default();
        settings.companion.width = 100.0;
        settings.companion.height = 100.0;
        Companion::new(settings, Bounds::new(800.0, 600.0), Vec2::new(400.0, 100.0))
    }

    fn settle(pet: &mut Companion) {
        for _ in 0..300 {
            pet.tick(16.0);
        }
    }

    #[test]
    fn test_falls_then_idles_on_floor() {
        let mut pet = companion();
        pet.tick(16.0);
        assert_eq!(pet.snapshot().state, PetState::Falling);
        settle(&mut pet);
        assert!(pet.physics().is_grounded());
        assert_eq!(pet.snapshot().position, Vec2::new(400.0, 550.0));
        assert_eq!(pet.snapshot().state, PetState::IdleStand);
    }

    #[test]
    fn test_commands_wait_for_next_tick() {
        let mut pet = companion();
        pet.set_pet_state(PetState::Waving);
        pet.apply_force(5.0, 0.0);
        assert_eq!(pet.pending(), 2);
        assert_eq!(pet.snapshot().state, PetState::IdleStand);
        assert_eq!(pet.physics().velocity(), Vec2::ZERO);
        pet.tick(16.0);
        assert_eq!(pet.pending(), 0);
        assert_eq!(pet.snapshot().state, PetState::Waving);
        assert!(pet.physics().velocity().x > 0.0);
    }

    #[test]
    fn test_reaction_reverts_after_hold() {
        let mut pet = companion();
        settle(&mut pet);
        pet.push(Command::Event(DomainEvent::CiFailing));
        pet.tick(16.0);
        assert_eq!(pet.snapshot().state, PetState::SadSlump);
        assert!(pet.is_reacting());
        // 2000ms hold
        for _ in 0..100 {
            pet.tick(16.0);
        }
        assert_eq!(pet.snapshot().state, PetState::SadSlump);
        for _ in 0..30 {
            pet.tick(16.0);
        }
        assert!(!pet.is_reacting());
        assert_eq!(pet.snapshot().state, PetState::IdleStand);
    }

    #[test]
    fn test_new_state_overwrites_pending_reversion() {
        let mut pet = companion();
        settle(&mut pet);
        pet.set_pet_state(PetState::Celebrating);
        pet.tick(16.0);
        assert!(pet.is_reacting());
        pet.attach_rope(Vec2::new(400.0, 300.0));
        pet.tick(16.0);
        assert!(!pet.is_reacting());
        assert!(matches!(
            pet.snapshot().state,
            PetState::RopeSwing | PetState::RopeHang
        ));
    }

    #[test]
    fn test_tired_companion_waves_instead_of_celebrating() {
        let mut pet = companion();
        pet.push(Command::Personality(PetPersonality {
            energy: 10.0,
            ..PetPersonality::default()
        }));
        pet.push(Command::Event(DomainEvent::AgentPrMerged));
        pet.tick(16.0);
        assert_eq!(pet.snapshot().state, PetState::Waving);
    }

    #[test]
    fn test_streak_status_reaction() {
        let mut pet = companion();
        pet.push(Command::Streak(StreakStatus::NewMilestone));
        pet.tick(16.0);
        assert_eq!(pet.snapshot().state, PetState::Celebrating);
    }

    #[test]
    fn test_rope_owns_position_while_attached() {
        let mut pet = companion();
        settle(&mut pet);
        let anchor = Vec2::new(300.0, 350.0);
        pet.push(Command::AttachRope {
            anchor,
            length: Some(150.0),
        });
        for _ in 0..120 {
            pet.tick(16.0);
            let d = pet.snapshot().position.distance(anchor);
            assert!(d <= 150.0 + 1e-2, "distance {d}");
            assert!(pet.physics().is_swinging());
        }
    }

    #[test]
    fn test_release_launches_with_rope_velocity() {
        let mut pet = companion();
        let anchor = Vec2::new(400.0, 0.0);
        pet.push(Command::AttachRope {
            anchor,
            length: Some(100.0),
        });
        pet.tick(16.0);
        pet.apply_force(5.0, 0.0);
        pet.tick(16.0);
        pet.release_rope();
        pet.tick(16.0);
        assert!(!pet.rope().is_active());
        assert!(!pet.physics().is_swinging());
        assert!(pet.physics().velocity().x > 0.0);
        assert_eq!(pet.snapshot().state, PetState::RopeLaunch);
        for _ in 0..40 {
            pet.tick(16.0);
        }
        assert_ne!(pet.snapshot().state, PetState::RopeLaunch);
    }

    #[test]
    fn test_roll_then_stop_hands_speed_to_physics() {
        let mut pet = companion();
        pet.start_roll(200.0, 550.0, 6.0);
        pet.tick(16.0);
        assert_eq!(pet.snapshot().state, PetState::SkateboardRide);
        assert!(pet.snapshot().position.x > 200.0);
        pet.stop_roll();
        pet.tick(16.0);
        assert!(!pet.roll().is_active());
        assert!(pet.physics().velocity().x > 0.0);
    }

    #[test]
    fn test_roll_grinds_on_surface() {
        let mut pet = companion();
        pet.push(Command::GrindSurface(Some(
            Region::new(0.0, 560.0, 800.0, 40.0).with_label("navigation_bar"),
        )));
        pet.start_roll(200.0, 510.0, 3.0);
        pet.tick(16.0);
        assert_eq!(pet.snapshot().state, PetState::SkateboardGrind);
    }

    #[test]
    fn test_tap_while_rolling_throws_a_trick() {
        let mut pet = companion();
        pet.start_roll(200.0, 550.0, 3.0);
        pet.push(Command::Gesture(Gesture::Tap));
        pet.tick(16.0);
        assert!(matches!(
            pet.snapshot().state,
            PetState::SkateboardKickflip | PetState::SkateboardOllie | PetState::SkateboardGrind
        ));
    }

    #[test]
    fn test_drag_moves_and_stops() {
        let mut pet = companion();
        pet.apply_force(10.0, 0.0);
        pet.tick(16.0);
        let before = pet.snapshot().position;
        pet.push(Command::Gesture(Gesture::Drag { dx: 50.0, dy: 20.0 }));
        pet.tick(16.0);
        let after = pet.snapshot().position;
        // One tick of gravity from rest after the move
        assert!((after.x - (before.x + 50.0)).abs() < 1e-3);
        assert!(after.y > before.y + 20.0);
    }

    #[test]
    fn test_fling_converts_pixels_per_second() {
        let mut pet = companion();
        settle(&mut pet);
        pet.push(Command::Gesture(Gesture::Fling { vx: 1000.0, vy: -1000.0 }));
        pet.tick(16.0);
        assert!(!pet.physics().is_grounded());
        assert!(pet.physics().velocity().x > 10.0);
        assert_eq!(pet.snapshot().state, PetState::Jumping);
    }

    #[test]
    fn test_lands_on_window_region() {
        let mut pet = companion();
        pet.push(Command::Regions(vec![Region::new(300.0, 300.0, 200.0, 200.0)]));
        settle(&mut pet);
        assert!(pet.physics().is_grounded());
        assert_eq!(pet.snapshot().position.y, 250.0);
    }

    #[test]
    fn test_gaze_follows_pointer_smoothly() {
        let mut pet = companion();
        pet.push(Command::Pointer { x: 2000.0, y: 100.0 });
        pet.tick(16.0);
        let first = pet.snapshot().gaze;
        assert!(first.x > 0.0 && first.x < 1.0);
        for _ in 0..200 {
            pet.tick(16.0);
        }
        let gaze = pet.snapshot().gaze;
        assert!(gaze.x > first.x && gaze.x <= 1.0);
        assert!(gaze.y.abs() <= 1.0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let script = |pet: &mut Companion| {
            let mut out = Vec::new();
            pet.start_roll(300.0, 550.0, 4.0);
            for i in 0..60 {
                if i % 10 == 0 {
                    pet.push(Command::Gesture(Gesture::Tap));
                }
                pet.tick(16.0);
                out.push(pet.snapshot());
            }
            out
        };
        let mut a = companion();
        let mut b = companion();
        assert_eq!(script(&mut a), script(&mut b));
    }

    #[test]
    fn test_commands_parse_from_json() {
        let command: Command =
            serde_json::from_str(r#"{ "type": "start_roll", "args": { "x": 10.0, "y": 20.0 } }"#)
                .unwrap();
        assert_eq!(
            command,
            Command::StartRoll {
                x: 10.0,
                y: 20.0,
                speed: ROLL_DEFAULT_SPEED
            }
        );
        let command: Command = serde_json::from_str(
            r#"{ "type": "event", "args": { "type": "ci_failing" } }"#,
        )
        .unwrap();
        assert_eq!(command, Command::Event(DomainEvent::CiFailing));
        let command: Command = serde_json::from_str(r#"{ "type": "release_rope" }"#).unwrap();
        assert_eq!(command, Command::ReleaseRope);
    }

    fn on_screen(pet: &Companion) -> bool {
        let p = pet.snapshot().position;
        let (w, h) = (800.0, 600.0);
        p.x - 50.0 >= -1e-3 && p.x + 50.0 <= w + 1e-3 && p.y - 50.0 >= -1e-3 && p.y + 50.0 <= h + 1e-3
    }

    #[test]
    fn test_reaction_still_expires_after_days_of_uptime() {
        let mut pet = companion();
        settle(&mut pet);
        // 2^28 ms, about 74.6 hours
        pet.clock_ms = 268_435_456.0;
        pet.push(Command::Event(DomainEvent::CiFailing));
        pet.tick(16.0);
        assert_eq!(pet.snapshot().state, PetState::SadSlump);
        let start = pet.clock_ms();
        for _ in 0..130 {
            pet.tick(16.0);
        }
        assert_eq!(pet.clock_ms(), start + 130.0 * 16.0);
        assert!(!pet.is_reacting());
        assert_eq!(pet.snapshot().state, PetState::IdleStand);
    }

    #[test]
    fn test_board_started_above_screen_is_pulled_on() {
        let mut pet = companion();
        pet.start_roll(400.0, 10.0, 0.0);
        pet.tick(16.0);
        assert_eq!(pet.snapshot().position, Vec2::new(400.0, 50.0));
        assert!(on_screen(&pet));
    }

    #[test]
    fn test_rope_below_screen_is_shown_on_screen() {
        let mut pet = companion();
        settle(&mut pet);
        pet.push(Command::AttachRope {
            anchor: Vec2::new(400.0, 300.0),
            length: Some(500.0),
        });
        pet.tick(16.0);
        assert!(pet.rope().is_active());
        assert!(pet.rope().position().y > 600.0);
        assert_eq!(pet.snapshot().position.y, 550.0);
    }

    #[test]
    fn test_update_position_moves_the_board() {
        let mut pet = companion();
        pet.start_roll(200.0, 550.0, 5.0);
        pet.tick(16.0);
        pet.update_position(600.0, 550.0);
        pet.tick(16.0);
        assert!(pet.roll().is_active());
        assert_eq!(pet.snapshot().position, Vec2::new(600.0, 550.0));
        assert_eq!(pet.roll().speed(), 0.0);
    }

    #[test]
    fn test_drag_moves_the_board() {
        let mut pet = companion();
        pet.start_roll(200.0, 550.0, 0.0);
        pet.tick(16.0);
        pet.push(Command::Gesture(Gesture::Drag { dx: 30.0, dy: 0.0 }));
        pet.tick(16.0);
        assert!(pet.roll().is_active());
        assert_eq!(pet.snapshot().position.x, 230.0);
    }

    #[test]
    fn test_update_position_swings_the_rope_from_there() {
        let mut pet = companion();
        pet.push(Command::AttachRope {
            anchor: Vec2::new(400.0, 0.0),
            length: Some(100.0),
        });
        pet.tick(16.0);
        pet.update_position(500.0, 0.0);
        pet.tick(16.0);
        assert!(pet.rope().is_active());
        assert!(pet.rope().state().angle > 1.0);
        assert!(pet.snapshot().position.x > 450.0);
    }

    proptest! {
        #[test]
        fn prop_box_stays_on_screen_on_rope_and_board(
            ax in -200.0f32..1000.0,
            ay in -200.0f32..300.0,
            length in 10.0f32..900.0,
            push in -50.0f32..50.0,
            rx in -300.0f32..1100.0,
            ry in -300.0f32..900.0,
            speed in -40.0f32..40.0,
            tilt in -3.0f32..3.0,
        ) {
            let mut pet = companion();
            pet.push(Command::AttachRope { anchor: Vec2::new(ax, ay), length: Some(length) });
            pet.apply_force(push, 0.0);
            for _ in 0..60 {
                pet.tick(16.0);
                prop_assert!(on_screen(&pet), "rope: {:?}", pet.snapshot().position);
            }
            pet.push(Command::Tilt(tilt));
            pet.start_roll(rx, ry, speed);
            for _ in 0..60 {
                pet.tick(16.0);
                prop_assert!(on_screen(&pet), "board: {:?}", pet.snapshot().position);
            }
            pet.stop_roll();
            for _ in 0..30 {
                pet.tick(16.0);
                prop_assert!(on_screen(&pet), "free: {:?}", pet.snapshot().position);
            }
        }
    }
}
