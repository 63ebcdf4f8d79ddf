//! Deterministic simulation module
//!
//! All companion logic lives here. This module must be pure and deterministic:
//! - Caller-supplied deltas only, no wall clock
//! - Seeded RNG only
//! - Regions resolved in list order
//! - No rendering or platform dependencies

pub mod animation;
pub mod collision;
pub mod controller;
pub mod geometry;
pub mod physics;
pub mod reaction;
pub mod roll;
pub mod rope;

pub use animation::{AnimationRuntime, AnimationSpec, PetState, StateMachine};
pub use collision::{CONTACT_EPSILON, Resolution, resolve};
pub use controller::{Command, Companion, Gesture, Snapshot};
pub use geometry::{Bounds, Position, Rect, Region, Velocity};
pub use physics::{Direction, PhysicsCore, RoamingState};
pub use reaction::{
    DomainEvent, Mood, PetPersonality, StreakStatus, event_to_state, preferred_reaction,
    streak_to_state, tap_reaction,
};
pub use roll::{RollPhysics, RollState, Trick};
pub use rope::{RopePhysics, RopeState};
