//! Animation states and the frame-timing state machine
//!
//! The machine only manages frame timing and completion; which state to be
//! in is always decided by the caller.

use serde::{Deserialize, Serialize};

use crate::sanitize_delta_ms;

/// Everything the companion can be animating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetState {
    // Idle
    #[default]
    IdleStand,
    IdleSit,
    IdleSleep,
    IdleLookAround,

    // Movement
    Walking,
    Running,
    Jumping,
    Falling,

    // Skateboard
    SkateboardRide,
    SkateboardKickflip,
    SkateboardOllie,
    SkateboardGrind,
    SkateboardCrash,

    // Rope
    RopeSwing,
    RopeHang,
    RopeClimb,
    RopeLaunch,

    // Emotions
    HappyDance,
    ExcitedBounce,
    SadSlump,
    WorkingTyping,
    Celebrating,
    Waving,

    // Special
    SurfingNotificationShade,
    HangingFromStatusBar,
}

impl PetState {
    pub const ALL: [PetState; 25] = [
        PetState::IdleStand,
        PetState::IdleSit,
        PetState::IdleSleep,
        PetState::IdleLookAround,
        PetState::Walking,
        PetState::Running,
        PetState::Jumping,
        PetState::Falling,
        PetState::SkateboardRide,
        PetState::SkateboardKickflip,
        PetState::SkateboardOllie,
        PetState::SkateboardGrind,
        PetState::SkateboardCrash,
        PetState::RopeSwing,
        PetState::RopeHang,
        PetState::RopeClimb,
        PetState::RopeLaunch,
        PetState::HappyDance,
        PetState::ExcitedBounce,
        PetState::SadSlump,
        PetState::WorkingTyping,
        PetState::Celebrating,
        PetState::Waving,
        PetState::SurfingNotificationShade,
        PetState::HangingFromStatusBar,
    ];

    /// Static playback parameters for this state
    pub const fn spec(self) -> AnimationSpec {
        use PetState::*;
        let (frame_count, frame_duration_ms, looping) = match self {
            IdleStand => (8, 100.0, true),
            IdleSit => (6, 150.0, true),
            IdleSleep => (4, 400.0, true),
            IdleLookAround => (10, 120.0, true),
            Walking => (6, 80.0, true),
            Running => (8, 60.0, true),
            Jumping => (6, 80.0, false),
            Falling => (4, 100.0, true),
            SkateboardRide => (8, 70.0, true),
            SkateboardKickflip => (10, 50.0, false),
            SkateboardOllie => (8, 60.0, false),
            SkateboardGrind => (6, 70.0, true),
            SkateboardCrash => (8, 80.0, false),
            RopeSwing => (8, 100.0, true),
            RopeHang => (4, 200.0, true),
            RopeClimb => (8, 90.0, true),
            RopeLaunch => (6, 60.0, false),
            HappyDance => (12, 80.0, false),
            ExcitedBounce => (10, 70.0, false),
            SadSlump => (8, 120.0, true),
            WorkingTyping => (6, 90.0, true),
            Celebrating => (16, 60.0, false),
            Waving => (8, 100.0, false),
            SurfingNotificationShade => (8, 90.0, true),
            HangingFromStatusBar => (4, 200.0, true),
        };
        AnimationSpec {
            state: self,
            frame_count,
            frame_duration_ms,
            looping,
        }
    }
}

/// Playback parameters for one state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub state: PetState,
    pub frame_count: u32,
    pub frame_duration_ms: f32,
    pub looping: bool,
}

/// Mutable playback position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationRuntime {
    pub current_state: PetState,
    pub current_frame: u32,
    /// Time accumulated toward the next frame
    pub time_in_state_ms: f32,
    /// A one-shot animation reached its last frame
    pub complete: bool,
}

impl Default for AnimationRuntime {
    fn default() -> Self {
        Self {
            current_state: PetState::IdleStand,
            current_frame: 0,
            time_in_state_ms: 0.0,
            complete: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    runtime: AnimationRuntime,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch state and restart playback. Re-entering the current state is a no-op.
    pub fn set_state(&mut self, new_state: PetState) -> bool {
        if new_state == self.runtime.current_state {
            return false;
        }
        log::debug!("Animation {:?} -> {:?}", self.runtime.current_state, new_state);
        self.runtime = AnimationRuntime {
            current_state: new_state,
            ..AnimationRuntime::default()
        };
        true
    }

    pub fn update(&mut self, delta_ms: f32) {
        let spec = self.spec();
        let rt = &mut self.runtime;
        rt.time_in_state_ms += sanitize_delta_ms(delta_ms);
        if rt.time_in_state_ms < spec.frame_duration_ms {
            return;
        }

        // Whole frames elapsed, taken in one step so huge deltas stay O(1)
        let elapsed = f64::from((rt.time_in_state_ms / spec.frame_duration_ms).floor());
        rt.time_in_state_ms %= spec.frame_duration_ms;
        if rt.complete {
            return;
        }

        let frame_count = f64::from(spec.frame_count);
        let target = f64::from(rt.current_frame) + elapsed;
        if target < frame_count {
            rt.current_frame = target as u32;
        } else if spec.looping {
            rt.current_frame = (target % frame_count) as u32;
        } else {
            rt.current_frame = spec.frame_count.saturating_sub(1);
            rt.complete = true;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.runtime.complete
    }

    pub fn current_state(&self) -> PetState {
        self.runtime.current_state
    }

    pub fn current_frame(&self) -> u32 {
        self.runtime.current_frame
    }

    pub fn time_in_state_ms(&self) -> f32 {
        self.runtime.time_in_state_ms
    }

    pub fn runtime(&self) -> AnimationRuntime {
        self.runtime
    }

    pub fn spec(&self) -> AnimationSpec {
        self.runtime.current_state.spec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let machine = StateMachine::new();
        assert_eq!(machine.current_state(), PetState::IdleStand);
        assert_eq!(machine.current_frame(), 0);
    }

    #[test]
    fn test_table_is_sane() {
        for state in PetState::ALL {
            let spec = state.spec();
            assert_eq!(spec.state, state);
            assert!(spec.frame_count > 0, "{state:?}");
            assert!(spec.frame_duration_ms > 0.0, "{state:?}");
        }
    }

    #[test]
    fn test_transition_resets_frame_and_time() {
        let mut machine = StateMachine::new();
        machine.set_state(PetState::Walking);
        machine.update(200.0);
        machine.update(30.0);
        assert!(machine.current_frame() > 0);
        assert!(machine.set_state(PetState::Running));
        assert_eq!(machine.current_frame(), 0);
        assert_eq!(machine.time_in_state_ms(), 0.0);
    }

    #[test]
    fn test_same_state_is_a_noop() {
        let mut machine = StateMachine::new();
        machine.set_state(PetState::WorkingTyping);
        machine.update(16.0);
        machine.update(16.0);
        let before = machine.runtime();
        assert!(!machine.set_state(PetState::WorkingTyping));
        assert_eq!(machine.runtime(), before);
        assert_eq!(machine.time_in_state_ms(), 32.0);
    }

    #[test]
    fn test_looping_wraps() {
        let mut machine = StateMachine::new();
        // IdleStand: 8 frames x 100ms
        for _ in 0..50 {
            machine.update(16.0);
        }
        // 800ms elapsed -> wrapped back to frame 0
        assert_eq!(machine.current_frame(), 0);
        assert!(!machine.is_complete());
        machine.update(16.0);
        machine.update(16.0);
        machine.update(16.0);
        machine.update(16.0);
        machine.update(16.0);
        machine.update(16.0);
        machine.update(16.0);
        assert_eq!(machine.current_frame(), 1);
    }

    #[test]
    fn test_one_shot_holds_last_frame() {
        let mut machine = StateMachine::new();
        machine.set_state(PetState::Waving);
        let spec = machine.spec();
        assert!(!spec.looping);
        for _ in 0..200 {
            machine.update(16.0);
            assert!(machine.current_frame() < spec.frame_count);
        }
        assert!(machine.is_complete());
        assert_eq!(machine.current_frame(), spec.frame_count - 1);
        machine.update(1000.0);
        assert!(machine.is_complete());
        assert_eq!(machine.current_frame(), spec.frame_count - 1);
    }

    #[test]
    fn test_leaving_a_completed_state_clears_completion() {
        let mut machine = StateMachine::new();
        machine.set_state(PetState::Jumping);
        for _ in 0..100 {
            machine.update(16.0);
        }
        assert!(machine.is_complete());
        machine.set_state(PetState::Falling);
        assert!(!machine.is_complete());
    }

    #[test]
    fn test_huge_delta_finishes_in_one_step() {
        let mut machine = StateMachine::new();
        machine.set_state(PetState::SkateboardKickflip);
        machine.update(2.0e9);
        assert!(machine.is_complete());
        assert_eq!(machine.current_frame(), machine.spec().frame_count - 1);
        assert!(machine.time_in_state_ms() < machine.spec().frame_duration_ms);

        machine.set_state(PetState::Running);
        machine.update(f32::MAX);
        assert!(machine.current_frame() < machine.spec().frame_count);
        assert!(machine.time_in_state_ms() < machine.spec().frame_duration_ms);
        machine.update(f32::MAX);
        assert!(machine.time_in_state_ms().is_finite());
    }

    #[test]
    fn test_multi_frame_delta_matches_small_steps() {
        let mut coarse = StateMachine::new();
        let mut fine = StateMachine::new();
        coarse.set_state(PetState::Walking);
        fine.set_state(PetState::Walking);
        // 6 frames x 80ms; 1040ms = 13 frames -> wraps to frame 1, 0ms left
        coarse.update(1040.0);
        for _ in 0..13 {
            fine.update(80.0);
        }
        assert_eq!(coarse.current_frame(), 1);
        assert_eq!(coarse.runtime(), fine.runtime());
    }

    #[test]
    fn test_bad_delta_counts_as_nominal_tick() {
        let mut a = StateMachine::new();
        let mut b = StateMachine::new();
        a.update(-1.0);
        b.update(16.0);
        assert_eq!(a.runtime(), b.runtime());
    }
}
