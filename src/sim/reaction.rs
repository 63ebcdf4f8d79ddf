//! Mapping from external signals (editor, agent/CI, commit streaks) to reactions
//!
//! Both tables are exhaustive `match`es with no wildcard arm: adding an event
//! variant without a reaction is a compile error.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::animation::PetState;

/// Discrete events delivered by the host's transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    // Editor activity
    Typing,
    Idle,
    Saved,
    ErrorCountChanged { count: u32 },
    DebugStarted,
    DebugStopped,
    GitPushed,
    GitPulled,

    // Agent / CI activity
    AgentStartsWorking,
    AgentOpensPr,
    AgentNeedsReview,
    AgentPrMerged,
    AgentStuckError,
    CiPassing,
    CiFailing,
    CommitPushed,
    IssueOpened,
    IssueClosed,
}

/// Commit streak status, derived from activity history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakStatus {
    Alive,
    AtRisk,
    Broken,
    NewMilestone,
}

/// Streak length that counts as a milestone
pub const STREAK_MILESTONE_DAYS: u32 = 30;
/// Local hour after which a day without a commit puts the streak at risk
pub const STREAK_RISK_HOUR: u8 = 18;

impl StreakStatus {
    /// Classify a streak. `hour_of_day` is local time, 0-23.
    pub fn derive(streak_days: u32, committed_today: bool, hour_of_day: u8) -> Self {
        if streak_days == 0 {
            StreakStatus::Broken
        } else if streak_days >= STREAK_MILESTONE_DAYS {
            StreakStatus::NewMilestone
        } else if !committed_today && hour_of_day >= STREAK_RISK_HOUR {
            StreakStatus::AtRisk
        } else {
            StreakStatus::Alive
        }
    }
}

pub fn event_to_state(event: DomainEvent) -> PetState {
    match event {
        DomainEvent::Typing => PetState::WorkingTyping,
        DomainEvent::Idle => PetState::IdleSleep,
        DomainEvent::Saved => PetState::Waving,
        DomainEvent::ErrorCountChanged { count: 0 } => PetState::HappyDance,
        DomainEvent::ErrorCountChanged { .. } => PetState::SadSlump,
        DomainEvent::DebugStarted => PetState::IdleLookAround,
        DomainEvent::DebugStopped => PetState::IdleStand,
        DomainEvent::GitPushed => PetState::HappyDance,
        DomainEvent::GitPulled => PetState::Waving,

        DomainEvent::AgentStartsWorking => PetState::WorkingTyping,
        DomainEvent::AgentOpensPr => PetState::HappyDance,
        DomainEvent::AgentNeedsReview => PetState::Waving,
        DomainEvent::AgentPrMerged => PetState::Celebrating,
        DomainEvent::AgentStuckError => PetState::SadSlump,
        DomainEvent::CiPassing => PetState::ExcitedBounce,
        DomainEvent::CiFailing => PetState::SadSlump,
        DomainEvent::CommitPushed => PetState::HappyDance,
        DomainEvent::IssueOpened => PetState::WorkingTyping,
        DomainEvent::IssueClosed => PetState::Celebrating,
    }
}

pub fn streak_to_state(status: StreakStatus) -> PetState {
    match status {
        StreakStatus::Alive => PetState::HappyDance,
        // Trying to get attention
        StreakStatus::AtRisk => PetState::Waving,
        StreakStatus::Broken => PetState::SadSlump,
        StreakStatus::NewMilestone => PetState::Celebrating,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Ecstatic,
    Happy,
    #[default]
    Content,
    Hungry,
    Sad,
    Sleepy,
    Excited,
}

/// Companion status maintained by the host; read-only here
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetPersonality {
    pub mood: Mood,
    /// 0-100
    pub energy: f32,
    /// 0-100, grows as the commit streak lapses
    pub hunger: f32,
    /// Total contributions
    pub experience: u32,
    pub level: u32,
}

impl Default for PetPersonality {
    fn default() -> Self {
        Self {
            mood: Mood::Content,
            energy: 100.0,
            hunger: 0.0,
            experience: 0,
            level: 1,
        }
    }
}

/// Below this energy the companion skips the energetic reactions
pub const LOW_ENERGY: f32 = 20.0;

impl PetPersonality {
    pub fn is_tired(&self) -> bool {
        self.energy < LOW_ENERGY
    }
}

fn is_energetic(state: PetState) -> bool {
    matches!(
        state,
        PetState::HappyDance | PetState::Celebrating | PetState::ExcitedBounce | PetState::Jumping
    )
}

/// Adjust a mapped reaction to the companion's current condition
pub fn preferred_reaction(target: PetState, personality: &PetPersonality) -> PetState {
    if !is_energetic(target) {
        return target;
    }
    if personality.mood == Mood::Sleepy {
        PetState::IdleSit
    } else if personality.is_tired() {
        PetState::Waving
    } else {
        target
    }
}

/// Candidate reactions to a tap
pub const TAP_REACTIONS: [PetState; 3] =
    [PetState::Waving, PetState::Jumping, PetState::ExcitedBounce];

/// Pick a tap reaction. Tired companions only wave.
pub fn tap_reaction<R: Rng + ?Sized>(personality: &PetPersonality, rng: &mut R) -> PetState {
    if personality.is_tired() || personality.mood == Mood::Sleepy {
        return PetState::Waving;
    }
    TAP_REACTIONS[rng.random_range(0..TAP_REACTIONS.len())]
}
