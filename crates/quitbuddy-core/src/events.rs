use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::day_log::DayStatus;
use crate::intervention::{BreathPhase, Technique};
use crate::profile::{MascotMood, MascotStage};

/// Every state change in the system produces an Event.
/// Collaborators either read the returned event or subscribe to the
/// [`crate::AppState`] listener list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    OnboardingCompleted {
        profile_id: String,
        quit_date: NaiveDate,
        at: DateTime<Utc>,
    },
    ProfileUpdated {
        at: DateTime<Utc>,
    },
    MascotEvolved {
        from: MascotStage,
        to: MascotStage,
        at: DateTime<Utc>,
    },
    MascotMoodChanged {
        from: MascotMood,
        to: MascotMood,
        at: DateTime<Utc>,
    },
    DayLogged {
        date: NaiveDate,
        status: DayStatus,
        /// An earlier log for the same date was overwritten.
        replaced: bool,
        at: DateTime<Utc>,
    },
    DayLogPatched {
        date: NaiveDate,
        status: DayStatus,
        at: DateTime<Utc>,
    },
    MissionCompleted {
        mission_id: String,
        reward: u32,
        at: DateTime<Utc>,
    },
    SavingsGoalAdded {
        goal_id: String,
        name: String,
        target_amount: f64,
        at: DateTime<Utc>,
    },
    DataReset {
        at: DateTime<Utc>,
    },
    BreathingStarted {
        cycles: u32,
        at: DateTime<Utc>,
    },
    BreathPhaseChanged {
        phase: BreathPhase,
        /// Completed inhale-hold-exhale cycles so far.
        breaths: u32,
        at: DateTime<Utc>,
    },
    DistractionStarted {
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    BubbleSpawned {
        bubble_id: u64,
        x: f64,
        at: DateTime<Utc>,
    },
    BubblePopped {
        bubble_id: u64,
        score: u32,
        at: DateTime<Utc>,
    },
    InterventionFinished {
        technique: Technique,
        breaths: u32,
        score: u32,
        at: DateTime<Utc>,
    },
    InterventionCancelled {
        technique: Technique,
        at: DateTime<Utc>,
    },
    /// User chose "need more time" on the result screen.
    InterventionReplayed {
        at: DateTime<Utc>,
    },
    CravingResolved {
        technique: Technique,
        at: DateTime<Utc>,
    },
}
