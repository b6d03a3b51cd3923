//! # QuitBuddy Core Library
//!
//! Core logic for the QuitBuddy quit-smoking companion. Everything the app
//! shows is either persisted here or derived from what is persisted; the
//! CLI (and any GUI) is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Day logs**: one status record per calendar day, last write wins
//! - **Streaks & metrics**: recomputed on every read from the logs and the
//!   profile, never stored
//! - **Missions & goals**: seeded daily/weekly missions and savings goals
//! - **Craving SOS**: a wall-clock state machine for the breathing and
//!   bubble-popping interventions; the caller drives it with `advance()`
//! - **Storage**: a key-value [`KvStore`] (SQLite by default) holding JSON
//!   documents, plus TOML configuration
//!
//! ## Key Components
//!
//! - [`AppState`]: owns the persisted entities and writes through on change
//! - [`CravingSession`]: craving intervention state machine
//! - [`compute_streak`]: streak calculator
//! - [`Config`]: application configuration management

pub mod clock;
pub mod day_log;
pub mod error;
pub mod events;
pub mod goals;
pub mod health;
pub mod intervention;
pub mod metrics;
pub mod mission;
pub mod profile;
pub mod state;
pub mod storage;
pub mod streak;

pub use clock::{Clock, ManualClock, SystemClock};
pub use day_log::{parse_date, DayLog, DayLogPatch, DayLogStore, DayStatus};
pub use error::{ConfigError, CoreError, Result, StorageError, ValidationError};
pub use events::Event;
pub use goals::{GoalProgress, SavingsGoal};
pub use health::{health_progress, HealthMilestone, HealthProgress, HEALTH_MILESTONES};
pub use intervention::{BreathPhase, CravingSession, SessionResult, SosMode, Technique};
pub use metrics::{DerivedMetrics, SavingsProjection};
pub use mission::{seed_missions, Mission, MissionTracker, MissionType, MissionView};
pub use profile::{Mascot, MascotMood, MascotStage, MascotType, ProfileDraft, QuitPlan, UserProfile};
pub use state::{AppState, Dashboard, MascotView};
pub use storage::{Config, Database, KvStore};
pub use streak::{compute_streak, Streak};
