//! Application state container.
//!
//! One [`AppState`] owns the profile, day logs, missions and savings goals.
//! It is built from a [`KvStore`] and a [`Clock`] handed in by the caller;
//! nothing is looked up globally.
//!
//! Loading is forgiving: each persisted key is read on its own and a
//! missing or unparsable value falls back to its default with a warning.
//! Mutations are write-through: memory is updated first, then the touched
//! key is written before the call returns.
//!
//! Streak, money and mission figures are derived on every read.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clock::Clock;
use crate::day_log::{DayLog, DayLogPatch, DayLogStore, DayStatus};
use crate::error::Result;
use crate::events::Event;
use crate::goals::{GoalProgress, SavingsGoal};
use crate::health::{health_progress, HealthProgress};
use crate::intervention::CravingSession;
use crate::metrics::{DerivedMetrics, SavingsProjection};
use crate::mission::{Mission, MissionTracker, MissionView};
use crate::profile::{MascotMood, MascotStage, MascotType, ProfileDraft, UserProfile};
use crate::storage::{Config, KvStore};
use crate::streak::{compute_streak, Streak};

/// Persisted keys.
pub mod keys {
    pub const USER: &str = "user";
    pub const ONBOARDED: &str = "onboarded";
    pub const LOGS: &str = "logs";
    pub const MISSIONS: &str = "missions";
    pub const GOALS: &str = "goals";
}

type Listener = Box<dyn FnMut(&Event)>;

/// What the mascot renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MascotView {
    #[serde(rename = "type")]
    pub kind: MascotType,
    pub name: String,
    pub stage: MascotStage,
    pub mood: MascotMood,
    pub accessories: Vec<String>,
    /// Next stage and the current-streak days it needs.
    pub next_stage: Option<(MascotStage, u32)>,
}

/// Everything the home screen shows, in one read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today: NaiveDate,
    pub streak: Streak,
    pub metrics: Option<DerivedMetrics>,
    pub projection: Option<SavingsProjection>,
    pub mascot: Option<MascotView>,
    pub today_checked_in: bool,
    pub total_points: u32,
    pub health: HealthProgress,
    pub goals: Vec<GoalProgress>,
}

pub struct AppState<S: KvStore, C: Clock> {
    store: S,
    clock: C,
    config: Config,
    user: Option<UserProfile>,
    onboarded: bool,
    logs: DayLogStore,
    missions: MissionTracker,
    goals: Vec<SavingsGoal>,
    mascot_mood: MascotMood,
    listeners: Vec<Listener>,
}

impl<S: KvStore, C: Clock> AppState<S, C> {
    /// Load every entity from `store`, defaulting whatever is missing or
    /// corrupt.
    pub fn load(store: S, clock: C, config: Config) -> Self {
        let user: Option<UserProfile> = load_key(&store, keys::USER).filter(|u: &UserProfile| {
            match u.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "stored profile failed validation, ignoring it");
                    false
                }
            }
        });
        let onboarded = load_key(&store, keys::ONBOARDED).unwrap_or(false);
        let logs = load_key::<Vec<DayLog>>(&store, keys::LOGS)
            .map(DayLogStore::from_logs)
            .unwrap_or_default();
        let missions = load_key::<Vec<Mission>>(&store, keys::MISSIONS)
            .map(MissionTracker::new)
            .unwrap_or_default();
        let goals = load_key(&store, keys::GOALS).unwrap_or_default();
        let mascot_mood = user.as_ref().map(|u| u.mascot.mood).unwrap_or_default();

        tracing::debug!(
            has_user = user.is_some(),
            onboarded,
            logs = logs.len(),
            "application state loaded"
        );

        Self {
            store,
            clock,
            config,
            user,
            onboarded,
            logs,
            missions,
            goals,
            mascot_mood,
            listeners: Vec::new(),
        }
    }

    /// Register a callback for every event this container produces.
    pub fn subscribe(&mut self, listener: impl FnMut(&Event) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// Onboarded and holding a profile. Screens behind onboarding must not
    /// render otherwise.
    pub fn is_onboarded(&self) -> bool {
        self.onboarded && self.user.is_some()
    }

    pub fn day_logs(&self) -> &DayLogStore {
        &self.logs
    }

    pub fn day_log(&self, date: NaiveDate) -> Option<&DayLog> {
        self.logs.get(date)
    }

    pub fn today_checked_in(&self) -> bool {
        self.logs.contains(self.today())
    }

    /// Status to show for `date`: its log if there is one, otherwise
    /// inferred from the quit date and today.
    pub fn day_status(&self, date: NaiveDate) -> DayStatus {
        if let Some(log) = self.logs.get(date) {
            return log.status;
        }
        match &self.user {
            Some(user) if date < user.quit_date => DayStatus::PreQuit,
            _ if date > self.today() => DayStatus::Future,
            _ => DayStatus::PreQuit,
        }
    }

    pub fn streak(&self) -> Streak {
        compute_streak(&self.logs, self.today())
    }

    /// `None` before onboarding.
    pub fn metrics(&self) -> Option<DerivedMetrics> {
        let user = self.user.as_ref()?;
        Some(DerivedMetrics::compute(user, &self.streak(), self.now()))
    }

    pub fn savings_projection(&self) -> Option<SavingsProjection> {
        self.user.as_ref().map(SavingsProjection::for_profile)
    }

    pub fn health(&self) -> HealthProgress {
        health_progress(self.streak().total_smoke_free)
    }

    pub fn mission_tracker(&self) -> &MissionTracker {
        &self.missions
    }

    pub fn missions(&self) -> Vec<MissionView> {
        self.missions.views(&self.streak())
    }

    pub fn total_points(&self) -> u32 {
        self.missions.total_points(&self.streak())
    }

    pub fn savings_goals(&self) -> &[SavingsGoal] {
        &self.goals
    }

    pub fn goal_progress(&self) -> Vec<GoalProgress> {
        let saved = self.metrics().map(|m| m.total_money_saved).unwrap_or(0.0);
        self.goals.iter().map(|g| g.progress(saved)).collect()
    }

    pub fn mascot_mood(&self) -> MascotMood {
        self.mascot_mood
    }

    pub fn mascot(&self) -> Option<MascotView> {
        let mascot = &self.user.as_ref()?.mascot;
        Some(MascotView {
            kind: mascot.kind,
            name: mascot.name.clone(),
            stage: mascot.stage,
            mood: self.mascot_mood,
            accessories: mascot.accessories.clone(),
            next_stage: mascot.stage.next_threshold(),
        })
    }

    pub fn dashboard(&self) -> Dashboard {
        let streak = self.streak();
        Dashboard {
            today: self.today(),
            streak,
            metrics: self.metrics(),
            projection: self.savings_projection(),
            mascot: self.mascot(),
            today_checked_in: self.today_checked_in(),
            total_points: self.missions.total_points(&streak),
            health: health_progress(streak.total_smoke_free),
            goals: self.goal_progress(),
        }
    }

    // ── Profile ──────────────────────────────────────────────────────

    /// Validate the onboarding answers, store the profile and mark the
    /// install onboarded.
    pub fn complete_onboarding(&mut self, draft: ProfileDraft) -> Result<Event> {
        let profile = draft.build(self.today(), self.config.profile.default_cigarettes_per_pack)?;
        let event = Event::OnboardingCompleted {
            profile_id: profile.id.clone(),
            quit_date: profile.quit_date,
            at: self.now(),
        };
        self.mascot_mood = profile.mascot.mood;
        self.user = Some(profile);
        self.onboarded = true;
        self.persist_user()?;
        self.persist(keys::ONBOARDED, &self.onboarded)?;
        tracing::info!("onboarding completed");
        self.evolve_mascot()?;
        Ok(self.emit(event))
    }

    /// Replace the profile wholesale. `None` before onboarding.
    pub fn update_profile(&mut self, profile: UserProfile) -> Result<Option<Event>> {
        if !self.is_onboarded() {
            return Ok(None);
        }
        profile.validate()?;
        self.user = Some(profile);
        self.persist_user()?;
        Ok(Some(self.emit(Event::ProfileUpdated { at: self.now() })))
    }

    /// Swap the companion species, keeping name, stage and accessories.
    /// `None` before onboarding.
    pub fn set_mascot_type(&mut self, kind: MascotType) -> Result<Option<Event>> {
        let Some(user) = self.user.as_mut() else {
            return Ok(None);
        };
        user.mascot.kind = kind;
        self.persist_user()?;
        Ok(Some(self.emit(Event::ProfileUpdated { at: self.now() })))
    }

    pub fn equip_accessory(&mut self, accessory: &str) -> Result<Option<Event>> {
        let Some(user) = self.user.as_mut() else {
            return Ok(None);
        };
        if !user.mascot.equip(accessory) {
            return Ok(None);
        }
        self.persist_user()?;
        Ok(Some(self.emit(Event::ProfileUpdated { at: self.now() })))
    }

    pub fn unequip_accessory(&mut self, accessory: &str) -> Result<Option<Event>> {
        let Some(user) = self.user.as_mut() else {
            return Ok(None);
        };
        if !user.mascot.unequip(accessory) {
            return Ok(None);
        }
        self.persist_user()?;
        Ok(Some(self.emit(Event::ProfileUpdated { at: self.now() })))
    }

    /// Ambient mood for the renderer. Not persisted.
    pub fn set_mascot_mood(&mut self, mood: MascotMood) -> Option<Event> {
        if mood == self.mascot_mood {
            return None;
        }
        let from = std::mem::replace(&mut self.mascot_mood, mood);
        Some(self.emit(Event::MascotMoodChanged {
            from,
            to: mood,
            at: self.now(),
        }))
    }

    // ── Day logs ─────────────────────────────────────────────────────

    /// Insert or replace the log for `log.date`.
    pub fn add_day_log(&mut self, log: DayLog) -> Result<Event> {
        let (date, status) = (log.date, log.status);
        let replaced = self.logs.upsert(log).is_some();
        self.persist(keys::LOGS, &self.logs)?;
        tracing::debug!(%date, ?status, replaced, "day logged");
        let event = self.emit(Event::DayLogged {
            date,
            status,
            replaced,
            at: self.now(),
        });
        self.evolve_mascot()?;
        Ok(event)
    }

    /// Today's check-in.
    pub fn check_in(&mut self, status: DayStatus, mood: Option<u8>) -> Result<Event> {
        let mut log = DayLog::new(self.today(), status);
        log.mood = mood;
        self.add_day_log(log)
    }

    /// Merge `patch` into an existing log. `None` when `date` has no log.
    pub fn update_day_log(&mut self, date: NaiveDate, patch: DayLogPatch) -> Result<Option<Event>> {
        let Some(status) = self.logs.patch(date, patch).map(|l| l.status) else {
            return Ok(None);
        };
        self.persist(keys::LOGS, &self.logs)?;
        let event = self.emit(Event::DayLogPatched {
            date,
            status,
            at: self.now(),
        });
        self.evolve_mascot()?;
        Ok(Some(event))
    }

    // ── Missions & goals ─────────────────────────────────────────────

    /// Complete a daily mission. Unknown ids, weekly missions and missions
    /// already done are a silent no-op.
    pub fn complete_mission(&mut self, id: &str) -> Result<Option<Event>> {
        let Some(reward) = self.missions.complete(id).map(|m| m.reward) else {
            tracing::debug!(id, "mission not completable");
            return Ok(None);
        };
        self.persist(keys::MISSIONS, &self.missions)?;
        Ok(Some(self.emit(Event::MissionCompleted {
            mission_id: id.to_string(),
            reward,
            at: self.now(),
        })))
    }

    pub fn add_savings_goal(&mut self, name: &str, target_amount: f64, icon: &str) -> Result<Event> {
        let goal = SavingsGoal::new(name, target_amount, icon)?;
        let event = Event::SavingsGoalAdded {
            goal_id: goal.id.clone(),
            name: goal.name.clone(),
            target_amount: goal.target_amount,
            at: self.now(),
        };
        self.goals.push(goal);
        self.persist(keys::GOALS, &self.goals)?;
        Ok(self.emit(event))
    }

    // ── Craving SOS ──────────────────────────────────────────────────

    /// Open the SOS flow: the mascot goes calm until the session is closed.
    pub fn open_craving_session(&mut self, seed: u64) -> CravingSession {
        let session = CravingSession::open(
            self.mascot_mood,
            self.config.breathing.clone(),
            self.config.distraction.clone(),
            seed,
        );
        self.set_mascot_mood(session.mascot_mood());
        session
    }

    /// Leave the SOS flow, restoring the mascot's earlier mood.
    pub fn close_craving_session(&mut self, session: CravingSession) -> Option<Event> {
        let prior = session.close();
        self.set_mascot_mood(prior)
    }

    // ── Reset ────────────────────────────────────────────────────────

    /// Wipe every persisted key and return to a fresh install.
    pub fn reset(&mut self) -> Result<Event> {
        self.store.clear()?;
        self.user = None;
        self.onboarded = false;
        self.logs.clear();
        self.missions = MissionTracker::default();
        self.goals.clear();
        self.mascot_mood = MascotMood::default();
        tracing::info!("all data reset");
        Ok(self.emit(Event::DataReset { at: self.now() }))
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Advance the stored stage to what the current streak has earned.
    fn evolve_mascot(&mut self) -> Result<()> {
        let earned = MascotStage::for_streak(self.streak().current);
        let Some(user) = self.user.as_mut() else {
            return Ok(());
        };
        if earned <= user.mascot.stage {
            return Ok(());
        }
        let from = std::mem::replace(&mut user.mascot.stage, earned);
        self.persist_user()?;
        tracing::info!(?from, to = ?earned, "mascot evolved");
        self.emit(Event::MascotEvolved {
            from,
            to: earned,
            at: self.now(),
        });
        Ok(())
    }

    fn persist_user(&self) -> Result<()> {
        match &self.user {
            Some(user) => self.persist(keys::USER, user),
            None => Ok(self.store.remove(keys::USER)?),
        }
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)?;
        tracing::debug!(key, bytes = json.len(), "persisted");
        Ok(())
    }

    fn emit(&mut self, event: Event) -> Event {
        for listener in &mut self.listeners {
            listener(&event);
        }
        event
    }
}

fn load_key<T: DeserializeOwned>(store: &impl KvStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read persisted value, using default");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "corrupt persisted value, using default");
            None
        }
    }
}
