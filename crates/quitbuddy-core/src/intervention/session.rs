//! Craving SOS session.
//!
//! Wall-clock state machine with no internal thread. The caller passes the
//! current time into every command and calls [`CravingSession::advance`]
//! periodically; due timers are applied in deadline order.
//!
//! ## State Transitions
//!
//! ```text
//! Menu -> Breathing   -> Result
//! Menu -> Distracting -> Result
//! Breathing | Distracting -> Menu  (cancel)
//! Result -> Menu                   (need more time)
//! Result -> resolved               (craving passed, caller navigates away)
//! ```
//!
//! Every transition out of `Breathing` or `Distracting` clears the timer
//! queue, so nothing armed for an old mode can fire into a new one.

use chrono::{DateTime, Duration, Utc};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::breathing::{BreathPhase, BreathingState};
use super::distraction::DistractionState;
use super::timer::{Fired, TimerKind, TimerQueue};
use crate::events::Event;
use crate::profile::MascotMood;
use crate::storage::{BreathingConfig, DistractionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technique {
    Breathing,
    Distraction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub technique: Technique,
    pub breaths: u32,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SosMode {
    Menu,
    Breathing(BreathingState),
    Distracting(DistractionState),
    Result(SessionResult),
}

impl SosMode {
    pub fn technique(&self) -> Option<Technique> {
        match self {
            SosMode::Menu => None,
            SosMode::Breathing(_) => Some(Technique::Breathing),
            SosMode::Distracting(_) => Some(Technique::Distraction),
            SosMode::Result(r) => Some(r.technique),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CravingSession {
    breathing: BreathingConfig,
    distraction: DistractionConfig,
    mode: SosMode,
    timers: TimerQueue,
    rng: Pcg32,
    prior_mood: MascotMood,
    resolved: bool,
}

impl CravingSession {
    /// Open the SOS screen. The mascot is calm for as long as the session
    /// lives; `prior_mood` is handed back by [`CravingSession::close`].
    pub fn open(
        prior_mood: MascotMood,
        breathing: BreathingConfig,
        distraction: DistractionConfig,
        seed: u64,
    ) -> Self {
        Self {
            breathing,
            distraction,
            mode: SosMode::Menu,
            timers: TimerQueue::new(),
            rng: Pcg32::seed_from_u64(seed),
            prior_mood,
            resolved: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> &SosMode {
        &self.mode
    }

    pub fn mascot_mood(&self) -> MascotMood {
        MascotMood::Calm
    }

    pub fn prior_mood(&self) -> MascotMood {
        self.prior_mood
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// When the next timer is due; `None` when nothing is running.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.timers.next_deadline()
    }

    pub fn breathing_config(&self) -> &BreathingConfig {
        &self.breathing
    }

    pub fn distraction_config(&self) -> &DistractionConfig {
        &self.distraction
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// "Ride it out": start the breathing exercise. Only from the menu.
    pub fn start_breathing(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.mode != SosMode::Menu {
            return None;
        }
        let state = BreathingState::default();
        self.timers
            .schedule(now + state.phase.duration(&self.breathing), TimerKind::BreathPhase);
        self.mode = SosMode::Breathing(state);
        tracing::debug!(cycles = self.breathing.cycles, "breathing exercise started");
        Some(Event::BreathingStarted {
            cycles: self.breathing.cycles.max(1),
            at: now,
        })
    }

    /// "Quick distraction": start the bubble game. Only from the menu.
    pub fn start_distraction(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.mode != SosMode::Menu {
            return None;
        }
        // Armed first so the clock wins ties with the spawn roll.
        self.timers
            .schedule_every(now, Duration::seconds(1), TimerKind::Countdown);
        self.timers.schedule_every(
            now,
            Duration::milliseconds(i64::from(self.distraction.spawn_interval_ms)),
            TimerKind::Spawn,
        );
        self.timers.schedule_every(
            now,
            Duration::milliseconds(i64::from(self.distraction.motion_interval_ms)),
            TimerKind::Motion,
        );
        self.mode = SosMode::Distracting(DistractionState::default());
        tracing::debug!(duration_secs = self.distraction.duration_secs, "distraction game started");
        Some(Event::DistractionStarted {
            duration_secs: self.distraction.duration_secs,
            at: now,
        })
    }

    /// Apply every timer due at or before `now`.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(fired) = self.timers.pop_due(now) {
            self.on_timer(fired, &mut events);
        }
        events
    }

    /// Tap a bubble.
    pub fn pop_bubble(&mut self, bubble_id: u64, now: DateTime<Utc>) -> Option<Event> {
        let SosMode::Distracting(game) = &mut self.mode else {
            return None;
        };
        if !game.pop(bubble_id) {
            return None;
        }
        Some(Event::BubblePopped {
            bubble_id,
            score: game.score,
            at: now,
        })
    }

    /// Abort a running exercise back to the menu, discarding its progress.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let technique = match self.mode {
            SosMode::Breathing(_) => Technique::Breathing,
            SosMode::Distracting(_) => Technique::Distraction,
            _ => return None,
        };
        self.reset_to_menu();
        tracing::debug!(?technique, "intervention cancelled");
        Some(Event::InterventionCancelled { technique, at: now })
    }

    /// "I need more time": from the result screen back to the menu.
    pub fn need_more_time(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !matches!(self.mode, SosMode::Result(_)) {
            return None;
        }
        self.reset_to_menu();
        Some(Event::InterventionReplayed { at: now })
    }

    /// "Craving passed!": acknowledge the result. Navigation is up to the
    /// caller; the session stays on the result screen.
    pub fn resolve(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let SosMode::Result(result) = &self.mode else {
            return None;
        };
        if self.resolved {
            return None;
        }
        self.resolved = true;
        tracing::info!(technique = ?result.technique, "craving resolved");
        Some(Event::CravingResolved {
            technique: result.technique,
            at: now,
        })
    }

    /// Leave the SOS screen. Drops all timers and returns the mood the
    /// mascot had before the session opened.
    pub fn close(mut self) -> MascotMood {
        let dropped = self.timers.cancel_all();
        if dropped > 0 {
            tracing::debug!(dropped, "cleared pending timers on close");
        }
        self.prior_mood
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reset_to_menu(&mut self) {
        self.timers.cancel_all();
        self.mode = SosMode::Menu;
        self.resolved = false;
    }

    fn finish(&mut self, result: SessionResult, at: DateTime<Utc>, events: &mut Vec<Event>) {
        self.timers.cancel_all();
        tracing::info!(technique = ?result.technique, breaths = result.breaths, score = result.score, "intervention finished");
        events.push(Event::InterventionFinished {
            technique: result.technique,
            breaths: result.breaths,
            score: result.score,
            at,
        });
        self.mode = SosMode::Result(result);
    }

    fn on_timer(&mut self, fired: Fired, events: &mut Vec<Event>) {
        match (&mut self.mode, fired.kind) {
            (SosMode::Breathing(state), TimerKind::BreathPhase) => {
                state.step();
                if state.phase == BreathPhase::Inhale && state.is_done(&self.breathing) {
                    let result = SessionResult {
                        technique: Technique::Breathing,
                        breaths: state.count,
                        score: 0,
                    };
                    self.finish(result, fired.at, events);
                    return;
                }
                let (phase, breaths) = (state.phase, state.count);
                self.timers
                    .schedule(fired.at + phase.duration(&self.breathing), TimerKind::BreathPhase);
                events.push(Event::BreathPhaseChanged {
                    phase,
                    breaths,
                    at: fired.at,
                });
            }
            (SosMode::Distracting(game), TimerKind::Countdown) => {
                game.elapsed_secs += 1;
                if game.remaining_secs(&self.distraction) == 0 {
                    let result = SessionResult {
                        technique: Technique::Distraction,
                        breaths: 0,
                        score: game.score,
                    };
                    self.finish(result, fired.at, events);
                }
            }
            (SosMode::Distracting(game), TimerKind::Spawn) => {
                if let Some(bubble) = game.maybe_spawn(&mut self.rng, &self.distraction) {
                    events.push(Event::BubbleSpawned {
                        bubble_id: bubble.id,
                        x: bubble.x,
                        at: fired.at,
                    });
                }
            }
            (SosMode::Distracting(game), TimerKind::Motion) => {
                game.drift(self.distraction.rise_per_tick);
            }
            (mode, kind) => {
                // Unreachable while every exit path clears the queue.
                tracing::warn!(?kind, technique = ?mode.technique(), "dropping timer that does not belong to the current mode");
            }
        }
    }
}
