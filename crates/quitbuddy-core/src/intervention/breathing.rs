use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::storage::BreathingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
}

impl BreathPhase {
    pub fn duration(self, config: &BreathingConfig) -> Duration {
        let secs = match self {
            BreathPhase::Inhale => config.inhale_secs,
            BreathPhase::Hold => config.hold_secs,
            BreathPhase::Exhale => config.exhale_secs,
        };
        Duration::seconds(i64::from(secs))
    }

    pub fn next(self) -> BreathPhase {
        match self {
            BreathPhase::Inhale => BreathPhase::Hold,
            BreathPhase::Hold => BreathPhase::Exhale,
            BreathPhase::Exhale => BreathPhase::Inhale,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            BreathPhase::Inhale => "Breathe in slowly through your nose...",
            BreathPhase::Hold => "Hold your breath gently...",
            BreathPhase::Exhale => "Release slowly through your mouth...",
        }
    }
}

/// Live breathing exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingState {
    pub phase: BreathPhase,
    /// Completed inhale-hold-exhale cycles.
    pub count: u32,
}

impl Default for BreathingState {
    fn default() -> Self {
        Self {
            phase: BreathPhase::Inhale,
            count: 0,
        }
    }
}

impl BreathingState {
    /// Move to the next phase; leaving `Exhale` completes a cycle.
    pub fn step(&mut self) {
        if self.phase == BreathPhase::Exhale {
            self.count += 1;
        }
        self.phase = self.phase.next();
    }

    pub fn is_done(&self, config: &BreathingConfig) -> bool {
        self.count >= config.cycles.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_counts_on_leaving_exhale() {
        let mut state = BreathingState::default();
        state.step();
        assert_eq!(state.phase, BreathPhase::Hold);
        state.step();
        assert_eq!((state.phase, state.count), (BreathPhase::Exhale, 0));
        state.step();
        assert_eq!((state.phase, state.count), (BreathPhase::Inhale, 1));
    }

    #[test]
    fn default_pacing() {
        let cfg = BreathingConfig::default();
        assert_eq!(BreathPhase::Inhale.duration(&cfg), Duration::seconds(4));
        assert_eq!(BreathPhase::Hold.duration(&cfg), Duration::seconds(4));
        assert_eq!(BreathPhase::Exhale.duration(&cfg), Duration::seconds(6));
    }
}
