//! Gamified missions.
//!
//! Daily missions are completed explicitly by whatever flow fulfils them
//! (check-in, a finished breathing exercise, ...). Weekly missions are
//! streak challenges: their progress is read off the current streak and
//! they are never completed through [`MissionTracker::complete`].

use serde::{Deserialize, Serialize};

use crate::streak::Streak;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionType {
    Daily,
    Weekly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: MissionType,
    pub progress: u32,
    pub target: u32,
    pub reward: u32,
    pub completed: bool,
}

impl Mission {
    fn seed(id: &str, title: &str, description: &str, kind: MissionType, target: u32, reward: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            kind,
            progress: 0,
            target,
            reward,
            completed: false,
        }
    }

    /// Mark done. Keeps `completed => progress == target`.
    fn finish(&mut self) {
        self.progress = self.target;
        self.completed = true;
    }

    /// Restore the completion invariant on records loaded from storage.
    fn normalize(&mut self) {
        self.target = self.target.max(1);
        self.progress = self.progress.min(self.target);
        if self.completed {
            self.progress = self.target;
        }
    }
}

/// The five missions every new install starts with.
pub fn seed_missions() -> Vec<Mission> {
    vec![
        Mission::seed("1", "Morning Check-in", "Complete your daily check-in", MissionType::Daily, 1, 10),
        Mission::seed("2", "Breathing Exercise", "Complete a 2-minute breathing session", MissionType::Daily, 1, 15),
        Mission::seed("3", "Read a Lesson", "Read one article from the learning hub", MissionType::Daily, 1, 10),
        Mission::seed("4", "Craving Conquered", "Successfully ride out a craving", MissionType::Daily, 1, 20),
        Mission::seed("5", "7-Day Warrior", "Stay smoke-free for 7 consecutive days", MissionType::Weekly, 7, 100),
    ]
}

/// Well-known ids of the seeded daily missions.
pub mod ids {
    pub const CHECK_IN: &str = "1";
    pub const BREATHING: &str = "2";
    pub const LESSON: &str = "3";
    pub const CRAVING_CONQUERED: &str = "4";
}

/// A mission as it should be displayed, with streak-derived progress
/// applied to weekly missions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionView {
    #[serde(flatten)]
    pub mission: Mission,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionTracker {
    missions: Vec<Mission>,
}

impl Default for MissionTracker {
    fn default() -> Self {
        Self::new(seed_missions())
    }
}

impl MissionTracker {
    pub fn new(missions: Vec<Mission>) -> Self {
        let mut missions = missions;
        missions.iter_mut().for_each(Mission::normalize);
        Self { missions }
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn get(&self, id: &str) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == id)
    }

    /// Complete a daily mission.
    ///
    /// Returns the completed mission, or `None` when the id is unknown,
    /// names a weekly mission, or was already completed.
    pub fn complete(&mut self, id: &str) -> Option<&Mission> {
        let mission = self
            .missions
            .iter_mut()
            .find(|m| m.id == id && m.kind == MissionType::Daily && !m.completed)?;
        mission.finish();
        Some(mission)
    }

    /// Missions with weekly progress taken from `streak.current`.
    pub fn views(&self, streak: &Streak) -> Vec<MissionView> {
        self.missions
            .iter()
            .map(|m| {
                let mut mission = m.clone();
                if mission.kind == MissionType::Weekly {
                    mission.progress = streak.current.min(mission.target);
                    mission.completed = mission.progress == mission.target;
                }
                let percent = (u64::from(mission.progress) * 100 / u64::from(mission.target.max(1))).min(100) as u32;
                MissionView { mission, percent }
            })
            .collect()
    }

    /// Sum of rewards over completed missions, weekly ones judged by streak.
    pub fn total_points(&self, streak: &Streak) -> u32 {
        self.views(streak)
            .iter()
            .filter(|v| v.mission.completed)
            .map(|v| v.mission.reward)
            .fold(0, u32::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streak(current: u32) -> Streak {
        Streak {
            current,
            longest: current,
            total_smoke_free: current,
            stale_days: 0,
        }
    }

    #[test]
    fn seeds_five_missions() {
        let tracker = MissionTracker::default();
        assert_eq!(tracker.missions().len(), 5);
        assert_eq!(tracker.missions().iter().filter(|m| m.kind == MissionType::Weekly).count(), 1);
        assert!(tracker.missions().iter().all(|m| !m.completed && m.progress == 0));
    }

    #[test]
    fn complete_sets_progress_to_target() {
        let mut tracker = MissionTracker::default();
        let done = tracker.complete(ids::BREATHING).unwrap();
        assert!(done.completed);
        assert_eq!(done.progress, done.target);
    }

    #[test]
    fn complete_unknown_or_weekly_is_noop() {
        let mut tracker = MissionTracker::default();
        let before = tracker.clone();
        assert!(tracker.complete("nope").is_none());
        assert!(tracker.complete("5").is_none());
        assert_eq!(tracker, before);
    }

    #[test]
    fn completing_twice_reports_nothing_new() {
        let mut tracker = MissionTracker::default();
        assert!(tracker.complete(ids::CHECK_IN).is_some());
        assert!(tracker.complete(ids::CHECK_IN).is_none());
    }

    #[test]
    fn weekly_progress_tracks_current_streak() {
        let tracker = MissionTracker::default();
        let views = tracker.views(&streak(3));
        let weekly = views.iter().find(|v| v.mission.id == "5").unwrap();
        assert_eq!(weekly.mission.progress, 3);
        assert!(!weekly.mission.completed);

        let views = tracker.views(&streak(12));
        let weekly = views.iter().find(|v| v.mission.id == "5").unwrap();
        assert_eq!(weekly.mission.progress, 7);
        assert!(weekly.mission.completed);
        assert_eq!(weekly.percent, 100);
    }

    #[test]
    fn points_sum_completed_rewards() {
        let mut tracker = MissionTracker::default();
        tracker.complete(ids::CHECK_IN);
        tracker.complete(ids::CRAVING_CONQUERED);
        assert_eq!(tracker.total_points(&streak(0)), 30);
        assert_eq!(tracker.total_points(&streak(7)), 130);
    }

    #[test]
    fn huge_targets_do_not_overflow() {
        let mut raw = seed_missions();
        raw[0].target = u32::MAX;
        raw[0].progress = u32::MAX - 1;
        raw[1].reward = u32::MAX;
        raw[1].completed = true;
        raw[2].reward = u32::MAX;
        raw[2].completed = true;
        let tracker = MissionTracker::new(raw);
        let views = tracker.views(&streak(0));
        assert_eq!(views[0].percent, 99);
        assert_eq!(views[1].percent, 100);
        assert_eq!(tracker.total_points(&streak(0)), u32::MAX);
    }

    #[test]
    fn loaded_missions_are_normalized() {
        let mut raw = seed_missions();
        raw[0].completed = true;
        raw[1].progress = 9;
        let tracker = MissionTracker::new(raw);
        for m in tracker.missions() {
            assert!(m.progress <= m.target);
            if m.completed {
                assert_eq!(m.progress, m.target);
            }
        }
    }
}
