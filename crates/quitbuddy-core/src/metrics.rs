//! Money and cigarette projections derived from the profile and streak.
//!
//! Recomputed on every read. Division by pack size is safe because a
//! [`UserProfile`] with `cigarettes_per_pack == 0` is rejected when it is
//! built.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;
use crate::streak::Streak;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    /// Cost of one day's habit.
    pub daily_rate: f64,
    pub total_money_saved: f64,
    pub cigarettes_avoided: u64,
    pub is_pre_quit: bool,
    pub days_until_quit: i64,
}

impl DerivedMetrics {
    pub fn compute(profile: &UserProfile, streak: &Streak, now: DateTime<Utc>) -> Self {
        let daily_rate = daily_rate(profile);
        let smoke_free = streak.total_smoke_free as f64;
        let (is_pre_quit, days_until_quit) = quit_countdown(profile.quit_date, now);
        Self {
            daily_rate,
            total_money_saved: smoke_free * daily_rate,
            cigarettes_avoided: streak.total_smoke_free as u64 * profile.cigarettes_per_day as u64,
            is_pre_quit,
            days_until_quit,
        }
    }
}

pub fn daily_rate(profile: &UserProfile) -> f64 {
    let pack = profile.cigarettes_per_pack.max(1) as f64;
    profile.cost_per_pack / pack * profile.cigarettes_per_day as f64
}

/// Whether `quit_date` (midnight UTC) is strictly after `now`, and if so
/// the number of days left, rounded up.
pub fn quit_countdown(quit_date: NaiveDate, now: DateTime<Utc>) -> (bool, i64) {
    let quit_at = quit_date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(now);
    if quit_at <= now {
        return (false, 0);
    }
    let secs = (quit_at - now).num_seconds();
    (true, (secs + 86_399) / 86_400)
}

/// Forward-looking savings at the user's current habit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsProjection {
    pub daily: f64,
    pub weekly: f64,
    pub yearly: f64,
}

impl SavingsProjection {
    pub fn for_profile(profile: &UserProfile) -> Self {
        let daily = daily_rate(profile);
        Self {
            daily,
            weekly: daily * 7.0,
            yearly: daily * 365.0,
        }
    }
}
