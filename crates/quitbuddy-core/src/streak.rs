//! Streak calculator.
//!
//! Pure derivation over the day logs. Nothing here is cached: logs can be
//! written out of order or edited after the fact, so callers recompute on
//! every read.
//!
//! ## Rules
//!
//! - Only `smoke-free`, `slip` and `relapse` logs take part in `current`
//!   and `longest`; `pre-quit` and `future` entries are ignored.
//! - `current` counts leading smoke-free logs, newest first, up to the
//!   first slip/relapse. It is log-based: a gap between the newest log and
//!   today does not break it. The gap is reported as `stale_days`.
//! - `longest` is the best smoke-free run in date order.
//! - `total_smoke_free` counts every smoke-free log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day_log::{DayLog, DayStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
    pub total_smoke_free: u32,
    /// Whole days between the newest streak-bearing log and today.
    /// Zero when there are no such logs or the newest one is today or later.
    #[serde(default)]
    pub stale_days: u32,
}

/// Derive the streak from `logs` as seen on `today`.
pub fn compute_streak<'a, I>(logs: I, today: NaiveDate) -> Streak
where
    I: IntoIterator<Item = &'a DayLog>,
{
    let mut dated: Vec<(NaiveDate, DayStatus)> = Vec::new();
    let mut total_smoke_free = 0u32;

    for log in logs {
        if log.status == DayStatus::SmokeFree {
            total_smoke_free += 1;
        }
        if log.status.counts_for_streak() {
            dated.push((log.date, log.status));
        }
    }

    // Newest first.
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let current = dated
        .iter()
        .take_while(|(_, status)| *status == DayStatus::SmokeFree)
        .count() as u32;

    let mut longest = 0u32;
    let mut run = 0u32;
    for (_, status) in dated.iter().rev() {
        if *status == DayStatus::SmokeFree {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    let stale_days = dated
        .first()
        .map(|(newest, _)| (today - *newest).num_days().max(0) as u32)
        .unwrap_or(0);

    Streak {
        current,
        longest,
        total_smoke_free,
        stale_days,
    }
}
