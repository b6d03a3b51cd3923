//! Deadline queue standing in for `setTimeout` / `setInterval`.
//!
//! The queue holds no thread and fires nothing on its own. The owner asks
//! for due timers with [`TimerQueue::pop_due`], passing the current time.
//! Repeating timers are re-armed from their own deadline, not from `now`,
//! so a late poll replays every missed tick in order.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// One-shot: end of the current breathing phase.
    BreathPhase,
    /// Repeating: one second of the distraction game clock.
    Countdown,
    /// Repeating: roll for a new bubble.
    Spawn,
    /// Repeating: bubble drift.
    Motion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub kind: TimerKind,
    /// The deadline the timer was armed for.
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct Pending {
    id: TimerId,
    kind: TimerKind,
    due: DateTime<Utc>,
    period: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    pending: Vec<Pending>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot timer at `due`.
    pub fn schedule(&mut self, due: DateTime<Utc>, kind: TimerKind) -> TimerId {
        self.push(due, kind, None)
    }

    /// Arm a repeating timer, first firing at `from + period`.
    pub fn schedule_every(&mut self, from: DateTime<Utc>, period: Duration, kind: TimerKind) -> TimerId {
        let period = period.max(Duration::milliseconds(1));
        self.push(from + period, kind, Some(period))
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Drop every pending timer. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Take the earliest timer due at or before `now`. Ties go to the timer
    /// armed first.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<Fired> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= now)
            .min_by_key(|(_, p)| (p.due, p.id))
            .map(|(i, _)| i)?;

        let fired = {
            let p = &self.pending[idx];
            Fired {
                id: p.id,
                kind: p.kind,
                at: p.due,
            }
        };
        match self.pending[idx].period {
            Some(period) => self.pending[idx].due = fired.at + period,
            None => {
                self.pending.swap_remove(idx);
            }
        }
        Some(fired)
    }

    fn push(&mut self, due: DateTime<Utc>, kind: TimerKind, period: Option<Duration>) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.push(Pending { id, kind, due, period });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn one_shot_fires_once() {
        let mut q = TimerQueue::new();
        q.schedule(t0() + Duration::seconds(4), TimerKind::BreathPhase);
        assert!(q.pop_due(t0() + Duration::seconds(3)).is_none());
        let fired = q.pop_due(t0() + Duration::seconds(10)).unwrap();
        assert_eq!(fired.at, t0() + Duration::seconds(4));
        assert!(q.pop_due(t0() + Duration::seconds(10)).is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn repeating_timer_replays_missed_ticks() {
        let mut q = TimerQueue::new();
        q.schedule_every(t0(), Duration::seconds(1), TimerKind::Spawn);
        let now = t0() + Duration::milliseconds(3_500);
        let mut fired = Vec::new();
        while let Some(f) = q.pop_due(now) {
            fired.push(f.at);
        }
        assert_eq!(
            fired,
            vec![
                t0() + Duration::seconds(1),
                t0() + Duration::seconds(2),
                t0() + Duration::seconds(3),
            ]
        );
        assert_eq!(q.next_deadline(), Some(t0() + Duration::seconds(4)));
    }

    #[test]
    fn ties_fire_in_arming_order() {
        let mut q = TimerQueue::new();
        let first = q.schedule(t0(), TimerKind::Spawn);
        let second = q.schedule(t0(), TimerKind::Motion);
        assert_eq!(q.pop_due(t0()).unwrap().id, first);
        assert_eq!(q.pop_due(t0()).unwrap().id, second);
    }

    #[test]
    fn cancel_all_clears_everything() {
        let mut q = TimerQueue::new();
        let id = q.schedule(t0(), TimerKind::BreathPhase);
        q.schedule_every(t0(), Duration::milliseconds(50), TimerKind::Motion);
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
        assert_eq!(q.cancel_all(), 1);
        assert!(q.pop_due(t0() + Duration::hours(1)).is_none());
    }
}
