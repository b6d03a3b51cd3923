//! Per-calendar-day smoking status records.
//!
//! At most one [`DayLog`] exists per date. Writing a log for a date that is
//! already present replaces it in place (last write wins); partial edits go
//! through [`DayLogPatch`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Smoking status recorded for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayStatus {
    SmokeFree,
    Slip,
    Relapse,
    PreQuit,
    Future,
}

impl DayStatus {
    /// Whether the status takes part in streak math.
    pub fn counts_for_streak(self) -> bool {
        matches!(self, DayStatus::SmokeFree | DayStatus::Slip | DayStatus::Relapse)
    }

    pub fn label(self) -> &'static str {
        match self {
            DayStatus::SmokeFree => "Smoke-free",
            DayStatus::Slip => "Slip",
            DayStatus::Relapse => "Relapse",
            DayStatus::PreQuit => "Pre-quit",
            DayStatus::Future => "Future",
        }
    }
}

impl std::str::FromStr for DayStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "smoke-free" => Ok(DayStatus::SmokeFree),
            "slip" => Ok(DayStatus::Slip),
            "relapse" => Ok(DayStatus::Relapse),
            "pre-quit" => Ok(DayStatus::PreQuit),
            "future" => Ok(DayStatus::Future),
            other => Err(ValidationError::invalid(
                "status",
                format!("unknown day status '{other}'"),
            )),
        }
    }
}

/// One calendar day's check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLog {
    /// ISO `yyyy-MM-dd`; unique within a [`DayLogStore`].
    pub date: NaiveDate,
    pub status: DayStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cravings_count: Option<u32>,
}

impl DayLog {
    pub fn new(date: NaiveDate, status: DayStatus) -> Self {
        Self {
            date,
            status,
            mood: None,
            triggers: None,
            notes: None,
            cravings_count: None,
        }
    }

    pub fn with_mood(mut self, mood: u8) -> Self {
        self.mood = Some(mood);
        self
    }
}

/// Partial update for an existing [`DayLog`].
///
/// Fields that are `Some` override the stored value; `None` keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLogPatch {
    #[serde(default)]
    pub status: Option<DayStatus>,
    #[serde(default)]
    pub mood: Option<u8>,
    #[serde(default)]
    pub triggers: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cravings_count: Option<u32>,
}

impl DayLogPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(self, log: &mut DayLog) {
        if let Some(status) = self.status {
            log.status = status;
        }
        if let Some(mood) = self.mood {
            log.mood = Some(mood);
        }
        if let Some(triggers) = self.triggers {
            log.triggers = Some(triggers);
        }
        if let Some(notes) = self.notes {
            log.notes = Some(notes);
        }
        if let Some(count) = self.cravings_count {
            log.cravings_count = Some(count);
        }
    }
}

/// Ordered collection of day logs keyed by date.
///
/// Keeps insertion order; replacement keeps the original slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayLogStore {
    logs: Vec<DayLog>,
}

impl DayLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from raw records, collapsing duplicate dates so the
    /// last record for a date wins.
    pub fn from_logs(logs: impl IntoIterator<Item = DayLog>) -> Self {
        let mut store = Self::new();
        for log in logs {
            store.upsert(log);
        }
        store
    }

    /// Insert or replace the log for `log.date`. Returns the replaced record.
    pub fn upsert(&mut self, log: DayLog) -> Option<DayLog> {
        match self.logs.iter_mut().find(|l| l.date == log.date) {
            Some(slot) => Some(std::mem::replace(slot, log)),
            None => {
                self.logs.push(log);
                None
            }
        }
    }

    /// Merge `patch` into the log for `date`. No-op when the date has no log.
    pub fn patch(&mut self, date: NaiveDate, patch: DayLogPatch) -> Option<&DayLog> {
        let log = self.logs.iter_mut().find(|l| l.date == date)?;
        patch.apply(log);
        Some(log)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayLog> {
        self.logs.iter().find(|l| l.date == date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.get(date).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DayLog> {
        self.logs.iter()
    }

    pub fn as_slice(&self) -> &[DayLog] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn clear(&mut self) {
        self.logs.clear();
    }
}

impl<'a> IntoIterator for &'a DayLogStore {
    type Item = &'a DayLog;
    type IntoIter = std::slice::Iter<'a, DayLog>;

    fn into_iter(self) -> Self::IntoIter {
        self.logs.iter()
    }
}

/// Parse an ISO `yyyy-MM-dd` date key.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn upsert_replaces_existing_date() {
        let mut store = DayLogStore::new();
        assert!(store.upsert(DayLog::new(d("2024-01-01"), DayStatus::Slip)).is_none());
        store.upsert(DayLog::new(d("2024-01-02"), DayStatus::SmokeFree));

        let replaced = store.upsert(DayLog::new(d("2024-01-01"), DayStatus::SmokeFree).with_mood(4));
        assert_eq!(replaced.map(|l| l.status), Some(DayStatus::Slip));
        assert_eq!(store.len(), 2);
        assert_eq!(store.as_slice()[0].date, d("2024-01-01"));
        assert_eq!(store.get(d("2024-01-01")).unwrap().mood, Some(4));
    }

    #[test]
    fn patch_keeps_omitted_fields() {
        let mut store = DayLogStore::new();
        let mut log = DayLog::new(d("2024-03-10"), DayStatus::SmokeFree).with_mood(3);
        log.notes = Some("tough morning".into());
        store.upsert(log);

        let patch = DayLogPatch {
            cravings_count: Some(4),
            notes: Some("better by noon".into()),
            ..Default::default()
        };
        let updated = store.patch(d("2024-03-10"), patch).unwrap();
        assert_eq!(updated.status, DayStatus::SmokeFree);
        assert_eq!(updated.mood, Some(3));
        assert_eq!(updated.cravings_count, Some(4));
        assert_eq!(updated.notes.as_deref(), Some("better by noon"));
    }

    #[test]
    fn patch_missing_date_is_noop() {
        let mut store = DayLogStore::new();
        let patch = DayLogPatch {
            status: Some(DayStatus::Relapse),
            ..Default::default()
        };
        assert!(store.patch(d("2024-03-10"), patch).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn from_logs_collapses_duplicates() {
        let store = DayLogStore::from_logs(vec![
            DayLog::new(d("2024-01-01"), DayStatus::SmokeFree),
            DayLog::new(d("2024-01-01"), DayStatus::Relapse),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(d("2024-01-01")).unwrap().status, DayStatus::Relapse);
    }

    #[test]
    fn serializes_with_kebab_status_and_camel_fields() {
        let mut log = DayLog::new(d("2024-01-05"), DayStatus::SmokeFree);
        log.cravings_count = Some(2);
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["date"], "2024-01-05");
        assert_eq!(json["status"], "smoke-free");
        assert_eq!(json["cravingsCount"], 2);
        assert!(json.get("mood").is_none());
    }

    #[test]
    fn status_parses_from_persisted_tags() {
        assert_eq!("pre-quit".parse::<DayStatus>().unwrap(), DayStatus::PreQuit);
        assert!("smoked".parse::<DayStatus>().is_err());
    }

    #[test]
    fn parse_date_rejects_non_iso() {
        assert!(parse_date("01/02/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_status() -> impl Strategy<Value = DayStatus> {
            prop_oneof![
                Just(DayStatus::SmokeFree),
                Just(DayStatus::Slip),
                Just(DayStatus::Relapse),
            ]
        }

        proptest! {
            #[test]
            fn last_write_per_date_wins(writes in prop::collection::vec((0i64..10, arb_status()), 0..40)) {
                let base = d("2024-01-01");
                let mut store = DayLogStore::new();
                for (offset, status) in &writes {
                    store.upsert(DayLog::new(base + chrono::Duration::days(*offset), *status));
                }

                let mut dates: Vec<i64> = writes.iter().map(|(o, _)| *o).collect();
                dates.sort_unstable();
                dates.dedup();
                prop_assert_eq!(store.len(), dates.len());

                for offset in dates {
                    let last = writes.iter().rev().find(|(o, _)| *o == offset).map(|(_, s)| *s);
                    let date = base + chrono::Duration::days(offset);
                    prop_assert_eq!(store.get(date).map(|l| l.status), last);
                }
            }
        }
    }
}
