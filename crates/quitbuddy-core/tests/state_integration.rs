//! Integration tests for the application state container.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Duration, NaiveDate};
use quitbuddy_core::state::keys;
use quitbuddy_core::{
    AppState, Config, Database, DayLog, DayLogPatch, DayStatus, Event, KvStore, ManualClock,
    MascotStage, ProfileDraft, QuitPlan,
};
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn memory_state(today: NaiveDate) -> AppState<Database, ManualClock> {
    AppState::load(Database::open_memory().unwrap(), ManualClock::at_date(today), Config::default())
}

fn onboarded(today: NaiveDate) -> AppState<Database, ManualClock> {
    let mut app = memory_state(today);
    let draft = ProfileDraft {
        cigarettes_per_day: 10,
        cost_per_pack: 12.0,
        cigarettes_per_pack: Some(20),
        quit_plan: QuitPlan::Later(date(2024, 1, 1)),
        ..Default::default()
    };
    app.complete_onboarding(draft).unwrap();
    app
}

#[test]
fn test_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quitbuddy.db");
    let today = date(2024, 1, 3);

    {
        let db = Database::open_at(&path).unwrap();
        let mut app = AppState::load(db, ManualClock::at_date(today), Config::default());
        app.complete_onboarding(ProfileDraft::default()).unwrap();
        app.add_day_log(DayLog::new(date(2024, 1, 2), DayStatus::SmokeFree)).unwrap();
        app.check_in(DayStatus::SmokeFree, Some(4)).unwrap();
        app.complete_mission("1").unwrap();
        app.add_savings_goal("New shoes", 80.0, "👟").unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    let app = AppState::load(db, ManualClock::at_date(today), Config::default());
    assert!(app.is_onboarded());
    assert_eq!(app.day_logs().len(), 2);
    assert_eq!(app.day_log(today).and_then(|l| l.mood), Some(4));
    assert!(app.mission_tracker().get("1").unwrap().completed);
    assert_eq!(app.savings_goals().len(), 1);
    assert_eq!(app.streak().current, 2);
}

#[test]
fn test_streak_and_metrics_through_state() {
    let mut app = onboarded(date(2024, 1, 6));
    for day in 1..=5 {
        app.add_day_log(DayLog::new(date(2024, 1, day), DayStatus::SmokeFree)).unwrap();
    }

    let metrics = app.metrics().unwrap();
    assert_eq!(metrics.daily_rate, 6.0);
    assert_eq!(metrics.total_money_saved, 30.0);
    assert_eq!(metrics.cigarettes_avoided, 50);
    assert!(!metrics.is_pre_quit);

    app.add_day_log(DayLog::new(date(2024, 1, 6), DayStatus::Slip)).unwrap();
    let streak = app.streak();
    assert_eq!((streak.current, streak.longest, streak.total_smoke_free), (0, 5, 5));
}

#[test]
fn test_last_write_wins_per_date() {
    let mut app = onboarded(date(2024, 1, 2));
    let first = app.add_day_log(DayLog::new(date(2024, 1, 2), DayStatus::SmokeFree)).unwrap();
    let second = app.add_day_log(DayLog::new(date(2024, 1, 2), DayStatus::Relapse)).unwrap();

    assert!(matches!(first, Event::DayLogged { replaced: false, .. }));
    assert!(matches!(second, Event::DayLogged { replaced: true, .. }));
    assert_eq!(app.day_logs().len(), 1);
    assert_eq!(app.day_status(date(2024, 1, 2)), DayStatus::Relapse);
}

#[test]
fn test_patch_keeps_omitted_fields() {
    let mut app = onboarded(date(2024, 1, 2));
    let mut log = DayLog::new(date(2024, 1, 2), DayStatus::SmokeFree).with_mood(2);
    log.notes = Some("tough morning".into());
    app.add_day_log(log).unwrap();

    let patch = DayLogPatch {
        mood: Some(5),
        ..Default::default()
    };
    assert!(app.update_day_log(date(2024, 1, 2), patch).unwrap().is_some());
    let stored = app.day_log(date(2024, 1, 2)).unwrap();
    assert_eq!(stored.mood, Some(5));
    assert_eq!(stored.notes.as_deref(), Some("tough morning"));
    assert_eq!(stored.status, DayStatus::SmokeFree);

    assert!(app
        .update_day_log(date(2024, 1, 9), DayLogPatch::default())
        .unwrap()
        .is_none());
}

#[test]
fn test_mascot_evolves_but_never_regresses() {
    let clock = ManualClock::at_date(date(2024, 1, 1));
    let mut app = AppState::load(Database::open_memory().unwrap(), clock.clone(), Config::default());
    app.complete_onboarding(ProfileDraft::default()).unwrap();

    let stages = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&stages);
    app.subscribe(move |e| {
        if let Event::MascotEvolved { to, .. } = e {
            sink.borrow_mut().push(*to);
        }
    });

    for _ in 0..7 {
        app.check_in(DayStatus::SmokeFree, None).unwrap();
        clock.advance(Duration::days(1));
    }
    assert_eq!(app.user().unwrap().mascot.stage, MascotStage::Child);

    app.check_in(DayStatus::Relapse, None).unwrap();
    assert_eq!(app.streak().current, 0);
    assert_eq!(app.user().unwrap().mascot.stage, MascotStage::Child);
    assert_eq!(*stages.borrow(), vec![MascotStage::Child]);
}

#[test]
fn test_missions_keep_completion_invariant() {
    let mut app = onboarded(date(2024, 1, 3));
    app.complete_mission("2").unwrap();
    // Weekly missions are driven by the streak, not by completion.
    assert!(app.complete_mission("5").unwrap().is_none());
    assert!(app.complete_mission("2").unwrap().is_none());

    for m in app.mission_tracker().missions() {
        assert!(!m.completed || m.progress == m.target, "{m:?}");
    }
    assert_eq!(app.total_points(), 15);
}

#[test]
fn test_weekly_mission_tracks_streak() {
    let mut app = onboarded(date(2024, 1, 8));
    for day in 1..=7 {
        app.add_day_log(DayLog::new(date(2024, 1, day), DayStatus::SmokeFree)).unwrap();
    }
    let weekly = app
        .missions()
        .into_iter()
        .find(|v| v.mission.id == "5")
        .unwrap();
    assert!(weekly.mission.completed);
    assert_eq!(weekly.percent, 100);
    assert_eq!(app.total_points(), 100);
}

#[test]
fn test_goal_progress_uses_money_saved() {
    let mut app = onboarded(date(2024, 1, 3));
    app.add_savings_goal("Concert", 24.0, "🎵").unwrap();
    app.add_day_log(DayLog::new(date(2024, 1, 1), DayStatus::SmokeFree)).unwrap();
    app.add_day_log(DayLog::new(date(2024, 1, 2), DayStatus::SmokeFree)).unwrap();

    let progress = &app.goal_progress()[0];
    assert_eq!(progress.current_amount, 12.0);
    assert!(!progress.reached);
    assert!(app.add_savings_goal("", 10.0, "").is_err());
    assert_eq!(app.savings_goals().len(), 1);
}

#[test]
fn test_corrupt_profile_falls_back_to_not_onboarded() {
    let db = Database::open_memory().unwrap();
    db.kv_set(keys::USER, r#"{"id": 7}"#).unwrap();
    db.kv_set(keys::ONBOARDED, "true").unwrap();
    db.kv_set(keys::LOGS, r#"[{"date":"2024-01-01","status":"smoke-free"}]"#).unwrap();

    let app = AppState::load(db, ManualClock::at_date(date(2024, 1, 2)), Config::default());
    assert!(app.user().is_none());
    assert!(!app.is_onboarded());
    assert_eq!(app.day_logs().len(), 1);
    assert!(app.metrics().is_none());
}

#[test]
fn test_reset_clears_everything() {
    let mut app = onboarded(date(2024, 1, 3));
    app.check_in(DayStatus::SmokeFree, None).unwrap();
    app.complete_mission("1").unwrap();

    let event = app.reset().unwrap();
    assert!(matches!(event, Event::DataReset { .. }));
    assert!(!app.is_onboarded());
    assert!(app.day_logs().is_empty());
    assert!(!app.mission_tracker().get("1").unwrap().completed);
    for key in [keys::USER, keys::ONBOARDED, keys::LOGS, keys::MISSIONS, keys::GOALS] {
        assert_eq!(app.store().get(key).unwrap(), None, "{key} should be gone");
    }
}

#[test]
fn test_pre_quit_countdown() {
    let mut app = memory_state(date(2024, 1, 1));
    let draft = ProfileDraft {
        quit_plan: QuitPlan::Later(date(2024, 1, 4)),
        ..Default::default()
    };
    app.complete_onboarding(draft).unwrap();

    let metrics = app.metrics().unwrap();
    assert!(metrics.is_pre_quit);
    // Clock sits at noon on Jan 1: 2.5 days to go, rounded up.
    assert_eq!(metrics.days_until_quit, 3);
    assert_eq!(app.day_status(date(2024, 1, 2)), DayStatus::PreQuit);
}
