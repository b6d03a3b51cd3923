//! Integration tests for the craving SOS flow driven through app state.

use chrono::{Duration, NaiveDate};
use quitbuddy_core::mission::ids;
use quitbuddy_core::{
    AppState, BreathPhase, Clock, Config, Database, Event, ManualClock, MascotMood, ProfileDraft,
    SosMode, Technique,
};

fn app_with_clock() -> (AppState<Database, ManualClock>, ManualClock) {
    let clock = ManualClock::at_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    let mut app = AppState::load(Database::open_memory().unwrap(), clock.clone(), Config::default());
    app.complete_onboarding(ProfileDraft::default()).unwrap();
    (app, clock)
}

#[test]
fn test_breathing_flow_end_to_end() {
    let (mut app, clock) = app_with_clock();
    let mut session = app.open_craving_session(11);
    assert_eq!(app.mascot_mood(), MascotMood::Calm);

    assert!(session.start_breathing(clock.now()).is_some());

    let mut phases = Vec::new();
    let mut finished = None;
    // Drive like a UI loop polling every 500ms.
    for _ in 0..200 {
        clock.advance(Duration::milliseconds(500));
        for event in session.advance(clock.now()) {
            match event {
                Event::BreathPhaseChanged { phase, .. } => phases.push(phase),
                Event::InterventionFinished { technique, breaths, .. } => {
                    finished = Some((technique, breaths))
                }
                _ => {}
            }
        }
        if finished.is_some() {
            break;
        }
    }

    assert_eq!(finished, Some((Technique::Breathing, 5)));
    assert_eq!(phases.len(), 14);
    assert_eq!(phases.last(), Some(&BreathPhase::Exhale));
    assert_eq!(&phases[..3], &[BreathPhase::Hold, BreathPhase::Exhale, BreathPhase::Inhale]);
    assert_eq!(session.pending_timers(), 0);

    app.complete_mission(ids::BREATHING).unwrap();
    assert!(session.resolve(clock.now()).is_some());
    app.complete_mission(ids::CRAVING_CONQUERED).unwrap();
    app.close_craving_session(session);

    assert_eq!(app.mascot_mood(), MascotMood::Happy);
    assert_eq!(app.total_points(), 35);
}

#[test]
fn test_distraction_runs_full_minute_then_replays() {
    let (mut app, clock) = app_with_clock();
    let mut session = app.open_craving_session(5);
    let start = clock.now();
    session.start_distraction(start);

    clock.set(start + Duration::seconds(59));
    session.advance(clock.now());
    assert!(matches!(session.mode(), SosMode::Distracting(_)));

    clock.set(start + Duration::seconds(60));
    session.advance(clock.now());
    assert!(matches!(session.mode(), SosMode::Result(r) if r.technique == Technique::Distraction));

    assert!(session.need_more_time(clock.now()).is_some());
    assert_eq!(session.mode(), &SosMode::Menu);
    assert!(session.start_breathing(clock.now()).is_some());
    app.close_craving_session(session);
    assert_eq!(app.mascot_mood(), MascotMood::Happy);
}

#[test]
fn test_config_pacing_reaches_session() {
    let clock = ManualClock::at_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    let mut config = Config::default();
    config.set("breathing.cycles", "1").unwrap();
    config.set("breathing.exhale_secs", "2").unwrap();
    let mut app = AppState::load(Database::open_memory().unwrap(), clock.clone(), config);

    let mut session = app.open_craving_session(0);
    session.start_breathing(clock.now());
    // 4 + 4 + 2 seconds for one cycle.
    session.advance(clock.now() + Duration::seconds(9));
    assert!(matches!(session.mode(), SosMode::Breathing(_)));
    session.advance(clock.now() + Duration::seconds(10));
    assert!(matches!(session.mode(), SosMode::Result(r) if r.breaths == 1));
}

#[test]
fn test_sos_mode_serializes_with_tag() {
    let (mut app, clock) = app_with_clock();
    let mut session = app.open_craving_session(1);
    session.start_breathing(clock.now());
    let json = serde_json::to_value(session.mode()).unwrap();
    assert_eq!(json["mode"], "breathing");
    assert_eq!(json["phase"], "inhale");
    assert_eq!(json["count"], 0);
}
