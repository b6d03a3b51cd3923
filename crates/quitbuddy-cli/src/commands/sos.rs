use std::io::BufRead;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use clap::{Args, Subcommand};
use quitbuddy_core::mission::ids;
use quitbuddy_core::{CravingSession, Event, SosMode, Technique};

use super::{open_onboarded, App, CliResult};

/// Longest the loop sleeps between input checks.
const POLL: Duration = Duration::from_millis(200);

#[derive(Subcommand)]
pub enum SosAction {
    /// Guided breathing: ride the craving out
    Breathe(SosArgs),
    /// Bubble game: type a bubble id and Enter to pop it
    Distract(SosArgs),
}

#[derive(Args)]
pub struct SosArgs {
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
    /// Mark the craving as passed without asking
    #[arg(long)]
    resolve: bool,
}

pub fn run(action: SosAction) -> CliResult {
    let (technique, args) = match action {
        SosAction::Breathe(args) => (Technique::Breathing, args),
        SosAction::Distract(args) => (Technique::Distraction, args),
    };
    let mut app = open_onboarded()?;
    let seed = app.now().timestamp_nanos_opt().unwrap_or_default() as u64;
    let mut session = app.open_craving_session(seed);
    let input = spawn_input();

    let started = match technique {
        Technique::Breathing => session.start_breathing(app.now()),
        Technique::Distraction => session.start_distraction(app.now()),
    };
    if let Some(event) = started {
        render(&event, args.json)?;
    }

    let finished = drive(&app, &mut session, &input, args.json)?;
    if finished {
        if technique == Technique::Breathing {
            complete(&mut app, ids::BREATHING, args.json)?;
        }
        let passed = args.resolve || ask_resolved(&input, args.json);
        if passed {
            if let Some(event) = session.resolve(app.now()) {
                render(&event, args.json)?;
                complete(&mut app, ids::CRAVING_CONQUERED, args.json)?;
            }
        } else if let Some(event) = session.need_more_time(app.now()) {
            render(&event, args.json)?;
        }
    }

    app.close_craving_session(session);
    Ok(())
}

/// Run the exercise in real time. True when it reached the result screen,
/// false when the user stopped it.
fn drive(app: &App, session: &mut CravingSession, input: &Receiver<String>, json: bool) -> Result<bool, Box<dyn std::error::Error>> {
    loop {
        for line in input.try_iter() {
            let line = line.trim();
            if line.eq_ignore_ascii_case("q") {
                if let Some(event) = session.cancel(app.now()) {
                    render(&event, json)?;
                }
                return Ok(false);
            }
            match line.parse::<u64>() {
                Ok(id) => match session.pop_bubble(id, app.now()) {
                    Some(event) => render(&event, json)?,
                    None => tracing::debug!(id, "no such bubble"),
                },
                Err(_) if line.is_empty() => {}
                Err(_) => tracing::debug!(line, "ignoring input"),
            }
        }

        for event in session.advance(app.now()) {
            render(&event, json)?;
        }

        match session.mode() {
            SosMode::Result(_) => return Ok(true),
            SosMode::Menu => return Ok(false),
            SosMode::Breathing(_) | SosMode::Distracting(_) => {}
        }

        let wait = session
            .next_deadline()
            .and_then(|due| (due - app.now()).to_std().ok())
            .unwrap_or(Duration::ZERO)
            .min(POLL);
        thread::sleep(wait);
    }
}

fn complete(app: &mut App, mission_id: &str, json: bool) -> CliResult {
    if let Some(event) = app.complete_mission(mission_id)? {
        render(&event, json)?;
    }
    Ok(())
}

fn ask_resolved(input: &Receiver<String>, json: bool) -> bool {
    if !json {
        println!("Did the craving pass? [y/N]");
    }
    // A closed stdin counts as "not yet".
    input
        .recv()
        .map(|line| line.trim().eq_ignore_ascii_case("y"))
        .unwrap_or(false)
}

fn spawn_input() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn render(event: &Event, json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        Event::BreathingStarted { cycles, .. } => {
            println!("Let's breathe together for {cycles} cycles. q + Enter to stop.");
            println!("{}", quitbuddy_core::BreathPhase::Inhale.prompt());
        }
        Event::BreathPhaseChanged { phase, breaths, .. } => {
            println!("[{breaths}] {}", phase.prompt());
        }
        Event::DistractionStarted { duration_secs, .. } => {
            println!("Pop as many bubbles as you can in {duration_secs}s. Type an id + Enter, q to stop.");
        }
        Event::BubbleSpawned { bubble_id, x, .. } => {
            println!("  bubble #{bubble_id} at {x:.0}%");
        }
        Event::BubblePopped { score, .. } => println!("  pop! score {score}"),
        Event::InterventionFinished { technique, breaths, score, .. } => match technique {
            Technique::Breathing => println!("Well done: {breaths} full breaths."),
            Technique::Distraction => println!("Time's up! You popped {score} bubbles."),
        },
        Event::InterventionCancelled { .. } => println!("Stopped."),
        Event::InterventionReplayed { .. } => {
            println!("That's okay. Come back whenever you need another round.")
        }
        Event::CravingResolved { .. } => println!("Craving conquered!"),
        Event::MissionCompleted { mission_id, reward, .. } => {
            println!("Mission {mission_id} complete: +{reward} points")
        }
        _ => {}
    }
    Ok(())
}
