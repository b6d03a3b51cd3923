use clap::Subcommand;
use quitbuddy_core::MissionType;

use super::{open_onboarded, print_json, CliResult};

#[derive(Subcommand)]
pub enum MissionAction {
    /// Show missions with progress
    List {
        #[arg(long)]
        json: bool,
    },
    /// Mark a daily mission as done
    Complete {
        /// Mission id
        id: String,
    },
}

pub fn run(action: MissionAction) -> CliResult {
    let mut app = open_onboarded()?;

    match action {
        MissionAction::List { json } => {
            let views = app.missions();
            if json {
                return print_json(&views);
            }
            for view in &views {
                let m = &view.mission;
                let mark = if m.completed { "x" } else { " " };
                let kind = match m.kind {
                    MissionType::Daily => "daily",
                    MissionType::Weekly => "weekly",
                };
                println!(
                    "[{mark}] {:>2}  {:<20} {:<6} {}/{} ({}%)  +{} pts",
                    m.id, m.title, kind, m.progress, m.target, view.percent, m.reward
                );
            }
            println!("total points: {}", app.total_points());
        }
        MissionAction::Complete { id } => match app.complete_mission(&id)? {
            Some(event) => print_json(&event)?,
            None => println!("mission {id} cannot be completed"),
        },
    }
    Ok(())
}
