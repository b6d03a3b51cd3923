use clap::Subcommand;

use super::{open_onboarded, print_json, CliResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Show goals against money saved so far
    List,
    /// Add a savings goal
    Add {
        name: String,
        /// Amount to save
        target: f64,
        #[arg(long, default_value = "🎯")]
        icon: String,
    },
}

pub fn run(action: GoalAction) -> CliResult {
    let mut app = open_onboarded()?;

    match action {
        GoalAction::List => print_json(&app.goal_progress()),
        GoalAction::Add { name, target, icon } => {
            let event = app.add_savings_goal(&name, target, &icon)?;
            print_json(&event)
        }
    }
}
