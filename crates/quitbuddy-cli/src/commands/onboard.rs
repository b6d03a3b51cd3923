use clap::Args;
use quitbuddy_core::{parse_date, MascotType, ProfileDraft, QuitPlan};

use super::{open_state, print_json, CliResult};

#[derive(Args)]
pub struct OnboardArgs {
    /// Cigarettes smoked per day
    #[arg(long)]
    cigarettes_per_day: u32,
    /// Years smoked
    #[arg(long)]
    years_smoked: u32,
    /// Price of one pack
    #[arg(long)]
    cost_per_pack: f64,
    /// Cigarettes in a pack (defaults to profile.default_cigarettes_per_pack)
    #[arg(long)]
    pack_size: Option<u32>,
    /// Quit date (yyyy-MM-dd); quits today when omitted
    #[arg(long)]
    quit_date: Option<String>,
    /// Companion: dragon, fox, sprout or robot
    #[arg(long, default_value = "dragon")]
    mascot: String,
    /// Name for the companion
    #[arg(long)]
    mascot_name: Option<String>,
    /// Smoking trigger (repeatable)
    #[arg(long = "trigger")]
    triggers: Vec<String>,
    /// Reason for quitting (repeatable)
    #[arg(long = "motivation")]
    motivations: Vec<String>,
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    country: Option<String>,
    /// Replace an existing profile
    #[arg(long)]
    force: bool,
}

pub fn run(args: OnboardArgs) -> CliResult {
    let mut app = open_state()?;
    if app.is_onboarded() && !args.force {
        return Err("already onboarded (use --force to start over)".into());
    }

    let quit_plan = match args.quit_date.as_deref() {
        Some(date) => QuitPlan::Later(parse_date(date)?),
        None => QuitPlan::Now,
    };
    let draft = ProfileDraft {
        age: args.age,
        gender: args.gender,
        country: args.country,
        cigarettes_per_day: args.cigarettes_per_day,
        years_smoked: args.years_smoked,
        cost_per_pack: args.cost_per_pack,
        cigarettes_per_pack: args.pack_size,
        quit_plan,
        triggers: args.triggers,
        motivations: args.motivations,
        mascot: args.mascot.parse::<MascotType>()?,
        mascot_name: args.mascot_name,
    };

    let event = app.complete_onboarding(draft)?;
    print_json(&event)
}
