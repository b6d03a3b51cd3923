use clap::Subcommand;
use quitbuddy_core::{parse_date, MascotType};

use super::{open_onboarded, print_json, CliResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Print the profile as JSON
    Show,
    /// Change habit figures or the quit date
    Edit {
        #[arg(long)]
        cigarettes_per_day: Option<u32>,
        #[arg(long)]
        years_smoked: Option<u32>,
        #[arg(long)]
        cost_per_pack: Option<f64>,
        #[arg(long)]
        pack_size: Option<u32>,
        /// yyyy-MM-dd
        #[arg(long)]
        quit_date: Option<String>,
        #[arg(long)]
        mascot_name: Option<String>,
    },
    /// Swap companion species (dragon, fox, sprout, robot)
    Mascot {
        kind: String,
    },
    /// Put an accessory on the companion
    Equip {
        accessory: String,
    },
    /// Take an accessory off
    Unequip {
        accessory: String,
    },
}

pub fn run(action: ProfileAction) -> CliResult {
    let mut app = open_onboarded()?;

    match action {
        ProfileAction::Show => {
            print_json(&app.user())?;
        }
        ProfileAction::Edit {
            cigarettes_per_day,
            years_smoked,
            cost_per_pack,
            pack_size,
            quit_date,
            mascot_name,
        } => {
            let Some(mut profile) = app.user().cloned() else {
                return Err("no profile".into());
            };
            if let Some(n) = cigarettes_per_day {
                profile.cigarettes_per_day = n;
            }
            if let Some(n) = years_smoked {
                profile.years_smoked = n;
            }
            if let Some(cost) = cost_per_pack {
                profile.cost_per_pack = cost;
            }
            if let Some(n) = pack_size {
                profile.cigarettes_per_pack = n;
            }
            if let Some(date) = quit_date {
                profile.quit_date = parse_date(&date)?;
            }
            if let Some(name) = mascot_name {
                profile.mascot.name = name.trim().to_string();
            }
            if let Some(event) = app.update_profile(profile)? {
                print_json(&event)?;
            }
        }
        ProfileAction::Mascot { kind } => {
            let kind: MascotType = kind.parse()?;
            if let Some(event) = app.set_mascot_type(kind)? {
                print_json(&event)?;
            }
        }
        ProfileAction::Equip { accessory } => match app.equip_accessory(&accessory)? {
            Some(event) => print_json(&event)?,
            None => println!("{accessory} is already equipped"),
        },
        ProfileAction::Unequip { accessory } => match app.unequip_accessory(&accessory)? {
            Some(event) => print_json(&event)?,
            None => println!("{accessory} is not equipped"),
        },
    }
    Ok(())
}
