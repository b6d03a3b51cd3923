pub mod config;
pub mod goal;
pub mod log;
pub mod mission;
pub mod onboard;
pub mod profile;
pub mod reset;
pub mod sos;
pub mod status;

use quitbuddy_core::{AppState, Config, Database, SystemClock};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;
pub type App = AppState<Database, SystemClock>;

/// Open the on-disk state with the user's config.
pub fn open_state() -> Result<App, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(AppState::load(db, SystemClock, Config::load_or_default()))
}

/// Like [`open_state`], but refuses to continue before onboarding.
pub fn open_onboarded() -> Result<App, Box<dyn std::error::Error>> {
    let app = open_state()?;
    if !app.is_onboarded() {
        return Err("not onboarded yet: run `quitbuddy-cli onboard` first".into());
    }
    Ok(app)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
