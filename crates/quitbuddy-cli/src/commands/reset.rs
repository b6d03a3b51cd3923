use super::{open_state, print_json, CliResult};

pub fn run(yes: bool) -> CliResult {
    if !yes {
        return Err("this deletes your profile, logs, missions and goals; pass --yes to confirm".into());
    }
    let mut app = open_state()?;
    let event = app.reset()?;
    print_json(&event)
}
