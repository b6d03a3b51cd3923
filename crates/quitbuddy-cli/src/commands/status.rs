use super::{open_onboarded, print_json, CliResult};

pub fn run(json: bool) -> CliResult {
    let app = open_onboarded()?;
    let dash = app.dashboard();
    if json {
        return print_json(&dash);
    }

    let currency = &app.config().profile.currency_symbol;
    let streak = dash.streak;

    if let Some(m) = &dash.mascot {
        println!("{} the {:?} ({:?}, feeling {:?})", m.name, m.kind, m.stage, m.mood);
        if let Some((stage, days)) = m.next_stage {
            println!("  evolves to {stage:?} at a {days}-day streak");
        }
    }
    if let Some(metrics) = dash.metrics {
        if metrics.is_pre_quit {
            println!("quit day in {} day(s)", metrics.days_until_quit);
        }
        println!(
            "streak: {} current, {} longest, {} smoke-free days",
            streak.current, streak.longest, streak.total_smoke_free
        );
        if streak.stale_days > 1 {
            println!("  last check-in was {} days ago", streak.stale_days);
        }
        println!(
            "saved: {currency}{:.2}  avoided: {} cigarettes",
            metrics.total_money_saved, metrics.cigarettes_avoided
        );
    }
    if let Some(p) = dash.projection {
        println!(
            "per day {currency}{:.2}, per week {currency}{:.2}, per year {currency}{:.2}",
            p.daily, p.weekly, p.yearly
        );
    }
    println!(
        "today: {}",
        if dash.today_checked_in { "checked in" } else { "not checked in yet" }
    );
    println!("points: {}", dash.total_points);
    println!(
        "next health milestone: {} ({} day(s) left, {:.0}%)",
        dash.health.next.title, dash.health.days_left, dash.health.progress_pct
    );
    for goal in &dash.goals {
        println!(
            "goal {} {}: {currency}{:.2} / {currency}{:.2}{}",
            goal.icon,
            goal.name,
            goal.current_amount,
            goal.target_amount,
            if goal.reached { " reached!" } else { "" }
        );
    }
    Ok(())
}

pub fn health() -> CliResult {
    let app = open_onboarded()?;
    let progress = app.health();
    for status in &progress.milestones {
        let mark = if status.achieved { "x" } else { " " };
        println!(
            "[{mark}] {:<10} {}",
            status.milestone.title, status.milestone.description
        );
    }
    println!(
        "next: {} in {} day(s) ({:.0}%)",
        progress.next.title, progress.days_left, progress.progress_pct
    );
    Ok(())
}
