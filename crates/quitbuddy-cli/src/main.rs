use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "quitbuddy-cli", version, about = "QuitBuddy CLI")]
struct Cli {
    /// Log debug output to stderr (overridden by QUITBUDDY_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create your profile and pick a companion
    Onboard(commands::onboard::OnboardArgs),
    /// Profile and mascot management
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Record today's status
    Checkin(commands::log::CheckinArgs),
    /// Day log management
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Streak, savings and mascot overview
    Status {
        /// Print the raw dashboard as JSON
        #[arg(long)]
        json: bool,
    },
    /// Daily and weekly missions
    Mission {
        #[command(subcommand)]
        action: commands::mission::MissionAction,
    },
    /// Savings goals
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Health recovery milestones
    Health,
    /// Ride out a craving
    Sos {
        #[command(subcommand)]
        action: commands::sos::SosAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Delete all stored data
    Reset {
        /// Skip the safety check
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("QUITBUDDY_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Onboard(args) => commands::onboard::run(args),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Checkin(args) => commands::log::checkin(args),
        Commands::Log { action } => commands::log::run(action),
        Commands::Status { json } => commands::status::run(json),
        Commands::Mission { action } => commands::mission::run(action),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Health => commands::status::health(),
        Commands::Sos { action } => commands::sos::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Reset { yes } => commands::reset::run(yes),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
