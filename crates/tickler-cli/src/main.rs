use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tickler-cli", version, about = "Tickler CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview upcoming occurrences for a reminder schedule
    Preview {
        #[command(flatten)]
        schedule: commands::ScheduleArgs,
        /// Number of occurrences to show
        #[arg(long, default_value = "3")]
        limit: usize,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Describe a cadence in words
    Describe {
        #[command(flatten)]
        schedule: commands::ScheduleArgs,
    },
    /// Watch a JSON task file and dispatch due reminders
    Watch {
        /// Path to the task file
        #[arg(long)]
        file: std::path::PathBuf,
        /// Seconds between task file reloads
        #[arg(long, default_value = "5")]
        interval_secs: u64,
        /// Reconcile and tick a single time, then exit
        #[arg(long)]
        once: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Preview {
            schedule,
            limit,
            json,
        } => commands::preview::run(schedule, limit, json),
        Commands::Describe { schedule } => commands::describe::run(schedule),
        Commands::Watch {
            file,
            interval_secs,
            once,
        } => commands::watch::run(file, interval_secs, once),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
