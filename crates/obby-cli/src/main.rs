//! Obby CLI - run and inspect obby courses from the terminal

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{best, course, play, resolve, validate};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "obby")]
#[command(about = "Headless obby course runner and inspector", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a course headlessly from a key script
    Play {
        /// Path to course file (built-in course if omitted)
        #[arg(long)]
        course: Option<String>,

        /// Path to input script (hold forward until the goal if omitted)
        #[arg(long)]
        script: Option<String>,

        /// Simulated seconds for the default script
        #[arg(long, default_value = "30")]
        duration: f64,

        /// Comma-separated clip names to resolve for the character
        #[arg(long, value_delimiter = ',')]
        clips: Vec<String>,

        /// Never call the reward service
        #[arg(long)]
        no_rewards: bool,

        /// Keep the best time in memory only
        #[arg(long)]
        no_save: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show how clip names map onto locomotion roles
    Resolve {
        /// Clip names as exported
        #[arg(required = true)]
        clips: Vec<String>,
    },

    /// Best-time operations
    #[command(subcommand)]
    Best(best::BestCommands),

    /// Course file operations
    #[command(subcommand)]
    Course(course::CourseCommands),

    /// Check a course file for errors
    Validate {
        /// Path to course file
        course: String,
    },
}

fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Play {
            course,
            script,
            duration,
            clips,
            no_rewards,
            no_save,
            format,
        } => play::run(play::PlayArgs {
            course,
            script,
            duration,
            clips,
            no_rewards,
            no_save,
            format,
        }),
        Commands::Resolve { clips } => resolve::run(&clips),
        Commands::Best(cmd) => best::run(cmd),
        Commands::Course(cmd) => course::run(cmd),
        Commands::Validate { course } => validate::run(&course),
    }
}
