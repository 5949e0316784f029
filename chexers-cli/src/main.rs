//! Chexers CLI - Command-line interface
//!
//! Commands:
//! - decide: Choose an action for a position
//! - plan: Single-colour plan that exits every piece
//! - hubs: Branching cells near a colour's goal edge
//! - match: Self-play between three strategies

mod decide_cmd;
mod hubs_cmd;
mod match_cmd;
mod plan_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chexers")]
#[command(about = "Three-player Chexers decision engine")]
struct Cli {
    /// Random seed for reproducible blocker layouts
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose an action for a position
    Decide(decide_cmd::DecideArgs),
    /// Plan the exits of one colour, ignoring opponents
    Plan(plan_cmd::PlanArgs),
    /// List hub cells near a colour's goal edge
    Hubs(hubs_cmd::HubsArgs),
    /// Play self-play games
    Match(match_cmd::MatchArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decide(args) => decide_cmd::run(args),
        Commands::Plan(args) => plan_cmd::run(args),
        Commands::Hubs(args) => hubs_cmd::run(args),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
    }
}
