//! Match command - self-play between three strategies
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), play(), report_results()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;

use chexers_core::Colour;
use chexers_tournament::{play_match, play_match_parallel, AiConfig, MatchConfig, MatchResult};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play
    #[arg(long, default_value = "6")]
    pub games: usize,

    /// MaxN search depth for every seat
    #[arg(long, default_value = "2")]
    pub depth: u32,

    /// Time limit per decision in milliseconds
    #[arg(long)]
    pub time_limit: Option<u64>,

    /// Random blockers per game
    #[arg(long, default_value = "0")]
    pub blockers: usize,

    /// Maximum plies per game
    #[arg(long, default_value = "768")]
    pub max_plies: u32,

    /// Play games one after another instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Build the match configuration
/// 2. Play the games
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args, seed);

    tracing::info!(
        "Starting match: {} games, depth={}, blockers={}",
        config.games,
        args.depth,
        config.blockers
    );

    let results = play(&config)?;

    report_results(&results, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_config(args: &MatchArgs, seed: Option<u64>) -> MatchConfig {
    let mut ai = AiConfig::maxn(args.depth);
    if let Some(ms) = args.time_limit {
        ai = ai.with_time_limit(ms);
    }

    let config = MatchConfig::symmetric(ai, args.games)
        .with_blockers(args.blockers)
        .with_max_plies(args.max_plies)
        .with_parallel(!args.sequential);
    match seed {
        Some(s) => config.with_seed(s),
        None => config,
    }
}

fn play(config: &MatchConfig) -> Result<MatchResult> {
    let result = if config.parallel {
        play_match_parallel(config)
    } else {
        play_match(config)
    };
    result.context("Match aborted by an illegal action")
}

fn report_results(results: &MatchResult, args: &MatchArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Print results as text
fn print_text_results(results: &MatchResult) {
    println!("\n=== Match Results ===");
    println!("Total games: {}", results.games_played);
    for colour in Colour::ALL {
        println!(
            "{:<6} wins: {} ({:.1}%)",
            colour.to_string(),
            results.wins[colour.index()],
            results.win_rate(colour) * 100.0
        );
    }
    println!("Draws:       {} ({:.1}%)", results.draws, results.draw_rate() * 100.0);
    println!("Avg plies:   {:.1}", results.avg_plies);
}
