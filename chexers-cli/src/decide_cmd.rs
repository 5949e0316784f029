//! Decide command - choose one action for a position
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), report_decision()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use chexers_core::{Action, BoardInput, DepthPolicy, SearchOutcome, Strategy, StrategyConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct DecideArgs {
    /// Board JSON file
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// Strategy config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Turn number (selects the depth of a scheduled depth policy)
    #[arg(long, default_value = "0")]
    pub turn: u32,

    /// Fixed search depth, overriding the config
    #[arg(long)]
    pub depth: Option<u32>,

    /// Time limit per decision in milliseconds
    #[arg(long)]
    pub time_limit: Option<u64>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run decide command
pub fn run(args: DecideArgs) -> Result<()> {
    let input = BoardInput::load(&args.board)?;
    let config = load_config(&args)?;

    let mut strategy = Strategy::from_input(&input, config).context("Invalid position")?;
    let board = input.board()?;
    let action = strategy.decide(&board, input.colour, input.exit_counts(), args.turn)?;

    tracing::info!(colour = %input.colour, %action, "decision made");

    report_decision(action, strategy.last_outcome())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Config file (or defaults) with command-line overrides applied
fn load_config(args: &DecideArgs) -> Result<StrategyConfig> {
    let mut config = match &args.config {
        Some(path) => StrategyConfig::load(path)?,
        None => StrategyConfig::default(),
    };
    if let Some(depth) = args.depth {
        config = config.with_depth_policy(DepthPolicy::Fixed { depth });
    }
    if let Some(ms) = args.time_limit {
        config = config.with_time_limit(ms);
    }
    config.validate()?;
    Ok(config)
}

/// Print the action as JSON
fn report_decision(action: Action, outcome: Option<&SearchOutcome>) -> Result<()> {
    #[derive(Serialize)]
    struct JsonOutput {
        #[serde(flatten)]
        action: Action,
        text: String,
        depth_reached: u32,
        nodes: u64,
        aborted: bool,
    }

    let output = JsonOutput {
        action,
        text: action.to_string(),
        depth_reached: outcome.map_or(0, |o| o.depth_reached),
        nodes: outcome.map_or(0, |o| o.nodes),
        aborted: outcome.is_some_and(|o| o.aborted),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
