//! Plan command - fewest actions for one colour to exit every piece
//!
//! Opponents are ignored; blockers are the only obstacles.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use chexers_core::{plan, Action, BoardInput, CostTable, Puzzle, DEFAULT_PLAN_BUDGET};

#[derive(Args)]
pub struct PlanArgs {
    /// Board JSON file; plans for its requesting colour
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// Node expansions before giving up
    #[arg(long, default_value_t = DEFAULT_PLAN_BUDGET)]
    pub budget: usize,

    /// Output the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run plan command
pub fn run(args: PlanArgs) -> Result<()> {
    let input = BoardInput::load(&args.board)?;
    let board = input.board()?;
    let colour = input.colour;

    let pieces = board.pieces_of(colour);
    if pieces.is_empty() {
        bail!("{} has no pieces on the board", colour);
    }

    let blocks = board.blockers();
    let table = CostTable::build(&blocks);
    let estimate = Estimate {
        turns: table.position_cost(colour, &pieces),
        blended: table.blended_cost(colour, &pieces),
    };

    let puzzle = Puzzle::new(colour, blocks);
    let Some(actions) = plan(&puzzle, &pieces, args.budget) else {
        bail!("no plan for {} within {} expansions", colour, args.budget);
    };

    tracing::info!(%colour, pieces = pieces.len(), length = actions.len(), estimate = estimate.turns, "plan found");

    if args.json {
        print_json_plan(&actions, &estimate)?;
    } else {
        print_text_plan(&actions, &estimate);
    }
    Ok(())
}

/// Cost-table view of the starting position
#[derive(Serialize)]
struct Estimate {
    /// Summed per-piece turns, a lower bound on the plan length
    turns: u32,
    /// Harmonic blend of the per-piece turns
    blended: Option<f32>,
}

fn print_json_plan(actions: &[Action], estimate: &Estimate) -> Result<()> {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        length: usize,
        estimate: &'a Estimate,
        actions: &'a [Action],
    }

    let output = JsonOutput {
        length: actions.len(),
        estimate,
        actions,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_plan(actions: &[Action], estimate: &Estimate) {
    println!("=== Plan ({} actions, estimate {}) ===", actions.len(), estimate.turns);
    if let Some(blended) = estimate.blended {
        println!("Blended per-piece cost: {:.2}", blended);
    }
    for (i, action) in actions.iter().enumerate() {
        println!("{:>3}. {}", i + 1, action);
    }
}
