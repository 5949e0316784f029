//! Hubs command - branching cells and configurations for one colour

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use chexers_core::hubs::DEFAULT_HUB_DEPTH;
use chexers_core::{find_hub_nodes, goal_hub_cells, BoardInput, Cell, CellSet, Colour, PathNode, Puzzle};

#[derive(Args)]
pub struct HubsArgs {
    /// Colour whose goal edge to analyse
    #[arg(long)]
    pub colour: Colour,

    /// Board JSON file for blockers (and pieces of `colour`)
    #[arg(long, value_name = "FILE")]
    pub board: Option<PathBuf>,

    /// Search depth
    #[arg(long, default_value_t = DEFAULT_HUB_DEPTH)]
    pub depth: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct HubReport {
    colour: Colour,
    /// (cell, depth from the goal edge), nearest first
    cells: Vec<(Cell, u32)>,
    /// First layer of hub configurations reachable from the board's pieces
    configurations: Vec<Vec<Cell>>,
    configuration_depth: Option<u32>,
}

/// Run hubs command
pub fn run(args: HubsArgs) -> Result<()> {
    let (blocks, pieces) = match &args.board {
        Some(path) => {
            let board = BoardInput::load(path)?.board()?;
            (board.blockers(), board.pieces_of(args.colour))
        }
        None => (CellSet::empty(), Vec::new()),
    };

    let goals = args.colour.goal_set(&blocks);
    let mut cells: Vec<(Cell, u32)> = goal_hub_cells(&goals, &blocks, args.depth).into_iter().collect();
    cells.sort_unstable_by_key(|&(cell, depth)| (depth, cell));

    let (configurations, configuration_depth) = if pieces.is_empty() {
        (Vec::new(), None)
    } else {
        let puzzle = Puzzle::new(args.colour, blocks);
        let hubs = find_hub_nodes(&puzzle, vec![PathNode::new(pieces)], args.depth);
        let depth = hubs.first().map(|h| h.g);
        (hubs.into_iter().map(|h| h.pieces().to_vec()).collect(), depth)
    };

    tracing::info!(colour = %args.colour, cells = cells.len(), configurations = configurations.len(), "hub analysis done");

    let report = HubReport {
        colour: args.colour,
        cells,
        configurations,
        configuration_depth,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text_report(&report);
    }
    Ok(())
}

fn print_text_report(report: &HubReport) {
    println!("=== Hub cells for {} ===", report.colour);
    for (cell, depth) in &report.cells {
        println!("  {} at depth {}", cell, depth);
    }
    if let Some(depth) = report.configuration_depth {
        println!("\n=== Hub configurations at depth {} ===", depth);
        for pieces in &report.configurations {
            let cells: Vec<String> = pieces.iter().map(|c| c.to_string()).collect();
            println!("  {}", cells.join(" "));
        }
    }
}
