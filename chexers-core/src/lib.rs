//! Chexers Core - Game rules and the three-player search engine
//!
//! This crate provides:
//! - Board geometry (radius-3 hex grid with axial coordinates)
//! - Game state, move generation and action application
//! - Per-piece turn estimates and goal-edge hub analysis
//! - A single-agent planner for one colour among blockers
//! - MaxN search with iterative deepening and cooperative cancellation
//! - The `Strategy` façade a turn harness drives

pub mod board;
pub mod error;
pub mod game;
pub mod cost;
pub mod hubs;
pub mod path;
pub mod eval;
pub mod node;
pub mod maxn;
pub mod config;
pub mod strategy;

// Re-exports for convenient access
pub use board::{all_cells, Board, Cell, CellSet, Colour, Occupant, BOARD_RADIUS, DIRECTIONS, NUM_CELLS};
pub use error::EngineError;
pub use game::{Action, GameResult, GameState, PlayerState, Rules, CAPTURE_IMMUNITY};
pub use cost::{estimate_turns, CostTable, UNREACHABLE_TURNS};
pub use hubs::{find_hub_nodes, goal_hub_cells, HUB_BRANCHING};
pub use path::{plan, PathNode, Puzzle, DEFAULT_PLAN_BUDGET};
pub use eval::{evaluate, Baseline, EvalWeights, Utility, WIN_VALUE};
pub use node::SearchNode;
pub use maxn::{MaxN, SearchLimits, SearchOutcome, MAX_SEARCH_DEPTH};
pub use config::{DepthPolicy, StrategyConfig};
pub use strategy::{BoardInput, Strategy};
