//! Strategy: the per-colour decision maker a turn harness talks to
//!
//! A `Strategy` mirrors the game by applying every observed action, owns
//! the cost table for the current blocker layout and runs one MaxN search
//! per decision.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Colour, Occupant};
use crate::config::StrategyConfig;
use crate::cost::CostTable;
use crate::error::{EngineError, Result};
use crate::game::{Action, GameState, Rules};
use crate::maxn::{MaxN, SearchLimits, SearchOutcome};
use crate::node::SearchNode;

// ============================================================================
// BOARD INPUT
// ============================================================================

/// Explicit position as read from JSON.
///
/// `{"colour":"red","pieces":{"red":[[0,2]]},"blocks":[[1,1]],"exits":{"red":1}}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardInput {
    /// Colour asking for a decision
    pub colour: Colour,
    #[serde(default)]
    pub pieces: BTreeMap<Colour, Vec<Cell>>,
    #[serde(default)]
    pub blocks: Vec<Cell>,
    #[serde(default)]
    pub exits: BTreeMap<Colour, u8>,
    /// Defaults to `colour`
    #[serde(default)]
    pub to_move: Option<Colour>,
}

impl BoardInput {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read board {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse board {}", path.display()))
    }

    /// Board with blockers and pieces placed; rejects cells given twice
    pub fn board(&self) -> Result<Board> {
        let mut board = Board::new();
        for &cell in &self.blocks {
            board.place(cell, Occupant::Block)?;
        }
        for (&colour, cells) in &self.pieces {
            for &cell in cells {
                board.place(cell, Occupant::Piece(colour))?;
            }
        }
        Ok(board)
    }

    pub fn exit_counts(&self) -> [u8; 3] {
        Colour::ALL.map(|c| self.exits.get(&c).copied().unwrap_or(0))
    }

    pub fn to_state(&self, rules: Rules) -> Result<GameState> {
        let to_move = self.to_move.unwrap_or(self.colour);
        Ok(GameState::from_board(self.board()?, to_move, self.exit_counts(), rules))
    }
}

// ============================================================================
// STRATEGY
// ============================================================================

/// Decision maker for one colour
pub struct Strategy {
    colour: Colour,
    config: StrategyConfig,
    /// Mirror of the game, kept current by `apply_observed_action`
    state: GameState,
    /// Rebuilt when the blocker layout changes
    cost_table: Option<CostTable>,
    stop: Option<Arc<AtomicBool>>,
    last_outcome: Option<SearchOutcome>,
}

impl Strategy {
    /// Strategy for `colour` from the standard opening
    pub fn new(colour: Colour, config: StrategyConfig) -> Result<Self> {
        config.validate()?;
        let state = GameState::standard().with_rules(config.rules);
        Ok(Self::with_state(colour, config, state))
    }

    /// Strategy for the requesting colour of an explicit position
    pub fn from_input(input: &BoardInput, config: StrategyConfig) -> Result<Self> {
        config.validate()?;
        let state = input.to_state(config.rules)?;
        Ok(Self::with_state(input.colour, config, state))
    }

    fn with_state(colour: Colour, config: StrategyConfig, state: GameState) -> Self {
        Self {
            colour,
            config,
            state,
            cost_table: None,
            stop: None,
            last_outcome: None,
        }
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Mirrored game state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Statistics of the most recent search
    pub fn last_outcome(&self) -> Option<&SearchOutcome> {
        self.last_outcome.as_ref()
    }

    /// Shared flag that cancels a running search when raised
    pub fn set_stop_signal(&mut self, stop: Option<Arc<AtomicBool>>) {
        self.stop = stop;
    }

    /// Decide for `colour` from an external snapshot. Player states are
    /// derived from `board`; `turn` only selects the search depth.
    ///
    /// A strategy plays one colour: asking it to decide for another fails
    /// with `ColourMismatch`.
    pub fn decide(&mut self, board: &Board, colour: Colour, exits: [u8; 3], turn: u32) -> Result<Action> {
        if colour != self.colour {
            return Err(EngineError::ColourMismatch {
                own: self.colour,
                requested: colour,
            });
        }
        let state = GameState::from_board(board.clone(), colour, exits, self.config.rules);
        Ok(self.search(state, turn))
    }

    /// Decide from the mirrored state
    pub fn action(&mut self) -> Action {
        let state = self.state.clone().with_to_move(self.colour);
        let turn = self.state.ply() / 3;
        self.search(state, turn)
    }

    /// Apply an action some colour played (this one included) to the mirror
    pub fn apply_observed_action(&mut self, colour: Colour, action: Action) -> Result<()> {
        self.state = self.state.apply_action_for(colour, action)?;
        Ok(())
    }

    fn search(&mut self, state: GameState, turn: u32) -> Action {
        let blocks = state.board().blockers();
        let hub_depth = self.config.hub_depth;
        let table: &CostTable = match self.cost_table.take() {
            Some(table) if table.blocks() == blocks => self.cost_table.insert(table),
            _ => {
                tracing::debug!(colour = %self.colour, blockers = blocks.len(), "building cost table");
                self.cost_table
                    .insert(CostTable::build_with_hub_depth(&blocks, hub_depth))
            }
        };

        let mut limits = SearchLimits::default().with_depth(self.config.depth.depth_for_turn(turn));
        if let Some(ms) = self.config.time_limit_ms {
            limits = limits.with_time_limit(Duration::from_millis(ms));
        }
        if let Some(stop) = &self.stop {
            limits = limits.with_stop(Arc::clone(stop));
        }

        let outcome = MaxN::new(table, &self.config.weights, limits).search(&SearchNode::root(state));
        let action = outcome.action.unwrap_or(Action::Pass);

        tracing::debug!(
            colour = %self.colour,
            turn,
            depth = outcome.depth_reached,
            nodes = outcome.nodes,
            aborted = outcome.aborted,
            %action,
            "decided"
        );

        self.last_outcome = Some(outcome);
        action
    }
}
