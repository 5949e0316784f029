//! Game runner - executes single games
//!
//! Level 3 - Step-level implementation

use std::collections::BTreeMap;

use serde::Serialize;

use chexers_core::{
    Action, BoardInput, Cell, Colour, EngineError, GameResult, GameState, Rules, Strategy,
};

use crate::config::AiConfig;

/// Outcome of a single game
#[derive(Clone, Debug, Serialize)]
pub struct GameOutcome {
    /// Final game result (stalemates are reported as draws)
    pub result: GameResult,
    /// Number of plies played, passes included
    pub plies: u32,
    /// Action history with the colour that played each one
    pub actions: Vec<(Colour, Action)>,
    /// Exit counts at the end
    pub exits: [u8; 3],
    /// Blockers the game was played with
    pub blocks: Vec<Cell>,
}

impl GameOutcome {
    /// Get winner (None for draw)
    pub fn winner(&self) -> Option<Colour> {
        match self.result {
            GameResult::Won(colour) => Some(colour),
            _ => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.winner().is_none()
    }
}

/// Plays games between three strategies and referees them
pub struct GameRunner {
    seats: [AiConfig; 3],
    rules: Rules,
}

impl GameRunner {
    pub fn new(seats: [AiConfig; 3], rules: Rules) -> Self {
        Self { seats, rules }
    }

    /// Play one game from the standard opening plus `blocks`.
    ///
    /// Each strategy sees the game only through the actions reported to it;
    /// the runner keeps its own referee state and validates every action.
    pub fn play_game(&self, blocks: &[Cell]) -> Result<GameOutcome, EngineError> {
        let opening = opening_input(blocks);
        let mut referee = opening.to_state(self.rules)?;
        let mut strategies = self.create_strategies(&opening)?;
        let mut actions = Vec::new();

        while referee.result() == GameResult::Ongoing {
            if referee.is_stalemate() {
                tracing::debug!(ply = referee.ply(), "stalemate, nobody can move");
                break;
            }

            let mover = referee.to_move();
            let action = strategies[mover.index()].action();
            referee = referee.apply_action(action)?;

            for strategy in strategies.iter_mut() {
                strategy.apply_observed_action(mover, action)?;
            }
            actions.push((mover, action));
        }

        let outcome = finish(&referee, actions, blocks);
        tracing::debug!(result = ?outcome.result, plies = outcome.plies, "game finished");
        Ok(outcome)
    }

    fn create_strategies(&self, opening: &BoardInput) -> Result<Vec<Strategy>, EngineError> {
        Colour::ALL
            .iter()
            .map(|&colour| {
                let input = BoardInput {
                    colour,
                    ..opening.clone()
                };
                let config = self.seats[colour.index()].strategy_config(self.rules);
                Strategy::from_input(&input, config)
            })
            .collect()
    }
}

/// Standard pieces plus blockers, red to move
fn opening_input(blocks: &[Cell]) -> BoardInput {
    let pieces: BTreeMap<Colour, Vec<Cell>> = Colour::ALL
        .iter()
        .map(|&c| (c, c.start_cells().to_vec()))
        .collect();
    BoardInput {
        colour: Colour::Red,
        pieces,
        blocks: blocks.to_vec(),
        exits: BTreeMap::new(),
        to_move: Some(Colour::Red),
    }
}

fn finish(referee: &GameState, actions: Vec<(Colour, Action)>, blocks: &[Cell]) -> GameOutcome {
    let result = match referee.result() {
        GameResult::Ongoing => GameResult::Draw,
        decided => decided,
    };
    GameOutcome {
        result,
        plies: referee.ply(),
        actions,
        exits: referee.exit_counts(),
        blocks: blocks.to_vec(),
    }
}
