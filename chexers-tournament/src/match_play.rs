//! Match play - several games between the same three seats
//!
//! Level 2 - Phase-level implementation

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use chexers_core::{all_cells, Cell, Colour, EngineError};

use crate::config::MatchConfig;
use crate::game_runner::{GameOutcome, GameRunner};

/// Result of a match (multiple games)
#[derive(Clone, Debug, Serialize)]
pub struct MatchResult {
    /// Wins per colour, in turn order
    pub wins: [u32; 3],
    /// Games without a winner (ply cap or stalemate)
    pub draws: u32,
    /// Average game length in plies
    pub avg_plies: f32,
    /// Total games played
    pub games_played: u32,
    /// Individual game outcomes
    pub game_outcomes: Vec<GameOutcome>,
}

impl MatchResult {
    /// Create empty result
    pub fn empty() -> Self {
        Self {
            wins: [0; 3],
            draws: 0,
            avg_plies: 0.0,
            games_played: 0,
            game_outcomes: Vec::new(),
        }
    }

    /// Combine two results
    pub fn combine(&self, other: &MatchResult) -> MatchResult {
        let total_games = self.games_played + other.games_played;
        let avg_plies = if total_games > 0 {
            (self.avg_plies * self.games_played as f32
                + other.avg_plies * other.games_played as f32)
                / total_games as f32
        } else {
            0.0
        };

        let mut game_outcomes = self.game_outcomes.clone();
        game_outcomes.extend(other.game_outcomes.iter().cloned());

        MatchResult {
            wins: Colour::ALL.map(|c| self.wins[c.index()] + other.wins[c.index()]),
            draws: self.draws + other.draws,
            avg_plies,
            games_played: total_games,
            game_outcomes,
        }
    }

    /// Get win rate for a colour
    pub fn win_rate(&self, colour: Colour) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.wins[colour.index()] as f32 / self.games_played as f32
        }
    }

    /// Get draw rate
    pub fn draw_rate(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.draws as f32 / self.games_played as f32
        }
    }
}

/// Play a match sequentially (Level 2 phase)
pub fn play_match(config: &MatchConfig) -> Result<MatchResult, EngineError> {
    if config.games == 0 {
        return Ok(MatchResult::empty());
    }

    let layouts = prepare_layouts(config);
    let outcomes = execute_games(config, &layouts)?;
    Ok(aggregate_results(outcomes))
}

/// Play a match with parallel execution (Level 2 phase)
pub fn play_match_parallel(config: &MatchConfig) -> Result<MatchResult, EngineError> {
    if config.games == 0 {
        return Ok(MatchResult::empty());
    }

    let layouts = prepare_layouts(config);
    let outcomes = execute_games_parallel(config, &layouts)?;
    Ok(aggregate_results(outcomes))
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// One blocker layout per game, seeded from the base seed plus the game index
fn prepare_layouts(config: &MatchConfig) -> Vec<Vec<Cell>> {
    let base_seed = config.seed.unwrap_or(42);
    (0..config.games)
        .map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(i as u64));
            random_blockers(&mut rng, config.blockers)
        })
        .collect()
}

/// Execute games sequentially
fn execute_games(config: &MatchConfig, layouts: &[Vec<Cell>]) -> Result<Vec<GameOutcome>, EngineError> {
    let runner = GameRunner::new(config.seats.clone(), config.rules);
    layouts
        .iter()
        .enumerate()
        .map(|(index, blocks)| {
            let outcome = runner.play_game(blocks)?;
            tracing::info!(game = index, result = ?outcome.result, plies = outcome.plies, "game complete");
            Ok(outcome)
        })
        .collect()
}

/// Execute games in parallel using rayon
fn execute_games_parallel(
    config: &MatchConfig,
    layouts: &[Vec<Cell>],
) -> Result<Vec<GameOutcome>, EngineError> {
    layouts
        .par_iter()
        .enumerate()
        .map(|(index, blocks)| {
            let runner = GameRunner::new(config.seats.clone(), config.rules);
            let outcome = runner.play_game(blocks)?;
            tracing::info!(game = index, result = ?outcome.result, plies = outcome.plies, "game complete");
            Ok(outcome)
        })
        .collect()
}

/// Aggregate game outcomes into a match result
fn aggregate_results(outcomes: Vec<GameOutcome>) -> MatchResult {
    let mut result = MatchResult::empty();
    let mut total_plies = 0u64;

    for outcome in &outcomes {
        match outcome.winner() {
            Some(colour) => result.wins[colour.index()] += 1,
            None => result.draws += 1,
        }
        total_plies += outcome.plies as u64;
    }

    result.games_played = outcomes.len() as u32;
    if !outcomes.is_empty() {
        result.avg_plies = total_plies as f32 / outcomes.len() as f32;
    }
    result.game_outcomes = outcomes;
    result
}

// ============================================================================
// Level 4 - Utilities
// ============================================================================

/// Up to `count` distinct blocker cells, never on a start cell
pub fn random_blockers(rng: &mut ChaCha8Rng, count: usize) -> Vec<Cell> {
    let starts: Vec<Cell> = Colour::ALL.iter().flat_map(|c| c.start_cells()).collect();
    let mut candidates: Vec<Cell> = all_cells().filter(|c| !starts.contains(c)).collect();
    candidates.shuffle(rng);
    candidates.truncate(count);
    candidates.sort_unstable();
    candidates
}
