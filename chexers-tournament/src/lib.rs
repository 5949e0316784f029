//! Chexers Tournament - Self-play between three strategies
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 2: play_match, play_match_parallel (phases)
//! - Level 3: GameRunner::play_game (steps)
//! - Level 4: utilities, configuration

mod config;
mod game_runner;
mod match_play;

pub use config::{AiConfig, MatchConfig};
pub use game_runner::{GameOutcome, GameRunner};
pub use match_play::{play_match, play_match_parallel, random_blockers, MatchResult};
