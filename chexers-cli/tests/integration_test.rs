//! Integration tests for the chexers binary and the crates behind it
//!
//! Tests the full stack: board input, strategy, planner, hubs and self-play

use std::path::PathBuf;
use std::process::Command;

use chexers_core::{Action, BoardInput, Colour, GameResult, Rules};
use chexers_tournament::{play_match, AiConfig, GameRunner, MatchConfig};

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Write a board file unique to this test and return its path
fn board_file(name: &str, json: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("chexers-{}-{}.json", name, std::process::id()));
    std::fs::write(&path, json).unwrap();
    path
}

fn chexers(args: &[&str]) -> (bool, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_chexers"))
        .args(args)
        .output()
        .unwrap();
    (output.status.success(), String::from_utf8_lossy(&output.stdout).into_owned())
}

// ============================================================================
// BINARY
// ============================================================================

#[test]
fn test_decide_prints_action_json() {
    let path = board_file("decide", r#"{"colour":"red","pieces":{"red":[[0,2]]}}"#);
    let (ok, stdout) = chexers(&["decide", "--board", path.to_str().unwrap(), "--depth", "2"]);
    std::fs::remove_file(&path).ok();

    assert!(ok);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["action"], "MOVE");
    assert_eq!(json["from"], serde_json::json!([0, 2]));
    assert!(json["text"].as_str().unwrap().starts_with("MOVE from (0, 2)"));
}

#[test]
fn test_decide_rejects_invalid_board() {
    let path = board_file("invalid", r#"{"colour":"red","pieces":{"red":[[5,5]]}}"#);
    let (ok, _) = chexers(&["decide", "--board", path.to_str().unwrap()]);
    std::fs::remove_file(&path).ok();
    assert!(!ok);
}

#[test]
fn test_plan_prints_optimal_length() {
    let path = board_file("plan", r#"{"colour":"red","pieces":{"red":[[0,0]]}}"#);
    let (ok, stdout) = chexers(&["plan", "--board", path.to_str().unwrap(), "--json"]);
    std::fs::remove_file(&path).ok();

    assert!(ok);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["length"], 4);
    assert_eq!(json["actions"][3]["action"], "EXIT");
    // A lone piece three cells out: 3 turns estimated, blend equals the estimate
    assert_eq!(json["estimate"]["turns"], 3);
    assert_eq!(json["estimate"]["blended"], 3.0);
}

#[test]
fn test_hubs_lists_cells() {
    let (ok, stdout) = chexers(&["hubs", "--colour", "green", "--json"]);
    assert!(ok);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["colour"], "green");
    assert!(!json["cells"].as_array().unwrap().is_empty());
}

#[test]
fn test_unknown_colour_rejected() {
    let (ok, _) = chexers(&["hubs", "--colour", "purple"]);
    assert!(!ok);
}

// ============================================================================
// LIBRARIES
// ============================================================================

#[test]
fn test_games_end_within_ply_cap() {
    let rules = Rules { exits_to_win: 4, max_plies: 45 };
    let runner = GameRunner::new([AiConfig::maxn(1), AiConfig::maxn(2), AiConfig::maxn(1)], rules);
    let outcome = runner.play_game(&[]).unwrap();
    assert!(outcome.plies <= 45);
    assert!(matches!(outcome.result, GameResult::Won(_) | GameResult::Draw));
}

#[test]
fn test_match_with_random_blockers() {
    let config = MatchConfig::symmetric(AiConfig::maxn(1), 2)
        .with_blockers(4)
        .with_max_plies(30)
        .with_seed(11)
        .with_parallel(false);
    let result = play_match(&config).unwrap();
    assert_eq!(result.games_played, 2);
    for outcome in &result.game_outcomes {
        assert_eq!(outcome.blocks.len(), 4);
    }
}

#[test]
fn test_board_input_round_trip_through_json() {
    let input: BoardInput = serde_json::from_str(
        r#"{"colour":"blue","pieces":{"blue":[[1,2]]},"blocks":[[0,0]],"exits":{"blue":3}}"#,
    )
    .unwrap();
    let state = input.to_state(Rules::default()).unwrap();
    assert_eq!(state.to_move(), Colour::Blue);
    assert_eq!(state.player(Colour::Blue).exits, 3);
    assert!(state.legal_actions().iter().all(|a| *a != Action::Pass));
}
