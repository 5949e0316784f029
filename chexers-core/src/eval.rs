//! Position evaluation: one utility per colour

use serde::{Deserialize, Serialize};

use crate::board::Colour;
use crate::cost::CostTable;
use crate::game::{GameResult, GameState};

/// Utility vector indexed by `Colour::index()`
pub type Utility = [f32; 3];

/// Win value (effectively infinite)
pub const WIN_VALUE: f32 = 100000.0;

/// Weights for the leaf blend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Per piece exited since the search root
    pub exit_weight: f32,
    /// Per piece of material gained since the root (captures gain one,
    /// being eaten loses one)
    pub capture_weight: f32,
    /// Per turn of estimated exit cost saved since the root
    pub progress_weight: f32,
    /// Per piece missing to ever reach the exit target
    pub shortfall_weight: f32,
    /// Per piece standing on a hub cell near its own goal edge
    pub hub_weight: f32,
    /// Fraction of the opponents' mean score subtracted from each colour
    pub denial_weight: f32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            exit_weight: 10.0,
            capture_weight: 6.0,
            progress_weight: 1.0,
            shortfall_weight: 4.0,
            hub_weight: 0.1,
            denial_weight: 0.5,
        }
    }
}

/// Reference quantities taken at the search root
#[derive(Clone, Debug, PartialEq)]
pub struct Baseline {
    exits: [u8; 3],
    material: [usize; 3],
    cost: [u32; 3],
}

impl Baseline {
    pub fn new(state: &GameState, table: &CostTable) -> Self {
        Self {
            exits: state.exit_counts(),
            material: Colour::ALL.map(|c| state.player(c).material()),
            cost: Colour::ALL.map(|c| exit_cost(state, table, c)),
        }
    }
}

/// Estimated turns for the pieces `colour` still has to exit
fn exit_cost(state: &GameState, table: &CostTable, colour: Colour) -> u32 {
    let player = state.player(colour);
    let needed = state.rules().exits_to_win.saturating_sub(player.exits) as usize;
    table.exit_cost(colour, player.pieces(), needed)
}

/// Evaluate a position for all three colours.
///
/// `depth_left` is the remaining search depth; decided games score
/// `WIN_VALUE` adjusted so that earlier wins (and later losses) are preferred.
pub fn evaluate(
    state: &GameState,
    baseline: &Baseline,
    table: &CostTable,
    weights: &EvalWeights,
    depth_left: u32,
) -> Utility {
    if let GameResult::Won(winner) = state.result() {
        let bonus = depth_left as f32;
        return Colour::ALL.map(|c| {
            if c == winner {
                WIN_VALUE + bonus
            } else {
                -WIN_VALUE - bonus
            }
        });
    }

    let own = Colour::ALL.map(|c| own_score(state, baseline, table, weights, c));

    Colour::ALL.map(|c| {
        let [a, b] = c.opponents();
        let rivals = (own[a.index()] + own[b.index()]) / 2.0;
        own[c.index()] - weights.denial_weight * rivals
    })
}

/// Score of one colour before the denial term
fn own_score(
    state: &GameState,
    baseline: &Baseline,
    table: &CostTable,
    weights: &EvalWeights,
    colour: Colour,
) -> f32 {
    let i = colour.index();
    let player = state.player(colour);

    let exited = player.exits as f32 - baseline.exits[i] as f32;
    let material = player.material() as f32 - baseline.material[i] as f32;
    let reward = weights.exit_weight * exited + weights.capture_weight * material;

    let progress = baseline.cost[i] as f32 - exit_cost(state, table, colour) as f32;

    let target = state.rules().exits_to_win as usize;
    let shortfall = target.saturating_sub(player.material()) as f32;

    let hubs = table.hub_cells(colour);
    let on_hubs = player.pieces().iter().filter(|&&c| hubs.contains(c)).count() as f32;

    reward + weights.progress_weight * progress - weights.shortfall_weight * shortfall
        + weights.hub_weight * on_hubs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::game::Action;

    fn eval_after(state: &GameState, next: &GameState, weights: &EvalWeights) -> Utility {
        let table = CostTable::for_state(state);
        let baseline = Baseline::new(state, &table);
        evaluate(next, &baseline, &table, weights, 0)
    }

    #[test]
    fn test_standard_position_is_symmetric() {
        let game = GameState::standard();
        let table = CostTable::for_state(&game);
        let baseline = Baseline::new(&game, &table);
        let u = evaluate(&game, &baseline, &table, &EvalWeights::default(), 0);
        assert!((u[0] - u[1]).abs() < 1e-4);
        assert!((u[1] - u[2]).abs() < 1e-4);
    }

    #[test]
    fn test_progress_scores_higher() {
        let game = GameState::from_layout(&[(Colour::Red, Cell::new(0, 0))], &[], Colour::Red).unwrap();
        let forward = game
            .apply_action(Action::Move { from: Cell::new(0, 0), to: Cell::new(1, 0) })
            .unwrap();
        let backward = game
            .apply_action(Action::Move { from: Cell::new(0, 0), to: Cell::new(-1, 0) })
            .unwrap();
        let weights = EvalWeights::default();
        let f = eval_after(&game, &forward, &weights);
        let b = eval_after(&game, &backward, &weights);
        assert!(f[0] > b[0]);
    }

    #[test]
    fn test_capture_beats_plain_step() {
        let game = GameState::from_layout(
            &[(Colour::Red, Cell::new(0, 0)), (Colour::Green, Cell::new(1, 0))],
            &[],
            Colour::Red,
        )
        .unwrap();
        let jump = game
            .apply_action(Action::Jump { from: Cell::new(0, 0), to: Cell::new(2, 0) })
            .unwrap();
        let step = game
            .apply_action(Action::Move { from: Cell::new(0, 0), to: Cell::new(1, -1) })
            .unwrap();
        let weights = EvalWeights {
            denial_weight: 0.0,
            ..EvalWeights::default()
        };
        let after_jump = eval_after(&game, &jump, &weights);
        let after_step = eval_after(&game, &step, &weights);
        assert!(after_jump[Colour::Red.index()] > after_step[Colour::Red.index()]);
        assert!(after_jump[Colour::Green.index()] < after_step[Colour::Green.index()]);
    }

    #[test]
    fn test_progress_measured_from_root() {
        let root = GameState::from_layout(&[(Colour::Red, Cell::new(0, 0))], &[], Colour::Red).unwrap();
        // Two red steps toward (3, 0); green and blue have nothing to move
        let leaf = root
            .apply_action(Action::Move { from: Cell::new(0, 0), to: Cell::new(1, 0) })
            .and_then(|s| s.apply_action(Action::Pass))
            .and_then(|s| s.apply_action(Action::Pass))
            .and_then(|s| s.apply_action(Action::Move { from: Cell::new(1, 0), to: Cell::new(2, 0) }))
            .unwrap();
        let progress_only = EvalWeights {
            exit_weight: 0.0,
            capture_weight: 0.0,
            progress_weight: 1.0,
            shortfall_weight: 0.0,
            hub_weight: 0.0,
            denial_weight: 0.0,
        };
        // 3 turns at the root, 2 at the leaf; the last step alone saves nothing
        let u = eval_after(&root, &leaf, &progress_only);
        assert_eq!(u[Colour::Red.index()], 1.0);
    }

    #[test]
    fn test_win_dominates() {
        let game = GameState::from_layout(
            &[(Colour::Red, Cell::new(3, -1)), (Colour::Green, Cell::new(0, 0))],
            &[],
            Colour::Red,
        )
        .unwrap();
        let won = game.apply_action(Action::Exit { from: Cell::new(3, -1) }).unwrap();
        let table = CostTable::for_state(&game);
        let baseline = Baseline::new(&game, &table);
        let u = evaluate(&won, &baseline, &table, &EvalWeights::default(), 2);
        assert_eq!(u[0], WIN_VALUE + 2.0);
        assert_eq!(u[1], -WIN_VALUE - 2.0);
    }

    #[test]
    fn test_denial_lowers_score_when_rivals_gain() {
        let game = GameState::from_layout(
            &[(Colour::Red, Cell::new(-3, 0)), (Colour::Green, Cell::new(0, 0))],
            &[],
            Colour::Green,
        )
        .unwrap();
        // Green heads for its edge or backs away; red does nothing either way
        let forward = game
            .apply_action(Action::Move { from: Cell::new(0, 0), to: Cell::new(0, 1) })
            .unwrap();
        let backward = game
            .apply_action(Action::Move { from: Cell::new(0, 0), to: Cell::new(0, -1) })
            .unwrap();
        let weights = EvalWeights::default();
        let f = eval_after(&game, &forward, &weights);
        let b = eval_after(&game, &backward, &weights);
        assert!(f[Colour::Green.index()] > b[Colour::Green.index()]);
        assert!(f[Colour::Red.index()] < b[Colour::Red.index()]);
    }
}
