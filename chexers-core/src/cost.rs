//! Per-piece turn estimates and the cost table built from them

use crate::board::{all_cells, Cell, CellSet, Colour, NUM_CELLS};
use crate::game::GameState;
use crate::hubs::{goal_hub_cells, DEFAULT_HUB_DEPTH};

/// Estimate for a piece whose colour has no reachable goal
pub const UNREACHABLE_TURNS: u32 = 64;

/// Turns for a piece on `cell` to reach the nearest goal and exit.
///
/// Hex distance `d` to the nearest goal, halved for jumps: even `d` takes
/// `d/2 + 1` turns, odd `d` takes `(d-1)/2 + 2`. Blockers and other pieces
/// are ignored, so this ranks positions rather than solving them.
pub fn estimate_turns(cell: Cell, goals: &CellSet) -> u32 {
    let nearest = goals.iter().map(|g| cell.distance_to(g) as u32).min();
    match nearest {
        None => UNREACHABLE_TURNS,
        Some(d) if d % 2 == 0 => d / 2 + 1,
        Some(d) => (d - 1) / 2 + 2,
    }
}

/// Harmonic mean of positive values; `None` if empty or any value is not positive
pub fn harmonic_mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() || values.iter().any(|&v| v <= 0.0) {
        return None;
    }
    let inverse_sum: f32 = values.iter().map(|v| 1.0 / v).sum();
    Some(values.len() as f32 / inverse_sum)
}

/// Turn estimates for every (colour, cell), plus hub cells near each goal edge.
///
/// Depends only on the blocker layout, so one table serves a whole game.
#[derive(Clone, Debug)]
pub struct CostTable {
    turns: [[u32; NUM_CELLS]; 3],
    hubs: [CellSet; 3],
    blocks: CellSet,
}

impl CostTable {
    pub fn build(blocks: &CellSet) -> Self {
        Self::build_with_hub_depth(blocks, DEFAULT_HUB_DEPTH)
    }

    pub fn build_with_hub_depth(blocks: &CellSet, hub_depth: u32) -> Self {
        let mut turns = [[UNREACHABLE_TURNS; NUM_CELLS]; 3];
        let mut hubs = [CellSet::empty(); 3];

        for colour in Colour::ALL {
            let goals = colour.goal_set(blocks);
            for cell in all_cells() {
                turns[colour.index()][cell.index()] = estimate_turns(cell, &goals);
            }
            hubs[colour.index()] = goal_hub_cells(&goals, blocks, hub_depth)
                .into_keys()
                .collect();
        }

        Self {
            turns,
            hubs,
            blocks: *blocks,
        }
    }

    pub fn for_state(state: &GameState) -> Self {
        Self::build(&state.board().blockers())
    }

    /// Blocker layout this table was built for
    pub fn blocks(&self) -> CellSet {
        self.blocks
    }

    pub fn turns(&self, colour: Colour, cell: Cell) -> u32 {
        if !cell.is_valid() {
            return UNREACHABLE_TURNS;
        }
        self.turns[colour.index()][cell.index()]
    }

    pub fn hub_cells(&self, colour: Colour) -> CellSet {
        self.hubs[colour.index()]
    }

    /// Sum of estimates over all pieces
    pub fn position_cost(&self, colour: Colour, pieces: &[Cell]) -> u32 {
        pieces.iter().map(|&c| self.turns(colour, c)).sum()
    }

    /// Sum of the `needed` cheapest estimates: only the pieces that still
    /// have to exit count toward a win
    pub fn exit_cost(&self, colour: Colour, pieces: &[Cell], needed: usize) -> u32 {
        let mut costs: Vec<u32> = pieces.iter().map(|&c| self.turns(colour, c)).collect();
        costs.sort_unstable();
        costs.into_iter().take(needed).sum()
    }

    /// Single blended score for a set of pieces (lower is better)
    pub fn blended_cost(&self, colour: Colour, pieces: &[Cell]) -> Option<f32> {
        let costs: Vec<f32> = pieces.iter().map(|&c| self.turns(colour, c) as f32).collect();
        harmonic_mean(&costs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_parity_rule() {
        let goals = Colour::Red.goal_set(&CellSet::empty());
        // On a goal: just exit
        assert_eq!(estimate_turns(Cell::new(3, -1), &goals), 1);
        // d = 1: move then exit
        assert_eq!(estimate_turns(Cell::new(2, -1), &goals), 2);
        // d = 2: jump then exit
        assert_eq!(estimate_turns(Cell::new(1, 0), &goals), 2);
        // d = 3
        assert_eq!(estimate_turns(Cell::new(0, 0), &goals), 3);
        // d = 6 from the far edge
        assert_eq!(estimate_turns(Cell::new(-3, 0), &goals), 4);
    }

    #[test]
    fn test_estimate_without_goals() {
        assert_eq!(estimate_turns(Cell::new(0, 0), &CellSet::empty()), UNREACHABLE_TURNS);
    }

    #[test]
    fn test_table_matches_direct_estimate() {
        let blocks: CellSet = [Cell::new(3, -3), Cell::new(0, 0)].into_iter().collect();
        let table = CostTable::build(&blocks);
        for colour in Colour::ALL {
            let goals = colour.goal_set(&blocks);
            for cell in all_cells() {
                assert_eq!(table.turns(colour, cell), estimate_turns(cell, &goals));
            }
        }
        assert_eq!(table.blocks(), blocks);
    }

    #[test]
    fn test_blocked_goal_raises_cost() {
        let open = CostTable::build(&CellSet::empty());
        let blocks: CellSet = [Cell::new(3, -3)].into_iter().collect();
        let blocked = CostTable::build(&blocks);
        assert_eq!(open.turns(Colour::Red, Cell::new(3, -3)), 1);
        assert_eq!(blocked.turns(Colour::Red, Cell::new(3, -3)), 2);
    }

    #[test]
    fn test_exit_cost_takes_cheapest() {
        let table = CostTable::build(&CellSet::empty());
        let pieces = [Cell::new(3, -1), Cell::new(0, 0), Cell::new(-3, 0)];
        assert_eq!(table.position_cost(Colour::Red, &pieces), 1 + 3 + 4);
        assert_eq!(table.exit_cost(Colour::Red, &pieces, 2), 1 + 3);
        assert_eq!(table.exit_cost(Colour::Red, &pieces, 10), 8);
        assert_eq!(table.exit_cost(Colour::Red, &pieces, 0), 0);
    }

    #[test]
    fn test_harmonic_mean() {
        assert_eq!(harmonic_mean(&[]), None);
        assert_eq!(harmonic_mean(&[0.0, 1.0]), None);
        let h = harmonic_mean(&[1.0, 4.0, 4.0]).unwrap();
        assert!((h - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_blended_cost_leans_toward_cheap_pieces() {
        let table = CostTable::build(&CellSet::empty());
        let pieces = [Cell::new(3, -1), Cell::new(-3, 0)];
        // Turns 1 and 4: harmonic mean 1.6, below the arithmetic 2.5
        let blended = table.blended_cost(Colour::Red, &pieces).unwrap();
        assert!((blended - 1.6).abs() < 1e-5);
        assert_eq!(table.blended_cost(Colour::Red, &[]), None);
    }
}
