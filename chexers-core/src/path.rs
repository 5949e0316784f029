//! Single-agent search: one colour's pieces among fixed blockers
//!
//! The puzzle ignores opponents entirely. It backs the offline planner
//! (`plan`) and the hub analysis in `hubs`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;

use crate::board::{Cell, CellSet, Colour};
use crate::cost::estimate_turns;
use crate::game::Action;

/// Node budget for `plan` before giving up
pub const DEFAULT_PLAN_BUDGET: usize = 200_000;

/// One configuration of a colour's pieces, reached after `g` actions
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathNode {
    /// Sorted
    pieces: Vec<Cell>,
    pub g: u32,
    /// Action that produced this node (None at a start node)
    pub action: Option<Action>,
}

impl PathNode {
    pub fn new(mut pieces: Vec<Cell>) -> Self {
        pieces.sort_unstable();
        pieces.dedup();
        Self { pieces, g: 0, action: None }
    }

    pub fn pieces(&self) -> &[Cell] {
        &self.pieces
    }

    /// Visited-set key: the sorted configuration
    pub fn key(&self) -> Vec<Cell> {
        self.pieces.clone()
    }

    pub fn is_solved(&self) -> bool {
        self.pieces.is_empty()
    }

    fn child(&self, from: Cell, to: Option<Cell>, action: Action) -> Self {
        let mut pieces: Vec<Cell> = self.pieces.iter().copied().filter(|&c| c != from).collect();
        if let Some(to) = to {
            pieces.push(to);
            pieces.sort_unstable();
        }
        Self {
            pieces,
            g: self.g + 1,
            action: Some(action),
        }
    }
}

/// Static context for single-agent search
#[derive(Clone, Debug)]
pub struct Puzzle {
    pub colour: Colour,
    pub goals: CellSet,
    pub blocks: CellSet,
}

impl Puzzle {
    pub fn new(colour: Colour, blocks: CellSet) -> Self {
        Self {
            colour,
            goals: colour.goal_set(&blocks),
            blocks,
        }
    }

    fn is_free(&self, node: &PathNode, cell: Cell) -> bool {
        cell.is_valid() && !self.blocks.contains(cell) && node.pieces.binary_search(&cell).is_err()
    }

    fn is_occupied(&self, node: &PathNode, cell: Cell) -> bool {
        self.blocks.contains(cell) || node.pieces.binary_search(&cell).is_ok()
    }

    /// Every configuration one action away, in generation order
    pub fn successors(&self, node: &PathNode) -> Vec<PathNode> {
        let mut out = Vec::new();

        for &from in &node.pieces {
            if self.goals.contains(from) {
                out.push(node.child(from, None, Action::Exit { from }));
            }

            for dir in 0..6 {
                let near = from.neighbor(dir);
                if self.is_free(node, near) {
                    out.push(node.child(from, Some(near), Action::Move { from, to: near }));
                    continue;
                }
                let far = from.step(dir, 2);
                if self.is_occupied(node, near) && self.is_free(node, far) {
                    out.push(node.child(from, Some(far), Action::Jump { from, to: far }));
                }
            }
        }

        out
    }

    /// Admissible estimate of actions left: each piece needs its own turns
    pub fn heuristic(&self, node: &PathNode) -> u32 {
        node.pieces.iter().map(|&c| estimate_turns(c, &self.goals)).sum()
    }
}

/// Frontier entry ordered by an explicit (f, g, insertion) key
type FrontierKey = Reverse<(u32, u32, usize)>;

/// Fewest actions that exit every piece, by A*; `None` if unsolvable
/// within `budget` expansions
pub fn plan(puzzle: &Puzzle, start: &[Cell], budget: usize) -> Option<Vec<Action>> {
    let mut arena: Vec<(PathNode, Option<usize>)> = Vec::new();
    let mut frontier: BinaryHeap<FrontierKey> = BinaryHeap::new();
    let mut closed: FxHashSet<Vec<Cell>> = FxHashSet::default();

    let root = PathNode::new(start.to_vec());
    frontier.push(Reverse((puzzle.heuristic(&root), 0, 0)));
    arena.push((root, None));

    let mut expanded = 0usize;
    while let Some(Reverse((_, _, id))) = frontier.pop() {
        let node = arena[id].0.clone();
        if node.is_solved() {
            return Some(reconstruct(&arena, id));
        }
        if !closed.insert(node.key()) {
            continue;
        }

        expanded += 1;
        if expanded > budget {
            tracing::debug!(expanded, "plan budget exhausted");
            return None;
        }

        for child in puzzle.successors(&node) {
            if closed.contains(child.pieces()) {
                continue;
            }
            let f = child.g + puzzle.heuristic(&child);
            let key = Reverse((f, child.g, arena.len()));
            arena.push((child, Some(id)));
            frontier.push(key);
        }
    }

    None
}

fn reconstruct(arena: &[(PathNode, Option<usize>)], mut id: usize) -> Vec<Action> {
    let mut actions = Vec::new();
    loop {
        let (node, parent) = &arena[id];
        if let Some(action) = node.action {
            actions.push(action);
        }
        match parent {
            Some(p) => id = *p,
            None => break,
        }
    }
    actions.reverse();
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successors_of_lone_piece() {
        let puzzle = Puzzle::new(Colour::Red, CellSet::empty());
        let node = PathNode::new(vec![Cell::new(0, 0)]);
        let succ = puzzle.successors(&node);
        assert_eq!(succ.len(), 6);
        assert!(succ.iter().all(|s| s.g == 1));
    }

    #[test]
    fn test_piece_on_goal_can_exit_or_move() {
        let puzzle = Puzzle::new(Colour::Red, CellSet::empty());
        let node = PathNode::new(vec![Cell::new(3, -1)]);
        let succ = puzzle.successors(&node);
        assert!(succ.iter().any(|s| s.is_solved()));
        assert!(succ.len() > 1);
    }

    #[test]
    fn test_plan_single_piece() {
        let puzzle = Puzzle::new(Colour::Red, CellSet::empty());
        let plan = plan(&puzzle, &[Cell::new(0, 0)], DEFAULT_PLAN_BUDGET).unwrap();
        // Three moves to the edge, then exit; no jumps without obstacles
        assert_eq!(plan.len(), 4);
        assert!(matches!(plan.last(), Some(Action::Exit { .. })));
    }

    #[test]
    fn test_plan_uses_blockers_to_jump() {
        let blocks: CellSet = [Cell::new(1, 0)].into_iter().collect();
        let puzzle = Puzzle::new(Colour::Red, blocks);
        let plan = plan(&puzzle, &[Cell::new(0, 0)], DEFAULT_PLAN_BUDGET).unwrap();
        // Jump over (1, 0) to (2, 0), step to (3, 0), exit
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0], Action::Jump { from: Cell::new(0, 0), to: Cell::new(2, 0) });
    }

    #[test]
    fn test_plan_two_pieces_leapfrog() {
        let puzzle = Puzzle::new(Colour::Red, CellSet::empty());
        let start = [Cell::new(1, 0), Cell::new(2, 0)];
        let plan = plan(&puzzle, &start, DEFAULT_PLAN_BUDGET).unwrap();
        // (2,0) -> (3,0), exit; (1,0) -> (2,0) -> (3,0) or a jump; 5 at most
        assert!(plan.len() <= 5);
        let exits = plan.iter().filter(|a| matches!(a, Action::Exit { .. })).count();
        assert_eq!(exits, 2);
    }

    #[test]
    fn test_plan_without_goals_fails() {
        let blocks: CellSet = Colour::Red.goal_cells().into_iter().collect();
        let puzzle = Puzzle::new(Colour::Red, blocks);
        assert!(plan(&puzzle, &[Cell::new(0, 0)], 5_000).is_none());
    }
}
