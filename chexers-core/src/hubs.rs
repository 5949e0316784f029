//! Hub detection: cells and configurations with many divergent continuations
//!
//! Two analyses share one threshold:
//! - `goal_hub_cells` walks outward from each goal cell, one piece at a time
//! - `find_hub_nodes` expands whole configurations until the first depth
//!   that contains a hub, then drains that depth and stops

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::{Cell, CellSet};
use crate::path::{PathNode, Puzzle};

/// A node with at least this many continuations is a hub
pub const HUB_BRANCHING: usize = 3;

/// Default outward depth for `goal_hub_cells`
pub const DEFAULT_HUB_DEPTH: u32 = 3;

/// Breadth-first walk from every goal cell over single-piece moves and
/// jumps (jumps only over blockers). Returns each hub cell with the
/// smallest depth it was reached at. Goal cells themselves are not hubs.
pub fn goal_hub_cells(goals: &CellSet, blocks: &CellSet, max_depth: u32) -> FxHashMap<Cell, u32> {
    let mut hubs: FxHashMap<Cell, u32> = FxHashMap::default();

    for goal in goals.iter() {
        let mut queue: VecDeque<(Cell, Option<Cell>, u32)> = VecDeque::new();
        let mut visited: FxHashSet<Cell> = FxHashSet::default();
        queue.push_back((goal, None, 1));
        visited.insert(goal);

        while let Some((cell, parent, depth)) = queue.pop_front() {
            if depth > max_depth {
                break;
            }

            let continuations = single_piece_steps(cell, parent, blocks);

            if continuations.len() >= HUB_BRANCHING && !goals.contains(cell) {
                hubs.entry(cell)
                    .and_modify(|d| *d = (*d).min(depth))
                    .or_insert(depth);
            }

            for next in continuations {
                if !goals.contains(next) && visited.insert(next) {
                    queue.push_back((next, Some(cell), depth + 1));
                }
            }
        }
    }

    hubs
}

/// Destinations of a lone piece, excluding the cell it came from
fn single_piece_steps(cell: Cell, parent: Option<Cell>, blocks: &CellSet) -> Vec<Cell> {
    let free = |c: Cell| c.is_valid() && !blocks.contains(c) && Some(c) != parent;
    let mut out = Vec::new();
    for dir in 0..6 {
        let near = cell.neighbor(dir);
        if free(near) {
            out.push(near);
            continue;
        }
        let far = cell.step(dir, 2);
        if blocks.contains(near) && free(far) {
            out.push(far);
        }
    }
    out
}

/// Priority expansion over configurations keyed by ply depth `g`.
///
/// Once a hub is found at depth L no new nodes are admitted; the frontier
/// is drained through depth L and every hub found is returned. Nodes deeper
/// than `max_depth` are never admitted.
pub fn find_hub_nodes(puzzle: &Puzzle, starts: Vec<PathNode>, max_depth: u32) -> Vec<PathNode> {
    let mut arena: Vec<PathNode> = Vec::new();
    let mut frontier: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();
    let mut visited: FxHashSet<Vec<Cell>> = FxHashSet::default();

    for start in starts {
        if visited.insert(start.key()) {
            frontier.push(Reverse((start.g, arena.len())));
            arena.push(start);
        }
    }

    let mut found_layer: Option<u32> = None;
    let mut hubs = Vec::new();

    while let Some(&Reverse((g, id))) = frontier.peek() {
        if matches!(found_layer, Some(layer) if g > layer) {
            break;
        }
        frontier.pop();

        let current = arena[id].clone();
        let successors = puzzle.successors(&current);

        if successors.len() >= HUB_BRANCHING {
            found_layer.get_or_insert(current.g);
            hubs.push(current);
            continue;
        }

        if found_layer.is_some() {
            continue;
        }

        for next in successors {
            if next.g <= max_depth && visited.insert(next.key()) {
                frontier.push(Reverse((next.g, arena.len())));
                arena.push(next);
            }
        }
    }

    hubs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Colour;

    #[test]
    fn test_goal_hubs_on_open_board() {
        let goals = Colour::Red.goal_set(&CellSet::empty());
        let hubs = goal_hub_cells(&goals, &CellSet::empty(), DEFAULT_HUB_DEPTH);
        // The cells right behind the red edge branch widely
        assert_eq!(hubs.get(&Cell::new(2, 0)), Some(&2));
        for cell in goals.iter() {
            assert!(!hubs.contains_key(&cell));
        }
        // Nothing beyond the depth limit
        assert!(hubs.values().all(|&d| d <= DEFAULT_HUB_DEPTH));
    }

    #[test]
    fn test_goal_hubs_respect_blockers() {
        let goals = Colour::Red.goal_set(&CellSet::empty());
        let blocks: CellSet = [Cell::new(2, 0)].into_iter().collect();
        let hubs = goal_hub_cells(&goals, &blocks, DEFAULT_HUB_DEPTH);
        assert!(!hubs.contains_key(&Cell::new(2, 0)));
    }

    #[test]
    fn test_corner_piece_is_not_a_hub() {
        // A single step piece hemmed in the corner has two continuations
        let blocks: CellSet = [Cell::new(-2, 2)].into_iter().collect();
        let steps = single_piece_steps(Cell::new(-3, 3), None, &blocks);
        // (-3, 2), (-2, 3) and the jump over (-2, 2) to (-1, 1)
        assert_eq!(steps.len(), 3);
        let steps = single_piece_steps(Cell::new(-3, 3), Some(Cell::new(-3, 2)), &blocks);
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_find_hub_nodes_stops_at_first_layer() {
        let puzzle = Puzzle::new(Colour::Red, CellSet::empty());
        // A lone piece in the open has six continuations: hub at depth 0
        let hubs = find_hub_nodes(&puzzle, vec![PathNode::new(vec![Cell::new(0, 0)])], 3);
        assert_eq!(hubs.len(), 1);
        assert_eq!(hubs[0].g, 0);
    }

    #[test]
    fn test_find_hub_nodes_drains_layer() {
        // Corner piece walled in so that it has exactly two continuations
        let blocks: CellSet = [Cell::new(-2, 2), Cell::new(-1, 1)].into_iter().collect();
        let puzzle = Puzzle::new(Colour::Red, blocks);
        let start = PathNode::new(vec![Cell::new(-3, 3)]);
        assert_eq!(puzzle.successors(&start).len(), 2);

        let hubs = find_hub_nodes(&puzzle, vec![start], 4);
        assert!(!hubs.is_empty());
        let layer = hubs[0].g;
        assert!(layer >= 1);
        assert!(hubs.iter().all(|h| h.g == layer));
        assert!(hubs.iter().all(|h| puzzle.successors(h).len() >= HUB_BRANCHING));
    }

    #[test]
    fn test_find_hub_nodes_respects_depth_limit() {
        let blocks: CellSet = [Cell::new(-2, 2), Cell::new(-1, 1)].into_iter().collect();
        let puzzle = Puzzle::new(Colour::Red, blocks);
        let hubs = find_hub_nodes(&puzzle, vec![PathNode::new(vec![Cell::new(-3, 3)])], 0);
        assert!(hubs.is_empty());
    }
}
