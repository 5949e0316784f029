//! MaxN search for three players
//!
//! Every colour maximizes its own component of the utility vector. The
//! search deepens one ply at a time until the depth limit, the deadline
//! or the stop flag, and answers with the last fully completed depth.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::board::Colour;
use crate::cost::CostTable;
use crate::eval::{evaluate, Baseline, EvalWeights, Utility};
use crate::game::{Action, GameResult};
use crate::node::SearchNode;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Hard cap on plies searched, whatever the caller asks for
pub const MAX_SEARCH_DEPTH: u32 = 10;

// ============================================================================
// LIMITS AND OUTCOME
// ============================================================================

/// When to stop searching
#[derive(Clone, Debug)]
pub struct SearchLimits {
    /// Plies (clamped to 1..=MAX_SEARCH_DEPTH)
    pub depth: u32,
    pub deadline: Option<Instant>,
    /// Raised by another thread to cancel
    pub stop: Option<Arc<AtomicBool>>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            depth: 3,
            deadline: None,
            stop: None,
        }
    }
}

impl SearchLimits {
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.deadline = Some(Instant::now() + limit);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_stop(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }
}

/// Result of one search
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    /// None only when the root is a decided game
    pub action: Option<Action>,
    pub utility: Utility,
    /// Deepest iteration that completed
    pub depth_reached: u32,
    pub nodes: u64,
    /// Deadline or stop flag cut the search short
    pub aborted: bool,
}

// ============================================================================
// SEARCH
// ============================================================================

/// MaxN searcher bound to one cost table and weight set
pub struct MaxN<'a> {
    table: &'a CostTable,
    weights: &'a EvalWeights,
    limits: SearchLimits,
    nodes: u64,
}

impl<'a> MaxN<'a> {
    pub fn new(table: &'a CostTable, weights: &'a EvalWeights, limits: SearchLimits) -> Self {
        Self {
            table,
            weights,
            limits,
            nodes: 0,
        }
    }

    /// Choose an action for the colour to move at `root`
    pub fn search(&mut self, root: &SearchNode) -> SearchOutcome {
        self.nodes = 0;
        let state = root.state();
        let baseline = Baseline::new(state, self.table);

        if root.is_terminal() {
            // A stalemated game is still live: the mover passes
            let action = (state.result() == GameResult::Ongoing).then_some(Action::Pass);
            return self.leaf_outcome(root, &baseline, action);
        }

        let mut children = root.expand();
        if let [only] = children.as_slice() {
            let utility = self.evaluate(only, &baseline, 0);
            return SearchOutcome {
                action: only.action(),
                utility,
                depth_reached: 1,
                nodes: 1,
                aborted: false,
            };
        }

        let max_depth = self.limits.depth.clamp(1, MAX_SEARCH_DEPTH);
        let mover = root.mover();
        let mut best: Option<SearchOutcome> = None;

        for depth in 1..=max_depth {
            match self.search_root(&mut children, mover, depth, &baseline) {
                Ok(outcome) => {
                    tracing::debug!(
                        depth,
                        nodes = self.nodes,
                        action = ?outcome.action,
                        "maxn iteration complete"
                    );
                    best = Some(outcome);
                }
                Err(partial) => {
                    tracing::warn!(depth, nodes = self.nodes, "maxn search aborted, using last complete iteration");
                    let mut outcome = best.or(partial).unwrap_or_else(|| SearchOutcome {
                        action: children[0].action(),
                        utility: [0.0; 3],
                        depth_reached: 0,
                        nodes: 0,
                        aborted: true,
                    });
                    outcome.aborted = true;
                    outcome.nodes = self.nodes;
                    return outcome;
                }
            }
        }

        let mut outcome = best.unwrap_or_else(|| SearchOutcome {
            action: children[0].action(),
            utility: [0.0; 3],
            depth_reached: 0,
            nodes: 0,
            aborted: false,
        });
        outcome.nodes = self.nodes;
        outcome
    }

    /// One full iteration over the root children, caching each child's
    /// utility. On abort, returns the best of the children finished so far.
    fn search_root(
        &mut self,
        children: &mut [SearchNode],
        mover: Colour,
        depth: u32,
        baseline: &Baseline,
    ) -> Result<SearchOutcome, Option<SearchOutcome>> {
        for index in 0..children.len() {
            let Some(utility) = self.maxn(&children[index], depth - 1, baseline) else {
                let partial = self.best_child(&children[..index], mover, depth - 1);
                return Err(partial.map(|mut outcome| {
                    outcome.aborted = true;
                    outcome
                }));
            };
            children[index].set_utility(utility);
        }

        // Expansion of a live root is never empty
        self.best_child(children, mover, depth).ok_or(None)
    }

    /// Best of `children` by their cached utilities
    fn best_child(&self, children: &[SearchNode], mover: Colour, depth: u32) -> Option<SearchOutcome> {
        let mut best: Option<(&SearchNode, Utility, usize)> = None;
        for child in children {
            let Some(utility) = child.utility() else { continue };
            let pieces = child.state().player(mover).count();
            if prefers(mover, (utility, pieces), best.map(|(_, u, p)| (u, p))) {
                best = Some((child, utility, pieces));
            }
        }

        best.map(|(child, utility, _)| SearchOutcome {
            action: child.action(),
            utility,
            depth_reached: depth,
            nodes: self.nodes,
            aborted: false,
        })
    }

    /// Utility of `node` searched `depth` plies deep; None once aborted
    fn maxn(&mut self, node: &SearchNode, depth: u32, baseline: &Baseline) -> Option<Utility> {
        if self.should_stop() {
            return None;
        }
        self.nodes += 1;

        if depth == 0 || node.is_terminal() {
            return Some(self.evaluate(node, baseline, depth));
        }

        let mover = node.mover();
        let mut best: Option<(Utility, usize)> = None;
        for child in node.expand() {
            let utility = self.maxn(&child, depth - 1, baseline)?;
            let pieces = child.state().player(mover).count();
            if prefers(mover, (utility, pieces), best) {
                best = Some((utility, pieces));
            }
        }

        best.map(|(utility, _)| utility)
    }

    fn evaluate(&self, node: &SearchNode, baseline: &Baseline, depth_left: u32) -> Utility {
        evaluate(node.state(), baseline, self.table, self.weights, depth_left)
    }

    fn leaf_outcome(&self, root: &SearchNode, baseline: &Baseline, action: Option<Action>) -> SearchOutcome {
        SearchOutcome {
            action,
            utility: self.evaluate(root, baseline, 0),
            depth_reached: 0,
            nodes: 1,
            aborted: false,
        }
    }

    fn should_stop(&self) -> bool {
        if let Some(stop) = &self.limits.stop {
            if stop.load(Ordering::Relaxed) {
                return true;
            }
        }
        matches!(self.limits.deadline, Some(deadline) if Instant::now() >= deadline)
    }
}

/// Candidate beats the incumbent for `mover`: higher own utility, or equal
/// utility with fewer of the mover's pieces left on the board. Earlier
/// candidates win remaining ties.
fn prefers(mover: Colour, candidate: (Utility, usize), incumbent: Option<(Utility, usize)>) -> bool {
    let Some((best, best_pieces)) = incumbent else {
        return true;
    };
    let (utility, pieces) = candidate;
    let (mine, theirs) = (utility[mover.index()], best[mover.index()]);
    mine > theirs || (mine == theirs && pieces < best_pieces)
}

// ============================================================================
// TESTS
// ============================================================================
