//! Search tree node

use crate::board::Colour;
use crate::eval::Utility;
use crate::game::{Action, GameResult, GameState};

/// A game state in the search tree, with the action that led to it and
/// its utility once evaluated. Children own their states outright.
#[derive(Clone, Debug)]
pub struct SearchNode {
    state: GameState,
    action: Option<Action>,
    utility: Option<Utility>,
}

impl SearchNode {
    pub fn root(state: GameState) -> Self {
        Self {
            state,
            action: None,
            utility: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Action that produced this node (None at the root)
    pub fn action(&self) -> Option<Action> {
        self.action
    }

    pub fn utility(&self) -> Option<Utility> {
        self.utility
    }

    pub fn set_utility(&mut self, utility: Utility) {
        self.utility = Some(utility);
    }

    /// Colour choosing among this node's children
    pub fn mover(&self) -> Colour {
        self.state.to_move()
    }

    /// Decided game, or nobody can do anything but pass
    pub fn is_terminal(&self) -> bool {
        self.state.result() != GameResult::Ongoing || self.state.is_stalemate()
    }

    /// One child per legal action of the mover, in generation order
    pub fn expand(&self) -> Vec<SearchNode> {
        self.state
            .legal_actions()
            .into_iter()
            .map(|action| SearchNode {
                state: self.state.apply_unchecked(action),
                action: Some(action),
                utility: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    #[test]
    fn test_expand_follows_generation_order() {
        let state = GameState::standard();
        let root = SearchNode::root(state.clone());
        let children = root.expand();
        let actions: Vec<Action> = children.iter().filter_map(|c| c.action()).collect();
        assert_eq!(actions, state.legal_actions());
        assert!(children.iter().all(|c| c.mover() == Colour::Green));
        assert!(children.iter().all(|c| c.utility().is_none()));
    }

    #[test]
    fn test_stalemate_is_terminal() {
        let blocks = [
            Cell::new(-3, 2),
            Cell::new(-2, 2),
            Cell::new(-2, 3),
            Cell::new(-3, 1),
            Cell::new(-1, 1),
            Cell::new(-1, 3),
        ];
        let state =
            GameState::from_layout(&[(Colour::Red, Cell::new(-3, 3))], &blocks, Colour::Red).unwrap();
        assert!(SearchNode::root(state).is_terminal());
        assert!(!SearchNode::root(GameState::standard()).is_terminal());
    }
}
