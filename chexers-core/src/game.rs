//! Game state and move generation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, CellSet, Colour, Occupant};
use crate::error::{EngineError, Result};

// ============================================================================
// CONSTANTS
// ============================================================================

/// A colour with at least this many pieces on the board cannot be eaten
pub const CAPTURE_IMMUNITY: usize = 4;

/// Exits needed to win
pub const DEFAULT_EXITS_TO_WIN: u8 = 4;

/// Ply cap for a whole game (256 turns per colour)
pub const DEFAULT_MAX_PLIES: u32 = 768;

// ============================================================================
// CORE TYPES
// ============================================================================

/// A single action, as reported to and from the turn harness
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "UPPERCASE")]
pub enum Action {
    Move { from: Cell, to: Cell },
    Jump { from: Cell, to: Cell },
    Exit { from: Cell },
    Pass,
}

impl Action {
    /// Cell the acting piece starts on
    pub fn from_cell(&self) -> Option<Cell> {
        match self {
            Action::Move { from, .. } | Action::Jump { from, .. } | Action::Exit { from } => {
                Some(*from)
            }
            Action::Pass => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { from, to } => write!(f, "MOVE from {} to {}.", from, to),
            Action::Jump { from, to } => write!(f, "JUMP from {} to {}.", from, to),
            Action::Exit { from } => write!(f, "EXIT from {}.", from),
            Action::Pass => write!(f, "PASS."),
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    Won(Colour),
    Draw,
}

/// Game-level rules that vary between setups
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Exits needed to win
    pub exits_to_win: u8,
    /// Total plies before the game is declared a draw
    pub max_plies: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            exits_to_win: DEFAULT_EXITS_TO_WIN,
            max_plies: DEFAULT_MAX_PLIES,
        }
    }
}

/// Pieces of one colour still on the board, plus how many have exited
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PlayerState {
    /// Sorted, duplicate-free
    pieces: Vec<Cell>,
    pub exits: u8,
}

impl PlayerState {
    pub fn new(mut pieces: Vec<Cell>, exits: u8) -> Result<Self> {
        pieces.sort_unstable();
        if let Some(w) = pieces.windows(2).find(|w| w[0] == w[1]) {
            return Err(EngineError::DuplicateCell { q: w[0].q, r: w[0].r });
        }
        Ok(Self { pieces, exits })
    }

    pub fn pieces(&self) -> &[Cell] {
        &self.pieces
    }

    pub fn count(&self) -> usize {
        self.pieces.len()
    }

    /// Pieces on the board plus pieces already exited
    pub fn material(&self) -> usize {
        self.pieces.len() + self.exits as usize
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.pieces.binary_search(&cell).is_ok()
    }

    fn insert(&mut self, cell: Cell) {
        if let Err(pos) = self.pieces.binary_search(&cell) {
            self.pieces.insert(pos, cell);
        }
    }

    fn remove(&mut self, cell: Cell) -> bool {
        match self.pieces.binary_search(&cell) {
            Ok(pos) => {
                self.pieces.remove(pos);
                true
            }
            Err(_) => false,
        }
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state (clone to mutate)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    players: [PlayerState; 3],
    /// Blocker-reduced goal cells per colour
    goals: [CellSet; 3],
    to_move: Colour,
    /// Actions applied so far, passes included
    ply: u32,
    rules: Rules,
    result: GameResult,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard opening: four pieces per colour, no blockers, red to move
    pub fn standard() -> Self {
        Self::from_board(Board::standard(), Colour::Red, [0; 3], Rules::default())
    }

    /// Build from a board snapshot; player states are derived from the board
    pub fn from_board(board: Board, to_move: Colour, exits: [u8; 3], rules: Rules) -> Self {
        let blocks = board.blockers();
        let players = Colour::ALL.map(|c| PlayerState {
            pieces: board.pieces_of(c),
            exits: exits[c.index()],
        });
        let goals = Colour::ALL.map(|c| c.goal_set(&blocks));

        let mut state = Self {
            board,
            players,
            goals,
            to_move,
            ply: 0,
            rules,
            result: GameResult::Ongoing,
        };
        state.refresh_result(None);
        state
    }

    /// Build from explicit piece and blocker lists
    pub fn from_layout(
        pieces: &[(Colour, Cell)],
        blocks: &[Cell],
        to_move: Colour,
    ) -> Result<Self> {
        let mut board = Board::new();
        for &cell in blocks {
            board.place(cell, Occupant::Block)?;
        }
        for &(colour, cell) in pieces {
            board.place(cell, Occupant::Piece(colour))?;
        }
        Ok(Self::from_board(board, to_move, [0; 3], Rules::default()))
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self.refresh_result(None);
        self
    }

    pub fn with_ply(mut self, ply: u32) -> Self {
        self.ply = ply;
        self.refresh_result(None);
        self
    }

    pub fn with_to_move(mut self, colour: Colour) -> Self {
        self.to_move = colour;
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, colour: Colour) -> &PlayerState {
        &self.players[colour.index()]
    }

    pub fn goals(&self, colour: Colour) -> CellSet {
        self.goals[colour.index()]
    }

    pub fn to_move(&self) -> Colour {
        self.to_move
    }

    pub fn ply(&self) -> u32 {
        self.ply
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn exit_counts(&self) -> [u8; 3] {
        Colour::ALL.map(|c| self.players[c.index()].exits)
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Legal actions for the colour to move
    pub fn legal_actions(&self) -> Vec<Action> {
        self.legal_actions_for(self.to_move)
    }

    /// Legal actions for `colour`: per piece (sorted) an exit first, then
    /// a move or jump in each of the six directions. PASS only when empty.
    pub fn legal_actions_for(&self, colour: Colour) -> Vec<Action> {
        let goals = self.goals[colour.index()];
        let mut actions = Vec::new();

        for &from in self.players[colour.index()].pieces() {
            if goals.contains(from) {
                actions.push(Action::Exit { from });
            }
            self.generate_steps(from, &mut actions);
        }

        if actions.is_empty() {
            actions.push(Action::Pass);
        }
        actions
    }

    fn generate_steps(&self, from: Cell, actions: &mut Vec<Action>) {
        for dir in 0..6 {
            let near = from.neighbor(dir);
            if self.board.is_free(near) {
                actions.push(Action::Move { from, to: near });
                continue;
            }

            // Jump only over an occupied cell
            let far = from.step(dir, 2);
            if self.board.is_occupied(near) && self.board.is_free(far) {
                actions.push(Action::Jump { from, to: far });
            }
        }
    }

    /// True when `colour` can only pass
    pub fn must_pass(&self, colour: Colour) -> bool {
        self.legal_actions_for(colour) == [Action::Pass]
    }

    /// Every colour can only pass
    pub fn is_stalemate(&self) -> bool {
        Colour::ALL.iter().all(|&c| self.must_pass(c))
    }

    // ========================================================================
    // APPLY ACTION
    // ========================================================================

    /// Apply an action for the colour to move, return new state
    pub fn apply_action(&self, action: Action) -> Result<Self> {
        self.apply_action_for(self.to_move, action)
    }

    /// Apply an action played by `colour`, return new state. The colour
    /// after `colour` moves next.
    pub fn apply_action_for(&self, colour: Colour, action: Action) -> Result<Self> {
        self.check_action(colour, action)?;
        let mut new_state = self.clone();
        new_state.apply_internal(colour, action);
        Ok(new_state)
    }

    /// Apply a generated action for the colour to move without validation
    pub(crate) fn apply_unchecked(&self, action: Action) -> Self {
        let mut new_state = self.clone();
        new_state.apply_internal(self.to_move, action);
        new_state
    }

    fn check_action(&self, colour: Colour, action: Action) -> Result<()> {
        if self.result != GameResult::Ongoing {
            return Err(EngineError::illegal(action, "the game is over"));
        }

        let owns = |cell: Cell| self.players[colour.index()].contains(cell);

        match action {
            Action::Pass => {
                if !self.must_pass(colour) {
                    return Err(EngineError::illegal(action, "other actions are available"));
                }
            }
            Action::Exit { from } => {
                if !owns(from) {
                    return Err(EngineError::illegal(action, format!("no {} piece there", colour)));
                }
                if !self.goals[colour.index()].contains(from) {
                    return Err(EngineError::illegal(action, "not on a goal cell"));
                }
            }
            Action::Move { from, to } => {
                if !owns(from) {
                    return Err(EngineError::illegal(action, format!("no {} piece there", colour)));
                }
                if from.distance_to(to) != 1 {
                    return Err(EngineError::illegal(action, "destination is not adjacent"));
                }
                if !self.board.is_free(to) {
                    return Err(EngineError::illegal(action, "destination is not free"));
                }
            }
            Action::Jump { from, to } => {
                if !owns(from) {
                    return Err(EngineError::illegal(action, format!("no {} piece there", colour)));
                }
                let straight = (0..6).any(|dir| from.step(dir, 2) == to);
                if !straight {
                    return Err(EngineError::illegal(action, "not a straight two-cell leap"));
                }
                if !self.board.is_occupied(from.midpoint(to)) {
                    return Err(EngineError::illegal(action, "nothing to jump over"));
                }
                if !self.board.is_free(to) {
                    return Err(EngineError::illegal(action, "destination is not free"));
                }
            }
        }
        Ok(())
    }

    fn apply_internal(&mut self, colour: Colour, action: Action) {
        match action {
            Action::Pass => {}

            Action::Move { from, to } => {
                self.relocate(colour, from, to);
            }

            Action::Jump { from, to } => {
                self.relocate(colour, from, to);
                self.try_convert(colour, from.midpoint(to));
            }

            Action::Exit { from } => {
                self.board.clear(from);
                let player = &mut self.players[colour.index()];
                player.remove(from);
                player.exits += 1;
            }
        }

        self.ply += 1;
        self.to_move = colour.next();
        self.refresh_result(Some((colour, action)));
    }

    fn relocate(&mut self, colour: Colour, from: Cell, to: Cell) {
        self.board.clear(from);
        self.board.set(to, Occupant::Piece(colour));
        let player = &mut self.players[colour.index()];
        player.remove(from);
        player.insert(to);
    }

    /// Convert the jumped piece if its colour is small enough to be eaten
    fn try_convert(&mut self, colour: Colour, mid: Cell) {
        let victim = match self.board.colour_at(mid) {
            Some(v) if v != colour => v,
            _ => return,
        };
        if self.players[victim.index()].count() >= CAPTURE_IMMUNITY {
            return;
        }

        self.players[victim.index()].remove(mid);
        self.players[colour.index()].insert(mid);
        self.board.set(mid, Occupant::Piece(colour));
    }

    fn refresh_result(&mut self, last: Option<(Colour, Action)>) {
        if let GameResult::Won(_) = self.result {
            return;
        }

        for colour in Colour::ALL {
            if self.players[colour.index()].exits >= self.rules.exits_to_win {
                self.result = GameResult::Won(colour);
                return;
            }
        }

        // Exiting the last piece on the board wins outright
        if let Some((colour, Action::Exit { .. })) = last {
            if self.players[colour.index()].count() == 0 {
                self.result = GameResult::Won(colour);
                return;
            }
        }

        self.result = if self.ply >= self.rules.max_plies {
            GameResult::Draw
        } else {
            GameResult::Ongoing
        };
    }
}

// ============================================================================
// TESTS
// ============================================================================
