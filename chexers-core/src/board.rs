//! Hex board geometry with axial coordinates

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Board radius (distance from center to edge)
pub const BOARD_RADIUS: i8 = 3;

/// Number of cells on the board
pub const NUM_CELLS: usize = 37;

/// First dense index of each q-column, q = -3..=3
const COLUMN_START: [usize; 7] = [0, 4, 9, 15, 22, 28, 33];

/// Direction vectors in axial coordinates (dq, dr), in generation order
pub const DIRECTIONS: [(i8, i8); 6] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

// ============================================================================
// CELL
// ============================================================================

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(i8, i8)", into = "(i8, i8)")]
pub struct Cell {
    pub q: i8,
    pub r: i8,
}

impl Cell {
    /// Unchecked constructor; the result may lie off the board
    pub const fn new(q: i8, r: i8) -> Self {
        Self { q, r }
    }

    /// Checked constructor, rejects coordinates off the board
    pub fn try_new(q: i8, r: i8) -> Result<Self> {
        let cell = Self::new(q, r);
        if cell.is_valid() {
            Ok(cell)
        } else {
            Err(EngineError::InvalidCell { q, r })
        }
    }

    /// Check if this cell is on the board
    pub fn is_valid(&self) -> bool {
        let radius = -BOARD_RADIUS..=BOARD_RADIUS;
        let s = self.q as i16 + self.r as i16;
        radius.contains(&self.q) && radius.contains(&self.r) && s.abs() <= BOARD_RADIUS as i16
    }

    /// Distance between two cells
    pub fn distance_to(&self, other: Cell) -> u16 {
        let (q, r) = (self.q as i16, self.r as i16);
        let (oq, or) = (other.q as i16, other.r as i16);
        let ds = ((q + r) - (oq + or)).abs();
        (((q - oq).abs() + (r - or).abs() + ds) / 2) as u16
    }

    /// Cell `steps` away in direction (0-5); may be off the board
    pub fn step(&self, direction: usize, steps: i8) -> Cell {
        let (dq, dr) = DIRECTIONS[direction % 6];
        Cell::new(self.q + dq * steps, self.r + dr * steps)
    }

    /// Neighbour in direction (0-5); may be off the board
    pub fn neighbor(&self, direction: usize) -> Cell {
        self.step(direction, 1)
    }

    /// Cell halfway between two cells two steps apart
    pub fn midpoint(&self, other: Cell) -> Cell {
        Cell::new((self.q + other.q) / 2, (self.r + other.r) / 2)
    }

    /// Dense index in 0..NUM_CELLS. Only meaningful for valid cells.
    pub fn index(&self) -> usize {
        debug_assert!(self.is_valid(), "index of off-board cell {}", self);
        let r_min = (-BOARD_RADIUS).max(-BOARD_RADIUS - self.q);
        COLUMN_START[(self.q + BOARD_RADIUS) as usize] + (self.r - r_min) as usize
    }
}

impl TryFrom<(i8, i8)> for Cell {
    type Error = EngineError;

    fn try_from((q, r): (i8, i8)) -> Result<Self> {
        Cell::try_new(q, r)
    }
}

impl From<Cell> for (i8, i8) {
    fn from(cell: Cell) -> Self {
        (cell.q, cell.r)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// All board cells in dense-index order
pub fn all_cells() -> impl Iterator<Item = Cell> {
    (-BOARD_RADIUS..=BOARD_RADIUS).flat_map(|q| {
        (-BOARD_RADIUS..=BOARD_RADIUS)
            .map(move |r| Cell::new(q, r))
            .filter(Cell::is_valid)
    })
}

// ============================================================================
// CELL SET
// ============================================================================

/// Set of board cells packed into a bitmask
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellSet(u64);

impl CellSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, cell: Cell) {
        self.0 |= 1 << cell.index();
    }

    pub fn remove(&mut self, cell: Cell) {
        self.0 &= !(1 << cell.index());
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.is_valid() && self.0 & (1 << cell.index()) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Cells in dense-index order
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        all_cells().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        let mut set = CellSet::empty();
        for cell in iter {
            set.insert(cell);
        }
        set
    }
}

// ============================================================================
// COLOURS
// ============================================================================

/// Player colour, in turn order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Colour {
    pub const ALL: [Colour; 3] = [Colour::Red, Colour::Green, Colour::Blue];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 3]
    }

    /// Colour that moves after this one
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The two other colours, in turn order after this one
    pub fn opponents(self) -> [Colour; 2] {
        [self.next(), self.next().next()]
    }

    /// Edge cells this colour exits from
    pub fn goal_cells(self) -> [Cell; 4] {
        match self {
            Colour::Red => [Cell::new(3, -3), Cell::new(3, -2), Cell::new(3, -1), Cell::new(3, 0)],
            Colour::Green => [Cell::new(-3, 3), Cell::new(-2, 3), Cell::new(-1, 3), Cell::new(0, 3)],
            Colour::Blue => [Cell::new(0, -3), Cell::new(-1, -2), Cell::new(-2, -1), Cell::new(-3, 0)],
        }
    }

    /// Standard starting cells
    pub fn start_cells(self) -> [Cell; 4] {
        match self {
            Colour::Red => [Cell::new(-3, 0), Cell::new(-3, 1), Cell::new(-3, 2), Cell::new(-3, 3)],
            Colour::Green => [Cell::new(0, -3), Cell::new(1, -3), Cell::new(2, -3), Cell::new(3, -3)],
            Colour::Blue => [Cell::new(3, 0), Cell::new(2, 1), Cell::new(1, 2), Cell::new(0, 3)],
        }
    }

    /// Goal cells not occupied by a permanent blocker
    pub fn goal_set(self, blocks: &CellSet) -> CellSet {
        self.goal_cells()
            .into_iter()
            .filter(|c| !blocks.contains(*c))
            .collect()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Colour::Red => "red",
            Colour::Green => "green",
            Colour::Blue => "blue",
        };
        f.write_str(name)
    }
}

impl FromStr for Colour {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(Colour::Red),
            "green" => Ok(Colour::Green),
            "blue" => Ok(Colour::Blue),
            other => Err(format!("unknown colour '{}' (expected red, green or blue)", other)),
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Contents of an occupied cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    Piece(Colour),
    /// Permanent obstruction, never moves or converts
    Block,
}

/// Board: cell -> occupant (sparse, absent means empty)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: FxHashMap<Cell, Occupant>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board with the standard starting pieces and no blockers
    pub fn standard() -> Self {
        let mut board = Board::new();
        for colour in Colour::ALL {
            for cell in colour.start_cells() {
                board.cells.insert(cell, Occupant::Piece(colour));
            }
        }
        board
    }

    /// Place an occupant on an empty, valid cell
    pub fn place(&mut self, cell: Cell, occupant: Occupant) -> Result<()> {
        if !cell.is_valid() {
            return Err(EngineError::InvalidCell { q: cell.q, r: cell.r });
        }
        if self.cells.contains_key(&cell) {
            return Err(EngineError::DuplicateCell { q: cell.q, r: cell.r });
        }
        self.cells.insert(cell, occupant);
        Ok(())
    }

    pub fn get(&self, cell: Cell) -> Option<Occupant> {
        self.cells.get(&cell).copied()
    }

    /// Valid and unoccupied
    pub fn is_free(&self, cell: Cell) -> bool {
        cell.is_valid() && !self.cells.contains_key(&cell)
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }

    pub fn colour_at(&self, cell: Cell) -> Option<Colour> {
        match self.cells.get(&cell) {
            Some(Occupant::Piece(colour)) => Some(*colour),
            _ => None,
        }
    }

    pub fn is_blocked(&self, cell: Cell) -> bool {
        matches!(self.cells.get(&cell), Some(Occupant::Block))
    }

    /// Iterate occupied cells
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Occupant)> + '_ {
        self.cells.iter().map(|(&cell, &occ)| (cell, occ))
    }

    /// Cells holding a piece of `colour`, sorted
    pub fn pieces_of(&self, colour: Colour) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self
            .iter()
            .filter(|(_, occ)| *occ == Occupant::Piece(colour))
            .map(|(cell, _)| cell)
            .collect();
        cells.sort_unstable();
        cells
    }

    pub fn blockers(&self) -> CellSet {
        self.iter()
            .filter(|(_, occ)| *occ == Occupant::Block)
            .map(|(cell, _)| cell)
            .collect()
    }

    pub(crate) fn set(&mut self, cell: Cell, occupant: Occupant) {
        self.cells.insert(cell, occupant);
    }

    pub(crate) fn clear(&mut self, cell: Cell) -> Option<Occupant> {
        self.cells.remove(&cell)
    }
}
