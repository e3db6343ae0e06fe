//! The 3x3 marker grid and win detection

use serde::{Deserialize, Serialize};

use crate::consts::GRID_DIM;

/// A player's marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    X,
    O,
}

impl Marker {
    /// The opposing marker
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Marker::X => Marker::O,
            Marker::O => Marker::X,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Marker::X => "X",
            Marker::O => "O",
        }
    }
}

/// A board coordinate, `(row, col)` with both in `0..3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    /// All cells in row-major order
    pub const ALL: [Cell; 9] = [
        Cell::new(0, 0),
        Cell::new(0, 1),
        Cell::new(0, 2),
        Cell::new(1, 0),
        Cell::new(1, 1),
        Cell::new(1, 2),
        Cell::new(2, 0),
        Cell::new(2, 1),
        Cell::new(2, 2),
    ];

    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index into the board
    #[inline]
    pub fn index(&self) -> usize {
        self.row * GRID_DIM + self.col
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Result of a finished board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win(Marker),
    Tie,
}

/// The 8 winning lines: 3 rows, 3 columns, 2 diagonals
pub const LINES: [[Cell; 3]; 8] = [
    // Rows
    [Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)],
    [Cell::new(1, 0), Cell::new(1, 1), Cell::new(1, 2)],
    [Cell::new(2, 0), Cell::new(2, 1), Cell::new(2, 2)],
    // Columns
    [Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)],
    [Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)],
    [Cell::new(0, 2), Cell::new(1, 2), Cell::new(2, 2)],
    // Diagonals
    [Cell::new(0, 0), Cell::new(1, 1), Cell::new(2, 2)],
    [Cell::new(0, 2), Cell::new(1, 1), Cell::new(2, 0)],
];

/// A 3x3 grid of optional markers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Marker>; 9],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, cell: Cell) -> Option<Marker> {
        self.cells[cell.index()]
    }

    #[inline]
    pub fn is_empty_at(&self, cell: Cell) -> bool {
        self.get(cell).is_none()
    }

    /// Place `marker` on `cell`. Occupied cells are left untouched and
    /// `false` is returned.
    pub fn place(&mut self, cell: Cell, marker: Marker) -> bool {
        let slot = &mut self.cells[cell.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(marker);
        true
    }

    /// Clear a cell. Only search uses this to undo hypothetical moves.
    pub(crate) fn clear(&mut self, cell: Cell) {
        self.cells[cell.index()] = None;
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        Cell::ALL.into_iter().filter(|c| self.is_empty_at(*c))
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Occupied cells with their markers, row-major
    pub fn placed(&self) -> impl Iterator<Item = (Cell, Marker)> + '_ {
        Cell::ALL
            .into_iter()
            .filter_map(|c| self.get(c).map(|m| (c, m)))
    }

    pub fn count(&self, marker: Marker) -> usize {
        self.cells.iter().filter(|c| **c == Some(marker)).count()
    }
}

/// Evaluate a board: a winning marker, a tie when full, otherwise `None`.
pub fn check_win(board: &Board) -> Option<Outcome> {
    for marker in [Marker::X, Marker::O] {
        let won = LINES
            .iter()
            .any(|line| line.iter().all(|c| board.get(*c) == Some(marker)));
        if won {
            return Some(Outcome::Win(marker));
        }
    }

    if board.is_full() {
        Some(Outcome::Tie)
    } else {
        None
    }
}
