use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of cells on the 3x3 grid.
pub const CELL_COUNT: usize = 9;

/// An index 0-8 of the cell to occupy, row-major.
pub type Move = usize;

/// A single cell: `None` when empty.
pub type Cell = Option<Player>;

/// The two sides of the game.
///
/// Numeric ids follow the original app: `0` is the human player (`X`), `1` is Foxo (`O`).
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Returns the other side.
    pub const fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Returns the numeric id of the player.
    pub const fn id(self) -> u8 {
        match self {
            Player::X => 0,
            Player::O => 1,
        }
    }

    fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl TryFrom<u8> for Player {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        match id {
            0 => Ok(Player::X),
            1 => Ok(Player::O),
            other => Err(Error::InvalidPlayer(other)),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A snapshot of the 3x3 grid.
///
/// The board is represented by a 9-element array, where each element corresponds to a cell
/// in row-major order. It does not track whose turn it is: the caller passes the player to
/// move alongside the board, and the alternating-turn invariant is the caller's to keep.
#[derive(Debug, Default, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from a slice of cells, rejecting anything that is not exactly 9 long.
    pub fn from_cells(cells: &[Cell]) -> Result<Self> {
        let cells: [Cell; CELL_COUNT] =
            cells.try_into().map_err(|_| Error::InvalidBoardLength {
                expected: CELL_COUNT,
                got: cells.len(),
            })?;
        Ok(Self { cells })
    }

    /// Returns the contents of a cell, or `None` for an empty or out-of-range index.
    pub fn cell(&self, index: Move) -> Cell {
        self.cells.get(index).copied().flatten()
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Number of cells occupied by `player`.
    pub fn count(&self, player: Player) -> usize {
        self.cells.iter().filter(|c| **c == Some(player)).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Indices of all empty cells, in ascending order.
    pub fn available_moves(&self) -> Vec<Move> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Occupies an empty cell on behalf of `player`.
    ///
    /// Does not look at whose turn it is or whether the game is already over; use
    /// [`crate::evaluate`] for the latter.
    pub fn play(&mut self, index: Move, player: Player) -> Result<()> {
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(Error::MoveOutOfRange(index))?;
        if cell.is_some() {
            return Err(Error::CellOccupied(index));
        }
        *cell = Some(player);
        Ok(())
    }

    /// The side to move, given which side opened the game.
    pub fn next_player(&self, first: Player) -> Player {
        if self.count(first) > self.count(first.opponent()) {
            first.opponent()
        } else {
            first
        }
    }

    /// Returns this board rotated 90 degrees clockwise.
    pub fn rotated(&self) -> Self {
        let mut cells = [None; CELL_COUNT];
        for (i, &cell) in self.cells.iter().enumerate() {
            cells[rotate_move(i)] = cell;
        }
        Self { cells }
    }

    // Search-only mutation: callers must guarantee `index` is in range and empty.
    pub(crate) fn place(&mut self, index: Move, player: Player) {
        self.cells[index] = Some(player);
    }

    pub(crate) fn clear(&mut self, index: Move) {
        self.cells[index] = None;
    }
}

/// Maps a cell index to its position after a 90 degree clockwise rotation.
pub fn rotate_move(index: Move) -> Move {
    let (row, col) = (index / 3, index % 3);
    col * 3 + (2 - row)
}

impl TryFrom<&[Option<u8>]> for Board {
    type Error = Error;

    /// Accepts the raw encoding of the original app: `None` for empty, `0`/`1` for the players.
    fn try_from(raw: &[Option<u8>]) -> Result<Self> {
        if raw.len() != CELL_COUNT {
            return Err(Error::InvalidBoardLength {
                expected: CELL_COUNT,
                got: raw.len(),
            });
        }
        let mut cells = [None; CELL_COUNT];
        for (position, (cell, code)) in cells.iter_mut().zip(raw).enumerate() {
            *cell = match code {
                None => None,
                Some(value) => Some(
                    Player::try_from(*value)
                        .map_err(|_| Error::InvalidCellValue { value: *value, position })?,
                ),
            };
        }
        Ok(Self { cells })
    }
}

impl FromStr for Board {
    type Err = Error;

    /// Parses `X`, `O` and `.` cells; whitespace and `/` row separators are ignored.
    fn from_str(s: &str) -> Result<Self> {
        let mut cells = Vec::with_capacity(CELL_COUNT);
        for (position, character) in s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .enumerate()
        {
            let cell = match character {
                'X' | 'x' => Some(Player::X),
                'O' | 'o' => Some(Player::O),
                '.' | '-' | '_' => None,
                _ => {
                    return Err(Error::InvalidCellCharacter {
                        character,
                        position,
                    });
                }
            };
            cells.push(cell);
        }
        Self::from_cells(&cells)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in chunk {
                let symbol = cell.map_or('.', Player::symbol);
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}
