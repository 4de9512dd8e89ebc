//! Terminal-state detection.

use crate::board::{Board, Player};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three cell indices that win the game when held by one player.
pub type Line = [usize; 3];

/// Every winning line, checked in this order: rows, columns, then both diagonals.
pub const LINES: [Line; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// The decided or undecided status of a board.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum Outcome {
    /// At least one cell is empty and nobody has completed a line.
    InProgress,
    /// `winner` holds every cell of `line`.
    Won { winner: Player, line: Line },
    /// The board is full and nobody has completed a line.
    Tie,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Won { winner, .. } => Some(*winner),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "in progress"),
            Outcome::Won { winner, line } => {
                write!(f, "{winner} won on {}-{}-{}", line[0], line[1], line[2])
            }
            Outcome::Tie => write!(f, "tie"),
        }
    }
}

/// Inspects a board and reports whether the game is decided.
///
/// If several lines are complete at once (not reachable by alternating play), the first one in
/// [`LINES`] order is reported.
pub fn evaluate(board: &Board) -> Outcome {
    for line in LINES {
        let [a, b, c] = line;
        if let Some(winner) = board.cell(a) {
            if board.cell(b) == Some(winner) && board.cell(c) == Some(winner) {
                return Outcome::Won { winner, line };
            }
        }
    }

    if board.is_full() {
        Outcome::Tie
    } else {
        Outcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn empty_board_is_in_progress() {
        assert_eq!(evaluate(&Board::new()), Outcome::InProgress);
    }

    #[test]
    fn open_board_without_line_is_in_progress() {
        assert_eq!(evaluate(&board("XO./.X./O..")), Outcome::InProgress);
    }

    #[test]
    fn every_line_is_detected_for_both_players() {
        for player in [Player::X, Player::O] {
            for line in LINES {
                // arrange
                let mut b = Board::new();
                for index in line {
                    b.play(index, player).unwrap();
                }

                // act
                let outcome = evaluate(&b);

                // assert
                assert_eq!(
                    outcome,
                    Outcome::Won {
                        winner: player,
                        line
                    }
                );
                assert_eq!(outcome.winner(), Some(player));
                assert!(outcome.is_terminal());
            }
        }
    }

    #[test]
    fn full_board_without_line_is_tie() {
        assert_eq!(evaluate(&board("XOX/XOO/OXX")), Outcome::Tie);
    }

    #[test]
    fn last_cell_decides_between_tie_and_diagonal() {
        let mut b = board("XOX/OXO/OX.");
        assert_eq!(evaluate(&b), Outcome::InProgress);

        let mut filled_by_o = b;
        filled_by_o.play(8, Player::O).unwrap();
        assert_eq!(evaluate(&filled_by_o), Outcome::Tie);

        b.play(8, Player::X).unwrap();
        assert_eq!(
            evaluate(&b),
            Outcome::Won {
                winner: Player::X,
                line: [0, 4, 8]
            }
        );
    }

    #[test]
    fn first_line_in_order_wins_ties_between_lines() {
        // Row 0 and column 0 are both complete; the row comes first.
        let outcome = evaluate(&board("XXX/X../X.."));
        assert_eq!(
            outcome,
            Outcome::Won {
                winner: Player::X,
                line: [0, 1, 2]
            }
        );
    }

    #[test]
    fn display() {
        assert_eq!(Outcome::Tie.to_string(), "tie");
        assert_eq!(
            evaluate(&board("OOO/XX./...")).to_string(),
            "O won on 0-1-2"
        );
    }
}
