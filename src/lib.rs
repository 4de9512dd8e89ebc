//! Tic-tac-toe outcome evaluator and optimal-move search.
//!
//! This crate is the opponent behind the Foxo game: it decides whether a board is won, tied or
//! still open, and it finds a provably optimal move with a depth-sensitive negamax search. Wins
//! are worth more the sooner they come and losses cost less the later they come, so the engine
//! finishes games quickly when it can and holds out as long as possible when it cannot.
//! Equally good moves are picked at random through an injectable [`random::RandomGenerator`].
//!
//! # Example
//!
//! ```rust
//! use foxo_engine::board::{Board, Player};
//! use foxo_engine::outcome::{evaluate, Outcome};
//! use foxo_engine::random::SeededRandomGenerator;
//! use foxo_engine::search::NegamaxSearch;
//!
//! // X has two in the top row and is to move
//! let board: Board = "XX./OO./...".parse().unwrap();
//!
//! // Create and configure a search engine using the builder
//! let mut search = NegamaxSearch::builder()
//!     .with_random_generator(SeededRandomGenerator::new(7))
//!     .with_alpha_beta_pruning(true)
//!     .build();
//!
//! let mv = search.best_move(&board, Player::X).unwrap();
//! assert_eq!(mv, 2);
//!
//! let mut next = board;
//! next.play(mv, Player::X).unwrap();
//! assert!(matches!(evaluate(&next), Outcome::Won { winner: Player::X, .. }));
//! ```

/// Exact scores and principal variations for every move of a position.
pub mod analysis;
/// The board, players and moves.
pub mod board;
pub mod error;
/// Detection of won and tied positions.
pub mod outcome;
/// Sources of randomness for tie-breaking.
pub mod random;
/// The negamax search engine and its configuration.
pub mod search;

pub use board::{Board, Move, Player};
pub use error::{Error, Result};
pub use outcome::{Line, Outcome, evaluate};
pub use search::{NegamaxSearch, Score};

/// Picks an optimal move for `player` using the default engine.
///
/// Ties between equally good moves are broken with the thread-local generator. Fails with
/// [`Error::GameOver`] when the board is already decided.
pub fn best_move(board: &Board, player: Player) -> Result<Move> {
    NegamaxSearch::builder().build().best_move(board, player)
}
