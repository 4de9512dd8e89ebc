use crate::board::{Board, CELL_COUNT, Move, Player};
use crate::error::{Error, Result};
use crate::outcome::{Outcome, evaluate};
use crate::random::{RandomGenerator, StandardRandomGenerator};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// A position value from the perspective of the side to move.
pub type Score = i32;

/// Base value of a won position, before the depth adjustment.
pub const WIN_SCORE: Score = 100;

pub(crate) const INFINITY: Score = Score::MAX;

/// How terminal positions are scored.
#[derive(Debug, Default, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    /// A win at depth `d` scores `WIN_SCORE - d`, a loss `d - WIN_SCORE`.
    ///
    /// The engine takes the fastest win and, when lost, delays the loss as long as possible.
    #[default]
    DepthSensitive,
    /// Every win scores `WIN_SCORE` and every loss `-WIN_SCORE`, whatever the depth.
    ///
    /// This is the weaker opponent of early revisions: it never loses either, but it treats a
    /// win in one move and a forced win in three as equal, so it may pass up an immediate win.
    Legacy,
}

impl Scoring {
    /// Returns the score of a decided position, or `None` if play continues.
    fn terminal_score(self, outcome: Outcome, to_move: Player, depth: Score) -> Option<Score> {
        match outcome {
            Outcome::InProgress => None,
            Outcome::Tie => Some(0),
            Outcome::Won { winner, .. } => {
                let win = match self {
                    Scoring::DepthSensitive => WIN_SCORE - depth,
                    Scoring::Legacy => WIN_SCORE,
                };
                Some(if winner == to_move { win } else { -win })
            }
        }
    }
}

/// Tunable parameters of the search.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Skip siblings once a node's value reaches the bound inherited from its parent.
    pub alpha_beta_pruning: bool,
    pub scoring: Scoring,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            alpha_beta_pruning: true,
            scoring: Scoring::DepthSensitive,
        }
    }
}

/// Every root move that achieves the best value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMoves {
    /// The value of the position for the side to move.
    pub value: Score,
    /// Moves achieving `value`, in ascending index order.
    pub moves: Vec<Move>,
}

/// Negamax search over the complete game tree.
///
/// The engine never keeps a board between calls. Each search copies the board it is given and
/// explores the copy by placing a mark, recursing and clearing the mark again, so siblings never
/// see each other's placements and the caller's board is never touched.
pub struct NegamaxSearch<K: RandomGenerator> {
    random: K,
    config: SearchConfig,
    pub(crate) nodes_visited: u64,
}

impl<K: RandomGenerator> Default for NegamaxSearch<K> {
    fn default() -> Self {
        NegamaxSearchBuilder::new().build()
    }
}

/// A builder for creating instances of `NegamaxSearch`.
pub struct NegamaxSearchBuilder<K: RandomGenerator> {
    random_generator: K,
    config: SearchConfig,
}

impl<K: RandomGenerator> Default for NegamaxSearchBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RandomGenerator> NegamaxSearchBuilder<K> {
    /// Creates a builder with the default configuration and a default generator.
    pub fn new() -> Self {
        Self {
            random_generator: K::default(),
            config: SearchConfig::default(),
        }
    }

    /// Sets the generator used to break ties between equally good moves.
    pub fn with_random_generator<R: RandomGenerator>(self, rg: R) -> NegamaxSearchBuilder<R> {
        NegamaxSearchBuilder {
            random_generator: rg,
            config: self.config,
        }
    }

    /// Enables or disables alpha-beta pruning.
    pub fn with_alpha_beta_pruning(mut self, use_abp: bool) -> Self {
        self.config.alpha_beta_pruning = use_abp;
        self
    }

    /// Selects how terminal positions are scored.
    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.config.scoring = scoring;
        self
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> NegamaxSearch<K> {
        NegamaxSearch::new(self.random_generator, self.config)
    }
}

impl NegamaxSearch<StandardRandomGenerator> {
    /// Returns a builder that starts from the thread-local generator.
    pub fn builder() -> NegamaxSearchBuilder<StandardRandomGenerator> {
        NegamaxSearchBuilder::new()
    }
}

impl<K: RandomGenerator> NegamaxSearch<K> {
    /// Creates a new engine. Prefer [`NegamaxSearch::builder`].
    pub fn new(random: K, config: SearchConfig) -> Self {
        Self {
            random,
            config,
            nodes_visited: 0,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Number of positions evaluated by the most recent search.
    pub fn nodes_visited(&self) -> u64 {
        self.nodes_visited
    }

    /// Picks an optimal move for `player`, choosing uniformly among tied moves.
    ///
    /// Fails with [`Error::GameOver`] when the board is already decided.
    pub fn best_move(&mut self, board: &Board, player: Player) -> Result<Move> {
        let best = self.best_moves(board, player)?;
        let chosen = *self
            .random
            .choose(&best.moves)
            .ok_or(Error::NoValidMoves)?;
        trace!(player = %player, chosen, "move chosen");
        Ok(chosen)
    }

    /// Scores every legal move for `player` and returns all moves tied for the best value.
    pub fn best_moves(&mut self, board: &Board, player: Player) -> Result<BestMoves> {
        let outcome = evaluate(board);
        if outcome != Outcome::InProgress {
            return Err(Error::GameOver(outcome));
        }

        self.nodes_visited = 0;
        let mut scratch = *board;
        let mut best = BestMoves {
            value: -INFINITY,
            moves: Vec::new(),
        };

        for mv in board.available_moves() {
            // One below the best keeps every sibling that ties it exact.
            let floor = if self.config.alpha_beta_pruning && !best.moves.is_empty() {
                best.value - 1
            } else {
                -INFINITY
            };
            scratch.place(mv, player);
            let score = -self.negamax(&mut scratch, 1, player.opponent(), -INFINITY, -floor);
            scratch.clear(mv);
            trace!(mv, score, "root move scored");

            if score > best.value {
                best.value = score;
                best.moves.clear();
                best.moves.push(mv);
            } else if score == best.value {
                best.moves.push(mv);
            }
        }

        debug!(
            player = %player,
            value = best.value,
            moves = ?best.moves,
            nodes = self.nodes_visited,
            "root search finished"
        );
        Ok(best)
    }

    /// Exact value of the position for `player` to move. Decided boards are scored directly.
    pub fn score(&mut self, board: &Board, player: Player) -> Score {
        self.nodes_visited = 0;
        let mut scratch = *board;
        self.negamax(&mut scratch, 0, player, -INFINITY, INFINITY)
    }

    /// Fail-soft negamax. A result inside `(alpha, beta)` is exact; a result at or below `alpha`
    /// is an upper bound and one at or above `beta` a lower bound.
    ///
    /// `board` is restored before returning.
    pub(crate) fn negamax(
        &mut self,
        board: &mut Board,
        depth: Score,
        to_move: Player,
        mut alpha: Score,
        beta: Score,
    ) -> Score {
        self.nodes_visited += 1;
        if let Some(score) = self
            .config
            .scoring
            .terminal_score(evaluate(board), to_move, depth)
        {
            return score;
        }

        let mut best = -INFINITY;
        for mv in 0..CELL_COUNT {
            if board.cell(mv).is_some() {
                continue;
            }
            board.place(mv, to_move);
            let score = -self.negamax(board, depth + 1, to_move.opponent(), -beta, -alpha);
            board.clear(mv);

            best = best.max(score);
            alpha = alpha.max(best);
            if self.config.alpha_beta_pruning && alpha >= beta {
                break;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::rotate_move;
    use crate::random::{FirstChoiceGenerator, SeededRandomGenerator};

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn engine(pruning: bool) -> NegamaxSearch<FirstChoiceGenerator> {
        NegamaxSearch::builder()
            .with_random_generator(FirstChoiceGenerator)
            .with_alpha_beta_pruning(pruning)
            .build()
    }

    #[test]
    fn completes_the_row_for_an_immediate_win() {
        // arrange
        let b = board("XX./OO./...");
        let mut search = engine(true);

        // act
        let best = search.best_moves(&b, Player::X).unwrap();

        // assert
        assert_eq!(best.moves, vec![2]);
        assert_eq!(best.value, WIN_SCORE - 1);
        assert_eq!(search.best_move(&b, Player::X).unwrap(), 2);
    }

    #[test]
    fn blocks_the_only_threat() {
        let b = board("XX./.O./...");
        let best = engine(true).best_moves(&b, Player::O).unwrap();
        assert_eq!(best.moves, vec![2]);
    }

    #[test]
    fn prefers_the_fastest_win() {
        // X wins at once on 2; 3 and 4 also force a win, but two moves later.
        let b = board("XX./..O/.O.");

        let depth_sensitive = engine(true).best_moves(&b, Player::X).unwrap();
        assert_eq!(depth_sensitive.moves, vec![2]);

        let mut legacy = NegamaxSearch::builder()
            .with_random_generator(FirstChoiceGenerator)
            .with_scoring(Scoring::Legacy)
            .build();
        let legacy_best = legacy.best_moves(&b, Player::X).unwrap();
        assert_eq!(legacy_best.value, WIN_SCORE);
        assert!(legacy_best.moves.contains(&2));
        assert!(legacy_best.moves.contains(&4));
    }

    #[test]
    fn delays_a_forced_loss() {
        // Blocking on 1 only postpones the loss: X answers on 6 with a double threat.
        let b = board("X.X/.../..O");
        let best = engine(true).best_moves(&b, Player::O).unwrap();
        assert_eq!(best.value, 4 - WIN_SCORE);
        assert_eq!(best.moves, vec![1]);
    }

    #[test]
    fn every_reply_to_a_double_threat_loses_at_once() {
        let b = board("X.X/.O./X.O");
        let best = engine(true).best_moves(&b, Player::O).unwrap();
        assert_eq!(best.value, 2 - WIN_SCORE);
        assert_eq!(best.moves, vec![1, 3, 5, 7]);
    }

    #[test]
    fn empty_board_is_a_draw_with_every_move_tied() {
        let best = engine(true).best_moves(&Board::new(), Player::X).unwrap();
        assert_eq!(best.value, 0);
        assert_eq!(best.moves, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn first_move_leaves_the_game_in_progress() {
        let mut b = Board::new();
        let mv = NegamaxSearch::builder()
            .with_random_generator(SeededRandomGenerator::new(1))
            .build()
            .best_move(&b, Player::O)
            .unwrap();
        b.play(mv, Player::O).unwrap();
        assert_eq!(evaluate(&b), Outcome::InProgress);
    }

    #[test]
    fn pruning_keeps_value_and_tied_moves() {
        let positions = [
            ".........",
            "X........",
            "....X....",
            "X...O....",
            "XO.......",
            "X.O.X....",
            "XX./OO./...",
            "X.X/.../..O",
            "X.X/.O./X.O",
            "O.X/.X./...",
        ];
        for p in positions {
            let b = board(p);
            let player = b.next_player(Player::X);
            let mut pruned = engine(true);
            let mut full = engine(false);

            let with = pruned.best_moves(&b, player).unwrap();
            let without = full.best_moves(&b, player).unwrap();

            assert_eq!(with, without, "position {p}");
            assert!(pruned.nodes_visited() <= full.nodes_visited(), "position {p}");
        }
    }

    #[test]
    fn pruning_visits_fewer_nodes_on_the_empty_board() {
        let mut pruned = engine(true);
        let mut full = engine(false);
        pruned.best_moves(&Board::new(), Player::X).unwrap();
        full.best_moves(&Board::new(), Player::X).unwrap();
        assert!(pruned.nodes_visited() < full.nodes_visited());
    }

    #[test]
    fn tied_moves_rotate_with_the_board() {
        for p in ["X........", "X...O....", ".X..O....", "XO..X....", "X.O.X...."] {
            let b = board(p);
            let player = b.next_player(Player::X);
            let mut search = engine(true);

            let original = search.best_moves(&b, player).unwrap();
            let rotated = search.best_moves(&b.rotated(), player).unwrap();

            let mut expected: Vec<Move> = original.moves.iter().map(|&m| rotate_move(m)).collect();
            expected.sort_unstable();
            assert_eq!(rotated.value, original.value, "position {p}");
            assert_eq!(rotated.moves, expected, "position {p}");
        }
    }

    #[test]
    fn search_leaves_the_board_untouched() {
        let b = board("X.O/.X./...");
        let before = b;
        let mut search = engine(true);
        search.best_move(&b, Player::O).unwrap();
        assert_eq!(b, before);

        let mut scratch = b;
        search.negamax(&mut scratch, 0, Player::O, -10, 10);
        assert_eq!(scratch, before);
    }

    #[test]
    fn decided_boards_are_rejected() {
        let won = board("XXX/OO./...");
        let mut search = engine(true);
        assert_eq!(
            search.best_move(&won, Player::O),
            Err(Error::GameOver(evaluate(&won)))
        );

        let tie = board("XOX/XOO/OXX");
        assert_eq!(
            search.best_moves(&tie, Player::X),
            Err(Error::GameOver(Outcome::Tie))
        );
    }

    #[test]
    fn score_of_terminal_and_open_positions() {
        let mut search = engine(true);
        assert_eq!(search.score(&board("XOX/XOO/OXX"), Player::O), 0);
        assert_eq!(search.score(&board("XXX/OO./..."), Player::O), -WIN_SCORE);
        assert_eq!(search.score(&Board::new(), Player::X), 0);
        assert_eq!(search.score(&board("XX./OO./..."), Player::X), WIN_SCORE - 1);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"scoring":"legacy"}"#).unwrap();
        assert!(config.alpha_beta_pruning);
        assert_eq!(config.scoring, Scoring::Legacy);

        let search = NegamaxSearch::builder().with_config(config).build();
        assert_eq!(search.config(), &config);
        assert_eq!(SearchConfig::default().scoring, Scoring::DepthSensitive);
    }
}
