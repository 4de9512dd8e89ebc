use crate::board::{Board, Move, Player};
use crate::error::{Error, Result};
use crate::outcome::{Outcome, evaluate};
use crate::random::RandomGenerator;
use crate::search::{INFINITY, NegamaxSearch, Score};
use ego_tree::{NodeId, Tree};
use tracing::debug;

/// A single position in an [`Analysis`] tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisNode {
    /// The move that led to this position. `None` for the root.
    pub prev_move: Option<Move>,
    /// The player who made `prev_move`; for the root, the player to move.
    pub player: Player,
    /// Exact value for `player`: of `prev_move`, or of the whole position at the root.
    pub score: Score,
    /// The outcome of the position after `prev_move`.
    pub outcome: Outcome,
    /// Number of moves played since the root.
    pub height: u32,
}

/// Exact scores of every legal move, each followed by its principal variation.
///
/// The root holds the analysed position. Every child of the root is one legal move; below it
/// hangs a single chain of best replies down to the end of the game.
#[derive(Debug, Clone)]
pub struct Analysis {
    tree: Tree<AnalysisNode>,
}

impl Analysis {
    pub fn tree(&self) -> &Tree<AnalysisNode> {
        &self.tree
    }

    pub fn root(&self) -> &AnalysisNode {
        self.tree.root().value()
    }

    /// The value of the position for the player to move.
    pub fn value(&self) -> Score {
        self.root().score
    }

    /// The scored root moves, in ascending index order.
    pub fn moves(&self) -> impl Iterator<Item = &AnalysisNode> {
        self.tree.root().children().map(|child| child.value())
    }

    /// All root moves that achieve [`Analysis::value`].
    pub fn best_moves(&self) -> Vec<Move> {
        let value = self.value();
        self.moves()
            .filter(|node| node.score == value)
            .filter_map(|node| node.prev_move)
            .collect()
    }

    /// The line of play starting with `mv`, or `None` if `mv` was not a legal root move.
    pub fn principal_variation(&self, mv: Move) -> Option<Vec<Move>> {
        let first = self
            .tree
            .root()
            .children()
            .find(|child| child.value().prev_move == Some(mv))?;

        let mut line = Vec::new();
        let mut node = Some(first);
        while let Some(current) = node {
            line.extend(current.value().prev_move);
            node = current.first_child();
        }
        Some(line)
    }
}

impl<K: RandomGenerator> NegamaxSearch<K> {
    /// Scores every legal move for `player` exactly and records its principal variation.
    ///
    /// Unlike [`NegamaxSearch::best_moves`] every root move is searched with a full window, so
    /// losing moves get their true score as well.
    pub fn analyze(&mut self, board: &Board, player: Player) -> Result<Analysis> {
        let outcome = evaluate(board);
        if outcome.is_terminal() {
            return Err(Error::GameOver(outcome));
        }

        self.nodes_visited = 0;
        let mut scored = Vec::new();
        for mv in board.available_moves() {
            let mut child = *board;
            child.place(mv, player);
            let score = -self.negamax(&mut child, 1, player.opponent(), -INFINITY, INFINITY);
            scored.push((mv, score, child));
        }
        let value = scored
            .iter()
            .map(|(_, score, _)| *score)
            .max()
            .ok_or(Error::NoValidMoves)?;

        let mut tree = Tree::new(AnalysisNode {
            prev_move: None,
            player,
            score: value,
            outcome,
            height: 0,
        });
        for (mv, score, child) in scored {
            let id = tree
                .root_mut()
                .append(AnalysisNode {
                    prev_move: Some(mv),
                    player,
                    score,
                    outcome: evaluate(&child),
                    height: 1,
                })
                .id();
            let line = self.principal_line(child, player.opponent(), 1);
            append_chain(&mut tree, id, line);
        }

        debug!(
            player = %player,
            value,
            nodes = self.nodes_visited(),
            "analysis finished"
        );
        Ok(Analysis { tree })
    }

    /// Plays best replies from `board` until the game ends, lowest index first among ties.
    fn principal_line(
        &mut self,
        mut board: Board,
        mut to_move: Player,
        mut height: u32,
    ) -> Vec<AnalysisNode> {
        let mut line = Vec::new();
        while !evaluate(&board).is_terminal() {
            let Some((mv, score)) = self.best_reply(&board, to_move, height) else {
                break;
            };
            board.place(mv, to_move);
            height += 1;
            line.push(AnalysisNode {
                prev_move: Some(mv),
                player: to_move,
                score,
                outcome: evaluate(&board),
                height,
            });
            to_move = to_move.opponent();
        }
        line
    }

    fn best_reply(
        &mut self,
        board: &Board,
        to_move: Player,
        height: u32,
    ) -> Option<(Move, Score)> {
        let depth = Score::try_from(height).ok()? + 1;
        let mut best: Option<(Move, Score)> = None;
        for mv in board.available_moves() {
            let mut child = *board;
            child.place(mv, to_move);
            let score = -self.negamax(&mut child, depth, to_move.opponent(), -INFINITY, INFINITY);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((mv, score));
            }
        }
        best
    }
}

fn append_chain(tree: &mut Tree<AnalysisNode>, parent: NodeId, line: Vec<AnalysisNode>) {
    let mut parent = parent;
    for value in line {
        let Some(mut node) = tree.get_mut(parent) else {
            return;
        };
        parent = node.append(value).id();
    }
}
