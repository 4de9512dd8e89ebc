use foxo_engine::board::{Board, Player};
use foxo_engine::outcome::{Outcome, evaluate};
use foxo_engine::random::{RandomGenerator, SeededRandomGenerator, StandardRandomGenerator};
use foxo_engine::search::NegamaxSearch;
use tracing_subscriber::EnvFilter;

const FOXO: Player = Player::O;
const CHICK: Player = Player::X;
const GAMES: u32 = 200;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Foxo opens, as in the app
    let mut foxo = NegamaxSearch::builder()
        .with_random_generator(StandardRandomGenerator)
        .build();

    // Print the value of every opening move
    let analysis = foxo.analyze(&Board::new(), FOXO).unwrap();
    for node in analysis.moves() {
        println!(
            "Move: {:?} = {} ({} plies)",
            node.prev_move,
            node.score,
            analysis
                .principal_variation(node.prev_move.unwrap())
                .unwrap()
                .len()
        );
    }
    println!("Best opening moves: {:?}", analysis.best_moves());

    // Play against a chick that moves at random
    let mut chick = SeededRandomGenerator::default();
    let (mut foxo_wins, mut ties) = (0, 0);
    for _ in 0..GAMES {
        let mut board = Board::new();
        let mut to_move = FOXO;
        let outcome = loop {
            let outcome = evaluate(&board);
            if outcome.is_terminal() {
                break outcome;
            }
            let mv = if to_move == FOXO {
                foxo.best_move(&board, FOXO).unwrap()
            } else {
                *chick.choose(&board.available_moves()).unwrap()
            };
            board.play(mv, to_move).unwrap();
            to_move = to_move.opponent();
        };

        match outcome {
            Outcome::Won { winner, .. } => {
                assert_eq!(winner, FOXO, "the chick beat Foxo:\n{board}");
                foxo_wins += 1;
            }
            Outcome::Tie => ties += 1,
            Outcome::InProgress => unreachable!(),
        }
    }

    println!("Foxo won {foxo_wins} of {GAMES} games, {ties} ties, {CHICK} never won");
}
