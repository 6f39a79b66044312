use lib::chess::Board;
use lib::rules::Game;
use rayon::prelude::*;
use test_strategy::proptest;

fn perft(game: &Game, depth: u8) -> usize {
    match depth {
        0 => 1,
        1 => game.moves().count(),
        d => game
            .moves()
            .par_bridge()
            .map(|m| {
                let mut next = game.clone();
                assert_eq!(next.play(m), Ok(m));
                perft(&next, d - 1)
            })
            .sum(),
    }
}

#[cfg(not(tarpaulin))]
#[proptest(cases = 1)]
fn perft_expands_expected_number_of_nodes() {
    // https://www.chessprogramming.org/Perft_Results#Initial_Position
    assert_eq!(perft(&Game::new(), 4), 197281);

    // https://www.chessprogramming.org/Perft_Results#Position_2
    let board: Board = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1".parse()?;
    assert_eq!(perft(&Game::from(board), 3), 97862);

    // https://www.chessprogramming.org/Perft_Results#Position_3
    let board: Board = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1".parse()?;
    assert_eq!(perft(&Game::from(board), 4), 43238);

    // https://www.chessprogramming.org/Perft_Results#Position_4
    let board: Board = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1".parse()?;
    assert_eq!(perft(&Game::from(board), 3), 9467);

    // https://www.chessprogramming.org/Perft_Results#Position_5
    let board: Board = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8".parse()?;
    assert_eq!(perft(&Game::from(board), 3), 62379);
}

#[proptest(cases = 1)]
fn perft_counts_moves_after_black_to_move() {
    let mut game = Game::new();
    game.set_turn(lib::chess::Color::Black);
    assert_eq!(perft(&game, 1), 20);
    assert_eq!(perft(&game, 2), 400);
    assert_eq!(perft(&game, 3), 8902);
}
