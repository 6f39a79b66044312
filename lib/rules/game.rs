use crate::chess::{Board, Color, Move, Piece, Role, Square};
use crate::rules::{castles, en_passant, is_check, leaves_king_in_check, pseudo_moves};
use crate::rules::{legality::displace, Castle, MoveSet, Moved, Outcome};
use derive_more::{Display, Error};
use proptest::sample::{Selector, SelectorStrategy};
use proptest::{prelude::*, strategy::Map};
use std::ops::Range;
use test_strategy::Arbitrary;
use tracing::{debug, instrument};

/// The reason why a [`Move`] was rejected by [`Game::play`].
#[derive(Debug, Display, Clone, Eq, PartialEq, Arbitrary, Error)]
pub enum InvalidMove {
    #[display(fmt = "there is no piece on square `{_0}`")]
    Vacant(#[error(not(source))] Square),

    #[display(fmt = "it is not the {} player's turn", "_0.color()")]
    OutOfTurn(#[error(not(source))] Piece),

    #[display(fmt = "move `{_0}` is illegal in this position")]
    Illegal(#[error(not(source))] Move),
}

/// A game of chess in progress.
///
/// Besides the [`Board`], a game remembers whose turn it is, the last move
/// played, and whether kings and rooks have moved, which is everything needed
/// to tell en passant and castling apart from illegal moves.
///
/// Two games are equal if they have the same board and side to move.
#[derive(Debug, Clone, Eq)]
pub struct Game {
    board: Board,
    turn: Color,
    last_move: Option<Move>,
    moved: Moved,
}

impl PartialEq for Game {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board && self.turn == other.turn
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl From<Board> for Game {
    /// Starts a game from an arbitrary [`Board`] with white to move.
    fn from(board: Board) -> Self {
        Game {
            board,
            turn: Color::White,
            last_move: None,
            moved: Moved::empty(),
        }
    }
}

impl Arbitrary for Game {
    type Parameters = ();
    type Strategy = Map<(Range<usize>, SelectorStrategy), fn((usize, Selector)) -> Game>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (0..48, any::<Selector>()).prop_map(|(plies, selector)| {
            let mut game = Game::new();

            for _ in 0..plies {
                let moves: Vec<_> = game.moves().collect();
                match selector.try_select(moves) {
                    None => break,
                    Some(m) => {
                        if game.play(m).is_err() {
                            break;
                        }
                    }
                }
            }

            game
        })
    }
}

impl Game {
    /// A new game in the standard initial setup, with white to move.
    pub fn new() -> Self {
        Game::from(Board::default())
    }

    /// The current [`Board`].
    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replaces the [`Board`].
    ///
    /// History is forgotten, so en passant is unavailable until the next
    /// double pawn advance and every king and rook counts as unmoved.
    /// The side to move is kept.
    pub fn set_board(&mut self, board: Board) {
        debug!(%board, "board replaced");
        self.board = board;
        self.last_move = None;
        self.moved = Moved::empty();
    }

    /// The side to move.
    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Sets the side to move without touching anything else.
    #[inline(always)]
    pub fn set_turn(&mut self, side: Color) {
        self.turn = side;
    }

    /// The last [`Move`] played, if any.
    #[inline(always)]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Which kings and rooks have left their home squares.
    #[inline(always)]
    pub fn moved(&self) -> Moved {
        self.moved
    }

    /// The legal moves of the piece on a [`Square`], or `None` if it is vacant.
    ///
    /// This does not depend on whose turn it is, the piece moves as its own
    /// color would.
    pub fn valid_moves(&self, whence: Square) -> Option<MoveSet> {
        let piece = self.board[whence]?;

        let mut moves: MoveSet = pseudo_moves(&self.board, whence)
            .into_iter()
            .filter(|&m| !leaves_king_in_check(&self.board, m, piece.color()))
            .collect();

        match piece.role() {
            Role::Pawn => moves.extend(en_passant(&self.board, whence, self.last_move)),
            Role::King => moves.extend(castles(&self.board, whence, self.moved)),
            _ => {}
        }

        Some(moves)
    }

    /// An iterator over the legal moves of the side to move.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.board
            .by_color(self.turn)
            .flat_map(move |whence| self.valid_moves(whence).into_iter().flatten())
    }

    fn has_moves(&self, side: Color) -> bool {
        self.board
            .by_color(side)
            .any(|whence| self.valid_moves(whence).is_some_and(|ms| !ms.is_empty()))
    }

    /// Whether the king of a [`Color`] is in [check].
    ///
    /// [check]: https://www.chessprogramming.org/Check
    pub fn is_check(&self, side: Color) -> bool {
        is_check(&self.board, side)
    }

    /// Whether a [`Color`] is [checkmated].
    ///
    /// [checkmated]: https://www.chessprogramming.org/Checkmate
    pub fn is_checkmate(&self, side: Color) -> bool {
        self.is_check(side) && !self.has_moves(side)
    }

    /// Whether a [`Color`] is [stalemated].
    ///
    /// [stalemated]: https://www.chessprogramming.org/Stalemate
    pub fn is_stalemate(&self, side: Color) -> bool {
        !self.is_check(side) && !self.has_moves(side)
    }

    /// The [`Outcome`] of the game, if the side to move has no legal moves.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.has_moves(self.turn) {
            None
        } else if self.is_check(self.turn) {
            Some(Outcome::Checkmate(!self.turn))
        } else {
            Some(Outcome::Stalemate)
        }
    }

    /// Plays a [`Move`] if it is legal for the side to move.
    #[instrument(level = "debug", skip(self), err)]
    pub fn play(&mut self, m: Move) -> Result<Move, InvalidMove> {
        let piece = self.board[m.whence()].ok_or(InvalidMove::Vacant(m.whence()))?;

        if piece.color() != self.turn {
            return Err(InvalidMove::OutOfTurn(piece));
        }

        if !self.valid_moves(m.whence()).is_some_and(|ms| ms.contains(&m)) {
            return Err(InvalidMove::Illegal(m));
        }

        let castle = Castle::of(&self.board, m);
        if let Some(captured) = displace(&mut self.board, m, self.turn) {
            debug!(%captured, "captured en passant");
        }

        if let Some(castle) = castle {
            let rank = m.whence().rank();
            let rook = self.board.take(Square::new(castle.rook_file(), rank));
            self.board.set(Square::new(castle.rook_target(), rank), rook);
            debug!(?castle, "castled");
        }

        if let Some(role) = m.promotion().role() {
            debug!(?role, "promoted");
        }

        self.moved.touch(m);
        self.last_move = Some(m);
        self.turn = !self.turn;
        debug!(turn = %self.turn, "move played");

        Ok(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::Promotion;
    use test_strategy::proptest;

    fn game(fen: &str, turn: Color) -> Game {
        let mut game = Game::from(fen.parse::<Board>().unwrap());
        game.set_turn(turn);
        game
    }

    fn m(whence: Square, whither: Square) -> Move {
        Move(whence, whither, Promotion::None)
    }

    #[test]
    fn new_game_starts_from_the_standard_setup() {
        let game = Game::new();
        assert_eq!(game.board(), &Board::default());
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.last_move(), None);
        assert_eq!(game.moved(), Moved::empty());
        assert_eq!(game, Game::default());
    }

    #[test]
    fn white_has_twenty_moves_in_the_standard_setup() {
        assert_eq!(Game::new().moves().count(), 20);
    }

    #[proptest]
    fn valid_moves_is_none_for_vacant_square(
        g: Game,
        #[filter(#g.board()[#sq].is_none())] sq: Square,
    ) {
        assert_eq!(g.valid_moves(sq), None);
    }

    #[proptest]
    fn valid_moves_never_leave_the_king_in_check(
        g: Game,
        #[filter(#g.board()[#sq].is_some())] sq: Square,
    ) {
        let side = g.board()[sq].map(|p| p.color()).unwrap();

        for m in g.valid_moves(sq).unwrap() {
            let mut next = g.clone();
            next.set_turn(side);
            assert_eq!(next.play(m), Ok(m));
            assert!(!next.is_check(side));
        }
    }

    #[proptest]
    fn moves_belong_to_the_side_to_move(g: Game) {
        for m in g.moves() {
            assert_eq!(g.board()[m.whence()].map(|p| p.color()), Some(g.turn()));
        }
    }

    #[proptest]
    fn play_flips_the_turn(
        #[filter(#g.outcome().is_none())] mut g: Game,
        #[map(|s: Selector| s.select(#g.moves()))] m: Move,
    ) {
        let turn = g.turn();
        assert_eq!(g.play(m), Ok(m));
        assert_eq!(g.turn(), !turn);
        assert_eq!(g.last_move(), Some(m));
    }

    #[proptest]
    fn play_never_clears_moved_flags(
        #[filter(#g.outcome().is_none())] mut g: Game,
        #[map(|s: Selector| s.select(#g.moves()))] m: Move,
    ) {
        let before = g.moved();
        assert_eq!(g.play(m), Ok(m));
        assert!(g.moved().contains(before));
    }

    #[proptest]
    fn play_fails_for_vacant_square(
        mut g: Game,
        #[filter(#g.board()[#m.whence()].is_none())] m: Move,
    ) {
        let before = g.clone();
        assert_eq!(g.play(m), Err(InvalidMove::Vacant(m.whence())));
        assert_eq!(g, before);
        assert_eq!(g.last_move(), before.last_move());
    }

    #[proptest]
    fn play_fails_out_of_turn(
        mut g: Game,
        #[filter(#g.board()[#m.whence()].is_some_and(|p| p.color() != #g.turn()))] m: Move,
    ) {
        let before = g.clone();
        let piece = g.board()[m.whence()].unwrap();
        assert_eq!(g.play(m), Err(InvalidMove::OutOfTurn(piece)));
        assert_eq!(g, before);
    }

    #[proptest]
    fn play_fails_for_illegal_move(
        mut g: Game,
        #[filter(#g.board()[#m.whence()].is_some_and(|p| p.color() == #g.turn())
            && !#g.moves().any(|n| n == #m))]
        m: Move,
    ) {
        let before = g.clone();
        assert_eq!(g.play(m), Err(InvalidMove::Illegal(m)));
        assert_eq!(g, before);
        assert_eq!(g.moved(), before.moved());
    }

    #[proptest]
    fn outcome_agrees_with_checkmate_and_stalemate(g: Game) {
        match g.outcome() {
            None => {
                assert!(!g.is_checkmate(g.turn()));
                assert!(!g.is_stalemate(g.turn()));
                assert!(g.moves().next().is_some());
            }

            Some(Outcome::Checkmate(winner)) => {
                assert_eq!(winner, !g.turn());
                assert!(g.is_checkmate(g.turn()));
            }

            Some(Outcome::Stalemate) => assert!(g.is_stalemate(g.turn())),
        }
    }

    #[proptest]
    fn checkmate_and_stalemate_are_exclusive(g: Game, c: Color) {
        assert!(!(g.is_checkmate(c) && g.is_stalemate(c)));
    }

    #[proptest]
    fn set_board_forgets_history(mut g: Game, b: Board) {
        let turn = g.turn();
        g.set_board(b);
        assert_eq!(g.board(), &b);
        assert_eq!(g.turn(), turn);
        assert_eq!(g.last_move(), None);
        assert_eq!(g.moved(), Moved::empty());
    }

    #[proptest]
    fn equality_ignores_history(g: Game) {
        let mut other = Game::from(*g.board());
        other.set_turn(g.turn());
        assert_eq!(g, other);
    }

    #[test]
    fn castling_short_moves_the_rook() {
        let mut g = game("r3k2r/8/8/8/8/8/8/R3K2R", Color::White);

        assert_eq!(g.play(m(Square::E1, Square::G1)), Ok(m(Square::E1, Square::G1)));
        assert_eq!(g.board().to_string(), "r3k2r/8/8/8/8/8/8/R4RK1");
        assert!(g.moved().contains(Moved::WHITE_KING));
        assert_eq!(g.turn(), Color::Black);
    }

    #[test]
    fn castling_long_moves_the_rook() {
        let mut g = game("r3k2r/8/8/8/8/8/8/R3K2R", Color::Black);

        assert_eq!(g.play(m(Square::E8, Square::C8)), Ok(m(Square::E8, Square::C8)));
        assert_eq!(g.board().to_string(), "2kr3r/8/8/8/8/8/8/R3K2R");
        assert!(g.moved().contains(Moved::BLACK_KING));
    }

    #[test]
    fn moving_a_rook_forfeits_castling_on_its_side() {
        let mut g = game("r3k2r/8/8/8/8/8/8/R3K2R", Color::White);

        g.play(m(Square::H1, Square::H2)).unwrap();
        g.play(m(Square::A8, Square::B8)).unwrap();
        g.play(m(Square::H2, Square::H1)).unwrap();
        g.play(m(Square::B8, Square::A8)).unwrap();

        assert_eq!(g.moved(), Moved::WHITE_H_ROOK | Moved::BLACK_A_ROOK);
        let king = g.valid_moves(Square::E1).unwrap();
        assert!(!king.contains(&m(Square::E1, Square::G1)));
        assert!(king.contains(&m(Square::E1, Square::C1)));
    }

    #[test]
    fn capturing_a_rook_forfeits_castling_on_its_side() {
        let mut g = game("r3k2r/8/8/8/8/8/8/R3K2R", Color::White);

        g.play(m(Square::H1, Square::H8)).unwrap();
        assert!(g.moved().contains(Moved::WHITE_H_ROOK));
        assert!(g.moved().contains(Moved::BLACK_H_ROOK));
    }

    #[test]
    fn en_passant_removes_the_captured_pawn() {
        let mut g = game("4k3/4p3/8/3P4/8/8/8/4K3", Color::Black);

        g.play(m(Square::E7, Square::E5)).unwrap();
        assert!(g.valid_moves(Square::D5).unwrap().contains(&m(Square::D5, Square::E6)));

        g.play(m(Square::D5, Square::E6)).unwrap();
        assert_eq!(g.board().to_string(), "4k3/8/4P3/8/8/8/8/4K3");
    }

    #[test]
    fn en_passant_expires_after_one_move() {
        let mut g = game("4k3/4p3/8/3P4/8/8/8/4K3", Color::Black);

        g.play(m(Square::E7, Square::E5)).unwrap();
        g.play(m(Square::E1, Square::E2)).unwrap();
        g.play(m(Square::E8, Square::E7)).unwrap();

        assert!(!g.valid_moves(Square::D5).unwrap().contains(&m(Square::D5, Square::E6)));
    }

    #[test]
    fn promotion_places_the_chosen_piece() {
        let mut g = game("4k3/1P6/8/8/8/8/8/4K3", Color::White);

        let promotion = Move(Square::B7, Square::B8, Promotion::Knight);
        assert_eq!(g.play(promotion), Ok(promotion));
        assert_eq!(g.board()[Square::B8], Some(Piece(Color::White, Role::Knight)));
    }

    #[test]
    fn promotion_requires_a_choice() {
        let mut g = game("4k3/1P6/8/8/8/8/8/4K3", Color::White);

        let push = m(Square::B7, Square::B8);
        assert_eq!(g.play(push), Err(InvalidMove::Illegal(push)));
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mut g = Game::new();

        for (whence, whither) in [
            (Square::F2, Square::F3),
            (Square::E7, Square::E5),
            (Square::G2, Square::G4),
            (Square::D8, Square::H4),
        ] {
            g.play(m(whence, whither)).unwrap();
        }

        assert!(g.is_checkmate(Color::White));
        assert_eq!(g.outcome(), Some(Outcome::Checkmate(Color::Black)));
        assert_eq!(g.moves().count(), 0);
    }

    #[test]
    fn cornered_king_is_stalemated() {
        let g = game("7k/5Q2/6K1/8/8/8/8/8", Color::Black);

        assert!(g.is_stalemate(Color::Black));
        assert!(!g.is_check(Color::Black));
        assert_eq!(g.outcome(), Some(Outcome::Stalemate));
    }

    #[test]
    fn side_without_pieces_is_stalemated() {
        let g = game("8/8/8/8/8/8/8/8", Color::White);
        assert_eq!(g.outcome(), Some(Outcome::Stalemate));
    }

    #[test]
    fn invalid_moves_have_readable_descriptions() {
        assert_eq!(
            InvalidMove::Vacant(Square::E4).to_string(),
            "there is no piece on square `e4`"
        );

        assert_eq!(
            InvalidMove::OutOfTurn(Piece(Color::Black, Role::Pawn)).to_string(),
            "it is not the black player's turn"
        );

        assert_eq!(
            InvalidMove::Illegal(m(Square::E2, Square::E5)).to_string(),
            "move `e2e5` is illegal in this position"
        );
    }
}
