use crate::chess::{Board, Color, Move, Promotion, Rank, Role, Square};
use arrayvec::ArrayVec;
use derive_more::{Deref, IntoIterator};

/// A bounded collection of distinct [`Move`]s.
///
/// No piece ever has more than 27 moves available, so this never allocates.
#[derive(Debug, Default, Clone, Eq, PartialEq, Deref, IntoIterator)]
pub struct MoveSet(#[into_iterator(owned, ref)] ArrayVec<Move, 32>);

impl MoveSet {
    #[inline(always)]
    pub(crate) fn push(&mut self, m: Move) {
        debug_assert!(!self.0.contains(&m));
        self.0.push(m);
    }
}

impl Extend<Move> for MoveSet {
    #[inline(always)]
    fn extend<I: IntoIterator<Item = Move>>(&mut self, moves: I) {
        for m in moves {
            self.push(m);
        }
    }
}

impl FromIterator<Move> for MoveSet {
    #[inline(always)]
    fn from_iter<I: IntoIterator<Item = Move>>(moves: I) -> Self {
        let mut set = MoveSet::default();
        set.extend(moves);
        set
    }
}

const AXES: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[rustfmt::skip]
const KNIGHT: [(i8, i8); 8] = [
    (2, 1), (2, -1), (-2, 1), (-2, -1),
    (1, 2), (1, -2), (-1, 2), (-1, -2),
];

#[rustfmt::skip]
const KING: [(i8, i8); 8] = [
    (1, 0), (-1, 0), (0, 1), (0, -1),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];

/// The direction pawns of a [`Color`] advance, in ranks.
#[inline(always)]
pub(crate) fn pawn_advance(c: Color) -> i8 {
    match c {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// The rank a [`Color`]'s pieces start on.
#[inline(always)]
pub(crate) fn back_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::First,
        Color::Black => Rank::Eighth,
    }
}

/// The rank a [`Color`]'s pawns start on.
#[inline(always)]
fn pawn_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::Second,
        Color::Black => Rank::Seventh,
    }
}

/// The [pseudo-legal] moves of the piece on a [`Square`].
///
/// These follow the piece's movement pattern and the occupancy of the board,
/// but may leave the mover's own king in check. En passant and castling are
/// never included. The set is empty if the square is vacant.
///
/// [pseudo-legal]: https://www.chessprogramming.org/Pseudo-Legal_Move
pub fn pseudo_moves(board: &Board, whence: Square) -> MoveSet {
    let mut moves = MoveSet::default();

    if let Some(piece) = board[whence] {
        let side = piece.color();
        match piece.role() {
            Role::Pawn => pawn(board, whence, side, &mut moves),
            Role::Knight => leap(board, whence, side, &KNIGHT, &mut moves),
            Role::Bishop => slide(board, whence, side, &DIAGONALS, &mut moves),
            Role::Rook => slide(board, whence, side, &AXES, &mut moves),
            Role::Queen => {
                slide(board, whence, side, &AXES, &mut moves);
                slide(board, whence, side, &DIAGONALS, &mut moves);
            }
            Role::King => leap(board, whence, side, &KING, &mut moves),
        }
    }

    moves
}

fn slide(board: &Board, whence: Square, side: Color, rays: &[(i8, i8)], moves: &mut MoveSet) {
    for &(dr, df) in rays {
        let mut ray = whence.offset(dr, df);
        while let Some(whither) = ray {
            match board[whither] {
                None => moves.push(Move(whence, whither, Promotion::None)),
                Some(p) => {
                    if p.color() != side {
                        moves.push(Move(whence, whither, Promotion::None));
                    }

                    break;
                }
            }

            ray = whither.offset(dr, df);
        }
    }
}

fn leap(board: &Board, whence: Square, side: Color, jumps: &[(i8, i8)], moves: &mut MoveSet) {
    for &(dr, df) in jumps {
        if let Some(whither) = whence.offset(dr, df) {
            if board[whither].map_or(true, |p| p.color() != side) {
                moves.push(Move(whence, whither, Promotion::None));
            }
        }
    }
}

fn pawn(board: &Board, whence: Square, side: Color, moves: &mut MoveSet) {
    let dr = pawn_advance(side);

    if let Some(whither) = whence.offset(dr, 0).filter(|&sq| board[sq].is_none()) {
        advance(whence, whither, side, moves);

        if whence.rank() == pawn_rank(side) {
            if let Some(double) = whence.offset(2 * dr, 0).filter(|&sq| board[sq].is_none()) {
                moves.push(Move(whence, double, Promotion::None));
            }
        }
    }

    for df in [-1, 1] {
        if let Some(whither) = whence.offset(dr, df) {
            if board[whither].is_some_and(|p| p.color() != side) {
                advance(whence, whither, side, moves);
            }
        }
    }
}

/// Pushes a pawn move, expanded into every promotion choice on the last rank.
fn advance(whence: Square, whither: Square, side: Color, moves: &mut MoveSet) {
    if whither.rank() == back_rank(!side) {
        for p in Promotion::ALL {
            moves.push(Move(whence, whither, p));
        }
    } else {
        moves.push(Move(whence, whither, Promotion::None));
    }
}
