use crate::chess::{Board, Color, Move, Piece, Role, Square};
use crate::rules::is_check;

/// Whether a pawn [`Move`] captures en passant on this board.
///
/// That is the case for a pawn moving diagonally onto a vacant square.
#[inline(always)]
pub fn is_en_passant(board: &Board, m: Move) -> bool {
    board[m.whence()].is_some_and(|p| p.role() == Role::Pawn)
        && (m.whither().file() - m.whence().file()).abs() == 1
        && board[m.whither()].is_none()
}

/// Relocates the piece moved by `m` on `board`, as played by `side`.
///
/// The promoted piece replaces the pawn if the move promotes and an en
/// passant capture also removes the captured pawn, whose square is returned.
/// Rooks are not moved when castling.
pub(crate) fn displace(board: &mut Board, m: Move, side: Color) -> Option<Square> {
    let en_passant = is_en_passant(board, m);
    let piece = match m.promotion().role() {
        Some(r) => Some(Piece(side, r)),
        None => board[m.whence()],
    };

    board.set(m.whence(), None);
    board.set(m.whither(), piece);

    if en_passant {
        let captured = Square::new(m.whither().file(), m.whence().rank());
        board.set(captured, None);
        Some(captured)
    } else {
        None
    }
}

/// Whether playing `m` would leave the king of `side` in check.
///
/// The move is tried on a copy, so `board` is never modified.
pub fn leaves_king_in_check(board: &Board, m: Move, side: Color) -> bool {
    let mut scratch = *board;
    displace(&mut scratch, m, side);
    is_check(&scratch, side)
}
