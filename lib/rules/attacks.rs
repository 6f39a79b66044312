use crate::chess::{Board, Color, Role, Square};
use crate::rules::{movegen::pawn_advance, pseudo_moves};

/// Whether any piece of a [`Color`] attacks a [`Square`].
///
/// Pawns attack only diagonally, so a pawn standing in front of the square
/// does not count. A square held by a piece of the attacking color is never
/// attacked.
pub fn is_attacked(board: &Board, sq: Square, by: Color) -> bool {
    if board[sq].is_some_and(|p| p.color() == by) {
        return false;
    }

    board
        .iter()
        .filter(|(_, p)| p.color() == by)
        .any(|(whence, p)| match p.role() {
            Role::Pawn => [-1, 1]
                .into_iter()
                .any(|df| whence.offset(pawn_advance(by), df) == Some(sq)),
            _ => pseudo_moves(board, whence).iter().any(|m| m.whither() == sq),
        })
}

/// Whether the king of a [`Color`] is in check.
///
/// A side without a king is never in check.
pub fn is_check(board: &Board, side: Color) -> bool {
    match board.king(side) {
        None => false,
        Some(king) => is_attacked(board, king, !side),
    }
}
