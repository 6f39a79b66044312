use crate::chess::{Board, File, Move, Piece, Promotion, Role, Square};
use crate::rules::movegen::{back_rank, pawn_advance};
use crate::rules::{is_check, leaves_king_in_check, Moved};
use arrayvec::ArrayVec;
use test_strategy::Arbitrary;

/// One of the two ways to castle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Arbitrary)]
pub enum Castle {
    /// Castling towards the `h`-file.
    Short,
    /// Castling towards the `a`-file.
    Long,
}

impl Castle {
    pub const ALL: [Self; 2] = [Castle::Short, Castle::Long];

    /// The castle a king [`Move`] stands for, if it travels two files.
    #[inline(always)]
    pub fn of(board: &Board, m: Move) -> Option<Self> {
        if !board[m.whence()].is_some_and(|p| p.role() == Role::King) {
            return None;
        }

        match m.whither().file() - m.whence().file() {
            2 => Some(Castle::Short),
            -2 => Some(Castle::Long),
            _ => None,
        }
    }

    /// The file the rook starts on.
    #[inline(always)]
    pub fn rook_file(&self) -> File {
        match self {
            Castle::Short => File::H,
            Castle::Long => File::A,
        }
    }

    /// The file the rook lands on, which the king also passes through.
    #[inline(always)]
    pub fn rook_target(&self) -> File {
        match self {
            Castle::Short => File::F,
            Castle::Long => File::D,
        }
    }

    /// The file the king lands on.
    #[inline(always)]
    pub fn king_target(&self) -> File {
        match self {
            Castle::Short => File::G,
            Castle::Long => File::C,
        }
    }

    /// The files that must be vacant between king and rook.
    #[inline(always)]
    fn between(&self) -> &'static [File] {
        match self {
            Castle::Short => &[File::F, File::G],
            Castle::Long => &[File::B, File::C, File::D],
        }
    }
}

/// The en passant capture available to the pawn on `whence`, if any.
///
/// It requires the `last` move to have been a two-square advance by an
/// opposing pawn that now stands beside this one, and the capture must not
/// leave the capturing side's king in check.
pub fn en_passant(board: &Board, whence: Square, last: Option<Move>) -> Option<Move> {
    let Piece(side, Role::Pawn) = board[whence]? else {
        return None;
    };

    let last = last?;
    let passer = last.whither();

    if board[passer] != Some(Piece(!side, Role::Pawn))
        || (passer.rank() - last.whence().rank()).abs() != 2
        || passer.rank() != whence.rank()
        || (passer.file() - whence.file()).abs() != 1
    {
        return None;
    }

    let whither = whence.offset(pawn_advance(side), passer.file() - whence.file())?;
    let m = Move(whence, whither, Promotion::None);
    (!leaves_king_in_check(board, m, side)).then_some(m)
}

/// The castling moves available to the king on `whence`.
///
/// Castling requires the king to stand on its home square, neither it nor
/// the rook to have moved, every square between them to be vacant, and the
/// king not to be in check on its origin, on the square it passes through,
/// or on the square it lands on.
pub fn castles(board: &Board, whence: Square, moved: Moved) -> ArrayVec<Move, 2> {
    let mut moves = ArrayVec::new();

    let Some(Piece(side, Role::King)) = board[whence] else {
        return moves;
    };

    let home = back_rank(side);
    if whence != Square::new(File::E, home) || moved.contains(Moved::king(side)) {
        return moves;
    }

    if is_check(board, side) {
        return moves;
    }

    for castle in Castle::ALL {
        if moved.contains(Moved::rook(side, castle)) {
            continue;
        }

        if board[Square::new(castle.rook_file(), home)] != Some(Piece(side, Role::Rook)) {
            continue;
        }

        if castle
            .between()
            .iter()
            .any(|&f| board[Square::new(f, home)].is_some())
        {
            continue;
        }

        let through = Move(whence, Square::new(castle.rook_target(), home), Promotion::None);
        let castling = Move(whence, Square::new(castle.king_target(), home), Promotion::None);

        if !leaves_king_in_check(board, through, side)
            && !leaves_king_in_check(board, castling, side)
        {
            moves.push(castling);
        }
    }

    moves
}
