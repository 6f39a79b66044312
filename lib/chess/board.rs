use crate::chess::{Color, File, Piece, Rank, Role, Square};
use derive_more::{DebugCustom, Display, Error};
use proptest::{prelude::*, strategy::BoxedStrategy};
use std::fmt::{self, Write};
use std::{ops::Index, str::FromStr};

/// The piece placement on the chess board.
///
/// This type does not validate whether the placement it holds is reachable
/// under the rules of chess, e.g. a board may hold any number of kings.
#[derive(DebugCustom, Copy, Clone, Eq, PartialEq, Hash)]
#[debug(fmt = "Board({self})")]
pub struct Board([Option<Piece>; 64]);

// We provide a custom implementation of Arbitrary rather than deriving,
// otherwise proptest overflows the stack generating large arrays.
impl Arbitrary for Board {
    type Parameters = ();
    type Strategy = BoxedStrategy<Board>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        proptest::collection::vec(any::<Option<Piece>>(), 64)
            .prop_map(|v| {
                let mut board = Board::empty();
                for (sq, p) in Square::iter().zip(v) {
                    board.set(sq, p);
                }

                board
            })
            .boxed()
    }
}

impl Default for Board {
    /// The standard initial setup.
    fn default() -> Self {
        let mut board = Board::empty();
        board.reset();
        board
    }
}

impl Board {
    const BACK_RANK: [Role; 8] = [
        Role::Rook,
        Role::Knight,
        Role::Bishop,
        Role::Queen,
        Role::King,
        Role::Bishop,
        Role::Knight,
        Role::Rook,
    ];

    /// A board with no pieces.
    #[inline(always)]
    pub fn empty() -> Self {
        Board([None; 64])
    }

    /// Restores the standard initial setup.
    pub fn reset(&mut self) {
        *self = Board::empty();

        for (f, role) in File::iter().zip(Self::BACK_RANK) {
            self.set(Square::new(f, Rank::First), Some(Piece(Color::White, role)));
            self.set(Square::new(f, Rank::Second), Some(Piece(Color::White, Role::Pawn)));
            self.set(Square::new(f, Rank::Seventh), Some(Piece(Color::Black, Role::Pawn)));
            self.set(Square::new(f, Rank::Eighth), Some(Piece(Color::Black, role)));
        }
    }

    /// The [`Piece`] on the given [`Square`], if any.
    #[inline(always)]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.0[sq.index()]
    }

    /// Places a [`Piece`] on the given [`Square`], or clears it.
    #[inline(always)]
    pub fn set(&mut self, sq: Square, p: Option<Piece>) {
        self.0[sq.index()] = p;
    }

    /// Removes and returns the [`Piece`] on the given [`Square`], if any.
    #[inline(always)]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.0[sq.index()].take()
    }

    /// An iterator over all pieces on the board, from `a1` to `h8`.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|sq| Some((sq, self.piece_on(sq)?)))
    }

    /// An iterator over the squares occupied by pieces of a [`Color`].
    #[inline(always)]
    pub fn by_color(&self, c: Color) -> impl Iterator<Item = Square> + '_ {
        self.iter()
            .filter(move |(_, p)| p.color() == c)
            .map(|(sq, _)| sq)
    }

    /// The [`Square`] occupied by the king of a [`Color`].
    ///
    /// If there are several, the first one from `a1` to `h8` is returned.
    #[inline(always)]
    pub fn king(&self, c: Color) -> Option<Square> {
        let king = Piece(c, Role::King);
        self.iter().find(|&(_, p)| p == king).map(|(sq, _)| sq)
    }
}

/// Retrieves the [`Piece`] at a given [`Square`], if any.
impl Index<Square> for Board {
    type Output = Option<Piece>;

    #[inline(always)]
    fn index(&self, sq: Square) -> &Self::Output {
        &self.0[sq.index()]
    }
}

/// Formats the FEN piece placement field, or a diagram in the alternate form.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return self.diagram(f);
        }

        for r in Rank::iter().rev() {
            let mut skip = 0;
            for file in File::iter() {
                match self[Square::new(file, r)] {
                    None => skip += 1,
                    Some(p) => {
                        if skip > 0 {
                            write!(f, "{skip}")?;
                            skip = 0;
                        }

                        write!(f, "{p}")?;
                    }
                }
            }

            if skip > 0 {
                write!(f, "{skip}")?;
            }

            if r != Rank::First {
                f.write_char('/')?;
            }
        }

        Ok(())
    }
}

impl Board {
    fn diagram(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for file in File::iter() {
            write!(f, "  {file} ")?;
        }

        writeln!(f)?;
        writeln!(f, "   +---+---+---+---+---+---+---+---+")?;
        for r in Rank::iter().rev() {
            write!(f, " {r} |")?;

            for file in File::iter() {
                match self[Square::new(file, r)] {
                    Some(p) => write!(f, " {p:#} |")?,
                    None => write!(f, "   |")?,
                }
            }

            writeln!(f, " {r}")?;
            writeln!(f, "   +---+---+---+---+---+---+---+---+")?;
        }

        write!(f, "   ")?;
        for file in File::iter() {
            write!(f, "  {file} ")?;
        }

        Ok(())
    }
}

/// The reason why parsing the FEN piece placement failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParseBoardError {
    #[display(fmt = "expected exactly 8 ranks separated by `/`")]
    WrongNumberOfRanks,
    #[display(fmt = "a rank describes more than 8 squares")]
    RankOverflow,
    #[display(fmt = "a rank describes fewer than 8 squares")]
    RankUnderflow,
    #[display(fmt = "unexpected character `{_0}` in piece placement")]
    InvalidPiece(#[error(not(source))] char),
}

/// Parses the FEN piece placement field.
///
/// Any further FEN fields after the first space are ignored.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let placement = s.split(' ').next().unwrap_or_default();
        let ranks: Vec<_> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(ParseBoardError::WrongNumberOfRanks);
        }

        let mut board = Board::empty();
        for (r, segment) in Rank::iter().rev().zip(ranks) {
            let mut file = 0i8;
            for c in segment.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip as i8;
                } else {
                    let p = Piece::try_from(c).map_err(|_| ParseBoardError::InvalidPiece(c))?;
                    let f = File::from_index(file).ok_or(ParseBoardError::RankOverflow)?;
                    board.set(Square::new(f, r), Some(p));
                    file += 1;
                }

                if file > 8 {
                    return Err(ParseBoardError::RankOverflow);
                }
            }

            if file < 8 {
                return Err(ParseBoardError::RankUnderflow);
            }
        }

        Ok(board)
    }
}
