use crate::chess::{Color, Move, Square};
use crate::rules::Castle;
use bitflags::bitflags;
use proptest::prelude::*;
use proptest::strategy::Map;
use std::ops::RangeInclusive;

bitflags! {
    /// Which kings and rooks have left their home squares.
    ///
    /// A set flag permanently forfeits the castling it guards.
    #[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct Moved: u8 {
        const WHITE_KING = 0b00_0001;
        const WHITE_A_ROOK = 0b00_0010;
        const WHITE_H_ROOK = 0b00_0100;
        const BLACK_KING = 0b00_1000;
        const BLACK_A_ROOK = 0b01_0000;
        const BLACK_H_ROOK = 0b10_0000;
    }
}

impl Arbitrary for Moved {
    type Parameters = ();
    type Strategy = Map<RangeInclusive<u8>, fn(u8) -> Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (0..=Moved::all().bits()).prop_map(Moved::from_bits_truncate as fn(u8) -> Self)
    }
}

impl Moved {
    /// The flag of the king of a [`Color`].
    #[inline(always)]
    pub fn king(side: Color) -> Self {
        match side {
            Color::White => Moved::WHITE_KING,
            Color::Black => Moved::BLACK_KING,
        }
    }

    /// The flag of the rook a [`Color`] castles with.
    #[inline(always)]
    pub fn rook(side: Color, castle: Castle) -> Self {
        match (side, castle) {
            (Color::White, Castle::Long) => Moved::WHITE_A_ROOK,
            (Color::White, Castle::Short) => Moved::WHITE_H_ROOK,
            (Color::Black, Castle::Long) => Moved::BLACK_A_ROOK,
            (Color::Black, Castle::Short) => Moved::BLACK_H_ROOK,
        }
    }

    /// The flag of the piece whose home is a [`Square`], if any.
    #[inline(always)]
    pub fn home(sq: Square) -> Self {
        match sq {
            Square::E1 => Moved::WHITE_KING,
            Square::A1 => Moved::WHITE_A_ROOK,
            Square::H1 => Moved::WHITE_H_ROOK,
            Square::E8 => Moved::BLACK_KING,
            Square::A8 => Moved::BLACK_A_ROOK,
            Square::H8 => Moved::BLACK_H_ROOK,
            _ => Moved::empty(),
        }
    }

    /// Records a [`Move`].
    ///
    /// Leaving a home square sets its flag, and so does landing on a rook's
    /// home square, since that rook is either gone or was never there.
    #[inline(always)]
    pub fn touch(&mut self, m: Move) {
        let rooks = Moved::all() - Moved::WHITE_KING - Moved::BLACK_KING;
        *self |= Moved::home(m.whence());
        *self |= Moved::home(m.whither()) & rooks;
    }
}
