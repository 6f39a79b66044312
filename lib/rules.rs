//! The move-legality and game-state engine.
//!
//! Moves flow through three stages: [`pseudo_moves`] follows each piece's
//! movement pattern, [`leaves_king_in_check`] discards those that expose the
//! mover's king, and [`en_passant`] and [`castles`] add the special moves that
//! depend on game history. [`Game`] ties them together.

mod attacks;
mod game;
mod legality;
mod moved;
mod movegen;
mod outcome;
mod special;

pub use attacks::*;
pub use game::*;
pub use legality::*;
pub use moved::*;
pub use movegen::*;
pub use outcome::*;
pub use special::*;
