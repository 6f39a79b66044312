/// Chess domain types.
pub mod chess;
/// Move legality and game state.
pub mod rules;
