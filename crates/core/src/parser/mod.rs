//! PGN parsing

mod pgn;

pub use pgn::{parse_game_pgn, PgnGame};
