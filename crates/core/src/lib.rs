//! Export a player's game history from the chess.com public API

pub mod chesscom;
pub mod config;
pub mod error;
pub mod logging;
pub mod parser;

pub use chesscom::{ChessComClient, Game, PlayerGames};
pub use config::ClientConfig;
pub use error::{Error, Result};
