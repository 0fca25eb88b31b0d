//! chess.com public API access

mod client;
mod transport;
mod types;

pub use client::{ChessComClient, PlayerGames};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
pub use types::*;
