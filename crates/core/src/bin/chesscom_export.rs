//! Dump every chess.com game of a player as JSON lines on stdout

use std::io::{self, BufWriter, Write};

use chessdotcom_export::{logging, ChessComClient, ClientConfig, Result};

fn main() {
    let mut verbose = false;
    let mut username = None;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            _ => username = Some(arg),
        }
    }

    let username = username.unwrap_or_else(|| {
        eprintln!("Usage: chesscom_export [--verbose] <username>");
        std::process::exit(1);
    });

    logging::init_logger(verbose);

    if let Err(e) = export_games(&username) {
        eprintln!("Failed to export games for {}: {}", username, e);
        std::process::exit(1);
    }
}

fn export_games(username: &str) -> Result<()> {
    let client = ChessComClient::with_config(ClientConfig::from_env()?)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut count = 0usize;

    for game in client.get_player_games(username) {
        serde_json::to_writer(&mut out, &game?)?;
        writeln!(out)?;
        count += 1;
    }
    out.flush()?;

    tracing::info!("Exported {} games for {}", count, username);
    Ok(())
}
