//! chess.com API data types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::parser::{parse_game_pgn, PgnGame};

/// Player results chess.com reports for drawn games
const DRAW_RESULTS: &[&str] = &[
    "agreed",
    "repetition",
    "stalemate",
    "insufficient",
    "50move",
    "timevsinsufficient",
];

/// Removes `key` from a JSON object, failing with the whole object if absent.
pub(crate) fn take_field(response: Value, key: &'static str) -> Result<Value> {
    match response {
        Value::Object(mut map) => match map.remove(key) {
            Some(value) => Ok(value),
            None => Err(Error::MissingField {
                key,
                object: Value::Object(map).to_string(),
            }),
        },
        other => Err(Error::MissingField {
            key,
            object: other.to_string(),
        }),
    }
}

/// Body of `GET player/{username}/games/archives`
#[derive(Debug, Clone)]
pub struct ArchiveList {
    pub archives: Vec<String>,
}

impl ArchiveList {
    pub fn from_response(response: Value) -> Result<Self> {
        let archives = serde_json::from_value(take_field(response, "archives")?)?;
        Ok(Self { archives })
    }
}

/// Body of one monthly archive; games stay raw until they are yielded
#[derive(Debug, Clone)]
pub struct ArchiveGames {
    pub games: Vec<Value>,
}

impl ArchiveGames {
    pub fn from_response(response: Value) -> Result<Self> {
        let games = serde_json::from_value(take_field(response, "games")?)?;
        Ok(Self { games })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub url: String,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub pgn: Option<String>,
    #[serde(default)]
    pub fen: Option<String>,
    #[serde(default)]
    pub initial_setup: Option<String>,
    #[serde(default)]
    pub tcn: Option<String>,
    pub time_control: String,
    pub time_class: String,
    pub rules: String,
    #[serde(default)]
    pub rated: bool,
    /// Only present for daily games
    #[serde(default)]
    pub start_time: Option<u64>,
    #[serde(default)]
    pub end_time: Option<u64>,
    /// Opening explorer URL
    #[serde(default)]
    pub eco: Option<String>,
    #[serde(default)]
    pub tournament: Option<String>,
    #[serde(default, rename = "match")]
    pub team_match: Option<String>,
    pub white: GamePlayer,
    pub black: GamePlayer,
    #[serde(default)]
    pub accuracies: Option<Accuracies>,
}

impl Game {
    /// Converts one element of an archive's `games` list
    pub fn from_api_response(raw: Value) -> Result<Self> {
        Ok(serde_json::from_value(raw)?)
    }

    pub fn result(&self) -> &'static str {
        match (self.white.result.as_str(), self.black.result.as_str()) {
            ("win", _) => "1-0",
            (_, "win") => "0-1",
            (white, _) if DRAW_RESULTS.contains(&white) => "1/2-1/2",
            _ => "*",
        }
    }

    pub fn white_username(&self) -> &str {
        &self.white.username
    }

    pub fn black_username(&self) -> &str {
        &self.black.username
    }

    pub fn white_rating(&self) -> Option<u16> {
        self.white.rating
    }

    pub fn black_rating(&self) -> Option<u16> {
        self.black.rating
    }

    /// Unix seconds the game finished, falling back to its start time
    pub fn played_at(&self) -> Option<u64> {
        self.end_time.or(self.start_time)
    }

    pub fn parsed_pgn(&self) -> Result<PgnGame> {
        let pgn = self
            .pgn
            .as_deref()
            .ok_or_else(|| Error::Pgn(format!("game {} has no PGN", self.url)))?;
        parse_game_pgn(pgn)
    }

    /// Mainline moves in SAN
    pub fn moves(&self) -> Result<Vec<String>> {
        Ok(self.parsed_pgn()?.moves)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamePlayer {
    pub username: String,
    #[serde(default)]
    pub rating: Option<u16>,
    pub result: String,
    #[serde(default, rename = "@id")]
    pub id: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Accuracies {
    pub white: f64,
    pub black: f64,
}
