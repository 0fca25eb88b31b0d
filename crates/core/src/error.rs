//! Error types for chessdotcom-export

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A response is missing a field the caller cannot proceed without
    #[error("expected key {key}, couldn't find on object: {object}")]
    MissingField { key: &'static str, object: String },

    /// Only returned when a retry cap is configured
    #[error("still rate limited after {attempts} attempts: {url}")]
    RateLimited { url: String, attempts: u32 },

    #[error("PGN parsing error: {0}")]
    Pgn(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
