//! chess.com API client for walking a player's monthly game archives

use reqwest::StatusCode;
use serde_json::Value;
use std::iter::FusedIterator;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::transport::{ReqwestTransport, Transport};
use super::types::{ArchiveGames, ArchiveList, Game};
use crate::config::ClientConfig;
use crate::error::{Error, Result};

type Sleeper = Box<dyn Fn(Duration) + Send + Sync>;

pub struct ChessComClient<T = ReqwestTransport> {
    transport: T,
    config: ClientConfig,
    sleeper: Sleeper,
}

impl ChessComClient<ReqwestTransport> {
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> ChessComClient<T> {
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            sleeper: Box::new(std::thread::sleep),
        }
    }

    /// Replaces the blocking sleep used while rate limited
    pub fn with_sleeper<F>(mut self, sleeper: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET `url` and decode the body as JSON.
    ///
    /// HTTP 429 is retried after `rate_limit_delay`, indefinitely unless
    /// `max_retries` is set. Any other non-200 status is logged and the
    /// body is decoded anyway.
    pub fn request(&self, url: &str) -> Result<Value> {
        let mut rate_limited = 0u32;

        loop {
            info!("Requesting {}", url);
            let response = self.transport.get(url)?;

            if response.status == StatusCode::TOO_MANY_REQUESTS {
                rate_limited += 1;
                if let Some(max) = self.config.max_retries {
                    if rate_limited > max {
                        return Err(Error::RateLimited {
                            url: url.to_string(),
                            attempts: rate_limited,
                        });
                    }
                }

                warn!(
                    "Received 429 from {}, waiting {}s before retrying",
                    url,
                    self.config.rate_limit_delay.as_secs_f32()
                );
                (self.sleeper)(self.config.rate_limit_delay);
                continue;
            }

            if response.status != StatusCode::OK {
                warn!("{} received non 200 status code: {}", url, response.status.as_u16());
            }

            return Ok(serde_json::from_str(&response.body)?);
        }
    }

    pub fn player_archives_url(&self, username: &str) -> String {
        self.config.endpoint(&["player", username, "games", "archives"])
    }

    /// Monthly archive URLs for a player, in the order chess.com lists them
    pub fn get_player_game_archives(&self, username: &str) -> Result<Vec<String>> {
        let response = self.request(&self.player_archives_url(username))?;
        let list = ArchiveList::from_response(response)?;

        debug!("{} has {} monthly archives", username, list.archives.len());
        Ok(list.archives)
    }

    fn fetch_archive(&self, archive_url: &str) -> Result<ArchiveGames> {
        let archive = ArchiveGames::from_response(self.request(archive_url)?)?;
        debug!("{} contains {} games", archive_url, archive.games.len());
        Ok(archive)
    }

    /// All games in one monthly archive
    pub fn get_archive_games(&self, archive_url: &str) -> Result<Vec<Game>> {
        self.fetch_archive(archive_url)?
            .games
            .into_iter()
            .map(Game::from_api_response)
            .collect()
    }

    /// Lazily walks every archive of `username`.
    ///
    /// Nothing is requested until the iterator is first advanced, and each
    /// archive is only fetched once the previous one has been drained.
    pub fn get_player_games(&self, username: &str) -> PlayerGames<'_, T> {
        PlayerGames {
            client: self,
            username: username.to_string(),
            archives: None,
            games: Vec::new().into_iter(),
            done: false,
        }
    }
}

/// Iterator returned by [`ChessComClient::get_player_games`].
///
/// Yields games oldest archive first, in API order within each archive.
/// Stops after the first error.
pub struct PlayerGames<'a, T> {
    client: &'a ChessComClient<T>,
    username: String,
    archives: Option<std::vec::IntoIter<String>>,
    games: std::vec::IntoIter<Value>,
    done: bool,
}

impl<T> PlayerGames<'_, T> {
    fn fail(&mut self, error: Error) -> Option<Result<Game>> {
        self.done = true;
        Some(Err(error))
    }
}

impl<T: Transport> Iterator for PlayerGames<'_, T> {
    type Item = Result<Game>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if let Some(raw) = self.games.next() {
                return match Game::from_api_response(raw) {
                    Ok(game) => Some(Ok(game)),
                    Err(e) => self.fail(e),
                };
            }

            if self.archives.is_none() {
                match self.client.get_player_game_archives(&self.username) {
                    Ok(archives) => self.archives = Some(archives.into_iter()),
                    Err(e) => return self.fail(e),
                }
            }

            let Some(archive_url) = self.archives.as_mut().and_then(Iterator::next) else {
                self.done = true;
                return None;
            };

            match self.client.fetch_archive(&archive_url) {
                Ok(archive) => self.games = archive.games.into_iter(),
                Err(e) => return self.fail(e),
            }
        }
    }
}

impl<T: Transport> FusedIterator for PlayerGames<'_, T> {}
