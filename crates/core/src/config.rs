//! Client configuration
//!
//! Defaults match the public chess.com API. Every value can be overridden
//! with the builder methods or from `CHESSCOM_*` environment variables.

use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

pub const CHESSCOM_API_BASE: &str = "https://api.chess.com/pub/";

pub const DEFAULT_USER_AGENT: &str = concat!("chessdotcom-export/", env!("CARGO_PKG_VERSION"));

const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_secs(4);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root that archive paths are appended to
    pub base_url: String,
    /// Pause before retrying a request that got HTTP 429
    pub rate_limit_delay: Duration,
    /// Cap on 429 retries per request; `None` retries forever
    pub max_retries: Option<u32>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: CHESSCOM_API_BASE.to_string(),
            rate_limit_delay: DEFAULT_RATE_LIMIT_DELAY,
            max_retries: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with any `CHESSCOM_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("CHESSCOM_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(secs) = lookup("CHESSCOM_RATE_LIMIT_DELAY_SECS") {
            config.rate_limit_delay = Duration::from_secs(parse_var("CHESSCOM_RATE_LIMIT_DELAY_SECS", &secs)?);
        }
        if let Some(max) = lookup("CHESSCOM_MAX_RETRIES") {
            config.max_retries = Some(parse_var("CHESSCOM_MAX_RETRIES", &max)?);
        }
        if let Some(secs) = lookup("CHESSCOM_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_var("CHESSCOM_TIMEOUT_SECS", &secs)?);
        }
        if let Some(user_agent) = lookup("CHESSCOM_USER_AGENT") {
            config.user_agent = user_agent;
        }

        Ok(config)
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    pub fn max_retries(mut self, max: u32) -> Self {
        self.max_retries = Some(max);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Joins path segments onto the base URL with exactly one `/` between them
    pub fn endpoint(&self, segments: &[&str]) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), segments.join("/"))
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} has an invalid value: {:?}", key, value)))
}
