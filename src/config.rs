use std::time::Duration;

use tracing::trace;

use crate::error::ConfigError;
use crate::util::{
    DISCORD_BOT_TOKEN, POST_INTERVAL_SECS, VIDEO_ID, YOUTUBE_API_BASE, YOUTUBE_API_KEY,
    get_api_base, get_interval, get_required,
};

/// Startup configuration, read once from the environment
#[derive(Clone)]
pub struct Config {
    /// YouTube Data API key
    pub youtube_api_key: String,

    /// Discord bot token
    pub discord_token: String,

    /// Video whose view count is posted
    pub video_id: String,

    /// Time between two posts
    pub interval: Duration,

    /// Base URL of the YouTube Data API
    pub youtube_api_base: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("youtube_api_key", &"<redacted>")
            .field("discord_token", &"<redacted>")
            .field("video_id", &self.video_id)
            .field("interval", &self.interval)
            .field("youtube_api_base", &self.youtube_api_base)
            .finish()
    }
}

impl Config {
    /// Load the configuration from the process environment (after `.env`
    /// has been applied by the caller).
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            youtube_api_key: get_required(YOUTUBE_API_KEY, lookup(YOUTUBE_API_KEY))?,
            discord_token: get_required(DISCORD_BOT_TOKEN, lookup(DISCORD_BOT_TOKEN))?,
            video_id: get_required(VIDEO_ID, lookup(VIDEO_ID))?,
            interval: get_interval(lookup(POST_INTERVAL_SECS)),
            youtube_api_base: get_api_base(lookup(YOUTUBE_API_BASE)),
        };
        trace!("loaded config: {config:?}");
        Ok(config)
    }
}
