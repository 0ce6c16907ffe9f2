use std::time::Duration;

use crate::error::ConfigError;

pub const YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";

pub const DISCORD_BOT_TOKEN: &str = "DISCORD_BOT_TOKEN";

pub const VIDEO_ID: &str = "VIDEO_ID";

pub const POST_INTERVAL_SECS: &str = "POST_INTERVAL_SECS";

/// Three hours between two posts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3 * 60 * 60);

/// Longest accepted interval: 30 days.
pub const MAX_INTERVAL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

pub fn get_interval(raw: Option<String>) -> Duration {
    raw.and_then(|res| res.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .filter(|interval| !interval.is_zero() && *interval <= MAX_INTERVAL)
        .unwrap_or(DEFAULT_INTERVAL)
}

pub const YOUTUBE_API_BASE: &str = "YOUTUBE_API_BASE";

const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

pub fn get_default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

pub fn get_api_base(raw: Option<String>) -> String {
    raw.map(|res| res.trim().trim_end_matches('/').to_string())
        .filter(|res| !res.is_empty())
        .unwrap_or_else(get_default_api_base)
}

pub fn get_required(name: &'static str, raw: Option<String>) -> Result<String, ConfigError> {
    let value = raw.ok_or(ConfigError::MissingVariable(name))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::EmptyVariable(name));
    }
    Ok(value.to_string())
}
