//! Error types for fetching, delivery and configuration
//!
//! Every fallible boundary returns one of these instead of logging and
//! swallowing the failure in place. The scheduler loop is the single point
//! where tick failures are logged.

use std::fmt;

use serenity::all::ChannelId;

/// Errors raised while loading the startup configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set
    MissingVariable(&'static str),

    /// A required environment variable is set but blank
    EmptyVariable(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVariable(name) => {
                write!(f, "required environment variable {} is not set", name)
            }
            ConfigError::EmptyVariable(name) => {
                write!(f, "required environment variable {} is empty", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while fetching the view count from the metrics provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    Request(String),

    /// The provider answered with a non-success status code
    Status(u16),

    /// The body is not the expected JSON document
    Decode(String),

    /// The provider returned no item for the requested video
    EmptyResult,

    /// The item lacks the expected field
    MissingField(&'static str),

    /// The reported count is not a non-negative integer
    InvalidCount(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Request(msg) => write!(f, "request to metrics provider failed: {}", msg),
            FetchError::Status(code) => write!(f, "metrics provider returned HTTP {}", code),
            FetchError::Decode(msg) => write!(f, "malformed metrics response: {}", msg),
            FetchError::EmptyResult => write!(f, "metrics provider returned no items"),
            FetchError::MissingField(field) => write!(f, "metrics response lacks {}", field),
            FetchError::InvalidCount(raw) => write!(f, "view count {:?} is not a number", raw),
        }
    }
}

impl std::error::Error for FetchError {}

/// Errors raised while resolving or posting to the destination channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The destination no longer resolves to a channel the bot can see
    ChannelUnavailable { channel: ChannelId, reason: String },

    /// The chat platform rejected the message
    SendFailed { channel: ChannelId, reason: String },
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::ChannelUnavailable { channel, reason } => {
                write!(f, "channel {} is unavailable: {}", channel, reason)
            }
            DeliveryError::SendFailed { channel, reason } => {
                write!(f, "failed to send message to channel {}: {}", channel, reason)
            }
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Failure of a single scheduler tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickError {
    Fetch(FetchError),
    Delivery(DeliveryError),
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickError::Fetch(err) => write!(f, "fetch failed: {}", err),
            TickError::Delivery(err) => write!(f, "delivery failed: {}", err),
        }
    }
}

impl std::error::Error for TickError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TickError::Fetch(err) => Some(err),
            TickError::Delivery(err) => Some(err),
        }
    }
}

impl From<FetchError> for TickError {
    fn from(err: FetchError) -> Self {
        TickError::Fetch(err)
    }
}

impl From<DeliveryError> for TickError {
    fn from(err: DeliveryError) -> Self {
        TickError::Delivery(err)
    }
}
