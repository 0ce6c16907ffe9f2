//! Message types for the scheduler actor

use serenity::all::ChannelId;
use tokio::sync::oneshot;

use crate::error::TickError;

/// Result of a tick that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No destination has been chosen yet; nothing was fetched
    NoDestination,

    /// The view count was posted
    Delivered {
        channel: ChannelId,
        channel_name: String,
        count: u64,
    },
}

/// Commands that can be sent to the SchedulerActor
#[derive(Debug)]
pub enum SchedulerCommand {
    /// Run a tick immediately, outside the interval timer
    TickNow {
        respond_to: oneshot::Sender<Result<TickOutcome, TickError>>,
    },

    /// Stop the actor after the current tick
    Shutdown,
}
