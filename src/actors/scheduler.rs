//! SchedulerActor - Posts the view count on a fixed interval
//!
//! ## Message Flow
//!
//! ```text
//! Timer tick → Read registry → Resolve channel → Fetch count → Compose → Send
//!     ↑
//!     └─── Commands (TickNow, Shutdown)
//! ```
//!
//! The first tick fires one full interval after start. A tick that runs
//! longer than the interval delays the next one; missed ticks are skipped,
//! never queued.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info, instrument, warn};

use crate::discord::ChatGateway;
use crate::error::TickError;
use crate::notification;
use crate::registry::ChannelRegistry;
use crate::util::{DEFAULT_INTERVAL, MAX_INTERVAL};
use crate::youtube::MetricsSource;

use super::messages::{SchedulerCommand, TickOutcome};

/// What to fetch and how often
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub video_id: String,
    pub interval: Duration,
}

/// Actor that runs the notification workflow
pub struct SchedulerActor {
    settings: SchedulerSettings,

    /// Destination chosen through `setchannel`
    registry: Arc<ChannelRegistry>,

    source: Arc<dyn MetricsSource>,

    gateway: Arc<dyn ChatGateway>,

    command_rx: mpsc::Receiver<SchedulerCommand>,
}

impl SchedulerActor {
    pub fn new(
        settings: SchedulerSettings,
        registry: Arc<ChannelRegistry>,
        source: Arc<dyn MetricsSource>,
        gateway: Arc<dyn ChatGateway>,
        command_rx: mpsc::Receiver<SchedulerCommand>,
    ) -> Self {
        Self {
            settings,
            registry,
            source,
            gateway,
            command_rx,
        }
    }

    /// Run the actor's main loop
    ///
    /// Runs until a Shutdown command arrives or every handle is dropped.
    #[instrument(skip(self), fields(video = %self.settings.video_id))]
    pub async fn run(mut self) {
        let period = effective_period(self.settings.interval);
        debug!("starting scheduler, first post in {period:?}");

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let result = self.perform_tick().await;
                    log_tick(&result);
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(SchedulerCommand::TickNow { respond_to }) => {
                            debug!("received TickNow command");
                            let result = self.perform_tick().await;
                            log_tick(&result);
                            let _ = respond_to.send(result);
                        }

                        Some(SchedulerCommand::Shutdown) => {
                            debug!("received shutdown command");
                            break;
                        }

                        None => {
                            warn!("command channel closed, shutting down");
                            break;
                        }
                    }
                }
            }
        }

        debug!("scheduler stopped");
    }

    /// One pass of the workflow
    ///
    /// Each step short-circuits: no destination means no fetch, an
    /// unresolvable destination means no fetch, a failed fetch means no send.
    async fn perform_tick(&self) -> Result<TickOutcome, TickError> {
        let Some(channel) = self.registry.get().await else {
            return Ok(TickOutcome::NoDestination);
        };

        let channel_name = self.gateway.resolve_channel(channel).await?;

        let count = self
            .source
            .fetch_view_count(&self.settings.video_id)
            .await?;

        let message = notification::compose(Local::now().naive_local(), count);
        self.gateway.send_message(channel, &message).await?;

        Ok(TickOutcome::Delivered {
            channel,
            channel_name,
            count,
        })
    }
}

/// Interval actually used by the timer. Zero or out-of-range settings fall
/// back to the default, since the timer panics on both.
fn effective_period(interval: Duration) -> Duration {
    if interval.is_zero() || interval > MAX_INTERVAL {
        warn!("interval {interval:?} out of range, using {DEFAULT_INTERVAL:?}");
        return DEFAULT_INTERVAL;
    }
    interval
}

/// Single logging point for tick results: each tick logs exactly once.
fn log_tick(result: &Result<TickOutcome, TickError>) {
    match result {
        Ok(TickOutcome::NoDestination) => {
            warn!("no destination channel set, skipping post");
        }
        Ok(TickOutcome::Delivered {
            channel_name,
            count,
            ..
        }) => {
            info!("posted view count {count} to #{channel_name}");
        }
        Err(e) => {
            error!("view count post failed: {e}");
        }
    }
}

/// Handle for controlling a SchedulerActor
#[derive(Clone)]
pub struct SchedulerHandle {
    sender: mpsc::Sender<SchedulerCommand>,
}

impl SchedulerHandle {
    /// Spawn the actor as a tokio task
    pub fn spawn(
        settings: SchedulerSettings,
        registry: Arc<ChannelRegistry>,
        source: Arc<dyn MetricsSource>,
        gateway: Arc<dyn ChatGateway>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);

        let actor = SchedulerActor::new(settings, registry, source, gateway, cmd_rx);

        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Run a tick now and wait for its result
    pub async fn tick_now(&self) -> Result<TickOutcome> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SchedulerCommand::TickNow { respond_to: tx })
            .await
            .context("failed to send TickNow command")?;

        let outcome = rx.await.context("failed to receive tick result")??;
        Ok(outcome)
    }

    /// Gracefully shut down the scheduler
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(SchedulerCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")?;
        Ok(())
    }

    /// True once the actor has exited
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Holds at most one running scheduler
///
/// The gateway emits `ready` again after every reconnect; only the first one
/// may spawn the scheduler.
#[derive(Default)]
pub struct SchedulerSlot {
    handle: Mutex<Option<SchedulerHandle>>,
}

impl SchedulerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn through `spawn` unless a live scheduler is already held.
    /// Returns whether a new scheduler was started.
    pub async fn start_with<F>(&self, spawn: F) -> bool
    where
        F: FnOnce() -> SchedulerHandle,
    {
        let mut slot = self.handle.lock().await;
        if slot.as_ref().is_some_and(|handle| !handle.is_closed()) {
            return false;
        }

        *slot = Some(spawn());
        true
    }

    pub async fn handle(&self) -> Option<SchedulerHandle> {
        self.handle.lock().await.clone()
    }

    pub async fn is_running(&self) -> bool {
        self.handle
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_closed())
    }
}
