//! Discord side of the relay
//!
//! [`ChatGateway`] is what the scheduler needs from the chat platform:
//! resolve the destination and post a message. [`SerenityGateway`] backs it
//! with serenity's HTTP client. [`Handler`] receives gateway events, registers
//! `setchannel` and starts the scheduler on `ready`.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    Channel, ChannelId, Command, Context, CreateInteractionResponse,
    CreateInteractionResponseMessage, EventHandler, GatewayIntents, Http, Interaction, Ready,
};
use tracing::{debug, error, info, instrument, warn};

use crate::actors::scheduler::{SchedulerHandle, SchedulerSettings, SchedulerSlot};
use crate::commands;
use crate::error::DeliveryError;
use crate::registry::ChannelRegistry;
use crate::youtube::MetricsSource;

/// Delivery side of the chat platform
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Check that `channel` still exists and return its display name.
    async fn resolve_channel(&self, channel: ChannelId) -> Result<String, DeliveryError>;

    async fn send_message(&self, channel: ChannelId, content: &str) -> Result<(), DeliveryError>;
}

#[derive(Clone)]
pub struct SerenityGateway {
    http: Arc<Http>,
}

impl SerenityGateway {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ChatGateway for SerenityGateway {
    #[instrument(skip(self))]
    async fn resolve_channel(&self, channel: ChannelId) -> Result<String, DeliveryError> {
        match self.http.get_channel(channel).await {
            Ok(Channel::Guild(guild_channel)) => Ok(guild_channel.name),
            Ok(other) => Ok(other.id().to_string()),
            Err(e) => Err(DeliveryError::ChannelUnavailable {
                channel,
                reason: e.to_string(),
            }),
        }
    }

    #[instrument(skip(self, content))]
    async fn send_message(&self, channel: ChannelId, content: &str) -> Result<(), DeliveryError> {
        channel
            .say(&self.http, content)
            .await
            .map(|message| debug!("sent message {}", message.id))
            .map_err(|e| DeliveryError::SendFailed {
                channel,
                reason: e.to_string(),
            })
    }
}

/// Handler for Discord gateway events
pub struct Handler {
    registry: Arc<ChannelRegistry>,
    source: Arc<dyn MetricsSource>,
    settings: SchedulerSettings,
    scheduler: SchedulerSlot,
}

impl Handler {
    pub fn new(
        registry: Arc<ChannelRegistry>,
        source: Arc<dyn MetricsSource>,
        settings: SchedulerSettings,
    ) -> Self {
        Self {
            registry,
            source,
            settings,
            scheduler: SchedulerSlot::new(),
        }
    }

    /// Slash commands arrive as interactions, so no privileged intent is needed.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
    }

    /// Start the scheduler unless it already runs. Returns whether it was
    /// started by this call.
    pub async fn start_scheduler(&self, gateway: Arc<dyn ChatGateway>) -> bool {
        self.scheduler
            .start_with(|| {
                SchedulerHandle::spawn(
                    self.settings.clone(),
                    self.registry.clone(),
                    self.source.clone(),
                    gateway,
                )
            })
            .await
    }

    pub fn scheduler(&self) -> &SchedulerSlot {
        &self.scheduler
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord bot ready"
        );

        match Command::create_global_command(&ctx.http, commands::register()).await {
            Ok(command) => info!("registered slash command /{}", command.name),
            Err(e) => error!("failed to register slash command: {e}"),
        }

        let gateway: Arc<dyn ChatGateway> = Arc::new(SerenityGateway::new(ctx.http.clone()));
        if self.start_scheduler(gateway).await {
            info!(
                "scheduler started, posting every {:?}",
                self.settings.interval
            );
        } else {
            debug!("scheduler already running");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        if command.data.name != commands::SET_CHANNEL {
            debug!("ignoring unknown command /{}", command.data.name);
            return;
        }

        let channel = commands::selected_channel(&command.data.options);
        let reply = commands::set_channel(&self.registry, channel).await;

        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(reply)
                .ephemeral(true),
        );

        if let Err(e) = command.create_response(&ctx.http, response).await {
            warn!(error = %e, "failed to acknowledge /{}", commands::SET_CHANNEL);
        }
    }
}
