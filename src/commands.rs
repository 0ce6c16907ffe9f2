//! The `setchannel` slash command

use serenity::all::{
    ChannelId, ChannelType, CommandDataOption, CommandDataOptionValue, CommandOptionType,
    CreateCommand, CreateCommandOption, Mentionable,
};
use tracing::{info, instrument, warn};

use crate::registry::ChannelRegistry;

pub const SET_CHANNEL: &str = "setchannel";

const CHANNEL_OPTION: &str = "channel";

/// Builder used to register `setchannel` with Discord
pub fn register() -> CreateCommand {
    CreateCommand::new(SET_CHANNEL)
        .description("Set the channel that receives view count updates")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Channel,
                CHANNEL_OPTION,
                "Text channel to post updates to",
            )
            .required(true)
            .channel_types(vec![ChannelType::Text]),
        )
}

/// Pick the channel argument out of the invocation options.
pub fn selected_channel(options: &[CommandDataOption]) -> Option<ChannelId> {
    options
        .iter()
        .find(|option| option.name == CHANNEL_OPTION)
        .and_then(|option| match option.value {
            CommandDataOptionValue::Channel(channel) => Some(channel),
            _ => None,
        })
}

/// Store the chosen channel and return the ephemeral acknowledgment.
#[instrument(skip(registry))]
pub async fn set_channel(registry: &ChannelRegistry, channel: Option<ChannelId>) -> String {
    let Some(channel) = channel else {
        warn!("setchannel invoked without a channel");
        return format!("Usage: /{SET_CHANNEL} {CHANNEL_OPTION}:<#channel>");
    };

    registry.set(channel).await;
    info!("view count posts now go to channel {channel}");

    format!("Destination channel set to {}.", channel.mention())
}
