use std::sync::Arc;

use anyhow::Context;
use serenity::Client;
use tracing::{debug, info, level_filters::LevelFilter};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};
use view_relay::{
    actors::scheduler::SchedulerSettings,
    config::Config,
    discord::Handler,
    registry::ChannelRegistry,
    youtube::{MetricsSource, YouTubeClient},
};

fn init() {
    dotenv::dotenv().ok();

    let filter = filter::Targets::new().with_targets(vec![
        ("view_relay", LevelFilter::DEBUG),
        ("serenity", LevelFilter::WARN),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();

    let config = Config::from_env().context("invalid configuration")?;
    debug!("started with config: {config:?}");

    let source: Arc<dyn MetricsSource> = Arc::new(
        YouTubeClient::new(&config.youtube_api_key, &config.youtube_api_base)
            .context("failed to build YouTube client")?,
    );

    let handler = Handler::new(
        Arc::new(ChannelRegistry::new()),
        source,
        SchedulerSettings {
            video_id: config.video_id.clone(),
            interval: config.interval,
        },
    );

    let mut client = Client::builder(&config.discord_token, Handler::intents())
        .event_handler(handler)
        .await
        .context("failed to create Discord client")?;

    info!("connecting to Discord");
    client.start().await.context("Discord client stopped")?;

    Ok(())
}
