mod bot;
mod config;
mod platform;
mod responder;
mod shutdown;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::platform::telegram::{self, TelegramSink};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,userinfo_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let bot = telegram::connect(&config)?;
    let me = telegram::verify_identity(&bot).await?;
    info!("Bot authorized as: {} (@{})", me.first_name, me.username);

    match telegram::register_commands(&bot).await {
        Ok(()) => info!("Bot commands successfully set"),
        Err(e) => warn!("Cannot set bot commands: {:#}", e),
    }

    let token = CancellationToken::new();
    let mut listener = telegram::polling(bot.clone());
    let updates = telegram::update_stream(&mut listener, token.clone());

    tokio::spawn(shutdown::watch_signals(token.clone()));

    info!("Bot started, listening for messages...");
    let sink = TelegramSink::new(bot);
    let handled = bot::run(updates, &sink).await;

    info!("Bot has been shut down ({} command(s) handled)", handled);
    Ok(())
}
