// ABOUTME: Library root for isabot-discord.
// ABOUTME: Exports bot, commands, config, render, media and time modules plus run().

pub mod bot;
pub mod commands;
pub mod config;
pub mod discord;
pub mod error;
pub mod prompt;
pub mod render;
pub mod time;
pub mod youtube;

pub use bot::Bot;
pub use commands::{Command, Reply, Response};
pub use config::Config;
pub use error::{BotError, Result};

use serenity::all::{Client, GatewayIntents};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Gateway intents: guild messages with content, members and reactions.
fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
}

/// Run the bot with the given config path.
pub async fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    info!("isabot starting");

    // Load configuration
    let config = Config::load(config_path)?;
    info!(
        introductions_channel = config.directory.introductions_channel,
        history_limit = config.directory.history_limit,
        prefix = %config.bot.prefix,
        "Configuration loaded"
    );

    let token = config.discord.token.clone();
    let bot = Arc::new(Bot::new(config));

    let mut client = Client::builder(&token, intents())
        .event_handler(discord::Handler::new(bot))
        .await?;
    let shard_manager = Arc::clone(&client.shard_manager);

    // Handle shutdown signals
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl+c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    // Run until shutdown signal
    tokio::select! {
        result = client.start() => {
            result?;
            info!("Gateway connection closed");
        }
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
            shard_manager.shutdown_all().await;
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
            shard_manager.shutdown_all().await;
        }
    }

    info!("isabot stopped");
    Ok(())
}
