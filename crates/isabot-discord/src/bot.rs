// ABOUTME: Core bot logic tying Discord messages to command execution.
// ABOUTME: Filters incoming messages, runs commands and delivers their responses.

use crate::commands::{execute_command, Command, CommandContext, Reply, Response};
use crate::config::Config;
use crate::discord::{to_create_embed, ChannelHistory};
use crate::error::Result;
use crate::render;
use crate::youtube::{VideoRequest, YtDlp};

use chrono::Local;
use isabot_directory::Directory;
use serenity::all::{ChannelId, CreateMessage, EditMessage, Http, Message, UserId};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Shared, immutable bot state.
pub struct Bot {
    config: Config,
    directory: Directory,
    media: YtDlp,
    user_id: OnceLock<UserId>,
}

impl Bot {
    pub fn new(config: Config) -> Self {
        let directory = config.build_directory();
        let media = YtDlp::new(config.youtube.binary.clone());
        Self {
            config,
            directory,
            media,
            user_id: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Remember our own user ID once the gateway reports it.
    pub fn set_user_id(&self, id: UserId) {
        let _ = self.user_id.set(id);
    }

    fn is_self(&self, author: UserId) -> bool {
        self.user_id.get() == Some(&author)
    }

    /// Handle an incoming Discord message.
    pub async fn handle_message(&self, http: &Arc<Http>, msg: &Message) -> Result<()> {
        // Ignore our own messages
        if self.is_self(msg.author.id) {
            return Ok(());
        }

        // Only guild text channels
        if msg.guild_id.is_none() {
            return Ok(());
        }

        let Some(command) = Command::from_message(&self.config.bot.prefix, &msg.content) else {
            return Ok(());
        };

        debug!(
            author = %msg.author.name,
            channel = %msg.channel_id,
            content = %msg.content,
            "Processing command"
        );

        let introductions = ChannelHistory::new(
            Arc::clone(http),
            ChannelId::new(self.config.directory.introductions_channel),
        );
        let ctx = CommandContext {
            directory: &self.directory,
            introductions: &introductions,
            prompt_options: &self.config.bot.prompt_options,
            now: Local::now(),
        };

        let response = execute_command(command, ctx).await?;
        self.deliver(http, msg.channel_id, response).await
    }

    /// Send a command's response to Discord.
    async fn deliver(&self, http: &Arc<Http>, channel: ChannelId, response: Response) -> Result<()> {
        match response {
            Response::Reply(Reply::Text(text)) => {
                channel.say(http, text).await?;
            }
            Response::Reply(Reply::Embed(embed)) => {
                channel
                    .send_message(http, CreateMessage::new().embed(to_create_embed(&embed)))
                    .await?;
            }
            Response::Video {
                placeholder,
                request,
            } => {
                // yt-dlp takes a while, so acknowledge first
                let mut ack = channel.say(http, placeholder).await?;
                let embed = self.video_embed(&request).await;
                ack.edit(http, EditMessage::new().content("").embed(to_create_embed(&embed)))
                    .await?;
            }
            Response::Relay { channel_id, embed } => {
                info!(channel = channel_id, "Relaying message");
                ChannelId::new(channel_id)
                    .send_message(http, CreateMessage::new().embed(to_create_embed(&embed)))
                    .await?;
            }
            Response::Ignore => {}
        }
        Ok(())
    }

    async fn video_embed(&self, request: &VideoRequest) -> render::EmbedSpec {
        match self.media.fetch(request).await {
            Ok(info) => render::video(&info),
            Err(e) => {
                warn!(error = %e, request = ?request, "Failed to acquire video");
                render::video_failure()
            }
        }
    }
}
