// ABOUTME: Serenity glue: gateway event handler, channel history provider and embed conversion.
// ABOUTME: Everything that touches the Discord API directly lives here.

use crate::bot::Bot;
use crate::render::EmbedSpec;
use async_trait::async_trait;
use isabot_directory::{DirectoryError, HistoryEntry, HistoryProvider};
use serenity::all::{
    ActivityData, ChannelId, Colour, Context, CreateEmbed, EventHandler, GetMessages, Http,
    Message, OnlineStatus, Ready,
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Discord caps a single history request at 100 messages.
const PAGE_SIZE: usize = 100;

/// History of one text channel, fetched page by page, newest first.
pub struct ChannelHistory {
    http: Arc<Http>,
    channel: ChannelId,
}

impl ChannelHistory {
    pub fn new(http: Arc<Http>, channel: ChannelId) -> Self {
        Self { http, channel }
    }
}

#[async_trait]
impl HistoryProvider for ChannelHistory {
    async fn fetch_recent(&self, limit: usize) -> isabot_directory::Result<Vec<HistoryEntry>> {
        let mut entries = Vec::with_capacity(limit);
        let mut before = None;

        while entries.len() < limit {
            let page = (limit - entries.len()).min(PAGE_SIZE) as u8;
            let mut request = GetMessages::new().limit(page);
            if let Some(id) = before {
                request = request.before(id);
            }

            let batch = self
                .channel
                .messages(&self.http, request)
                .await
                .map_err(DirectoryError::history)?;
            let exhausted = batch.len() < page as usize;
            before = batch.last().map(|m| m.id);

            entries.extend(
                batch
                    .into_iter()
                    .map(|m| HistoryEntry::new(m.author.name, m.content)),
            );
            if exhausted || before.is_none() {
                break;
            }
        }

        debug!(channel = %self.channel, fetched = entries.len(), "Fetched channel history");
        entries.truncate(limit);
        Ok(entries)
    }
}

/// Build a serenity embed from the presentation layer's spec.
pub fn to_create_embed(spec: &EmbedSpec) -> CreateEmbed {
    let mut embed = CreateEmbed::new().colour(Colour::new(spec.colour));
    if let Some(title) = &spec.title {
        embed = embed.title(title);
    }
    if let Some(description) = &spec.description {
        embed = embed.description(description);
    }
    if let Some(url) = &spec.url {
        embed = embed.url(url);
    }
    if let Some(image) = &spec.image {
        embed = embed.image(image);
    }
    for (name, value) in &spec.fields {
        embed = embed.field(name, value, false);
    }
    embed
}

/// Gateway event handler wrapping the shared bot.
pub struct Handler {
    bot: Arc<Bot>,
}

impl Handler {
    pub fn new(bot: Arc<Bot>) -> Self {
        Self { bot }
    }
}

#[serenity::async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        self.bot.set_user_id(ready.user.id);
        ctx.set_presence(
            Some(ActivityData::playing(self.bot.config().bot.status.clone())),
            OnlineStatus::Online,
        );
        info!(user = %ready.user.name, "Connected to Discord");
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if let Err(e) = self.bot.handle_message(&ctx.http, &msg).await {
            error!(error = %e, channel = %msg.channel_id, "Failed to handle command");
            let _ = msg
                .channel_id
                .say(&ctx.http, format!("❌ Command error: {}", e))
                .await;
        }
    }
}

