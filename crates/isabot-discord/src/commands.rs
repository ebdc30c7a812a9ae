// ABOUTME: Parses !-prefixed directives and executes them into responses.
// ABOUTME: Supports showinfo, searchuser, genprompt, video lookups, help, timestamps and relay.

use crate::error::Result;
use crate::prompt::Generator;
use crate::render::{self, EmbedSpec};
use crate::time;
use crate::youtube::VideoRequest;
use chrono::{DateTime, Local};
use isabot_directory::{Directory, DirectoryError, FilterSet, HistoryProvider};
use std::path::Path;
use tracing::{debug, info};

/// Parsed directive with its argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show one user's introduction: !showinfo <user>
    ShowInfo(String),
    /// Search introductions: !searchuser <key=values & ...>
    SearchUser(String),
    /// Random script prompt: !genprompt
    GeneratePrompt,
    /// Latest upload of a channel: !mrv <handle> / !most-recent-video <handle>
    MostRecentVideo(String),
    /// Metadata for one video: !video-info <id>
    VideoInfo(String),
    /// Show help message: !help
    Help,
    /// Discord timestamp for a time string: !timestamp <time> / !ts <time>
    Timestamp(String),
    /// Time shown at fixed UTC offsets: !timezone <time> in <offsets> / !tz
    Timezone(String),
    /// Post an embed into another channel: !xagfs <channel-id> <text>
    Relay(String),
    /// Unrecognized directive.
    Unknown(String),
}

impl Command {
    /// Parse the text following the prefix into directive and argument.
    pub fn parse(text: &str) -> Command {
        let (directive, argument) = match text.split_once(' ') {
            Some((directive, argument)) => (directive, argument.to_string()),
            None => (text, String::new()),
        };

        match directive {
            "showinfo" => Command::ShowInfo(argument),
            "searchuser" => Command::SearchUser(argument),
            "genprompt" => Command::GeneratePrompt,
            "mrv" | "most-recent-video" => Command::MostRecentVideo(argument),
            "video-info" => Command::VideoInfo(argument),
            "help" => Command::Help,
            "timestamp" | "ts" => Command::Timestamp(argument),
            "timezone" | "tz" => Command::Timezone(argument),
            "xagfs" => Command::Relay(argument),
            other => Command::Unknown(other.to_string()),
        }
    }

    /// Parse from raw message text that includes the prefix.
    pub fn from_message(prefix: &str, text: &str) -> Option<Command> {
        let rest = text.strip_prefix(prefix)?;
        Some(Self::parse(rest))
    }
}

/// Something for the Discord side to send.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Embed(EmbedSpec),
}

/// Outcome of executing a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Reply in the channel the command came from.
    Reply(Reply),
    /// Acknowledge with `placeholder`, then edit in the fetched video.
    Video {
        placeholder: String,
        request: VideoRequest,
    },
    /// Post an embed into another channel.
    Relay { channel_id: u64, embed: EmbedSpec },
    /// Nothing to send.
    Ignore,
}

impl Response {
    fn text(text: impl Into<String>) -> Self {
        Response::Reply(Reply::Text(text.into()))
    }

    fn embed(embed: EmbedSpec) -> Self {
        Response::Reply(Reply::Embed(embed))
    }
}

/// Everything a command needs besides its argument.
pub struct CommandContext<'a> {
    pub directory: &'a Directory,
    pub introductions: &'a dyn HistoryProvider,
    pub prompt_options: &'a Path,
    pub now: DateTime<Local>,
}

/// Execute a command and return what should be sent.
pub async fn execute_command(command: Command, ctx: CommandContext<'_>) -> Result<Response> {
    match command {
        Command::ShowInfo(user) => {
            let user = user.trim();
            if user.is_empty() {
                return Ok(Response::text("Usage: `!showinfo username`"));
            }
            match ctx.directory.show_one(user, ctx.introductions).await? {
                Some(introduction) => {
                    debug!(user = %user, "Found introduction");
                    Ok(Response::embed(render::user_info(user, &introduction)))
                }
                None => {
                    debug!(user = %user, "No introduction found");
                    Ok(Response::text(render::user_not_found(user)))
                }
            }
        }

        Command::SearchUser(argument) => {
            let filters = match FilterSet::parse(&argument, ctx.directory.aliases()) {
                Ok(filters) => filters,
                Err(DirectoryError::InvalidFilter(clause)) => {
                    return Ok(Response::text(render::invalid_filter(&clause)));
                }
                Err(e) => return Err(e.into()),
            };
            let result = ctx.directory.search(&filters, ctx.introductions).await?;
            info!(
                filters = filters.len(),
                matches = result.identities.len(),
                "Directory search finished"
            );
            Ok(Response::embed(render::search_results(&result)))
        }

        Command::GeneratePrompt => match Generator::load(ctx.prompt_options) {
            Ok(generator) => {
                let prompt = generator.generate(&mut rand::thread_rng());
                Ok(Response::embed(render::prompt(&prompt)))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load prompt options");
                Ok(Response::text(format!("An unexpected error occurred: {}", e)))
            }
        },

        Command::MostRecentVideo(handle) => {
            let handle = handle.trim().trim_start_matches('@');
            if handle.is_empty() {
                return Ok(Response::text("Usage: `!mrv handle`"));
            }
            Ok(video_response(VideoRequest::MostRecent {
                handle: handle.to_string(),
            }))
        }

        Command::VideoInfo(id) => {
            let id = id.trim();
            if id.is_empty() {
                return Ok(Response::text("Usage: `!video-info videoID`"));
            }
            Ok(video_response(VideoRequest::ById { id: id.to_string() }))
        }

        Command::Help => Ok(Response::embed(render::help())),

        Command::Timestamp(input) => {
            let input = input.trim();
            match time::discord_timestamp(input, ctx.now, 'F') {
                Ok(stamp) => Ok(Response::text(render::timestamp(input, &stamp))),
                Err(e) => {
                    debug!(error = %e, "Could not parse time string");
                    Ok(Response::text(render::TIME_PARSE_FAILURE))
                }
            }
        }

        Command::Timezone(argument) => {
            let Some((input, offsets)) = argument.rsplit_once(" in ") else {
                return Ok(Response::text(
                    "Usage: `!tz <time> in <offsets>`, e.g. `!tz 3pm in UTC+2 -05:00`",
                ));
            };
            let offsets: Vec<&str> = offsets.split_whitespace().collect();
            match time::convert(input.trim(), &offsets, ctx.now) {
                Ok(lines) => Ok(Response::text(lines.join("\n"))),
                Err(e) => {
                    debug!(error = %e, "Could not convert time");
                    Ok(Response::text(render::TIME_PARSE_FAILURE))
                }
            }
        }

        Command::Relay(argument) => {
            let (channel, text) = argument.split_once(' ').unwrap_or((argument.as_str(), ""));
            let text = text.trim();
            if text.is_empty() {
                return Ok(Response::text("Usage: `!xagfs channelID message`"));
            }
            match channel.parse::<u64>() {
                Ok(channel_id) if channel_id != 0 => Ok(Response::Relay {
                    channel_id,
                    embed: render::relay(text),
                }),
                _ => Ok(Response::text(format!("Invalid channel ID: `{}`", channel))),
            }
        }

        Command::Unknown(directive) => {
            debug!(directive = %directive, "Ignoring unknown directive");
            Ok(Response::Ignore)
        }
    }
}

fn video_response(request: VideoRequest) -> Response {
    Response::Video {
        placeholder: request.placeholder(),
        request,
    }
}
