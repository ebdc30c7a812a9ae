// ABOUTME: Error types for isabot-discord.
// ABOUTME: Defines BotError covering Discord, directory, media, prompt, config and IO failures.

use thiserror::Error;

/// Error types for the Discord bot.
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration loading or validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Discord API or gateway error from serenity.
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),

    /// Directory query failure (history fetch, bad filters).
    #[error("Directory error: {0}")]
    Directory(#[from] isabot_directory::DirectoryError),

    /// yt-dlp failed or produced unusable output.
    #[error("Media error: {0}")]
    Media(String),

    /// Prompt options could not be loaded.
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// A time string could not be understood.
    #[error("Time error: {0}")]
    Time(String),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error for file and process operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using BotError.
pub type Result<T> = std::result::Result<T, BotError>;
