// ABOUTME: Configuration loading and validation for the Discord bot.
// ABOUTME: Supports TOML config files with environment variable expansion.

use crate::error::{BotError, Result};
use isabot_directory::{AliasTable, Directory, DEFAULT_HISTORY_LIMIT, DEFAULT_IDENTITY_FIELD};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::warn;

/// Top-level configuration structure for isabot.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub discord: DiscordConfig,
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub youtube: YoutubeConfig,
}

/// Discord bot credentials for the Gateway connection.
#[derive(Clone, Deserialize)]
pub struct DiscordConfig {
    /// Bot token from the Discord developer portal.
    pub token: String,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Where introductions live and how they are searched.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// Channel ID of the introductions channel.
    pub introductions_channel: u64,

    /// Number of recent messages every query looks at.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Introduction field reported for each search match.
    #[serde(default = "default_identity_field")]
    pub identity_field: String,

    /// Extra filter-key aliases on top of the built-in table.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_identity_field() -> String {
    DEFAULT_IDENTITY_FIELD.to_string()
}

/// Bot behavior configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Directive prefix, e.g. "!" for "!help".
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// "Playing ..." presence shown once connected.
    #[serde(default = "default_status")]
    pub status: String,

    /// TOML file with prompt generation options.
    #[serde(default = "default_prompt_options")]
    pub prompt_options: PathBuf,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            status: default_status(),
            prompt_options: default_prompt_options(),
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_status() -> String {
    "!help".to_string()
}

fn default_prompt_options() -> PathBuf {
    PathBuf::from("asmr_generation_options.toml")
}

/// yt-dlp invocation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct YoutubeConfig {
    #[serde(default = "default_ytdlp_binary")]
    pub binary: String,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            binary: default_ytdlp_binary(),
        }
    }
}

fn default_ytdlp_binary() -> String {
    "yt-dlp".to_string()
}

impl Config {
    /// Load configuration from the specified path or default location.
    ///
    /// Default location: `~/.config/isabot/isabot.toml`
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = path
            .or_else(|| dirs::config_dir().map(|d| d.join("isabot").join("isabot.toml")))
            .ok_or_else(|| BotError::Config("Could not determine config path".into()))?;

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            BotError::Config(format!("Failed to read config from {:?}: {}", path, e))
        })?;

        Self::from_toml(&contents)
    }

    /// Parse and validate config text, expanding `${VAR}` references first.
    pub fn from_toml(contents: &str) -> Result<Self> {
        // Expand environment variables, warning on undefined vars.
        let contents = shellexpand::env_with_context_no_errors(contents, |var: &str| {
            match std::env::var(var) {
                Ok(val) => Some(val),
                Err(_) => {
                    warn!(
                        variable = %var,
                        "Environment variable not defined, using empty string"
                    );
                    Some(String::new())
                }
            }
        });

        let config: Config = toml::from_str(&contents)
            .map_err(|e| BotError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate that required fields are present and usable.
    fn validate(&self) -> Result<()> {
        if self.discord.token.trim().is_empty() {
            return Err(BotError::Config("discord.token is required".into()));
        }
        if self.directory.introductions_channel == 0 {
            return Err(BotError::Config(
                "directory.introductions_channel must be a channel ID".into(),
            ));
        }
        if self.directory.history_limit == 0 {
            return Err(BotError::Config(
                "directory.history_limit must be at least 1".into(),
            ));
        }
        if self.directory.identity_field.trim().is_empty() {
            return Err(BotError::Config(
                "directory.identity_field must not be empty".into(),
            ));
        }
        if self.bot.prefix.is_empty() {
            return Err(BotError::Config("bot.prefix must not be empty".into()));
        }
        if self.youtube.binary.trim().is_empty() {
            return Err(BotError::Config("youtube.binary must not be empty".into()));
        }
        Ok(())
    }

    /// Alias table: built-ins overlaid with configured entries.
    pub fn alias_table(&self) -> AliasTable {
        let mut table = AliasTable::default();
        table.extend(self.directory.aliases.iter().map(|(k, v)| (k, v.clone())));
        table
    }

    /// Query engine configured from the `[directory]` section.
    pub fn build_directory(&self) -> Directory {
        Directory::new(self.alias_table())
            .with_identity_field(self.directory.identity_field.trim())
            .with_history_limit(self.directory.history_limit)
    }
}
