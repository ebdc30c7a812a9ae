// ABOUTME: Entry point for the isabot binary.
// ABOUTME: Loads .env, sets up logging, then connects to Discord and serves commands.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "isabot")]
#[command(about = "Discord bot for the introductions directory, prompts and video info")]
struct Cli {
    /// Config file path
    #[arg(short, long, env = "ISABOT_CONFIG")]
    config: Option<PathBuf>,

    /// Debug log file
    #[arg(long, env = "ISABOT_LOG_FILE", default_value = "isabot.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Variables referenced by the config, e.g. CLIENT_TOKEN
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    isabot_log::init_for(
        &["isabot_discord", "isabot_directory"],
        Some(cli.log_file.as_path()),
    );

    isabot_discord::run(cli.config).await
}
