use crate::app::MAX_WORKERS;
use clap::Parser;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Parser)]
#[command(
    name = "deck-console",
    version,
    about = "Desktop console for syncing PDF decks and generating their audio and images"
)]
pub struct Cli {
    /// Base URL of the deck service.
    #[arg(long, env = "DECK_CONSOLE_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Worker count preselected for audio and image generation.
    #[arg(long, env = "DECK_CONSOLE_WORKERS", default_value_t = crate::app::DEFAULT_WORKERS)]
    pub workers: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid server url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("worker count must be between 1 and {max}, got {got}")]
    Workers { got: u8, max: u8 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    pub server_url: String,
    pub default_workers: u8,
}

impl ConsoleConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let url = reqwest::Url::parse(&cli.server_url).map_err(|e| ConfigError::InvalidUrl {
            url: cli.server_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: cli.server_url,
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }

        if !(1..=MAX_WORKERS).contains(&cli.workers) {
            return Err(ConfigError::Workers {
                got: cli.workers,
                max: MAX_WORKERS,
            });
        }

        Ok(Self {
            server_url: cli.server_url.trim_end_matches('/').to_string(),
            default_workers: cli.workers,
        })
    }
}
