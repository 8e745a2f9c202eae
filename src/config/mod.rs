mod file_config;

pub use file_config::{FileConfig, TokensConfig};

use crate::server::RequestsLoggingLevel;
use crate::user::TokenLifetimes;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5001";
pub const API_URL_ENV_VAR: &str = "MOODTUNES_API_URL";

/// CLI arguments that can be overridden by the TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub host: String,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub access_token_ttl_sec: u64,
    pub refresh_token_ttl_sec: u64,
    pub token_prune_interval_sec: u64,
    pub seed_songs: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub host: String,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub access_token_ttl_sec: u64,
    pub refresh_token_ttl_sec: u64,
    pub token_prune_interval_sec: u64,
    pub seed_songs: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);
        let host = file.host.unwrap_or_else(|| cli.host.clone());

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());
        let seed_songs = file.seed_songs.unwrap_or(cli.seed_songs);

        let tokens = file.tokens.unwrap_or_default();
        let access_token_ttl_sec = tokens.access_ttl_sec.unwrap_or(cli.access_token_ttl_sec);
        let refresh_token_ttl_sec = tokens
            .refresh_ttl_sec
            .unwrap_or(cli.refresh_token_ttl_sec);
        let token_prune_interval_sec = tokens
            .prune_interval_sec
            .unwrap_or(cli.token_prune_interval_sec);

        if access_token_ttl_sec == 0 || refresh_token_ttl_sec == 0 {
            bail!("Token lifetimes must be greater than zero");
        }

        Ok(Self {
            db_dir,
            port,
            host,
            logging_level,
            frontend_dir_path,
            access_token_ttl_sec,
            refresh_token_ttl_sec,
            token_prune_interval_sec,
            seed_songs,
        })
    }

    pub fn songs_db_path(&self) -> PathBuf {
        self.db_dir.join("songs.db")
    }

    pub fn user_db_path(&self) -> PathBuf {
        self.db_dir.join("user.db")
    }

    pub fn token_lifetimes(&self) -> TokenLifetimes {
        TokenLifetimes {
            access: Duration::from_secs(self.access_token_ttl_sec),
            refresh: Duration::from_secs(self.refresh_token_ttl_sec),
        }
    }
}

/// Settings of the browsing client, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(API_URL_ENV_VAR).ok())
    }

    fn from_value(value: Option<String>) -> Self {
        let api_url = value
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self { api_url }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_value(None)
    }
}

/// Uses clap's ValueEnum parsing, case insensitive.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
