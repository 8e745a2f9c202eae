use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moodtunes::cli_style::get_styles;
use moodtunes::config::{AppConfig, CliConfig, FileConfig};
use moodtunes::server::{run_server, RequestsLoggingLevel, ServerConfig};
use moodtunes::song_store::{seed_sample_songs, SqliteSongStore};
use moodtunes::user::{SqliteUserStore, UserManager};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles = get_styles(), version)]
struct CliArgs {
    /// Directory holding songs.db and user.db. Created files are placed here.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// Optional TOML config file. Its values take precedence over the flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 5001)]
    pub port: u16,

    /// The address to bind.
    #[clap(long, default_value = "127.0.0.1")]
    pub host: String,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Lifetime of access tokens, in seconds.
    #[clap(long, default_value_t = 60 * 60)]
    pub access_token_ttl_sec: u64,

    /// Lifetime of refresh tokens, in seconds.
    #[clap(long, default_value_t = 30 * 24 * 60 * 60)]
    pub refresh_token_ttl_sec: u64,

    /// Interval between expired token cleanups, in seconds. 0 disables the cleanup.
    #[clap(long, default_value_t = 10 * 60)]
    pub token_prune_interval_sec: u64,

    /// Insert the sample songs when the songs table is empty.
    #[clap(long)]
    pub seed_songs: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_dir: self.db_dir.clone(),
            port: self.port,
            host: self.host.clone(),
            logging_level: self.logging_level.clone(),
            frontend_dir_path: self.frontend_dir_path.clone(),
            access_token_ttl_sec: self.access_token_ttl_sec,
            refresh_token_ttl_sec: self.refresh_token_ttl_sec,
            token_prune_interval_sec: self.token_prune_interval_sec,
            seed_songs: self.seed_songs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening songs database at {:?}...", config.songs_db_path());
    let song_store = Arc::new(SqliteSongStore::new(config.songs_db_path())?);
    if config.seed_songs {
        seed_sample_songs(song_store.as_ref())?;
    }

    info!("Opening user database at {:?}...", config.user_db_path());
    let user_store = Arc::new(SqliteUserStore::new(config.user_db_path())?);
    let user_manager = UserManager::new(user_store, config.token_lifetimes());

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        host: config.host.clone(),
        port: config.port,
        frontend_dir_path: config.frontend_dir_path.clone(),
        token_prune_interval: Duration::from_secs(config.token_prune_interval_sec),
    };

    info!("Ready to serve at {}:{}!", config.host, config.port);
    run_server(server_config, song_store, user_manager).await
}
