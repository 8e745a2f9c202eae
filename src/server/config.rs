use super::RequestsLoggingLevel;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub host: String,
    pub port: u16,
    pub frontend_dir_path: Option<String>,
    /// How often expired auth tokens are removed. Zero disables pruning.
    pub token_prune_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            host: "127.0.0.1".to_string(),
            port: 5001,
            frontend_dir_path: None,
            token_prune_interval: Duration::from_secs(600),
        }
    }
}
