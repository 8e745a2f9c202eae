use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub db_dir: Option<String>,
    pub port: Option<u16>,
    pub host: Option<String>,
    pub logging_level: Option<String>,
    pub frontend_dir_path: Option<String>,
    pub seed_songs: Option<bool>,

    pub tokens: Option<TokensConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TokensConfig {
    pub access_ttl_sec: Option<u64>,
    pub refresh_ttl_sec: Option<u64>,
    pub prune_interval_sec: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_partial_file() {
        let config: FileConfig = toml::from_str(
            r#"
            port = 8080
            logging_level = "headers"

            [tokens]
            access_ttl_sec = 120
            "#,
        )
        .unwrap();

        assert_eq!(config.port, Some(8080));
        assert_eq!(config.logging_level.as_deref(), Some("headers"));
        assert!(config.db_dir.is_none());
        let tokens = config.tokens.unwrap();
        assert_eq!(tokens.access_ttl_sec, Some(120));
        assert!(tokens.refresh_ttl_sec.is_none());
    }

    #[test]
    fn load_reports_unparsable_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number").unwrap();

        let err = FileConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = FileConfig::load(Path::new("/nonexistent/moodtunes.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
