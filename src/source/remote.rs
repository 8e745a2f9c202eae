//! HTTP client for the songs backend.

use super::wire::{into_songs, EmotionsPayload, HealthPayload, SongPayload};
use super::{FetchError, SongSource};
use crate::songs::{Mood, Song};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Fetches songs from the backend REST API.
///
/// Every call is a single attempt with no timeout and no retry. Failures are logged
/// and surfaced as [`FetchError::FetchFailed`].
pub struct RemoteSongSource {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteSongSource {
    /// # Arguments
    /// * `base_url` - Base URL of the backend (e.g., "http://localhost:5001")
    pub fn new<T: AsRef<str>>(base_url: T) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client<T: AsRef<str>>(client: reqwest::Client, base_url: T) -> Self {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request_songs(&self, emotion: &str) -> Result<Vec<Song>> {
        let url = format!("{}/api/songs", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("emotion", emotion)])
            .send()
            .await
            .context("Failed to connect to songs backend")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch songs for {}: status {}",
                emotion,
                response.status()
            );
        }

        let payloads: Vec<SongPayload> = response
            .json()
            .await
            .context("Failed to parse songs response")?;
        Ok(into_songs(payloads))
    }

    /// GET `/api/songs?emotion=<emotion>`. The result is exactly what the backend
    /// returned; nothing is filtered client side.
    pub async fn fetch_songs(&self, emotion: &str) -> Result<Vec<Song>, FetchError> {
        match self.request_songs(emotion).await {
            Ok(songs) => {
                debug!("Fetched {} songs for emotion {}", songs.len(), emotion);
                Ok(songs)
            }
            Err(err) => {
                error!("Error fetching songs: {:#}", err);
                Err(FetchError::FetchFailed)
            }
        }
    }

    async fn request_emotions(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/songs/emotions", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to connect to songs backend")?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch emotions: status {}", response.status());
        }

        let payload: EmotionsPayload = response
            .json()
            .await
            .context("Failed to parse emotions response")?;
        Ok(payload.emotions)
    }

    pub async fn fetch_emotions(&self) -> Result<Vec<Mood>, FetchError> {
        match self.request_emotions().await {
            Ok(emotions) => {
                let mut moods: Vec<Mood> = Vec::with_capacity(emotions.len());
                for mood in emotions.iter().map(Mood::new) {
                    if !mood.is_empty() && !moods.contains(&mood) {
                        moods.push(mood);
                    }
                }
                Ok(moods)
            }
            Err(err) => {
                error!("Error fetching emotions: {:#}", err);
                Err(FetchError::FetchFailed)
            }
        }
    }

    /// GET `/api/health`. Only logs the outcome; the returned flag is advisory and
    /// never gates [`RemoteSongSource::fetch_songs`].
    pub async fn check_health(&self) -> bool {
        let url = format!("{}/api/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<HealthPayload>().await {
                    Ok(health) => info!(
                        "Backend connection successful: {} {}",
                        health.status,
                        health.message.unwrap_or_default()
                    ),
                    Err(_) => info!("Backend connection successful"),
                }
                true
            }
            Ok(response) => {
                warn!("Backend responded with status {}", response.status());
                false
            }
            Err(err) => {
                error!("Backend connection failed: {}", err);
                false
            }
        }
    }

    /// Runs [`RemoteSongSource::check_health`] in the background.
    pub fn spawn_health_check(self: &Arc<Self>) -> JoinHandle<bool> {
        let source = Arc::clone(self);
        tokio::spawn(async move { source.check_health().await })
    }
}

#[async_trait]
impl SongSource for RemoteSongSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn get_by_mood(&self, mood: &Mood) -> Result<Vec<Song>, FetchError> {
        self.fetch_songs(mood.as_str()).await
    }

    async fn available_moods(&self) -> Result<Vec<Mood>, FetchError> {
        self.fetch_emotions().await
    }
}
