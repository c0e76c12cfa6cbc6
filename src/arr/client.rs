use super::types::{
    MediaItem, RadarrMovie, SonarrEpisode, SonarrEpisodeFile, SonarrSeries,
};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

/// Request timeout for Arr API calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A library that can list media files, e.g. a Radarr or Sonarr instance
#[async_trait::async_trait]
pub trait MediaSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// All media items that currently have a file on disk
    async fn list_media(&self) -> Result<Vec<MediaItem>>;

    /// Test the connection to the instance
    async fn test_connection(&self) -> Result<bool>;
}

struct BaseArrClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BaseArrClient {
    fn new(url: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v3{}", self.base_url, path)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        self.client
            .get(self.url(path))
            .header("X-Api-Key", &self.api_key)
            .query(query)
            .send()
            .await
            .context(format!("Failed to GET {}", path))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.get(path, query).await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("GET {} returned {}", path, status);
        }
        response
            .json()
            .await
            .context(format!("Invalid JSON from {}", path))
    }

    async fn test_connection(&self) -> Result<bool> {
        let response = self.get("/system/status", &[]).await?;
        Ok(response.status().is_success())
    }
}

pub struct RadarrClient(BaseArrClient);

impl RadarrClient {
    pub fn new(url: &str, api_key: &str) -> Self {
        Self(BaseArrClient::new(url, api_key))
    }
}

#[async_trait::async_trait]
impl MediaSource for RadarrClient {
    fn name(&self) -> &str {
        "radarr"
    }

    async fn list_media(&self) -> Result<Vec<MediaItem>> {
        let movies: Vec<RadarrMovie> = self.0.get_json("/movie", &[]).await?;

        let items = movies
            .into_iter()
            .filter(|movie| movie.has_file)
            .filter_map(|movie| {
                let path = movie.movie_file?.path.filter(|p| !p.is_empty())?;
                Some(MediaItem::movie(movie.id, movie.title, movie.year, path))
            })
            .collect();
        Ok(items)
    }

    async fn test_connection(&self) -> Result<bool> {
        self.0.test_connection().await
    }
}

pub struct SonarrClient(BaseArrClient);

impl SonarrClient {
    pub fn new(url: &str, api_key: &str) -> Self {
        Self(BaseArrClient::new(url, api_key))
    }

    async fn series_episodes(&self, series: &SonarrSeries) -> Result<Vec<MediaItem>> {
        let query = [("seriesId", series.id.to_string())];
        let files: Vec<SonarrEpisodeFile> = self.0.get_json("/episodefile", &query).await?;
        let file_paths: HashMap<i64, String> = files
            .into_iter()
            .filter_map(|f| Some((f.id, f.path.filter(|p| !p.is_empty())?)))
            .collect();

        let episodes: Vec<SonarrEpisode> = self.0.get_json("/episode", &query).await?;

        let items = episodes
            .into_iter()
            .filter(|ep| ep.has_file)
            .filter_map(|ep| {
                let path = file_paths.get(&ep.episode_file_id?)?;
                Some(MediaItem::episode(
                    ep.id,
                    series.title.as_str(),
                    ep.season_number,
                    ep.episode_number,
                    ep.title.unwrap_or_else(|| "Unknown".to_string()),
                    path.as_str(),
                ))
            })
            .collect();
        Ok(items)
    }
}

#[async_trait::async_trait]
impl MediaSource for SonarrClient {
    fn name(&self) -> &str {
        "sonarr"
    }

    async fn list_media(&self) -> Result<Vec<MediaItem>> {
        let series_list: Vec<SonarrSeries> = self.0.get_json("/series", &[]).await?;

        let mut items = Vec::new();
        for series in &series_list {
            match self.series_episodes(series).await {
                Ok(mut episodes) => items.append(&mut episodes),
                Err(e) => {
                    tracing::warn!(series = %series.title, "Skipping series: {:#}", e);
                }
            }
        }
        Ok(items)
    }

    async fn test_connection(&self) -> Result<bool> {
        self.0.test_connection().await
    }
}
