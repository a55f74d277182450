/// TVMaze catalog provider implementation.
use super::tvmaze_types::{TvMazeEpisode, TvMazeShow};
use super::{CatalogError, CatalogProvider, Episode, Show, ShowId, sort_shows};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

/// Default base URL of the public TVMaze API.
pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

/// Catalog provider for the TVMaze API.
///
/// This provider lists shows from https://api.tvmaze.com/shows and the
/// episodes of a show from its `/shows/{id}/episodes` endpoint.
pub struct TvMazeProvider {
    client: reqwest::Client,
    base_url: String,
}

impl TvMazeProvider {
    /// Creates a provider for the given base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root without trailing slash, e.g. `https://api.tvmaze.com`
    /// * `timeout` - Upper bound for a single request
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Creates a provider around a preconfigured HTTP client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the API root this provider talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Converts a TVMaze show to our internal Show structure.
    fn convert_show(tvmaze_show: TvMazeShow) -> Show {
        Show {
            id: tvmaze_show.id,
            name: tvmaze_show.name,
            summary: tvmaze_show.summary,
            image_url: tvmaze_show.image.and_then(|i| i.medium),
            genres: tvmaze_show.genres,
            status: tvmaze_show.status,
            rating: tvmaze_show.rating.and_then(|r| r.average),
            runtime: tvmaze_show.runtime,
        }
    }

    /// Converts a TVMaze episode to our internal Episode structure.
    ///
    /// Returns None for records without an episode number.
    fn convert_episode(tvmaze_episode: TvMazeEpisode) -> Option<Episode> {
        let number = tvmaze_episode.number?;
        Some(Episode {
            id: tvmaze_episode.id,
            season: tvmaze_episode.season,
            number,
            name: tvmaze_episode.name.unwrap_or_else(|| "Unknown".to_string()),
            summary: tvmaze_episode.summary,
            image_url: tvmaze_episode.image.and_then(|i| i.medium),
            url: tvmaze_episode.url,
        })
    }

    /// Converts a decoded `/shows` response, sorting it by name.
    fn convert_shows(tvmaze_shows: Vec<TvMazeShow>) -> Vec<Show> {
        let mut shows: Vec<Show> = tvmaze_shows.into_iter().map(Self::convert_show).collect();
        sort_shows(&mut shows);
        shows
    }

    /// Converts a decoded episode list, keeping the API order.
    fn convert_episodes(tvmaze_episodes: Vec<TvMazeEpisode>) -> Vec<Episode> {
        let total = tvmaze_episodes.len();
        let episodes: Vec<Episode> = tvmaze_episodes
            .into_iter()
            .filter_map(Self::convert_episode)
            .collect();

        if episodes.len() != total {
            debug!(
                skipped = total - episodes.len(),
                "Skipped episodes without an episode number"
            );
        }

        episodes
    }

    /// Performs a GET request and decodes the JSON body.
    async fn get_json<T>(&self, path: &str) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Requesting catalog");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TvMazeProvider {
    async fn fetch_shows(&self) -> Result<Vec<Show>, CatalogError> {
        let tvmaze_shows: Vec<TvMazeShow> = self.get_json("/shows").await?;
        let shows = Self::convert_shows(tvmaze_shows);
        info!(count = shows.len(), "Fetched show list");
        Ok(shows)
    }

    async fn fetch_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, CatalogError> {
        let path = format!("/shows/{}/episodes", show_id);
        let tvmaze_episodes: Vec<TvMazeEpisode> =
            self.get_json(&path).await.map_err(|e| match e {
                CatalogError::Status { code: 404, .. } => CatalogError::NotFound(show_id),
                other => other,
            })?;

        let episodes = Self::convert_episodes(tvmaze_episodes);
        info!(show_id, count = episodes.len(), "Fetched episodes");
        Ok(episodes)
    }
}
