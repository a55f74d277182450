/// Data structures and traits for the show catalog.
///
/// This module provides the show and episode records rendered by the
/// browser, the trait implemented by catalog sources, and the error type
/// for failed catalog requests.
mod cached;
mod tvmaze;
mod tvmaze_types;

pub use cached::EpisodeCache;
pub use tvmaze::{DEFAULT_BASE_URL, TvMazeProvider};

use thiserror::Error;

/// Identifier of a show in the catalog.
pub type ShowId = u64;

/// Identifier of an episode, unique within its show.
pub type EpisodeId = u64;

/// Errors that can occur while talking to the catalog.
///
/// Every variant is a network error from the browser's point of view: the
/// request could not complete or its response could not be used.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    Request(String),

    /// The catalog answered with a non-success status
    #[error("HTTP {code} {reason}")]
    Status { code: u16, reason: String },

    /// The requested show does not exist in the catalog
    #[error("Show not found: {0}")]
    NotFound(ShowId),

    /// Failed to parse the catalog's JSON response
    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

/// A TV show as listed by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Show {
    /// Unique show id
    pub id: ShowId,
    /// Display name of the show
    pub name: String,
    /// Summary in HTML format, if the catalog has one
    pub summary: Option<String>,
    /// Medium sized poster image
    pub image_url: Option<String>,
    /// Genres in catalog order
    pub genres: Vec<String>,
    /// Running status such as "Ended" or "Running"
    pub status: Option<String>,
    /// Average user rating
    pub rating: Option<f64>,
    /// Runtime of an episode in minutes
    pub runtime: Option<u32>,
}

/// A single episode of a show.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    /// Episode id
    pub id: EpisodeId,
    /// The season number this episode belongs to
    pub season: u32,
    /// The episode number within the season
    pub number: u32,
    /// The episode title
    pub name: String,
    /// Summary in HTML format, if the catalog has one
    pub summary: Option<String>,
    /// Medium sized still image
    pub image_url: Option<String>,
    /// Link to the episode page on the catalog website
    pub url: String,
}

impl Episode {
    /// Returns the season/episode code, e.g. `S01E01`.
    pub fn code(&self) -> String {
        format!("S{:02}E{:02}", self.season, self.number)
    }

    /// Returns the label used for cards and dropdown entries.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.code())
    }
}

/// Sorts shows case-insensitively by name.
///
/// The sort is stable so shows with equal names keep their catalog order.
pub fn sort_shows(shows: &mut [Show]) {
    shows.sort_by_cached_key(|show| show.name.to_lowercase());
}

/// Trait for catalog sources that can list shows and their episodes.
///
/// Implementors fetch from a remote catalog such as TVmaze; tests provide
/// in-memory fakes.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetches every show in the catalog, sorted case-insensitively by name.
    async fn fetch_shows(&self) -> Result<Vec<Show>, CatalogError>;

    /// Fetches the episodes of a show in season/number order.
    ///
    /// # Arguments
    ///
    /// * `show_id` - The id of the show whose episodes to fetch
    async fn fetch_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, CatalogError>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory catalog used by the tests of several modules.

    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    pub(crate) fn show(id: ShowId, name: &str) -> Show {
        Show {
            id,
            name: name.to_string(),
            summary: None,
            image_url: None,
            genres: Vec::new(),
            status: None,
            rating: None,
            runtime: None,
        }
    }

    pub(crate) fn episode(id: EpisodeId, season: u32, number: u32, name: &str) -> Episode {
        Episode {
            id,
            season,
            number,
            name: name.to_string(),
            summary: None,
            image_url: None,
            url: format!("https://www.tvmaze.com/episodes/{}", id),
        }
    }

    /// Fake provider that counts how often each endpoint is hit.
    #[derive(Default)]
    pub(crate) struct FakeCatalog {
        pub shows: Vec<Show>,
        pub episodes: HashMap<ShowId, Vec<Episode>>,
        pub fail_shows: AtomicBool,
        pub fail_episodes: AtomicBool,
        pub show_calls: AtomicUsize,
        pub episode_calls: AtomicUsize,
    }

    impl FakeCatalog {
        pub(crate) fn with_shows(shows: Vec<Show>) -> Self {
            Self {
                shows,
                ..Self::default()
            }
        }

        pub(crate) fn episodes_for(mut self, show_id: ShowId, episodes: Vec<Episode>) -> Self {
            self.episodes.insert(show_id, episodes);
            self
        }

        pub(crate) fn set_failing(&self, failing: bool) {
            self.fail_shows.store(failing, Ordering::SeqCst);
            self.fail_episodes.store(failing, Ordering::SeqCst);
        }

        pub(crate) fn show_calls(&self) -> usize {
            self.show_calls.load(Ordering::SeqCst)
        }

        pub(crate) fn episode_calls(&self) -> usize {
            self.episode_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl CatalogProvider for FakeCatalog {
        async fn fetch_shows(&self) -> Result<Vec<Show>, CatalogError> {
            self.show_calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.fail_shows.load(Ordering::SeqCst) {
                return Err(CatalogError::Request("connection refused".to_string()));
            }
            let mut shows = self.shows.clone();
            sort_shows(&mut shows);
            Ok(shows)
        }

        async fn fetch_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, CatalogError> {
            self.episode_calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.fail_episodes.load(Ordering::SeqCst) {
                return Err(CatalogError::Request("connection reset".to_string()));
            }
            self.episodes
                .get(&show_id)
                .cloned()
                .ok_or(CatalogError::NotFound(show_id))
        }
    }
}
