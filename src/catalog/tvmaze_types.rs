/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format from the TVMaze API.
/// Only the fields the browser shows are declared; everything else is ignored.
use serde::Deserialize;

/// A show record from the `/shows` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    /// TVMaze show id
    pub id: u64,
    /// The name of the TV show
    pub name: String,
    /// Show summary in HTML format (may be null)
    pub summary: Option<String>,
    /// Poster images (may be null)
    pub image: Option<TvMazeImage>,
    /// Genre names
    #[serde(default)]
    pub genres: Vec<String>,
    /// Running status, e.g. "Ended"
    pub status: Option<String>,
    /// Rating block (may be null)
    pub rating: Option<TvMazeRating>,
    /// Episode runtime in minutes (may be null)
    pub runtime: Option<u32>,
}

/// Image links attached to shows and episodes.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    pub medium: Option<String>,
}

/// Rating block of a show.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeRating {
    pub average: Option<f64>,
}

/// A single episode from the `/shows/{id}/episodes` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeEpisode {
    /// TVMaze episode id
    pub id: u64,
    /// Season number
    pub season: u32,
    /// Episode number within the season (null for specials)
    pub number: Option<u32>,
    /// Episode title (may be null for episodes without a title)
    pub name: Option<String>,
    /// Episode summary in HTML format (may be null)
    pub summary: Option<String>,
    /// Still images (may be null)
    pub image: Option<TvMazeImage>,
    /// Episode page on tvmaze.com
    #[serde(default)]
    pub url: String,
}
