//! show_browser - Browse TV shows and their episodes from the TVmaze catalog
//!
//! This library provides the catalog client, the session-scoped episode
//! cache, search filtering and the view controller that decides what the
//! browser displays. Front-ends drive the controller and draw the [`View`]s
//! it produces.

mod catalog;
pub mod controller;
pub mod debounce;
pub mod filter;
pub mod render;
pub mod session;
pub mod view;

use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

// Re-export catalog types
pub use catalog::{
    CatalogError, CatalogProvider, DEFAULT_BASE_URL, Episode, EpisodeCache, EpisodeId, Show,
    ShowId, TvMazeProvider, sort_shows,
};

// Re-export controller and view types
pub use controller::{
    BrowserController, BrowserState, ControllerError, EpisodeSelection, Renderer, Status,
    ViewMode,
};
pub use session::{ChannelRenderer, Request};
pub use view::{View, compute_view};

/// Top-level error type for browser operations
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Error while setting up or talking to the catalog
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error reported by the view controller
    #[error("{0}")]
    Controller(#[from] ControllerError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings for a browsing session
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserConfig {
    /// Root of the catalog API
    pub api_url: String,
    /// Upper bound for a single catalog request
    pub timeout: Duration,
    /// Quiet period before search input is applied
    pub debounce: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            debounce: debounce::SEARCH_DEBOUNCE,
        }
    }
}

/// Handle to a running browsing session
pub struct SessionHandle {
    /// Send input events here
    pub requests: mpsc::Sender<Request>,
    /// Every rendered view arrives here
    pub views: mpsc::UnboundedReceiver<View>,
    /// The task owning the controller; ends once `requests` is dropped
    pub task: JoinHandle<()>,
}

/// Starts a browsing session against the configured catalog
///
/// Nothing is fetched until the caller sends [`Request::LoadShows`]; views
/// arrive on [`SessionHandle::views`]. Must be called from within a tokio
/// runtime.
pub fn start_session(config: &BrowserConfig) -> Result<SessionHandle, BrowserError> {
    let provider = TvMazeProvider::new(&config.api_url, config.timeout)?;
    info!(api_url = provider.base_url(), "Starting browsing session");

    let (renderer, views) = ChannelRenderer::channel();
    let controller = BrowserController::new(provider, renderer);
    let (requests, rx) = mpsc::channel(32);

    let debounce = config.debounce;
    let task = tokio::spawn(async move {
        session::run_session(controller, rx, debounce).await;
    });

    Ok(SessionHandle {
        requests,
        views,
        task,
    })
}

/// Computes a single view without an interactive session
///
/// Loads the show list, optionally enters the episode view of `show_id`,
/// then applies `search` to whichever list is active. Every intermediate
/// view is passed to `on_view`.
///
/// # Examples
///
/// ```no_run
/// use show_browser::{BrowserConfig, snapshot, render::render_view};
///
/// # async fn run() -> Result<(), show_browser::BrowserError> {
/// let view = snapshot(&BrowserConfig::default(), Some(82), Some("winter"), |_| {}).await?;
/// println!("{}", render_view(&view));
/// # Ok(())
/// # }
/// ```
pub async fn snapshot<F>(
    config: &BrowserConfig,
    show_id: Option<ShowId>,
    search: Option<&str>,
    on_view: F,
) -> Result<View, BrowserError>
where
    F: FnMut(&View),
{
    let provider = TvMazeProvider::new(&config.api_url, config.timeout)?;
    snapshot_with(provider, show_id, search, on_view).await
}

/// Same as [`snapshot`] for an arbitrary catalog provider
pub async fn snapshot_with<P, F>(
    provider: P,
    show_id: Option<ShowId>,
    search: Option<&str>,
    on_view: F,
) -> Result<View, BrowserError>
where
    P: CatalogProvider,
    F: FnMut(&View),
{
    let mut controller = BrowserController::new(provider, on_view);

    controller.load_shows().await?;
    if let Some(show_id) = show_id {
        controller.on_show_selected(show_id).await?;
    }
    if let Some(term) = search {
        controller.on_search_changed(term);
    }

    Ok(controller.view())
}
