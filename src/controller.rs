//! Browser view controller
//!
//! The controller owns all session state: which view is active, the loaded
//! show list, the episodes of the selected show, the search text and the
//! episode dropdown value. Input handlers mutate that state and hand a
//! freshly computed [`View`] to a [`Renderer`].

use crate::catalog::{
    CatalogError, CatalogProvider, Episode, EpisodeCache, EpisodeId, Show, ShowId,
};
use crate::view::{self, View};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Message shown when the show list could not be fetched
pub const SHOWS_FAILED_MESSAGE: &str = "Failed to load shows. Try again later.";

/// Message shown when the episode list could not be fetched
pub const EPISODES_FAILED_MESSAGE: &str = "Failed to load episodes. Try again later.";

/// Errors reported by the controller's input handlers
///
/// None of them is fatal. The controller has already rendered the
/// resulting state when a handler returns one of these.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Fetching from the catalog failed
    #[error("Network error: {0}")]
    Network(#[from] CatalogError),

    /// The selected show is not in the loaded show list
    #[error("Show not found: {0}")]
    ShowNotFound(ShowId),

    /// The dropdown referenced an episode that is not in the current list
    #[error("Episode not found in the current list: {0}")]
    EpisodeNotFound(EpisodeId),
}

/// Which list the browser is displaying
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// The list of all shows
    #[default]
    Shows,
    /// The episodes of one show
    Episodes { show_id: ShowId, show_name: String },
}

impl ViewMode {
    /// Returns the selected show, if any
    pub fn show_id(&self) -> Option<ShowId> {
        match self {
            ViewMode::Shows => None,
            ViewMode::Episodes { show_id, .. } => Some(*show_id),
        }
    }
}

/// Value of the episode dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EpisodeSelection {
    /// No explicit choice; the text-filtered list is displayed
    #[default]
    All,
    /// Exactly this episode is displayed
    Episode(EpisodeId),
}

/// Progress of the operation behind the current view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    /// Data for the current view is available
    #[default]
    Ready,
    /// A fetch for the current view is in flight
    Loading,
    /// The last fetch failed; holds the user-visible message
    Failed(String),
}

/// Complete session state of the browser
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowserState {
    /// Active view
    pub mode: ViewMode,
    /// All shows, sorted by name; empty until loaded
    pub shows: Vec<Show>,
    /// Whether the show list has been fetched successfully
    pub shows_loaded: bool,
    /// Every episode of the selected show; empty in show view
    pub episodes: Vec<Episode>,
    /// Current free-text search
    pub search_term: String,
    /// Current episode dropdown value
    pub selection: EpisodeSelection,
    /// Status of the current view's data
    pub status: Status,
}

/// Presentation collaborator notified after every state change
///
/// Exactly one of the methods is called per render, depending on which
/// list the view displays.
pub trait Renderer {
    /// The show list view changed
    fn shows_changed(&mut self, view: &View);

    /// The episode list view changed
    fn episodes_changed(&mut self, view: &View);
}

/// Closures receiving every view work as renderers
impl<F> Renderer for F
where
    F: FnMut(&View),
{
    fn shows_changed(&mut self, view: &View) {
        self(view)
    }

    fn episodes_changed(&mut self, view: &View) {
        self(view)
    }
}

/// State machine behind the browser
///
/// States are [`ViewMode::Shows`] and [`ViewMode::Episodes`]. Handlers are
/// meant to be driven by a single owner; see [`crate::session`].
pub struct BrowserController<P, R>
where
    P: CatalogProvider,
    R: Renderer,
{
    cache: EpisodeCache<P>,
    renderer: R,
    state: BrowserState,
}

impl<P, R> BrowserController<P, R>
where
    P: CatalogProvider,
    R: Renderer,
{
    /// Creates a controller in the initial show view with nothing loaded
    pub fn new(provider: P, renderer: R) -> Self {
        Self::with_cache(EpisodeCache::new(provider), renderer)
    }

    /// Creates a controller around an existing episode cache
    pub fn with_cache(cache: EpisodeCache<P>, renderer: R) -> Self {
        Self {
            cache,
            renderer,
            state: BrowserState::default(),
        }
    }

    /// Loads the show list once per session and renders it
    ///
    /// Later calls re-render the current view without fetching again. After
    /// a failure the next call retries.
    pub async fn load_shows(&mut self) -> Result<(), ControllerError> {
        if self.state.shows_loaded {
            debug!("Show list already loaded");
            self.render();
            return Ok(());
        }

        self.state.mode = ViewMode::Shows;
        self.state.status = Status::Loading;
        self.render();

        match self.cache.provider().fetch_shows().await {
            Ok(shows) => {
                info!(count = shows.len(), "Loaded show list");
                self.state.shows = shows;
                self.state.shows_loaded = true;
                self.state.status = Status::Ready;
                self.render();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to load shows");
                self.state.status = Status::Failed(SHOWS_FAILED_MESSAGE.to_string());
                self.render();
                Err(e.into())
            }
        }
    }

    /// Switches to the episode view of a show
    ///
    /// Resets the search text and the dropdown, then displays the show's
    /// episodes from the cache, fetching them first if needed.
    pub async fn on_show_selected(&mut self, show_id: ShowId) -> Result<(), ControllerError> {
        let show_name = self
            .state
            .shows
            .iter()
            .find(|s| s.id == show_id)
            .map(|s| s.name.clone());

        let Some(show_name) = show_name else {
            warn!(show_id, "Selected show is not in the show list");
            self.render();
            return Err(ControllerError::ShowNotFound(show_id));
        };

        info!(show_id, show = %show_name, "Entering episode view");
        self.state.mode = ViewMode::Episodes { show_id, show_name };
        self.state.search_term.clear();
        self.state.selection = EpisodeSelection::All;
        self.state.episodes.clear();

        if !self.cache.contains(show_id) {
            self.state.status = Status::Loading;
            self.render();
        }

        match self.cache.get_episodes(show_id).await {
            Ok(episodes) => {
                debug!(show_id, count = episodes.len(), "Displaying episodes");
                self.state.episodes = episodes;
                self.state.status = Status::Ready;
                self.render();
                Ok(())
            }
            Err(e) => {
                error!(show_id, error = %e, "Failed to load episodes");
                self.state.status = Status::Failed(EPISODES_FAILED_MESSAGE.to_string());
                self.render();
                Err(e.into())
            }
        }
    }

    /// Returns to the full, unfiltered show list
    ///
    /// In the show view this only re-renders.
    pub fn on_back_requested(&mut self) {
        let ViewMode::Episodes { show_id, .. } = self.state.mode else {
            self.render();
            return;
        };

        info!(show_id, "Returning to show list");
        self.state.mode = ViewMode::Shows;
        self.state.search_term.clear();
        self.state.selection = EpisodeSelection::All;
        self.state.episodes.clear();
        self.state.status = Status::Ready;
        self.render();
    }

    /// Applies a new search text to the active list
    ///
    /// In the episode view this also resets the dropdown to "all" and
    /// repopulates it with the filtered episodes.
    pub fn on_search_changed(&mut self, term: &str) {
        debug!(term, "Search changed");
        self.state.search_term = term.to_string();
        if matches!(self.state.mode, ViewMode::Episodes { .. }) {
            self.state.selection = EpisodeSelection::All;
        }
        self.render();
    }

    /// Applies a new episode dropdown value
    ///
    /// Choosing an episode displays exactly that episode regardless of the
    /// search text; choosing "all" displays the text-filtered list again.
    pub fn on_dropdown_changed(
        &mut self,
        selection: EpisodeSelection,
    ) -> Result<(), ControllerError> {
        let in_episodes = matches!(self.state.mode, ViewMode::Episodes { .. });

        if let EpisodeSelection::Episode(episode_id) = selection {
            let offered = in_episodes
                && view::episode_options(&self.state)
                    .iter()
                    .any(|e| e.id == episode_id);

            if !offered {
                warn!(episode_id, "Dropdown selection is not in the current list");
                self.render();
                return Err(ControllerError::EpisodeNotFound(episode_id));
            }
        }

        if in_episodes {
            debug!(?selection, "Dropdown changed");
            self.state.selection = selection;
        }
        self.render();
        Ok(())
    }

    /// Returns the active view mode
    pub fn mode(&self) -> &ViewMode {
        &self.state.mode
    }

    /// Returns the complete session state
    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    /// Computes the view for the current state
    pub fn view(&self) -> View {
        view::compute_view(&self.state)
    }

    /// Returns the list currently on screen
    pub fn displayed_shows(&self) -> Vec<Show> {
        view::displayed_shows(&self.state)
    }

    /// Returns the episodes currently on screen
    pub fn displayed_episodes(&self) -> Vec<Episode> {
        view::displayed_episodes(&self.state)
    }

    /// Returns true while a fetch for the current view is in flight
    pub fn is_loading(&self) -> bool {
        self.state.status == Status::Loading
    }

    /// Returns the user-visible error of the current view, if any
    pub fn error(&self) -> Option<&str> {
        match &self.state.status {
            Status::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Returns the current search text
    pub fn search_term(&self) -> &str {
        &self.state.search_term
    }

    /// Returns the current dropdown value
    pub fn selection(&self) -> EpisodeSelection {
        self.state.selection
    }

    /// Returns the episode cache
    pub fn cache(&self) -> &EpisodeCache<P> {
        &self.cache
    }

    /// Returns the renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Projects the current state and notifies the renderer
    fn render(&mut self) {
        let view = view::compute_view(&self.state);
        match self.state.mode {
            ViewMode::Shows => self.renderer.shows_changed(&view),
            ViewMode::Episodes { .. } => self.renderer.episodes_changed(&view),
        }
    }
}
