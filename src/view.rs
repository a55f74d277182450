//! View projection
//!
//! Turns a [`BrowserState`] into everything a front-end draws: cards,
//! dropdown options, labels and notices. The projection is a pure function
//! of the state, so rendering the same state twice yields the same view.

use crate::catalog::{Episode, Show};
use crate::controller::{BrowserState, EpisodeSelection, Status, ViewMode};
use crate::filter::{filter_episodes, filter_shows, truncate_text};

/// Page title of the show list
pub const HOME_TITLE: &str = "TV SHOW PROJECT";

/// Maximum number of summary characters on a card
pub const SUMMARY_MAX_CHARS: usize = 140;

/// Maximum number of genre chips on a show card
pub const MAX_GENRE_CHIPS: usize = 4;

/// Placeholder entry of the show dropdown
pub const SHOW_PLACEHOLDER: &str = "-- Select a show --";

/// Placeholder entry of the episode dropdown
pub const EPISODE_PLACEHOLDER: &str = "-- All Episodes --";

/// Label of the external episode link
pub const EPISODE_LINK_LABEL: &str = "View on TVMaze";

/// Everything a front-end needs to draw the current state
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// Page heading
    pub title: String,
    /// Active view mode
    pub mode: ViewMode,
    /// Status line shown instead of (or above) the cards
    pub notice: Option<Notice>,
    /// Counter text, e.g. "12 show(s)"
    pub count_label: String,
    /// Cards in display order
    pub cards: Cards,
    /// Entries of the show dropdown, placeholder first
    pub show_options: Vec<DropdownOption>,
    /// Entries of the episode dropdown; None while it is hidden
    pub episode_options: Option<Vec<DropdownOption>>,
    /// Current episode dropdown value
    pub selection: EpisodeSelection,
    /// Whether the back control is shown
    pub back_visible: bool,
    /// Current search text
    pub search_term: String,
    /// Whether the clear-search control is shown
    pub clear_search_visible: bool,
}

impl View {
    /// Returns true while the view is waiting for a fetch
    pub fn is_loading(&self) -> bool {
        matches!(self.notice, Some(Notice::Loading(_)))
    }
}

/// Status line of a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A fetch is in flight
    Loading(String),
    /// The last fetch failed
    Error(String),
    /// The list is empty
    Empty(String),
}

impl Notice {
    /// Returns the message text
    pub fn message(&self) -> &str {
        match self {
            Notice::Loading(m) | Notice::Error(m) | Notice::Empty(m) => m,
        }
    }
}

/// One entry of a dropdown; `value` is None for the placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: Option<u64>,
    pub label: String,
}

/// Cards of a view
#[derive(Debug, Clone, PartialEq)]
pub enum Cards {
    Shows(Vec<ShowCard>),
    Episodes(Vec<EpisodeCard>),
}

impl Cards {
    /// Returns the number of cards
    pub fn len(&self) -> usize {
        match self {
            Cards::Shows(cards) => cards.len(),
            Cards::Episodes(cards) => cards.len(),
        }
    }

    /// Returns true if there are no cards
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Card describing a show
#[derive(Debug, Clone, PartialEq)]
pub struct ShowCard {
    pub show_id: u64,
    pub title: String,
    pub image_url: Option<String>,
    pub summary: String,
    pub genres: Vec<String>,
    /// Status, rating and runtime badges
    pub badges: Vec<String>,
}

/// Card describing an episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeCard {
    pub episode_id: u64,
    /// Episode name followed by its code, e.g. "Pilot (S01E01)"
    pub title: String,
    pub image_url: Option<String>,
    pub summary: String,
    pub link_url: String,
    pub link_label: String,
}

/// Returns the shows matching the current search text
pub fn displayed_shows(state: &BrowserState) -> Vec<Show> {
    filter_shows(&state.shows, &state.search_term)
}

/// Returns the episodes offered by the episode dropdown
///
/// This is always the text-filtered episode list of the selected show.
pub fn episode_options(state: &BrowserState) -> Vec<Episode> {
    filter_episodes(&state.episodes, &state.search_term)
}

/// Returns the episodes on screen
///
/// An explicit dropdown choice overrides the search text and yields exactly
/// that episode; otherwise the dropdown options are displayed.
pub fn displayed_episodes(state: &BrowserState) -> Vec<Episode> {
    match state.selection {
        EpisodeSelection::All => episode_options(state),
        EpisodeSelection::Episode(id) => state
            .episodes
            .iter()
            .filter(|e| e.id == id)
            .take(1)
            .cloned()
            .collect(),
    }
}

/// Computes the view for a state
pub fn compute_view(state: &BrowserState) -> View {
    let show_options = std::iter::once(DropdownOption {
        value: None,
        label: SHOW_PLACEHOLDER.to_string(),
    })
    .chain(state.shows.iter().map(|show| DropdownOption {
        value: Some(show.id),
        label: show.name.clone(),
    }))
    .collect();

    let (title, notice, count_label, cards, episode_options, back_visible) = match &state.mode {
        ViewMode::Shows => {
            let (notice, count_label, cards) = shows_section(state);
            (HOME_TITLE.to_string(), notice, count_label, cards, None, false)
        }
        ViewMode::Episodes { show_name, .. } => {
            let (notice, count_label, cards) = episodes_section(state);
            let title = if show_name.is_empty() {
                "Episodes".to_string()
            } else {
                show_name.clone()
            };
            let options = std::iter::once(DropdownOption {
                value: None,
                label: EPISODE_PLACEHOLDER.to_string(),
            })
            .chain(episode_options(state).iter().map(|episode| DropdownOption {
                value: Some(episode.id),
                label: episode.label(),
            }))
            .collect();
            (title, notice, count_label, cards, Some(options), true)
        }
    };

    View {
        title,
        mode: state.mode.clone(),
        notice,
        count_label,
        cards,
        show_options,
        episode_options,
        selection: state.selection,
        back_visible,
        search_term: state.search_term.clone(),
        clear_search_visible: !state.search_term.trim().is_empty(),
    }
}

fn shows_section(state: &BrowserState) -> (Option<Notice>, String, Cards) {
    let empty = Cards::Shows(Vec::new());
    match &state.status {
        Status::Loading => (
            Some(Notice::Loading("Loading shows…".to_string())),
            String::new(),
            empty,
        ),
        Status::Failed(message) => (Some(Notice::Error(message.clone())), String::new(), empty),
        Status::Ready => {
            let shows = displayed_shows(state);
            if shows.is_empty() {
                return (
                    Some(Notice::Empty("No shows found.".to_string())),
                    String::new(),
                    empty,
                );
            }
            let count_label = format!("{} show(s)", shows.len());
            let cards = shows.iter().map(show_card).collect();
            (None, count_label, Cards::Shows(cards))
        }
    }
}

fn episodes_section(state: &BrowserState) -> (Option<Notice>, String, Cards) {
    let empty = Cards::Episodes(Vec::new());
    match &state.status {
        Status::Loading => (
            Some(Notice::Loading("Loading episodes…".to_string())),
            String::new(),
            empty,
        ),
        Status::Failed(message) => (Some(Notice::Error(message.clone())), String::new(), empty),
        Status::Ready => {
            let episodes = displayed_episodes(state);
            if episodes.is_empty() {
                return (
                    Some(Notice::Empty("No episodes to display.".to_string())),
                    "0 episode(s)".to_string(),
                    empty,
                );
            }
            let count_label = format!("Showing {} episode(s)", episodes.len());
            let cards = episodes.iter().map(episode_card).collect();
            (None, count_label, Cards::Episodes(cards))
        }
    }
}

/// Builds the card of a show
pub fn show_card(show: &Show) -> ShowCard {
    let na = || "N/A".to_string();
    let badges = vec![
        format!("Status: {}", show.status.clone().unwrap_or_else(na)),
        format!(
            "Rating: {}",
            show.rating.map(|r| r.to_string()).unwrap_or_else(na)
        ),
        format!(
            "Runtime: {}m",
            show.runtime.map(|r| r.to_string()).unwrap_or_else(na)
        ),
    ];

    ShowCard {
        show_id: show.id,
        title: show.name.clone(),
        image_url: show.image_url.clone(),
        summary: truncate_text(show.summary.as_deref(), SUMMARY_MAX_CHARS),
        genres: show.genres.iter().take(MAX_GENRE_CHIPS).cloned().collect(),
        badges,
    }
}

/// Builds the card of an episode
pub fn episode_card(episode: &Episode) -> EpisodeCard {
    EpisodeCard {
        episode_id: episode.id,
        title: episode.label(),
        image_url: episode.image_url.clone(),
        summary: truncate_text(episode.summary.as_deref(), SUMMARY_MAX_CHARS),
        link_url: episode.url.clone(),
        link_label: EPISODE_LINK_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{episode, show};

    fn state() -> BrowserState {
        BrowserState {
            shows: vec![show(1, "Alpha"), show(2, "Beta")],
            ..BrowserState::default()
        }
    }

    fn episode_state() -> BrowserState {
        BrowserState {
            mode: ViewMode::Episodes {
                show_id: 1,
                show_name: "Alpha".to_string(),
            },
            episodes: vec![
                episode(10, 1, 1, "Pilot"),
                episode(11, 1, 2, "Pilot Part Two"),
                episode(12, 1, 3, "Finale"),
            ],
            ..state()
        }
    }

    #[test]
    fn test_show_view() {
        let view = compute_view(&state());

        assert_eq!(view.title, HOME_TITLE);
        assert_eq!(view.count_label, "2 show(s)");
        assert_eq!(view.cards.len(), 2);
        assert!(view.notice.is_none());
        assert!(!view.back_visible);
        assert!(view.episode_options.is_none());
        assert!(!view.clear_search_visible);

        let labels: Vec<&str> = view.show_options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec![SHOW_PLACEHOLDER, "Alpha", "Beta"]);
    }

    #[test]
    fn test_show_view_filtered_by_search() {
        let mut state = state();
        state.search_term = "alp".to_string();

        let view = compute_view(&state);

        assert_eq!(view.count_label, "1 show(s)");
        assert!(view.clear_search_visible);
        match &view.cards {
            Cards::Shows(cards) => assert_eq!(cards[0].show_id, 1),
            other => panic!("expected show cards, got {:?}", other),
        }
        // The show dropdown always lists every show
        assert_eq!(view.show_options.len(), 3);
    }

    #[test]
    fn test_loading_and_error_notices() {
        let mut state = state();
        state.status = Status::Loading;
        let view = compute_view(&state);
        assert!(view.is_loading());
        assert!(view.cards.is_empty());

        state.status = Status::Failed("Failed to load shows. Try again later.".to_string());
        let view = compute_view(&state);
        assert_eq!(
            view.notice,
            Some(Notice::Error("Failed to load shows. Try again later.".to_string()))
        );
        assert!(view.cards.is_empty());
    }

    #[test]
    fn test_episode_view_cards_and_options() {
        let view = compute_view(&episode_state());

        assert_eq!(view.title, "Alpha");
        assert!(view.back_visible);
        assert_eq!(view.count_label, "Showing 3 episode(s)");

        let options = view.episode_options.unwrap();
        assert_eq!(options[0].label, EPISODE_PLACEHOLDER);
        assert_eq!(options[1].label, "Pilot (S01E01)");
        assert_eq!(options.len(), 4);

        match &view.cards {
            Cards::Episodes(cards) => {
                assert_eq!(cards[0].title, "Pilot (S01E01)");
                assert_eq!(cards[0].link_label, EPISODE_LINK_LABEL);
            }
            other => panic!("expected episode cards, got {:?}", other),
        }
    }

    #[test]
    fn test_dropdown_options_equal_filtered_list() {
        let mut state = episode_state();
        state.search_term = "pilot".to_string();

        let view = compute_view(&state);
        let option_ids: Vec<u64> = view
            .episode_options
            .unwrap()
            .iter()
            .filter_map(|o| o.value)
            .collect();
        let filtered_ids: Vec<u64> = episode_options(&state).iter().map(|e| e.id).collect();

        assert_eq!(option_ids, vec![10, 11]);
        assert_eq!(option_ids, filtered_ids);
    }

    #[test]
    fn test_selection_displays_exactly_one_episode() {
        let mut state = episode_state();
        state.search_term = "pilot".to_string();
        state.selection = EpisodeSelection::Episode(11);

        let displayed = displayed_episodes(&state);
        assert_eq!(displayed.len(), 1);
        assert_eq!(displayed[0].id, 11);

        let view = compute_view(&state);
        assert_eq!(view.count_label, "Showing 1 episode(s)");
        // Options still follow the search text
        assert_eq!(view.episode_options.unwrap().len(), 3);
    }

    #[test]
    fn test_empty_episode_list() {
        let mut state = episode_state();
        state.search_term = "nothing".to_string();

        let view = compute_view(&state);

        assert_eq!(view.count_label, "0 episode(s)");
        assert_eq!(
            view.notice,
            Some(Notice::Empty("No episodes to display.".to_string()))
        );
    }

    #[test]
    fn test_show_card_badges() {
        let mut full = show(7, "Seven");
        full.status = Some("Running".to_string());
        full.rating = Some(8.5);
        full.runtime = Some(45);
        full.genres = ["Drama", "Crime", "Thriller", "Mystery", "Horror"]
            .iter()
            .map(|g| g.to_string())
            .collect();

        let card = show_card(&full);
        assert_eq!(card.badges, vec!["Status: Running", "Rating: 8.5", "Runtime: 45m"]);
        assert_eq!(card.genres.len(), MAX_GENRE_CHIPS);

        let card = show_card(&show(8, "Eight"));
        assert_eq!(card.badges, vec!["Status: N/A", "Rating: N/A", "Runtime: N/Am"]);
    }

    #[test]
    fn test_card_summary_is_truncated() {
        let mut ep = episode(1, 1, 1, "Long");
        ep.summary = Some(format!("<p>{}</p>", "word ".repeat(60)));

        let card = episode_card(&ep);

        assert!(card.summary.ends_with("..."));
        assert!(card.summary.chars().count() <= SUMMARY_MAX_CHARS + 3);
    }

    #[test]
    fn test_card_summaries_are_single_line() {
        let mut alpha = show(1, "Alpha");
        alpha.summary = Some("<p>First part.</p>\r\n<p>Second <a href=\"https://x.test\">part</a>.</p>".to_string());
        let mut pilot = episode(10, 1, 1, "Pilot");
        pilot.summary = Some("<p>One.</p><p>Two.</p>".to_string());

        assert_eq!(show_card(&alpha).summary, "First part. Second part.");
        assert_eq!(episode_card(&pilot).summary, "One. Two.");
    }

    #[test]
    fn test_compute_view_is_idempotent() {
        let state = episode_state();
        assert_eq!(compute_view(&state), compute_view(&state));
    }
}
