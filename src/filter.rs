//! Search filtering for shows and episodes
//!
//! Pure functions that narrow a list by a free-text term, plus the small
//! text helpers used to turn catalog HTML into displayable text.

use crate::catalog::{Episode, Show};
use regex::Regex;
use std::sync::LazyLock;

/// Tags that separate words, such as paragraphs and line breaks
static BLOCK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(?:p|br|div|li|ul|ol|h[1-6])\b[^>]*>").unwrap());

/// Any remaining tag, including its attributes
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Converts an HTML fragment to single-line plain text
///
/// Tags are removed together with their attributes, so link targets never
/// end up in the text. Entities are decoded and whitespace runs collapse to
/// one space.
pub fn strip_html(html: &str) -> String {
    let spaced = BLOCK_TAG.replace_all(html, " ");
    let text = ANY_TAG.replace_all(&spaced, "");
    nanohtml2text::html2text(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strips HTML and shortens the text to at most `max` characters
///
/// Text longer than `max` is cut, trimmed and suffixed with `...`.
/// Missing text yields an empty string.
pub fn truncate_text(html: Option<&str>, max: usize) -> String {
    let text = html.map(strip_html).unwrap_or_default();

    if text.chars().count() <= max {
        return text;
    }

    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim())
}

/// Normalizes a raw search term for matching
fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Checks whether an optional HTML summary contains the (lowercased) needle
fn summary_matches(summary: Option<&str>, needle: &str) -> bool {
    summary.is_some_and(|s| strip_html(s).to_lowercase().contains(needle))
}

/// Returns true if a show matches an already-normalized needle
fn show_matches(show: &Show, needle: &str) -> bool {
    show.name.to_lowercase().contains(needle)
        || summary_matches(show.summary.as_deref(), needle)
        || show.genres.join(" ").to_lowercase().contains(needle)
}

/// Returns true if an episode matches an already-normalized needle
fn episode_matches(episode: &Episode, needle: &str) -> bool {
    episode.name.to_lowercase().contains(needle)
        || summary_matches(episode.summary.as_deref(), needle)
}

/// Filters shows by a free-text term
///
/// A show matches when its name, its summary without HTML, or its genres
/// joined by spaces contain the term, ignoring case. An empty (or
/// whitespace-only) term returns every show. Order is preserved.
///
/// # Examples
///
/// ```
/// use show_browser::filter::filter_shows;
/// # use show_browser::Show;
/// # let show = |id, name: &str| Show {
/// #     id, name: name.to_string(), summary: None, image_url: None,
/// #     genres: vec![], status: None, rating: None, runtime: None,
/// # };
/// let shows = vec![show(1, "Alpha"), show(2, "Beta")];
/// let filtered = filter_shows(&shows, "alp");
/// assert_eq!(filtered.len(), 1);
/// assert_eq!(filtered[0].id, 1);
/// ```
pub fn filter_shows(shows: &[Show], term: &str) -> Vec<Show> {
    let needle = normalize_term(term);
    if needle.is_empty() {
        return shows.to_vec();
    }

    shows
        .iter()
        .filter(|show| show_matches(show, &needle))
        .cloned()
        .collect()
}

/// Filters episodes by a free-text term
///
/// An episode matches when its name or its summary without HTML contain
/// the term, ignoring case. An empty term returns every episode.
pub fn filter_episodes(episodes: &[Episode], term: &str) -> Vec<Episode> {
    let needle = normalize_term(term);
    if needle.is_empty() {
        return episodes.to_vec();
    }

    episodes
        .iter()
        .filter(|episode| episode_matches(episode, &needle))
        .cloned()
        .collect()
}
