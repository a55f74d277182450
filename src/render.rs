//! Plain-text rendering of views for the terminal

use crate::view::{Cards, EpisodeCard, ShowCard, View};
use std::fmt::Write;

/// Renders a view as plain text
///
/// The output lists the page title, the status notice, the counter and
/// every card in order.
pub fn render_view(view: &View) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== {} ===", view.title);
    if !view.search_term.is_empty() {
        let _ = writeln!(out, "Search: {}", view.search_term);
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "{}", notice.message());
    }
    if !view.count_label.is_empty() {
        let _ = writeln!(out, "{}", view.count_label);
    }

    match &view.cards {
        Cards::Shows(cards) => cards.iter().for_each(|card| render_show_card(&mut out, card)),
        Cards::Episodes(cards) => cards
            .iter()
            .for_each(|card| render_episode_card(&mut out, card)),
    }

    out
}

fn render_show_card(out: &mut String, card: &ShowCard) {
    let _ = writeln!(out);
    let _ = writeln!(out, "[{}] {}", card.show_id, card.title);
    if !card.genres.is_empty() {
        let _ = writeln!(out, "  {}", card.genres.join(" · "));
    }
    let _ = writeln!(out, "  {}", card.badges.join(" | "));
    if !card.summary.is_empty() {
        let _ = writeln!(out, "  {}", card.summary);
    }
}

fn render_episode_card(out: &mut String, card: &EpisodeCard) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", card.title);
    if !card.summary.is_empty() {
        let _ = writeln!(out, "  {}", card.summary);
    }
    if !card.link_url.is_empty() {
        let _ = writeln!(out, "  {}: {}", card.link_label, card.link_url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{episode, show};
    use crate::controller::{BrowserState, Status, ViewMode};
    use crate::view::compute_view;

    #[test]
    fn test_render_show_list() {
        let mut alpha = show(1, "Alpha");
        alpha.genres = vec!["Drama".to_string(), "Crime".to_string()];
        alpha.summary = Some("<p>Two <b>brothers</b>.</p>".to_string());
        let state = BrowserState {
            shows: vec![alpha, show(2, "Beta")],
            ..BrowserState::default()
        };

        let text = render_view(&compute_view(&state));

        assert!(text.starts_with("=== TV SHOW PROJECT ===\n"));
        assert!(text.contains("2 show(s)"));
        assert!(text.contains("[1] Alpha\n  Drama · Crime\n"));
        assert!(text.contains("Two brothers."));
        assert!(text.contains("Status: N/A | Rating: N/A | Runtime: N/Am"));
    }

    #[test]
    fn test_render_episode_list() {
        let state = BrowserState {
            mode: ViewMode::Episodes {
                show_id: 1,
                show_name: "Alpha".to_string(),
            },
            shows: vec![show(1, "Alpha")],
            episodes: vec![episode(10, 1, 1, "Pilot")],
            ..BrowserState::default()
        };

        let text = render_view(&compute_view(&state));

        assert!(text.starts_with("=== Alpha ===\n"));
        assert!(text.contains("Showing 1 episode(s)"));
        assert!(text.contains("Pilot (S01E01)"));
        assert!(text.contains("View on TVMaze: https://www.tvmaze.com/episodes/10"));
    }

    #[test]
    fn test_render_notice() {
        let state = BrowserState {
            status: Status::Loading,
            ..BrowserState::default()
        };

        let text = render_view(&compute_view(&state));

        assert_eq!(text, "=== TV SHOW PROJECT ===\nLoading shows…\n");
    }
}
