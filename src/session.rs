//! Browsing session event pump
//!
//! A session task owns the [`BrowserController`] and is the only place its
//! state is mutated. Front-ends talk to it through a request channel and
//! receive every rendered [`View`] through a [`ChannelRenderer`].

use crate::catalog::{CatalogProvider, ShowId};
use crate::controller::{BrowserController, EpisodeSelection, Renderer};
use crate::debounce::Debouncer;
use crate::view::View;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Input events a front-end can send to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Load (or re-render) the show list
    LoadShows,
    /// The search text changed; debounced before it is applied
    SearchChanged(String),
    /// The episode dropdown changed
    DropdownChanged(EpisodeSelection),
    /// A show was picked from a card or the show dropdown
    ShowSelected(ShowId),
    /// The back control was activated
    BackRequested,
}

/// Renderer forwarding every view over a channel
#[derive(Debug, Clone)]
pub struct ChannelRenderer {
    views: mpsc::UnboundedSender<View>,
}

impl ChannelRenderer {
    /// Creates a renderer and the receiving end of its views
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<View>) {
        let (views, rx) = mpsc::unbounded_channel();
        (Self { views }, rx)
    }

    fn send(&self, view: &View) {
        if self.views.send(view.clone()).is_err() {
            debug!("View receiver closed, dropping view");
        }
    }
}

impl Renderer for ChannelRenderer {
    fn shows_changed(&mut self, view: &View) {
        self.send(view);
    }

    fn episodes_changed(&mut self, view: &View) {
        self.send(view);
    }
}

/// Runs the session until the request channel closes
///
/// Search requests are debounced by `debounce`; a pending search is applied
/// before any other request so events keep their order. Returns the
/// controller so callers can inspect the final state.
pub async fn run_session<P, R>(
    mut controller: BrowserController<P, R>,
    mut requests: mpsc::Receiver<Request>,
    debounce: Duration,
) -> BrowserController<P, R>
where
    P: CatalogProvider,
    R: Renderer,
{
    info!(debounce_ms = debounce.as_millis() as u64, "Session started");
    let mut search: Debouncer<String> = Debouncer::new(debounce);

    loop {
        tokio::select! {
            term = search.ready() => controller.on_search_changed(&term),
            request = requests.recv() => match request {
                Some(Request::SearchChanged(term)) => search.push(term),
                Some(request) => {
                    if let Some(term) = search.take() {
                        controller.on_search_changed(&term);
                    }
                    handle_request(&mut controller, request).await;
                }
                None => break,
            },
        }
    }

    if let Some(term) = search.take() {
        controller.on_search_changed(&term);
    }

    info!("Session ended");
    controller
}

/// Dispatches one request to the controller
async fn handle_request<P, R>(controller: &mut BrowserController<P, R>, request: Request)
where
    P: CatalogProvider,
    R: Renderer,
{
    debug!(?request, "Handling request");

    let result = match request {
        Request::LoadShows => controller.load_shows().await,
        Request::ShowSelected(show_id) => controller.on_show_selected(show_id).await,
        Request::DropdownChanged(selection) => controller.on_dropdown_changed(selection),
        Request::BackRequested => {
            controller.on_back_requested();
            Ok(())
        }
        Request::SearchChanged(term) => {
            controller.on_search_changed(&term);
            Ok(())
        }
    };

    if let Err(e) = result {
        warn!(error = %e, "Request failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::{FakeCatalog, episode, show};
    use crate::view::Cards;

    fn catalog() -> FakeCatalog {
        FakeCatalog::with_shows(vec![show(1, "Alpha"), show(2, "Beta")]).episodes_for(
            1,
            vec![
                episode(10, 1, 1, "Pilot"),
                episode(11, 1, 2, "Day Two"),
                episode(12, 1, 3, "Day Three"),
            ],
        )
    }

    fn drain(views: &mut mpsc::UnboundedReceiver<View>) -> Vec<View> {
        let mut out = Vec::new();
        while let Ok(view) = views.try_recv() {
            out.push(view);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn test_searches_are_coalesced() {
        let (renderer, mut views) = ChannelRenderer::channel();
        let controller = BrowserController::new(catalog(), renderer);
        let (tx, rx) = mpsc::channel(16);

        tx.send(Request::LoadShows).await.unwrap();
        tx.send(Request::SearchChanged("a".to_string())).await.unwrap();
        tx.send(Request::SearchChanged("al".to_string())).await.unwrap();
        tx.send(Request::SearchChanged("alp".to_string())).await.unwrap();
        drop(tx);

        let controller = run_session(controller, rx, Duration::from_millis(220)).await;

        let views = drain(&mut views);
        // loading, loaded, one filtered render
        assert_eq!(views.len(), 3);
        assert_eq!(views[2].search_term, "alp");
        assert_eq!(views[2].cards.len(), 1);
        assert_eq!(controller.search_term(), "alp");
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_applied_after_quiet_period() {
        let (renderer, mut views) = ChannelRenderer::channel();
        let controller = BrowserController::new(catalog(), renderer);
        let (tx, rx) = mpsc::channel(16);
        let session = tokio::spawn(run_session(controller, rx, Duration::from_millis(220)));

        tx.send(Request::LoadShows).await.unwrap();
        assert!(views.recv().await.unwrap().is_loading());
        assert_eq!(views.recv().await.unwrap().cards.len(), 2);

        tx.send(Request::SearchChanged("b".to_string())).await.unwrap();
        tx.send(Request::SearchChanged("be".to_string())).await.unwrap();

        let view = views.recv().await.unwrap();
        assert_eq!(view.search_term, "be");
        assert_eq!(view.count_label, "1 show(s)");

        drop(tx);
        let controller = session.await.unwrap();
        assert!(drain(&mut views).is_empty());
        assert_eq!(controller.cache().provider().show_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_search_applies_before_dropdown() {
        let (renderer, mut views) = ChannelRenderer::channel();
        let controller = BrowserController::new(catalog(), renderer);
        let (tx, rx) = mpsc::channel(16);

        tx.send(Request::LoadShows).await.unwrap();
        tx.send(Request::ShowSelected(1)).await.unwrap();
        tx.send(Request::SearchChanged("day".to_string())).await.unwrap();
        tx.send(Request::DropdownChanged(EpisodeSelection::Episode(11)))
            .await
            .unwrap();
        drop(tx);

        let controller = run_session(controller, rx, Duration::from_millis(220)).await;

        let ids: Vec<u64> = controller.displayed_episodes().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![11]);

        let last = drain(&mut views).pop().unwrap();
        match last.cards {
            Cards::Episodes(cards) => assert_eq!(cards[0].title, "Day Two (S01E02)"),
            other => panic!("expected episode cards, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_still_render() {
        let (renderer, mut views) = ChannelRenderer::channel();
        let controller = BrowserController::new(catalog(), renderer);
        let (tx, rx) = mpsc::channel(16);

        tx.send(Request::LoadShows).await.unwrap();
        tx.send(Request::ShowSelected(99)).await.unwrap();
        tx.send(Request::BackRequested).await.unwrap();
        drop(tx);

        let controller = run_session(controller, rx, Duration::from_millis(220)).await;

        // loading, loaded, not-found re-render, back
        assert_eq!(drain(&mut views).len(), 4);
        assert_eq!(controller.cache().provider().episode_calls(), 0);
    }
}
