//! Session-scoped episode cache
//!
//! This module provides a caching wrapper around a catalog provider that
//! keeps every fetched episode list in memory for the rest of the session.

use super::{CatalogError, CatalogProvider, Episode, ShowId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use tracing::debug;

/// Slot holding the episode list of one show once it has been fetched
type Slot = Arc<OnceCell<Vec<Episode>>>;

/// A caching wrapper for catalog providers
///
/// Episode lists are fetched lazily on first request and never evicted or
/// refreshed. Concurrent requests for the same show share a single fetch;
/// a failed fetch stores nothing, so the next request tries again.
pub struct EpisodeCache<P>
where
    P: CatalogProvider,
{
    /// The underlying catalog provider
    provider: P,
    /// One slot per show id ever requested
    slots: Mutex<HashMap<ShowId, Slot>>,
}

impl<P> EpisodeCache<P>
where
    P: CatalogProvider,
{
    /// Creates an empty cache wrapping the given provider
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let tvmaze = TvMazeProvider::new(DEFAULT_BASE_URL, Duration::from_secs(15))?;
    /// let cache = EpisodeCache::new(tvmaze);
    /// let episodes = cache.get_episodes(82).await?;
    /// ```
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the episodes of a show, fetching them on the first request
    ///
    /// # Arguments
    ///
    /// * `show_id` - The show whose episodes to return
    ///
    /// # Returns
    ///
    /// The cached episode sequence, or the provider's error if the fetch
    /// failed. Failures are not cached.
    pub async fn get_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, CatalogError> {
        let slot = self.slot(show_id);

        if let Some(episodes) = slot.get() {
            debug!(show_id, "Episode cache hit");
            return Ok(episodes.clone());
        }

        let episodes = slot
            .get_or_try_init(|| async {
                debug!(show_id, "Episode cache miss, fetching");
                self.provider.fetch_episodes(show_id).await
            })
            .await?;

        Ok(episodes.clone())
    }

    /// Returns true if the episodes of `show_id` are stored
    pub fn contains(&self, show_id: ShowId) -> bool {
        self.lock_slots()
            .get(&show_id)
            .is_some_and(|slot| slot.initialized())
    }

    /// Returns the number of shows with stored episodes
    pub fn len(&self) -> usize {
        self.lock_slots()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Returns true if no episode list is stored yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the slot for a show, creating an empty one if needed
    fn slot(&self, show_id: ShowId) -> Slot {
        self.lock_slots().entry(show_id).or_default().clone()
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, HashMap<ShowId, Slot>> {
        // The map stays consistent even if a holder panicked
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
