//! Client-side cache of a query's destinations
//!
//! The store is reloaded wholesale after every mutation instead of being
//! patched in place: mutations call [`DestinationStore::invalidate`] and the
//! view reloads when [`DestinationStore::is_stale`] reports true.
//!
//! Every invalidation bumps a generation counter. A load only clears the
//! stale flag when no invalidation happened while its request was in flight,
//! so a reply that predates a mutation never hides it.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::domain::{Destination, DestinationError, DestinationId, QueryId};
use crate::ports::{IDestinationApi, INotificationService, Notification};

use super::{notify, ViewScope};

#[derive(Debug, Default)]
struct StoreState {
    query_id: Option<QueryId>,
    destinations: Vec<Destination>,
    loaded: bool,
    load_failed: bool,
    stale: bool,
    generation: u64,
}

/// Cached destination list for one query
pub struct DestinationStore {
    api: Arc<dyn IDestinationApi>,
    notifier: Arc<dyn INotificationService>,
    state: RwLock<StoreState>,
}

impl DestinationStore {
    pub fn new(api: Arc<dyn IDestinationApi>, notifier: Arc<dyn INotificationService>) -> Self {
        Self {
            api,
            notifier,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Fetches the destinations of `query_id` and replaces the cached list.
    ///
    /// A response that arrives after `scope` was closed is dropped and the
    /// call returns [`DestinationError::Cancelled`]; the cached list and its
    /// flags stay as they were.
    pub async fn load(
        &self,
        query_id: QueryId,
        scope: &ViewScope,
    ) -> Result<Vec<Destination>, DestinationError> {
        let started_at = {
            let mut state = self.write();
            state.query_id = Some(query_id);
            state.generation
        };

        debug!(query_id = %query_id, "Loading destinations");
        let result = self.api.list_destinations(query_id).await;

        if !scope.is_active() {
            debug!(query_id = %query_id, "Discarding destination list for closed view");
            return Err(DestinationError::Cancelled);
        }

        match result {
            Ok(destinations) => {
                info!(
                    query_id = %query_id,
                    count = destinations.len(),
                    "Destinations loaded"
                );
                let mut state = self.write();
                state.destinations = destinations.clone();
                state.loaded = true;
                state.load_failed = false;
                if state.generation == started_at {
                    state.stale = false;
                } else {
                    debug!(query_id = %query_id, "Invalidated during load, list stays stale");
                }
                Ok(destinations)
            }
            Err(e) => {
                warn!(query_id = %query_id, error = %e, "Failed to load destinations");
                {
                    let mut state = self.write();
                    state.loaded = true;
                    state.load_failed = true;
                }
                let err = DestinationError::fetch(&e);
                notify(
                    self.notifier.as_ref(),
                    Notification::error("Failed to load Destinations").with_description(
                        match &err {
                            DestinationError::Fetch(msg) => msg.clone(),
                            other => other.to_string(),
                        },
                    ),
                )
                .await;
                Err(err)
            }
        }
    }

    /// Reloads when the list was invalidated or never loaded
    pub async fn refresh_if_stale(
        &self,
        scope: &ViewScope,
    ) -> Result<Option<Vec<Destination>>, DestinationError> {
        let (query_id, needs_load) = {
            let state = self.read();
            (state.query_id, state.stale || !state.loaded)
        };
        match query_id {
            Some(query_id) if needs_load => self.load(query_id, scope).await.map(Some),
            _ => Ok(None),
        }
    }

    /// Marks the cached list as outdated after a mutation
    pub fn invalidate(&self) {
        let mut state = self.write();
        state.stale = true;
        state.generation += 1;
    }

    pub fn is_stale(&self) -> bool {
        self.read().stale
    }

    pub fn is_loaded(&self) -> bool {
        self.read().loaded
    }

    /// True when the last load failed; the view shows an error state
    pub fn load_failed(&self) -> bool {
        self.read().load_failed
    }

    pub fn query_id(&self) -> Option<QueryId> {
        self.read().query_id
    }

    /// Snapshot of the cached list
    pub fn destinations(&self) -> Vec<Destination> {
        self.read().destinations.clone()
    }

    pub fn find(&self, id: DestinationId) -> Option<Destination> {
        self.read().destinations.iter().find(|d| d.id == id).cloned()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
