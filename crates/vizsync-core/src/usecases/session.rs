//! One open destination view for a query
//!
//! Wires the store, form, poller and delete flow to a shared [`ViewScope`].
//! Dropping the session closes the scope, which abandons any poll still
//! waiting on the server.
//!
//! Creating a destination and syncing one are gated by [`DestinationPolicy`]:
//! callers run [`ensure_can_create`](DestinationSession::ensure_can_create) or
//! [`ensure_sync_enabled`](DestinationSession::ensure_sync_enabled) first.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{Destination, DestinationError, DestinationPolicy, QueryId, VisualizationRef};
use crate::ports::{IConfirmationPrompt, IDestinationApi, INotificationService, Notification};

use super::{
    notify, DeletionConfirmer, DestinationFormController, DestinationStore, PollPolicy, SyncJobPoller,
    ViewScope,
};

/// Ports a session talks to
#[derive(Clone)]
pub struct SessionPorts {
    pub api: Arc<dyn IDestinationApi>,
    pub notifier: Arc<dyn INotificationService>,
    pub prompt: Arc<dyn IConfirmationPrompt>,
}

pub struct DestinationSession {
    query_id: QueryId,
    scope: ViewScope,
    api: Arc<dyn IDestinationApi>,
    notifier: Arc<dyn INotificationService>,
    access: DestinationPolicy,
    store: Arc<DestinationStore>,
    form: DestinationFormController,
    poller: SyncJobPoller,
    deletion: DeletionConfirmer,
}

impl DestinationSession {
    /// Mounts a view for `query_id`; call [`load`](Self::load) to fetch the list
    pub fn open(
        query_id: QueryId,
        banner: Option<String>,
        ports: SessionPorts,
        policy: PollPolicy,
    ) -> Self {
        let store = Arc::new(DestinationStore::new(
            ports.api.clone(),
            ports.notifier.clone(),
        ));
        Self {
            query_id,
            scope: ViewScope::mount(banner),
            form: DestinationFormController::new(
                ports.api.clone(),
                ports.notifier.clone(),
                store.clone(),
            ),
            poller: SyncJobPoller::new(
                ports.api.clone(),
                ports.notifier.clone(),
                store.clone(),
                policy,
            ),
            deletion: DeletionConfirmer::new(
                ports.api.clone(),
                ports.notifier.clone(),
                ports.prompt,
                store.clone(),
            ),
            api: ports.api,
            notifier: ports.notifier,
            access: DestinationPolicy,
            store,
        }
    }

    pub fn query_id(&self) -> QueryId {
        self.query_id
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn store(&self) -> &DestinationStore {
        &self.store
    }

    pub fn form(&self) -> &DestinationFormController {
        &self.form
    }

    pub fn poller(&self) -> &SyncJobPoller {
        &self.poller
    }

    pub fn deletion(&self) -> &DeletionConfirmer {
        &self.deletion
    }

    pub async fn load(&self) -> Result<Vec<Destination>, DestinationError> {
        self.store.load(self.query_id, &self.scope).await
    }

    /// Reloads after a mutation; returns the cached list otherwise
    pub async fn refresh(&self) -> Result<Vec<Destination>, DestinationError> {
        match self.store.refresh_if_stale(&self.scope).await? {
            Some(destinations) => Ok(destinations),
            None => Ok(self.store.destinations()),
        }
    }

    /// Table visualizations of the query that may back a new destination
    pub async fn selectable_visualizations(
        &self,
    ) -> Result<Vec<VisualizationRef>, DestinationError> {
        let visualizations = self
            .api
            .query_visualizations(self.query_id)
            .await
            .map_err(DestinationError::fetch)?;
        Ok(crate::domain::selectable(&visualizations)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Fails with [`DestinationError::NotPermitted`] unless the user may create destinations
    pub async fn ensure_can_create(&self) -> Result<(), DestinationError> {
        let user = match self.api.current_user().await {
            Ok(user) => user,
            Err(e) => return Err(self.policy_lookup_failed(e).await),
        };
        if self.access.can_create_destination(&user) {
            return Ok(());
        }
        Err(self.deny("Only admins can create destinations").await)
    }

    /// Fails with [`DestinationError::NotPermitted`] unless the query has destination sync turned on
    pub async fn ensure_sync_enabled(&self) -> Result<(), DestinationError> {
        let flags = match self.api.query_flags(self.query_id).await {
            Ok(flags) => flags,
            Err(e) => return Err(self.policy_lookup_failed(e).await),
        };
        if self.access.is_destination_sync_enabled(&flags) {
            return Ok(());
        }
        Err(self.deny("Destination sync is disabled for this query").await)
    }

    async fn deny(&self, reason: &str) -> DestinationError {
        info!(query_id = %self.query_id, reason, "Destination action refused");
        notify(
            self.notifier.as_ref(),
            Notification::error("Not permitted").with_description(reason),
        )
        .await;
        DestinationError::NotPermitted(reason.to_string())
    }

    async fn policy_lookup_failed(&self, err: anyhow::Error) -> DestinationError {
        let message = format!("{err:#}");
        notify(
            self.notifier.as_ref(),
            Notification::error("Failed to check permissions").with_description(message.clone()),
        )
        .await;
        DestinationError::Fetch(message)
    }

    pub fn close(&self) {
        debug!(query_id = %self.query_id, "Closing destination view");
        self.scope.unmount();
    }
}

impl Drop for DestinationSession {
    fn drop(&mut self) {
        if self.scope.is_active() {
            self.scope.unmount();
        }
    }
}
