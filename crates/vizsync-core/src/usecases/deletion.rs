//! Confirmed destination deletion
//!
//! Deleting is irreversible, so the user is asked first. A declined prompt
//! ends the operation without touching the backend.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{DestinationError, DestinationId, VisualizationId};
use crate::ports::{IConfirmationPrompt, IDestinationApi, INotificationService, Notification};

use super::{notify, DestinationStore};

/// Question shown before deleting
pub const DELETE_QUESTION: &str = "Do you want to delete this destination?";

/// How a delete request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined; nothing was sent
    Declined,
}

pub struct DeletionConfirmer {
    api: Arc<dyn IDestinationApi>,
    notifier: Arc<dyn INotificationService>,
    prompt: Arc<dyn IConfirmationPrompt>,
    store: Arc<DestinationStore>,
}

impl DeletionConfirmer {
    pub fn new(
        api: Arc<dyn IDestinationApi>,
        notifier: Arc<dyn INotificationService>,
        prompt: Arc<dyn IConfirmationPrompt>,
        store: Arc<DestinationStore>,
    ) -> Self {
        Self {
            api,
            notifier,
            prompt,
            store,
        }
    }

    /// Asks for confirmation, then deletes the destination
    pub async fn request_delete(
        &self,
        visualization_id: VisualizationId,
        destination_id: DestinationId,
    ) -> Result<DeleteOutcome, DestinationError> {
        let confirmed = self
            .prompt
            .confirm(DELETE_QUESTION)
            .await
            .map_err(DestinationError::fetch)?;
        if !confirmed {
            info!(destination_id = %destination_id, "Delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        match self
            .api
            .delete_destination(visualization_id, destination_id)
            .await
        {
            Ok(()) => {
                info!(destination_id = %destination_id, "Destination deleted");
                notify(
                    self.notifier.as_ref(),
                    Notification::success("Destination deleted"),
                )
                .await;
                self.store.invalidate();
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                warn!(destination_id = %destination_id, error = %e, "Failed to delete destination");
                notify(
                    self.notifier.as_ref(),
                    Notification::error("Failed to delete Destination")
                        .with_description(format!("{e:#}")),
                )
                .await;
                Err(DestinationError::fetch(&e))
            }
        }
    }
}
