//! Use cases (application services)
//!
//! Each use case orchestrates domain objects and ports to carry out one part
//! of destination management. Use cases depend only on port traits, never on
//! concrete adapters.
//!
//! ## Available Use Cases
//!
//! - [`DestinationStore`] - Cached destination list with stale tracking
//! - [`DestinationFormController`] - Create and edit flows
//! - [`SyncJobPoller`] - Manual sync with bounded, cancellable polling
//! - [`DeletionConfirmer`] - Confirmed deletion
//! - [`DestinationSession`] - All of the above bound to one [`ViewScope`]

pub mod deletion;
pub mod destination_form;
pub mod destination_store;
pub mod session;
pub mod sync_poller;
pub mod view_scope;

#[cfg(test)]
pub(crate) mod testing;

pub use deletion::{DeleteOutcome, DeletionConfirmer, DELETE_QUESTION};
pub use destination_form::{validate_new, DestinationFormController, FormInput, FormMode};
pub use destination_store::DestinationStore;
pub use session::{DestinationSession, SessionPorts};
pub use sync_poller::{PollPolicy, SyncJobPoller, SyncOutcome, SyncState};
pub use view_scope::ViewScope;

use tracing::warn;

use crate::ports::{INotificationService, Notification};

/// Delivers a notification; a delivery failure is logged, never propagated
pub(crate) async fn notify(notifier: &dyn INotificationService, notification: Notification) {
    if let Err(e) = notifier.notify(&notification).await {
        warn!(
            kind = %notification.kind,
            message = %notification.message,
            error = %e,
            "Failed to deliver notification"
        );
    }
}
