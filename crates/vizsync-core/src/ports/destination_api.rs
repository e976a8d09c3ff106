//! Destination API port (driven/secondary port)
//!
//! This module defines the interface for the backend endpoints behind the
//! destination management flow. The primary implementation talks to the
//! server's REST API; tests use in-memory fakes.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are adapter-specific;
//!   use cases fold them into [`DestinationError::Fetch`](crate::domain::DestinationError).
//! - Uses `#[async_trait]` for async trait methods.
//! - Create and update both answer with the stored destination so callers
//!   never need to re-read it.

use crate::domain::{
    CurrentUser, Destination, DestinationDraft, DestinationId, JobId, ObjectFlags, QueryId,
    SyncJob, VisualizationId, VisualizationRef,
};

/// Port trait for destination CRUD and sync jobs
#[async_trait::async_trait]
pub trait IDestinationApi: Send + Sync {
    /// Lists every destination attached to any visualization of `query_id`
    async fn list_destinations(&self, query_id: QueryId) -> anyhow::Result<Vec<Destination>>;

    /// Lists the visualizations of `query_id`; callers filter them with
    /// [`selectable`](crate::domain::selectable)
    async fn query_visualizations(
        &self,
        query_id: QueryId,
    ) -> anyhow::Result<Vec<VisualizationRef>>;

    /// Reads the permission flags the server attaches to `query_id`
    async fn query_flags(&self, query_id: QueryId) -> anyhow::Result<ObjectFlags>;

    /// Reads the user the client is authenticated as
    async fn current_user(&self) -> anyhow::Result<CurrentUser>;

    /// Creates a destination fed by `visualization_id`
    async fn create_destination(
        &self,
        visualization_id: VisualizationId,
        draft: &DestinationDraft,
    ) -> anyhow::Result<Destination>;

    /// Replaces name and options of an existing destination
    async fn update_destination(
        &self,
        visualization_id: VisualizationId,
        destination_id: DestinationId,
        draft: &DestinationDraft,
    ) -> anyhow::Result<Destination>;

    /// Removes (archives) a destination
    async fn delete_destination(
        &self,
        visualization_id: VisualizationId,
        destination_id: DestinationId,
    ) -> anyhow::Result<()>;

    /// Enqueues a manual sync job and returns its identifier
    async fn trigger_sync(&self, destination_id: DestinationId) -> anyhow::Result<JobId>;

    /// Reads the current status of a sync job
    async fn job_status(
        &self,
        destination_id: DestinationId,
        job_id: &JobId,
    ) -> anyhow::Result<SyncJob>;
}
