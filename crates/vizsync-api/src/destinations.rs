//! Destination and sync job endpoints
//!
//! ## Endpoints
//!
//! - `GET /api/queries/{id}/destinations` → `{ destinations: [...] }`
//! - `GET /api/queries/{id}` → query object with its `visualizations` and
//!   permission flags (`can_edit`, `is_destination_sync_enabled`)
//! - `GET /api/session` → `{ user: { permissions, ... } }`
//! - `POST /api/visualization/{vis}/destination` → `{ destination }`
//! - `POST /api/visualization/{vis}/destination/{dest}` → `{ destination }`
//! - `DELETE /api/visualization/{vis}/destination/{dest}`
//! - `POST /api/destination/{dest}/sync` → `{ job: { id, ... } }`
//! - `GET /api/destination/{dest}/jobs/{job}` → `{ job: { status, error } }`

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use vizsync_core::domain::{
    CurrentUser, Destination, DestinationDraft, DestinationId, JobId, JobStatus, ObjectFlags,
    QueryId, SyncJob, VisualizationId, VisualizationRef,
};

use crate::client::RedashClient;
use crate::ApiError;

#[derive(Debug, Deserialize)]
struct DestinationList {
    #[serde(default)]
    destinations: Vec<Destination>,
}

#[derive(Debug, Deserialize)]
struct DestinationEnvelope {
    destination: Destination,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    visualizations: Vec<VisualizationRef>,
    #[serde(flatten)]
    flags: ObjectFlags,
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    user: CurrentUser,
}

#[derive(Debug, Deserialize)]
struct JobEnvelope {
    job: JobBody,
}

/// Job as serialized by the server; `id` is absent on some status answers
#[derive(Debug, Deserialize)]
struct JobBody {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    status: Option<JobStatus>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    updated_at: Option<serde_json::Value>,
}

impl JobBody {
    fn job_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

pub async fn list(client: &RedashClient, query_id: QueryId) -> Result<Vec<Destination>> {
    let body: DestinationList = client
        .get_json(&format!("/api/queries/{query_id}/destinations"), &[])
        .await?;
    debug!(query_id = %query_id, count = body.destinations.len(), "Fetched destinations");
    Ok(body.destinations)
}

pub async fn visualizations(
    client: &RedashClient,
    query_id: QueryId,
) -> Result<Vec<VisualizationRef>> {
    let body: QueryBody = client
        .get_json(&format!("/api/queries/{query_id}"), &[])
        .await?;
    Ok(body.visualizations)
}

pub async fn query_flags(client: &RedashClient, query_id: QueryId) -> Result<ObjectFlags> {
    let body: QueryBody = client
        .get_json(&format!("/api/queries/{query_id}"), &[])
        .await?;
    debug!(query_id = %query_id, flags = ?body.flags, "Fetched query flags");
    Ok(body.flags)
}

/// The authenticated user; admin rights come from either `is_admin` or the `admin` permission
pub async fn current_user(client: &RedashClient) -> Result<CurrentUser> {
    let body: SessionBody = client.get_json("/api/session", &[]).await?;
    let mut user = body.user;
    user.is_admin = user.is_admin || user.has_permission("admin");
    Ok(user)
}

pub async fn create(
    client: &RedashClient,
    visualization_id: VisualizationId,
    draft: &DestinationDraft,
) -> Result<Destination> {
    let body: DestinationEnvelope = client
        .post_json(
            &format!("/api/visualization/{visualization_id}/destination"),
            draft,
        )
        .await?;
    Ok(body.destination)
}

pub async fn update(
    client: &RedashClient,
    visualization_id: VisualizationId,
    destination_id: DestinationId,
    draft: &DestinationDraft,
) -> Result<Destination> {
    let body: DestinationEnvelope = client
        .post_json(
            &format!("/api/visualization/{visualization_id}/destination/{destination_id}"),
            draft,
        )
        .await?;
    Ok(body.destination)
}

pub async fn delete(
    client: &RedashClient,
    visualization_id: VisualizationId,
    destination_id: DestinationId,
) -> Result<()> {
    client
        .delete(&format!(
            "/api/visualization/{visualization_id}/destination/{destination_id}"
        ))
        .await
}

/// Enqueues a sync job and returns its id
pub async fn trigger_sync(client: &RedashClient, destination_id: DestinationId) -> Result<JobId> {
    let body: JobEnvelope = client
        .post_json(
            &format!("/api/destination/{destination_id}/sync"),
            &serde_json::json!({}),
        )
        .await?;
    let raw = body
        .job
        .job_id()
        .ok_or_else(|| ApiError::InvalidResponse("sync job has no id".to_string()))?;
    let job_id = JobId::new(raw).context("Server returned an unusable job id")?;
    debug!(destination_id = %destination_id, job_id = %job_id, "Sync job enqueued");
    Ok(job_id)
}

/// Reads the status of `job_id`
pub async fn job_status(
    client: &RedashClient,
    destination_id: DestinationId,
    job_id: &JobId,
) -> Result<SyncJob> {
    let body: JobEnvelope = client
        .get_json(
            &format!("/api/destination/{destination_id}/jobs/{job_id}"),
            &[],
        )
        .await?;
    let status = body
        .job
        .status
        .ok_or_else(|| ApiError::InvalidResponse(format!("job {job_id} has no status")))?;

    Ok(SyncJob {
        id: job_id.clone(),
        status,
        error: body.job.error,
        updated_at: body.job.updated_at,
    })
}
