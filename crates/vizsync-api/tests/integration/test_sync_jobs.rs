//! Integration tests for manual sync jobs
//!
//! Drives the core poller against the mock server with a short interval.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use vizsync_core::domain::{DestinationError, DestinationId, JobId, JobStatus, QueryId};
use vizsync_core::ports::{IDestinationApi, NotificationKind};
use vizsync_core::usecases::{DestinationStore, PollPolicy, SyncJobPoller, ViewScope};

use crate::common;

fn fast_policy() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(10),
        max_attempts: 20,
        timeout: Duration::from_secs(5),
    }
}

async fn poller(
    api: vizsync_api::provider::RedashApi,
) -> (SyncJobPoller, Arc<common::CollectingNotifier>, Arc<DestinationStore>) {
    let api: Arc<dyn IDestinationApi> = Arc::new(api);
    let notifier = common::CollectingNotifier::shared();
    let store = Arc::new(DestinationStore::new(api.clone(), notifier.clone()));
    store
        .load(QueryId::new(12), &ViewScope::default())
        .await
        .unwrap();
    let poller = SyncJobPoller::new(api, notifier.clone(), store.clone(), fast_policy());
    (poller, notifier, store)
}

#[tokio::test]
async fn test_trigger_returns_job_id() {
    let (server, api) = common::setup_server_mock().await;
    common::mount_trigger(&server, 40, "a1b2").await;

    let job_id = api.trigger_sync(DestinationId::new(40)).await.unwrap();
    assert_eq!(job_id.as_str(), "a1b2");
}

#[tokio::test]
async fn test_job_status_fills_missing_id() {
    let (server, api) = common::setup_server_mock().await;
    Mock::given(method("GET"))
        .and(path("/api/destination/40/jobs/a1b2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "job": { "status": 4, "error": "Requested entity was not found." }
        })))
        .mount(&server)
        .await;

    let job_id = JobId::new("a1b2").unwrap();
    let job = api
        .job_status(DestinationId::new(40), &job_id)
        .await
        .unwrap();
    assert_eq!(job.id, job_id);
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error_text(), Some("Requested entity was not found."));
}

#[tokio::test]
async fn test_sync_polls_until_finished() {
    let (server, api) = common::setup_server_mock().await;
    common::mount_destination_list(&server, 12, vec![common::destination_json(40, 5, "Weekly")])
        .await;
    common::mount_trigger(&server, 40, "a1b2").await;
    common::mount_job_status(&server, 40, "a1b2", 1, "", 1).await;
    common::mount_job_status(&server, 40, "a1b2", 2, "", 1).await;
    common::mount_job_status(&server, 40, "a1b2", 3, "", 1).await;

    let (poller, notifier, store) = poller(api).await;
    let outcome = poller
        .trigger(DestinationId::new(40), &ViewScope::default())
        .await
        .unwrap();

    assert_eq!(outcome.re_polls, 2);
    assert_eq!(outcome.job.status, JobStatus::Succeeded);
    assert!(store.is_stale());
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Success);
}

#[tokio::test]
async fn test_sync_failure_reports_job_error() {
    let (server, api) = common::setup_server_mock().await;
    common::mount_destination_list(&server, 12, vec![]).await;
    common::mount_trigger(&server, 40, "a1b2").await;
    common::mount_job_status(&server, 40, "a1b2", 2, "", 1).await;
    common::mount_job_status(
        &server,
        40,
        "a1b2",
        4,
        "The caller does not have permission",
        1,
    )
    .await;

    let (poller, notifier, _) = poller(api).await;
    let err = poller
        .trigger(DestinationId::new(40), &ViewScope::default())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DestinationError::JobFailed {
            job_id: "a1b2".to_string(),
            message: "The caller does not have permission".to_string(),
        }
    );
    let sent = notifier.sent();
    assert_eq!(sent[0].message, "Failed to sync Destination");
    assert_eq!(sent[0].description, "The caller does not have permission");
}

#[tokio::test]
async fn test_rejected_trigger_is_fetch_error() {
    let (server, api) = common::setup_server_mock().await;
    common::mount_destination_list(&server, 12, vec![]).await;
    Mock::given(method("POST"))
        .and(path("/api/destination/40/sync"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "message": "Destination sync is disabled for this query."
        })))
        .mount(&server)
        .await;

    let (poller, notifier, _) = poller(api).await;
    let err = poller
        .trigger(DestinationId::new(40), &ViewScope::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DestinationError::Fetch(ref m) if m.contains("disabled")));
    assert_eq!(notifier.sent()[0].kind, NotificationKind::Error);
}
