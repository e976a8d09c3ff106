//! Shared test helpers for server API integration tests
//!
//! Provides wiremock-based mock server setup. Each helper mounts the
//! endpoints a test needs and returns a client pointing at the mock server.

use std::sync::{Arc, Mutex};

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vizsync_api::client::RedashClient;
use vizsync_api::provider::RedashApi;
use vizsync_core::ports::{INotificationService, Notification};

pub const API_KEY: &str = "test-api-key";

/// Starts a mock server and returns a (MockServer, RedashApi) tuple
pub async fn setup_server_mock() -> (MockServer, RedashApi) {
    let server = MockServer::start().await;
    let api = api_for(&server);
    (server, api)
}

/// Builds a second client against the same server
pub fn api_for(server: &MockServer) -> RedashApi {
    RedashApi::new(RedashClient::new(server.uri()).with_api_key(API_KEY))
}

pub fn destination_json(id: u64, visualization_id: u64, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "visualization_id": visualization_id,
        "name": name,
        "type": "gsheets",
        "options": {
            "spreadsheet_id": "1AbC",
            "sheet_name": "Sheet1",
            "row": 1,
            "column": "A"
        },
        "last_sync": {
            "status": "finished",
            "timestamp": "2026-03-02T10:00:00",
            "error": null
        }
    })
}

/// Mounts `GET /api/queries/{id}/destinations`
pub async fn mount_destination_list(
    server: &MockServer,
    query_id: u64,
    destinations: Vec<serde_json::Value>,
) {
    Mock::given(method("GET"))
        .and(path(format!("/api/queries/{query_id}/destinations")))
        .and(header("authorization", format!("Key {API_KEY}").as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "destinations": destinations })),
        )
        .mount(server)
        .await;
}

/// Mounts `POST /api/destination/{id}/sync` answering with `job_id`
pub async fn mount_trigger(server: &MockServer, destination_id: u64, job_id: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/api/destination/{destination_id}/sync")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "job": { "id": job_id, "updated_at": 0, "status": 1, "error": "" }
        })))
        .mount(server)
        .await;
}

/// Mounts one job status answer that is served `times` times
pub async fn mount_job_status(
    server: &MockServer,
    destination_id: u64,
    job_id: &str,
    status: u8,
    error: &str,
    times: u64,
) {
    Mock::given(method("GET"))
        .and(path(format!("/api/destination/{destination_id}/jobs/{job_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "job": { "id": job_id, "updated_at": 0, "status": status, "error": error }
        })))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

/// Notifier that keeps everything it is asked to show
#[derive(Default)]
pub struct CollectingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl CollectingNotifier {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl INotificationService for CollectingNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}
