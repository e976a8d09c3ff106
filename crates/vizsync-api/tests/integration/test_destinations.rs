//! Integration tests for destination CRUD
//!
//! Verifies request shapes against the mock server and the create flow of
//! the core form controller running on the real adapter.

use std::sync::Arc;

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use vizsync_core::domain::{
    CellColumn, CellRow, DestinationDraft, DestinationError, DestinationId, DestinationKind,
    DraftOptions, QueryId, VisualizationId, VisualizationRef,
};
use vizsync_core::ports::{IDestinationApi, NotificationKind};
use vizsync_core::usecases::{DestinationFormController, DestinationStore, FormInput, ViewScope};

use crate::common;

fn draft(name: &str, row: u32) -> DestinationDraft {
    DestinationDraft {
        id: None,
        visualization_id: None,
        name: name.to_string(),
        kind: DestinationKind::Gsheets,
        options: DraftOptions {
            spreadsheet_id: "1AbC".to_string(),
            sheet_name: "Sheet1".to_string(),
            row: CellRow::new(row).unwrap(),
            column: CellColumn::new("B").unwrap(),
        },
    }
}

#[tokio::test]
async fn test_list_destinations() {
    let (server, api) = common::setup_server_mock().await;
    common::mount_destination_list(
        &server,
        12,
        vec![
            common::destination_json(1, 5, "Weekly"),
            common::destination_json(2, 6, "Daily"),
        ],
    )
    .await;

    let destinations = api.list_destinations(QueryId::new(12)).await.unwrap();
    assert_eq!(destinations.len(), 2);
    assert_eq!(destinations[1].name, "Daily");
    assert!(destinations[0].last_sync.as_ref().unwrap().is_ok());
}

#[tokio::test]
async fn test_list_failure_carries_status() {
    let (server, api) = common::setup_server_mock().await;
    Mock::given(method("GET"))
        .and(path("/api/queries/12/destinations"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = api.list_destinations(QueryId::new(12)).await.unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Server error: boom"), "{message}");
}

#[tokio::test]
async fn test_create_sends_integer_row() {
    let (server, api) = common::setup_server_mock().await;
    Mock::given(method("POST"))
        .and(path("/api/visualization/5/destination"))
        .and(body_json(serde_json::json!({
            "name": "Weekly",
            "type": "gsheets",
            "options": {
                "spreadsheet_id": "1AbC",
                "sheet_name": "Sheet1",
                "row": 3,
                "column": "B"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 200,
            "destination": common::destination_json(40, 5, "Weekly")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = api
        .create_destination(VisualizationId::new(5), &draft("Weekly", 3))
        .await
        .unwrap();
    assert_eq!(created.id, DestinationId::new(40));
}

#[tokio::test]
async fn test_update_and_delete_paths() {
    let (server, api) = common::setup_server_mock().await;
    Mock::given(method("POST"))
        .and(path("/api/visualization/5/destination/40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 200,
            "destination": common::destination_json(40, 5, "Renamed")
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/visualization/5/destination/40"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut renamed = draft("Renamed", 1);
    renamed.id = Some(DestinationId::new(40));
    renamed.visualization_id = Some(VisualizationId::new(5));

    let updated = api
        .update_destination(VisualizationId::new(5), DestinationId::new(40), &renamed)
        .await
        .unwrap();
    assert_eq!(updated.name, "Renamed");

    api.delete_destination(VisualizationId::new(5), DestinationId::new(40))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_query_visualizations() {
    let (server, api) = common::setup_server_mock().await;
    Mock::given(method("GET"))
        .and(path("/api/queries/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 12,
            "name": "Revenue",
            "visualizations": [
                { "id": 5, "name": "Table", "type": "TABLE", "options": {} },
                { "id": 6, "name": "Chart", "type": "CHART", "options": {} }
            ]
        })))
        .mount(&server)
        .await;

    let visualizations = api.query_visualizations(QueryId::new(12)).await.unwrap();
    assert_eq!(visualizations.len(), 2);
    assert!(visualizations[0].is_tabular());
    assert!(!visualizations[1].is_tabular());
}

#[tokio::test]
async fn test_query_flags_default_to_disabled() {
    let (server, api) = common::setup_server_mock().await;
    Mock::given(method("GET"))
        .and(path("/api/queries/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 12,
            "can_edit": true,
            "visualizations": []
        })))
        .mount(&server)
        .await;

    let flags = api.query_flags(QueryId::new(12)).await.unwrap();
    assert!(flags.can_edit);
    assert!(!flags.is_destination_sync_enabled);
}

#[tokio::test]
async fn test_current_user_admin_from_permissions() {
    let (server, api) = common::setup_server_mock().await;
    Mock::given(method("GET"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": {
                "id": 1,
                "name": "Ada",
                "permissions": ["admin", "create_query", "edit_query"]
            },
            "org_slug": "default"
        })))
        .mount(&server)
        .await;

    let user = api.current_user().await.unwrap();
    assert!(user.is_admin);
    assert!(user.has_permission("edit_query"));
}

#[tokio::test]
async fn test_current_user_without_admin_permission() {
    let (server, api) = common::setup_server_mock().await;
    Mock::given(method("GET"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": { "id": 2, "permissions": ["view_query"] }
        })))
        .mount(&server)
        .await;

    assert!(!api.current_user().await.unwrap().is_admin);
}

#[tokio::test]
async fn test_racing_duplicate_create_loses_with_server_message() {
    let (server, api_a) = common::setup_server_mock().await;
    let api_b = common::api_for(&server);
    common::mount_destination_list(&server, 12, vec![]).await;

    Mock::given(method("POST"))
        .and(path("/api/visualization/5/destination"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": 200,
            "destination": common::destination_json(41, 5, "Sheet A")
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/visualization/5/destination"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": "Visualization Destination with the name Sheet A already exists."
        })))
        .mount(&server)
        .await;

    let table = VisualizationRef::new(VisualizationId::new(5), "Table", "TABLE");
    let input = FormInput {
        name: "Sheet A".to_string(),
        spreadsheet_id: "1AbC".to_string(),
        sheet_name: "Sheet1".to_string(),
        row: "1".to_string(),
        column: "A".to_string(),
    };

    // Both clients load an empty list, so both pass the local name check
    let mut forms = Vec::new();
    let mut notifiers = Vec::new();
    for api in [api_a, api_b] {
        let api: Arc<dyn IDestinationApi> = Arc::new(api);
        let notifier = common::CollectingNotifier::shared();
        let store = Arc::new(DestinationStore::new(api.clone(), notifier.clone()));
        store
            .load(QueryId::new(12), &ViewScope::default())
            .await
            .unwrap();
        let form = DestinationFormController::new(api, notifier.clone(), store);
        form.open_create(&table).unwrap();
        form.set_input(input.clone());
        forms.push(form);
        notifiers.push(notifier);
    }

    let winner = forms[0].submit().await.unwrap();
    assert_eq!(winner.id, DestinationId::new(41));

    let loser = forms[1].submit().await.unwrap_err();
    match loser {
        DestinationError::Fetch(message) => assert!(
            message.contains("Visualization Destination with the name Sheet A already exists."),
            "{message}"
        ),
        other => panic!("expected Fetch, got {other:?}"),
    }
    assert_eq!(notifiers[1].sent()[0].kind, NotificationKind::Error);
    assert_eq!(forms[1].input(), input);
}

#[tokio::test]
async fn test_throttled_request_is_retried() {
    let (server, api) = common::setup_server_mock().await;
    Mock::given(method("GET"))
        .and(path("/api/queries/12/destinations"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    common::mount_destination_list(&server, 12, vec![common::destination_json(1, 5, "Weekly")])
        .await;

    let destinations = api.list_destinations(QueryId::new(12)).await.unwrap();
    assert_eq!(destinations.len(), 1);
}
