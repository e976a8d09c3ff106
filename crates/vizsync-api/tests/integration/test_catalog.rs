//! Integration tests for the data catalog and spreadsheet export

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use vizsync_core::ports::{IDataCatalog, IResultExporter};

use crate::common;

#[tokio::test]
async fn test_dataset_details() {
    let (server, api) = common::setup_server_mock().await;
    Mock::given(method("GET"))
        .and(path("/api/data_catalog/datahub"))
        .and(query_param("dataset_id", "urn:li:dataset:orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "orders",
            "description": "One row per order",
            "owners": ["data-eng"],
            "lastRefresh": 1700000000000_i64,
            "partitionKeys": "ds, region",
            "properties": { "format": "parquet" },
            "docs": [{ "url": "https://wiki/orders", "description": "Runbook" }],
            "catalog": "https://catalog.example/dataset/urn:li:dataset:orders/Schema"
        })))
        .mount(&server)
        .await;

    let details = api
        .dataset_details("datahub", "urn:li:dataset:orders")
        .await
        .unwrap();
    assert_eq!(details.name.as_deref(), Some("orders"));
    assert_eq!(details.partition_key_list(), vec!["ds", "region"]);
    assert!(details.last_refreshed_at().is_some());
    assert_eq!(details.docs.len(), 1);
}

#[tokio::test]
async fn test_empty_catalog_answer_is_an_error() {
    let (server, api) = common::setup_server_mock().await;
    Mock::given(method("GET"))
        .and(path("/api/data_catalog/datahub"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let err = api.dataset_details("datahub", "missing").await.unwrap_err();
    assert!(format!("{err:#}").contains("catalog returned no data"));
}

#[tokio::test]
async fn test_catalog_error_field_is_surfaced() {
    let (server, api) = common::setup_server_mock().await;
    Mock::given(method("GET"))
        .and(path("/api/data_catalog/datahub"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": "Dataset not found in catalog"
        })))
        .mount(&server)
        .await;

    let err = api.dataset_details("datahub", "x").await.unwrap_err();
    assert_eq!(err.to_string(), "Not found: Dataset not found in catalog");
}

#[tokio::test]
async fn test_export_to_sheet_follows_relative_link() {
    let (server, api) = common::setup_server_mock().await;
    Mock::given(method("GET"))
        .and(path("/api/queries/3/results/9.gsheets-export"))
        .and(header("authorization", format!("Key {}", common::API_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sheet_link": "https://docs.google.com/spreadsheets/d/xyz"
        })))
        .mount(&server)
        .await;

    let link = api
        .export_to_sheet("api/queries/3/results/9.gsheets-export")
        .await
        .unwrap();
    assert_eq!(link, "https://docs.google.com/spreadsheets/d/xyz");
}

#[tokio::test]
async fn test_export_without_sheet_link() {
    let (server, api) = common::setup_server_mock().await;
    Mock::given(method("GET"))
        .and(path("/api/queries/3/results/9.gsheets-export"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let err = api
        .export_to_sheet("api/queries/3/results/9.gsheets-export")
        .await
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("Unexpected response format. No sheet_link found."));
}
