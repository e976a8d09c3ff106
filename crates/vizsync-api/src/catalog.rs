//! Data-catalog endpoint
//!
//! `GET /api/data_catalog/{catalog_type}?dataset_id=...` proxies to the
//! configured catalog. An empty object means the server failed to reach it.

use anyhow::Result;
use tracing::debug;

use vizsync_core::domain::DatasetDetails;

use crate::client::RedashClient;
use crate::ApiError;

/// Fetches the catalog summary of `dataset_id`
pub async fn dataset_details(
    client: &RedashClient,
    catalog_type: &str,
    dataset_id: &str,
) -> Result<DatasetDetails> {
    let raw: serde_json::Value = client
        .get_json(
            &format!("/api/data_catalog/{catalog_type}"),
            &[("dataset_id", dataset_id)],
        )
        .await?;

    if raw.as_object().map_or(true, |obj| obj.is_empty()) {
        return Err(ApiError::InvalidResponse(format!(
            "catalog returned no data for dataset {dataset_id}"
        ))
        .into());
    }

    let details: DatasetDetails = serde_json::from_value(raw)
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
    if let Some(error) = details.catalog_error() {
        return Err(ApiError::NotFound(error.to_string()).into());
    }

    debug!(dataset_id, name = ?details.name, "Fetched dataset details");
    Ok(details)
}
