//! Spreadsheet export of query results
//!
//! GETting a `.gsheets-export` results link makes the server copy the
//! result into a new spreadsheet and answer with its link.

use anyhow::Result;
use serde::Deserialize;
use tracing::info;

use crate::client::RedashClient;
use crate::ApiError;

#[derive(Debug, Deserialize)]
struct ExportResponse {
    #[serde(default)]
    sheet_link: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Requests the export and returns the new spreadsheet's link
pub async fn export_to_sheet(client: &RedashClient, link: &str) -> Result<String> {
    let response: ExportResponse = client.get_link_json(link).await?;
    sheet_link(response)
}

fn sheet_link(response: ExportResponse) -> Result<String> {
    if let Some(error) = response.error.filter(|e| !e.trim().is_empty()) {
        return Err(ApiError::BadRequest(error).into());
    }
    match response.sheet_link.filter(|l| !l.trim().is_empty()) {
        Some(link) => {
            info!(sheet_link = %link, "Exported results to spreadsheet");
            Ok(link)
        }
        None => Err(ApiError::InvalidResponse(
            "Unexpected response format. No sheet_link found.".to_string(),
        )
        .into()),
    }
}
