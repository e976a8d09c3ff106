//! Spreadsheet destination entities
//!
//! A destination pushes the tabular result of one visualization into a
//! spreadsheet, starting at a configured cell. Two shapes exist:
//!
//! - [`Destination`] is the read model returned by the backend. It is
//!   deliberately lenient so that legacy rows never break a listing.
//! - [`DestinationDraft`] is the write model built from a validated form.
//!   Its row and column are checked newtypes.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::{CellColumn, CellRow, DestinationId, VisualizationId};

/// Sync status string the backend uses for a successful last run
const LAST_SYNC_OK: &str = "finished";

/// Kind of destination. Only spreadsheet export exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DestinationKind {
    #[default]
    #[serde(rename = "gsheets")]
    Gsheets,
}

impl std::fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DestinationKind::Gsheets => write!(f, "gsheets"),
        }
    }
}

/// Destination options as stored by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DestinationOptions {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default)]
    pub sheet_name: String,
    #[serde(default)]
    pub row: u32,
    #[serde(default)]
    pub column: String,
    /// Row count written by the previous sync, used server-side to blank stale cells
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_rows: Option<i64>,
    /// Column count written by the previous sync
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_columns: Option<i64>,
}

impl DestinationOptions {
    /// Spreadsheet anchor cell, e.g. `B3`
    pub fn anchor_cell(&self) -> String {
        format!("{}{}", self.column, self.row)
    }
}

/// Outcome of the most recent sync run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastSync {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl LastSync {
    /// Whether the last run finished cleanly
    pub fn is_ok(&self) -> bool {
        self.status == LAST_SYNC_OK
    }

    /// Non-empty error text of the last run
    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.trim().is_empty())
    }

    /// Parses the backend timestamp (RFC 3339, or naive ISO 8601 taken as UTC)
    pub fn synced_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// A configured spreadsheet destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub visualization_id: VisualizationId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: DestinationKind,
    #[serde(default)]
    pub options: DestinationOptions,
    #[serde(default)]
    pub last_sync: Option<LastSync>,
}

impl Destination {
    /// Seeds an edit draft from this destination.
    ///
    /// Fails when the stored row/column no longer pass validation; the
    /// caller then asks the user to correct them.
    pub fn to_draft(&self) -> Result<DestinationDraft, DomainError> {
        Ok(DestinationDraft {
            id: Some(self.id),
            visualization_id: Some(self.visualization_id),
            name: self.name.clone(),
            kind: self.kind,
            options: DraftOptions {
                spreadsheet_id: self.options.spreadsheet_id.clone(),
                sheet_name: self.options.sheet_name.clone(),
                row: CellRow::new(self.options.row)?,
                column: CellColumn::new(self.options.column.clone())?,
            },
        })
    }
}

/// Validated options sent on create/update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOptions {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub row: CellRow,
    pub column: CellColumn,
}

/// Request body for creating or updating a destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DestinationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization_id: Option<VisualizationId>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DestinationKind,
    pub options: DraftOptions,
}
