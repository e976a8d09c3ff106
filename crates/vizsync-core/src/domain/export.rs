//! Query result export links
//!
//! Results of a query execution can be downloaded in several formats or
//! pushed into a fresh spreadsheet. The links are relative to the server's
//! base URL and carry a millisecond salt so that browsers and proxies never
//! serve a cached file.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::QueryId;

/// Download format for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    #[serde(rename = "csv")]
    Csv,
    #[serde(rename = "tsv")]
    Tsv,
    #[serde(rename = "xlsx")]
    Xlsx,
    /// Server creates a new spreadsheet and answers with its link
    #[serde(rename = "gsheets-export")]
    GsheetsExport,
}

impl ExportFormat {
    /// File extension used in the results path
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::GsheetsExport => "gsheets-export",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "gsheets-export" | "gsheets" => Ok(ExportFormat::GsheetsExport),
            other => Err(DomainError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// What the caller knows about the query whose results are exported
#[derive(Debug, Clone, Default)]
pub struct ExportSource {
    /// `None` for an unsaved (ad-hoc) query
    pub query_id: Option<QueryId>,
    pub query_name: String,
    /// Identifier of the result set; `None` until the query ran
    pub result_id: Option<u64>,
    /// Whether the result has data loaded
    pub has_data: bool,
}

/// Embedding parameters; embedded views authenticate through an API key
#[derive(Debug, Clone, Default)]
pub struct Embed {
    pub api_key: String,
}

/// Builds the relative results link for `format`.
///
/// Returns `None` when there is nothing to export yet (no result, no data,
/// or an unnamed query). `salt` is a millisecond timestamp.
pub fn results_link(
    source: &ExportSource,
    format: ExportFormat,
    embed: Option<&Embed>,
    salt: i64,
) -> Option<String> {
    let result_id = source.result_id?;
    if !source.has_data || source.query_name.is_empty() {
        return None;
    }

    let ext = format.extension();
    let link = match source.query_id {
        Some(query_id) => {
            let base = format!("api/queries/{query_id}/results/{result_id}.{ext}");
            match embed {
                Some(embed) => format!("{base}?api_key={}&{salt}", embed.api_key),
                None => base,
            }
        }
        None => format!("api/query_results/{result_id}.{ext}?{salt}"),
    };

    Some(link)
}
