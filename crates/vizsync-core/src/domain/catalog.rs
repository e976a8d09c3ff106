//! Data-catalog dataset metadata
//!
//! The backend proxies dataset lookups to an external catalog and returns a
//! flattened summary. When the dataset is unknown to the catalog the summary
//! carries an `error` message instead of details.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Link to related documentation for a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocLink {
    pub url: String,
    #[serde(default)]
    pub description: String,
}

/// Dataset summary as returned by `GET /api/data_catalog/{catalog}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owners: Vec<String>,
    /// Last schema modification, epoch milliseconds
    #[serde(default)]
    pub last_refresh: Option<i64>,
    /// Comma-separated partition key names
    #[serde(default)]
    pub partition_keys: String,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub docs: Vec<DocLink>,
    /// Link to the dataset page in the catalog UI
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub error: String,
}

impl DatasetDetails {
    /// Catalog-side error that replaces the details, if any
    pub fn catalog_error(&self) -> Option<&str> {
        Some(self.error.as_str()).filter(|e| !e.trim().is_empty())
    }

    pub fn last_refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    /// Partition keys split into a list
    pub fn partition_key_list(&self) -> Vec<&str> {
        self.partition_keys
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect()
    }
}

/// Extracts the dataset id from a catalog dataset URL.
///
/// Catalog links look like `https://catalog.example/dataset/<urn>/Schema`;
/// the dataset id is the fifth `/`-separated segment.
pub fn dataset_id_from_catalog_url(url: &str) -> Option<&str> {
    url.split('/').nth(4).filter(|segment| !segment.is_empty())
}
