//! Data catalog and result export port (driven/secondary port)
//!
//! Read-only lookups that sit next to destination management: dataset
//! metadata from the data catalog, and the server-side spreadsheet export
//! of a query result.

use crate::domain::DatasetDetails;

/// Port trait for data-catalog lookups
#[async_trait::async_trait]
pub trait IDataCatalog: Send + Sync {
    /// Fetches the summary of `dataset_id` from the catalog named `catalog_type`
    async fn dataset_details(
        &self,
        catalog_type: &str,
        dataset_id: &str,
    ) -> anyhow::Result<DatasetDetails>;
}

/// Port trait for exporting a result set into a new spreadsheet
#[async_trait::async_trait]
pub trait IResultExporter: Send + Sync {
    /// Requests a `gsheets-export` link and returns the created sheet's URL
    async fn export_to_sheet(&self, link: &str) -> anyhow::Result<String>;
}
