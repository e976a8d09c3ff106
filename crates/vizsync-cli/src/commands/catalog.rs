//! Catalog command - Show data-catalog metadata for a dataset

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use tracing::info;

use vizsync_core::domain::{dataset_id_from_catalog_url, DatasetDetails};
use vizsync_core::ports::IDataCatalog;

use crate::context::AppContext;

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// Show the catalog summary of a dataset
    Show {
        /// Dataset identifier, e.g. `urn:li:dataset:orders`
        #[arg(required_unless_present = "url", conflicts_with = "url")]
        dataset: Option<String>,
        /// Catalog page URL of the dataset instead of its identifier
        #[arg(long)]
        url: Option<String>,
        /// Catalog to ask, overrides `catalog.catalog_type`
        #[arg(long)]
        catalog_type: Option<String>,
    },
}

impl CatalogCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            CatalogCommand::Show {
                dataset,
                url,
                catalog_type,
            } => {
                let dataset_id = resolve_dataset_id(dataset.as_deref(), url.as_deref())?;
                let catalog_type = catalog_type
                    .clone()
                    .unwrap_or_else(|| ctx.config.catalog.catalog_type.clone());
                self.execute_show(ctx, &catalog_type, &dataset_id).await
            }
        }
    }

    async fn execute_show(
        &self,
        ctx: &AppContext,
        catalog_type: &str,
        dataset_id: &str,
    ) -> Result<()> {
        let formatter = ctx.formatter();
        let api = ctx.api()?;

        info!(catalog_type, dataset_id, "Looking up dataset");
        let details = api
            .dataset_details(catalog_type, dataset_id)
            .await
            .with_context(|| format!("Failed to load catalog details for {dataset_id}"))?;

        if ctx.is_json() {
            let json = serde_json::to_value(&details)
                .context("Failed to serialize dataset details to JSON")?;
            formatter.print_json(&json);
            return Ok(());
        }

        for line in describe(&details, dataset_id) {
            formatter.info(&line);
        }
        Ok(())
    }
}

fn resolve_dataset_id(dataset: Option<&str>, url: Option<&str>) -> Result<String> {
    if let Some(dataset) = dataset.map(str::trim).filter(|d| !d.is_empty()) {
        return Ok(dataset.to_string());
    }
    if let Some(url) = url {
        return match dataset_id_from_catalog_url(url) {
            Some(id) => Ok(id.to_string()),
            None => bail!("No dataset id found in catalog URL: {url}"),
        };
    }
    bail!("Pass a dataset id or --url")
}

/// Human-readable summary lines
fn describe(details: &DatasetDetails, dataset_id: &str) -> Vec<String> {
    let mut lines = vec![format!(
        "Dataset:      {}",
        details.name.as_deref().unwrap_or(dataset_id)
    )];

    if !details.description.is_empty() {
        lines.push(format!("Description:  {}", details.description));
    }
    if !details.owners.is_empty() {
        lines.push(format!("Owners:       {}", details.owners.join(", ")));
    }
    if let Some(refreshed) = details.last_refreshed_at() {
        lines.push(format!(
            "Last refresh: {}",
            refreshed.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
    let partitions = details.partition_key_list();
    if !partitions.is_empty() {
        lines.push(format!("Partitions:   {}", partitions.join(", ")));
    }
    if !details.properties.is_empty() {
        lines.push("Properties:".to_string());
        for (key, value) in &details.properties {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            lines.push(format!("  {key}: {value}"));
        }
    }
    if !details.docs.is_empty() {
        lines.push("Docs:".to_string());
        for doc in &details.docs {
            if doc.description.is_empty() {
                lines.push(format!("  {}", doc.url));
            } else {
                lines.push(format!("  {} ({})", doc.description, doc.url));
            }
        }
    }
    if let Some(catalog) = &details.catalog {
        lines.push(format!("Catalog page: {catalog}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_id_from_url() {
        let id = resolve_dataset_id(
            None,
            Some("https://catalog.example/dataset/urn:li:dataset:orders/Schema"),
        )
        .unwrap();
        assert_eq!(id, "urn:li:dataset:orders");
    }

    #[test]
    fn test_explicit_dataset_wins() {
        assert_eq!(resolve_dataset_id(Some(" orders "), None).unwrap(), "orders");
        assert!(resolve_dataset_id(None, Some("https://catalog.example")).is_err());
        assert!(resolve_dataset_id(None, None).is_err());
    }

    #[test]
    fn test_describe_skips_missing_fields() {
        let details = DatasetDetails {
            name: Some("orders".to_string()),
            partition_keys: "ds, region".to_string(),
            ..Default::default()
        };
        let lines = describe(&details, "urn:li:dataset:orders");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("orders"));
        assert!(lines[1].ends_with("ds, region"));
    }
}
