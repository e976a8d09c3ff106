//! Export command - Download links and spreadsheet export of query results

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use vizsync_core::domain::{results_link, Embed, ExportFormat, ExportSource, QueryId};
use vizsync_core::ports::IResultExporter;

use crate::context::AppContext;

#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// Print the download link of a query result
    Link {
        /// Saved query identifier; omit for an ad-hoc result
        #[arg(long)]
        query: Option<u64>,
        /// Query name
        #[arg(long)]
        name: String,
        /// Result set identifier
        #[arg(long)]
        result: u64,
        /// csv, tsv or xlsx
        #[arg(long, default_value = "csv", value_parser = parse_format)]
        format: ExportFormat,
        /// Build an embeddable link authenticated by this API key
        #[arg(long)]
        embed_key: Option<String>,
    },
    /// Copy a query result into a new spreadsheet
    Sheet {
        /// Saved query identifier
        #[arg(long)]
        query: u64,
        /// Query name
        #[arg(long)]
        name: String,
        /// Result set identifier
        #[arg(long)]
        result: u64,
    },
}

fn parse_format(value: &str) -> Result<ExportFormat, String> {
    value.parse::<ExportFormat>().map_err(|e| e.to_string())
}

impl ExportCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            ExportCommand::Link {
                query,
                name,
                result,
                format,
                embed_key,
            } => {
                let source = source(*query, name, *result);
                let embed = embed_key.as_ref().map(|api_key| Embed {
                    api_key: api_key.clone(),
                });
                self.execute_link(ctx, &source, *format, embed.as_ref())
            }
            ExportCommand::Sheet {
                query,
                name,
                result,
            } => {
                let source = source(Some(*query), name, *result);
                self.execute_sheet(ctx, &source).await
            }
        }
    }

    fn execute_link(
        &self,
        ctx: &AppContext,
        source: &ExportSource,
        format: ExportFormat,
        embed: Option<&Embed>,
    ) -> Result<()> {
        let formatter = ctx.formatter();
        let link = build_link(source, format, embed)?;
        let url = ctx.client()?.absolute_url(&link)?;

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "format": format,
                "link": link,
                "url": url.as_str(),
            }));
        } else {
            println!("{url}");
        }
        Ok(())
    }

    async fn execute_sheet(&self, ctx: &AppContext, source: &ExportSource) -> Result<()> {
        let formatter = ctx.formatter();
        let link = build_link(source, ExportFormat::GsheetsExport, None)?;
        let api = ctx.api()?;

        info!(link = %link, "Exporting result to a new spreadsheet");
        let sheet = api
            .export_to_sheet(&link)
            .await
            .context("Failed to export to a spreadsheet")?;

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({ "sheet_link": sheet }));
        } else {
            formatter.success("Exported to a new spreadsheet");
            formatter.info(&sheet);
        }
        Ok(())
    }
}

/// A result passed on the command line is assumed to hold data
fn source(query: Option<u64>, name: &str, result: u64) -> ExportSource {
    ExportSource {
        query_id: query.map(QueryId::new),
        query_name: name.to_string(),
        result_id: Some(result),
        has_data: true,
    }
}

fn build_link(source: &ExportSource, format: ExportFormat, embed: Option<&Embed>) -> Result<String> {
    let salt = chrono::Utc::now().timestamp_millis();
    results_link(source, format, embed, salt).context("Nothing to export: the query needs a name")
}
