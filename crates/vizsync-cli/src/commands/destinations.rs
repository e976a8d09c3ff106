//! Destinations command - Manage spreadsheet destinations of a query
//!
//! Every subcommand opens one destination view for the query, loads its
//! destinations and then runs a single flow of the view: create, edit,
//! delete or a manual sync. Outcomes are reported through notifications.
//! Creating needs an admin user and syncing needs sync enabled on the query.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use tracing::info;

use vizsync_core::domain::{
    Destination, DestinationError, DestinationId, QueryId, VisualizationId, VisualizationRef,
};
use vizsync_core::usecases::{DeleteOutcome, DestinationSession, FormInput};

use crate::context::AppContext;
use crate::output::OutputFormatter;

#[derive(Debug, Subcommand)]
pub enum DestinationsCommand {
    /// List the destinations of a query
    List {
        /// Query identifier
        #[arg(long)]
        query: u64,
    },
    /// Create a destination for a table visualization (admins only)
    Create {
        /// Query identifier
        #[arg(long)]
        query: u64,
        /// Visualization to export; defaults to the only table of the query
        #[arg(long)]
        visualization: Option<u64>,
        /// Destination name, unique per query
        #[arg(long)]
        name: String,
        /// Target spreadsheet identifier
        #[arg(long)]
        spreadsheet_id: String,
        /// Target sheet (tab) name
        #[arg(long)]
        sheet_name: String,
        /// Anchor row, 1-based
        #[arg(long, default_value = "1")]
        row: String,
        /// Anchor column letters
        #[arg(long, default_value = "A")]
        column: String,
    },
    /// Edit an existing destination
    Update {
        /// Query identifier
        #[arg(long)]
        query: u64,
        /// Destination identifier
        destination: u64,
        #[command(flatten)]
        fields: UpdateFields,
    },
    /// Delete a destination
    Delete {
        /// Query identifier
        #[arg(long)]
        query: u64,
        /// Destination identifier
        destination: u64,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Push the current query result into a destination now; the query must have sync enabled
    Sync {
        /// Query identifier
        #[arg(long)]
        query: u64,
        /// Destination identifier
        destination: u64,
    },
}

/// Fields to change on update; omitted ones keep their stored value
#[derive(Debug, Default, Args)]
pub struct UpdateFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    spreadsheet_id: Option<String>,
    #[arg(long)]
    sheet_name: Option<String>,
    #[arg(long)]
    row: Option<String>,
    #[arg(long)]
    column: Option<String>,
}

impl UpdateFields {
    fn apply(&self, mut input: FormInput) -> FormInput {
        if let Some(name) = &self.name {
            input.name = name.clone();
        }
        if let Some(spreadsheet_id) = &self.spreadsheet_id {
            input.spreadsheet_id = spreadsheet_id.clone();
        }
        if let Some(sheet_name) = &self.sheet_name {
            input.sheet_name = sheet_name.clone();
        }
        if let Some(row) = &self.row {
            input.row = row.clone();
        }
        if let Some(column) = &self.column {
            input.column = column.clone();
        }
        input
    }
}

impl DestinationsCommand {
    pub async fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            DestinationsCommand::List { query } => self.execute_list(ctx, *query).await,
            DestinationsCommand::Create {
                query,
                visualization,
                name,
                spreadsheet_id,
                sheet_name,
                row,
                column,
            } => {
                let input = FormInput {
                    name: name.clone(),
                    spreadsheet_id: spreadsheet_id.clone(),
                    sheet_name: sheet_name.clone(),
                    row: row.clone(),
                    column: column.clone(),
                };
                self.execute_create(ctx, *query, *visualization, input)
                    .await
            }
            DestinationsCommand::Update {
                query,
                destination,
                fields,
            } => {
                self.execute_update(ctx, *query, *destination, fields)
                    .await
            }
            DestinationsCommand::Delete {
                query,
                destination,
                yes,
            } => {
                self.execute_delete(ctx, *query, *destination, *yes)
                    .await
            }
            DestinationsCommand::Sync { query, destination } => {
                self.execute_sync(ctx, *query, *destination).await
            }
        }
    }

    async fn execute_list(&self, ctx: &AppContext, query: u64) -> Result<()> {
        let formatter = ctx.formatter();
        let session = open(ctx, query, false).await?;
        let destinations = session.store().destinations();

        info!(query_id = query, count = destinations.len(), "Listed destinations");

        if ctx.is_json() {
            let json = serde_json::to_value(&destinations)
                .context("Failed to serialize destinations to JSON")?;
            formatter.print_json(&json);
            return Ok(());
        }

        if destinations.is_empty() {
            formatter.info(&format!("No destinations for query {query}"));
            return Ok(());
        }

        formatter.success(&format!(
            "{} destination{} for query {query}",
            destinations.len(),
            if destinations.len() == 1 { "" } else { "s" }
        ));
        for destination in &destinations {
            formatter.info("");
            print_destination(formatter.as_ref(), destination);
        }
        Ok(())
    }

    async fn execute_create(
        &self,
        ctx: &AppContext,
        query: u64,
        visualization: Option<u64>,
        input: FormInput,
    ) -> Result<()> {
        let session = open(ctx, query, false).await?;
        session.ensure_can_create().await?;
        // Not notified by the view, so reported as a plain error
        let tables = session
            .selectable_visualizations()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to load visualizations: {e}"))?;
        let visualization = pick_visualization(&tables, visualization.map(VisualizationId::new))?;

        session.form().open_create(&visualization)?;
        session.form().set_input(input);
        let created = session.form().submit().await?;

        self.report_saved(ctx, &created)
    }

    async fn execute_update(
        &self,
        ctx: &AppContext,
        query: u64,
        destination: u64,
        fields: &UpdateFields,
    ) -> Result<()> {
        let session = open(ctx, query, false).await?;
        let existing = find(&session, destination)?;

        session.form().open_edit(&existing);
        session
            .form()
            .set_input(fields.apply(session.form().input()));
        let updated = session.form().submit().await?;

        self.report_saved(ctx, &updated)
    }

    async fn execute_delete(
        &self,
        ctx: &AppContext,
        query: u64,
        destination: u64,
        yes: bool,
    ) -> Result<()> {
        let formatter = ctx.formatter();
        let session = open(ctx, query, yes).await?;
        let existing = find(&session, destination)?;

        let outcome = session
            .deletion()
            .request_delete(existing.visualization_id, existing.id)
            .await?;

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "destination_id": existing.id,
                "deleted": outcome == DeleteOutcome::Deleted,
            }));
        } else if outcome == DeleteOutcome::Declined {
            formatter.info("Nothing deleted");
        }
        Ok(())
    }

    async fn execute_sync(&self, ctx: &AppContext, query: u64, destination: u64) -> Result<()> {
        let formatter = ctx.formatter();
        let session = open(ctx, query, false).await?;
        let existing = find(&session, destination)?;
        session.ensure_sync_enabled().await?;

        if !ctx.is_json() && !ctx.quiet {
            formatter.info(&format!(
                "Syncing '{}' (polling every {} ms, Ctrl-C to stop waiting)",
                existing.name,
                session.poller().policy().interval.as_millis()
            ));
        }

        let sync = session.poller().trigger(existing.id, session.scope());
        tokio::pin!(sync);
        let result = tokio::select! {
            result = &mut sync => result,
            Ok(()) = tokio::signal::ctrl_c() => {
                session.close();
                sync.await
            }
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(DestinationError::Cancelled) => {
                formatter.warn("Stopped waiting; the job keeps running on the server");
                return Err(DestinationError::Cancelled.into());
            }
            Err(e) => return Err(e.into()),
        };

        let refreshed = session.refresh().await?;
        let synced = refreshed.iter().find(|d| d.id == existing.id);

        if ctx.is_json() {
            formatter.print_json(&serde_json::json!({
                "destination_id": existing.id,
                "job": outcome.job,
                "status_checks": outcome.status_checks,
                "destination": synced,
            }));
        } else if let Some(synced) = synced {
            print_destination(formatter.as_ref(), synced);
        }
        Ok(())
    }

    fn report_saved(&self, ctx: &AppContext, destination: &Destination) -> Result<()> {
        let formatter = ctx.formatter();
        if ctx.is_json() {
            let json = serde_json::to_value(destination)
                .context("Failed to serialize destination to JSON")?;
            formatter.print_json(&json);
        } else if !ctx.quiet {
            print_destination(formatter.as_ref(), destination);
        }
        Ok(())
    }
}

/// Opens the view and loads the destination list
async fn open(ctx: &AppContext, query: u64, assume_yes: bool) -> Result<DestinationSession> {
    let session = ctx.session(QueryId::new(query), assume_yes)?;
    session.load().await?;
    Ok(session)
}

fn find(session: &DestinationSession, destination: u64) -> Result<Destination> {
    match session.store().find(DestinationId::new(destination)) {
        Some(found) => Ok(found),
        None => bail!(
            "Destination {destination} not found for query {}",
            session.query_id()
        ),
    }
}

/// Resolves the target table; without an explicit id the query must have exactly one
fn pick_visualization(
    tables: &[VisualizationRef],
    requested: Option<VisualizationId>,
) -> Result<VisualizationRef> {
    if let Some(id) = requested {
        return match tables.iter().find(|v| v.id == id) {
            Some(found) => Ok(found.clone()),
            None => bail!("Visualization {id} is not a table of this query"),
        };
    }

    match tables {
        [] => bail!("The query has no table visualization to export"),
        [only] => Ok(only.clone()),
        _ => {
            let choices: Vec<String> = tables
                .iter()
                .map(|v| format!("{} ({})", v.id, v.name))
                .collect();
            bail!(
                "The query has several tables, pick one with --visualization: {}",
                choices.join(", ")
            )
        }
    }
}

fn print_destination(formatter: &dyn OutputFormatter, destination: &Destination) {
    formatter.info(&format!("#{} {}", destination.id, destination.name));
    formatter.info(&format!(
        "  Target:        {}!{} in spreadsheet {}",
        destination.options.sheet_name,
        destination.options.anchor_cell(),
        destination.options.spreadsheet_id
    ));
    formatter.info(&format!(
        "  Visualization: {}",
        destination.visualization_id
    ));

    let Some(last_sync) = &destination.last_sync else {
        formatter.info("  Last sync:     never");
        return;
    };
    let when = last_sync
        .synced_at()
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown time".to_string());
    formatter.info(&format!("  Last sync:     {} ({when})", last_sync.status));
    if let Some(error) = last_sync.error_text() {
        formatter.info(&format!("  Last error:    {error}"));
    }
}
