//! Create and edit flows for destinations
//!
//! The form is either closed, creating a destination for a chosen table
//! visualization, or editing an existing destination. Opening one mode
//! replaces the other. Raw user input is kept as typed so that a failed
//! submit can be retried without re-entering anything; it is parsed into a
//! [`DestinationDraft`] only on submit.
//!
//! Duplicate names are checked against the cached list before creating.
//! The check is advisory: the backend stays the authority and rejects a
//! duplicate that slipped through (for example two clients racing).

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::domain::{
    CellColumn, CellRow, Destination, DestinationDraft, DestinationError, DestinationId,
    DestinationKind, DomainError, DraftOptions, VisualizationId, VisualizationRef,
};
use crate::ports::{IDestinationApi, INotificationService, Notification};

use super::{notify, DestinationStore};

/// What the form is currently doing
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Closed,
    Create { visualization: VisualizationRef },
    Edit { destination: Destination },
}

/// Field values as entered by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub name: String,
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub row: String,
    pub column: String,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            spreadsheet_id: String::new(),
            sheet_name: String::new(),
            row: CellRow::default().to_string(),
            column: CellColumn::default().to_string(),
        }
    }
}

impl FormInput {
    /// Seeds the fields from a stored destination
    pub fn from_destination(destination: &Destination) -> Self {
        Self {
            name: destination.name.clone(),
            spreadsheet_id: destination.options.spreadsheet_id.clone(),
            sheet_name: destination.options.sheet_name.clone(),
            row: destination.options.row.to_string(),
            column: destination.options.column.clone(),
        }
    }

    /// Parses and validates the fields into a draft.
    ///
    /// The name is kept exactly as typed; the sheet coordinates are trimmed.
    pub fn to_draft(&self) -> Result<DestinationDraft, DomainError> {
        required(&self.name, "name")?;
        let name = self.name.clone();
        let spreadsheet_id = required(&self.spreadsheet_id, "spreadsheet_id")?;
        let sheet_name = required(&self.sheet_name, "sheet_name")?;
        let row: CellRow = self.row.parse()?;
        let column: CellColumn = self.column.parse()?;

        Ok(DestinationDraft {
            id: None,
            visualization_id: None,
            name,
            kind: DestinationKind::Gsheets,
            options: DraftOptions {
                spreadsheet_id,
                sheet_name,
                row,
                column,
            },
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Returns false when `candidate` reuses the name of an existing destination.
///
/// Names are compared exactly, so `"sheet a"` and `"Sheet A"` are distinct.
pub fn validate_new(candidate: &DestinationDraft, existing: &[Destination]) -> bool {
    !existing.iter().any(|d| d.name == candidate.name)
}

#[derive(Debug)]
struct FormState {
    mode: FormMode,
    input: FormInput,
}

/// Drives the destination form against the backend
pub struct DestinationFormController {
    api: Arc<dyn IDestinationApi>,
    notifier: Arc<dyn INotificationService>,
    store: Arc<DestinationStore>,
    state: Mutex<FormState>,
}

impl DestinationFormController {
    pub fn new(
        api: Arc<dyn IDestinationApi>,
        notifier: Arc<dyn INotificationService>,
        store: Arc<DestinationStore>,
    ) -> Self {
        Self {
            api,
            notifier,
            store,
            state: Mutex::new(FormState {
                mode: FormMode::Closed,
                input: FormInput::default(),
            }),
        }
    }

    /// Opens the create form for a table visualization
    pub fn open_create(&self, visualization: &VisualizationRef) -> Result<(), DomainError> {
        visualization.ensure_tabular()?;
        let mut state = self.lock();
        state.mode = FormMode::Create {
            visualization: visualization.clone(),
        };
        state.input = FormInput::default();
        Ok(())
    }

    /// Opens the edit form seeded from `destination`
    pub fn open_edit(&self, destination: &Destination) {
        let mut state = self.lock();
        state.input = FormInput::from_destination(destination);
        state.mode = FormMode::Edit {
            destination: destination.clone(),
        };
    }

    /// Closes the form and drops whatever was typed
    pub fn cancel(&self) {
        let mut state = self.lock();
        state.mode = FormMode::Closed;
        state.input = FormInput::default();
    }

    pub fn mode(&self) -> FormMode {
        self.lock().mode.clone()
    }

    pub fn input(&self) -> FormInput {
        self.lock().input.clone()
    }

    pub fn set_input(&self, input: FormInput) {
        self.lock().input = input;
    }

    /// Submits the open form. The form closes on success and keeps its
    /// input on failure.
    pub async fn submit(&self) -> Result<Destination, DestinationError> {
        let (mode, input) = {
            let state = self.lock();
            (state.mode.clone(), state.input.clone())
        };

        let draft = match input.to_draft() {
            Ok(draft) => draft,
            Err(e) => {
                notify(
                    self.notifier.as_ref(),
                    Notification::error("Invalid destination").with_description(e.to_string()),
                )
                .await;
                return Err(e.into());
            }
        };

        let saved = match mode {
            FormMode::Closed => {
                return Err(DomainError::InvalidState {
                    from: "Closed".to_string(),
                    to: "Submitted".to_string(),
                }
                .into())
            }
            FormMode::Create { visualization } => {
                self.submit_create(visualization.id, draft).await?
            }
            FormMode::Edit { destination } => {
                let draft = DestinationDraft {
                    id: Some(destination.id),
                    visualization_id: Some(destination.visualization_id),
                    ..draft
                };
                self.submit_update(draft).await?
            }
        };

        self.cancel();
        Ok(saved)
    }

    /// Creates a destination fed by `visualization_id`
    pub async fn submit_create(
        &self,
        visualization_id: VisualizationId,
        draft: DestinationDraft,
    ) -> Result<Destination, DestinationError> {
        if !validate_new(&draft, &self.store.destinations()) {
            debug!(name = %draft.name, "Rejected duplicate destination name");
            notify(
                self.notifier.as_ref(),
                Notification::info("Destination with same name already exists"),
            )
            .await;
            return Err(DomainError::DuplicateName(draft.name).into());
        }

        match self.api.create_destination(visualization_id, &draft).await {
            Ok(created) => {
                info!(
                    destination_id = %created.id,
                    visualization_id = %visualization_id,
                    "Destination created"
                );
                notify(
                    self.notifier.as_ref(),
                    Notification::success("Destination created"),
                )
                .await;
                self.store.invalidate();
                Ok(created)
            }
            Err(e) => {
                warn!(visualization_id = %visualization_id, error = %e, "Failed to create destination");
                let err = DestinationError::fetch(&e);
                notify(
                    self.notifier.as_ref(),
                    Notification::error("Failed to create Destination")
                        .with_description(format!("{e:#}")),
                )
                .await;
                Err(err)
            }
        }
    }

    /// Updates the destination identified by the draft's ids
    pub async fn submit_update(
        &self,
        draft: DestinationDraft,
    ) -> Result<Destination, DestinationError> {
        let (Some(destination_id), Some(visualization_id)) = (draft.id, draft.visualization_id)
        else {
            return Err(DomainError::MissingField("id").into());
        };

        match self
            .api
            .update_destination(visualization_id, destination_id, &draft)
            .await
        {
            Ok(updated) => {
                info!(destination_id = %destination_id, "Destination updated");
                notify(
                    self.notifier.as_ref(),
                    Notification::success("Destination updated"),
                )
                .await;
                self.store.invalidate();
                Ok(updated)
            }
            Err(e) => {
                warn!(destination_id = %destination_id, error = %e, "Failed to update destination");
                let err = DestinationError::fetch(&e);
                notify(
                    self.notifier.as_ref(),
                    Notification::error("Failed to update Destination")
                        .with_description(format!("{e:#}")),
                )
                .await;
                Err(err)
            }
        }
    }

    /// Id of the destination being edited, if any
    pub fn editing(&self) -> Option<DestinationId> {
        match &self.lock().mode {
            FormMode::Edit { destination } => Some(destination.id),
            _ => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
