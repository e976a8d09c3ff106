//! In-memory port fakes shared by the use-case tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::bail;

use crate::domain::{
    CurrentUser, Destination, DestinationDraft, DestinationId, DestinationKind,
    DestinationOptions, JobId, JobStatus, ObjectFlags, QueryId, SyncJob, VisualizationId,
    VisualizationRef,
};
use crate::ports::{IConfirmationPrompt, IDestinationApi, INotificationService, Notification};

pub fn destination(id: u64, visualization_id: u64, name: &str) -> Destination {
    Destination {
        id: DestinationId::new(id),
        visualization_id: VisualizationId::new(visualization_id),
        name: name.to_string(),
        kind: DestinationKind::Gsheets,
        options: DestinationOptions {
            spreadsheet_id: "1AbC".to_string(),
            sheet_name: "Sheet1".to_string(),
            row: 1,
            column: "A".to_string(),
            last_sync_rows: None,
            last_sync_columns: None,
        },
        last_sync: None,
    }
}

/// Scripted backend that records every call it receives
#[derive(Default)]
pub struct FakeDestinationApi {
    destinations: Mutex<Vec<Destination>>,
    visualizations: Mutex<Vec<VisualizationRef>>,
    statuses: Mutex<VecDeque<JobStatus>>,
    job_error: Mutex<Option<String>>,
    list_error: Mutex<Option<String>>,
    create_error: Mutex<Option<String>>,
    trigger_error: Mutex<Option<String>>,
    calls: Mutex<Vec<&'static str>>,
    next_id: AtomicU64,
    list_gate: Mutex<Option<Arc<tokio::sync::Notify>>>,
    flags: Mutex<ObjectFlags>,
    user: Mutex<CurrentUser>,
}

impl FakeDestinationApi {
    pub fn with_destinations(destinations: Vec<Destination>) -> Self {
        let fake = Self::default();
        fake.next_id.store(100, Ordering::SeqCst);
        *fake.destinations.lock().unwrap() = destinations;
        fake
    }

    pub fn set_visualizations(&self, visualizations: Vec<VisualizationRef>) {
        *self.visualizations.lock().unwrap() = visualizations;
    }

    pub fn set_query_flags(&self, flags: ObjectFlags) {
        *self.flags.lock().unwrap() = flags;
    }

    pub fn set_admin(&self, is_admin: bool) {
        self.user.lock().unwrap().is_admin = is_admin;
    }

    /// Statuses returned by successive status checks; the last one repeats
    pub fn script_statuses(&self, statuses: &[JobStatus]) {
        *self.statuses.lock().unwrap() = statuses.iter().copied().collect();
    }

    pub fn set_job_error(&self, message: &str) {
        *self.job_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_list(&self, message: &str) {
        *self.list_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_create(&self, message: &str) {
        *self.create_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_trigger(&self, message: &str) {
        *self.trigger_error.lock().unwrap() = Some(message.to_string());
    }

    /// Parks the next list request until the returned handle is notified
    pub fn hold_next_list(&self) -> Arc<tokio::sync::Notify> {
        let gate = Arc::new(tokio::sync::Notify::new());
        *self.list_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Inserts a destination behind the client's back, like a second client would
    pub fn insert_remote(&self, destination: Destination) {
        self.destinations.lock().unwrap().push(destination);
    }

    pub fn calls(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn list_calls(&self) -> usize {
        self.calls("list")
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait::async_trait]
impl IDestinationApi for FakeDestinationApi {
    async fn list_destinations(&self, _query_id: QueryId) -> anyhow::Result<Vec<Destination>> {
        self.record("list");
        if let Some(message) = self.list_error.lock().unwrap().clone() {
            bail!(message);
        }
        // Snapshot first, so a held reply reflects the list at request time
        let snapshot = self.destinations.lock().unwrap().clone();
        let gate = self.list_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(snapshot)
    }

    async fn query_visualizations(
        &self,
        _query_id: QueryId,
    ) -> anyhow::Result<Vec<VisualizationRef>> {
        self.record("visualizations");
        Ok(self.visualizations.lock().unwrap().clone())
    }

    async fn query_flags(&self, _query_id: QueryId) -> anyhow::Result<ObjectFlags> {
        self.record("flags");
        Ok(*self.flags.lock().unwrap())
    }

    async fn current_user(&self) -> anyhow::Result<CurrentUser> {
        self.record("user");
        Ok(self.user.lock().unwrap().clone())
    }

    async fn create_destination(
        &self,
        visualization_id: VisualizationId,
        draft: &DestinationDraft,
    ) -> anyhow::Result<Destination> {
        self.record("create");
        if let Some(message) = self.create_error.lock().unwrap().clone() {
            bail!(message);
        }
        let mut destinations = self.destinations.lock().unwrap();
        if destinations.iter().any(|d| d.name == draft.name) {
            bail!(
                "400 Bad Request: Visualization Destination with the name {} already exists.",
                draft.name
            );
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut created = destination(id, visualization_id.get(), &draft.name);
        created.options.spreadsheet_id = draft.options.spreadsheet_id.clone();
        created.options.sheet_name = draft.options.sheet_name.clone();
        created.options.row = draft.options.row.get();
        created.options.column = draft.options.column.to_string();
        destinations.push(created.clone());
        Ok(created)
    }

    async fn update_destination(
        &self,
        _visualization_id: VisualizationId,
        destination_id: DestinationId,
        draft: &DestinationDraft,
    ) -> anyhow::Result<Destination> {
        self.record("update");
        let mut destinations = self.destinations.lock().unwrap();
        let Some(existing) = destinations.iter_mut().find(|d| d.id == destination_id) else {
            bail!("404 Not Found");
        };
        existing.name = draft.name.clone();
        existing.options.row = draft.options.row.get();
        existing.options.column = draft.options.column.to_string();
        Ok(existing.clone())
    }

    async fn delete_destination(
        &self,
        _visualization_id: VisualizationId,
        destination_id: DestinationId,
    ) -> anyhow::Result<()> {
        self.record("delete");
        self.destinations
            .lock()
            .unwrap()
            .retain(|d| d.id != destination_id);
        Ok(())
    }

    async fn trigger_sync(&self, destination_id: DestinationId) -> anyhow::Result<JobId> {
        self.record("trigger");
        if let Some(message) = self.trigger_error.lock().unwrap().clone() {
            bail!(message);
        }
        Ok(JobId::new(format!("job-{destination_id}"))?)
    }

    async fn job_status(
        &self,
        _destination_id: DestinationId,
        job_id: &JobId,
    ) -> anyhow::Result<SyncJob> {
        self.record("status");
        let status = {
            let mut statuses = self.statuses.lock().unwrap();
            if statuses.len() > 1 {
                statuses.pop_front()
            } else {
                statuses.front().copied()
            }
        }
        .unwrap_or(JobStatus::Queued);

        let error = match status {
            JobStatus::Failed => self.job_error.lock().unwrap().clone(),
            _ => Some(String::new()),
        };
        Ok(SyncJob {
            id: job_id.clone(),
            status,
            error,
            updated_at: None,
        })
    }
}

/// Notifier that keeps everything it is asked to show
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.lock().unwrap().is_empty()
    }
}

#[async_trait::async_trait]
impl INotificationService for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Prompt with a fixed answer
pub struct FixedPrompt {
    answer: bool,
    asked: Mutex<Vec<String>>,
}

impl FixedPrompt {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IConfirmationPrompt for FixedPrompt {
    async fn confirm(&self, question: &str) -> anyhow::Result<bool> {
        self.asked.lock().unwrap().push(question.to_string());
        Ok(self.answer)
    }
}
