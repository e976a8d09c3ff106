//! Manual destination sync: trigger a server job and wait for it
//!
//! Each destination moves through
//! `Idle -> Triggering -> Polling -> {Succeeded, Failed} -> Idle`.
//! Only the in-flight states are tracked: a destination id present in the
//! active map is `Triggering` or `Polling`, an absent id is `Idle`. The
//! terminal states are reported through the returned [`SyncOutcome`] or
//! [`DestinationError`] as the entry is released.
//!
//! The map entry is claimed atomically before any request is issued and is
//! released by a drop guard on every exit path, so a second trigger for the
//! same destination is rejected while syncs of different destinations run
//! side by side.
//!
//! Polling is a plain loop inside the caller's task. It is bounded by
//! [`PollPolicy`] and stops as soon as the owning [`ViewScope`] closes; the
//! server job keeps running in that case, the client just stops listening.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::domain::{DestinationError, DestinationId, JobId, JobStatus, SyncJob};
use crate::ports::{IDestinationApi, INotificationService, Notification};

use super::{notify, DestinationStore, ViewScope};

/// Delay between two status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
/// Status checks before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 600;
/// Overall time budget for one sync
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(900);

/// Bounds for the status loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// In-flight state of one destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Triggering,
    Polling { job_id: JobId },
}

/// Result of a sync that reached the succeeded state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub job: SyncJob,
    /// Status requests issued, including the final one
    pub status_checks: u32,
    /// Delayed re-polls after a non-terminal status
    pub re_polls: u32,
}

/// Releases the destination's map entry when dropped
struct ActiveSync<'a> {
    active: &'a DashMap<DestinationId, SyncState>,
    destination_id: DestinationId,
}

impl Drop for ActiveSync<'_> {
    fn drop(&mut self) {
        self.active.remove(&self.destination_id);
        debug!(destination_id = %self.destination_id, "Sync slot released");
    }
}

/// Runs manual syncs, at most one per destination
pub struct SyncJobPoller {
    api: Arc<dyn IDestinationApi>,
    notifier: Arc<dyn INotificationService>,
    store: Arc<DestinationStore>,
    policy: PollPolicy,
    active: DashMap<DestinationId, SyncState>,
}

impl SyncJobPoller {
    pub fn new(
        api: Arc<dyn IDestinationApi>,
        notifier: Arc<dyn INotificationService>,
        store: Arc<DestinationStore>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            api,
            notifier,
            store,
            policy,
            active: DashMap::new(),
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Current state of `destination_id`
    pub fn state(&self, destination_id: DestinationId) -> SyncState {
        self.active
            .get(&destination_id)
            .map(|entry| entry.value().clone())
            .unwrap_or(SyncState::Idle)
    }

    /// Destinations with a sync in flight
    pub fn running(&self) -> Vec<DestinationId> {
        self.active.iter().map(|entry| *entry.key()).collect()
    }

    /// Starts a sync for `destination_id` and waits for the job to finish.
    ///
    /// Every outcome except [`DestinationError::Cancelled`] is also reported
    /// through the notifier.
    pub async fn trigger(
        &self,
        destination_id: DestinationId,
        scope: &ViewScope,
    ) -> Result<SyncOutcome, DestinationError> {
        let Some(_slot) = self.claim(destination_id) else {
            debug!(destination_id = %destination_id, "Sync already in flight");
            notify(
                self.notifier.as_ref(),
                Notification::info("Please wait...")
                    .with_description("A destination sync is already running."),
            )
            .await;
            return Err(DestinationError::AlreadyRunning(destination_id));
        };

        let job_id = match self.api.trigger_sync(destination_id).await {
            Ok(job_id) => job_id,
            Err(e) => {
                warn!(destination_id = %destination_id, error = %e, "Failed to start sync");
                if !scope.is_active() {
                    return Err(DestinationError::Cancelled);
                }
                let err = DestinationError::fetch(&e);
                self.report(&Err(err.clone())).await;
                return Err(err);
            }
        };

        if !scope.is_active() {
            return Err(DestinationError::Cancelled);
        }

        info!(destination_id = %destination_id, job_id = %job_id, "Sync job started");
        self.set_state(
            destination_id,
            SyncState::Polling {
                job_id: job_id.clone(),
            },
        );

        let attempts = AtomicU32::new(0);
        let result = tokio::select! {
            _ = scope.cancelled() => Err(DestinationError::Cancelled),
            polled = tokio::time::timeout(
                self.policy.timeout,
                self.poll(destination_id, &job_id, &attempts),
            ) => match polled {
                Ok(result) => result,
                Err(_) => Err(DestinationError::Timeout {
                    job_id: job_id.to_string(),
                    attempts: attempts.load(Ordering::SeqCst),
                }),
            },
        };

        if matches!(result, Err(DestinationError::Cancelled)) || !scope.is_active() {
            debug!(destination_id = %destination_id, job_id = %job_id, "Sync abandoned, view closed");
            return Err(DestinationError::Cancelled);
        }

        self.report(&result).await;
        result
    }

    /// Checks the job until it reaches a terminal state or the attempt budget runs out
    async fn poll(
        &self,
        destination_id: DestinationId,
        job_id: &JobId,
        attempts: &AtomicU32,
    ) -> Result<SyncOutcome, DestinationError> {
        let mut re_polls = 0;
        loop {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            let job = self
                .api
                .job_status(destination_id, job_id)
                .await
                .map_err(DestinationError::fetch)?;

            debug!(
                destination_id = %destination_id,
                job_id = %job_id,
                attempt,
                status = %job.status,
                "Sync job status"
            );

            match job.status {
                JobStatus::Succeeded => {
                    return Ok(SyncOutcome {
                        job,
                        status_checks: attempt,
                        re_polls,
                    })
                }
                JobStatus::Failed => {
                    return Err(DestinationError::JobFailed {
                        job_id: job_id.to_string(),
                        message: job
                            .error_text()
                            .unwrap_or("Destination sync failed")
                            .to_string(),
                    })
                }
                JobStatus::Queued | JobStatus::Running => {
                    if attempt >= self.policy.max_attempts {
                        return Err(DestinationError::Timeout {
                            job_id: job_id.to_string(),
                            attempts: attempt,
                        });
                    }
                    tokio::time::sleep(self.policy.interval).await;
                    re_polls += 1;
                }
            }
        }
    }

    /// Notifies the terminal outcome; the store reloads to pick up `last_sync`
    async fn report(&self, result: &Result<SyncOutcome, DestinationError>) {
        let notification = match result {
            Ok(outcome) => {
                info!(job_id = %outcome.job.id, status_checks = outcome.status_checks, "Destination synced");
                self.store.invalidate();
                Notification::success("Destination synced")
            }
            Err(DestinationError::JobFailed { job_id, message }) => {
                warn!(job_id = %job_id, error = %message, "Sync job failed");
                self.store.invalidate();
                Notification::error("Failed to sync Destination").with_description(message.clone())
            }
            Err(DestinationError::Timeout { job_id, attempts }) => {
                warn!(job_id = %job_id, attempts, "Gave up waiting for sync job");
                Notification::error("Sync status unknown").with_description(format!(
                    "Job {job_id} did not finish after {attempts} status checks"
                ))
            }
            Err(DestinationError::Fetch(message)) => {
                Notification::error("Failed to sync Destination").with_description(message.clone())
            }
            Err(_) => return,
        };
        notify(self.notifier.as_ref(), notification).await;
    }

    fn claim(&self, destination_id: DestinationId) -> Option<ActiveSync<'_>> {
        match self.active.entry(destination_id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(SyncState::Triggering);
                Some(ActiveSync {
                    active: &self.active,
                    destination_id,
                })
            }
        }
    }

    fn set_state(&self, destination_id: DestinationId, state: SyncState) {
        if let Some(mut entry) = self.active.get_mut(&destination_id) {
            *entry = state;
        }
    }
}
