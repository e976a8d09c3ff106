//! Server-side sync job as observed by the client
//!
//! The client never owns job transitions; it only reads them. The backend
//! reports status as an integer code (`1` queued, `2` started, `3` finished,
//! `4` failed or stopped). Status names are accepted as well.

use serde::{de, Deserialize, Deserializer, Serialize};

use super::newtypes::JobId;

/// Status of a sync job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    /// Returns true for states from which no further transition occurs
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }

    /// Maps the backend's integer status code
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(JobStatus::Queued),
            2 => Some(JobStatus::Running),
            3 => Some(JobStatus::Succeeded),
            4 => Some(JobStatus::Failed),
            _ => None,
        }
    }

    /// Maps a status name, including the backend's queue vocabulary
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "queued" => Some(JobStatus::Queued),
            "running" | "started" => Some(JobStatus::Running),
            "succeeded" | "finished" => Some(JobStatus::Succeeded),
            "failed" | "stopped" => Some(JobStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u64),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => JobStatus::from_code(code)
                .ok_or_else(|| de::Error::custom(format!("unknown job status code {code}"))),
            Raw::Name(name) => JobStatus::from_name(&name)
                .ok_or_else(|| de::Error::custom(format!("unknown job status {name:?}"))),
        }
    }
}

/// Snapshot of a sync job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncJob {
    pub id: JobId,
    pub status: JobStatus,
    /// Server-supplied error text; empty means none
    #[serde(default)]
    pub error: Option<String>,
    /// Start time while running (`0` otherwise), passed through verbatim
    #[serde(default)]
    pub updated_at: Option<serde_json::Value>,
}

impl SyncJob {
    /// Non-empty error text, if any
    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.trim().is_empty())
    }
}
