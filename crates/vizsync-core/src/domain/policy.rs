//! Permission checks for destination management
//!
//! Mirrors the server's default policy: creating destinations is an admin
//! action, and syncing is opt-in per query.

use serde::{Deserialize, Serialize};

/// The authenticated user as seen by the client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl CurrentUser {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Per-object flags the server attaches to queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectFlags {
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub is_destination_sync_enabled: bool,
}

/// Default destination policy
#[derive(Debug, Clone, Copy, Default)]
pub struct DestinationPolicy;

impl DestinationPolicy {
    pub fn can_create_destination(&self, user: &CurrentUser) -> bool {
        user.is_admin
    }

    pub fn is_destination_sync_enabled(&self, query: &ObjectFlags) -> bool {
        query.is_destination_sync_enabled
    }

    pub fn can_edit(&self, object: &ObjectFlags) -> bool {
        object.can_edit
    }

    /// Editing destinations needs both edit rights and sync enabled on the query
    pub fn can_manage_destinations(&self, query: &ObjectFlags) -> bool {
        self.can_edit(query) && self.is_destination_sync_enabled(query)
    }
}
