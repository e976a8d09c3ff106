//! Domain entities and business logic
//!
//! This module contains the core domain types for vizsync:
//! - Newtypes for type-safe identifiers and validated cell coordinates
//! - Spreadsheet destinations and their drafts
//! - Server-side sync jobs
//! - Visualization references
//! - Data-catalog dataset metadata
//! - Result export links
//! - Destination permission policy
//! - Domain-specific error types

pub mod catalog;
pub mod destination;
pub mod errors;
pub mod export;
pub mod newtypes;
pub mod policy;
pub mod sync_job;
pub mod visualization;

// Re-export commonly used types
pub use catalog::{dataset_id_from_catalog_url, DatasetDetails, DocLink};
pub use destination::{
    Destination, DestinationDraft, DestinationKind, DestinationOptions, DraftOptions, LastSync,
};
pub use errors::{DestinationError, DomainError};
pub use export::{results_link, Embed, ExportFormat, ExportSource};
pub use newtypes::*;
pub use policy::{CurrentUser, DestinationPolicy, ObjectFlags};
pub use sync_job::{JobStatus, SyncJob};
pub use visualization::{selectable, VisualizationRef};
