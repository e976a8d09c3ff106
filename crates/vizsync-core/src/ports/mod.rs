//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IDestinationApi`] - Destination CRUD and sync jobs on the backend
//! - [`IDataCatalog`] - Dataset metadata lookups
//! - [`IResultExporter`] - Spreadsheet export of query results
//! - [`INotificationService`] - User-visible notifications
//! - [`IConfirmationPrompt`] - Yes/no confirmation of destructive actions

pub mod catalog;
pub mod confirmation;
pub mod destination_api;
pub mod notification;

pub use catalog::{IDataCatalog, IResultExporter};
pub use confirmation::IConfirmationPrompt;
pub use destination_api::IDestinationApi;
pub use notification::{INotificationService, Notification, NotificationKind};
