//! vizsync Core - Domain logic for spreadsheet destinations
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Destination`, `DestinationDraft`, `SyncJob`, `VisualizationRef`, `DatasetDetails`
//! - **Use cases** - `DestinationStore`, `DestinationFormController`, `SyncJobPoller`, `DeletionConfirmer`
//! - **Port definitions** - Traits for adapters: `IDestinationApi`, `IDataCatalog`, `IResultExporter`,
//!   `INotificationService`, `IConfirmationPrompt`
//! - **Configuration** - YAML settings shared by the adapters
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.
//! Use cases orchestrate domain entities through port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
