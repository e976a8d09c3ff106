//! RedashApi - port implementations over the REST client
//!
//! Wraps the [`RedashClient`] and delegates to the endpoint modules to
//! fulfil the [`IDestinationApi`], [`IDataCatalog`] and [`IResultExporter`]
//! port contracts.

use anyhow::Result;

use vizsync_core::domain::{
    CurrentUser, DatasetDetails, Destination, DestinationDraft, DestinationId, JobId,
    ObjectFlags, QueryId, SyncJob, VisualizationId, VisualizationRef,
};
use vizsync_core::ports::{IDataCatalog, IDestinationApi, IResultExporter};

use crate::client::RedashClient;
use crate::{catalog, destinations, export};

/// Server-backed implementation of the destination, catalog and export ports
#[derive(Debug, Clone)]
pub struct RedashApi {
    client: RedashClient,
}

impl RedashApi {
    pub fn new(client: RedashClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RedashClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl IDestinationApi for RedashApi {
    async fn list_destinations(&self, query_id: QueryId) -> Result<Vec<Destination>> {
        destinations::list(&self.client, query_id).await
    }

    async fn query_visualizations(&self, query_id: QueryId) -> Result<Vec<VisualizationRef>> {
        destinations::visualizations(&self.client, query_id).await
    }

    async fn query_flags(&self, query_id: QueryId) -> Result<ObjectFlags> {
        destinations::query_flags(&self.client, query_id).await
    }

    async fn current_user(&self) -> Result<CurrentUser> {
        destinations::current_user(&self.client).await
    }

    async fn create_destination(
        &self,
        visualization_id: VisualizationId,
        draft: &DestinationDraft,
    ) -> Result<Destination> {
        destinations::create(&self.client, visualization_id, draft).await
    }

    async fn update_destination(
        &self,
        visualization_id: VisualizationId,
        destination_id: DestinationId,
        draft: &DestinationDraft,
    ) -> Result<Destination> {
        destinations::update(&self.client, visualization_id, destination_id, draft).await
    }

    async fn delete_destination(
        &self,
        visualization_id: VisualizationId,
        destination_id: DestinationId,
    ) -> Result<()> {
        destinations::delete(&self.client, visualization_id, destination_id).await
    }

    async fn trigger_sync(&self, destination_id: DestinationId) -> Result<JobId> {
        destinations::trigger_sync(&self.client, destination_id).await
    }

    async fn job_status(&self, destination_id: DestinationId, job_id: &JobId) -> Result<SyncJob> {
        destinations::job_status(&self.client, destination_id, job_id).await
    }
}

#[async_trait::async_trait]
impl IDataCatalog for RedashApi {
    async fn dataset_details(&self, catalog_type: &str, dataset_id: &str) -> Result<DatasetDetails> {
        catalog::dataset_details(&self.client, catalog_type, dataset_id).await
    }
}

#[async_trait::async_trait]
impl IResultExporter for RedashApi {
    async fn export_to_sheet(&self, link: &str) -> Result<String> {
        export::export_to_sheet(&self.client, link).await
    }
}
