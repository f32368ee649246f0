//! Gateway operations translating HTTP-level requests into cabinet protocol calls.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;

use crate::cabinet::pager::DEFAULT_PAGE_SIZE;
use crate::cabinet::{
    CabinetApi, CabinetClient, CabinetSettings, Document, QueryExpression, Session,
    build_index_fields, stream_documents,
};
use crate::config::get_config;
use crate::metrics::{GatewayMetrics, MetricsSnapshot};

use super::staging::StagedFile;
use super::types::{DeletionReceipt, GatewayError, UploadFailure, UploadMetadata};

/// Operations the HTTP surface consumes from the gateway core.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// Return every document in the configured cabinet, in backend page order.
    async fn list_documents(&self) -> Result<Vec<Document>, GatewayError>;

    /// Stage an uploaded payload and submit it as a new document.
    async fn upload_document(
        &self,
        metadata: UploadMetadata,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Document, GatewayError>;

    /// Locate a document by identifier and delete it.
    async fn delete_document(&self, document_id: &str) -> Result<DeletionReceipt, GatewayError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

/// Coordinates cabinet sessions, pagination, upload staging, and search-then-delete.
///
/// The service holds no per-request state: every operation opens its own session and owns its
/// own staged file, so concurrently dispatched requests share nothing but the atomic counters.
pub struct GatewayService<C> {
    cabinet: C,
    cabinet_id: String,
    page_size: usize,
    metrics: Arc<GatewayMetrics>,
}

impl GatewayService<CabinetClient> {
    /// Build the gateway service from loaded configuration.
    pub fn new() -> Self {
        let config = get_config();
        let settings = CabinetSettings::from_config(config);
        let cabinet = CabinetClient::new(settings).expect("Failed to initialize cabinet client");
        Self::with_cabinet(
            cabinet,
            config.cabinet_id.clone(),
            config.cabinet_page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

impl Default for GatewayService<CabinetClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> GatewayService<C>
where
    C: CabinetApi,
{
    /// Build a gateway over an explicit cabinet backend.
    pub fn with_cabinet(cabinet: C, cabinet_id: String, page_size: usize) -> Self {
        Self {
            cabinet,
            cabinet_id,
            page_size,
            metrics: Arc::new(GatewayMetrics::new()),
        }
    }

    /// Open the fresh session this operation will use.
    ///
    /// Sessions are never cached or reused across requests; the small per-call connection cost
    /// buys isolation between concurrently dispatched operations.
    async fn open_session(&self) -> Result<Session, GatewayError> {
        self.cabinet
            .open_session()
            .await
            .map_err(GatewayError::Connection)
    }

    /// Return every document in the cabinet by walking all pages.
    ///
    /// All-or-nothing: a failing page fetch discards anything accumulated so far.
    pub async fn list_documents(&self) -> Result<Vec<Document>, GatewayError> {
        let session = self.open_session().await?;
        let documents: Vec<Document> =
            stream_documents(&self.cabinet, &session, &self.cabinet_id, self.page_size)
                .try_collect()
                .await
                .map_err(GatewayError::Retrieval)?;

        self.metrics.record_list();
        tracing::info!(
            cabinet = %self.cabinet_id,
            count = documents.len(),
            "Listed documents"
        );
        Ok(documents)
    }

    /// Stage the payload, attach index metadata, and submit the document.
    ///
    /// The staged file is released on every path: explicitly after submission (success or
    /// failure), and through `Drop` should the request be cancelled mid-flight.
    pub async fn upload_document(
        &self,
        metadata: UploadMetadata,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Document, GatewayError> {
        let fields = build_index_fields(
            &metadata.company,
            &metadata.contact,
            metadata.birthday,
            content_type,
        );
        let session = self.open_session().await?;

        let staged = StagedFile::create(&bytes, file_name)
            .await
            .map_err(|err| GatewayError::Upload(UploadFailure::Staging(err)))?;

        let submitted = self
            .cabinet
            .create_document(
                &session,
                &self.cabinet_id,
                &fields,
                staged.path(),
                file_name,
                content_type,
            )
            .await;

        if let Err(err) = staged.release().await {
            // The upload outcome stands either way; a lingering scratch file is only noise.
            tracing::warn!(error = %err, "Failed to release staged file");
        }

        let document =
            submitted.map_err(|err| GatewayError::Upload(UploadFailure::Cabinet(err)))?;
        self.metrics.record_upload();
        tracing::info!(
            cabinet = %self.cabinet_id,
            id = %document.id,
            file_name,
            content_type,
            "Document uploaded"
        );
        Ok(document)
    }

    /// Locate a document by identifier and delete the single match.
    ///
    /// The cabinet exposes no delete-by-id primitive, so the document is resolved through a
    /// single-match query first. Identifiers are expected unique; should the backend ever
    /// return several matches, the first in result order wins.
    pub async fn delete_document(
        &self,
        document_id: &str,
    ) -> Result<DeletionReceipt, GatewayError> {
        let session = self.open_session().await?;
        let query = QueryExpression::by_document_id(document_id);
        let page = self
            .cabinet
            .search(&session, &self.cabinet_id, &query)
            .await
            .map_err(GatewayError::Retrieval)?;

        let Some(document) = page.items.into_iter().next() else {
            tracing::info!(cabinet = %self.cabinet_id, document_id, "Delete target not found");
            return Err(GatewayError::NotFound(document_id.to_string()));
        };

        let receipt = self
            .cabinet
            .delete_document(&session, &document)
            .await
            .map_err(GatewayError::Deletion)?;

        self.metrics.record_delete();
        tracing::info!(cabinet = %self.cabinet_id, document_id, "Document deleted");
        Ok(DeletionReceipt {
            document_id: document_id.to_string(),
            receipt,
        })
    }

    /// Return the current metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl<C> GatewayApi for GatewayService<C>
where
    C: CabinetApi,
{
    async fn list_documents(&self) -> Result<Vec<Document>, GatewayError> {
        GatewayService::list_documents(self).await
    }

    async fn upload_document(
        &self,
        metadata: UploadMetadata,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Document, GatewayError> {
        GatewayService::upload_document(self, metadata, file_name, content_type, bytes).await
    }

    async fn delete_document(&self, document_id: &str) -> Result<DeletionReceipt, GatewayError> {
        GatewayService::delete_document(self, document_id).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        GatewayService::metrics_snapshot(self)
    }
}
