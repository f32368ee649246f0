//! Error taxonomy and request/response types of the gateway core.

use serde::Serialize;
use thiserror::Error;
use time::Date;

use crate::cabinet::CabinetError;

/// Underlying cause of a failed upload.
#[derive(Debug, Error)]
pub enum UploadFailure {
    /// Copying the payload to the transient staging file failed.
    #[error("staging failed: {0}")]
    Staging(#[from] std::io::Error),
    /// The cabinet rejected the submission.
    #[error(transparent)]
    Cabinet(#[from] CabinetError),
}

/// Errors surfaced by the gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Opening a cabinet session failed (malformed endpoint, unreachable host, bad credentials).
    #[error("Failed to open cabinet session: {0}")]
    Connection(#[source] CabinetError),
    /// Listing, pagination, or the search step of a delete failed.
    #[error("Failed to retrieve documents: {0}")]
    Retrieval(#[source] CabinetError),
    /// Staging or submitting an upload failed.
    #[error("Failed to upload document: {0}")]
    Upload(#[source] UploadFailure),
    /// No document matched the requested identifier.
    #[error("Document '{0}' was not found")]
    NotFound(String),
    /// The cabinet rejected the delete of a document the search did find.
    #[error("Failed to delete document: {0}")]
    Deletion(#[source] CabinetError),
}

/// Index metadata accompanying an uploaded file.
#[derive(Debug, Clone)]
pub struct UploadMetadata {
    /// Company name stored under the `COMPANY` field.
    pub company: String,
    /// Contact name stored under the `CONTACT` field.
    pub contact: String,
    /// Birthday stored under the `BIRTHDAY` field as `yyyy-MM-dd`.
    pub birthday: Date,
}

/// Structured confirmation of a completed delete.
///
/// Wraps the backend's opaque receipt string together with the identifier it applies to, so
/// callers are not left parsing a bare string.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReceipt {
    /// Identifier of the deleted document.
    pub document_id: String,
    /// Opaque confirmation value returned by the cabinet.
    pub receipt: String,
}
