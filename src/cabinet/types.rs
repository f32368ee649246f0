//! Shared types used by the cabinet client and helpers.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// Errors returned while interacting with the document cabinet.
#[derive(Debug, Error)]
pub enum CabinetError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid cabinet URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The cabinet refused the configured credentials at logon.
    #[error("Cabinet rejected credentials ({status})")]
    CredentialsRejected {
        /// HTTP status returned by the logon endpoint.
        status: StatusCode,
    },
    /// The cabinet responded with an unexpected status code.
    #[error("Unexpected cabinet response ({status}): {body}")]
    UnexpectedStatus {
        /// HTTP status returned from the cabinet.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// A document record arrived without the link its delete operation requires.
    #[error("Document '{id}' carries no delete link")]
    MissingDeleteLink {
        /// Identifier of the offending document.
        id: String,
    },
    /// The staged file backing an upload could not be read back.
    #[error("Failed to read upload file '{path}': {source}")]
    FileRead {
        /// Path of the unreadable file.
        path: String,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
}

/// Connection parameters for one cabinet endpoint.
///
/// Carried as an explicit value rather than read ambiently so the client can be pointed at a
/// test double without a live configuration source.
#[derive(Debug, Clone)]
pub struct CabinetSettings {
    /// Base URL of the cabinet REST endpoint.
    pub base_url: String,
    /// Logon username.
    pub username: String,
    /// Logon password.
    pub password: String,
}

impl CabinetSettings {
    /// Extract the cabinet connection parameters from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.cabinet_url.clone(),
            username: config.cabinet_username.clone(),
            password: config.cabinet_password.clone(),
        }
    }
}

/// Ephemeral handle to an authenticated cabinet session.
///
/// Bound to one logical operation and one endpoint; never pooled or shared across requests.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque token echoed back to the cabinet on every call.
    pub token: String,
    /// Normalized base URL of the endpoint this session was opened against.
    pub base_url: String,
}

/// Named metadata attribute attached to a document at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexField {
    /// Well-known field key (e.g. `COMPANY`, `CONTACT`).
    pub name: String,
    /// String value; dates are normalized to `yyyy-MM-dd`.
    pub value: String,
}

impl IndexField {
    /// Convenience constructor for a name/value pair.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Opaque document record as returned by the cabinet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Identifier assigned by the cabinet.
    pub id: String,
    /// MIME type of the stored content.
    pub content_type: String,
    /// Index fields attached at creation time, in cabinet order.
    #[serde(default)]
    pub fields: Vec<IndexField>,
    /// Relative link the cabinet exposes for deleting this document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// One batch of documents plus an optional continuation link.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentsPage {
    /// Documents contained in this batch, in cabinet order.
    #[serde(default)]
    pub items: Vec<Document>,
    /// Relative URL of the next batch, absent on the final page.
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct LogonResponse {
    pub(crate) token: String,
}
