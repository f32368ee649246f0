//! HTTP client wrapper for the document cabinet's REST protocol.

use std::path::Path;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, multipart};
use serde_json::json;

use super::query::QueryExpression;
use super::types::{
    CabinetError, CabinetSettings, Document, DocumentsPage, IndexField, LogonResponse, Session,
};

/// Header carrying the session token on every authenticated call.
const SESSION_HEADER: &str = "X-Session-Token";

/// Capability set the gateway consumes from the cabinet backend.
///
/// Kept deliberately small (open-session, page-fetch, search, create, delete) so the gateway
/// core can be exercised against a fake implementation instead of a live cabinet.
#[async_trait]
pub trait CabinetApi: Send + Sync {
    /// Perform the logon handshake and return a fresh session handle.
    async fn open_session(&self) -> Result<Session, CabinetError>;

    /// Fetch the first page of a cabinet listing, bounded by `page_size`.
    async fn fetch_first_page(
        &self,
        session: &Session,
        cabinet_id: &str,
        page_size: usize,
    ) -> Result<DocumentsPage, CabinetError>;

    /// Follow a continuation link returned by a previous page.
    async fn fetch_next_page(
        &self,
        session: &Session,
        next: &str,
    ) -> Result<DocumentsPage, CabinetError>;

    /// Execute a structured query against the cabinet's search capability.
    async fn search(
        &self,
        session: &Session,
        cabinet_id: &str,
        query: &QueryExpression,
    ) -> Result<DocumentsPage, CabinetError>;

    /// Submit a new document assembled from index fields and a file-backed source.
    async fn create_document(
        &self,
        session: &Session,
        cabinet_id: &str,
        fields: &[IndexField],
        file_path: &Path,
        file_name: &str,
        content_type: &str,
    ) -> Result<Document, CabinetError>;

    /// Invoke the delete operation of a previously retrieved document.
    ///
    /// Returns the backend's opaque receipt string.
    async fn delete_document(
        &self,
        session: &Session,
        document: &Document,
    ) -> Result<String, CabinetError>;
}

/// Lightweight HTTP client for cabinet operations.
pub struct CabinetClient {
    client: Client,
    settings: CabinetSettings,
}

impl CabinetClient {
    /// Construct a new client for the given endpoint settings.
    pub fn new(settings: CabinetSettings) -> Result<Self, CabinetError> {
        let client = Client::builder().user_agent("cabinet-gateway/0.1").build()?;
        tracing::debug!(
            url = %settings.base_url,
            username = %settings.username,
            "Initialized cabinet HTTP client"
        );
        Ok(Self { client, settings })
    }

    fn request(&self, session: &Session, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format_endpoint(&session.base_url, path);
        self.client
            .request(method, url)
            .header(SESSION_HEADER, &session.token)
    }

    async fn unexpected(&self, response: reqwest::Response) -> CabinetError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        CabinetError::UnexpectedStatus { status, body }
    }
}

#[async_trait]
impl CabinetApi for CabinetClient {
    async fn open_session(&self) -> Result<Session, CabinetError> {
        let base_url =
            normalize_base_url(&self.settings.base_url).map_err(CabinetError::InvalidUrl)?;

        let response = self
            .client
            .post(format_endpoint(&base_url, "account/logon"))
            .json(&json!({
                "username": self.settings.username,
                "password": self.settings.password,
            }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::error!(url = %base_url, status = %status, "Cabinet rejected credentials");
            return Err(CabinetError::CredentialsRejected { status });
        }
        if !status.is_success() {
            return Err(self.unexpected(response).await);
        }

        let logon: LogonResponse = response.json().await?;
        tracing::debug!(url = %base_url, "Opened cabinet session");
        Ok(Session {
            token: logon.token,
            base_url,
        })
    }

    async fn fetch_first_page(
        &self,
        session: &Session,
        cabinet_id: &str,
        page_size: usize,
    ) -> Result<DocumentsPage, CabinetError> {
        let response = self
            .request(
                session,
                Method::GET,
                &format!("cabinets/{cabinet_id}/documents"),
            )
            .query(&[("count", page_size)])
            .send()
            .await?;

        if !response.status().is_success() {
            let error = self.unexpected(response).await;
            tracing::error!(cabinet = cabinet_id, error = %error, "Failed to fetch first page");
            return Err(error);
        }

        Ok(response.json().await?)
    }

    async fn fetch_next_page(
        &self,
        session: &Session,
        next: &str,
    ) -> Result<DocumentsPage, CabinetError> {
        let response = self.request(session, Method::GET, next).send().await?;

        if !response.status().is_success() {
            let error = self.unexpected(response).await;
            tracing::error!(next, error = %error, "Failed to fetch continuation page");
            return Err(error);
        }

        Ok(response.json().await?)
    }

    async fn search(
        &self,
        session: &Session,
        cabinet_id: &str,
        query: &QueryExpression,
    ) -> Result<DocumentsPage, CabinetError> {
        let response = self
            .request(session, Method::POST, &format!("cabinets/{cabinet_id}/query"))
            .json(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let error = self.unexpected(response).await;
            tracing::error!(cabinet = cabinet_id, error = %error, "Cabinet search failed");
            return Err(error);
        }

        Ok(response.json().await?)
    }

    async fn create_document(
        &self,
        session: &Session,
        cabinet_id: &str,
        fields: &[IndexField],
        file_path: &Path,
        file_name: &str,
        content_type: &str,
    ) -> Result<Document, CabinetError> {
        // The cabinet's upload primitive requires a file-backed source, so the caller stages
        // the payload to disk first and hands over the path.
        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|source| CabinetError::FileRead {
                path: file_path.display().to_string(),
                source,
            })?;

        let metadata = json!({
            "fields": fields,
            "contentType": content_type,
        });
        let file_part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = multipart::Form::new()
            .text("document", metadata.to_string())
            .part("file", file_part);

        let response = self
            .request(
                session,
                Method::POST,
                &format!("cabinets/{cabinet_id}/documents"),
            )
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let error = self.unexpected(response).await;
            tracing::error!(cabinet = cabinet_id, error = %error, "Document creation failed");
            return Err(error);
        }

        let document: Document = response.json().await?;
        tracing::debug!(cabinet = cabinet_id, id = %document.id, "Document created");
        Ok(document)
    }

    async fn delete_document(
        &self,
        session: &Session,
        document: &Document,
    ) -> Result<String, CabinetError> {
        let link = document
            .self_link
            .as_deref()
            .ok_or_else(|| CabinetError::MissingDeleteLink {
                id: document.id.clone(),
            })?;

        let response = self.request(session, Method::DELETE, link).send().await?;

        if !response.status().is_success() {
            let error = self.unexpected(response).await;
            tracing::error!(id = %document.id, error = %error, "Document deletion failed");
            return Err(error);
        }

        let receipt = response.text().await?;
        tracing::debug!(id = %document.id, "Document deleted");
        Ok(receipt)
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::DELETE, Method::POST, MockServer};
    use serde_json::json;

    fn test_client(base_url: &str) -> CabinetClient {
        CabinetClient::new(CabinetSettings {
            base_url: base_url.to_string(),
            username: "archivist".into(),
            password: "secret".into(),
        })
        .expect("client")
    }

    fn test_session(base_url: &str) -> Session {
        Session {
            token: "session-token".into(),
            base_url: base_url.to_string(),
        }
    }

    #[tokio::test]
    async fn open_session_performs_logon_handshake() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/account/logon")
                    .json_body(json!({ "username": "archivist", "password": "secret" }));
                then.status(200).json_body(json!({ "token": "abc-123" }));
            })
            .await;

        let client = test_client(&server.base_url());
        let session = client.open_session().await.expect("session");

        mock.assert();
        assert_eq!(session.token, "abc-123");
    }

    #[tokio::test]
    async fn open_session_rejects_bad_credentials() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/account/logon");
                then.status(401);
            })
            .await;

        let client = test_client(&server.base_url());
        let error = client.open_session().await.unwrap_err();
        assert!(matches!(error, CabinetError::CredentialsRejected { .. }));
    }

    #[tokio::test]
    async fn open_session_flags_malformed_url() {
        let client = test_client("not a url");
        let error = client.open_session().await.unwrap_err();
        assert!(matches!(error, CabinetError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn search_emits_expected_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/cabinets/archive/query")
                    .header(SESSION_HEADER, "session-token")
                    .json_body(json!({
                        "conditions": [
                            { "field": "DWDOCID", "values": ["DOC-1"] }
                        ],
                        "operation": "And",
                        "start": 0,
                        "count": 1
                    }));
                then.status(200).json_body(json!({
                    "items": [
                        {
                            "id": "DOC-1",
                            "contentType": "application/pdf",
                            "fields": [ { "name": "COMPANY", "value": "Acme" } ],
                            "selfLink": "/cabinets/archive/documents/DOC-1"
                        }
                    ],
                    "next": null
                }));
            })
            .await;

        let client = test_client(&server.base_url());
        let session = test_session(&server.base_url());
        let page = client
            .search(&session, "archive", &QueryExpression::by_document_id("DOC-1"))
            .await
            .expect("search page");

        mock.assert();
        assert_eq!(page.items.len(), 1);
        let hit = &page.items[0];
        assert_eq!(hit.id, "DOC-1");
        assert_eq!(hit.content_type, "application/pdf");
        assert_eq!(
            hit.self_link.as_deref(),
            Some("/cabinets/archive/documents/DOC-1")
        );
    }

    #[tokio::test]
    async fn delete_document_follows_self_link_and_returns_receipt() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/cabinets/archive/documents/DOC-1")
                    .header(SESSION_HEADER, "session-token");
                then.status(200).body("deleted:DOC-1");
            })
            .await;

        let client = test_client(&server.base_url());
        let session = test_session(&server.base_url());
        let document = Document {
            id: "DOC-1".into(),
            content_type: "application/pdf".into(),
            fields: Vec::new(),
            self_link: Some("/cabinets/archive/documents/DOC-1".into()),
        };

        let receipt = client
            .delete_document(&session, &document)
            .await
            .expect("receipt");

        mock.assert();
        assert_eq!(receipt, "deleted:DOC-1");
    }

    #[tokio::test]
    async fn delete_document_requires_self_link() {
        let server = MockServer::start_async().await;
        let client = test_client(&server.base_url());
        let session = test_session(&server.base_url());
        let document = Document {
            id: "DOC-2".into(),
            content_type: "application/pdf".into(),
            fields: Vec::new(),
            self_link: None,
        };

        let error = client.delete_document(&session, &document).await.unwrap_err();
        assert!(matches!(error, CabinetError::MissingDeleteLink { .. }));
    }

    #[tokio::test]
    async fn create_document_uploads_staged_file() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/cabinets/archive/documents")
                    .header(SESSION_HEADER, "session-token")
                    .body_contains("report.pdf")
                    .body_contains("COMPANY");
                then.status(201).json_body(json!({
                    "id": "DOC-9",
                    "contentType": "application/pdf",
                    "fields": [ { "name": "COMPANY", "value": "Acme" } ],
                    "selfLink": "/cabinets/archive/documents/DOC-9"
                }));
            })
            .await;

        let staged = std::env::temp_dir().join("cabinet-gateway-client-test.pdf");
        tokio::fs::write(&staged, b"%PDF-1.4 test")
            .await
            .expect("write staged file");

        let client = test_client(&server.base_url());
        let session = test_session(&server.base_url());
        let fields = [IndexField::new("COMPANY", "Acme")];
        let document = client
            .create_document(
                &session,
                "archive",
                &fields,
                &staged,
                "report.pdf",
                "application/pdf",
            )
            .await
            .expect("created document");

        tokio::fs::remove_file(&staged).await.ok();

        mock.assert();
        assert_eq!(document.id, "DOC-9");
    }
}
