//! HTTP surface for the cabinet gateway.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `GET /documents` – List every document in the configured cabinet.
//! - `POST /documents` – Upload a file with index metadata (multipart form with
//!   `companyName`, `contactName`, `birthday`, and a `file` part).
//! - `DELETE /documents/:id` – Locate a document by identifier and delete it.
//! - `GET /metrics` – Observe request counters.
//!
//! Handlers are generic over [`GatewayApi`] so the routing layer can be exercised against a
//! stub service. Backend failures map to `404` for a missing delete target and `500` with a
//! safe message for everything else; the detail only reaches the log.

use crate::cabinet::Document;
use crate::gateway::{DeletionReceipt, GatewayApi, GatewayError, UploadMetadata};
use crate::metrics::MetricsSnapshot;
use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde::Serialize;
use std::sync::Arc;
use time::Date;

/// Build the HTTP router exposing the document gateway surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: GatewayApi + 'static,
{
    Router::new()
        .route(
            "/documents",
            get(list_documents::<S>).post(upload_document::<S>),
        )
        .route("/documents/:id", delete(delete_document::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .with_state(service)
}

/// Response body for `GET /documents`.
#[derive(Serialize)]
struct DocumentsResponse {
    documents: Vec<Document>,
}

/// List every document stored in the configured cabinet.
async fn list_documents<S>(
    State(service): State<Arc<S>>,
) -> Result<Json<DocumentsResponse>, AppError>
where
    S: GatewayApi,
{
    let documents = service.list_documents().await?;
    Ok(Json(DocumentsResponse { documents }))
}

/// Upload a document assembled from multipart form fields.
///
/// Expects text parts `companyName`, `contactName`, and `birthday` (ISO `yyyy-MM-dd`) plus a
/// binary `file` part carrying the original file name and content type. Missing or malformed
/// parts are a `400`; everything past form validation surfaces through [`GatewayError`].
async fn upload_document<S>(
    State(service): State<Arc<S>>,
    mut multipart: Multipart,
) -> Result<Json<Document>, AppError>
where
    S: GatewayApi,
{
    let mut company = None;
    let mut contact = None;
    let mut birthday = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("Malformed multipart body: {err}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "companyName" => company = Some(read_text(field, &name).await?),
            "contactName" => contact = Some(read_text(field, &name).await?),
            "birthday" => birthday = Some(read_text(field, &name).await?),
            "file" => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::BadRequest("File part has no filename".into()))?;
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::BadRequest("File part has no content type".into()))?;
                let bytes = field.bytes().await.map_err(|err| {
                    AppError::BadRequest(format!("Failed to read file part: {err}"))
                })?;
                file = Some((file_name, content_type, bytes));
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let company = company.ok_or_else(|| missing_field("companyName"))?;
    let contact = contact.ok_or_else(|| missing_field("contactName"))?;
    let birthday = birthday.ok_or_else(|| missing_field("birthday"))?;
    let (file_name, content_type, bytes) = file.ok_or_else(|| missing_field("file"))?;

    let birthday = Date::parse(&birthday, crate::cabinet::fields::DATE_FORMAT)
        .map_err(|_| AppError::BadRequest("birthday must be an ISO date (yyyy-MM-dd)".into()))?;

    let metadata = UploadMetadata {
        company,
        contact,
        birthday,
    };
    let document = service
        .upload_document(metadata, &file_name, &content_type, bytes.to_vec())
        .await?;
    Ok(Json(document))
}

/// Delete a document by its identifier.
async fn delete_document<S>(
    State(service): State<Arc<S>>,
    Path(document_id): Path<String>,
) -> Result<Json<DeletionReceipt>, AppError>
where
    S: GatewayApi,
{
    let receipt = service.delete_document(&document_id).await?;
    Ok(Json(receipt))
}

/// Return the current request counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: GatewayApi,
{
    Json(service.metrics_snapshot())
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|err| AppError::BadRequest(format!("Failed to read field '{name}': {err}")))
}

fn missing_field(name: &str) -> AppError {
    AppError::BadRequest(format!("Missing multipart field '{name}'"))
}

enum AppError {
    BadRequest(String),
    Gateway(GatewayError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::Gateway(GatewayError::NotFound(document_id)) => {
                tracing::info!(document_id, "Document not found");
                (StatusCode::NOT_FOUND, "Document not found").into_response()
            }
            Self::Gateway(error) => {
                // Full detail stays in the log; clients only see a safe message.
                tracing::error!(error = %error, source = ?std::error::Error::source(&error), "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(inner: GatewayError) -> Self {
        Self::Gateway(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::create_router;
    use crate::cabinet::{CabinetError, Document, IndexField};
    use crate::gateway::{DeletionReceipt, GatewayApi, GatewayError, UploadMetadata};
    use crate::metrics::MetricsSnapshot;
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use std::sync::Arc;
    use time::macros::date;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Clone, Debug)]
    struct UploadCall {
        metadata_company: String,
        metadata_contact: String,
        metadata_birthday: time::Date,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    }

    #[derive(Default)]
    struct StubGatewayService {
        documents: Vec<Document>,
        uploads: Mutex<Vec<UploadCall>>,
        deletes: Mutex<Vec<String>>,
        missing: bool,
        delete_rejected: bool,
    }

    #[async_trait]
    impl GatewayApi for StubGatewayService {
        async fn list_documents(&self) -> Result<Vec<Document>, GatewayError> {
            Ok(self.documents.clone())
        }

        async fn upload_document(
            &self,
            metadata: UploadMetadata,
            file_name: &str,
            content_type: &str,
            bytes: Vec<u8>,
        ) -> Result<Document, GatewayError> {
            self.uploads.lock().await.push(UploadCall {
                metadata_company: metadata.company,
                metadata_contact: metadata.contact,
                metadata_birthday: metadata.birthday,
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
                bytes,
            });
            Ok(Document {
                id: "DOC-NEW".into(),
                content_type: content_type.to_string(),
                fields: vec![IndexField::new("COMPANY", "Acme")],
                self_link: None,
            })
        }

        async fn delete_document(
            &self,
            document_id: &str,
        ) -> Result<DeletionReceipt, GatewayError> {
            if self.missing {
                return Err(GatewayError::NotFound(document_id.to_string()));
            }
            if self.delete_rejected {
                return Err(GatewayError::Deletion(CabinetError::UnexpectedStatus {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    body: "cabinet unavailable".into(),
                }));
            }
            self.deletes.lock().await.push(document_id.to_string());
            Ok(DeletionReceipt {
                document_id: document_id.to_string(),
                receipt: format!("deleted:{document_id}"),
            })
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot {
                list_requests: 3,
                documents_uploaded: 2,
                documents_deleted: 1,
            }
        }
    }

    fn multipart_body(boundary: &str) -> String {
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"companyName\"\r\n\r\n\
             Acme\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"contactName\"\r\n\r\n\
             Jane Doe\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"birthday\"\r\n\r\n\
             1990-05-12\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"cv.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             %PDF-1.4\r\n\
             --{boundary}--\r\n"
        )
    }

    #[tokio::test]
    async fn list_route_returns_documents() {
        let service = Arc::new(StubGatewayService {
            documents: vec![Document {
                id: "DOC-1".into(),
                content_type: "application/pdf".into(),
                fields: vec![IndexField::new("COMPANY", "Acme")],
                self_link: None,
            }],
            ..StubGatewayService::default()
        });
        let app = create_router(service);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/documents")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["documents"][0]["id"], "DOC-1");
        assert_eq!(json["documents"][0]["contentType"], "application/pdf");
    }

    #[tokio::test]
    async fn upload_route_accepts_multipart_form() {
        let service = Arc::new(StubGatewayService::default());
        let app = create_router(service.clone());

        let boundary = "gateway-test-boundary";
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/documents")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(multipart_body(boundary)))
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["id"], "DOC-NEW");

        let uploads = service.uploads.lock().await;
        assert_eq!(uploads.len(), 1);
        let call = &uploads[0];
        assert_eq!(call.metadata_company, "Acme");
        assert_eq!(call.metadata_contact, "Jane Doe");
        assert_eq!(call.metadata_birthday, date!(1990 - 05 - 12));
        assert_eq!(call.file_name, "cv.pdf");
        assert_eq!(call.content_type, "application/pdf");
        assert_eq!(call.bytes, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn upload_route_rejects_missing_fields() {
        let service = Arc::new(StubGatewayService::default());
        let app = create_router(service.clone());

        let boundary = "gateway-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"companyName\"\r\n\r\n\
             Acme\r\n\
             --{boundary}--\r\n"
        );
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/documents")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(service.uploads.lock().await.is_empty());
    }

    #[tokio::test]
    async fn delete_route_maps_not_found_to_404() {
        let service = Arc::new(StubGatewayService {
            missing: true,
            ..StubGatewayService::default()
        });
        let app = create_router(service);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/documents/DOC-404")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_route_hides_backend_detail_behind_500() {
        let service = Arc::new(StubGatewayService {
            delete_rejected: true,
            ..StubGatewayService::default()
        });
        let app = create_router(service);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/documents/DOC-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let text = String::from_utf8(body.to_vec()).expect("utf8 body");
        assert!(!text.contains("cabinet unavailable"));
    }

    #[tokio::test]
    async fn delete_route_returns_receipt() {
        let service = Arc::new(StubGatewayService::default());
        let app = create_router(service.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/documents/DOC-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["documentId"], "DOC-1");
        assert_eq!(json["receipt"], "deleted:DOC-1");
        assert_eq!(service.deletes.lock().await.as_slice(), ["DOC-1"]);
    }

    #[tokio::test]
    async fn metrics_route_reports_counters() {
        let service = Arc::new(StubGatewayService::default());
        let app = create_router(service);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/metrics")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(json["list_requests"], 3);
        assert_eq!(json["documents_uploaded"], 2);
        assert_eq!(json["documents_deleted"], 1);
    }
}
