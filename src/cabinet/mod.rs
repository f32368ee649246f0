//! Document cabinet integration.

pub mod client;
pub mod fields;
/// Streaming helpers for walking the cabinet's paginated listings.
pub mod pager;
pub mod query;
pub mod types;

pub use client::{CabinetApi, CabinetClient};
pub use fields::build_index_fields;
pub use pager::stream_documents;
pub use query::QueryExpression;
pub use types::{
    CabinetError, CabinetSettings, Document, DocumentsPage, IndexField, Session,
};
