//! Document gateway service: listing, upload staging, search-then-delete.

pub mod service;
pub mod staging;
pub mod types;

pub use service::{GatewayApi, GatewayService};
pub use staging::StagedFile;
pub use types::{DeletionReceipt, GatewayError, UploadFailure, UploadMetadata};
