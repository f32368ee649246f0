use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing gateway activity.
#[derive(Default)]
pub struct GatewayMetrics {
    list_requests: AtomicU64,
    documents_uploaded: AtomicU64,
    documents_deleted: AtomicU64,
}

impl GatewayMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed listing request.
    pub fn record_list(&self) {
        self.list_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successfully uploaded document.
    pub fn record_upload(&self) {
        self.documents_uploaded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successfully deleted document.
    pub fn record_delete(&self) {
        self.documents_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            list_requests: self.list_requests.load(Ordering::Relaxed),
            documents_uploaded: self.documents_uploaded.load(Ordering::Relaxed),
            documents_deleted: self.documents_deleted.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of gateway counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of listing requests served since startup.
    pub list_requests: u64,
    /// Number of documents uploaded since startup.
    pub documents_uploaded: u64,
    /// Number of documents deleted since startup.
    pub documents_deleted: u64,
}
