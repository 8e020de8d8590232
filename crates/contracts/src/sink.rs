//! DocumentSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for Sinks.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{MergeError, RenderedActivity};

/// Outcome of a single sink write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SinkReceipt {
    /// Summary logged, nothing stored
    Logged,
    /// Document written to disk
    Persisted { path: PathBuf },
    /// Document accepted by the remote service
    Uploaded { upload_id: u64 },
}

/// Document output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(DocumentSink: Send)]
pub trait LocalDocumentSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write the rendered document
    ///
    /// # Errors
    /// Returns write error (should include context)
    async fn write(&mut self, document: &RenderedActivity) -> Result<SinkReceipt, MergeError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), MergeError>;
}
