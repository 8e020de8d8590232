//! UploadSink - hands the document to the remote service

use std::sync::Arc;

use activity_source::ActivityClient;
use contracts::{DocumentSink, MergeError, RenderedActivity, SinkReceipt};
use tracing::{info, instrument, warn};

/// Sink that uploads the document as a new activity
pub struct UploadSink<C> {
    name: String,
    client: Arc<C>,
}

impl<C: ActivityClient> UploadSink<C> {
    pub fn new(name: impl Into<String>, client: Arc<C>) -> Self {
        Self {
            name: name.into(),
            client,
        }
    }
}

impl<C: ActivityClient> DocumentSink for UploadSink<C> {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "upload_sink_write", skip(self, document), fields(sink = %self.name))]
    async fn write(&mut self, document: &RenderedActivity) -> Result<SinkReceipt, MergeError> {
        match self.client.upload(document).await {
            Ok(upload_id) => {
                info!(sink = %self.name, upload_id, "Merged activity uploaded");
                Ok(SinkReceipt::Uploaded { upload_id })
            }
            Err(e) => {
                warn!(sink = %self.name, error = %e, "Upload failed");
                Err(e.into())
            }
        }
    }

    async fn close(&mut self) -> Result<(), MergeError> {
        Ok(())
    }
}
