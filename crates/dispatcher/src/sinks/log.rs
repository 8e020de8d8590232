//! LogSink - logs a document summary via tracing

use contracts::{DocumentSink, MergeError, RenderedActivity, SinkReceipt};
use tracing::{info, instrument};

/// Sink that logs document summaries (dry runs, debugging)
pub struct LogSink {
    name: String,
}

impl LogSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl DocumentSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_sink_write", skip(self, document), fields(sink = %self.name))]
    async fn write(&mut self, document: &RenderedActivity) -> Result<SinkReceipt, MergeError> {
        info!(
            sink = %self.name,
            name = %document.name,
            format = %document.format,
            bytes = document.len(),
            "Merged document ready"
        );
        Ok(SinkReceipt::Logged)
    }

    async fn close(&mut self) -> Result<(), MergeError> {
        Ok(())
    }
}
