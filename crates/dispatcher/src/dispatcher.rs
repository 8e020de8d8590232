//! Dispatcher - hands one rendered document to every configured sink

use std::path::Path;
use std::sync::Arc;

use activity_source::ActivityClient;
use contracts::{DocumentSink, MergeError, RenderedActivity, SinkConfig, SinkReceipt, SinkType};
use tracing::{debug, info, instrument, warn};

use crate::error::DispatcherError;
use crate::metrics::{MetricsSnapshot, SinkMetrics};
use crate::sinks::{FileSink, LogSink, UploadSink};

/// A configured sink
pub enum SinkKind<C> {
    Log(LogSink),
    File(FileSink),
    Upload(UploadSink<C>),
}

impl<C: ActivityClient> DocumentSink for SinkKind<C> {
    fn name(&self) -> &str {
        match self {
            SinkKind::Log(sink) => sink.name(),
            SinkKind::File(sink) => sink.name(),
            SinkKind::Upload(sink) => sink.name(),
        }
    }

    async fn write(&mut self, document: &RenderedActivity) -> Result<SinkReceipt, MergeError> {
        match self {
            SinkKind::Log(sink) => sink.write(document).await,
            SinkKind::File(sink) => sink.write(document).await,
            SinkKind::Upload(sink) => sink.write(document).await,
        }
    }

    async fn close(&mut self) -> Result<(), MergeError> {
        match self {
            SinkKind::Log(sink) => sink.close().await,
            SinkKind::File(sink) => sink.close().await,
            SinkKind::Upload(sink) => sink.close().await,
        }
    }
}

/// Receipts from one dispatch, in sink order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub receipts: Vec<(String, SinkReceipt)>,
}

impl DispatchReport {
    /// Upload id, if an upload sink accepted the document
    pub fn upload_id(&self) -> Option<u64> {
        self.receipts.iter().find_map(|(_, receipt)| match receipt {
            SinkReceipt::Uploaded { upload_id } => Some(*upload_id),
            _ => None,
        })
    }

    /// First path the document was persisted to
    pub fn persisted_path(&self) -> Option<&Path> {
        self.receipts.iter().find_map(|(_, receipt)| match receipt {
            SinkReceipt::Persisted { path } => Some(path.as_path()),
            _ => None,
        })
    }
}

struct SinkEntry<C> {
    sink: SinkKind<C>,
    metrics: SinkMetrics,
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder<C> {
    sinks: Vec<SinkConfig>,
    client: Option<Arc<C>>,
}

impl<C: ActivityClient> DispatcherBuilder<C> {
    pub fn new(sinks: Vec<SinkConfig>) -> Self {
        Self {
            sinks,
            client: None,
        }
    }

    /// Client used by upload sinks
    pub fn with_client(mut self, client: Arc<C>) -> Self {
        self.client = Some(client);
        self
    }

    #[instrument(
        name = "dispatcher_builder_build",
        skip(self),
        fields(sink_count = self.sinks.len())
    )]
    pub fn build(self) -> Result<Dispatcher<C>, DispatcherError> {
        let sinks = self
            .sinks
            .iter()
            .map(|config| create_sink(config, self.client.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Dispatcher::with_sinks(sinks))
    }
}

/// Create a sink from configuration
#[instrument(
    name = "dispatcher_create_sink",
    skip(config, client),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
fn create_sink<C: ActivityClient>(
    config: &SinkConfig,
    client: Option<&Arc<C>>,
) -> Result<SinkKind<C>, DispatcherError> {
    match config.sink_type {
        SinkType::Log => Ok(SinkKind::Log(LogSink::new(&config.name))),
        SinkType::File => Ok(SinkKind::File(FileSink::from_params(
            &config.name,
            &config.params,
        ))),
        SinkType::Upload => {
            let client = client.ok_or_else(|| {
                DispatcherError::sink_creation(&config.name, "upload sink requires a client")
            })?;
            Ok(SinkKind::Upload(UploadSink::new(&config.name, Arc::clone(client))))
        }
    }
}

/// Sequential fan-out of a document to sinks
///
/// Sinks run in configuration order. The first failure stops the dispatch:
/// later sinks never see the document.
pub struct Dispatcher<C> {
    entries: Vec<SinkEntry<C>>,
}

impl<C: ActivityClient> Dispatcher<C> {
    /// Create a dispatcher with custom sinks (for testing)
    pub fn with_sinks(sinks: Vec<SinkKind<C>>) -> Self {
        let entries = sinks
            .into_iter()
            .map(|sink| SinkEntry {
                sink,
                metrics: SinkMetrics::new(),
            })
            .collect();
        Self { entries }
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.sink.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.entries
            .iter()
            .map(|e| (e.sink.name().to_string(), e.metrics.snapshot()))
            .collect()
    }

    /// Hand `document` to every sink
    ///
    /// # Errors
    /// The first sink error, unchanged.
    #[instrument(name = "dispatcher_dispatch", skip(self, document), fields(bytes = document.len()))]
    pub async fn dispatch(
        &mut self,
        document: &RenderedActivity,
    ) -> Result<DispatchReport, MergeError> {
        if self.entries.is_empty() {
            warn!("No sinks configured, merged document discarded");
        }

        let mut report = DispatchReport::default();
        for entry in &mut self.entries {
            let name = entry.sink.name().to_string();
            match entry.sink.write(document).await {
                Ok(receipt) => {
                    entry.metrics.record_success(document.len());
                    observability::record_sink_write(&name, true);
                    debug!(sink = %name, ?receipt, "Sink write complete");
                    report.receipts.push((name, receipt));
                }
                Err(e) => {
                    entry.metrics.record_failure();
                    observability::record_sink_write(&name, false);
                    return Err(e);
                }
            }
        }

        info!(sinks = report.receipts.len(), "Document dispatched");
        Ok(report)
    }

    /// Close every sink, reporting the first failure
    pub async fn close(mut self) -> Result<(), MergeError> {
        let mut first_error = None;
        for entry in &mut self.entries {
            if let Err(e) = entry.sink.close().await {
                warn!(sink = %entry.sink.name(), error = %e, "Sink close failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Convenience function to create a dispatcher from sink configs
pub fn create_dispatcher<C: ActivityClient>(
    sink_configs: Vec<SinkConfig>,
    client: Option<Arc<C>>,
) -> Result<Dispatcher<C>, DispatcherError> {
    let builder = DispatcherBuilder::new(sink_configs);
    match client {
        Some(client) => builder.with_client(client).build(),
        None => builder.build(),
    }
}
