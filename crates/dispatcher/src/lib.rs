//! # Dispatcher
//!
//! Document distribution module.
//!
//! Responsibilities:
//! - Build sinks from `SinkConfig`
//! - Hand the rendered document to each sink in order
//! - Stop at the first failure (all-or-nothing merge)
//! - Track per-sink write metrics

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod sinks;

pub use contracts::{DocumentSink, RenderedActivity, SinkReceipt};
pub use dispatcher::{
    create_dispatcher, DispatchReport, Dispatcher, DispatcherBuilder, SinkKind,
};
pub use error::DispatcherError;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{FileSink, FileSinkConfig, LogSink, UploadSink};
