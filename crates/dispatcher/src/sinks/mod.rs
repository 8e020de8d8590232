//! Sink implementations
//!
//! Contains LogSink, FileSink, and UploadSink.

mod file;
mod log;
mod upload;

pub use self::file::{FileSink, FileSinkConfig};
pub use self::log::LogSink;
pub use self::upload::UploadSink;
