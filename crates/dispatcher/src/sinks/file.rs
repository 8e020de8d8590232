//! FileSink - persists the rendered document to disk

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use contracts::{DocumentSink, MergeError, RenderedActivity, SinkReceipt};
use serde::Serialize;
use tracing::{debug, error, instrument};

/// Configuration for FileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Output directory
    pub base_path: PathBuf,
    /// Fixed file name; defaults to the document's own (`merged.tcx`)
    pub file_name: Option<String>,
    /// Write a `<stem>.json` sidecar with name/description/size
    pub write_meta: bool,
}

impl FileSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = params.get("file_name").filter(|n| !n.is_empty()).cloned();
        let write_meta = params
            .get("write_meta")
            .is_some_and(|v| matches!(v.as_str(), "true" | "1" | "yes"));

        Self {
            base_path,
            file_name,
            write_meta,
        }
    }
}

/// Sidecar describing a persisted document
#[derive(Debug, Serialize)]
struct DocumentMeta<'a> {
    name: &'a str,
    description: &'a str,
    format: &'a str,
    bytes: usize,
    written_at: DateTime<Utc>,
}

/// Sink that writes the document into a directory
pub struct FileSink {
    name: String,
    config: FileSinkConfig,
}

impl FileSink {
    /// Create a new FileSink; the directory is created on first write
    pub fn new(name: impl Into<String>, config: FileSinkConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Create from params map (for factory)
    pub fn from_params(name: impl Into<String>, params: &HashMap<String, String>) -> Self {
        Self::new(name, FileSinkConfig::from_params(params))
    }

    fn target_path(&self, document: &RenderedActivity) -> PathBuf {
        let file_name = self
            .config
            .file_name
            .clone()
            .unwrap_or_else(|| document.file_name());
        self.config.base_path.join(file_name)
    }

    /// Write via a temp file and rename, so a failed write leaves no partial document
    fn write_document(&self, path: &Path, document: &RenderedActivity) -> std::io::Result<()> {
        fs::create_dir_all(&self.config.base_path)?;
        let tmp = path.with_extension("part");
        fs::write(&tmp, &document.body)?;
        fs::rename(&tmp, path)?;

        if self.config.write_meta {
            let meta = DocumentMeta {
                name: &document.name,
                description: &document.description,
                format: document.format.as_str(),
                bytes: document.len(),
                written_at: Utc::now(),
            };
            let json = serde_json::to_vec_pretty(&meta).map_err(std::io::Error::other)?;
            fs::write(path.with_extension("json"), json)?;
        }
        Ok(())
    }
}

impl DocumentSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "file_sink_write", skip(self, document), fields(sink = %self.name))]
    async fn write(&mut self, document: &RenderedActivity) -> Result<SinkReceipt, MergeError> {
        let path = self.target_path(document);
        self.write_document(&path, document).map_err(|e| {
            error!(sink = %self.name, path = %path.display(), error = %e, "Write failed");
            MergeError::sink_write(&self.name, e.to_string())
        })?;

        debug!(path = %path.display(), bytes = document.len(), "Document persisted");
        Ok(SinkReceipt::Persisted { path })
    }

    async fn close(&mut self) -> Result<(), MergeError> {
        Ok(())
    }
}
