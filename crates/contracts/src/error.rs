//! Layered error definitions
//!
//! Categorized by source: request / auth / remote / config / sink

use thiserror::Error;

use crate::ActivityId;

/// Unified error type
///
/// Every variant aborts the whole merge. There is no partial success.
#[derive(Debug, Error)]
pub enum MergeError {
    // ===== Request Errors =====
    /// Fewer than two activities supplied
    #[error("at least 2 activities required, got {count}")]
    InsufficientActivities { count: usize },

    // ===== Auth Errors =====
    /// No usable credential for the requesting identity
    #[error("not authenticated: {message}")]
    Unauthenticated { message: String },

    // ===== Remote Errors =====
    /// Activity lookup or stream fetch found nothing
    #[error("activity {id} not found")]
    ActivityNotFound { id: ActivityId },

    /// Caller lacks access to the activity
    #[error("not authorized to access activity {id}: {message}")]
    Unauthorized { id: ActivityId, message: String },

    /// Remote service declined the rendered document
    #[error("upload rejected (status {status}): {message}")]
    UploadRejected { status: u16, message: String },

    /// Transport-level failure talking to the remote service
    #[error("transport error: {message}")]
    Transport { message: String },

    /// Remote payload could not be decoded
    #[error("decode error: {message}")]
    Decode { message: String },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MergeError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create unauthenticated error
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Create upload rejection
    pub fn upload_rejected(status: u16, message: impl Into<String>) -> Self {
        Self::UploadRejected {
            status,
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Stable short kind name (for metrics labels and JSON output)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientActivities { .. } => "insufficient_activities",
            Self::Unauthenticated { .. } => "unauthenticated",
            Self::ActivityNotFound { .. } => "activity_not_found",
            Self::Unauthorized { .. } => "unauthorized",
            Self::UploadRejected { .. } => "upload_rejected",
            Self::Transport { .. } => "transport",
            Self::Decode { .. } => "decode",
            Self::ConfigParse { .. } => "config_parse",
            Self::ConfigValidation { .. } => "config_validation",
            Self::SinkWrite { .. } => "sink_write",
            Self::Io(_) => "io",
        }
    }
}
