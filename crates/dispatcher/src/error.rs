//! Dispatcher error types

use contracts::MergeError;
use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// Sink write error (from contract)
    #[error("sink error: {0}")]
    Contract(#[from] MergeError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatcherError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl From<DispatcherError> for MergeError {
    fn from(err: DispatcherError) -> Self {
        match err {
            DispatcherError::SinkCreation { name, message } => {
                MergeError::config_validation(format!("sinks[{name}]"), message)
            }
            DispatcherError::Contract(inner) => inner,
            DispatcherError::Io(e) => MergeError::Io(e),
        }
    }
}
