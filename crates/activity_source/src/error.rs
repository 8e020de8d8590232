//! Activity Source error types

use contracts::{ActivityId, MergeError};
use thiserror::Error;

/// Activity Source specific error
#[derive(Debug, Error)]
pub enum SourceError {
    /// Activity (or its streams) does not exist
    #[error("activity {id} not found")]
    NotFound { id: ActivityId },

    /// Activity exists but the caller may not read it
    #[error("access to activity {id} denied (status {status}): {message}")]
    Forbidden {
        id: ActivityId,
        status: u16,
        message: String,
    },

    /// Credential refused for a non-activity call
    #[error("credential refused (status {status}): {message}")]
    CredentialRefused { status: u16, message: String },

    /// Upload endpoint declined the document
    #[error("upload declined (status {status}): {body}")]
    UploadDeclined { status: u16, body: String },

    /// Unexpected HTTP status
    #[error("unexpected status {status} from {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Request could not be sent or the response could not be read
    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    /// Response body did not match the expected shape
    #[error("failed to decode {what}: {message}")]
    Decode { what: String, message: String },

    /// Fetch task panicked or was cancelled
    #[error("fetch task failed: {message}")]
    Task { message: String },

    /// Wrapped MergeError
    #[error(transparent)]
    Contract(#[from] MergeError),
}

impl SourceError {
    /// Create request error
    pub fn request(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Request {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create decode error
    pub fn decode(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            what: what.into(),
            message: message.into(),
        }
    }
}

impl From<SourceError> for MergeError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound { id } => MergeError::ActivityNotFound { id },
            SourceError::Forbidden { id, message, .. } => MergeError::Unauthorized { id, message },
            SourceError::CredentialRefused { message, .. } => MergeError::unauthenticated(message),
            SourceError::UploadDeclined { status, body } => MergeError::upload_rejected(status, body),
            SourceError::Contract(inner) => inner,
            SourceError::Decode { what, message } => MergeError::Decode {
                message: format!("{what}: {message}"),
            },
            other => MergeError::Transport {
                message: other.to_string(),
            },
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_onto_merge_errors() {
        let id = ActivityId::new(7);

        let err: MergeError = SourceError::NotFound { id }.into();
        assert!(matches!(err, MergeError::ActivityNotFound { id: got } if got == id));

        let err: MergeError = SourceError::Forbidden {
            id,
            status: 403,
            message: "private".into(),
        }
        .into();
        assert!(matches!(err, MergeError::Unauthorized { .. }));

        let err: MergeError = SourceError::UploadDeclined {
            status: 400,
            body: "bad file".into(),
        }
        .into();
        assert!(matches!(err, MergeError::UploadRejected { status: 400, .. }));

        let err: MergeError = SourceError::request("/activities/7", "timed out").into();
        assert!(matches!(err, MergeError::Transport { .. }));
        assert!(err.to_string().contains("timed out"));
    }
}
