//! RenderedActivity - Track Serializer output
//!
//! The serialized document plus the metadata sinks need to persist or upload it.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange format tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFormat {
    /// Training Center XML
    #[default]
    Tcx,
}

impl DataFormat {
    /// Tag the upload endpoint expects in `data_type`
    pub fn as_str(self) -> &'static str {
        match self {
            DataFormat::Tcx => "tcx",
        }
    }

    /// File extension (without dot)
    pub fn extension(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered document ready for dispatch
#[derive(Debug, Clone)]
pub struct RenderedActivity {
    /// Name for the new activity
    pub name: String,

    /// Description for the new activity
    pub description: String,

    /// Document format
    pub format: DataFormat,

    /// Document bytes (UTF-8 text)
    pub body: Bytes,
}

impl RenderedActivity {
    /// Wrap rendered text
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        format: DataFormat,
        text: String,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            format,
            body: Bytes::from(text),
        }
    }

    /// File name used for persistence and as the multipart file name
    pub fn file_name(&self) -> String {
        format!("merged.{}", self.format.extension())
    }

    /// Body size in bytes
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
