//! MergeBlueprint - Config Loader output
//!
//! Describes the complete tool configuration: remote API, credentials,
//! merge defaults, output routing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use crate::{ChannelKind, MergeError};

/// Default remote API root
pub const DEFAULT_API_BASE_URL: &str = "https://www.strava.com/api/v3";

/// Default OAuth authorize endpoint
pub const DEFAULT_AUTHORIZE_URL: &str = "https://www.strava.com/oauth/authorize";

/// Default name given to the merged activity
pub const DEFAULT_MERGED_NAME: &str = "Merged Activity";

/// Default description given to the merged activity
pub const DEFAULT_MERGED_DESCRIPTION: &str = "Merged from multiple activities";

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete tool configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MergeBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Remote API settings
    #[serde(default)]
    #[validate(nested)]
    pub api: ApiConfig,

    /// Credentials
    #[serde(default)]
    pub auth: AuthConfig,

    /// Merge defaults
    #[serde(default)]
    #[validate(nested)]
    pub merge: MergeSettings,

    /// Output routing
    #[serde(default = "default_sinks")]
    pub sinks: Vec<SinkConfig>,
}

impl Default for MergeBlueprint {
    fn default() -> Self {
        Self {
            version: ConfigVersion::default(),
            api: ApiConfig::default(),
            auth: AuthConfig::default(),
            merge: MergeSettings::default(),
            sinks: default_sinks(),
        }
    }
}

fn default_sinks() -> Vec<SinkConfig> {
    vec![
        SinkConfig {
            name: "log".to_string(),
            sink_type: SinkType::Log,
            params: HashMap::new(),
        },
        SinkConfig {
            name: "strava".to_string(),
            sink_type: SinkType::Upload,
            params: HashMap::new(),
        },
    ]
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiConfig {
    /// API root, e.g. "https://www.strava.com/api/v3"
    #[serde(default = "default_base_url")]
    #[validate(length(min = 1))]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,

    /// Upper bound on concurrent activity fetches
    #[serde(default = "default_max_concurrent_fetches")]
    #[validate(range(min = 1, max = 32))]
    pub max_concurrent_fetches: usize,

    /// Page size for activity listing
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 200))]
    pub per_page: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            per_page: default_per_page(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_fetches() -> usize {
    4
}

fn default_per_page() -> u32 {
    50
}

/// Credentials
///
/// Token exchange is out of scope; a ready access token is expected here or
/// in the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token
    #[serde(default)]
    pub access_token: Option<String>,

    /// Token expiry (unix seconds, 0 or absent = unknown)
    #[serde(default)]
    pub expires_at: Option<i64>,

    /// OAuth application id (only for `auth-url`)
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth redirect target (only for `auth-url`)
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// OAuth authorize endpoint
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            expires_at: None,
            client_id: None,
            redirect_uri: default_redirect_uri(),
            authorize_url: default_authorize_url(),
        }
    }
}

fn default_redirect_uri() -> String {
    "http://localhost".to_string()
}

fn default_authorize_url() -> String {
    DEFAULT_AUTHORIZE_URL.to_string()
}

impl AuthConfig {
    /// Resolve a usable bearer token at `now`
    ///
    /// # Errors
    /// `Unauthenticated` when no token is configured or it has expired.
    pub fn bearer_token(&self, now: DateTime<Utc>) -> Result<&str, MergeError> {
        let token = self
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| MergeError::unauthenticated("no access token configured"))?;

        match self.expires_at {
            Some(expires_at) if expires_at > 0 && expires_at <= now.timestamp() => {
                Err(MergeError::unauthenticated(format!(
                    "access token expired at {expires_at}"
                )))
            }
            _ => Ok(token),
        }
    }
}

/// Merge defaults
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MergeSettings {
    /// Channels requested from the stream endpoint
    #[serde(default = "default_channels")]
    #[validate(length(min = 1))]
    pub channels: Vec<ChannelKind>,

    /// Name used when the request does not supply one
    #[serde(default = "default_name")]
    #[validate(length(min = 1))]
    pub default_name: String,

    /// Description used when the request does not supply one
    #[serde(default = "default_description")]
    pub default_description: String,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            default_name: default_name(),
            default_description: default_description(),
        }
    }
}

fn default_channels() -> Vec<ChannelKind> {
    ChannelKind::ALL.to_vec()
}

fn default_name() -> String {
    DEFAULT_MERGED_NAME.to_string()
}

fn default_description() -> String {
    DEFAULT_MERGED_DESCRIPTION.to_string()
}

/// Sink output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Log a document summary
    Log,
    /// Persist the document to disk
    File,
    /// Upload the document to the remote service
    Upload,
}

impl MergeBlueprint {
    /// Whether any configured sink uploads
    pub fn has_upload_sink(&self) -> bool {
        self.sinks.iter().any(|s| s.sink_type == SinkType::Upload)
    }

    /// Drop upload sinks (offline runs)
    pub fn without_upload(mut self) -> Self {
        self.sinks.retain(|s| s.sink_type != SinkType::Upload);
        self
    }

    /// Add or replace a file sink writing into `dir`
    pub fn with_output_dir(mut self, dir: impl Into<String>) -> Self {
        let dir = dir.into();
        if let Some(sink) = self
            .sinks
            .iter_mut()
            .find(|s| s.sink_type == SinkType::File)
        {
            sink.params.insert("base_path".to_string(), dir);
        } else {
            self.sinks.push(SinkConfig {
                name: "file".to_string(),
                sink_type: SinkType::File,
                params: HashMap::from([("base_path".to_string(), dir)]),
            });
        }
        self
    }
}
