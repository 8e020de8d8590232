//! # Config Loader
//!
//! Turns a `strava-merge.toml` (or `.json`) file into a validated
//! `MergeBlueprint`, then overlays credentials from the environment.
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("strava-merge.toml")).unwrap();
//! let blueprint = ConfigLoader::apply_env_overrides(blueprint).unwrap();
//! println!("{} sinks, API at {}", blueprint.sinks.len(), blueprint.api.base_url);
//! ```

mod parser;
mod validator;

pub use contracts::MergeBlueprint;
pub use parser::ConfigFormat;

use contracts::MergeError;
use std::path::Path;
use tracing::debug;

/// Environment variable holding the bearer token
pub const ENV_ACCESS_TOKEN: &str = "STRAVA_ACCESS_TOKEN";

/// Environment variable holding the token expiry (unix seconds)
pub const ENV_TOKEN_EXPIRES: &str = "STRAVA_TOKEN_EXPIRES";

/// Stateless entry point for reading, checking and serializing blueprints
pub struct ConfigLoader;

impl ConfigLoader {
    /// Read and validate the blueprint at `path`
    ///
    /// The extension picks the format: `.toml` or `.json`, case-insensitive.
    ///
    /// # Errors
    /// `Io` when unreadable, `ConfigParse` for an unknown extension or bad
    /// syntax, `ConfigValidation` when a rule is broken.
    pub fn load_from_path(path: &Path) -> Result<MergeBlueprint, MergeError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        debug!(path = %path.display(), ?format, "Loading configuration");
        Self::load_from_str(&content, format)
    }

    /// Parse and validate blueprint text in `format`
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<MergeBlueprint, MergeError> {
        Self::parse_and_validate(content, format)
    }

    /// Validate an already-built blueprint (e.g. defaults or CLI-edited)
    pub fn validate(blueprint: &MergeBlueprint) -> Result<(), MergeError> {
        validator::validate(blueprint)
    }

    /// Overlay credentials from the process environment
    ///
    /// # Errors
    /// `ConfigParse` when the expiry variable is not an integer.
    pub fn apply_env_overrides(blueprint: MergeBlueprint) -> Result<MergeBlueprint, MergeError> {
        Self::apply_overrides_from(blueprint, |key| std::env::var(key).ok())
    }

    /// Overlay credentials from an arbitrary key lookup
    ///
    /// Blank values are ignored. An expiry of 0 means "unknown".
    pub fn apply_overrides_from<F>(
        mut blueprint: MergeBlueprint,
        lookup: F,
    ) -> Result<MergeBlueprint, MergeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|v| !v.trim().is_empty()) {
            debug!("Access token taken from {}", ENV_ACCESS_TOKEN);
            blueprint.auth.access_token = Some(token.trim().to_string());
        }

        if let Some(raw) = lookup(ENV_TOKEN_EXPIRES).filter(|v| !v.trim().is_empty()) {
            let expires_at = raw.trim().parse::<i64>().map_err(|e| MergeError::ConfigParse {
                message: format!("{ENV_TOKEN_EXPIRES} must be unix seconds, got '{raw}'"),
                source: Some(Box::new(e)),
            })?;
            blueprint.auth.expires_at = Some(expires_at);
        }

        Ok(blueprint)
    }

    /// Serialize MergeBlueprint to TOML string
    pub fn to_toml(blueprint: &MergeBlueprint) -> Result<String, MergeError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| MergeError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize MergeBlueprint to JSON string
    pub fn to_json(blueprint: &MergeBlueprint) -> Result<String, MergeError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| MergeError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    fn detect_format(path: &Path) -> Result<ConfigFormat, MergeError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            MergeError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| MergeError::config_parse(format!("unsupported config format: .{ext}")))
    }

    fn read_file(path: &Path) -> Result<String, MergeError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<MergeBlueprint, MergeError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }
}
