//! Command implementations.

mod auth_url;
mod list;
mod merge;
mod validate;

pub use auth_url::run_auth_url;
pub use list::run_list;
pub use merge::run_merge;
pub use validate::run_validate;

use std::path::Path;
use std::sync::Arc;

use activity_source::StravaClient;
use anyhow::{Context, Result};
use chrono::Utc;
use config_loader::ConfigLoader;
use contracts::MergeBlueprint;
use tracing::info;

/// Load the configuration file, or defaults when it does not exist,
/// then overlay credentials from the environment
pub(crate) fn load_blueprint(path: &Path) -> Result<MergeBlueprint> {
    let blueprint = if path.exists() {
        info!(config = %path.display(), "Loading configuration");
        ConfigLoader::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?
    } else {
        info!(config = %path.display(), "Configuration file not found, using defaults");
        MergeBlueprint::default()
    };

    ConfigLoader::apply_env_overrides(blueprint).context("Failed to apply environment overrides")
}

/// Build an authenticated API client
pub(crate) fn connect(blueprint: &MergeBlueprint) -> Result<Arc<StravaClient>> {
    let token = blueprint
        .auth
        .bearer_token(Utc::now())
        .context("Set STRAVA_ACCESS_TOKEN or auth.access_token")?;
    let client = StravaClient::new(&blueprint.api, token).context("Failed to build API client")?;
    Ok(Arc::new(client))
}
