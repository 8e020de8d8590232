//! `validate` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{MergeBlueprint, SinkType};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    base_url: String,
    channels: Vec<String>,
    sink_count: usize,
    upload: bool,
    token_configured: bool,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    let path = &args.config.config;
    info!(config = %path.display(), "Validating configuration");

    let result = validate_config(path);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{json}");
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(path: &std::path::Path) -> ValidationResult {
    let config_path = path.display().to_string();

    if !path.exists() {
        return invalid(config_path, format!("File not found: {}", path.display()));
    }

    let blueprint = match ConfigLoader::load_from_path(path)
        .and_then(ConfigLoader::apply_env_overrides)
    {
        Ok(blueprint) => blueprint,
        Err(e) => return invalid(config_path, e.to_string()),
    };

    let warnings = collect_warnings(&blueprint);
    ValidationResult {
        valid: true,
        config_path,
        error: None,
        warnings: (!warnings.is_empty()).then_some(warnings),
        summary: Some(ConfigSummary {
            version: format!("{:?}", blueprint.version),
            base_url: blueprint.api.base_url.clone(),
            channels: blueprint
                .merge
                .channels
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            sink_count: blueprint.sinks.len(),
            upload: blueprint.has_upload_sink(),
            token_configured: blueprint.auth.access_token.is_some(),
        }),
    }
}

fn invalid(config_path: String, error: String) -> ValidationResult {
    ValidationResult {
        valid: false,
        config_path,
        error: Some(error),
        warnings: None,
        summary: None,
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &MergeBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.sinks.is_empty() {
        warnings.push("No sinks configured - merged documents will be discarded".to_string());
    }

    let persists = blueprint
        .sinks
        .iter()
        .any(|s| matches!(s.sink_type, SinkType::Upload | SinkType::File));
    if !blueprint.sinks.is_empty() && !persists {
        warnings.push("Only log sinks configured - nothing will be uploaded or saved".to_string());
    }

    if blueprint.has_upload_sink() && blueprint.auth.access_token.is_none() {
        warnings.push(format!(
            "Upload sink configured but no access token; set {}",
            config_loader::ENV_ACCESS_TOKEN
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  API: {}", summary.base_url);
            println!("  Channels: {}", summary.channels.join(", "));
            println!("  Sinks: {}", summary.sink_count);
            println!("  Upload: {}", if summary.upload { "yes" } else { "no" });
        }

        if let Some(ref warnings) = result.warnings {
            println!("\nWarnings:");
            for warning in warnings {
                println!("  - {warning}");
            }
        }
    } else {
        println!("Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {error}");
        }
    }
}
