//! `merge` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::MergeBlueprint;
use strava_merge::{MergeOutcome, MergePipeline, MergeRequest};
use tracing::info;

use crate::cli::MergeArgs;
use crate::commands::{connect, load_blueprint};

/// Execute the `merge` command
pub async fn run_merge(args: &MergeArgs) -> Result<()> {
    let request = MergeRequest {
        ids: args.ids.clone(),
        name: args.name.clone(),
        description: args.description.clone(),
    };
    request.check()?;

    let mut blueprint = load_blueprint(&args.config.config)?;
    if args.no_upload || args.dry_run {
        blueprint = blueprint.without_upload();
    }
    if let Some(ref dir) = args.output {
        info!(output = %dir.display(), "Writing merged document to directory");
        blueprint = blueprint.with_output_dir(dir.display().to_string());
    }
    ConfigLoader::validate(&blueprint).context("Invalid configuration")?;

    if args.dry_run {
        info!("Dry run mode - request and configuration are valid, exiting");
        print_plan(&request, &blueprint);
        return Ok(());
    }

    let client = connect(&blueprint)?;
    let pipeline = MergePipeline::new(blueprint, client);
    let outcome = pipeline
        .run(&request)
        .await
        .with_context(|| format!("Failed to merge {} activities", request.ids.len()))?;

    print_outcome(&outcome);
    if args.stats {
        outcome.stats.print_summary();
    }
    Ok(())
}

fn print_plan(request: &MergeRequest, blueprint: &MergeBlueprint) {
    let ids: Vec<String> = request.ids.iter().map(ToString::to_string).collect();
    println!("Would merge: {}", ids.join(" + "));
    println!(
        "  Name: {}",
        request.name.as_deref().unwrap_or(&blueprint.merge.default_name)
    );
    println!(
        "  Description: {}",
        request
            .description
            .as_deref()
            .unwrap_or(&blueprint.merge.default_description)
    );
    for sink in &blueprint.sinks {
        println!("  Sink: {} ({:?})", sink.name, sink.sink_type);
    }
}

fn print_outcome(outcome: &MergeOutcome) {
    println!("Merged {} trackpoints", outcome.point_count);
    if let Some(upload_id) = outcome.upload_id {
        println!("Activity uploaded successfully (upload id {upload_id})");
    }
    if let Some(ref path) = outcome.persisted_path {
        println!("Saved to {}", path.display());
    }
}
