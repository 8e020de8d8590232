//! `list` command implementation.

use activity_source::ActivityClient;
use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::info;

use crate::cli::ListArgs;
use crate::commands::{connect, load_blueprint};

/// Execute the `list` command
pub async fn run_list(args: &ListArgs) -> Result<()> {
    let blueprint = load_blueprint(&args.config.config)?;
    let client = connect(&blueprint)?;

    let after = cutoff(Utc::now(), args.days)?;
    let limit = args.limit.unwrap_or(blueprint.api.per_page);
    info!(days = args.days, limit, "Listing recent activities");

    let activities = client
        .list_activities(after, limit)
        .await
        .context("Failed to list activities")?;

    if args.json {
        let json = serde_json::to_string_pretty(&activities)
            .context("Failed to serialize activity list")?;
        println!("{json}");
        return Ok(());
    }

    if activities.is_empty() {
        println!("No activities in the past {} days.", args.days);
        return Ok(());
    }

    for activity in &activities {
        println!(
            "{:>12}  {}  {:<10} {:>8.2} km  {}",
            activity.id.get(),
            activity.start_time.format("%Y-%m-%d %H:%M"),
            activity.sport_type,
            activity.distance / 1000.0,
            activity.name
        );
    }
    if activities.len() < 2 {
        println!("\nNot enough activities to merge.");
    }
    Ok(())
}

/// Start of the look-back window ending at `now`
fn cutoff(now: DateTime<Utc>, days: u32) -> Result<DateTime<Utc>> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|span| now.checked_sub_signed(span))
        .with_context(|| format!("--days {days} reaches before the earliest representable date"))
}
