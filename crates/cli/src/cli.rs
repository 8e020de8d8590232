//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use contracts::ActivityId;
use std::path::PathBuf;

/// Longest `list --days` look-back
pub const MAX_LIST_DAYS: i64 = 36_500;

/// Strava Merge - combine several recorded activities into one upload
#[derive(Parser, Debug)]
#[command(
    name = "strava-merge",
    author,
    version,
    about = "Merge Strava activities into a single activity",
    long_about = "Fetches two or more Strava activities, merges their sample streams into one \n\
                  time-ordered track with continuous distance, renders it as TCX and uploads \n\
                  it as a new activity (or writes it to disk)."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "STRAVA_MERGE_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "STRAVA_MERGE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Expose Prometheus metrics on this port
    #[arg(long, global = true, env = "STRAVA_MERGE_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge activities and upload the result
    Merge(MergeArgs),

    /// List recent activities
    List(ListArgs),

    /// Validate configuration file
    Validate(ValidateArgs),

    /// Print the OAuth authorization URL
    AuthUrl(AuthUrlArgs),
}

/// Configuration file option shared by every command
#[derive(Args, Debug, Clone)]
pub struct ConfigArg {
    /// Path to configuration file (TOML or JSON); defaults apply when it does not exist
    #[arg(
        short,
        long,
        default_value = "strava-merge.toml",
        env = "STRAVA_MERGE_CONFIG"
    )]
    pub config: PathBuf,
}

/// Arguments for the `merge` command
#[derive(Parser, Debug, Clone)]
pub struct MergeArgs {
    /// Activity ids, in the order their distances are chained
    #[arg(required = true, value_name = "ID")]
    pub ids: Vec<ActivityId>,

    #[command(flatten)]
    pub config: ConfigArg,

    /// Name of the merged activity
    #[arg(long)]
    pub name: Option<String>,

    /// Description of the merged activity
    #[arg(long)]
    pub description: Option<String>,

    /// Also write the TCX document into this directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Skip the upload sink
    #[arg(long)]
    pub no_upload: bool,

    /// Check request and configuration, then exit without fetching
    #[arg(long)]
    pub dry_run: bool,

    /// Print run statistics after the merge
    #[arg(long)]
    pub stats: bool,
}

/// Arguments for the `list` command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// Look back this many days
    #[arg(long, default_value = "7", value_parser = clap::value_parser!(u32).range(1..=MAX_LIST_DAYS))]
    pub days: u32,

    /// Maximum number of activities (defaults to api.per_page)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `auth-url` command
#[derive(Parser, Debug)]
pub struct AuthUrlArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// OAuth application id (overrides auth.client_id)
    #[arg(long, env = "STRAVA_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Redirect target (overrides auth.redirect_uri)
    #[arg(long)]
    pub redirect_uri: Option<String>,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_merge() {
        let cli = Cli::try_parse_from([
            "strava-merge",
            "-v",
            "merge",
            "111",
            "222",
            "--name",
            "Brick",
            "--no-upload",
            "--output",
            "out",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Commands::Merge(args) = cli.command else {
            panic!("expected merge command");
        };
        assert_eq!(args.ids, vec![ActivityId::new(111), ActivityId::new(222)]);
        assert_eq!(args.name.as_deref(), Some("Brick"));
        assert!(args.no_upload);
        assert_eq!(args.output, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_merge_rejects_non_numeric_id() {
        let result = Cli::try_parse_from(["strava-merge", "merge", "111", "abc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["strava-merge", "-q", "-v", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_defaults() {
        let cli = Cli::try_parse_from(["strava-merge", "list"]).unwrap();
        let Commands::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.days, 7);
        assert_eq!(args.limit, None);
    }

    #[test]
    fn test_list_days_bounded() {
        assert!(Cli::try_parse_from(["strava-merge", "list", "--days", "0"]).is_err());
        assert!(Cli::try_parse_from(["strava-merge", "list", "--days", "4000000000"]).is_err());
        assert!(Cli::try_parse_from(["strava-merge", "list", "--days", "36500"]).is_ok());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
