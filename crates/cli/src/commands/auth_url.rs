//! `auth-url` command implementation.

use anyhow::{Context, Result};

use crate::cli::AuthUrlArgs;
use crate::commands::load_blueprint;

/// Execute the `auth-url` command
pub fn run_auth_url(args: &AuthUrlArgs) -> Result<()> {
    let mut auth = load_blueprint(&args.config.config)?.auth;
    if let Some(ref client_id) = args.client_id {
        auth.client_id = Some(client_id.clone());
    }
    if let Some(ref redirect_uri) = args.redirect_uri {
        auth.redirect_uri = redirect_uri.clone();
    }

    let url = activity_source::authorize_url(&auth).context("Cannot build authorization URL")?;

    println!("Open this URL in your browser and authorize the app:");
    println!("{url}");
    println!();
    println!("After authorizing you are redirected to {}?code=...", auth.redirect_uri);
    println!(
        "Exchange the code for a token, then set {} (and optionally {}).",
        config_loader::ENV_ACCESS_TOKEN,
        config_loader::ENV_TOKEN_EXPIRES
    );
    Ok(())
}
