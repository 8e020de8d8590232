//! # Activity Source
//!
//! Remote activity access module.
//!
//! Responsibilities:
//! - Look up activity summaries and sample streams
//! - List recent activities
//! - Upload rendered documents
//! - Fetch many activities concurrently, preserving request order
//! - Provide a mock client for tests
//!
//! ## Feature Flags
//!
//! - `strava-api`: Enable the real Strava HTTP client (requires reqwest)

pub mod client;
pub mod error;
pub mod fetcher;
pub mod mock_client;
pub mod wire;

#[cfg(feature = "strava-api")]
pub mod strava_client;

pub use client::ActivityClient;
pub use error::{Result, SourceError};
pub use fetcher::{fetch_all, fetch_one};
pub use mock_client::{MockActivityClient, MockConfig, UploadedDocument};

#[cfg(feature = "strava-api")]
pub use strava_client::{authorize_url, StravaClient, OAUTH_SCOPE};
