//! # Stream Aligner
//!
//! Merges the sample streams of several activities into one track.
//!
//! Responsibilities:
//! - Build absolute-time points from per-activity channels
//! - Chain distances so they keep growing across activities
//! - Order the combined points by timestamp (stable)
//! - Sum the activities' reported totals
//!
//! ## Example
//!
//! ```ignore
//! use stream_aligner::StreamAligner;
//!
//! let inputs = activity_source::fetch_all(client, &ids, &channels, 4).await?;
//! let (track, report) = StreamAligner::new().align(&inputs)?;
//! println!("{} points, {:.0} m", track.len(), report.cumulative_distance_m);
//! ```

mod aligner;
pub mod chain;
pub mod points;

pub use aligner::{StreamAligner, MIN_ACTIVITIES};

pub use contracts::{ActivityInput, AlignReport, MergedTrack, UnifiedPoint};
