//! Merge pipeline orchestration.

mod orchestrator;
mod stats;

pub use orchestrator::{MergeOutcome, MergePipeline, MergeRequest};
pub use stats::MergeStats;
