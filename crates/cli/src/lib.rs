//! # Strava Merge
//!
//! Library side of the `strava-merge` binary.
//!
//! Exposes the merge pipeline so it can be driven with any
//! [`ActivityClient`](activity_source::ActivityClient), including the mock
//! client used by the end-to-end tests.

pub mod pipeline;

pub use pipeline::{MergeOutcome, MergePipeline, MergeRequest, MergeStats};
