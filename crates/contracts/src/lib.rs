//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Activities carry an absolute UTC start timestamp (`DateTime<Utc>`)
//! - Stream samples carry offsets in seconds relative to that start
//! - Merged points carry absolute UTC timestamps

mod activity;
mod activity_id;
mod blueprint;
mod document;
mod error;
mod sink;
mod stream;
mod track;

pub use activity::*;
pub use activity_id::ActivityId;
pub use blueprint::*;
pub use document::*;
pub use error::*;
pub use sink::*;
pub use stream::*;
pub use track::*;
