//! Activity client abstraction
//!
//! Defines the remote operations the merge needs, supporting the real API
//! client and a mock for tests.

use std::future::Future;

use chrono::{DateTime, Utc};
use contracts::{ActivityId, ActivitySummary, ChannelKind, RenderedActivity, StreamSet};

use crate::error::Result;

/// Remote activity service
///
/// Every call is authenticated with the credential the client was built with.
pub trait ActivityClient: Send + Sync {
    /// Fetch an activity summary
    ///
    /// # Errors
    /// `NotFound` for unknown ids, `Forbidden` when access is denied.
    fn fetch_activity(&self, id: ActivityId)
        -> impl Future<Output = Result<ActivitySummary>> + Send;

    /// Fetch sample channels for an activity
    ///
    /// Channels the service does not return come back as empty vectors.
    fn fetch_streams(
        &self,
        id: ActivityId,
        channels: &[ChannelKind],
    ) -> impl Future<Output = Result<StreamSet>> + Send;

    /// List the caller's activities started after `after`, newest first
    fn list_activities(
        &self,
        after: DateTime<Utc>,
        per_page: u32,
    ) -> impl Future<Output = Result<Vec<ActivitySummary>>> + Send;

    /// Upload a rendered document as a new activity
    ///
    /// # Returns
    /// Upload identifier assigned by the service
    fn upload(&self, document: &RenderedActivity) -> impl Future<Output = Result<u64>> + Send;
}
