//! Mock activity client
//!
//! In-memory fixtures for tests, with injectable failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use contracts::{
    ActivityId, ActivityInput, ActivitySummary, ChannelKind, RenderedActivity, StreamSet,
};
use tracing::instrument;

use crate::client::ActivityClient;
use crate::error::{Result, SourceError};

/// Mock client configuration
#[derive(Debug, Default, Clone)]
pub struct MockConfig {
    /// Ids answered with 403
    pub forbidden: Vec<ActivityId>,
    /// Ids whose stream call fails at the transport level
    pub broken_streams: Vec<ActivityId>,
    /// Reject uploads with this status and body
    pub reject_upload: Option<(u16, String)>,
}

/// Uploaded document, as the mock saw it
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub upload_id: u64,
    pub name: String,
    pub description: String,
    pub data_type: String,
    pub file_name: String,
    pub body: String,
}

/// Mock activity client
pub struct MockActivityClient {
    config: MockConfig,
    activities: HashMap<ActivityId, ActivityInput>,
    next_upload_id: AtomicU64,
    uploads: Mutex<Vec<UploadedDocument>>,
    summary_calls: AtomicUsize,
    stream_calls: AtomicUsize,
}

impl MockActivityClient {
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            activities: HashMap::new(),
            next_upload_id: AtomicU64::new(5000),
            uploads: Mutex::new(Vec::new()),
            summary_calls: AtomicUsize::new(0),
            stream_calls: AtomicUsize::new(0),
        }
    }

    /// Register an activity fixture
    pub fn with_activity(mut self, input: ActivityInput) -> Self {
        self.activities.insert(input.summary.id, input);
        self
    }

    /// Summary + stream calls made so far
    pub fn call_count(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst) + self.stream_calls.load(Ordering::SeqCst)
    }

    pub fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    /// Documents accepted so far
    pub fn uploads(&self) -> Vec<UploadedDocument> {
        self.uploads
            .lock()
            .map(|uploads| uploads.clone())
            .unwrap_or_default()
    }

    fn lookup(&self, id: ActivityId) -> Result<&ActivityInput> {
        if self.config.forbidden.contains(&id) {
            return Err(SourceError::Forbidden {
                id,
                status: 403,
                message: "mock: access denied".into(),
            });
        }
        self.activities
            .get(&id)
            .ok_or(SourceError::NotFound { id })
    }
}

impl Default for MockActivityClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityClient for MockActivityClient {
    #[instrument(name = "mock_fetch_activity", skip(self), fields(activity_id = %id))]
    async fn fetch_activity(&self, id: ActivityId) -> Result<ActivitySummary> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(id).map(|input| input.summary.clone())
    }

    #[instrument(name = "mock_fetch_streams", skip(self, channels), fields(activity_id = %id))]
    async fn fetch_streams(&self, id: ActivityId, channels: &[ChannelKind]) -> Result<StreamSet> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        if self.config.broken_streams.contains(&id) {
            return Err(SourceError::request(
                format!("activities/{id}/streams"),
                "mock: connection reset",
            ));
        }
        self.lookup(id)
            .map(|input| input.streams.clone().retain(channels))
    }

    #[instrument(name = "mock_list_activities", skip(self))]
    async fn list_activities(
        &self,
        after: DateTime<Utc>,
        per_page: u32,
    ) -> Result<Vec<ActivitySummary>> {
        let mut listed: Vec<ActivitySummary> = self
            .activities
            .values()
            .map(|input| input.summary.clone())
            .filter(|summary| summary.start_time > after)
            .collect();
        listed.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        listed.truncate(per_page as usize);
        Ok(listed)
    }

    #[instrument(name = "mock_upload", skip(self, document), fields(name = %document.name))]
    async fn upload(&self, document: &RenderedActivity) -> Result<u64> {
        if let Some((status, body)) = &self.config.reject_upload {
            return Err(SourceError::UploadDeclined {
                status: *status,
                body: body.clone(),
            });
        }

        let upload_id = self.next_upload_id.fetch_add(1, Ordering::SeqCst);
        let record = UploadedDocument {
            upload_id,
            name: document.name.clone(),
            description: document.description.clone(),
            data_type: document.format.as_str().to_string(),
            file_name: document.file_name(),
            body: String::from_utf8_lossy(&document.body).into_owned(),
        };
        self.uploads
            .lock()
            .map_err(|_| SourceError::Task {
                message: "mock upload log poisoned".into(),
            })?
            .push(record);
        Ok(upload_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use contracts::DataFormat;

    fn fixture(id: u64, hour: u32) -> ActivityInput {
        ActivityInput::new(
            ActivitySummary {
                id: ActivityId::new(id),
                name: format!("Activity {id}"),
                sport_type: "Run".into(),
                start_time: Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap(),
                elapsed_time: 600,
                distance: 1000.0,
            },
            StreamSet::with_time(vec![0.0, 1.0]).heartrate(vec![120.0, 121.0]),
        )
    }

    #[tokio::test]
    async fn test_fetch_known_and_unknown() {
        let client = MockActivityClient::new().with_activity(fixture(1, 8));

        let summary = client.fetch_activity(ActivityId::new(1)).await.unwrap();
        assert_eq!(summary.name, "Activity 1");

        let err = client.fetch_activity(ActivityId::new(2)).await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_streams_respect_requested_channels() {
        let client = MockActivityClient::new().with_activity(fixture(1, 8));
        let streams = client
            .fetch_streams(ActivityId::new(1), &[ChannelKind::Time])
            .await
            .unwrap();
        assert_eq!(streams.time.len(), 2);
        assert!(streams.heartrate.is_empty());
    }

    #[tokio::test]
    async fn test_forbidden_injection() {
        let client = MockActivityClient::with_config(MockConfig {
            forbidden: vec![ActivityId::new(1)],
            ..Default::default()
        })
        .with_activity(fixture(1, 8));

        let err = client.fetch_activity(ActivityId::new(1)).await.unwrap_err();
        assert!(matches!(err, SourceError::Forbidden { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_list_newest_first_and_limited() {
        let client = MockActivityClient::new()
            .with_activity(fixture(1, 6))
            .with_activity(fixture(2, 8))
            .with_activity(fixture(3, 10));

        let after = Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap();
        let listed = client.list_activities(after, 10).await.unwrap();
        let ids: Vec<u64> = listed.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![3, 2]);

        let listed = client.list_activities(after, 1).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_upload_records_and_rejects() {
        let doc = RenderedActivity::new("Merged", "two runs", DataFormat::Tcx, "<xml/>".into());

        let client = MockActivityClient::new();
        let id = client.upload(&doc).await.unwrap();
        assert_eq!(id, 5000);
        let uploads = client.uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].data_type, "tcx");
        assert_eq!(uploads[0].file_name, "merged.tcx");

        let client = MockActivityClient::with_config(MockConfig {
            reject_upload: Some((400, "duplicate".into())),
            ..Default::default()
        });
        let err = client.upload(&doc).await.unwrap_err();
        assert!(matches!(err, SourceError::UploadDeclined { status: 400, .. }));
        assert!(client.uploads().is_empty());
    }
}
