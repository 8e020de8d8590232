//! Merge pipeline - coordinates fetch, align, render and dispatch.
//!
//! The pipeline is generic over the activity client, so the binary runs it
//! against the Strava API and tests run it against the mock client.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use activity_source::{fetch_all, ActivityClient};
use contracts::{ActivityId, AlignReport, MergeBlueprint, MergeError};
use dispatcher::create_dispatcher;
use stream_aligner::{StreamAligner, MIN_ACTIVITIES};
use tracing::{info, instrument, warn};
use track_serializer::{Clock, SystemClock, TrackSerializer};

use super::MergeStats;

/// One merge request
#[derive(Debug, Clone, Default)]
pub struct MergeRequest {
    /// Activities to merge, in chaining order
    pub ids: Vec<ActivityId>,

    /// Name for the merged activity (falls back to the configured default)
    pub name: Option<String>,

    /// Description for the merged activity (falls back to the configured default)
    pub description: Option<String>,
}

impl MergeRequest {
    pub fn new(ids: impl IntoIterator<Item = ActivityId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Reject requests with fewer than two activities
    pub fn check(&self) -> Result<(), MergeError> {
        if self.ids.len() < MIN_ACTIVITIES {
            return Err(MergeError::InsufficientActivities {
                count: self.ids.len(),
            });
        }
        Ok(())
    }
}

/// Result of a successful merge
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Upload id, when an upload sink accepted the document
    pub upload_id: Option<u64>,

    /// Local copy, when a file sink wrote one
    pub persisted_path: Option<PathBuf>,

    /// Trackpoints in the merged document
    pub point_count: usize,

    pub report: AlignReport,

    pub stats: MergeStats,
}

/// Merge pipeline
pub struct MergePipeline<C, K = SystemClock> {
    blueprint: MergeBlueprint,
    client: Arc<C>,
    serializer: TrackSerializer<K>,
}

impl<C: ActivityClient + 'static> MergePipeline<C, SystemClock> {
    /// Create a pipeline using the wall clock for document ids
    pub fn new(blueprint: MergeBlueprint, client: Arc<C>) -> Self {
        Self {
            blueprint,
            client,
            serializer: TrackSerializer::new(),
        }
    }
}

impl<C: ActivityClient + 'static, K: Clock> MergePipeline<C, K> {
    /// Swap the clock used to stamp rendered documents
    pub fn with_clock<K2: Clock>(self, clock: K2) -> MergePipeline<C, K2> {
        MergePipeline {
            blueprint: self.blueprint,
            client: self.client,
            serializer: TrackSerializer::with_clock(clock),
        }
    }

    pub fn blueprint(&self) -> &MergeBlueprint {
        &self.blueprint
    }

    /// Run one merge to completion
    ///
    /// # Errors
    /// Any failure aborts the merge. Nothing is dispatched unless every
    /// activity was fetched and aligned.
    #[instrument(name = "merge_pipeline_run", skip(self, request), fields(activities = request.ids.len()))]
    pub async fn run(&self, request: &MergeRequest) -> Result<MergeOutcome, MergeError> {
        let result = self.execute(request).await;
        match &result {
            Ok(outcome) => {
                observability::record_merge_result("success");
                info!(
                    points = outcome.point_count,
                    upload_id = ?outcome.upload_id,
                    "Merge complete"
                );
            }
            Err(e) => {
                observability::record_merge_result(e.kind());
                warn!(error = %e, kind = e.kind(), "Merge failed");
            }
        }
        result
    }

    async fn execute(&self, request: &MergeRequest) -> Result<MergeOutcome, MergeError> {
        let started = Instant::now();
        request.check()?;

        // Sink configuration errors surface before any remote call
        let mut dispatcher = create_dispatcher(
            self.blueprint.sinks.clone(),
            Some(Arc::clone(&self.client)),
        )?;

        let inputs = fetch_all(
            Arc::clone(&self.client),
            &request.ids,
            &self.blueprint.merge.channels,
            self.blueprint.api.max_concurrent_fetches,
        )
        .await?;
        let fetch_duration = started.elapsed();
        info!(
            activities = inputs.len(),
            elapsed_ms = fetch_duration.as_millis() as u64,
            "Activities fetched"
        );

        let (track, report) = StreamAligner::new().align(&inputs)?;

        let merge = &self.blueprint.merge;
        let name = request.name.as_deref().unwrap_or(&merge.default_name);
        let description = request
            .description
            .as_deref()
            .unwrap_or(&merge.default_description);
        let document = self.serializer.render(&track, name, description);

        let dispatched = dispatcher.dispatch(&document).await;
        let sinks = dispatcher.metrics();
        let closed = dispatcher.close().await;
        let dispatch_report = dispatched?;
        closed?;

        let stats = MergeStats {
            duration: started.elapsed(),
            fetch_duration,
            activities_fetched: inputs.len(),
            document_bytes: document.len(),
            sinks,
            alignment: observability::AlignSummary::from_report(&report),
        };

        Ok(MergeOutcome {
            upload_id: dispatch_report.upload_id(),
            persisted_path: dispatch_report.persisted_path().map(PathBuf::from),
            point_count: track.len(),
            report,
            stats,
        })
    }
}
