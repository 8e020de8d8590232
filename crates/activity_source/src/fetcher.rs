//! Concurrent activity fetching
//!
//! Fetches summary and streams for every requested id with bounded
//! concurrency. Results come back in request order regardless of completion
//! order, and the first failure aborts the remaining fetches.

use std::sync::Arc;
use std::time::Instant;

use contracts::{ActivityId, ActivityInput, ChannelKind};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

use crate::client::ActivityClient;
use crate::error::{Result, SourceError};

/// Fetch one activity: summary first, then streams
#[instrument(level = "debug", skip(client, channels), fields(activity_id = %id))]
pub async fn fetch_one<C: ActivityClient>(
    client: &C,
    id: ActivityId,
    channels: &[ChannelKind],
) -> Result<ActivityInput> {
    let summary = client.fetch_activity(id).await?;
    let streams = client.fetch_streams(id, channels).await?;
    debug!(
        sport = %summary.sport_type,
        samples = streams.sample_count(),
        "Activity fetched"
    );
    Ok(ActivityInput::new(summary, streams))
}

/// Fetch every activity in `ids`
///
/// At most `max_concurrent` activities are in flight at once (minimum 1).
///
/// # Returns
/// One `ActivityInput` per id, in the order of `ids`
///
/// # Errors
/// The first error observed. Outstanding fetches are cancelled.
#[instrument(skip(client, ids, channels), fields(count = ids.len()))]
pub async fn fetch_all<C>(
    client: Arc<C>,
    ids: &[ActivityId],
    channels: &[ChannelKind],
    max_concurrent: usize,
) -> Result<Vec<ActivityInput>>
where
    C: ActivityClient + 'static,
{
    let started = Instant::now();
    let permits = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let channels: Arc<[ChannelKind]> = Arc::from(channels);
    let mut tasks = JoinSet::new();

    for (index, &id) in ids.iter().enumerate() {
        let client = Arc::clone(&client);
        let permits = Arc::clone(&permits);
        let channels = Arc::clone(&channels);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await.map_err(|e| SourceError::Task {
                message: e.to_string(),
            })?;
            let result = fetch_one(client.as_ref(), id, &channels).await;
            observability::record_activity_fetched(result.is_ok());
            result.map(|input| (index, input))
        });
    }

    let mut slots: Vec<Option<ActivityInput>> = vec![None; ids.len()];
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined
            .map_err(|e| SourceError::Task {
                message: e.to_string(),
            })
            .and_then(|result| result);

        match outcome {
            Ok((index, input)) => slots[index] = Some(input),
            Err(err) => {
                warn!(error = %err, "Fetch failed, cancelling remaining requests");
                tasks.abort_all();
                return Err(err);
            }
        }
    }

    observability::record_fetch_latency_ms(started.elapsed().as_secs_f64() * 1000.0);

    slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| SourceError::Task {
            message: "fetch finished with missing results".into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_client::{MockActivityClient, MockConfig};
    use chrono::{TimeZone, Utc};
    use contracts::{ActivitySummary, StreamSet};

    fn fixture(id: u64) -> ActivityInput {
        ActivityInput::new(
            ActivitySummary {
                id: ActivityId::new(id),
                name: String::new(),
                sport_type: "Ride".into(),
                start_time: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
                elapsed_time: 60,
                distance: 100.0,
            },
            StreamSet::with_time(vec![0.0; id as usize]),
        )
    }

    fn client(ids: &[u64], config: MockConfig) -> Arc<MockActivityClient> {
        let mut client = MockActivityClient::with_config(config);
        for &id in ids {
            client = client.with_activity(fixture(id));
        }
        Arc::new(client)
    }

    fn ids(raw: &[u64]) -> Vec<ActivityId> {
        raw.iter().copied().map(ActivityId::new).collect()
    }

    #[tokio::test]
    async fn test_results_keep_request_order() {
        let client = client(&[1, 2, 3, 4, 5], MockConfig::default());
        let inputs = fetch_all(client, &ids(&[5, 3, 1, 4, 2]), &ChannelKind::ALL, 2)
            .await
            .unwrap();

        let got: Vec<u64> = inputs.iter().map(|i| i.summary.id.get()).collect();
        assert_eq!(got, vec![5, 3, 1, 4, 2]);
        // Each fixture has `id` samples
        assert_eq!(inputs[0].streams.sample_count(), 5);
    }

    #[tokio::test]
    async fn test_not_found_aborts() {
        let client = client(&[1, 2], MockConfig::default());
        let err = fetch_all(client, &ids(&[1, 9, 2]), &ChannelKind::ALL, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound { id } if id.get() == 9));
    }

    #[tokio::test]
    async fn test_stream_failure_aborts() {
        let config = MockConfig {
            broken_streams: vec![ActivityId::new(2)],
            ..Default::default()
        };
        let client = client(&[1, 2], config);
        let err = fetch_all(client, &ids(&[1, 2]), &ChannelKind::ALL, 4)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Request { .. }));
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_progresses() {
        let client = client(&[1, 2], MockConfig::default());
        let inputs = fetch_all(client, &ids(&[1, 2]), &ChannelKind::ALL, 0)
            .await
            .unwrap();
        assert_eq!(inputs.len(), 2);
    }
}
