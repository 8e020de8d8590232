//! # Integration Tests
//!
//! End-to-end tests across crates.
//!
//! Covers:
//! - Contract smoke tests
//! - Mock e2e merges (no network)
//! - Configuration driving the pipeline

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
        assert_eq!(stream_aligner::MIN_ACTIVITIES, 2);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Arc;

    use activity_source::{MockActivityClient, MockConfig};
    use chrono::{DateTime, TimeZone, Utc};
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        ActivityId, ActivityInput, ActivitySummary, MergeBlueprint, MergeError, SinkConfig,
        SinkType, StreamSet,
    };
    use strava_merge::{MergePipeline, MergeRequest};
    use track_serializer::FixedClock;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 4, 8, 0, 0).unwrap()
    }

    fn summary(id: u64, sport: &str, elapsed_time: u64, distance: f64) -> ActivitySummary {
        ActivitySummary {
            id: ActivityId::new(id),
            name: format!("Activity {id}"),
            sport_type: sport.to_string(),
            start_time: start(),
            elapsed_time,
            distance,
        }
    }

    fn three_samples(id: u64, sport: &str, distances: Vec<f64>) -> ActivityInput {
        let total = distances.last().copied().unwrap_or_default();
        ActivityInput::new(
            summary(id, sport, 2, total),
            StreamSet::with_time(vec![0.0, 1.0, 2.0]).distance(distances),
        )
    }

    fn ids(raw: &[u64]) -> Vec<ActivityId> {
        raw.iter().copied().map(ActivityId::new).collect()
    }

    fn sink(name: &str, sink_type: SinkType, params: &[(&str, String)]) -> SinkConfig {
        SinkConfig {
            name: name.to_string(),
            sink_type,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn blueprint(sinks: Vec<SinkConfig>) -> MergeBlueprint {
        MergeBlueprint {
            sinks,
            ..Default::default()
        }
    }

    fn file_sink(dir: &Path) -> SinkConfig {
        sink(
            "file",
            SinkType::File,
            &[("base_path", dir.display().to_string())],
        )
    }

    /// Trackpoint distances in document order (the lap total is skipped)
    fn trackpoint_distances(body: &str) -> Vec<String> {
        body.lines()
            .map(str::trim)
            .filter_map(|line| {
                line.strip_prefix("<DistanceMeters>")
                    .and_then(|rest| rest.strip_suffix("</DistanceMeters>"))
            })
            .skip(1)
            .map(str::to_string)
            .collect()
    }

    fn pipeline(
        bp: MergeBlueprint,
        client: &Arc<MockActivityClient>,
    ) -> MergePipeline<MockActivityClient, FixedClock> {
        MergePipeline::new(bp, Arc::clone(client)).with_clock(FixedClock(
            Utc.with_ymd_and_hms(2024, 5, 5, 0, 0, 0).unwrap(),
        ))
    }

    /// Two activities, same start: distances of the second continue from the
    /// first and points interleave by timestamp.
    #[tokio::test]
    async fn test_e2e_round_trip_upload() {
        let client = Arc::new(
            MockActivityClient::new()
                .with_activity(three_samples(1, "Run", vec![0.0, 5.0, 10.0]))
                .with_activity(three_samples(2, "Ride", vec![0.0, 3.0, 6.0])),
        );
        let bp = blueprint(vec![sink("strava", SinkType::Upload, &[])]);

        let request = MergeRequest::new(ids(&[1, 2]))
            .with_name("Brick")
            .with_description("run then ride");
        let outcome = pipeline(bp, &client).run(&request).await.unwrap();

        assert_eq!(outcome.point_count, 6);
        assert_eq!(outcome.upload_id, Some(5000));
        assert_eq!(outcome.report.activities[1].offset_m, 10.0);

        let uploads = client.uploads();
        assert_eq!(uploads.len(), 1);
        let upload = &uploads[0];
        assert_eq!(upload.name, "Brick");
        assert_eq!(upload.description, "run then ride");
        assert_eq!(upload.data_type, "tcx");
        assert_eq!(upload.file_name, "merged.tcx");

        assert!(upload.body.contains(r#"<Activity Sport="Run">"#));
        assert!(upload.body.contains("<TotalTimeSeconds>4</TotalTimeSeconds>"));
        assert!(upload.body.contains("<Id>2024-05-05T00:00:00Z</Id>"));
        assert_eq!(
            trackpoint_distances(&upload.body),
            vec!["0", "10", "5", "13", "10", "16"]
        );
    }

    #[tokio::test]
    async fn test_e2e_empty_stream_keeps_totals() {
        let empty = ActivityInput::new(
            summary(2, "Run", 600, 1500.0),
            StreamSet::with_time(Vec::new()),
        );
        let client = Arc::new(
            MockActivityClient::new()
                .with_activity(three_samples(1, "Run", vec![0.0, 5.0, 10.0]))
                .with_activity(empty),
        );
        let bp = blueprint(vec![sink("strava", SinkType::Upload, &[])]);

        let outcome = pipeline(bp, &client)
            .run(&MergeRequest::new(ids(&[1, 2])))
            .await
            .unwrap();

        assert_eq!(outcome.point_count, 3);
        assert_eq!(outcome.report.empty_activities(), vec![ActivityId::new(2)]);

        let body = &client.uploads()[0].body;
        assert!(body.contains("<TotalTimeSeconds>602</TotalTimeSeconds>"));
        assert!(body.contains("<DistanceMeters>1510</DistanceMeters>"));
        assert_eq!(body.matches("<Trackpoint>").count(), 3);
    }

    #[tokio::test]
    async fn test_e2e_default_name_and_description() {
        let client = Arc::new(
            MockActivityClient::new()
                .with_activity(three_samples(1, "Run", vec![0.0, 1.0, 2.0]))
                .with_activity(three_samples(2, "Run", vec![0.0, 1.0, 2.0])),
        );
        let bp = blueprint(vec![sink("strava", SinkType::Upload, &[])]);

        pipeline(bp, &client)
            .run(&MergeRequest::new(ids(&[1, 2])))
            .await
            .unwrap();

        let upload = &client.uploads()[0];
        assert_eq!(upload.name, contracts::DEFAULT_MERGED_NAME);
        assert_eq!(upload.description, contracts::DEFAULT_MERGED_DESCRIPTION);
    }

    #[tokio::test]
    async fn test_e2e_single_id_rejected_without_calls() {
        let client = Arc::new(
            MockActivityClient::new().with_activity(three_samples(1, "Run", vec![0.0, 1.0, 2.0])),
        );
        let bp = blueprint(vec![sink("strava", SinkType::Upload, &[])]);

        let err = pipeline(bp, &client)
            .run(&MergeRequest::new(ids(&[1])))
            .await
            .unwrap_err();

        assert!(matches!(err, MergeError::InsufficientActivities { count: 1 }));
        assert_eq!(client.call_count(), 0);
        assert!(client.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_e2e_upload_rejected_stops_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(
            MockActivityClient::with_config(MockConfig {
                reject_upload: Some((400, "malformed file".to_string())),
                ..Default::default()
            })
            .with_activity(three_samples(1, "Run", vec![0.0, 1.0, 2.0]))
            .with_activity(three_samples(2, "Run", vec![0.0, 1.0, 2.0])),
        );
        let bp = blueprint(vec![
            sink("strava", SinkType::Upload, &[]),
            file_sink(dir.path()),
        ]);

        let err = pipeline(bp, &client)
            .run(&MergeRequest::new(ids(&[1, 2])))
            .await
            .unwrap_err();

        match err {
            MergeError::UploadRejected { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("malformed file"));
            }
            other => panic!("expected UploadRejected, got {other:?}"),
        }
        assert!(!dir.path().join("merged.tcx").exists());
    }

    #[tokio::test]
    async fn test_e2e_missing_activity_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(
            MockActivityClient::new().with_activity(three_samples(1, "Run", vec![0.0, 1.0, 2.0])),
        );
        let out = dir.path().join("merged");
        let bp = blueprint(vec![file_sink(&out)]);

        let err = pipeline(bp, &client)
            .run(&MergeRequest::new(ids(&[1, 99])))
            .await
            .unwrap_err();

        assert!(matches!(err, MergeError::ActivityNotFound { id } if id == ActivityId::new(99)));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_e2e_forbidden_activity_is_unauthorized() {
        let client = Arc::new(
            MockActivityClient::with_config(MockConfig {
                forbidden: vec![ActivityId::new(2)],
                ..Default::default()
            })
            .with_activity(three_samples(1, "Run", vec![0.0, 1.0, 2.0]))
            .with_activity(three_samples(2, "Run", vec![0.0, 1.0, 2.0])),
        );
        let bp = blueprint(vec![sink("strava", SinkType::Upload, &[])]);

        let err = pipeline(bp, &client)
            .run(&MergeRequest::new(ids(&[1, 2])))
            .await
            .unwrap_err();

        assert!(matches!(err, MergeError::Unauthorized { id, .. } if id == ActivityId::new(2)));
        assert!(client.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_e2e_file_sink_persists_document() {
        let dir = tempfile::tempdir().unwrap();
        let start_b = start() + chrono::Duration::seconds(30);
        let mut late = three_samples(2, "Run", vec![0.0, 100.0, 200.0]);
        late.summary.start_time = start_b;
        late.streams = late
            .streams
            .latlng(vec![[51.5, -0.12], [51.5001, -0.1201], [51.5002, -0.1202]]);

        let client = Arc::new(
            MockActivityClient::new()
                .with_activity(three_samples(1, "Run", vec![0.0, 50.0, 100.0]))
                .with_activity(late),
        );
        let bp = blueprint(vec![file_sink(dir.path())]);

        let outcome = pipeline(bp, &client)
            .run(&MergeRequest::new(ids(&[1, 2])))
            .await
            .unwrap();

        let path = dir.path().join("merged.tcx");
        assert_eq!(outcome.persisted_path.as_deref(), Some(path.as_path()));
        assert_eq!(outcome.upload_id, None);

        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert_eq!(body.matches("<Position>").count(), 3);
        assert!(body.contains("<Time>2024-05-04T08:00:30Z</Time>"));
        assert_eq!(
            trackpoint_distances(&body),
            vec!["0", "50", "100", "100", "200", "300"]
        );
    }

    /// Stages wired by hand: fetch -> align -> render -> dispatch
    #[tokio::test]
    async fn test_e2e_manual_stage_composition() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(
            MockActivityClient::new()
                .with_activity(three_samples(1, "Run", vec![0.0, 5.0, 10.0]))
                .with_activity(three_samples(2, "Run", vec![0.0, 3.0, 6.0]))
                .with_activity(three_samples(3, "Run", vec![0.0, 2.0, 4.0])),
        );

        let inputs = activity_source::fetch_all(
            Arc::clone(&client),
            &ids(&[3, 1, 2]),
            &contracts::ChannelKind::ALL,
            2,
        )
        .await
        .unwrap();
        let order: Vec<u64> = inputs.iter().map(|i| i.summary.id.get()).collect();
        assert_eq!(order, vec![3, 1, 2]);

        let (track, report) = stream_aligner::StreamAligner::new().align(&inputs).unwrap();
        let offsets: Vec<f64> = report.activities.iter().map(|a| a.offset_m).collect();
        assert_eq!(offsets, vec![0.0, 4.0, 18.0]);

        let summary = observability::AlignSummary::from_report(&report);
        assert_eq!(summary.total_points, 9);
        assert!(summary.to_string().contains("Cumulative distance: 42.0 m"));

        let document = track_serializer::TrackSerializer::with_clock(FixedClock(start()))
            .render(&track, "Triple", "");
        let mut dispatcher =
            dispatcher::create_dispatcher(vec![file_sink(dir.path())], Some(Arc::clone(&client)))
                .unwrap();
        let dispatched = dispatcher.dispatch(&document).await.unwrap();
        dispatcher.close().await.unwrap();

        assert_eq!(
            dispatched.persisted_path(),
            Some(dir.path().join("merged.tcx").as_path())
        );
        assert_eq!(client.call_count(), 6);
    }

    #[tokio::test]
    async fn test_e2e_configuration_drives_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let toml = format!(
            r#"
[merge]
default_name = "Configured"

[[sinks]]
name = "console"
sink_type = "log"

[[sinks]]
name = "disk"
sink_type = "file"
params = {{ base_path = "{}", file_name = "out.tcx" }}
"#,
            dir.path().display().to_string().replace('\\', "/")
        );
        let bp = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        assert!(!bp.has_upload_sink());

        let client = Arc::new(
            MockActivityClient::new()
                .with_activity(three_samples(1, "Hike", vec![0.0, 1.0, 2.0]))
                .with_activity(three_samples(2, "Hike", vec![0.0, 1.0, 2.0])),
        );

        let outcome = pipeline(bp, &client)
            .run(&MergeRequest::new(ids(&[1, 2])))
            .await
            .unwrap();

        let path = dir.path().join("out.tcx");
        assert_eq!(outcome.persisted_path.as_deref(), Some(path.as_path()));
        assert_eq!(outcome.stats.sinks.len(), 2);
        assert!(outcome.stats.sinks.iter().all(|(_, m)| m.write_count == 1));
        assert!(client.uploads().is_empty());
    }
}
