//! Merge of several activities into one time-ordered track.

use contracts::{ActivityAlignment, ActivityInput, AlignReport, MergeError, MergedTrack};
use tracing::{debug, instrument, warn};

use crate::chain::chain_distances;
use crate::points::build_points;

/// Smallest number of activities a merge accepts
pub const MIN_ACTIVITIES: usize = 2;

/// Stream aligner
///
/// Stateless: every call works only on the inputs it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamAligner;

impl StreamAligner {
    pub fn new() -> Self {
        Self
    }

    /// Merge `inputs` (processed in the given order) into one track
    ///
    /// Points are concatenated in input order, distance-chained, then
    /// stable-sorted by timestamp. Totals come from the activity summaries.
    ///
    /// # Errors
    /// `InsufficientActivities` when fewer than two inputs are given,
    /// `Decode` when a time sample cannot be placed on the calendar.
    #[instrument(level = "debug", skip(self, inputs), fields(activities = inputs.len()))]
    pub fn align(&self, inputs: &[ActivityInput]) -> Result<(MergedTrack, AlignReport), MergeError> {
        if inputs.len() < MIN_ACTIVITIES {
            return Err(MergeError::InsufficientActivities {
                count: inputs.len(),
            });
        }

        let mut per_activity = inputs
            .iter()
            .map(|input| {
                build_points(input.summary.start_time, &input.streams).map_err(|e| {
                    MergeError::Decode {
                        message: format!("activity {}: {e}", input.summary.id),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (steps, cumulative_distance_m) = chain_distances(&mut per_activity);

        let mut activities = Vec::with_capacity(inputs.len());
        for ((input, points), step) in inputs.iter().zip(&per_activity).zip(&steps) {
            if points.is_empty() {
                warn!(activity_id = %input.summary.id, "Activity has no time samples");
            }
            debug!(
                activity_id = %input.summary.id,
                points = points.len(),
                offset_m = step.offset,
                peak_m = step.peak,
                "Activity aligned"
            );
            activities.push(ActivityAlignment {
                activity_id: input.summary.id,
                points: points.len(),
                offset_m: step.offset,
                peak_m: step.peak,
            });
        }

        let mut points: Vec<_> = per_activity.into_iter().flatten().collect();
        points.sort_by(|a, b| a.time.cmp(&b.time));

        let track = MergedTrack {
            sport: inputs[0].summary.sport_type.clone(),
            total_elapsed_time: inputs.iter().map(|i| i.summary.elapsed_time).sum(),
            total_distance: inputs.iter().map(|i| i.summary.distance).sum(),
            points,
        };
        let report = AlignReport {
            activities,
            cumulative_distance_m,
        };

        observability::record_align_report(&report);
        Ok((track, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use contracts::{ActivityId, ActivitySummary, StreamSet};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    fn input(id: u64, sport: &str, start: DateTime<Utc>, streams: StreamSet) -> ActivityInput {
        ActivityInput::new(
            ActivitySummary {
                id: ActivityId::new(id),
                name: format!("Activity {id}"),
                sport_type: sport.to_string(),
                start_time: start,
                elapsed_time: 100 * id,
                distance: 1000.0 * id as f64,
            },
            streams,
        )
    }

    fn distances(track: &MergedTrack) -> Vec<Option<f64>> {
        track.points.iter().map(|p| p.distance).collect()
    }

    #[test]
    fn test_two_activities_same_start() {
        let a = input(
            1,
            "Run",
            start(),
            StreamSet::with_time(vec![0.0, 1.0, 2.0]).distance(vec![0.0, 5.0, 10.0]),
        );
        let b = input(
            2,
            "Ride",
            start(),
            StreamSet::with_time(vec![0.0, 1.0, 2.0]).distance(vec![0.0, 3.0, 6.0]),
        );

        let (track, report) = StreamAligner::new().align(&[a, b]).unwrap();

        assert_eq!(track.len(), 6);
        assert_eq!(track.sport, "Run");
        // Interleaved by timestamp, first activity wins ties
        assert_eq!(
            distances(&track),
            vec![
                Some(0.0),
                Some(10.0),
                Some(5.0),
                Some(13.0),
                Some(10.0),
                Some(16.0)
            ]
        );
        assert_eq!(report.activities[1].offset_m, 10.0);
        assert_eq!(report.activities[1].peak_m, 16.0);
        assert_eq!(report.cumulative_distance_m, 26.0);
    }

    #[test]
    fn test_third_offset_follows_shifted_peaks() {
        let streams = |d: Vec<f64>| StreamSet::with_time(vec![0.0, 1.0]).distance(d);
        let inputs = vec![
            input(1, "Run", start(), streams(vec![0.0, 7.0])),
            input(2, "Run", start() + Duration::hours(1), streams(vec![0.0, 11.0])),
            input(3, "Run", start() + Duration::hours(2), streams(vec![0.0, 2.0])),
        ];

        let (track, report) = StreamAligner::new().align(&inputs).unwrap();

        let offsets: Vec<f64> = report.activities.iter().map(|a| a.offset_m).collect();
        assert_eq!(offsets, vec![0.0, 7.0, 25.0]);
        assert_eq!(track.points[4].distance, Some(25.0));
        assert_eq!(track.points[5].distance, Some(27.0));
    }

    #[test]
    fn test_empty_time_channel_contributes_nothing_but_totals() {
        let a = input(
            1,
            "Run",
            start(),
            StreamSet::with_time(vec![0.0, 1.0]).distance(vec![0.0, 4.0]),
        );
        let b = input(2, "Run", start(), StreamSet::default().distance(vec![0.0, 9.0]));

        let (track, report) = StreamAligner::new().align(&[a, b]).unwrap();

        assert_eq!(track.len(), 2);
        assert_eq!(track.total_elapsed_time, 300);
        assert_eq!(track.total_distance, 3000.0);
        assert_eq!(report.empty_activities(), vec![ActivityId::new(2)]);
    }

    #[test]
    fn test_sorted_under_clock_skew_and_input_order() {
        // Later activity supplied first, with overlapping clocks
        let late = input(
            1,
            "Ride",
            start() + Duration::seconds(30),
            StreamSet::with_time(vec![0.0, 20.0, 40.0]),
        );
        let early = input(
            2,
            "Ride",
            start(),
            StreamSet::with_time(vec![0.0, 25.0, 50.0, 75.0]),
        );

        let (track, _) = StreamAligner::new().align(&[late, early]).unwrap();

        assert_eq!(track.len(), 7);
        assert!(track.points.windows(2).all(|w| w[0].time <= w[1].time));
        assert_eq!(track.start_time(), Some(start()));
        assert_eq!(track.end_time(), Some(start() + Duration::seconds(75)));
        // Sport follows input order, not time order
        assert_eq!(track.sport, "Ride");
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let a = input(1, "Run", start(), StreamSet::with_time(vec![0.0]).heartrate(vec![1.0]));
        let b = input(2, "Run", start(), StreamSet::with_time(vec![0.0]).heartrate(vec![2.0]));
        let c = input(3, "Run", start(), StreamSet::with_time(vec![0.0]).heartrate(vec![3.0]));

        let (track, _) = StreamAligner::new().align(&[a, b, c]).unwrap();
        let hr: Vec<Option<f64>> = track.points.iter().map(|p| p.heart_rate).collect();
        assert_eq!(hr, vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_missing_distance_channel_passes_total_through() {
        let a = input(1, "Run", start(), StreamSet::with_time(vec![0.0, 1.0]).distance(vec![0.0, 8.0]));
        let b = input(2, "Run", start() + Duration::hours(1), StreamSet::with_time(vec![0.0]));
        let c = input(3, "Run", start() + Duration::hours(2), StreamSet::with_time(vec![0.0]).distance(vec![1.0]));

        let (track, report) = StreamAligner::new().align(&[a, b, c]).unwrap();
        assert_eq!(report.activities[2].offset_m, 8.0);
        assert_eq!(track.points[2].distance, None);
        assert_eq!(track.points[3].distance, Some(9.0));
    }

    #[test]
    fn test_unplaceable_time_sample_is_decode_error() {
        let a = input(1, "Run", start(), StreamSet::with_time(vec![0.0, 1.0]));
        let b = input(2, "Run", start(), StreamSet::with_time(vec![0.0, 1e300]));

        let err = StreamAligner::new().align(&[a, b]).unwrap_err();
        match err {
            MergeError::Decode { message } => assert!(message.starts_with("activity 2:")),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn test_fewer_than_two_rejected() {
        let a = input(1, "Run", start(), StreamSet::with_time(vec![0.0]));
        let err = StreamAligner::new().align(&[a]).unwrap_err();
        assert!(matches!(err, MergeError::InsufficientActivities { count: 1 }));
        assert!(StreamAligner::new().align(&[]).is_err());
    }
}
