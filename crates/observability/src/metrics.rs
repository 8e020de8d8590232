//! Merge metrics
//!
//! Prometheus counters/histograms for the merge pipeline, plus an in-memory
//! summary of an `AlignReport` for end-of-run output.

use contracts::AlignReport;
use metrics::{counter, gauge, histogram};

/// Record alignment results
///
/// Called once per merge after the aligner has produced its report.
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_align_report;
///
/// let (track, report) = StreamAligner::new().align(&inputs)?;
/// record_align_report(&report);
/// ```
pub fn record_align_report(report: &AlignReport) {
    let total = report.total_points();
    histogram!("strava_merge_points_merged").record(total as f64);
    gauge!("strava_merge_last_point_count").set(total as f64);
    gauge!("strava_merge_cumulative_distance_m").set(report.cumulative_distance_m);

    for alignment in &report.activities {
        histogram!("strava_merge_activity_points").record(alignment.points as f64);
        if alignment.points == 0 {
            counter!("strava_merge_empty_activities_total").increment(1);
        }
    }
}

/// Record one activity fetch (summary + streams)
pub fn record_activity_fetched(success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "strava_merge_activities_fetched_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record wall time spent fetching all activities
pub fn record_fetch_latency_ms(latency_ms: f64) {
    histogram!("strava_merge_fetch_latency_ms").record(latency_ms);
}

/// Record a document handed to a sink
pub fn record_sink_write(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "strava_merge_sink_writes_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record the final outcome of a merge request (`status` is "success" or an error kind)
pub fn record_merge_result(status: &str) {
    counter!(
        "strava_merge_merges_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Alignment summary for human-readable output
#[derive(Debug, Clone, Default)]
pub struct AlignSummary {
    pub activities: usize,
    pub total_points: usize,
    pub empty_activities: usize,
    pub cumulative_distance_m: f64,
    pub points_per_activity: StatsSummary,
    pub peak_distance_m: StatsSummary,
}

impl AlignSummary {
    /// Summarize a report
    pub fn from_report(report: &AlignReport) -> Self {
        let mut points = RunningStats::default();
        let mut peaks = RunningStats::default();
        for alignment in &report.activities {
            points.push(alignment.points as f64);
            peaks.push(alignment.peak_m);
        }

        Self {
            activities: report.activities.len(),
            total_points: report.total_points(),
            empty_activities: report.empty_activities().len(),
            cumulative_distance_m: report.cumulative_distance_m,
            points_per_activity: StatsSummary::from(&points),
            peak_distance_m: StatsSummary::from(&peaks),
        }
    }
}

impl std::fmt::Display for AlignSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Alignment Summary ===")?;
        writeln!(f, "Activities: {}", self.activities)?;
        writeln!(f, "Total points: {}", self.total_points)?;
        if self.empty_activities > 0 {
            writeln!(f, "Activities without samples: {}", self.empty_activities)?;
        }
        writeln!(f, "Cumulative distance: {:.1} m", self.cumulative_distance_m)?;
        writeln!(f, "Points per activity: {}", self.points_per_activity)?;
        writeln!(f, "Peak distance (m): {}", self.peak_distance_m)?;
        Ok(())
    }
}

/// Statistics snapshot
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            return write!(f, "N/A");
        }
        write!(
            f,
            "min={:.1}, max={:.1}, mean={:.1} (n={})",
            self.min, self.max, self.mean, self.count
        )
    }
}

/// Incremental min/max/mean
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
