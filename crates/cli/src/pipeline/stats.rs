//! Merge run statistics.

use std::time::Duration;

use dispatcher::MetricsSnapshot;
use observability::AlignSummary;

/// Statistics from one merge run
#[derive(Debug, Clone, Default)]
pub struct MergeStats {
    /// Wall time of the whole run
    pub duration: Duration,

    /// Time spent fetching activities
    pub fetch_duration: Duration,

    /// Number of activities fetched
    pub activities_fetched: usize,

    /// Bytes in the rendered document
    pub document_bytes: usize,

    /// Per-sink counters, in dispatch order
    pub sinks: Vec<(String, MetricsSnapshot)>,

    pub alignment: AlignSummary,
}

impl MergeStats {
    /// Points merged per second of wall time
    pub fn points_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.alignment.total_points as f64 / secs
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!();
        println!("=== Merge Statistics ===");
        println!("  Duration: {:.2}s", self.duration.as_secs_f64());
        println!("  Fetch: {:.2}s", self.fetch_duration.as_secs_f64());
        println!("  Activities fetched: {}", self.activities_fetched);
        println!("  Document size: {} bytes", self.document_bytes);
        println!("  Points/s: {:.0}", self.points_per_second());

        println!();
        print!("{}", self.alignment);

        if !self.sinks.is_empty() {
            println!();
            println!("=== Sinks ===");
            for (name, snapshot) in &self.sinks {
                println!(
                    "  {}: {} written, {} failed, {} bytes",
                    name, snapshot.write_count, snapshot.failure_count, snapshot.bytes_written
                );
            }
        }

        println!();
    }
}
