//! # Track Serializer
//!
//! Renders a `MergedTrack` as a Training Center XML (TCX v2) document.
//!
//! Responsibilities:
//! - Build a typed document from the merged track
//! - Emit conditional elements only for present values
//! - Render the document as text (no I/O)
//!
//! ## Example
//!
//! ```ignore
//! use track_serializer::TrackSerializer;
//!
//! let rendered = TrackSerializer::new().render(&track, "Long Day", "Run + ride");
//! std::fs::write(rendered.file_name(), &rendered.body)?;
//! ```

mod document;
mod render;

pub use document::{Position, TcxActivity, TcxDocument, TcxLap, Trackpoint, TCX_NAMESPACE};
pub use render::{escape, format_time};

use chrono::{DateTime, Utc};
use contracts::{DataFormat, MergedTrack, RenderedActivity};
use tracing::debug;

/// Source of "now" for the synthetic activity id
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Frozen clock (tests, reproducible output)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Track serializer
#[derive(Debug, Clone, Default)]
pub struct TrackSerializer<K = SystemClock> {
    clock: K,
}

impl TrackSerializer<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<K: Clock> TrackSerializer<K> {
    pub fn with_clock(clock: K) -> Self {
        Self { clock }
    }

    /// Typed document for `track`
    pub fn document(&self, track: &MergedTrack) -> TcxDocument {
        TcxDocument::from_track(track, self.clock.now())
    }

    /// Document text for `track`
    pub fn render_text(&self, track: &MergedTrack) -> String {
        self.document(track).to_string()
    }

    /// Render `track` with upload metadata attached
    pub fn render(
        &self,
        track: &MergedTrack,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> RenderedActivity {
        let text = self.render_text(track);
        debug!(
            trackpoints = track.len(),
            bytes = text.len(),
            "Rendered merged track"
        );
        RenderedActivity::new(name, description, DataFormat::Tcx, text)
    }
}
