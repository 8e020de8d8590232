//! Distance offset chaining.
//!
//! Each activity's native distance channel restarts at zero. Activities are
//! shifted so distance keeps growing across boundaries: activity k is shifted
//! by the running total, then the running total grows by the peak of
//! activity k's already-shifted points.

use contracts::UnifiedPoint;

/// Largest non-null distance among `points`, or 0 when none is present
///
/// The peak rather than the last sample is what the activity contributes.
pub fn peak_distance(points: &[UnifiedPoint]) -> f64 {
    points
        .iter()
        .filter_map(|p| p.distance)
        .fold(None, |peak: Option<f64>, d| Some(peak.map_or(d, |m| m.max(d))))
        .unwrap_or(0.0)
}

/// Offset and post-offset peak applied to one activity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainStep {
    pub offset: f64,
    pub peak: f64,
}

/// Shift each activity's distances in place, in the given order
///
/// Returns one step per activity plus the final running total.
pub fn chain_distances(per_activity: &mut [Vec<UnifiedPoint>]) -> (Vec<ChainStep>, f64) {
    let count = per_activity.len();
    per_activity.iter_mut().fold(
        (Vec::with_capacity(count), 0.0_f64),
        |(mut steps, cumulative), points| {
            apply_offset(points, cumulative);
            let peak = peak_distance(points);
            steps.push(ChainStep {
                offset: cumulative,
                peak,
            });
            (steps, cumulative + peak)
        },
    )
}

/// Shift every non-null distance by `offset`
pub fn apply_offset(points: &mut [UnifiedPoint], offset: f64) {
    if offset == 0.0 {
        return;
    }
    for distance in points.iter_mut().filter_map(|p| p.distance.as_mut()) {
        *distance += offset;
    }
}
