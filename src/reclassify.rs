//! # Short Segment Reclassification
//!
//! Rewrites segments whose duration is implausible for their label, using the
//! labels of the immediately adjacent segments as context.
//!
//! - A drive shorter than [`TimelineConfig::min_automotive_ms`] becomes a stop.
//! - A ride shorter than [`TimelineConfig::min_cycling_ms`] takes the locomotion
//!   mode of its neighbours: running, then walking, then stationary. The
//!   previous neighbour is consulted before the next one.
//!
//! Neighbour labels are read from a snapshot taken before any rewrite, so the
//! outcome does not depend on iteration order.

use crate::{ActivityLabels, ActivitySegment, TimelineConfig};
use log::debug;

/// Rewrite short automotive and cycling segments in place.
///
/// The result is not re-merged; feed it through
/// [`coalesce_segments`](crate::coalesce_segments) to fold segments that
/// became compatible.
pub fn reclassify(
    mut segments: Vec<ActivitySegment>,
    config: &TimelineConfig,
) -> Vec<ActivitySegment> {
    let snapshot: Vec<ActivityLabels> = segments.iter().map(|s| s.labels).collect();
    let mut rewritten = 0usize;

    for (i, segment) in segments.iter_mut().enumerate() {
        let prev = i.checked_sub(1).and_then(|j| snapshot.get(j)).copied();
        let next = snapshot.get(i + 1).copied();

        let duration_ms = segment.duration_ms();
        if let Some(labels) = reclassify_labels(segment.labels, duration_ms, prev, next, config) {
            debug!(
                "[MotionTimeline] Reclassified {} at {} ({}ms) as {}",
                segment.labels,
                segment.start_ms,
                duration_ms,
                labels
            );
            segment.labels = labels;
            rewritten += 1;
        }
    }

    debug!("[MotionTimeline] Reclassified {} of {} segments", rewritten, segments.len());
    segments
}

/// New labels for one segment, or `None` if it is left alone.
fn reclassify_labels(
    labels: ActivityLabels,
    duration_ms: i64,
    prev: Option<ActivityLabels>,
    next: Option<ActivityLabels>,
    config: &TimelineConfig,
) -> Option<ActivityLabels> {
    if labels.contains(ActivityLabels::AUTOMOTIVE) && duration_ms < config.min_automotive_ms {
        let mut updated = labels;
        updated.remove(ActivityLabels::AUTOMOTIVE);
        updated.insert(ActivityLabels::STATIONARY);
        return Some(updated);
    }

    if labels.contains(ActivityLabels::CYCLING) && duration_ms < config.min_cycling_ms {
        let mut updated = labels;
        updated.remove(ActivityLabels::CYCLING);
        updated.insert(neighbour_locomotion(prev, next));
        return Some(updated);
    }

    // Short stationary gaps between walking or running stretches are left as
    // they are; there is no separate standing label to move them to.
    None
}

fn neighbour_locomotion(
    prev: Option<ActivityLabels>,
    next: Option<ActivityLabels>,
) -> ActivityLabels {
    let has = |side: Option<ActivityLabels>, flag: ActivityLabels| {
        side.is_some_and(|l| l.contains(flag))
    };

    for flag in [ActivityLabels::RUNNING, ActivityLabels::WALKING] {
        if has(prev, flag) || has(next, flag) {
            return flag;
        }
    }
    ActivityLabels::STATIONARY
}
