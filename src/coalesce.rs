//! # Segment Coalescing
//!
//! Single pass over a time-ordered stream that folds adjacent compatible
//! segments into one. Only the trailing output segment is ever mutated; once a
//! later segment is appended the earlier one is final.
//!
//! ## Rules (level ≥ 1)
//!
//! 1. Segments without a concrete label are dropped.
//! 2. Equal label sets merge: confidence becomes the maximum.
//! 3. Segments that both contain automotive merge: labels are unioned and
//!    confidence becomes the maximum. Vehicle detection tends to fragment a
//!    single drive into pieces interleaved with other labels.
//! 4. Anything else closes the trailing segment at the new start and is
//!    appended.
//!
//! At level 0 every segment is appended as-is.

use crate::{ActivityLabels, ActivitySample, ActivitySegment, ProcessingLevel};
use log::warn;

/// Accumulates an ordered, gap-free list of segments.
#[derive(Debug, Clone)]
pub struct Coalescer {
    level: ProcessingLevel,
    segments: Vec<ActivitySegment>,
}

impl Coalescer {
    pub fn new(level: ProcessingLevel) -> Self {
        Self {
            level,
            segments: Vec::new(),
        }
    }

    pub fn with_capacity(level: ProcessingLevel, capacity: usize) -> Self {
        Self {
            level,
            segments: Vec::with_capacity(capacity),
        }
    }

    /// Add one segment, merging it into the trailing one when compatible.
    pub fn push(&mut self, segment: ActivitySegment) {
        let filtering = self.level != ProcessingLevel::Raw;

        if filtering && segment.labels.is_unknown() {
            return;
        }

        if let Some(prev) = self.segments.last_mut() {
            if segment.start_ms < prev.start_ms {
                warn!(
                    "[MotionTimeline] Out-of-order segment: starts at {} before previous start {}",
                    segment.start_ms, prev.start_ms
                );
            }

            if filtering && is_mergeable(prev.labels, segment.labels) {
                prev.labels.insert(segment.labels);
                prev.confidence = prev.confidence.max(segment.confidence);
                prev.end_ms = prev.end_ms.max(segment.end_ms);
                return;
            }

            prev.end_ms = segment.start_ms;
        }

        self.segments.push(segment);
    }

    pub fn push_sample(&mut self, sample: &ActivitySample) {
        self.push(ActivitySegment::from(sample));
    }

    pub fn finish(self) -> Vec<ActivitySegment> {
        self.segments
    }
}

/// Equal label sets, or both sides automotive.
fn is_mergeable(prev: ActivityLabels, next: ActivityLabels) -> bool {
    let identical = prev.is_subset_of(next) && next.is_subset_of(prev);
    identical
        || (prev.contains(ActivityLabels::AUTOMOTIVE) && next.contains(ActivityLabels::AUTOMOTIVE))
}

/// Convert raw samples into segments and coalesce them at `level`.
///
/// # Example
/// ```
/// use motion_timeline::{coalesce, ActivitySample, ProcessingLevel};
///
/// let samples = vec![
///     ActivitySample::walking(0, 1),
///     ActivitySample::walking(30_000, 2),
///     ActivitySample::stationary(60_000, 2),
/// ];
///
/// let segments = coalesce(&samples, ProcessingLevel::Filtered);
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].end_ms, 60_000);
/// ```
pub fn coalesce(samples: &[ActivitySample], level: ProcessingLevel) -> Vec<ActivitySegment> {
    let mut coalescer = Coalescer::with_capacity(level, samples.len());
    for sample in samples {
        coalescer.push_sample(sample);
    }
    coalescer.finish()
}

/// Coalesce segments that were already built, e.g. after reclassification.
pub fn coalesce_segments<I>(segments: I, level: ProcessingLevel) -> Vec<ActivitySegment>
where
    I: IntoIterator<Item = ActivitySegment>,
{
    let mut coalescer = Coalescer::new(level);
    for segment in segments {
        coalescer.push(segment);
    }
    coalescer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(labels: ActivityLabels, start_s: i64, end_s: i64, confidence: u8) -> ActivitySample {
        ActivitySample::from_labels(labels, start_s * 1000, end_s * 1000, confidence)
    }

    fn assert_tiled(segments: &[ActivitySegment]) {
        for pair in segments.windows(2) {
            assert!(pair[0].start_ms <= pair[1].start_ms);
            assert_eq!(pair[0].end_ms, pair[1].start_ms);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(coalesce(&[], ProcessingLevel::Raw).is_empty());
        assert!(coalesce(&[], ProcessingLevel::Filtered).is_empty());
    }

    #[test]
    fn test_raw_keeps_everything() {
        let samples = vec![
            sample(ActivityLabels::WALKING, 0, 0, 1),
            sample(ActivityLabels::WALKING, 10, 10, 1),
            sample(ActivityLabels::UNKNOWN, 20, 20, 0),
            sample(ActivityLabels::AUTOMOTIVE, 30, 30, 2),
        ];

        let segments = coalesce(&samples, ProcessingLevel::Raw);
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[2].labels, ActivityLabels::UNKNOWN);
        assert_tiled(&segments);
    }

    #[test]
    fn test_unknown_dropped_when_filtering() {
        let samples = vec![
            sample(ActivityLabels::WALKING, 0, 0, 1),
            sample(ActivityLabels::UNKNOWN, 20, 20, 0),
            sample(ActivityLabels::STATIONARY, 40, 40, 1),
        ];

        let segments = coalesce(&samples, ProcessingLevel::Filtered);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].labels, ActivityLabels::WALKING);
        // The dropped sample leaves no hole
        assert_eq!(segments[0].end_ms, 40_000);
    }

    #[test]
    fn test_identical_labels_merge_with_max_confidence() {
        let samples = vec![
            sample(ActivityLabels::WALKING, 0, 0, 2),
            sample(ActivityLabels::WALKING, 30, 30, 5),
        ];

        let segments = coalesce(&samples, ProcessingLevel::Filtered);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].confidence, 5);
        assert_eq!(segments[0].start_ms, 0);
    }

    #[test]
    fn test_automotive_stickiness() {
        let samples = vec![
            sample(ActivityLabels::AUTOMOTIVE, 0, 60, 1),
            sample(ActivityLabels::AUTOMOTIVE.union(ActivityLabels::WALKING), 60, 90, 0),
            sample(ActivityLabels::AUTOMOTIVE, 90, 200, 2),
        ];

        let segments = coalesce(&samples, ProcessingLevel::Filtered);
        assert_eq!(segments.len(), 1);
        let drive = &segments[0];
        assert_eq!(drive.start_ms, 0);
        assert_eq!(drive.end_ms, 200_000);
        assert_eq!(drive.labels, ActivityLabels::AUTOMOTIVE.union(ActivityLabels::WALKING));
        assert_eq!(drive.confidence, 2);
    }

    #[test]
    fn test_superset_without_automotive_does_not_merge() {
        let samples = vec![
            sample(ActivityLabels::WALKING, 0, 0, 1),
            sample(ActivityLabels::WALKING.union(ActivityLabels::RUNNING), 10, 10, 1),
        ];

        let segments = coalesce(&samples, ProcessingLevel::Filtered);
        assert_eq!(segments.len(), 2);
        assert_tiled(&segments);
    }

    #[test]
    fn test_merge_only_touches_last_segment() {
        // Walking, then running, then walking again: the second walk must not
        // be folded back into the first.
        let samples = vec![
            sample(ActivityLabels::WALKING, 0, 0, 1),
            sample(ActivityLabels::RUNNING, 10, 10, 1),
            sample(ActivityLabels::WALKING, 20, 20, 1),
        ];

        let segments = coalesce(&samples, ProcessingLevel::Filtered);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].labels, ActivityLabels::WALKING);
        assert_tiled(&segments);
    }

    #[test]
    fn test_recoalescing_is_idempotent() {
        let samples = vec![
            sample(ActivityLabels::STATIONARY, 0, 0, 2),
            sample(ActivityLabels::STATIONARY, 60, 60, 1),
            sample(ActivityLabels::WALKING, 120, 120, 1),
            sample(ActivityLabels::UNKNOWN, 130, 130, 0),
            sample(ActivityLabels::AUTOMOTIVE, 200, 200, 1),
            sample(ActivityLabels::AUTOMOTIVE.union(ActivityLabels::STATIONARY), 400, 400, 2),
            sample(ActivityLabels::WALKING, 900, 950, 1),
        ];

        let once = coalesce(&samples, ProcessingLevel::Filtered);
        let twice = coalesce_segments(once.clone(), ProcessingLevel::Filtered);
        assert_eq!(once, twice);
        assert_tiled(&once);
    }
}
