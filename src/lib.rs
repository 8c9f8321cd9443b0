//! # Motion Timeline
//!
//! Cleans up the activity history reported by a phone's motion coprocessor.
//!
//! The platform classifier emits a sample every time its guess changes, each
//! carrying any combination of stationary, automotive, walking, running and
//! cycling flags plus a confidence. Displayed as-is the history is noisy:
//! repeated identical samples, unlabelled gaps and drives chopped into
//! fragments. This library turns it into a gap-free list of segments.
//!
//! ## Processing levels
//!
//! - **Raw** (`0`) - one segment per sample
//! - **Filtered** (`1`) - unlabelled samples dropped, identical neighbours and
//!   automotive runs merged
//! - **Interpreted** (`2`) - filtered, then short drives and short rides
//!   reclassified from their neighbours and merged again
//!
//! ## Features
//!
//! - **`parallel`** - Process independent batches in parallel with rayon
//! - **`serde`** - JSON import/export of samples and segments
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use motion_timeline::{process, ActivityLabels, ActivitySample, ProcessingLevel};
//!
//! let samples = vec![
//!     ActivitySample::walking(0, 2),
//!     ActivitySample::walking(20_000, 2),
//!     ActivitySample::automotive(60_000, 1),
//!     ActivitySample::stationary(120_000, 2),
//! ];
//!
//! let timeline = process(&samples, ProcessingLevel::Interpreted);
//!
//! // The one-minute drive is treated as a stop and merged with the stop after it
//! assert_eq!(timeline.len(), 2);
//! assert_eq!(timeline[1].labels, ActivityLabels::STATIONARY);
//! ```

use log::{debug, info};

// Activity label flags
pub mod labels;
pub use labels::{ActivityKind, ActivityLabels, UnknownActivityName};

// Merging of adjacent compatible segments
pub mod coalesce;
pub use coalesce::{coalesce, coalesce_segments, Coalescer};

// Neighbour-aware rewriting of implausibly short segments
pub mod reclassify;
pub use reclassify::reclassify;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("MotionTimelineRust")
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// Classifier confidence as reported by the platform.
///
/// Segments store the ordinal as a plain `u8` so that values from other
/// sources compare the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Confidence {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl From<Confidence> for u8 {
    fn from(confidence: Confidence) -> Self {
        confidence as u8
    }
}

/// How much cleanup to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum ProcessingLevel {
    /// One segment per sample.
    Raw,
    /// Drop unlabelled samples and merge compatible neighbours.
    Filtered,
    /// Filtered, plus reclassification of short drives and rides.
    Interpreted,
}

impl ProcessingLevel {
    /// Map a numeric mode: `<= 0` raw, `1` filtered, `>= 2` interpreted.
    pub fn from_mode(mode: i32) -> Self {
        match mode {
            i32::MIN..=0 => ProcessingLevel::Raw,
            1 => ProcessingLevel::Filtered,
            _ => ProcessingLevel::Interpreted,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ProcessingLevel::Raw => 0,
            ProcessingLevel::Filtered => 1,
            ProcessingLevel::Interpreted => 2,
        }
    }
}

impl TryFrom<u8> for ProcessingLevel {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ProcessingLevel::Raw),
            1 => Ok(ProcessingLevel::Filtered),
            2 => Ok(ProcessingLevel::Interpreted),
            other => Err(other),
        }
    }
}

/// One classification as delivered by the motion sensor.
///
/// Timestamps are Unix epoch milliseconds. The sensor only reports a start;
/// `end_ms` equals `start_ms` for such point samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct ActivitySample {
    pub stationary: bool,
    pub automotive: bool,
    pub walking: bool,
    pub running: bool,
    pub cycling: bool,
    pub start_ms: i64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub end_ms: i64,
    pub confidence: u8,
}

impl ActivitySample {
    /// A point sample carrying exactly the given labels.
    pub fn from_labels(
        labels: ActivityLabels,
        start_ms: i64,
        end_ms: i64,
        confidence: u8,
    ) -> Self {
        Self {
            stationary: labels.contains(ActivityLabels::STATIONARY),
            automotive: labels.contains(ActivityLabels::AUTOMOTIVE),
            walking: labels.contains(ActivityLabels::WALKING),
            running: labels.contains(ActivityLabels::RUNNING),
            cycling: labels.contains(ActivityLabels::CYCLING),
            start_ms,
            end_ms,
            confidence,
        }
    }

    pub fn unknown(start_ms: i64, confidence: u8) -> Self {
        Self::from_labels(ActivityLabels::UNKNOWN, start_ms, start_ms, confidence)
    }

    pub fn stationary(start_ms: i64, confidence: u8) -> Self {
        Self::from_labels(ActivityLabels::STATIONARY, start_ms, start_ms, confidence)
    }

    pub fn automotive(start_ms: i64, confidence: u8) -> Self {
        Self::from_labels(ActivityLabels::AUTOMOTIVE, start_ms, start_ms, confidence)
    }

    pub fn walking(start_ms: i64, confidence: u8) -> Self {
        Self::from_labels(ActivityLabels::WALKING, start_ms, start_ms, confidence)
    }

    pub fn running(start_ms: i64, confidence: u8) -> Self {
        Self::from_labels(ActivityLabels::RUNNING, start_ms, start_ms, confidence)
    }

    pub fn cycling(start_ms: i64, confidence: u8) -> Self {
        Self::from_labels(ActivityLabels::CYCLING, start_ms, start_ms, confidence)
    }

    /// Label set for this sample. Unknown if no flag is set.
    pub fn labels(&self) -> ActivityLabels {
        ActivityLabels::from_flags(
            self.stationary,
            self.automotive,
            self.walking,
            self.running,
            self.cycling,
        )
    }
}

/// A processed interval of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivitySegment {
    pub labels: ActivityLabels,
    /// Start in Unix epoch milliseconds
    pub start_ms: i64,
    /// End in Unix epoch milliseconds; the start of the following segment
    pub end_ms: i64,
    pub confidence: u8,
}

impl ActivitySegment {
    pub fn new(labels: ActivityLabels, start_ms: i64, end_ms: i64, confidence: u8) -> Self {
        Self {
            labels,
            start_ms,
            end_ms: end_ms.max(start_ms),
            confidence,
        }
    }

    /// Length of the segment, saturating at `i64::MAX`.
    pub fn duration_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    pub fn contains(&self, flag: ActivityLabels) -> bool {
        self.labels.contains(flag)
    }

    pub fn is_walking_running_cycling(&self) -> bool {
        self.labels.is_walking_running_cycling()
    }

    pub fn kinds(&self) -> Vec<ActivityKind> {
        self.labels.kinds()
    }
}

impl From<&ActivitySample> for ActivitySegment {
    fn from(sample: &ActivitySample) -> Self {
        ActivitySegment::new(sample.labels(), sample.start_ms, sample.end_ms, sample.confidence)
    }
}

/// Thresholds used when reclassifying short segments.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct TimelineConfig {
    /// Automotive segments shorter than this are treated as stops.
    /// Default: 300_000 (5 minutes)
    pub min_automotive_ms: i64,

    /// Cycling segments shorter than this take their neighbours' locomotion mode.
    /// Default: 120_000 (2 minutes)
    pub min_cycling_ms: i64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_automotive_ms: 300_000,
            min_cycling_ms: 120_000,
        }
    }
}

// ============================================================================
// Core Functions
// ============================================================================

/// Build a timeline from raw samples using the default thresholds.
///
/// # Example
/// ```
/// use motion_timeline::{process, ActivitySample, ProcessingLevel};
///
/// let samples = vec![
///     ActivitySample::stationary(0, 2),
///     ActivitySample::unknown(10_000, 0),
///     ActivitySample::stationary(20_000, 1),
/// ];
///
/// assert_eq!(process(&samples, ProcessingLevel::Raw).len(), 3);
/// assert_eq!(process(&samples, ProcessingLevel::Filtered).len(), 1);
/// ```
pub fn process(samples: &[ActivitySample], level: ProcessingLevel) -> Vec<ActivitySegment> {
    process_with_config(samples, level, &TimelineConfig::default())
}

/// Build a timeline from raw samples.
pub fn process_with_config(
    samples: &[ActivitySample],
    level: ProcessingLevel,
    config: &TimelineConfig,
) -> Vec<ActivitySegment> {
    let segments = match level {
        ProcessingLevel::Raw => coalesce(samples, ProcessingLevel::Raw),
        ProcessingLevel::Filtered => coalesce(samples, ProcessingLevel::Filtered),
        ProcessingLevel::Interpreted => {
            let merged = coalesce(samples, ProcessingLevel::Filtered);
            let merged_len = merged.len();
            let rewritten = reclassify(merged, config);
            let segments = coalesce_segments(rewritten, ProcessingLevel::Filtered);
            debug!(
                "[MotionTimeline] Interpreted pass: {} -> {} segments",
                merged_len,
                segments.len()
            );
            segments
        }
    };

    debug!(
        "[MotionTimeline] {:?}: {} samples -> {} segments",
        level,
        samples.len(),
        segments.len()
    );

    segments
}

/// Process several independent batches, e.g. one per day.
///
/// Output order matches input order. With the `parallel` feature the batches
/// are spread across the rayon pool.
pub fn process_batches(
    batches: &[Vec<ActivitySample>],
    level: ProcessingLevel,
    config: &TimelineConfig,
) -> Vec<Vec<ActivitySegment>> {
    let start = std::time::Instant::now();

    #[cfg(feature = "parallel")]
    let timelines: Vec<Vec<ActivitySegment>> = {
        use rayon::prelude::*;
        batches
            .par_iter()
            .map(|batch| process_with_config(batch, level, config))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let timelines: Vec<Vec<ActivitySegment>> = batches
        .iter()
        .map(|batch| process_with_config(batch, level, config))
        .collect();

    info!(
        "[MotionTimeline] Processed {} batches at {:?} in {:?}",
        batches.len(),
        level,
        start.elapsed()
    );

    timelines
}

// ============================================================================
// JSON Interchange (requires "serde" feature)
// ============================================================================

/// Parse a JSON array of samples.
///
/// `end_ms` may be omitted; it then defaults to `start_ms`.
#[cfg(feature = "serde")]
pub fn samples_from_json(json: &str) -> serde_json::Result<Vec<ActivitySample>> {
    let mut samples: Vec<ActivitySample> = serde_json::from_str(json)?;
    for sample in &mut samples {
        sample.end_ms = sample.end_ms.max(sample.start_ms);
    }
    Ok(samples)
}

/// Serialize a timeline as a JSON array.
#[cfg(feature = "serde")]
pub fn segments_to_json(segments: &[ActivitySegment]) -> serde_json::Result<String> {
    serde_json::to_string(segments)
}

// ============================================================================
// FFI Exports (only when feature enabled)
// ============================================================================

#[cfg(feature = "ffi")]
mod ffi {
    use super::*;
    use log::info;

    /// A timeline segment in a form UniFFI can carry.
    #[derive(Debug, Clone, uniffi::Record)]
    pub struct FfiActivitySegment {
        /// Raw label bits (see `ActivityLabels`)
        pub labels: u8,
        /// Concrete label names in display priority order; empty if unknown
        pub kinds: Vec<String>,
        pub start_ms: i64,
        pub end_ms: i64,
        pub confidence: u8,
    }

    impl From<ActivitySegment> for FfiActivitySegment {
        fn from(segment: ActivitySegment) -> Self {
            Self {
                labels: segment.labels.bits(),
                kinds: segment.kinds().iter().map(|k| k.name().to_string()).collect(),
                start_ms: segment.start_ms,
                end_ms: segment.end_ms,
                confidence: segment.confidence,
            }
        }
    }

    fn to_ffi(segments: Vec<ActivitySegment>) -> Vec<FfiActivitySegment> {
        segments.into_iter().map(FfiActivitySegment::from).collect()
    }

    /// Build a timeline with default thresholds.
    #[uniffi::export]
    pub fn ffi_process_activities(
        samples: Vec<ActivitySample>,
        level: ProcessingLevel,
    ) -> Vec<FfiActivitySegment> {
        init_logging();
        info!(
            "[MotionTimelineRust] process_activities called with {} samples at {:?}",
            samples.len(),
            level
        );

        let start = std::time::Instant::now();
        let segments = process(&samples, level);
        info!("[MotionTimelineRust] Built {} segments in {:?}", segments.len(), start.elapsed());

        to_ffi(segments)
    }

    /// Build a timeline with custom thresholds.
    #[uniffi::export]
    pub fn ffi_process_activities_with_config(
        samples: Vec<ActivitySample>,
        level: ProcessingLevel,
        config: TimelineConfig,
    ) -> Vec<FfiActivitySegment> {
        init_logging();
        info!("[MotionTimelineRust] process_activities_with_config for {} samples", samples.len());
        to_ffi(process_with_config(&samples, level, &config))
    }

    /// Build one timeline per batch in a single call.
    #[uniffi::export]
    pub fn ffi_process_activity_batches(
        batches: Vec<Vec<ActivitySample>>,
        level: ProcessingLevel,
        config: TimelineConfig,
    ) -> Vec<Vec<FfiActivitySegment>> {
        init_logging();
        info!(
            "[MotionTimelineRust] process_activity_batches called with {} batches",
            batches.len()
        );

        process_batches(&batches, level, &config)
            .into_iter()
            .map(to_ffi)
            .collect()
    }

    /// Map a numeric mode from the host UI to a processing level.
    #[uniffi::export]
    pub fn ffi_processing_level(mode: i32) -> ProcessingLevel {
        ProcessingLevel::from_mode(mode)
    }

    /// Get default reclassification thresholds.
    #[uniffi::export]
    pub fn default_timeline_config() -> TimelineConfig {
        init_logging();
        info!("[MotionTimelineRust] default_timeline_config called");
        TimelineConfig::default()
    }

}

// ============================================================================
// Tests
// ============================================================================
