//! Basic example of cleaning up a motion activity history.
//!
//! Run with: cargo run --example basic_timeline

use motion_timeline::{process, ActivityLabels, ActivitySample, Confidence, ProcessingLevel};

fn main() {
    const LOW: u8 = Confidence::Low as u8;
    const MEDIUM: u8 = Confidence::Medium as u8;
    const HIGH: u8 = Confidence::High as u8;

    // One evening (timestamps in ms from the start of the query window)
    let samples = vec![
        ActivitySample::stationary(0, HIGH),
        ActivitySample::walking(600_000, MEDIUM),
        ActivitySample::unknown(660_000, LOW),
        ActivitySample::walking(700_000, HIGH),
        ActivitySample::automotive(900_000, MEDIUM), // Waiting at a crossing
        ActivitySample::stationary(1_000_000, HIGH),
        ActivitySample::automotive(2_000_000, MEDIUM), // Bus ride
        ActivitySample::from_labels(
            ActivityLabels::AUTOMOTIVE.union(ActivityLabels::WALKING),
            2_400_000,
            2_400_000,
            LOW,
        ),
        ActivitySample::automotive(2_500_000, HIGH),
        ActivitySample::walking(3_200_000, HIGH),
        ActivitySample::cycling(3_500_000, MEDIUM), // Misdetected stride
        ActivitySample::from_labels(ActivityLabels::WALKING, 3_560_000, 3_600_000, HIGH),
    ];

    println!("Motion Timeline Examples\n");
    println!("{} raw samples\n", samples.len());

    for level in [
        ProcessingLevel::Raw,
        ProcessingLevel::Filtered,
        ProcessingLevel::Interpreted,
    ] {
        let timeline = process(&samples, level);
        println!("{:?} ({} segments):", level, timeline.len());

        // Newest first, as a history list shows it
        for segment in timeline.iter().rev() {
            println!(
                "   {:>7}s - {:>7}s  {:<22} confidence {}",
                segment.start_ms / 1000,
                segment.end_ms / 1000,
                segment.labels.to_string(),
                segment.confidence
            );
        }
        println!();
    }
}
