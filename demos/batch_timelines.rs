//! Process a week of activity history, one batch per day, in parallel.
//!
//! Run with: cargo run --example batch_timelines --features parallel

use motion_timeline::{process_batches, ActivitySample, ProcessingLevel, TimelineConfig};
use std::time::Instant;

const DAY_MS: i64 = 24 * 3600 * 1000;

fn synthetic_day(day: i64) -> Vec<ActivitySample> {
    let base = day * DAY_MS;
    (0..2_000i64)
        .map(|i| {
            let t = base + i * 40_000;
            match (i / 25) % 4 {
                0 => ActivitySample::stationary(t, 2),
                1 => ActivitySample::walking(t, 1),
                2 if i % 7 == 0 => ActivitySample::unknown(t, 0),
                2 => ActivitySample::automotive(t, 2),
                _ => ActivitySample::cycling(t, 1),
            }
        })
        .collect()
}

fn main() {
    let batches: Vec<Vec<ActivitySample>> = (0..7).map(synthetic_day).collect();
    let total: usize = batches.iter().map(Vec::len).sum();

    let config = TimelineConfig::default();
    let start = Instant::now();
    let timelines = process_batches(&batches, ProcessingLevel::Interpreted, &config);
    let elapsed = start.elapsed();

    println!("Batch Timeline Example\n");
    println!("{} samples in {} batches processed in {:?}\n", total, batches.len(), elapsed);

    for (day, timeline) in timelines.iter().enumerate() {
        println!(
            "  day {}: {} raw samples -> {} segments",
            day,
            batches[day].len(),
            timeline.len()
        );
    }
}
