//! Show landmark stream information.

use std::path::PathBuf;

use lmsmooth_common::clock::micros_to_secs;
use lmsmooth_landmark_model::frame::FrameStream;

pub fn run(input: PathBuf) -> anyhow::Result<()> {
    let stream =
        FrameStream::load(&input).map_err(|e| anyhow::anyhow!("Failed to load stream: {e}"))?;

    println!("Stream: {}", input.display());
    if let Some(ref header) = stream.header {
        println!("  Schema: {}", header.schema_version);
        println!("  Created: {}", header.created_at);
        if let Some(ref source) = header.source {
            println!("  Source: {source}");
        }
    }
    println!();

    let frames = &stream.frames;
    let observed = frames.iter().filter(|f| f.has_landmarks()).count();
    let normalized = frames
        .iter()
        .filter(|f| f.observation.as_ref().is_some_and(|o| o.is_normalized()))
        .count();
    let with_roi = frames.iter().filter(|f| f.roi.is_some()).count();

    println!("Frames:");
    println!("  Total: {}", frames.len());
    println!("  With landmarks: {observed}");
    println!("  Empty: {}", frames.len() - observed);
    println!("  Normalized: {normalized}");
    println!("  With region: {with_roi}");

    if let (Some(first), Some(last)) = (frames.first(), frames.last()) {
        let span = micros_to_secs(last.timestamp_us.saturating_sub(first.timestamp_us));
        println!("  Duration: {span:.3}s");
        if frames.len() > 1 && span > 0.0 {
            println!("  Mean rate: {:.2} fps", (frames.len() - 1) as f64 / span);
        }
    }

    let mut counts: Vec<usize> = frames
        .iter()
        .filter_map(|f| f.observation.as_ref().map(|o| o.len()))
        .filter(|&n| n > 0)
        .collect();
    counts.sort_unstable();
    counts.dedup();
    if !counts.is_empty() {
        println!("  Landmarks per frame: {counts:?}");
    }

    let issues = stream.validate();
    if issues.is_empty() {
        println!("\nStream is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!("\n{} issue(s) found.", issues.len());
    }

    Ok(())
}
