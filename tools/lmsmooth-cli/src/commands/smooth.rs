//! Smooth a recorded landmark stream.

use std::path::{Path, PathBuf};

use lmsmooth_common::clock::{wall_clock_now, FrameClock};
use lmsmooth_common::config::{AppConfig, SmoothingConfig, SmoothingMethod};
use lmsmooth_landmark_model::frame::{FrameStream, StreamHeader};
use lmsmooth_smoothing_core::SmoothingStage;

/// Command-line overrides for a smoothing run.
pub struct SmoothArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub method: Option<String>,
    pub min_cutoff: Option<f64>,
    pub beta: Option<f64>,
    pub derivative_cutoff: Option<f64>,
    pub fps: Option<f64>,
    pub no_confidence: bool,
    pub scale_from_landmarks: bool,
}

pub fn run(config: &AppConfig, args: SmoothArgs) -> anyhow::Result<()> {
    let smoothing = resolve_config(config.smoothing, &args)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    let mut stream = FrameStream::load(&args.input)
        .map_err(|e| anyhow::anyhow!("Failed to load stream: {e}"))?;

    if let Some(fps) = args.fps {
        let mut clock = FrameClock::new(fps);
        for frame in &mut stream.frames {
            frame.timestamp_us = clock.next_timestamp();
        }
        tracing::debug!(fps = clock.fps(), "Re-stamped frames");
    }

    tracing::info!(
        input = %args.input.display(),
        frames = stream.frames.len(),
        method = ?smoothing.method,
        "Smoothing stream"
    );

    let mut stage = SmoothingStage::new(smoothing)
        .map_err(|e| anyhow::anyhow!("Invalid smoothing config: {e}"))?;

    let mut smoothed = Vec::with_capacity(stream.frames.len());
    for (i, frame) in stream.frames.iter().enumerate() {
        let out = stage.process(frame).map_err(|e| {
            anyhow::anyhow!("Frame {i} (t={}us) could not be smoothed: {e}", frame.timestamp_us)
        })?;
        smoothed.extend(out);
    }

    let source = stream
        .header
        .as_ref()
        .and_then(|h| h.source.clone())
        .unwrap_or_else(|| args.input.display().to_string());
    let result = FrameStream::new(
        Some(StreamHeader::new(
            wall_clock_now(),
            Some(format!("smoothed: {source}")),
        )),
        smoothed,
    );
    result
        .save(&output)
        .map_err(|e| anyhow::anyhow!("Failed to write stream: {e}"))?;

    let stats = stage.stats();
    tracing::info!(
        frames_out = stats.frames_out,
        resets = stats.resets,
        "Smoothing complete"
    );

    println!("Smoothed {} -> {}", args.input.display(), output.display());
    println!("  Method: {:?}", smoothing.method);
    if smoothing.method == SmoothingMethod::OneEuro {
        println!(
            "  1€: min_cutoff={} beta={} derivative_cutoff={}",
            smoothing.one_euro.min_cutoff,
            smoothing.one_euro.beta,
            smoothing.one_euro.derivative_cutoff
        );
    }
    println!("  Frames in: {}", stats.frames_in);
    println!("  Frames out: {}", stats.frames_out);
    println!("  Resets (empty frames): {}", stats.resets);

    Ok(())
}

/// Apply command-line overrides on top of the configured smoothing settings.
fn resolve_config(base: SmoothingConfig, args: &SmoothArgs) -> anyhow::Result<SmoothingConfig> {
    let mut config = base;

    if let Some(ref method) = args.method {
        config.method = method
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid --method: {e}"))?;
    }
    if args.min_cutoff.is_some() || args.beta.is_some() {
        config = config.with_one_euro_override(
            args.min_cutoff.unwrap_or(config.one_euro.min_cutoff),
            args.beta.unwrap_or(config.one_euro.beta),
        );
    }
    if let Some(derivative_cutoff) = args.derivative_cutoff {
        config.one_euro.derivative_cutoff = derivative_cutoff;
    }
    if args.no_confidence {
        config.filter_confidence = false;
    }
    if args.scale_from_landmarks {
        config.scale_from_landmarks = true;
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid smoothing config: {e}"))?;
    Ok(config)
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stream".to_string());
    input.with_file_name(format!("{stem}.smoothed.jsonl"))
}
