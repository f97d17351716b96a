// Pose Coach 🚀 MIT License

//! Offline replay of a captured inference session.
//!
//! A tensor dump is a JSON file holding one heatmap/affinity pair per
//! capture tick, recorded from a live session. Replaying it through the
//! pipeline reproduces the scoring a player would have seen, which is how
//! tuning changes (tolerance, thresholds, window width) are evaluated.

use std::fs;

use ndarray::Array3;
use serde::Deserialize;

use crate::cli::args::{InspectArgs, ReplayArgs};
use crate::config::PipelineConfig;
use crate::error::{PoseError, Result};
use crate::pipeline::PosePipeline;
use crate::reference::Recording;
use crate::{info, section, success, verbose};

#[derive(Debug, Deserialize)]
struct TensorDump {
    ticks: Vec<TickDump>,
}

#[derive(Debug, Deserialize)]
struct TickDump {
    heatmaps: TensorData,
    affinity: TensorData,
}

/// One dense tensor in row-major (row, column, channel) order.
#[derive(Debug, Deserialize)]
struct TensorData {
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<f32>,
}

impl TensorData {
    fn into_array(self) -> Result<Array3<f32>> {
        Array3::from_shape_vec((self.height, self.width, self.channels), self.data).map_err(
            |err| PoseError::ShapeError(format!("tensor dump does not match its shape: {err}")),
        )
    }
}

fn load_dump(path: &str) -> Result<TensorDump> {
    let text = fs::read_to_string(path)
        .map_err(|err| PoseError::IoError(format!("cannot read {path}: {err}")))?;
    serde_json::from_str(&text)
        .map_err(|err| PoseError::RecordingError(format!("invalid tensor dump: {err}")))
}

/// Run the replay command.
///
/// # Errors
///
/// Fails when the recording or tensor dump cannot be loaded, or when a
/// dumped tensor has an unexpected shape.
pub fn run_replay(args: &ReplayArgs) -> Result<()> {
    let recording = Recording::from_file(&args.recording)?;
    let dump = load_dump(&args.tensors)?;

    let config = PipelineConfig::new()
        .with_peak_threshold(args.peak_threshold)
        .with_paf_threshold(args.paf_threshold)
        .with_tolerance(args.tolerance)
        .with_window_half_width(args.window)
        .with_mirrored(args.mirrored);
    let mut pipeline = PosePipeline::new(config, recording)?;

    section!("Replaying '{}'", pipeline.recording().name);
    verbose!(
        "{} recorded frames, {} checkpoints, {} captured ticks",
        pipeline.recording().len(),
        pipeline.recording().key_frames().len(),
        dump.ticks.len()
    );

    for (tick, dumped) in dump.ticks.into_iter().enumerate() {
        let heatmaps = dumped.heatmaps.into_array()?;
        let affinity = dumped.affinity.into_array()?;

        if pipeline.advance_reference() {
            pipeline.enable_compare();
            verbose!("tick {tick}: checkpoint reached");
        }

        let result = pipeline.process_tick(&heatmaps, &affinity)?;
        match (&result.subject, result.score) {
            (_, Some(score)) => {
                info!(
                    "tick {tick}: {} people, scored {:.1} ({})",
                    result.people_count,
                    score.score,
                    score.tier.label()
                );
            }
            (Some(subject), None) => {
                verbose!(
                    "tick {tick}: {} people, subject has {} joints",
                    result.people_count,
                    subject.detected_joints()
                );
            }
            (None, None) => verbose!("tick {tick}: no detection"),
        }
    }

    let comparisons = pipeline.stats().comparisons();
    let (average, histogram) = pipeline.finish_level();
    section!("Session summary");
    info!("{comparisons} comparisons, average score {average}");
    info!(
        "Excellent {} / Great {} / Good {} / OK {} / Close {} / Miss {}",
        histogram[0], histogram[1], histogram[2], histogram[3], histogram[4], histogram[5]
    );
    success!("Replay complete");
    Ok(())
}

/// Run the inspect command.
///
/// # Errors
///
/// Fails when the recording cannot be loaded.
pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let recording = Recording::from_file(&args.recording)?;
    info!("name:       {}", recording.name);
    info!("frames:     {}", recording.len());
    info!("guided:     {}", recording.is_guided);
    info!("checkpoints: {:?}", recording.key_frames());
    if let Some(first) = recording.frame(0) {
        info!("joints per frame: {}", first.len());
    }
    Ok(())
}
