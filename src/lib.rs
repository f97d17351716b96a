// Pose Coach 🚀 MIT License

#![allow(clippy::multiple_crate_versions)]

//! # Pose Coach
//!
//! Bottom-up multi-person pose post-processing and motion-similarity
//! scoring for camera-based dance and exercise coaching.
//!
//! The library takes the raw dense outputs of an OpenPose-style inference
//! model (19 part heatmaps and 38 part-affinity channels per tick) and
//! turns them into scored gameplay:
//!
//! - **Peak extraction** - Gaussian smoothing and local-maximum search
//!   yield joint candidates per body part
//! - **Limb connection** - part-affinity line integrals link candidate
//!   pairs into limbs
//! - **Person assembly** - limbs are greedily merged into per-person
//!   skeletons, weak ones pruned
//! - **Subject tracking** - the player is followed across ticks by joint
//!   displacement, with a left/right hand-flip correction
//! - **Similarity scoring** - the player's limb angles are compared
//!   against a sliding window of reference-recording frames, producing a
//!   0-100 score and a feedback tier
//!
//! ## Quick Start
//!
//! ```no_run
//! use pose_coach::{PipelineConfig, PosePipeline, Recording};
//! use ndarray::Array3;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let recording = Recording::from_file("levels/warmup.json")?;
//!     let config = PipelineConfig::new().with_tolerance(15.0);
//!     let mut pipeline = PosePipeline::new(config, recording)?;
//!
//!     loop {
//!         // Advance recorded playback once per animation tick.
//!         if pipeline.advance_reference() {
//!             pipeline.enable_compare();
//!         }
//!
//!         // Feed this tick's inference outputs.
//!         let heatmaps: Array3<f32> = todo!("inference heatmaps (h, w, 19)");
//!         let affinity: Array3<f32> = todo!("inference affinity (h, w, 38)");
//!         let result = pipeline.process_tick(&heatmaps, &affinity)?;
//!
//!         if let Some(score) = result.score {
//!             println!("{:.1} ({})", score.score, score.tier.label());
//!         }
//!     }
//! }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`pipeline`] | [`PosePipeline`] orchestrating one capture tick end to end |
//! | [`peaks`] | Heatmap peak extraction ([`Candidate`], [`PeakMap`]) |
//! | [`connections`] | Part-affinity limb connection |
//! | [`assembly`] | Person assembly and pruning ([`PersonSkeleton`]) |
//! | [`tracking`] | Main-subject selection ([`LiveFrame`], [`SubjectTracker`]) |
//! | [`reference`] | Level recordings and the comparison window ([`Recording`]) |
//! | [`scoring`] | Limb-angle similarity scoring ([`SimilarityScorer`], [`FeedbackTier`]) |
//! | [`smoothing`] | Gaussian heatmap smoothing |
//! | [`topology`] | Fixed 18-joint body model tables |
//! | [`config`] | [`PipelineConfig`] tuning knobs |
//! | [`error`] | Error types ([`PoseError`], [`Result`]) |

// Modules
pub mod assembly;
pub mod cli;
pub mod config;
pub mod connections;
pub mod error;
pub mod peaks;
pub mod pipeline;
pub mod reference;
pub mod scoring;
pub mod smoothing;
pub mod topology;
pub mod tracking;

// Re-export main types for convenience
pub use assembly::PersonSkeleton;
pub use config::PipelineConfig;
pub use connections::Connection;
pub use error::{PoseError, Result};
pub use peaks::{Candidate, PeakMap};
pub use pipeline::{PosePipeline, TickResult};
pub use reference::{Recording, ReferenceBuffer, ReferenceFrame};
pub use scoring::{FeedbackTier, FrameScore, SessionStats, SimilarityScorer};
pub use tracking::{CaptureMode, LiveFrame, LiveJoint, SubjectTracker};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
