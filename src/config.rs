// Pose Coach 🚀 MIT License

//! Pipeline configuration.
//!
//! This module defines the [`PipelineConfig`] struct, which carries every
//! externally tunable threshold of the post-processing and scoring pipeline:
//! peak detection, affinity matching, person pruning, subject tracking, and
//! angle-based similarity scoring.

use crate::error::{PoseError, Result};

/// Configuration for the pose pipeline.
///
/// Uses a builder pattern for convenient construction.
///
/// # Example
///
/// ```rust
/// use pose_coach::PipelineConfig;
///
/// let config = PipelineConfig::new()
///     .with_peak_threshold(0.15)
///     .with_tolerance(10.0)
///     .with_window_half_width(3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Minimum smoothed heatmap value for a pixel to qualify as a joint peak.
    pub peak_threshold: f32,
    /// Minimum per-sample alignment between the affinity field and the
    /// candidate limb direction.
    pub paf_threshold: f32,
    /// Number of equally spaced samples taken along each candidate limb
    /// segment for the affinity line integral.
    pub integral_samples: usize,
    /// Skeletons with fewer filled joints than this are discarded.
    pub min_joint_count: u32,
    /// Skeletons whose average per-joint score falls below this are discarded.
    pub min_average_score: f32,
    /// Angle slack in degrees subtracted from every limb difference before it
    /// counts against the score.
    pub tolerance: f32,
    /// Cap in degrees on a single limb's angle difference.
    pub max_angle_difference: f32,
    /// Fraction of `max_angle_difference` charged for a joint that is out of
    /// frame or geometrically incomparable (0.0 to 1.0).
    pub out_of_frame_penalty: f32,
    /// Reference frames kept before and after the scoring instant; the
    /// comparison window holds `1 + 2 * window_half_width` frames.
    pub window_half_width: usize,
    /// Gaussian kernel size used to denoise heatmaps before peak search.
    pub kernel_size: usize,
    /// Gaussian sigma used to denoise heatmaps before peak search.
    pub sigma: f32,
    /// Whether the webcam image is mirrored; flips the sign of live limb
    /// vectors before angle comparison.
    pub mirrored: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            peak_threshold: 0.1,
            paf_threshold: 0.05,
            integral_samples: 10,
            min_joint_count: 4,
            min_average_score: 0.4,
            tolerance: 0.0,
            max_angle_difference: 120.0,
            out_of_frame_penalty: 0.5,
            window_half_width: 2,
            kernel_size: 3,
            sigma: 3.0,
            mirrored: true,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heatmap peak threshold.
    #[must_use]
    pub const fn with_peak_threshold(mut self, threshold: f32) -> Self {
        self.peak_threshold = threshold;
        self
    }

    /// Set the affinity alignment threshold.
    #[must_use]
    pub const fn with_paf_threshold(mut self, threshold: f32) -> Self {
        self.paf_threshold = threshold;
        self
    }

    /// Set the minimum filled-joint count for person pruning.
    #[must_use]
    pub const fn with_min_joint_count(mut self, count: u32) -> Self {
        self.min_joint_count = count;
        self
    }

    /// Set the minimum average per-joint score for person pruning.
    #[must_use]
    pub const fn with_min_average_score(mut self, score: f32) -> Self {
        self.min_average_score = score;
        self
    }

    /// Set the angle tolerance in degrees.
    #[must_use]
    pub const fn with_tolerance(mut self, degrees: f32) -> Self {
        self.tolerance = degrees;
        self
    }

    /// Set the maximum angle difference in degrees.
    #[must_use]
    pub const fn with_max_angle_difference(mut self, degrees: f32) -> Self {
        self.max_angle_difference = degrees;
        self
    }

    /// Set the out-of-frame penalty fraction (0.0 to 1.0).
    #[must_use]
    pub const fn with_out_of_frame_penalty(mut self, fraction: f32) -> Self {
        self.out_of_frame_penalty = fraction;
        self
    }

    /// Set the comparison window half-width in frames.
    #[must_use]
    pub const fn with_window_half_width(mut self, frames: usize) -> Self {
        self.window_half_width = frames;
        self
    }

    /// Set the Gaussian smoothing kernel size and sigma.
    #[must_use]
    pub const fn with_smoothing(mut self, kernel_size: usize, sigma: f32) -> Self {
        self.kernel_size = kernel_size;
        self.sigma = sigma;
        self
    }

    /// Set whether the webcam image is mirrored.
    #[must_use]
    pub const fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    /// Number of frames held by the full comparison window.
    #[must_use]
    pub const fn window_len(&self) -> usize {
        1 + 2 * self.window_half_width
    }

    /// Check the configuration for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ConfigError`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
            return Err(PoseError::ConfigError(format!(
                "kernel_size must be odd and non-zero, got {}",
                self.kernel_size
            )));
        }
        if self.sigma <= 0.0 {
            return Err(PoseError::ConfigError(format!(
                "sigma must be positive, got {}",
                self.sigma
            )));
        }
        if self.integral_samples < 2 {
            return Err(PoseError::ConfigError(format!(
                "integral_samples must be at least 2, got {}",
                self.integral_samples
            )));
        }
        if self.max_angle_difference <= 0.0 {
            return Err(PoseError::ConfigError(format!(
                "max_angle_difference must be positive, got {}",
                self.max_angle_difference
            )));
        }
        if !(0.0..=1.0).contains(&self.out_of_frame_penalty) {
            return Err(PoseError::ConfigError(format!(
                "out_of_frame_penalty must be in [0, 1], got {}",
                self.out_of_frame_penalty
            )));
        }
        if self.tolerance < 0.0 {
            return Err(PoseError::ConfigError(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
