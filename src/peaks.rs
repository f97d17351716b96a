// Pose Coach 🚀 MIT License

//! Heatmap peak extraction.
//!
//! Converts the smoothed per-part heatmaps into joint-position candidates.
//! Candidate indices are assigned in a fixed scan order (channel, then x,
//! then y) so that downstream index bookkeeping is reproducible for a given
//! input.

use ndarray::Array3;

use crate::config::PipelineConfig;
use crate::smoothing::gaussian_filter_3d;
use crate::topology::NUM_JOINTS;

/// One detected joint peak.
///
/// Immutable once created; later pipeline stages refer to it through its
/// global `id` rather than duplicating it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Pixel x position.
    pub x: usize,
    /// Pixel y position.
    pub y: usize,
    /// Heatmap confidence at the peak (0 to 1).
    pub score: f32,
    /// Globally unique index, strictly increasing in discovery order.
    pub id: usize,
}

/// All peaks found in one frame's heatmaps.
#[derive(Debug, Clone, Default)]
pub struct PeakMap {
    /// Candidates grouped by body-part channel, in scan order.
    pub by_part: Vec<Vec<Candidate>>,
    /// Flat candidate pool; `all[c.id] == c` for every candidate.
    pub all: Vec<Candidate>,
}

impl PeakMap {
    /// Total number of candidates across all parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Whether no peaks were found at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Find all joint-position candidates in a `(height, width, channels)`
/// heatmap tensor.
///
/// The heatmap is Gaussian-smoothed first. A pixel qualifies as a peak when
/// its value exceeds the configured threshold and is not smaller than any of
/// its four axis neighbors that lie in bounds; edge pixels are only compared
/// against their in-bounds neighbors. Only the first [`NUM_JOINTS`] channels
/// are scanned (the final channel is background).
///
/// A channel with no peaks yields an empty list, not an error.
#[must_use]
pub fn find_peaks(heatmaps: &Array3<f32>, config: &PipelineConfig) -> PeakMap {
    let smoothed = gaussian_filter_3d(heatmaps, config.kernel_size, config.sigma);
    let (height, width, channels) = smoothed.dim();

    let mut peaks = PeakMap {
        by_part: Vec::with_capacity(NUM_JOINTS),
        all: Vec::new(),
    };

    for part in 0..NUM_JOINTS.min(channels) {
        let mut part_candidates = Vec::new();

        for x in 0..width {
            for y in 0..height {
                let value = smoothed[[y, x, part]];
                if value <= config.peak_threshold {
                    continue;
                }
                if x > 0 && value < smoothed[[y, x - 1, part]] {
                    continue;
                }
                if x + 1 < width && value < smoothed[[y, x + 1, part]] {
                    continue;
                }
                if y > 0 && value < smoothed[[y - 1, x, part]] {
                    continue;
                }
                if y + 1 < height && value < smoothed[[y + 1, x, part]] {
                    continue;
                }

                let candidate = Candidate {
                    x,
                    y,
                    score: value,
                    id: peaks.all.len(),
                };
                part_candidates.push(candidate);
                peaks.all.push(candidate);
            }
        }

        peaks.by_part.push(part_candidates);
    }

    // Channels missing from a short tensor still get (empty) slots so that
    // indexing by part stays valid.
    while peaks.by_part.len() < NUM_JOINTS {
        peaks.by_part.push(Vec::new());
    }

    peaks
}
