// Pose Coach 🚀 MIT License

//! Similarity scoring between the live skeleton and reference frames.
//!
//! Each scored limb is a 2D direction vector; the live and reference
//! versions are compared by angle, tolerances applied, and the per-limb
//! differences summed into a 0-100 frame score. The scorer searches the
//! whole reference window and reports the best-matching frame, so a player
//! slightly ahead of or behind the recording is not punished for timing.

use crate::config::PipelineConfig;
use crate::reference::{ReferenceBuffer, ReferenceFrame};
use crate::topology::{CAMERA_TO_RECORDING, SCORED_LIMBS};
use crate::tracking::LiveFrame;

/// Discrete feedback bucket for one scored comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTier {
    Excellent,
    Great,
    Good,
    Ok,
    Close,
    Miss,
}

impl FeedbackTier {
    /// Map a 0-100 score onto its tier. Boundaries are exclusive: a score
    /// of exactly 90 is Great, not Excellent.
    #[must_use]
    pub fn from_score(score: f32) -> Self {
        if score > 90.0 {
            Self::Excellent
        } else if score > 80.0 {
            Self::Great
        } else if score > 70.0 {
            Self::Good
        } else if score > 60.0 {
            Self::Ok
        } else if score > 50.0 {
            Self::Close
        } else {
            Self::Miss
        }
    }

    /// Display string shown to the player.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent!",
            Self::Great => "Great!",
            Self::Good => "Good",
            Self::Ok => "OK",
            Self::Close => "Close",
            Self::Miss => "Miss",
        }
    }

    /// Sound cue identifier for this tier.
    #[must_use]
    pub fn sound_cue(&self) -> &'static str {
        match self {
            Self::Excellent => "feedback_excellent",
            Self::Great => "feedback_great",
            Self::Good => "feedback_good",
            Self::Ok => "feedback_ok",
            Self::Close => "feedback_close",
            Self::Miss => "feedback_miss",
        }
    }

    /// Histogram bucket index, Excellent first.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::Excellent => 0,
            Self::Great => 1,
            Self::Good => 2,
            Self::Ok => 3,
            Self::Close => 4,
            Self::Miss => 5,
        }
    }
}

/// Result of scoring one live detection against the reference window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameScore {
    /// Best score across the window, in [0, 100].
    pub score: f32,
    /// Feedback tier derived from the score.
    pub tier: FeedbackTier,
}

/// Running end-of-level statistics.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionStats {
    total_score: f32,
    comparisons: u32,
    histogram: [u32; 6],
}

impl SessionStats {
    /// Create empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one scored comparison.
    pub fn record(&mut self, result: FrameScore) {
        self.total_score += result.score;
        self.comparisons += 1;
        self.histogram[result.tier.index()] += 1;
    }

    /// Number of comparisons recorded so far.
    #[must_use]
    pub fn comparisons(&self) -> u32 {
        self.comparisons
    }

    /// Tier histogram, Excellent bucket first.
    #[must_use]
    pub fn histogram(&self) -> [u32; 6] {
        self.histogram
    }

    /// Rounded average score over all comparisons, or 0 when none were
    /// recorded.
    #[must_use]
    pub fn average_score(&self) -> i32 {
        if self.comparisons == 0 {
            0
        } else {
            (self.total_score / self.comparisons as f32).round() as i32
        }
    }

    /// Forget everything (level end).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Compares the live skeleton against the reference window.
#[derive(Debug)]
pub struct SimilarityScorer {
    config: PipelineConfig,
    stats: SessionStats,
}

impl SimilarityScorer {
    /// Create a scorer with the given tuning.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            stats: SessionStats::new(),
        }
    }

    /// Statistics accumulated across all comparisons this level.
    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Reset accumulated statistics (level end).
    pub fn reset(&mut self) {
        self.stats.reset();
    }

    /// Score the live frame against every frame of the reference window and
    /// report the best match.
    ///
    /// Limbs whose live joints are missing, or whose direction vectors
    /// degenerate to zero length, contribute the fixed out-of-frame penalty.
    /// Limbs the recording does not carry at all are excluded from both the
    /// difference total and the maximum possible error, so a sparse
    /// recording is not silently punished.
    pub fn compare(&mut self, live: &LiveFrame, window: &ReferenceBuffer) -> FrameScore {
        let mut best: f32 = 0.0;
        for reference in window.iter() {
            best = best.max(self.score_frame(live, reference));
        }
        let result = FrameScore {
            score: best,
            tier: FeedbackTier::from_score(best),
        };
        self.stats.record(result);
        result
    }

    fn score_frame(&self, live: &LiveFrame, reference: &ReferenceFrame) -> f32 {
        let max_angle = self.config.max_angle_difference;
        let padded = self.config.out_of_frame_penalty * max_angle;
        let live_sign = if self.config.mirrored { -1.0 } else { 1.0 };

        let mut max_total = max_angle * SCORED_LIMBS.len() as f32;
        let mut total_difference = 0.0;

        for &(root, tip) in &SCORED_LIMBS {
            let live_root = live.joints[root];
            let live_tip = live.joints[tip];
            if live_root.is_missing() || live_tip.is_missing() {
                total_difference += padded;
                continue;
            }

            let rec_limb = recording_limb(reference, root, tip);
            let Some((ref_root, ref_tip)) = rec_limb else {
                // Recording has no data for this limb at all; score the
                // frame out of a smaller maximum instead of penalizing.
                max_total -= max_angle;
                continue;
            };

            let ref_vec = [ref_tip[0] - ref_root[0], ref_tip[1] - ref_root[1]];
            let live_vec = [
                live_sign * (live_tip.x - live_root.x),
                live_sign * (live_tip.y - live_root.y),
            ];

            match limb_angle_difference(ref_vec, live_vec) {
                Some(angle) => {
                    total_difference +=
                        (angle - self.config.tolerance).clamp(0.0, max_angle);
                }
                None => total_difference += padded,
            }
        }

        if max_total == 0.0 {
            0.0
        } else {
            (max_total - total_difference) / max_total * 100.0
        }
    }
}

/// Both endpoint positions of a scored limb in recording coordinates, or
/// `None` when the recording layout lacks either joint.
fn recording_limb(
    reference: &ReferenceFrame,
    root: usize,
    tip: usize,
) -> Option<([f32; 2], [f32; 2])> {
    let root_index = usize::try_from(CAMERA_TO_RECORDING[root]).ok()?;
    let tip_index = usize::try_from(CAMERA_TO_RECORDING[tip]).ok()?;
    Some((reference.joint(root_index)?, reference.joint(tip_index)?))
}

/// Angle in degrees between two limb direction vectors, or `None` when
/// either vector has zero magnitude and the dot product is undefined.
#[must_use]
pub fn limb_angle_difference(reference: [f32; 2], live: [f32; 2]) -> Option<f32> {
    let ref_mag = reference[0].hypot(reference[1]);
    let live_mag = live[0].hypot(live[1]);
    if ref_mag * live_mag == 0.0 {
        return None;
    }

    let dot = (reference[0] * live[0] + reference[1] * live[1]) / (ref_mag * live_mag);
    Some(dot.clamp(-1.0, 1.0).acos().to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::NUM_JOINTS;
    use crate::tracking::LiveJoint;

    fn live_frame(positions: &[(usize, f32, f32)]) -> LiveFrame {
        let mut joints = [LiveJoint::MISSING; NUM_JOINTS];
        for &(slot, x, y) in positions {
            joints[slot] = LiveJoint {
                x,
                y,
                score: 0.9,
                candidate: slot as i32,
            };
        }
        LiveFrame { joints }
    }

    /// A recording frame mirroring the live frame: every mapped recording
    /// joint carries the negated live position, matching the mirrored-camera
    /// sign convention.
    fn matching_reference(live: &LiveFrame) -> ReferenceFrame {
        let mut joints = vec![[0.0_f32, 0.0]; 33];
        for (slot, joint) in live.joints.iter().enumerate() {
            if joint.is_missing() {
                continue;
            }
            if let Ok(rec) = usize::try_from(CAMERA_TO_RECORDING[slot]) {
                joints[rec] = [-joint.x, -joint.y];
            }
        }
        ReferenceFrame::new(joints)
    }

    /// All eighteen live joints placed so every scored limb has a nonzero
    /// direction vector.
    fn full_live_frame() -> LiveFrame {
        let positions: Vec<(usize, f32, f32)> = (0..NUM_JOINTS)
            .map(|slot| (slot, 10.0 + 7.0 * slot as f32, 20.0 + 3.0 * (slot % 5) as f32))
            .collect();
        live_frame(&positions)
    }

    #[test]
    fn test_identical_pose_scores_100() {
        let live = full_live_frame();
        let reference = matching_reference(&live);
        let mut window = ReferenceBuffer::new(0);
        window.push(reference);

        let mut scorer = SimilarityScorer::new(PipelineConfig::new());
        let result = scorer.compare(&live, &window);
        assert!((result.score - 100.0).abs() < 0.1);
        assert_eq!(result.tier, FeedbackTier::Excellent);
    }

    #[test]
    fn test_matching_vectors_zero_angle() {
        let angle = limb_angle_difference([1.0, 2.0], [2.0, 4.0]).expect("defined");
        assert!(angle.abs() < 1e-2);
    }

    #[test]
    fn test_opposite_vectors_180_degrees() {
        let angle = limb_angle_difference([1.0, 0.0], [-1.0, 0.0]).expect("defined");
        assert!((angle - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_perpendicular_vectors_90_degrees() {
        let angle = limb_angle_difference([1.0, 0.0], [0.0, 1.0]).expect("defined");
        assert!((angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_magnitude_is_incomparable() {
        assert_eq!(limb_angle_difference([0.0, 0.0], [1.0, 1.0]), None);
        assert_eq!(limb_angle_difference([1.0, 1.0], [0.0, 0.0]), None);
    }

    #[test]
    fn test_missing_joints_take_penalty_not_zero() {
        // A frame with every joint missing pads all ten limbs with the
        // out-of-frame penalty. With penalty fraction 0.5 that lands the
        // score at exactly 50.
        let live = LiveFrame {
            joints: [LiveJoint::MISSING; NUM_JOINTS],
        };
        let mut window = ReferenceBuffer::new(0);
        window.push(matching_reference(&full_live_frame()));

        let mut scorer = SimilarityScorer::new(PipelineConfig::new());
        let result = scorer.compare(&live, &window);
        assert!((result.score - 50.0).abs() < 1e-3);
        assert_eq!(result.tier, FeedbackTier::Miss);
    }

    #[test]
    fn test_unmapped_recording_limb_shrinks_maximum() {
        // A recording truncated to 13 joints only covers the shoulder limb
        // (recording indices 11 and 12); the other nine limbs are excluded
        // from the maximum rather than scored as mistakes.
        let live = full_live_frame();
        let full = matching_reference(&live);
        let truncated: Vec<[f32; 2]> = (0..13).filter_map(|i| full.joint(i)).collect();
        let mut window = ReferenceBuffer::new(0);
        window.push(ReferenceFrame::new(truncated));

        let mut scorer = SimilarityScorer::new(PipelineConfig::new());
        let result = scorer.compare(&live, &window);
        assert!((result.score - 100.0).abs() < 0.1);
    }

    #[test]
    fn test_all_limbs_unmapped_scores_zero() {
        // A recording so short that no scored limb maps into it (the lowest
        // scored recording index is 11) leaves a maximum possible error of
        // zero; the frame scores exactly 0 instead of dividing by it.
        let live = full_live_frame();
        let mut window = ReferenceBuffer::new(0);
        window.push(ReferenceFrame::new(vec![[1.0, 1.0]; 5]));

        let mut scorer = SimilarityScorer::new(PipelineConfig::new());
        let result = scorer.compare(&live, &window);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.tier, FeedbackTier::Miss);
    }

    #[test]
    fn test_window_best_of() {
        // One perfect frame among garbage frames gives the same score as
        // scoring the perfect frame alone.
        let live = full_live_frame();
        let perfect = matching_reference(&live);
        let garbage = {
            let mut joints = vec![[0.0_f32, 0.0]; 33];
            for (i, j) in joints.iter_mut().enumerate() {
                // Reverse every limb direction relative to the match.
                if let Some(p) = perfect.joint(i) {
                    *j = [-p[0], -p[1]];
                }
            }
            ReferenceFrame::new(joints)
        };

        let mut window = ReferenceBuffer::new(1);
        window.push(garbage.clone());
        window.push(perfect);
        window.push(garbage);

        let mut scorer = SimilarityScorer::new(PipelineConfig::new());
        let result = scorer.compare(&live, &window);
        assert!((result.score - 100.0).abs() < 0.1);
    }

    #[test]
    fn test_tolerance_absorbs_small_errors() {
        // Rotate the live pose's limbs by tilting every joint slightly; a
        // large tolerance absorbs the difference completely.
        let live = full_live_frame();
        let mut skewed = live.clone();
        for joint in &mut skewed.joints {
            joint.y += joint.x * 0.05;
        }
        let mut window = ReferenceBuffer::new(0);
        window.push(matching_reference(&live));

        let strict = SimilarityScorer::new(PipelineConfig::new())
            .score_frame(&skewed, &matching_reference(&live));
        let lenient = SimilarityScorer::new(PipelineConfig::new().with_tolerance(30.0))
            .score_frame(&skewed, &matching_reference(&live));
        assert!(strict < 99.9);
        assert!((lenient - 100.0).abs() < 0.1);
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(FeedbackTier::from_score(95.0), FeedbackTier::Excellent);
        assert_eq!(FeedbackTier::from_score(90.0), FeedbackTier::Great);
        assert_eq!(FeedbackTier::from_score(80.0), FeedbackTier::Good);
        assert_eq!(FeedbackTier::from_score(70.0), FeedbackTier::Ok);
        assert_eq!(FeedbackTier::from_score(60.0), FeedbackTier::Close);
        assert_eq!(FeedbackTier::from_score(50.0), FeedbackTier::Miss);
        assert_eq!(FeedbackTier::from_score(0.0), FeedbackTier::Miss);
    }

    #[test]
    fn test_session_stats_average_and_histogram() {
        let mut stats = SessionStats::new();
        assert_eq!(stats.average_score(), 0);

        stats.record(FrameScore {
            score: 95.0,
            tier: FeedbackTier::Excellent,
        });
        stats.record(FrameScore {
            score: 40.0,
            tier: FeedbackTier::Miss,
        });
        assert_eq!(stats.comparisons(), 2);
        assert_eq!(stats.average_score(), 68);
        assert_eq!(stats.histogram(), [1, 0, 0, 0, 0, 1]);

        stats.reset();
        assert_eq!(stats.comparisons(), 0);
        assert_eq!(stats.average_score(), 0);
    }
}
