// Pose Coach 🚀 MIT License

//! Main-subject selection and frame-to-frame tracking.
//!
//! Several people may be assembled per frame; the tracker picks the one most
//! likely to be the player by minimizing total joint displacement against
//! the previous tick's selection, and corrects left/right hand flips with a
//! two-hypothesis swap test.

use crate::assembly::PersonSkeleton;
use crate::peaks::Candidate;
use crate::topology::{LEFT_ELBOW, LEFT_WRIST, NUM_JOINTS, RIGHT_ELBOW, RIGHT_WRIST};

/// One resolved joint of the tracked subject.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveJoint {
    /// Pixel x position, or `-1.0` when missing.
    pub x: f32,
    /// Pixel y position, or `-1.0` when missing.
    pub y: f32,
    /// Detection confidence, or `-1.0` when missing.
    pub score: f32,
    /// Global candidate index, or `-1` when missing.
    pub candidate: i32,
}

impl LiveJoint {
    /// Sentinel value for an undetected joint.
    pub const MISSING: Self = Self {
        x: -1.0,
        y: -1.0,
        score: -1.0,
        candidate: -1,
    };

    /// Whether this joint was not detected this tick.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.x < 0.0
    }
}

/// The selected skeleton for one capture tick.
///
/// Produced fresh each tick; the tracker internally retains the previous
/// tick's frame for the displacement and hand-swap heuristics.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveFrame {
    /// All joint slots, missing ones holding [`LiveJoint::MISSING`].
    pub joints: [LiveJoint; NUM_JOINTS],
}

impl LiveFrame {
    /// Resolve a skeleton's candidate indices into joint positions.
    #[must_use]
    pub fn from_skeleton(skeleton: &PersonSkeleton, candidates: &[Candidate]) -> Self {
        let mut joints = [LiveJoint::MISSING; NUM_JOINTS];
        for (slot, &cand) in skeleton.joints.iter().enumerate() {
            if cand >= 0 {
                let c = candidates[cand as usize];
                joints[slot] = LiveJoint {
                    x: c.x as f32,
                    y: c.y as f32,
                    score: c.score,
                    candidate: cand,
                };
            }
        }
        Self { joints }
    }

    /// Number of joints detected this tick.
    #[must_use]
    pub fn detected_joints(&self) -> usize {
        self.joints.iter().filter(|j| !j.is_missing()).count()
    }
}

/// How much of the player's body the camera is expected to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Player stands far enough back for the full body to be visible.
    WholeBody,
    /// Seated or close-up play; only the upper body is expected.
    HalfBody,
}

/// Calibration check: is enough of the body on screen for this mode?
///
/// Thresholds are deliberately looser than the joint counts imply, to
/// absorb occasional detection dropouts.
#[must_use]
pub fn entire_body_visible(joints_detected: usize, mode: CaptureMode) -> bool {
    match mode {
        CaptureMode::WholeBody => joints_detected >= 15,
        CaptureMode::HalfBody => joints_detected >= 7,
    }
}

/// Tracks which assembled skeleton is the player across ticks.
#[derive(Debug, Default)]
pub struct SubjectTracker {
    prev: Option<LiveFrame>,
}

impl SubjectTracker {
    /// Create a tracker with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The previous tick's selected frame, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&LiveFrame> {
        self.prev.as_ref()
    }

    /// Drop all history (level end or tracking reset).
    pub fn reset(&mut self) {
        self.prev = None;
    }

    /// Pick the skeleton most likely to be the tracked player.
    ///
    /// Dissimilarity per skeleton is the sum over all joint slots of the
    /// Euclidean distance to the previous frame's joint; a missing current
    /// joint contributes the bare magnitude of the previous joint position
    /// as a penalty. With no history every skeleton scores zero and the
    /// first wins; an empty skeleton list yields `None` ("no detection")
    /// and leaves the history untouched.
    ///
    /// After selection, a left/right hand-swap correction runs: when both
    /// wrists are present in the current and previous frames and swapping
    /// both wrist assignments strictly reduces both matching distances, the
    /// wrist and elbow joints are exchanged in place.
    pub fn select(
        &mut self,
        people: &[PersonSkeleton],
        candidates: &[Candidate],
    ) -> Option<LiveFrame> {
        if people.is_empty() {
            return None;
        }

        let mut selected = LiveFrame::from_skeleton(&people[0], candidates);
        let mut best_diff = self
            .prev
            .as_ref()
            .map_or(0.0, |prev| displacement(&selected, prev));
        for skeleton in &people[1..] {
            let frame = LiveFrame::from_skeleton(skeleton, candidates);
            let diff = self
                .prev
                .as_ref()
                .map_or(0.0, |prev| displacement(&frame, prev));
            if diff < best_diff {
                best_diff = diff;
                selected = frame;
            }
        }
        if let Some(prev) = &self.prev {
            correct_hand_swap(&mut selected, prev);
        }
        self.prev = Some(selected.clone());
        Some(selected)
    }
}

/// Total joint displacement between a candidate frame and the previous one.
fn displacement(current: &LiveFrame, prev: &LiveFrame) -> f32 {
    let mut total = 0.0;
    for (cur, old) in current.joints.iter().zip(prev.joints.iter()) {
        if cur.is_missing() {
            total += old.x.hypot(old.y);
        } else {
            total += (cur.x - old.x).hypot(cur.y - old.y);
        }
    }
    total
}

/// Two-hypothesis left/right disambiguation for wrist tracking flips.
///
/// If matching each wrist to its previous same-side position is worse than
/// matching it to the opposite side for both hands, the detector almost
/// certainly flipped left and right this tick; swap wrists and elbows back.
///
/// Whole joint entries are exchanged, candidate ids included, so each slot
/// keeps pointing at the peak-pool entry its coordinates came from.
fn correct_hand_swap(frame: &mut LiveFrame, prev: &LiveFrame) {
    let cur_r = frame.joints[RIGHT_WRIST];
    let cur_l = frame.joints[LEFT_WRIST];
    let prev_r = prev.joints[RIGHT_WRIST];
    let prev_l = prev.joints[LEFT_WRIST];

    if cur_r.is_missing() || cur_l.is_missing() || prev_r.is_missing() || prev_l.is_missing() {
        return;
    }

    let r_matched = (cur_r.x - prev_r.x).hypot(cur_r.y - prev_r.y);
    let l_matched = (cur_l.x - prev_l.x).hypot(cur_l.y - prev_l.y);
    let r_switched = (cur_r.x - prev_l.x).hypot(cur_r.y - prev_l.y);
    let l_switched = (cur_l.x - prev_r.x).hypot(cur_l.y - prev_r.y);

    if l_matched > l_switched && r_matched > r_switched {
        frame.joints.swap(RIGHT_WRIST, LEFT_WRIST);
        frame.joints.swap(RIGHT_ELBOW, LEFT_ELBOW);
    }
}
