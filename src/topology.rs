// Pose Coach 🚀 MIT License

//! Fixed body-model topology tables.
//!
//! Everything here is hard-wired to a specific 18-joint OpenPose-style body
//! model with 19 limb types and a 38-channel part-affinity field. The tables
//! are configuration constants, not inferred from data; [`validate`] is run
//! once at pipeline construction and fails fast if a table references a
//! channel outside the declared tensor layout.

use crate::error::{PoseError, Result};

/// Number of body joints in the detection model's layout.
pub const NUM_JOINTS: usize = 18;

/// Number of predefined limb types.
pub const NUM_LIMBS: usize = 19;

/// Heatmap tensor channels (18 body parts + 1 background).
pub const HEATMAP_CHANNELS: usize = 19;

/// Part-affinity field tensor channels (19 limbs x 2 vector components).
pub const PAF_CHANNELS: usize = 38;

/// Number of limb pairs used by the similarity scorer.
pub const NUM_SCORED_LIMBS: usize = 10;

/// Limb types with index below this may seed a brand-new skeleton during
/// assembly; the remaining (auxiliary face) limbs may only extend one.
pub const SEED_LIMB_COUNT: usize = 17;

/// Joint slot indices for the wrist/elbow pairs used by the left/right
/// hand-swap heuristic.
pub const RIGHT_ELBOW: usize = 3;
pub const RIGHT_WRIST: usize = 4;
pub const LEFT_ELBOW: usize = 6;
pub const LEFT_WRIST: usize = 7;

/// Human-readable joint names, in slot order.
pub const JOINT_NAMES: [&str; NUM_JOINTS] = [
    "nose",
    "neck",
    "right_shoulder",
    "right_elbow",
    "right_wrist",
    "left_shoulder",
    "left_elbow",
    "left_wrist",
    "right_hip",
    "right_knee",
    "right_ankle",
    "left_hip",
    "left_knee",
    "left_ankle",
    "right_eye",
    "left_eye",
    "right_ear",
    "left_ear",
];

/// Joint slot pairs `(a, b)` for each limb type, in assembly order.
///
/// The first 12 limbs are torso/arm/leg connections rooted at the neck, the
/// next 5 cover the head, and the final 2 are the auxiliary
/// shoulder-to-ear links that cannot seed a new person.
pub const LIMB_JOINTS: [(usize, usize); NUM_LIMBS] = [
    (1, 2),
    (1, 5),
    (2, 3),
    (3, 4),
    (5, 6),
    (6, 7),
    (1, 8),
    (8, 9),
    (9, 10),
    (1, 11),
    (11, 12),
    (12, 13),
    (1, 0),
    (0, 14),
    (14, 16),
    (0, 15),
    (15, 17),
    (2, 16),
    (5, 17),
];

/// Part-affinity channel pairs `(x, y)` carrying each limb's direction field,
/// aligned index-for-index with [`LIMB_JOINTS`].
pub const LIMB_PAF_CHANNELS: [(usize, usize); NUM_LIMBS] = [
    (12, 13),
    (20, 21),
    (14, 15),
    (16, 17),
    (22, 23),
    (24, 25),
    (0, 1),
    (2, 3),
    (4, 5),
    (6, 7),
    (8, 9),
    (10, 11),
    (28, 29),
    (30, 31),
    (34, 35),
    (32, 33),
    (36, 37),
    (18, 19),
    (26, 27),
];

/// Joint slot pairs compared by the similarity scorer:
/// right arm, left arm, right leg, left leg, then shoulders and hips.
pub const SCORED_LIMBS: [(usize, usize); NUM_SCORED_LIMBS] = [
    (2, 3),
    (3, 4),
    (5, 6),
    (6, 7),
    (8, 9),
    (9, 10),
    (11, 12),
    (12, 13),
    (2, 5),
    (8, 11),
];

/// Mapping from the detection model's joint slots to the reference
/// recording's joint layout. `-1` marks a joint the recording does not carry.
pub const CAMERA_TO_RECORDING: [i32; NUM_JOINTS] = [
    0, -1, 12, 14, 16, 11, 13, 15, 24, 26, 28, 23, 25, 27, 5, 2, 8, 7,
];

/// Parent joint slot for each joint, used by presentation code to draw
/// marker bones for the tracked subject.
pub const MARKER_PARENTS: [usize; NUM_JOINTS] =
    [0, 0, 1, 2, 3, 1, 5, 6, 1, 8, 9, 1, 11, 12, 0, 0, 14, 15];

/// Cross-check the topology tables against the declared tensor layout.
///
/// # Errors
///
/// Returns [`PoseError::TopologyError`] if any limb references a joint slot
/// or affinity channel outside the fixed tensor layout. This is a
/// configuration-time invariant violation, so callers should treat a failure
/// here as fatal rather than retrying per tick.
pub fn validate() -> Result<()> {
    for (k, &(a, b)) in LIMB_JOINTS.iter().enumerate() {
        if a >= NUM_JOINTS || b >= NUM_JOINTS {
            return Err(PoseError::TopologyError(format!(
                "limb {k} references joint slot ({a}, {b}) outside 0..{NUM_JOINTS}"
            )));
        }
    }
    for (k, &(cx, cy)) in LIMB_PAF_CHANNELS.iter().enumerate() {
        if cx >= PAF_CHANNELS || cy >= PAF_CHANNELS {
            return Err(PoseError::TopologyError(format!(
                "limb {k} references affinity channel ({cx}, {cy}) outside 0..{PAF_CHANNELS}"
            )));
        }
    }
    for &(a, b) in &SCORED_LIMBS {
        if a >= NUM_JOINTS || b >= NUM_JOINTS {
            return Err(PoseError::TopologyError(format!(
                "scored limb ({a}, {b}) outside 0..{NUM_JOINTS}"
            )));
        }
    }
    if NUM_JOINTS + 1 != HEATMAP_CHANNELS {
        return Err(PoseError::TopologyError(format!(
            "heatmap layout expects {NUM_JOINTS} parts + background, got {HEATMAP_CHANNELS} channels"
        )));
    }
    if NUM_LIMBS * 2 != PAF_CHANNELS {
        return Err(PoseError::TopologyError(format!(
            "affinity layout expects {NUM_LIMBS} limb pairs, got {PAF_CHANNELS} channels"
        )));
    }
    Ok(())
}
