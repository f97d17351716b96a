// Pose Coach 🚀 MIT License

//! Person assembly.
//!
//! Merges per-limb connections into complete per-person skeletons. Limb
//! types are processed in fixed topology order; each accepted connection
//! either extends an existing skeleton, merges two of them, or seeds a new
//! one, and skeletons that end up too sparse or too weak are pruned.

use crate::config::PipelineConfig;
use crate::connections::Connection;
use crate::peaks::PeakMap;
use crate::topology::{LIMB_JOINTS, NUM_JOINTS, NUM_LIMBS, SEED_LIMB_COUNT};

/// Sentinel for a joint slot with no assigned candidate.
pub const UNSET: i32 = -1;

/// One assembled person: 18 joint slots holding global candidate indices.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonSkeleton {
    /// Candidate index per joint slot, or [`UNSET`].
    pub joints: [i32; NUM_JOINTS],
    /// Sum of endpoint confidences and connection scores.
    pub total_score: f32,
    /// Number of filled joint slots.
    pub parts: u32,
}

impl PersonSkeleton {
    /// Create an empty skeleton with every slot unset.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            joints: [UNSET; NUM_JOINTS],
            total_score: 0.0,
            parts: 0,
        }
    }

    /// Average per-joint score, or 0 when no slots are filled.
    #[must_use]
    pub fn average_score(&self) -> f32 {
        if self.parts == 0 {
            0.0
        } else {
            self.total_score / self.parts as f32
        }
    }

    /// Whether any filled slot is shared with `other`.
    fn conflicts_with(&self, other: &Self) -> bool {
        self.joints
            .iter()
            .zip(other.joints.iter())
            .any(|(&a, &b)| a != UNSET && b != UNSET)
    }

    /// Slot-wise union of `other` into `self`, summing scores and counts.
    /// Caller must have checked [`Self::conflicts_with`] first.
    fn merge(&mut self, other: &Self) {
        for (slot, &theirs) in self.joints.iter_mut().zip(other.joints.iter()) {
            if *slot == UNSET {
                *slot = theirs;
            }
        }
        self.total_score += other.total_score;
        self.parts += other.parts;
    }
}

impl Default for PersonSkeleton {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble per-person skeletons from one frame's limb connections.
///
/// For each connection `(A, B)` of limb `k` mapping to joint slots
/// `(slot_a, slot_b)`:
///
/// * no skeleton holds A or B: seed a new skeleton, but only for the first
///   [`SEED_LIMB_COUNT`] torso-rooted limb types. Auxiliary face limbs
///   cannot start a person on their own.
/// * one skeleton matches: fill its `slot_b` if not already equal to B.
/// * two distinct skeletons match with no slot conflict: merge them.
/// * two match **with** a conflict: treated as the one-match case against
///   the first matched skeleton; the second match is left untouched.
///
/// Afterwards, skeletons with fewer than `min_joint_count` joints or an
/// average per-joint score below `min_average_score` are discarded.
#[must_use]
pub fn assemble_people(
    peaks: &PeakMap,
    connections: &[Option<Vec<Connection>>],
    config: &PipelineConfig,
) -> Vec<PersonSkeleton> {
    let mut people: Vec<PersonSkeleton> = Vec::new();

    for k in 0..NUM_LIMBS.min(connections.len()) {
        let Some(limb_connections) = &connections[k] else {
            continue;
        };
        let (slot_a, slot_b) = LIMB_JOINTS[k];

        for conn in limb_connections {
            let part_a = conn.cand_a as i32;
            let part_b = conn.cand_b as i32;

            let mut matched = [usize::MAX; 2];
            let mut found = 0usize;
            for (idx, person) in people.iter().enumerate() {
                if person.joints[slot_a] == part_a || person.joints[slot_b] == part_b {
                    if found < 2 {
                        matched[found] = idx;
                    }
                    found += 1;
                }
            }

            match found {
                0 if k < SEED_LIMB_COUNT => {
                    let mut person = PersonSkeleton::new();
                    person.joints[slot_a] = part_a;
                    person.joints[slot_b] = part_b;
                    person.parts = 2;
                    person.total_score = peaks.all[conn.cand_a].score
                        + peaks.all[conn.cand_b].score
                        + conn.score;
                    people.push(person);
                }
                0 => {} // auxiliary limb with nothing to attach to
                1 => {
                    fill_slot_b(&mut people[matched[0]], slot_b, part_b, conn, peaks);
                }
                _ => {
                    let (j1, j2) = (matched[0], matched[1]);
                    if people[j1].conflicts_with(&people[j2]) {
                        fill_slot_b(&mut people[j1], slot_b, part_b, conn, peaks);
                    } else {
                        let other = people.remove(j2);
                        people[j1].merge(&other);
                        people[j1].total_score += conn.score;
                    }
                }
            }
        }
    }

    people.retain(|person| {
        person.parts >= config.min_joint_count
            && person.average_score() >= config.min_average_score
    });
    people
}

/// One-match update: claim `slot_b` for the connection's B candidate unless
/// the skeleton already holds exactly that candidate there.
fn fill_slot_b(
    person: &mut PersonSkeleton,
    slot_b: usize,
    part_b: i32,
    conn: &Connection,
    peaks: &PeakMap,
) {
    if person.joints[slot_b] != part_b {
        person.joints[slot_b] = part_b;
        person.parts += 1;
        person.total_score += peaks.all[conn.cand_b].score + conn.score;
    }
}
