// Pose Coach 🚀 MIT License

//! Limb connection matching.
//!
//! For each limb type, scores every candidate pair across its two endpoint
//! part channels with a part-affinity line integral, then greedily keeps the
//! best non-conflicting pairs.

use std::cmp::Ordering;

use ndarray::Array3;

use crate::config::PipelineConfig;
use crate::peaks::PeakMap;
use crate::topology::{LIMB_JOINTS, LIMB_PAF_CHANNELS, NUM_LIMBS};

/// A floor on the candidate-pair distance to avoid division by zero.
const MIN_LIMB_NORM: f32 = 0.001;

/// A proposed limb edge between two candidates, valid for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Global candidate index of the A-side joint.
    pub cand_a: usize,
    /// Global candidate index of the B-side joint.
    pub cand_b: usize,
    /// Alignment score including the distance prior.
    pub score: f32,
    /// Rank of the A-side candidate within its part channel's list.
    pub local_a: usize,
    /// Rank of the B-side candidate within its part channel's list.
    pub local_b: usize,
}

/// Scored pair under consideration before greedy selection.
#[derive(Debug, Clone, Copy)]
struct ConnectionCandidate {
    local_a: usize,
    local_b: usize,
    score_with_prior: f32,
    /// Prior-inclusive score plus both endpoint confidences. Retained for
    /// diagnostics; the selection comparator uses `score_with_prior` alone.
    #[allow(dead_code)]
    total_score: f32,
}

/// Find limb connections for every limb type.
///
/// The affinity tensor has shape `(height, width, 38)`; each limb reads its
/// two direction-field channels from [`LIMB_PAF_CHANNELS`]. A limb whose
/// either endpoint channel has no candidates is recorded as `None`
/// (unconnectable this frame) rather than an empty list, matching how the
/// assembler distinguishes "nothing matched" from "nothing to match".
///
/// # Returns
///
/// One entry per limb type, in topology order.
#[must_use]
pub fn find_connections(
    paf: &Array3<f32>,
    peaks: &PeakMap,
    config: &PipelineConfig,
) -> Vec<Option<Vec<Connection>>> {
    let (height, _, _) = paf.dim();
    let samples = config.integral_samples;

    let mut all_connections = Vec::with_capacity(NUM_LIMBS);

    for k in 0..NUM_LIMBS {
        let (part_a, part_b) = LIMB_JOINTS[k];
        let (chan_x, chan_y) = LIMB_PAF_CHANNELS[k];
        let cand_a = &peaks.by_part[part_a];
        let cand_b = &peaks.by_part[part_b];

        if cand_a.is_empty() || cand_b.is_empty() {
            all_connections.push(None);
            continue;
        }

        let mut scored: Vec<ConnectionCandidate> = Vec::new();
        for (i, a) in cand_a.iter().enumerate() {
            for (j, b) in cand_b.iter().enumerate() {
                let dx = b.x as f32 - a.x as f32;
                let dy = b.y as f32 - a.y as f32;
                let norm = (dx * dx + dy * dy).sqrt().max(MIN_LIMB_NORM);
                let (ux, uy) = (dx / norm, dy / norm);

                // Dot the affinity field with the unit A->B direction at
                // equally spaced points along the segment.
                let step = 1.0 / (samples as f32 - 1.0);
                let mut total = 0.0;
                let mut aligned = 0usize;
                for s in 0..samples {
                    let t = s as f32 * step;
                    let px = (a.x as f32 + t * dx).round() as usize;
                    let py = (a.y as f32 + t * dy).round() as usize;
                    let alignment = paf[[py, px, chan_x]].mul_add(ux, paf[[py, px, chan_y]] * uy);
                    total += alignment;
                    if alignment > config.paf_threshold {
                        aligned += 1;
                    }
                }

                let distance_prior = (0.5 * height as f32 / norm - 1.0).min(0.0);
                let score_with_prior = total / samples as f32 + distance_prior;

                let enough_aligned = aligned as f32 > 0.8 * samples as f32;
                if enough_aligned && score_with_prior > 0.0 {
                    scored.push(ConnectionCandidate {
                        local_a: i,
                        local_b: j,
                        score_with_prior,
                        total_score: score_with_prior + a.score + b.score,
                    });
                }
            }
        }

        scored.sort_by(|a, b| {
            b.score_with_prior
                .partial_cmp(&a.score_with_prior)
                .unwrap_or(Ordering::Equal)
        });

        let limit = cand_a.len().min(cand_b.len());
        let mut connections: Vec<Connection> = Vec::new();
        for cc in &scored {
            let a_used = connections.iter().any(|c| c.local_a == cc.local_a);
            let b_used = connections.iter().any(|c| c.local_b == cc.local_b);
            if a_used || b_used {
                continue;
            }
            connections.push(Connection {
                cand_a: cand_a[cc.local_a].id,
                cand_b: cand_b[cc.local_b].id,
                score: cc.score_with_prior,
                local_a: cc.local_a,
                local_b: cc.local_b,
            });
            if connections.len() >= limit {
                break;
            }
        }

        all_connections.push(Some(connections));
    }

    all_connections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peaks::Candidate;
    use crate::topology::{HEATMAP_CHANNELS, PAF_CHANNELS};
    use ndarray::Array3;

    /// Peak map with candidates placed by hand; ids assigned in push order.
    fn manual_peaks(placements: &[(usize, usize, usize, f32)]) -> PeakMap {
        let mut peaks = PeakMap {
            by_part: vec![Vec::new(); HEATMAP_CHANNELS - 1],
            all: Vec::new(),
        };
        for &(part, x, y, score) in placements {
            let c = Candidate {
                x,
                y,
                score,
                id: peaks.all.len(),
            };
            peaks.by_part[part].push(c);
            peaks.all.push(c);
        }
        peaks
    }

    /// Fill a horizontal band of the limb's field channels with a unit
    /// +x direction.
    fn paint_field(paf: &mut Array3<f32>, limb: usize, y0: usize, y1: usize) {
        let (chan_x, chan_y) = LIMB_PAF_CHANNELS[limb];
        let (_, width, _) = paf.dim();
        for y in y0..y1 {
            for x in 0..width {
                paf[[y, x, chan_x]] = 1.0;
                paf[[y, x, chan_y]] = 0.0;
            }
        }
    }

    #[test]
    fn test_unconnectable_without_candidates() {
        let paf = Array3::<f32>::zeros((32, 32, PAF_CHANNELS));
        let peaks = manual_peaks(&[(1, 5, 5, 0.9)]); // neck only, no shoulder

        let connections = find_connections(&paf, &peaks, &PipelineConfig::default());

        assert_eq!(connections.len(), NUM_LIMBS);
        assert!(connections.iter().all(Option::is_none));
    }

    #[test]
    fn test_aligned_pair_selected() {
        // Limb 0 is neck (part 1) -> right shoulder (part 2). Two candidates
        // per endpoint; only the pair on the painted band can connect.
        let mut paf = Array3::<f32>::zeros((32, 32, PAF_CHANNELS));
        paint_field(&mut paf, 0, 9, 12);

        let peaks = manual_peaks(&[
            (1, 5, 10, 0.9),  // id 0: neck on the band
            (1, 5, 25, 0.8),  // id 1: neck off the band
            (2, 15, 10, 0.9), // id 2: shoulder on the band
            (2, 15, 25, 0.8), // id 3: shoulder off the band
        ]);

        let connections = find_connections(&paf, &peaks, &PipelineConfig::default());

        let limb0 = connections[0].as_ref().expect("limb 0 connectable");
        assert_eq!(limb0.len(), 1);
        assert_eq!(limb0[0].cand_a, 0);
        assert_eq!(limb0[0].cand_b, 2);
        assert!(limb0[0].score > 0.0);
    }

    #[test]
    fn test_no_shared_local_ranks() {
        // Two parallel people on two bands; greedy selection must pair each
        // neck with its own shoulder, never reusing a local rank.
        let mut paf = Array3::<f32>::zeros((40, 40, PAF_CHANNELS));
        paint_field(&mut paf, 0, 9, 12);
        paint_field(&mut paf, 0, 29, 32);

        let peaks = manual_peaks(&[
            (1, 5, 10, 0.9),
            (1, 5, 30, 0.9),
            (2, 15, 10, 0.9),
            (2, 15, 30, 0.9),
        ]);

        let connections = find_connections(&paf, &peaks, &PipelineConfig::default());
        let limb0 = connections[0].as_ref().expect("limb 0 connectable");

        assert_eq!(limb0.len(), 2);
        assert_ne!(limb0[0].local_a, limb0[1].local_a);
        assert_ne!(limb0[0].local_b, limb0[1].local_b);
    }

    #[test]
    fn test_distance_prior_rejects_long_limbs() {
        // A moderately aligned field (0.5 mean) supports a short limb but
        // not one several times the grid height: the prior term
        // min(0.5 * h / norm - 1, 0) drags the long pair's score below zero.
        let mut paf = Array3::<f32>::zeros((20, 80, PAF_CHANNELS));
        let (chan_x, chan_y) = LIMB_PAF_CHANNELS[0];
        for y in 0..20 {
            for x in 0..80 {
                paf[[y, x, chan_x]] = 0.5;
                paf[[y, x, chan_y]] = 0.0;
            }
        }

        let short = manual_peaks(&[(1, 2, 10, 0.9), (2, 10, 10, 0.9)]);
        let long = manual_peaks(&[(1, 2, 10, 0.9), (2, 75, 10, 0.9)]);
        let config = PipelineConfig::default();

        let conn = find_connections(&paf, &short, &config);
        assert_eq!(conn[0].as_ref().expect("short pair evaluated").len(), 1);

        let conn = find_connections(&paf, &long, &config);
        assert!(conn[0].as_ref().expect("long pair evaluated").is_empty());
    }

    #[test]
    fn test_misaligned_field_rejected() {
        // Field points +y while the limb runs +x; alignment is zero at
        // every sample so criterion 1 fails.
        let mut paf = Array3::<f32>::zeros((32, 32, PAF_CHANNELS));
        let (chan_x, chan_y) = LIMB_PAF_CHANNELS[0];
        for y in 0..32 {
            for x in 0..32 {
                paf[[y, x, chan_x]] = 0.0;
                paf[[y, x, chan_y]] = 1.0;
            }
        }

        let peaks = manual_peaks(&[(1, 5, 10, 0.9), (2, 15, 10, 0.9)]);

        let connections = find_connections(&paf, &peaks, &PipelineConfig::default());
        let limb0 = connections[0].as_ref().expect("limb 0 has candidates");
        assert!(limb0.is_empty());
    }
}
