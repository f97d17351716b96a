// Pose Coach 🚀 MIT License

//! End-to-end per-tick pipeline: tensors in, tracked subject and score out.
//!
//! One [`PosePipeline`] owns everything that persists across ticks: the
//! reference recording and its playback cursor, the sliding comparison
//! window, the subject tracker, and the accumulated session statistics.
//! All intermediate per-tick structures (candidates, connections, assembled
//! skeletons) are created and dropped inside [`PosePipeline::process_tick`].

use ndarray::Array3;

use crate::assembly::assemble_people;
use crate::config::PipelineConfig;
use crate::connections::find_connections;
use crate::error::{PoseError, Result};
use crate::peaks::find_peaks;
use crate::reference::{Recording, ReferenceBuffer};
use crate::scoring::{FrameScore, SessionStats, SimilarityScorer};
use crate::topology::{self, HEATMAP_CHANNELS, PAF_CHANNELS};
use crate::tracking::{LiveFrame, SubjectTracker};

/// Scoring request state across ticks.
///
/// `Armed` means a checkpoint asked for a comparison and the next detected
/// subject will be scored. `Deferred` holds that subject until the window
/// has accumulated enough lookahead frames past the detection instant.
/// A new request arriving while one is deferred is ignored; the pending
/// comparison always completes first.
#[derive(Debug)]
enum CompareState {
    Idle,
    Armed,
    Deferred {
        live: LiveFrame,
        detection_frame: usize,
    },
}

/// Everything the pipeline reports for one capture tick.
#[derive(Debug)]
pub struct TickResult {
    /// The tracked subject's resolved joints, or `None` when nobody was
    /// detected this tick.
    pub subject: Option<LiveFrame>,
    /// How many skeletons survived assembly pruning.
    pub people_count: usize,
    /// Present only on ticks where a pending comparison completed.
    pub score: Option<FrameScore>,
}

/// The full pose post-processing and scoring pipeline.
#[derive(Debug)]
pub struct PosePipeline {
    config: PipelineConfig,
    recording: Recording,
    buffer: ReferenceBuffer,
    tracker: SubjectTracker,
    scorer: SimilarityScorer,
    playback_frame: usize,
    state: CompareState,
}

impl PosePipeline {
    /// Build a pipeline for one level.
    ///
    /// # Errors
    ///
    /// Fails fast on an invalid configuration or inconsistent topology
    /// tables rather than misbehaving per tick.
    pub fn new(config: PipelineConfig, recording: Recording) -> Result<Self> {
        topology::validate()?;
        config.validate()?;
        let buffer = ReferenceBuffer::new(config.window_half_width);
        let scorer = SimilarityScorer::new(config);
        Ok(Self {
            config,
            recording,
            buffer,
            tracker: SubjectTracker::new(),
            scorer,
            playback_frame: 0,
            state: CompareState::Idle,
        })
    }

    /// The loaded level recording.
    #[must_use]
    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Current playback position within the recording.
    #[must_use]
    pub fn playback_frame(&self) -> usize {
        self.playback_frame
    }

    /// Session statistics accumulated so far.
    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        self.scorer.stats()
    }

    /// Advance recorded playback by one animation tick.
    ///
    /// Pushes the next recording frame into the comparison window and
    /// returns `true` when that frame is a scoring checkpoint (the caller
    /// then typically calls [`enable_compare`](Self::enable_compare)).
    /// Returns `false` once the recording is exhausted.
    pub fn advance_reference(&mut self) -> bool {
        let Some(frame) = self.recording.frame(self.playback_frame) else {
            return false;
        };
        self.buffer.push(frame.clone());
        let key = self.recording.is_key_frame(self.playback_frame);
        self.playback_frame += 1;
        key
    }

    /// Request that the next detected subject be scored.
    ///
    /// Ignored while a previous comparison is still waiting on lookahead
    /// frames; at most one comparison is in flight at a time.
    pub fn enable_compare(&mut self) {
        if matches!(self.state, CompareState::Idle) {
            self.state = CompareState::Armed;
        }
    }

    /// Run one capture tick over the inference outputs.
    ///
    /// `heatmaps` must have 19 channels and `paf` 38, on the same grid.
    /// Extraction, connection, assembly and subject selection always run;
    /// scoring runs only when a comparison is armed or a deferred one
    /// becomes ready.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::ShapeError`] when either tensor's shape does
    /// not match the expected channel layout or the grids disagree.
    pub fn process_tick(
        &mut self,
        heatmaps: &Array3<f32>,
        paf: &Array3<f32>,
    ) -> Result<TickResult> {
        check_shapes(heatmaps, paf)?;

        let peaks = find_peaks(heatmaps, &self.config);
        let connections = find_connections(paf, &peaks, &self.config);
        let people = assemble_people(&peaks, &connections, &self.config);
        let people_count = people.len();
        let subject = self.tracker.select(&people, &peaks.all);

        let score = self.update_compare_state(subject.as_ref());

        Ok(TickResult {
            subject,
            people_count,
            score,
        })
    }

    /// Finish the level: report the average score and tier histogram,
    /// then discard all cross-tick state.
    pub fn finish_level(&mut self) -> (i32, [u32; 6]) {
        let stats = self.scorer.stats();
        let summary = (stats.average_score(), stats.histogram());
        self.reset();
        summary
    }

    /// Discard all cross-tick state without reporting.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.tracker.reset();
        self.scorer.reset();
        self.playback_frame = 0;
        self.state = CompareState::Idle;
    }

    fn update_compare_state(&mut self, subject: Option<&LiveFrame>) -> Option<FrameScore> {
        match &self.state {
            CompareState::Idle => None,
            CompareState::Armed => {
                let live = subject?.clone();
                let detection_frame = self.playback_frame;
                if self.window_ready(detection_frame) {
                    self.state = CompareState::Idle;
                    Some(self.scorer.compare(&live, &self.buffer))
                } else {
                    self.state = CompareState::Deferred {
                        live,
                        detection_frame,
                    };
                    None
                }
            }
            CompareState::Deferred {
                live,
                detection_frame,
            } => {
                if !self.window_ready(*detection_frame) {
                    return None;
                }
                let live = live.clone();
                self.state = CompareState::Idle;
                Some(self.scorer.compare(&live, &self.buffer))
            }
        }
    }

    /// Whether playback has advanced far enough past the detection instant
    /// for the window to be centered on it. An empty window is never ready:
    /// comparing against zero frames would record a meaningless miss.
    fn window_ready(&self, detection_frame: usize) -> bool {
        !self.buffer.is_empty()
            && self.playback_frame >= detection_frame + self.config.window_half_width
    }
}

fn check_shapes(heatmaps: &Array3<f32>, paf: &Array3<f32>) -> Result<()> {
    let (hh, hw, hc) = heatmaps.dim();
    let (ph, pw, pc) = paf.dim();
    if hc != HEATMAP_CHANNELS {
        return Err(PoseError::ShapeError(format!(
            "expected {HEATMAP_CHANNELS} heatmap channels, got {hc}"
        )));
    }
    if pc != PAF_CHANNELS {
        return Err(PoseError::ShapeError(format!(
            "expected {PAF_CHANNELS} affinity channels, got {pc}"
        )));
    }
    if (hh, hw) != (ph, pw) {
        return Err(PoseError::ShapeError(format!(
            "heatmap grid {hh}x{hw} does not match affinity grid {ph}x{pw}"
        )));
    }
    Ok(())
}
