// Pose Coach 🚀 MIT License

//! Reference recordings and the sliding comparison window.
//!
//! A level ships with a pre-recorded pose track: one set of 2D keypoints per
//! animation frame, plus markers for the frames that count as scoring
//! checkpoints. Playback feeds frames into a bounded FIFO window that the
//! scorer later searches for the best alignment.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PoseError, Result};

/// One recorded frame's 2D joint positions, in recording joint order.
///
/// The recording layout is wider than the live 18-joint layout; the scoring
/// topology maps between the two. Coordinates are sign-flipped at load time
/// so both axes match the live camera convention.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceFrame {
    joints: Vec<[f32; 2]>,
}

impl ReferenceFrame {
    /// Build a frame from already-converted joint positions.
    #[must_use]
    pub fn new(joints: Vec<[f32; 2]>) -> Self {
        Self { joints }
    }

    /// Number of joints this recording provides per frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Whether the frame carries no joints at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Joint position by recording index, or `None` when the recording does
    /// not carry that joint.
    #[must_use]
    pub fn joint(&self, index: usize) -> Option<[f32; 2]> {
        self.joints.get(index).copied()
    }
}

/// A loaded level recording: per-frame joints plus key-pose frame markers.
#[derive(Debug, Clone)]
pub struct Recording {
    /// Human-facing level name.
    pub name: String,
    /// Whether the level walks the player through poses one at a time.
    pub is_guided: bool,
    frames: Vec<ReferenceFrame>,
    key_frames: Vec<usize>,
}

impl Recording {
    /// Parse a recording from level-data JSON text.
    ///
    /// Keypoint x/y values are negated during conversion so the recording
    /// and the live camera share one coordinate convention.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::RecordingError`] when the JSON is malformed or
    /// contains no pose frames.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: LevelFile = serde_json::from_str(text)?;
        let data = file.level_data;
        if data.pose_data.is_empty() {
            return Err(PoseError::RecordingError(format!(
                "recording '{}' contains no pose frames",
                data.name
            )));
        }

        let frames = data
            .pose_data
            .iter()
            .map(|pose| {
                ReferenceFrame::new(
                    pose.keypoints.iter().map(|kp| [-kp.x, -kp.y]).collect(),
                )
            })
            .collect();
        let key_frames = data
            .key_pose_data
            .iter()
            .map(|kp| kp.frame_count)
            .collect();

        Ok(Self {
            name: data.name,
            is_guided: data.is_guided,
            frames,
            key_frames,
        })
    }

    /// Load a recording from a level-data JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::IoError`] when the file cannot be read, or
    /// [`PoseError::RecordingError`] when its contents are invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|err| PoseError::IoError(format!("cannot read {}: {err}", path.display())))?;
        Self::from_json(&text)
    }

    /// Total number of recorded frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the recording holds no frames. Never true after a
    /// successful load.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame by playback index, if within the recording.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<&ReferenceFrame> {
        self.frames.get(index)
    }

    /// Whether the given playback frame is a scoring checkpoint.
    #[must_use]
    pub fn is_key_frame(&self, frame: usize) -> bool {
        self.key_frames.contains(&frame)
    }

    /// The ordered list of scoring checkpoint frames.
    #[must_use]
    pub fn key_frames(&self) -> &[usize] {
        &self.key_frames
    }
}

/// Bounded FIFO window of the most recent reference frames.
///
/// Capacity is `1 + 2 * half_width` so a scoring checkpoint sits centered
/// in the window once `half_width` further ticks have elapsed.
#[derive(Debug)]
pub struct ReferenceBuffer {
    frames: VecDeque<ReferenceFrame>,
    capacity: usize,
}

impl ReferenceBuffer {
    /// Create an empty window with the given half-width.
    #[must_use]
    pub fn new(half_width: usize) -> Self {
        let capacity = 1 + 2 * half_width;
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a frame, evicting the oldest once the window is full.
    pub fn push(&mut self, frame: ReferenceFrame) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Iterate over the window's current contents, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ReferenceFrame> {
        self.frames.iter()
    }

    /// Number of frames currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the window holds no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Fixed capacity of the window.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Discard all buffered frames (level end).
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[derive(Debug, Deserialize)]
struct LevelFile {
    #[serde(rename = "levelData")]
    level_data: LevelData,
}

#[derive(Debug, Deserialize)]
struct LevelData {
    #[serde(default)]
    name: String,
    #[serde(rename = "poseData")]
    pose_data: Vec<PoseData>,
    #[serde(rename = "keyPoseData", default)]
    key_pose_data: Vec<KeyPoseData>,
    #[serde(rename = "isGuided", default)]
    is_guided: bool,
}

#[derive(Debug, Deserialize)]
struct PoseData {
    #[serde(default)]
    #[allow(dead_code)]
    score: f32,
    keypoints: Vec<Keypoint>,
}

#[derive(Debug, Deserialize)]
struct Keypoint {
    x: f32,
    y: f32,
    #[serde(default)]
    #[allow(dead_code)]
    z: f32,
    #[serde(default)]
    #[allow(dead_code)]
    score: f32,
    #[serde(default)]
    #[allow(dead_code)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct KeyPoseData {
    #[serde(rename = "frameCount")]
    frame_count: usize,
}
