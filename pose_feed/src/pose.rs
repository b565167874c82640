//! One detected person: an ordered list of keypoints.

use thiserror::Error;

use crate::keypoint::{BodyPart, Keypoint, Point};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoseError {
    #[error("pose has {found} keypoints, expected {}", BodyPart::COUNT)]
    KeypointCount { found: usize },

    #[error("malformed pose JSON: {0}")]
    Json(String),
}

/// Keypoints of one person as delivered by the estimator.
///
/// Nothing is validated on construction; a pose straight off the wire may
/// be short. [`Pose::body`] is the checked view consumers draw from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Pose { keypoints }
    }

    /// Build a full 17-keypoint pose from a per-part generator
    /// returning `(x, y, confidence)`.
    pub fn from_fn(mut f: impl FnMut(BodyPart) -> (f32, f32, f32)) -> Self {
        let keypoints = BodyPart::ALL
            .iter()
            .map(|&part| {
                let (x, y, c) = f(part);
                Keypoint::new(part, x, y, c)
            })
            .collect();
        Pose { keypoints }
    }

    /// Checked view: exactly 17 keypoints, addressed by position.
    pub fn body(&self) -> Result<Body<'_>, PoseError> {
        <&[Keypoint; BodyPart::COUNT]>::try_from(self.keypoints.as_slice())
            .map(|keypoints| Body { keypoints })
            .map_err(|_| PoseError::KeypointCount { found: self.keypoints.len() })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Body — a well-formed pose
// ════════════════════════════════════════════════════════════════════════════

/// A pose known to hold exactly 17 keypoints.
///
/// Lookups go by array position, not by the `part` label each keypoint
/// carries, matching how estimators lay out their output.
#[derive(Debug, Clone, Copy)]
pub struct Body<'a> {
    keypoints: &'a [Keypoint; BodyPart::COUNT],
}

impl<'a> Body<'a> {
    pub fn get(&self, part: BodyPart) -> &'a Keypoint {
        &self.keypoints[part.index()]
    }

    pub fn at(&self, part: BodyPart) -> Point {
        self.get(part).position
    }

    pub fn keypoints(&self) -> &'a [Keypoint; BodyPart::COUNT] {
        self.keypoints
    }

    /// Midpoint between the ears.
    pub fn head_center(&self) -> Point {
        self.at(BodyPart::LeftEar).midpoint(self.at(BodyPart::RightEar))
    }

    /// Horizontal ear-to-ear distance. Signed: negative when the model
    /// reports the ears swapped.
    pub fn head_radius(&self) -> f32 {
        self.at(BodyPart::RightEar).x - self.at(BodyPart::LeftEar).x
    }

    pub fn hip_midpoint(&self) -> Point {
        self.at(BodyPart::LeftHip).midpoint(self.at(BodyPart::RightHip))
    }
}
