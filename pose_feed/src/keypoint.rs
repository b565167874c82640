//! Body parts and single keypoint detections.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// BodyPart — the 17 canonical landmarks, in model output order
// ════════════════════════════════════════════════════════════════════════════

/// One of the 17 COCO landmarks, numbered in the order pose models emit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(usize)]
pub enum BodyPart {
    Nose          = 0,
    LeftEye       = 1,
    RightEye      = 2,
    LeftEar       = 3,
    RightEar      = 4,
    LeftShoulder  = 5,
    RightShoulder = 6,
    LeftElbow     = 7,
    RightElbow    = 8,
    LeftWrist     = 9,
    RightWrist    = 10,
    LeftHip       = 11,
    RightHip      = 12,
    LeftKnee      = 13,
    RightKnee     = 14,
    LeftAnkle     = 15,
    RightAnkle    = 16,
}

impl BodyPart {
    pub const COUNT: usize = 17;

    pub const ALL: [BodyPart; BodyPart::COUNT] = [
        BodyPart::Nose,
        BodyPart::LeftEye,
        BodyPart::RightEye,
        BodyPart::LeftEar,
        BodyPart::RightEar,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftWrist,
        BodyPart::RightWrist,
        BodyPart::LeftHip,
        BodyPart::RightHip,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
        BodyPart::LeftAnkle,
        BodyPart::RightAnkle,
    ];

    pub fn index(self) -> usize { self as usize }

    /// Part name as written by PoseNet-style estimators (`"leftWrist"`).
    pub fn name(self) -> &'static str {
        match self {
            BodyPart::Nose          => "nose",
            BodyPart::LeftEye       => "leftEye",
            BodyPart::RightEye      => "rightEye",
            BodyPart::LeftEar       => "leftEar",
            BodyPart::RightEar      => "rightEar",
            BodyPart::LeftShoulder  => "leftShoulder",
            BodyPart::RightShoulder => "rightShoulder",
            BodyPart::LeftElbow     => "leftElbow",
            BodyPart::RightElbow    => "rightElbow",
            BodyPart::LeftWrist     => "leftWrist",
            BodyPart::RightWrist    => "rightWrist",
            BodyPart::LeftHip       => "leftHip",
            BodyPart::RightHip      => "rightHip",
            BodyPart::LeftKnee      => "leftKnee",
            BodyPart::RightKnee     => "rightKnee",
            BodyPart::LeftAnkle     => "leftAnkle",
            BodyPart::RightAnkle    => "rightAnkle",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Point / Keypoint
// ════════════════════════════════════════════════════════════════════════════

/// A position in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self { Point { x, y } }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// A single body-part detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub part:       BodyPart,
    pub position:   Point,
    /// Detection confidence, 0.0–1.0.
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(part: BodyPart, x: f32, y: f32, confidence: f32) -> Self {
        Keypoint { part, position: Point::new(x, y), confidence }
    }

    /// True when the detection is at or above `threshold`.
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seventeen_parts() {
        assert_eq!(BodyPart::ALL.len(), BodyPart::COUNT);
        for (i, part) in BodyPart::ALL.iter().enumerate() {
            assert_eq!(part.index(), i);
        }
    }

    #[test]
    fn serde_names_match_part_names() {
        for part in BodyPart::ALL {
            let json = serde_json::to_string(&part).unwrap();
            assert_eq!(json, format!("\"{}\"", part.name()));
        }
    }

    #[test]
    fn midpoint() {
        let m = Point::new(10.0, 20.0).midpoint(Point::new(30.0, 40.0));
        assert_eq!(m, Point::new(20.0, 30.0));
    }

    #[test]
    fn confidence_threshold_inclusive() {
        let kp = Keypoint::new(BodyPart::Nose, 0.0, 0.0, 0.2);
        assert!(kp.is_confident(0.2));
        assert!(!kp.is_confident(0.21));
    }
}
