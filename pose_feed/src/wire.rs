//! JSON shape of PoseNet/ml5-style estimation results.
//!
//! One detection cycle is one JSON array on one line:
//!
//! ```json
//! [{"pose":{"score":0.81,"keypoints":[
//!     {"part":"nose","score":0.99,"position":{"x":301.4,"y":120.9}}, …]}}]
//! ```
//!
//! Unknown fields (`skeleton`, the pose-level `score`) are ignored.

use serde::Deserialize;

use crate::keypoint::{BodyPart, Keypoint, Point};
use crate::pose::{Pose, PoseError};

#[derive(Debug, Deserialize)]
struct WirePrediction {
    pose: WirePose,
}

#[derive(Debug, Deserialize)]
struct WirePose {
    keypoints: Vec<WireKeypoint>,
}

#[derive(Debug, Deserialize)]
struct WireKeypoint {
    part:     BodyPart,
    score:    f32,
    position: Point,
}

/// Parse one detection cycle. Keypoint order is preserved as sent; a pose
/// with the wrong number of keypoints parses fine and is rejected later by
/// [`Pose::body`].
pub fn parse_frame(line: &str) -> Result<Vec<Pose>, PoseError> {
    let predictions: Vec<WirePrediction> =
        serde_json::from_str(line).map_err(|e| PoseError::Json(e.to_string()))?;

    Ok(predictions
        .into_iter()
        .map(|p| {
            Pose::new(
                p.pose.keypoints
                    .into_iter()
                    .map(|k| Keypoint { part: k.part, position: k.position, confidence: k.score })
                    .collect(),
            )
        })
        .collect())
}
