//! # pose_feed
//!
//! The pose side of the dance mirror: a 17-keypoint body model and the
//! threaded producers that deliver one `Vec<Pose>` per detection cycle.
//!
//! ## Keypoint layout
//!
//! | Index | Part | Index | Part |
//! |---|---|---|---|
//! | 0 | nose | 9 | left wrist |
//! | 1 | left eye | 10 | right wrist |
//! | 2 | right eye | 11 | left hip |
//! | 3 | left ear | 12 | right hip |
//! | 4 | right ear | 13 | left knee |
//! | 5 | left shoulder | 14 | right knee |
//! | 6 | right shoulder | 15 | left ankle |
//! | 7 | left elbow | 16 | right ankle |
//! | 8 | right elbow | | |
//!
//! ## Sources
//!
//! * [`SimPoseSource`]: procedurally animated dancers, steered by
//!   [`SimControl`] messages from the window.
//! * [`JsonLinesPoseSource`]: newline-delimited PoseNet-shaped JSON from
//!   any external estimator (`estimator | pinkshirt --source stdin`).

pub mod keypoint;
pub mod pose;
pub mod wire;
pub mod source;

pub use keypoint::{BodyPart, Keypoint, Point};
pub use pose::{Body, Pose, PoseError};
pub use source::{
    spawn_pose_source, JsonLinesPoseSource, PoseFeed, PoseSource, SimControl, SimPoseSource,
};
