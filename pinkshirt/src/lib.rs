//! # pinkshirt
//!
//! A dance mirror for Pink Shirt Day. Every person the pose estimator finds
//! is drawn as a hand-drawn-looking stick figure: a wobbly head circle and
//! eleven wobbly bones, re-jittered every frame.
//!
//! ## What reacts to what
//!
//! | Input | Drives |
//! |---|---|
//! | Right wrist height | Stroke hue (300–340) |
//! | Left wrist height | Stroke saturation (70–100) |
//! | Music loudness | Background hue (300–340), translucent so figures trail |
//! | Nobody confidently in frame | Music slows to a stop over 100 frames |
//! | Someone back in frame | Music snaps back to full speed |
//!
//! The canvas is mirrored so the dancer sees themselves as in a mirror.
//!
//! ## Pose sources
//!
//! * `sim` (default): animated dancers driven from the keyboard, see
//!   [`visualizer`] for the key table.
//! * `stdin`: one JSON array of PoseNet-shaped poses per line, from an
//!   external estimator.
//!
//! ## Feature flags
//!
//! * (default): the video overlay shows a synthetic test pattern.
//! * `camera`: the overlay shows a live webcam through OpenCV.

pub mod app;
pub mod camera;
pub mod canvas;
pub mod clock;
pub mod color;
pub mod config;
pub mod framebuffer;
pub mod jitter;
pub mod presence;
pub mod reactive;
pub mod skeleton;
pub mod visualizer;
#[cfg(feature = "camera")]
pub mod webcam;
