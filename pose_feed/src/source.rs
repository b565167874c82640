//! Pose producers: a simulated dancer or an external estimator piping JSON.
//!
//! The public interface is a `Vec<Pose>` per detection cycle delivered over
//! an `mpsc` channel. Consumers don't need to know whether the poses came
//! from a model or the simulator; they hold a [`PoseFeed`] and read the most
//! recent list without blocking.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::keypoint::BodyPart;
use crate::pose::Pose;
use crate::wire::parse_frame;

// ════════════════════════════════════════════════════════════════════════════
// PoseSource trait — unified interface for model pipe and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver detection cycles over a channel.
pub trait PoseSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<Vec<Pose>>);
}

/// Spawn a pose source on its own thread and return the consuming end.
pub fn spawn_pose_source<S: PoseSource>(source: S) -> PoseFeed {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    PoseFeed::new(rx)
}

// ════════════════════════════════════════════════════════════════════════════
// PoseFeed — latest-value cache over the channel
// ════════════════════════════════════════════════════════════════════════════

/// Receiving end of a pose source.
///
/// Each detection cycle replaces the cached list wholesale; lists are never
/// merged. Before the first cycle arrives the cache is empty.
pub struct PoseFeed {
    rx:        Receiver<Vec<Pose>>,
    latest:    Vec<Pose>,
    connected: bool,
}

impl PoseFeed {
    pub fn new(rx: Receiver<Vec<Pose>>) -> Self {
        PoseFeed { rx, latest: Vec::new(), connected: true }
    }

    /// Drain pending cycles (non-blocking) and return the newest list.
    ///
    /// If the producer has gone away the last list stays cached.
    pub fn latest(&mut self) -> &[Pose] {
        loop {
            match self.rx.try_recv() {
                Ok(poses) => self.latest = poses,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.connected {
                        info!("pose source finished");
                        self.connected = false;
                    }
                    break;
                }
            }
        }
        &self.latest
    }

    pub fn is_connected(&self) -> bool { self.connected }
}

// ════════════════════════════════════════════════════════════════════════════
// JsonLinesPoseSource — external estimator over a pipe
// ════════════════════════════════════════════════════════════════════════════

/// Reads one JSON detection cycle per line (see [`crate::wire`]).
///
/// Malformed lines are logged and skipped; end of input ends the source.
pub struct JsonLinesPoseSource<R> {
    pub reader: R,
}

impl<R: BufRead + Send + 'static> PoseSource for JsonLinesPoseSource<R> {
    fn run(self: Box<Self>, tx: Sender<Vec<Pose>>) {
        info!("pose source ready: reading JSON lines");
        for (n, line) in self.reader.lines().enumerate() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!(error = %e, "pose input read failed");
                    return;
                }
            };
            let line = line.trim();
            if line.is_empty() { continue; }

            match parse_frame(line) {
                Ok(poses) => {
                    debug!(line = n + 1, people = poses.len(), "pose cycle");
                    if tx.send(poses).is_err() { return; }
                }
                Err(e) => warn!(line = n + 1, error = %e, "skipping malformed pose line"),
            }
        }
        info!("pose input closed");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimPoseSource — procedural dancers (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Operator controls for the simulated dancers, sent from the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimControl {
    /// Walk the dancer(s) in or out of frame.
    TogglePresence,
    /// Add or remove a second dancer.
    ToggleSecondDancer,
    /// Make every keypoint a weak detection.
    ToggleLowConfidence,
    Quit,
}

/// Emits animated stick dancers at a fixed detection rate.
pub struct SimPoseSource {
    pub rx:        Receiver<SimControl>,
    pub width:     f32,
    pub height:    f32,
    /// Detection cycles per second.
    pub rate_hz:   f32,
    pub seed:      u64,
}

#[derive(Debug, Clone, Copy)]
struct SimFlags {
    present:        bool,
    second_dancer:  bool,
    low_confidence: bool,
}

impl PoseSource for SimPoseSource {
    fn run(self: Box<Self>, tx: Sender<Vec<Pose>>) {
        let mut rng   = StdRng::seed_from_u64(self.seed);
        let mut flags = SimFlags { present: true, second_dancer: false, low_confidence: false };
        let period    = Duration::from_secs_f32(1.0 / self.rate_hz.max(1.0));
        let mut t     = 0.0f32;

        info!(rate_hz = self.rate_hz, "pose source ready: simulated dancer");

        loop {
            // ── drain controls ────────────────────────────────────────────
            loop {
                match self.rx.try_recv() {
                    Ok(SimControl::TogglePresence)      => flags.present = !flags.present,
                    Ok(SimControl::ToggleSecondDancer)  => flags.second_dancer = !flags.second_dancer,
                    Ok(SimControl::ToggleLowConfidence) => flags.low_confidence = !flags.low_confidence,
                    Ok(SimControl::Quit) | Err(TryRecvError::Disconnected) => return,
                    Err(TryRecvError::Empty) => break,
                }
            }

            let poses = sim_cycle(t, self.width, self.height, flags, &mut rng);
            if tx.send(poses).is_err() { return; }

            t += period.as_secs_f32();
            thread::sleep(period);
        }
    }
}

fn sim_cycle(t: f32, w: f32, h: f32, flags: SimFlags, rng: &mut StdRng) -> Vec<Pose> {
    if !flags.present { return Vec::new(); }

    let mut poses = vec![dancer_pose(t, w * 0.5 + (t * 0.7).sin() * w * 0.1, h, flags.low_confidence, rng)];
    if flags.second_dancer {
        poses.push(dancer_pose(t + 1.3, w * 0.25, h, flags.low_confidence, rng));
    }
    poses
}

/// One dancer centred at `cx`, arms swinging with `t`.
///
/// Laid out as the camera sees the person: their left side is on the
/// image's right.
pub fn dancer_pose(t: f32, cx: f32, h: f32, low_confidence: bool, rng: &mut impl Rng) -> Pose {
    let bob     = (t * 4.0).sin() * h * 0.01;
    let upper   = h * 0.12;
    let fore    = h * 0.11;
    let swing_l = (t * 2.1).sin() * 1.2;
    let swing_r = (t * 1.7 + 0.8).cos() * 1.2;

    let shoulder_y = h * 0.32 + bob;
    let (ls, rs) = ((cx + h * 0.09, shoulder_y), (cx - h * 0.09, shoulder_y));
    let arm = |(sx, sy): (f32, f32), side: f32, a: f32| {
        let elbow = (sx + side * a.sin().abs() * upper, sy + a.cos() * upper);
        let wrist = (elbow.0 + side * (a * 1.4).sin().abs() * fore, elbow.1 - (a * 1.4).cos() * fore);
        (elbow, wrist)
    };
    let (le, lw) = arm(ls, 1.0, swing_l);
    let (re, rw) = arm(rs, -1.0, swing_r);

    Pose::from_fn(|part| {
        let (x, y) = match part {
            BodyPart::Nose          => (cx, h * 0.22 + bob),
            BodyPart::LeftEye       => (cx + h * 0.015, h * 0.21 + bob),
            BodyPart::RightEye      => (cx - h * 0.015, h * 0.21 + bob),
            BodyPart::LeftEar       => (cx + h * 0.035, h * 0.22 + bob),
            BodyPart::RightEar      => (cx - h * 0.035, h * 0.22 + bob),
            BodyPart::LeftShoulder  => ls,
            BodyPart::RightShoulder => rs,
            BodyPart::LeftElbow     => le,
            BodyPart::RightElbow    => re,
            BodyPart::LeftWrist     => lw,
            BodyPart::RightWrist    => rw,
            BodyPart::LeftHip       => (cx + h * 0.06, h * 0.55 + bob),
            BodyPart::RightHip      => (cx - h * 0.06, h * 0.55 + bob),
            BodyPart::LeftKnee      => (cx + h * 0.07, h * 0.72 + bob * 0.5),
            BodyPart::RightKnee     => (cx - h * 0.07, h * 0.72 + bob * 0.5),
            BodyPart::LeftAnkle     => (cx + h * 0.07, h * 0.9),
            BodyPart::RightAnkle    => (cx - h * 0.07, h * 0.9),
        };
        let score = if low_confidence {
            rng.random_range(0.02..0.15)
        } else {
            rng.random_range(0.6..0.99)
        };
        (x + rng.random_range(-1.5..1.5), y + rng.random_range(-1.5..1.5), score)
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
