//! Is anyone dancing? Confidence-based presence and the slow-down ramp it
//! drives.

use pose_feed::{Body, Keypoint};
use serde::Deserialize;

pub const DEFAULT_CONFIDENCE: f32 = 0.2;
pub const DEFAULT_RAMP_FRAMES: u32 = 100;

/// Which keypoints decide presence each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresenceScope {
    /// Any weak keypoint of any pose in the frame means "absent".
    #[default]
    AnyKeypoint,
    /// Only the final keypoint (right ankle) of the final pose counts.
    LastKeypoint,
}

/// What a frame with no poses at all means.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyFrame {
    /// Nobody detected is nobody present.
    Absent,
    /// Keep whatever the last populated frame decided.
    #[default]
    Hold,
}

/// Outcome of one frame's inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Observation {
    pub absent: bool,
    /// True on the frame the flag flipped from present to absent.
    pub rising: bool,
}

#[derive(Debug)]
pub struct PresenceDetector {
    threshold: f32,
    scope:     PresenceScope,
    empty:     EmptyFrame,
    absent:    bool,
}

impl PresenceDetector {
    pub fn new(threshold: f32, scope: PresenceScope, empty: EmptyFrame) -> Self {
        PresenceDetector { threshold, scope, empty, absent: false }
    }

    /// Inspect the well-formed poses drawn this frame.
    pub fn observe(&mut self, bodies: &[Body<'_>]) -> Observation {
        let was = self.absent;
        let threshold = self.threshold;
        let weak = |k: &Keypoint| !k.is_confident(threshold);

        self.absent = match (bodies.last(), self.scope) {
            (None, _) => match self.empty {
                EmptyFrame::Absent => true,
                EmptyFrame::Hold   => was,
            },
            (Some(last), PresenceScope::LastKeypoint) => {
                last.keypoints().last().map_or(true, weak)
            }
            (Some(_), PresenceScope::AnyKeypoint) => bodies
                .iter()
                .flat_map(|b| b.keypoints().iter())
                .any(weak),
        };

        Observation { absent: self.absent, rising: self.absent && !was }
    }
}

/// Ramp `x ∈ [0, 1]` that climbs one step per absent frame.
///
/// Counted in whole frames so `x` lands on exactly 1.0.
#[derive(Debug)]
pub struct PresenceRamp {
    step:   u32,
    frames: u32,
}

impl PresenceRamp {
    pub fn new(frames: u32) -> Self {
        PresenceRamp { step: 0, frames: frames.max(1) }
    }

    pub fn update(&mut self, obs: Observation) {
        if !obs.absent {
            self.step = 0;
            return;
        }
        if obs.rising { self.step = 0; }
        if self.step < self.frames { self.step += 1; }
    }

    pub fn value(&self) -> f32 {
        self.step as f32 / self.frames as f32
    }

    /// `1 − x`: full speed while someone is dancing, standstill once the
    /// ramp tops out.
    pub fn playback_rate(&self) -> f32 {
        1.0 - self.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_feed::{BodyPart, Pose};

    fn pose_with(conf: f32, ankle_conf: f32) -> Pose {
        Pose::from_fn(|p| {
            let c = if p == BodyPart::RightAnkle { ankle_conf } else { conf };
            (0.0, 0.0, c)
        })
    }

    fn observe(d: &mut PresenceDetector, poses: &[Pose]) -> Observation {
        let bodies: Vec<Body<'_>> = poses.iter().map(|p| p.body().unwrap()).collect();
        d.observe(&bodies)
    }

    fn absent()  -> Observation { Observation { absent: true,  rising: false } }
    fn present() -> Observation { Observation { absent: false, rising: false } }

    #[test]
    fn ramp_reaches_one_in_exactly_hundred_frames() {
        let mut r = PresenceRamp::new(DEFAULT_RAMP_FRAMES);
        r.update(Observation { absent: true, rising: true });
        for _ in 1..99 { r.update(absent()); }
        assert!(r.value() < 1.0);
        r.update(absent());
        assert_eq!(r.value(), 1.0);
        assert_eq!(r.playback_rate(), 0.0);
        for _ in 0..50 { r.update(absent()); }
        assert_eq!(r.value(), 1.0);
    }

    #[test]
    fn presence_snaps_ramp_back() {
        let mut r = PresenceRamp::new(DEFAULT_RAMP_FRAMES);
        for _ in 0..60 { r.update(absent()); }
        assert!(r.value() > 0.5);
        r.update(present());
        assert_eq!(r.value(), 0.0);
        assert_eq!(r.playback_rate(), 1.0);
    }

    #[test]
    fn rate_stays_in_unit_interval() {
        let mut r = PresenceRamp::new(DEFAULT_RAMP_FRAMES);
        for i in 0..300 {
            r.update(if i % 137 == 0 { present() } else { absent() });
            let rate = r.playback_rate();
            assert!((0.0..=1.0).contains(&rate));
            assert_eq!(rate, 1.0 - r.value());
        }
    }

    #[test]
    fn confident_pose_is_present() {
        let mut d = PresenceDetector::new(DEFAULT_CONFIDENCE, PresenceScope::AnyKeypoint, EmptyFrame::Absent);
        assert!(!observe(&mut d, &[pose_with(0.9, 0.9)]).absent);
    }

    #[test]
    fn threshold_is_strictly_below() {
        let mut d = PresenceDetector::new(DEFAULT_CONFIDENCE, PresenceScope::AnyKeypoint, EmptyFrame::Absent);
        assert!(!observe(&mut d, &[pose_with(0.2, 0.2)]).absent);
        assert!(observe(&mut d, &[pose_with(0.2, 0.19)]).absent);
    }

    #[test]
    fn any_scope_sees_weak_keypoint_in_earlier_pose() {
        let mut d = PresenceDetector::new(DEFAULT_CONFIDENCE, PresenceScope::AnyKeypoint, EmptyFrame::Absent);
        let obs = observe(&mut d, &[pose_with(0.1, 0.1), pose_with(0.9, 0.9)]);
        assert!(obs.absent);
        assert!(obs.rising);
    }

    #[test]
    fn last_scope_only_checks_final_ankle() {
        let mut d = PresenceDetector::new(DEFAULT_CONFIDENCE, PresenceScope::LastKeypoint, EmptyFrame::Absent);
        assert!(!observe(&mut d, &[pose_with(0.1, 0.1), pose_with(0.05, 0.9)]).absent);
        assert!(observe(&mut d, &[pose_with(0.9, 0.9), pose_with(0.9, 0.1)]).absent);
    }

    #[test]
    fn rising_only_on_the_edge() {
        let mut d = PresenceDetector::new(DEFAULT_CONFIDENCE, PresenceScope::AnyKeypoint, EmptyFrame::Absent);
        assert!(observe(&mut d, &[]).rising);
        assert!(!observe(&mut d, &[]).rising);
        assert!(!observe(&mut d, &[pose_with(0.9, 0.9)]).rising);
        assert!(observe(&mut d, &[]).rising);
    }

    #[test]
    fn hold_keeps_previous_flag_on_empty_frames() {
        let mut d = PresenceDetector::new(DEFAULT_CONFIDENCE, PresenceScope::AnyKeypoint, EmptyFrame::Hold);
        assert!(!observe(&mut d, &[]).absent);
        observe(&mut d, &[pose_with(0.1, 0.1)]);
        let obs = observe(&mut d, &[]);
        assert!(obs.absent);
        assert!(!obs.rising);
    }
}
