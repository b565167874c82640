//! Sloppy stick figures: one wobbly head and eleven wobbly bones per person.

use pose_feed::{Body, BodyPart, Point, Pose};
use rand::Rng;
use tracing::warn;

use crate::canvas::Canvas;
use crate::jitter::Jitter;
use crate::reactive::{Palette, StrokeColor};

/// Bone endpoint: a detected keypoint or the derived hip midpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Joint {
    Part(BodyPart),
    HipMid,
}

use BodyPart::*;
use Joint::{HipMid, Part};

/// The eleven bones, drawn in this order.
pub const BONES: [(Joint, Joint); 11] = [
    // shoulders
    (Part(LeftShoulder), Part(RightShoulder)),
    // upper arms
    (Part(LeftElbow),  Part(LeftShoulder)),
    (Part(RightElbow), Part(RightShoulder)),
    // forearms
    (Part(LeftWrist),  Part(LeftElbow)),
    (Part(RightWrist), Part(RightElbow)),
    // body
    (HipMid, Part(LeftShoulder)),
    (HipMid, Part(RightShoulder)),
    // thighs
    (HipMid, Part(LeftKnee)),
    (HipMid, Part(RightKnee)),
    // shins
    (Part(LeftAnkle),  Part(LeftKnee)),
    (Part(RightAnkle), Part(RightKnee)),
];

fn resolve(body: &Body<'_>, joint: Joint) -> Point {
    match joint {
        Part(p) => body.at(p),
        HipMid  => body.hip_midpoint(),
    }
}

/// Draw one person: the head as a jittered circle between the ears, then
/// the bones.
pub fn draw_skeleton<C, R>(canvas: &mut C, body: &Body<'_>, jitter: &mut Jitter<R>)
where
    C: Canvas + ?Sized,
    R: Rng,
{
    jitter.circle(canvas, body.head_center(), body.head_radius());
    for &(a, b) in BONES.iter() {
        jitter.line(canvas, resolve(body, a), resolve(body, b));
    }
}

/// Draw every well-formed pose and let each one retint the stroke.
///
/// Malformed poses are logged and skipped. Returns the bodies that were
/// drawn, for presence detection. The stroke already set on the canvas is
/// left alone: new wrist colors show up from the next frame on.
pub fn draw_poses<'a, C, R>(
    canvas:  &mut C,
    poses:   &'a [Pose],
    jitter:  &mut Jitter<R>,
    stroke:  &mut StrokeColor,
    palette: &Palette,
) -> Vec<Body<'a>>
where
    C: Canvas + ?Sized,
    R: Rng,
{
    let height = canvas.height();
    let mut drawn = Vec::with_capacity(poses.len());

    for (i, pose) in poses.iter().enumerate() {
        let body = match pose.body() {
            Ok(b)  => b,
            Err(e) => {
                warn!(pose = i, error = %e, "skipping malformed pose");
                continue;
            }
        };
        draw_skeleton(canvas, &body, jitter);
        stroke.follow_wrists(&body, height, palette);
        drawn.push(body);
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{Call, RecordingCanvas};
    use crate::jitter::DEFAULT_SLOP;
    use pose_feed::Keypoint;

    fn still() -> Jitter { Jitter::new(0.0, Some(0)) }

    fn standing(cx: f32, right_wrist_y: f32) -> Pose {
        Pose::from_fn(|p| match p {
            LeftEar       => (cx + 20.0, 100.0, 0.9),
            RightEar      => (cx - 20.0, 100.0, 0.9),
            LeftShoulder  => (cx + 50.0, 160.0, 0.9),
            RightShoulder => (cx - 50.0, 160.0, 0.9),
            LeftWrist     => (cx + 60.0, 240.0, 0.9),
            RightWrist    => (cx - 60.0, right_wrist_y, 0.9),
            LeftHip       => (cx + 30.0, 300.0, 0.9),
            RightHip      => (cx - 30.0, 300.0, 0.9),
            _             => (cx, 200.0, 0.9),
        })
    }

    #[test]
    fn one_head_eleven_bones_per_pose() {
        let mut canvas = RecordingCanvas::new(640.0, 480.0);
        let mut j = Jitter::new(DEFAULT_SLOP, Some(3));
        let mut stroke = StrokeColor::default();
        let poses = vec![standing(200.0, 200.0), standing(400.0, 200.0)];
        let drawn = draw_poses(&mut canvas, &poses, &mut j, &mut stroke, &Palette::default());
        assert_eq!(drawn.len(), 2);
        assert_eq!(canvas.ellipses(), 2);
        assert_eq!(canvas.lines(), 22);
    }

    #[test]
    fn head_sits_between_ears_with_signed_width() {
        let mut canvas = RecordingCanvas::new(640.0, 480.0);
        let pose = standing(300.0, 200.0);
        draw_skeleton(&mut canvas, &pose.body().unwrap(), &mut still());
        assert_eq!(canvas.calls[0], Call::Ellipse(Point::new(300.0, 100.0), -40.0, -40.0));
    }

    #[test]
    fn torso_and_thighs_hang_from_hip_midpoint() {
        let mut canvas = RecordingCanvas::new(640.0, 480.0);
        let pose = standing(300.0, 200.0);
        draw_skeleton(&mut canvas, &pose.body().unwrap(), &mut still());
        let hip = Point::new(300.0, 300.0);
        let from_hip = canvas.calls.iter()
            .filter(|c| matches!(c, Call::Line(a, _) if *a == hip))
            .count();
        assert_eq!(from_hip, 4);
    }

    #[test]
    fn bones_stay_within_slop_of_their_joints() {
        let mut canvas = RecordingCanvas::new(640.0, 480.0);
        let pose = standing(300.0, 200.0);
        let mut j = Jitter::new(DEFAULT_SLOP, Some(8));
        draw_skeleton(&mut canvas, &pose.body().unwrap(), &mut j);
        let Call::Line(a, b) = canvas.calls[1] else { panic!("expected shoulder bar") };
        assert!((a.x - 350.0).abs() <= 30.0 && (a.y - 160.0).abs() <= 30.0);
        assert!((b.x - 250.0).abs() <= 30.0 && (b.y - 160.0).abs() <= 30.0);
    }

    #[test]
    fn malformed_pose_is_skipped() {
        let mut canvas = RecordingCanvas::new(640.0, 480.0);
        let mut short = standing(100.0, 0.0);
        short.keypoints.truncate(12);
        let poses = vec![short, standing(300.0, 240.0)];
        let mut stroke = StrokeColor::default();
        let drawn = draw_poses(&mut canvas, &poses, &mut still(), &mut stroke, &Palette::default());
        assert_eq!(drawn.len(), 1);
        assert_eq!(canvas.ellipses(), 1);
        assert_eq!(canvas.lines(), 11);
        assert_eq!(stroke.hue, 320.0);
    }

    #[test]
    fn last_pose_wins_the_color() {
        let mut canvas = RecordingCanvas::new(640.0, 480.0);
        let poses = vec![standing(200.0, 0.0), standing(400.0, 480.0)];
        let mut stroke = StrokeColor::default();
        draw_poses(&mut canvas, &poses, &mut still(), &mut stroke, &Palette::default());
        assert_eq!(stroke.hue, 340.0);
    }

    #[test]
    fn empty_frame_draws_nothing() {
        let mut canvas = RecordingCanvas::new(640.0, 480.0);
        let mut stroke = StrokeColor::default();
        let drawn = draw_poses(&mut canvas, &[], &mut still(), &mut stroke, &Palette::default());
        assert!(drawn.is_empty());
        assert!(canvas.calls.is_empty());
        assert_eq!(stroke, StrokeColor::default());
    }

    #[test]
    fn positional_lookup_ignores_labels() {
        let mut pose = standing(300.0, 240.0);
        for kp in pose.keypoints.iter_mut() {
            *kp = Keypoint { part: Nose, ..*kp };
        }
        let mut canvas = RecordingCanvas::new(640.0, 480.0);
        let mut stroke = StrokeColor::default();
        draw_poses(&mut canvas, &[pose], &mut still(), &mut stroke, &Palette::default());
        assert_eq!(canvas.lines(), 11);
        assert_eq!(stroke.hue, 320.0);
    }
}
