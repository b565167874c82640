//! Colors that follow the dancer's wrists and the music's loudness.

use pose_feed::{Body, BodyPart};
use serde::Deserialize;

use crate::color::Hsba;

/// Linear re-map of `v` from `[in_lo, in_hi]` onto `[out_lo, out_hi]`.
/// Unclamped: inputs outside the source range extrapolate.
pub fn map_range(v: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    if in_hi == in_lo { return out_lo; }
    out_lo + (v - in_lo) / (in_hi - in_lo) * (out_hi - out_lo)
}

/// Target ranges and fixed components for the reactive colors.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Right wrist height → stroke hue.
    pub stroke_hue:            [f32; 2],
    /// Left wrist height → stroke saturation.
    pub stroke_saturation:     [f32; 2],
    pub stroke_brightness:     f32,
    /// Amplitude 0–1 → background hue.
    pub background_hue:        [f32; 2],
    pub background_saturation: f32,
    pub background_brightness: f32,
    /// Below 1.0 the background leaves a trail instead of clearing.
    pub background_alpha:      f32,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            stroke_hue:            [300.0, 340.0],
            stroke_saturation:     [70.0, 100.0],
            stroke_brightness:     50.0,
            background_hue:        [300.0, 340.0],
            background_saturation: 30.0,
            background_brightness: 75.0,
            background_alpha:      0.4,
        }
    }
}

/// Stroke hue and saturation, overwritten by every pose drawn.
///
/// With several people in frame the last pose processed decides the color.
/// Starts grey (hue 0, saturation 0) until a pose has been seen.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct StrokeColor {
    pub hue:        f32,
    pub saturation: f32,
}

impl StrokeColor {
    /// Re-derive from the wrists of `body` on a canvas `height` pixels tall.
    pub fn follow_wrists(&mut self, body: &Body<'_>, height: f32, palette: &Palette) {
        let [h0, h1] = palette.stroke_hue;
        let [s0, s1] = palette.stroke_saturation;
        self.hue        = map_range(body.at(BodyPart::RightWrist).y, 0.0, height, h0, h1);
        self.saturation = map_range(body.at(BodyPart::LeftWrist).y,  0.0, height, s0, s1);
    }

    pub fn to_hsba(self, palette: &Palette) -> Hsba {
        Hsba::opaque(self.hue, self.saturation, palette.stroke_brightness)
    }
}

/// Translucent background tint for an amplitude reading.
pub fn background_for_level(level: f32, palette: &Palette) -> Hsba {
    let [h0, h1] = palette.background_hue;
    Hsba::new(
        map_range(level, 0.0, 1.0, h0, h1),
        palette.background_saturation,
        palette.background_brightness,
        palette.background_alpha,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_feed::Pose;

    fn pose_with_wrists(left_y: f32, right_y: f32) -> Pose {
        Pose::from_fn(|p| match p {
            BodyPart::LeftWrist  => (100.0, left_y, 0.9),
            BodyPart::RightWrist => (200.0, right_y, 0.9),
            _ => (0.0, 0.0, 0.9),
        })
    }

    #[test]
    fn map_range_endpoints_and_middle() {
        assert_eq!(map_range(0.0,   0.0, 480.0, 300.0, 340.0), 300.0);
        assert_eq!(map_range(480.0, 0.0, 480.0, 300.0, 340.0), 340.0);
        assert_eq!(map_range(240.0, 0.0, 480.0, 300.0, 340.0), 320.0);
    }

    #[test]
    fn map_range_extrapolates() {
        assert_eq!(map_range(-480.0, 0.0, 480.0, 300.0, 340.0), 260.0);
        assert_eq!(map_range(960.0,  0.0, 480.0, 70.0, 100.0), 130.0);
    }

    #[test]
    fn map_range_degenerate_source() {
        assert_eq!(map_range(5.0, 1.0, 1.0, 10.0, 20.0), 10.0);
    }

    #[test]
    fn wrists_drive_hue_and_saturation() {
        let palette = Palette::default();
        let pose = pose_with_wrists(0.0, 240.0);
        let mut stroke = StrokeColor::default();
        stroke.follow_wrists(&pose.body().unwrap(), 480.0, &palette);
        assert_eq!(stroke.hue, 320.0);
        assert_eq!(stroke.saturation, 70.0);
    }

    #[test]
    fn wrists_at_bottom_hit_top_of_range() {
        let palette = Palette::default();
        let pose = pose_with_wrists(480.0, 480.0);
        let mut stroke = StrokeColor::default();
        stroke.follow_wrists(&pose.body().unwrap(), 480.0, &palette);
        assert_eq!(stroke.hue, 340.0);
        assert_eq!(stroke.saturation, 100.0);
    }

    #[test]
    fn stroke_starts_grey() {
        let s = StrokeColor::default().to_hsba(&Palette::default());
        assert_eq!(s, Hsba::opaque(0.0, 0.0, 50.0));
    }

    #[test]
    fn background_follows_level() {
        let palette = Palette::default();
        assert_eq!(background_for_level(0.0, &palette), Hsba::new(300.0, 30.0, 75.0, 0.4));
        assert_eq!(background_for_level(1.0, &palette).hue, 340.0);
        assert_eq!(background_for_level(0.5, &palette).hue, 320.0);
    }
}
