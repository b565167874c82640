//! Drawing surface the frame pipeline paints on.
//!
//! Coordinates are camera pixel space; any mirroring happens inside the
//! implementation, so callers never flip anything themselves.

use pose_feed::Point;

use crate::camera::VideoFrame;
use crate::color::Hsba;

pub trait Canvas {
    fn width(&self)  -> f32;
    fn height(&self) -> f32;

    /// Stroke used by subsequent `line`/`ellipse` calls.
    fn set_stroke(&mut self, color: Hsba);

    fn line(&mut self, a: Point, b: Point);

    /// Outline ellipse centred at `center` with full width/height `w`×`h`.
    /// Negative extents draw the same as their magnitude.
    fn ellipse(&mut self, center: Point, w: f32, h: f32);

    /// Paint `color` over the whole surface at its alpha, leaving a
    /// fading trail of earlier frames.
    fn wash(&mut self, color: Hsba);

    /// Draw a video frame scaled to cover the whole surface.
    fn image(&mut self, frame: &VideoFrame);

    /// Small text label at `at` (used for the video toggle).
    fn label(&mut self, text: &str, at: Point);
}

#[cfg(test)]
pub mod recording {
    //! A canvas that remembers what it was asked to draw.

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Call {
        Stroke(Hsba),
        Line(Point, Point),
        Ellipse(Point, f32, f32),
        Wash(Hsba),
        Image { width: usize, height: usize },
        Label(String),
    }

    pub struct RecordingCanvas {
        pub width:  f32,
        pub height: f32,
        pub calls:  Vec<Call>,
    }

    impl RecordingCanvas {
        pub fn new(width: f32, height: f32) -> Self {
            RecordingCanvas { width, height, calls: Vec::new() }
        }

        pub fn lines(&self) -> usize {
            self.calls.iter().filter(|c| matches!(c, Call::Line(..))).count()
        }

        pub fn ellipses(&self) -> usize {
            self.calls.iter().filter(|c| matches!(c, Call::Ellipse(..))).count()
        }

        pub fn images(&self) -> usize {
            self.calls.iter().filter(|c| matches!(c, Call::Image { .. })).count()
        }

        pub fn last_stroke(&self) -> Option<Hsba> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Stroke(s) => Some(*s),
                _ => None,
            })
        }

        pub fn labels(&self) -> Vec<&str> {
            self.calls.iter().filter_map(|c| match c {
                Call::Label(s) => Some(s.as_str()),
                _ => None,
            }).collect()
        }
    }

    impl Canvas for RecordingCanvas {
        fn width(&self)  -> f32 { self.width }
        fn height(&self) -> f32 { self.height }
        fn set_stroke(&mut self, color: Hsba)          { self.calls.push(Call::Stroke(color)); }
        fn line(&mut self, a: Point, b: Point)         { self.calls.push(Call::Line(a, b)); }
        fn ellipse(&mut self, c: Point, w: f32, h: f32) { self.calls.push(Call::Ellipse(c, w, h)); }
        fn wash(&mut self, color: Hsba)                { self.calls.push(Call::Wash(color)); }
        fn image(&mut self, frame: &VideoFrame) {
            self.calls.push(Call::Image { width: frame.width, height: frame.height });
        }
        fn label(&mut self, text: &str, _at: Point) { self.calls.push(Call::Label(text.to_string())); }
    }
}
