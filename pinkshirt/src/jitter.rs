//! Hand-drawn wobble: every coordinate gets its own bounded random nudge.

use pose_feed::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::Canvas;

pub const DEFAULT_SLOP: f32 = 30.0;

/// Uniform jitter within `[-slop, slop]`.
pub struct Jitter<R = StdRng> {
    slop: f32,
    rng:  R,
}

impl Jitter<StdRng> {
    /// Seeded from the OS unless `seed` is given.
    pub fn new(slop: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None    => StdRng::from_os_rng(),
        };
        Jitter::with_rng(slop, rng)
    }
}

impl<R: Rng> Jitter<R> {
    pub fn with_rng(slop: f32, rng: R) -> Self {
        Jitter { slop: slop.abs(), rng }
    }

    pub fn slop(&self) -> f32 { self.slop }

    /// `n + U(-slop, slop)`.
    pub fn scalar(&mut self, n: f32) -> f32 {
        if self.slop == 0.0 { return n; }
        n + self.rng.random_range(-self.slop..=self.slop)
    }

    /// Independent draws for x and y.
    pub fn point(&mut self, p: Point) -> Point {
        Point::new(self.scalar(p.x), self.scalar(p.y))
    }

    pub fn length(&mut self, len: f32) -> f32 { self.scalar(len) }

    /// Line with four independent draws, one per endpoint coordinate.
    pub fn line<C: Canvas + ?Sized>(&mut self, canvas: &mut C, a: Point, b: Point) {
        let a = self.point(a);
        let b = self.point(b);
        canvas.line(a, b);
    }

    /// Circle of diameter `d`, drawn as an ellipse whose centre and both
    /// axes are jittered independently.
    pub fn circle<C: Canvas + ?Sized>(&mut self, canvas: &mut C, center: Point, d: f32) {
        let c = self.point(center);
        let w = self.length(d);
        let h = self.length(d);
        canvas.ellipse(c, w, h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::{Call, RecordingCanvas};

    #[test]
    fn scalar_stays_within_slop() {
        let mut j = Jitter::new(DEFAULT_SLOP, Some(11));
        for n in [-1000.0f32, -1.0, 0.0, 0.5, 320.0, 1.0e5] {
            for _ in 0..500 {
                let v = j.scalar(n);
                assert!(v >= n - 30.0 && v <= n + 30.0, "{} -> {}", n, v);
            }
        }
    }

    #[test]
    fn zero_slop_is_identity() {
        let mut j = Jitter::new(0.0, Some(1));
        assert_eq!(j.scalar(42.5), 42.5);
        assert_eq!(j.point(Point::new(1.0, 2.0)), Point::new(1.0, 2.0));
    }

    #[test]
    fn coordinates_are_drawn_independently() {
        let mut j = Jitter::new(DEFAULT_SLOP, Some(5));
        let mut canvas = RecordingCanvas::new(640.0, 480.0);
        j.line(&mut canvas, Point::new(100.0, 100.0), Point::new(100.0, 100.0));
        let Call::Line(a, b) = canvas.calls[0] else { panic!("expected a line") };
        // A rigid offset would move both ends identically.
        assert_ne!(a, b);
        assert_ne!(a.x - 100.0, a.y - 100.0);
    }

    #[test]
    fn same_seed_same_wobble() {
        let mut a = Jitter::new(DEFAULT_SLOP, Some(99));
        let mut b = Jitter::new(DEFAULT_SLOP, Some(99));
        for i in 0..20 {
            assert_eq!(a.scalar(i as f32), b.scalar(i as f32));
        }
    }

    #[test]
    fn negative_slop_is_magnitude() {
        assert_eq!(Jitter::new(-12.0, None).slop(), 12.0);
    }
}
