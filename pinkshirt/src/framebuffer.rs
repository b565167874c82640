//! Software rasterizer behind the window: a mirrored ARGB framebuffer.

use std::f64::consts::TAU;

use pose_feed::Point;

use crate::camera::VideoFrame;
use crate::canvas::Canvas;
use crate::color::{blend, Hsba};

pub const CLEAR_COLOR: u32 = 0xFF1A1A2E;

/// ARGB pixel buffer implementing [`Canvas`].
///
/// With `mirror` on, canvas x maps to `width - x` so the viewer sees
/// themselves as in a mirror. Labels are UI, not scene, and are never
/// flipped.
pub struct Framebuffer {
    width:        usize,
    height:       usize,
    buf:          Vec<u32>,
    stroke:       u32,
    stroke_alpha: f32,
    weight:       i32,
    mirror:       bool,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize, stroke_weight: u32, mirror: bool) -> Self {
        Framebuffer {
            width,
            height,
            buf:          vec![CLEAR_COLOR; width * height],
            stroke:       0xFF808080,
            stroke_alpha: 1.0,
            weight:       stroke_weight.max(1) as i32,
            mirror,
        }
    }

    pub fn pixels(&self) -> &[u32] { &self.buf }
    pub fn dims(&self) -> (usize, usize) { (self.width, self.height) }

    pub fn pixel(&self, x: usize, y: usize) -> u32 { self.buf[y * self.width + x] }

    /// Canvas space → device space, before rounding.
    fn device(&self, p: Point) -> (f64, f64) {
        let x = if self.mirror { self.width as f64 - p.x as f64 } else { p.x as f64 };
        (x, p.y as f64)
    }

    /// Liang–Barsky clip of a device-space segment against the buffer,
    /// grown by the pen size so thick strokes still reach the edges.
    /// `None` when nothing of the segment is visible or a coordinate is
    /// not finite.
    fn clip(&self, (x0, y0): (f64, f64), (x1, y1): (f64, f64)) -> Option<(i32, i32, i32, i32)> {
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            return None;
        }
        let pad = self.weight as f64;
        let (xmin, xmax) = (-pad, self.width as f64 - 1.0 + pad);
        let (ymin, ymax) = (-pad, self.height as f64 - 1.0 + pad);
        let (dx, dy) = (x1 - x0, y1 - y0);

        let (mut t0, mut t1) = (0.0f64, 1.0f64);
        for (p, q) in [(-dx, x0 - xmin), (dx, xmax - x0), (-dy, y0 - ymin), (dy, ymax - y0)] {
            if p == 0.0 {
                if q < 0.0 { return None; }
            } else {
                let r = q / p;
                if p < 0.0 {
                    if r > t1 { return None; }
                    t0 = t0.max(r);
                } else {
                    if r < t0 { return None; }
                    t1 = t1.min(r);
                }
            }
        }
        Some((
            (x0 + t0 * dx).round() as i32,
            (y0 + t0 * dy).round() as i32,
            (x0 + t1 * dx).round() as i32,
            (y0 + t1 * dy).round() as i32,
        ))
    }

    fn clipped_line(&mut self, a: (f64, f64), b: (f64, f64)) {
        if let Some((x0, y0, x1, y1)) = self.clip(a, b) {
            self.raster_line(x0, y0, x1, y1);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let i = y as usize * self.width + x as usize;
            self.buf[i] = if self.stroke_alpha >= 1.0 {
                color
            } else {
                blend(self.buf[i], color, self.stroke_alpha)
            };
        }
    }

    /// Square pen of side `weight` centred on the point.
    fn plot(&mut self, x: i32, y: i32) {
        let r0 = -(self.weight - 1) / 2;
        let r1 = self.weight / 2;
        for dy in r0..=r1 {
            for dx in r0..=r1 {
                self.set_pixel(x + dx, y + dy, self.stroke);
            }
        }
    }

    /// Bresenham between two device pixels.
    fn raster_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.plot(x, y);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Minimal bitmap font, 3×5 glyphs scaled by `scale`.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: i32, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3i32 {
                    if bits & (1 << (2 - col)) != 0 {
                        for sy in 0..scale {
                            for sx in 0..scale {
                                self.set_pixel(cx + col * scale + sx, y + row as i32 * scale + sy, color);
                            }
                        }
                    }
                }
            }
            cx += 4 * scale;
            if cx + 4 * scale > self.width as i32 { break; }
        }
    }
}

impl Canvas for Framebuffer {
    fn width(&self)  -> f32 { self.width as f32 }
    fn height(&self) -> f32 { self.height as f32 }

    fn set_stroke(&mut self, color: Hsba) {
        self.stroke       = color.to_argb();
        self.stroke_alpha = color.alpha.clamp(0.0, 1.0);
    }

    fn line(&mut self, a: Point, b: Point) {
        let (a, b) = (self.device(a), self.device(b));
        self.clipped_line(a, b);
    }

    fn ellipse(&mut self, center: Point, w: f32, h: f32) {
        let (rx, ry) = (w.abs() as f64 / 2.0, h.abs() as f64 / 2.0);
        let c = self.device(center);
        if !(rx.is_finite() && ry.is_finite()) {
            return;
        }
        if rx < 0.5 && ry < 0.5 {
            self.clipped_line(c, c);
            return;
        }
        // Enough segments that each chord is a few pixels long; huge
        // outlines are mostly clipped away, so the count is capped.
        let segments = ((rx.max(ry) * TAU / 3.0) as usize).clamp(12, 720);
        let point = |i: usize| {
            let a = i as f64 / segments as f64 * TAU;
            ((c.0 + rx * a.cos()).round(), (c.1 + ry * a.sin()).round())
        };
        let mut prev = point(0);
        for i in 1..=segments {
            let next = point(i);
            self.clipped_line(prev, next);
            prev = next;
        }
    }

    fn wash(&mut self, color: Hsba) {
        let c = color.to_argb();
        let t = color.alpha.clamp(0.0, 1.0);
        for px in self.buf.iter_mut() {
            *px = blend(*px, c, t);
        }
    }

    fn image(&mut self, frame: &VideoFrame) {
        if frame.width == 0 || frame.height == 0 { return; }
        for dy in 0..self.height {
            let sy = dy * frame.height / self.height;
            for dx in 0..self.width {
                let cx = if self.mirror { self.width - 1 - dx } else { dx };
                let sx = cx * frame.width / self.width;
                self.buf[dy * self.width + dx] = frame.pixel(sx, sy);
            }
        }
    }

    fn label(&mut self, text: &str, at: Point) {
        let (x, y) = (at.x.round() as i32, at.y.round() as i32);
        let alpha = std::mem::replace(&mut self.stroke_alpha, 1.0);
        self.draw_text(text, x, y, 2, 0xFFEEEEEE);
        self.stroke_alpha = alpha;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 bitmap font, just the letters the video toggle needs
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        ' ' => [0; 5],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}
