//! HSB colors in the 360 / 100 / 100 / 1 convention, packed to ARGB.

/// Hue in degrees, saturation and brightness in 0–100, alpha in 0–1.
///
/// Components are stored as given; out-of-range values are wrapped
/// (hue) or clamped (the rest) only when packed to pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsba {
    pub hue:        f32,
    pub saturation: f32,
    pub brightness: f32,
    pub alpha:      f32,
}

impl Hsba {
    pub const fn new(hue: f32, saturation: f32, brightness: f32, alpha: f32) -> Self {
        Hsba { hue, saturation, brightness, alpha }
    }

    pub const fn opaque(hue: f32, saturation: f32, brightness: f32) -> Self {
        Hsba::new(hue, saturation, brightness, 1.0)
    }

    /// Packed `0xFFRRGGBB`; alpha is applied by the caller when blending.
    pub fn to_argb(self) -> u32 {
        hsv_to_argb(
            self.hue,
            (self.saturation / 100.0).clamp(0.0, 1.0),
            (self.brightness / 100.0).clamp(0.0, 1.0),
        )
    }
}

/// Convert HSV → packed ARGB (0xAARRGGBB, A=0xFF).
fn hsv_to_argb(h: f32, s: f32, v: f32) -> u32 {
    let h  = h.rem_euclid(360.0);
    let hi = (h / 60.0) as u32;
    let f  = h / 60.0 - hi as f32;
    let p  = v * (1.0 - s);
    let q  = v * (1.0 - s * f);
    let t  = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match hi {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let ri = (r * 255.0).round() as u32;
    let gi = (g * 255.0).round() as u32;
    let bi = (b * 255.0).round() as u32;
    0xFF000000 | (ri << 16) | (gi << 8) | bi
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t).round() as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries() {
        assert_eq!(Hsba::opaque(0.0,   100.0, 100.0).to_argb(), 0xFFFF0000);
        assert_eq!(Hsba::opaque(120.0, 100.0, 100.0).to_argb(), 0xFF00FF00);
        assert_eq!(Hsba::opaque(240.0, 100.0, 100.0).to_argb(), 0xFF0000FF);
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert_eq!(Hsba::opaque(0.0, 0.0, 50.0).to_argb(), 0xFF808080);
    }

    #[test]
    fn hue_wraps_both_ways() {
        let base = Hsba::opaque(300.0, 80.0, 50.0).to_argb();
        assert_eq!(Hsba::opaque(660.0,  80.0, 50.0).to_argb(), base);
        assert_eq!(Hsba::opaque(-60.0,  80.0, 50.0).to_argb(), base);
    }

    #[test]
    fn saturation_clamps_when_packed() {
        assert_eq!(
            Hsba::opaque(320.0, 130.0, 50.0).to_argb(),
            Hsba::opaque(320.0, 100.0, 50.0).to_argb(),
        );
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
        assert_eq!(blend(0xFF000000, 0xFFC8C8C8, 0.5), 0xFF646464);
    }
}
