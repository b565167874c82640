//! Video frames for the optional overlay beneath the skeleton.

/// One ARGB image, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoFrame {
    pub width:  usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl VideoFrame {
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        VideoFrame { width, height, pixels: vec![color; width * height] }
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }
}

/// Something that can hand over the latest camera image.
pub trait FrameSource {
    fn current_frame(&mut self) -> &VideoFrame;
}

/// Stand-in camera: slow diagonal stripes over a dim backdrop, advanced one
/// step per call.
pub struct SyntheticCamera {
    frame: VideoFrame,
    t:     u32,
}

impl SyntheticCamera {
    pub fn new(width: usize, height: usize) -> Self {
        SyntheticCamera { frame: VideoFrame::filled(width, height, 0xFF202020), t: 0 }
    }
}

impl FrameSource for SyntheticCamera {
    fn current_frame(&mut self) -> &VideoFrame {
        self.t = self.t.wrapping_add(1);
        let w = self.frame.width;
        for (i, px) in self.frame.pixels.iter_mut().enumerate() {
            let (x, y) = (i % w, i / w);
            let band = ((x + y + self.t as usize * 2) / 24) % 2;
            *px = if band == 0 { 0xFF2A2A33 } else { 0xFF3A3A48 };
        }
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_frame_has_requested_size() {
        let mut cam = SyntheticCamera::new(64, 48);
        let f = cam.current_frame();
        assert_eq!((f.width, f.height), (64, 48));
        assert_eq!(f.pixels.len(), 64 * 48);
    }

    #[test]
    fn synthetic_frames_move() {
        let mut cam = SyntheticCamera::new(64, 48);
        let a = cam.current_frame().clone();
        for _ in 0..5 { cam.current_frame(); }
        let b = cam.current_frame().clone();
        assert_ne!(a, b);
    }
}
