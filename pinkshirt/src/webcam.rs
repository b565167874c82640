//! Live camera frames through OpenCV (`camera` feature).
//!
//! A capture thread reads the device as fast as it delivers, scales each
//! frame to the canvas and hands it over a one-slot channel; the render
//! loop picks up whatever arrived last.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread;
use std::time::Duration;

use opencv::core::{Mat, Size};
use opencv::prelude::*;
use opencv::{imgproc, videoio};
use thiserror::Error;
use tracing::{info, warn};

use crate::camera::{FrameSource, VideoFrame};

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera {0} is not available")]
    Unavailable(i32),
    #[error(transparent)]
    OpenCv(#[from] opencv::Error),
}

pub struct WebCamera {
    rx:    Receiver<VideoFrame>,
    frame: VideoFrame,
}

impl WebCamera {
    /// Open device `index` and start grabbing frames scaled to
    /// `width`×`height`. Black until the first frame arrives.
    pub fn start(index: i32, width: usize, height: usize) -> Result<Self, CameraError> {
        let mut capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(CameraError::Unavailable(index));
        }
        capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0)?;

        let native_w = capture.get(videoio::CAP_PROP_FRAME_WIDTH)?;
        let native_h = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?;
        info!(index, native_w, native_h, "camera ready");

        let (tx, rx) = mpsc::sync_channel(1);
        thread::spawn(move || capture_loop(capture, width, height, tx));

        Ok(WebCamera { rx, frame: VideoFrame::filled(width, height, 0xFF000000) })
    }
}

impl FrameSource for WebCamera {
    fn current_frame(&mut self) -> &VideoFrame {
        while let Ok(frame) = self.rx.try_recv() {
            self.frame = frame;
        }
        &self.frame
    }
}

fn capture_loop(
    mut capture: videoio::VideoCapture,
    width:       usize,
    height:      usize,
    tx:          SyncSender<VideoFrame>,
) {
    let mut raw    = Mat::default();
    let mut scaled = Mat::default();

    loop {
        let frame = match grab(&mut capture, &mut raw, &mut scaled, width, height) {
            Ok(Some(f)) => f,
            Ok(None) => {
                thread::sleep(Duration::from_millis(5));
                continue;
            }
            Err(e) => {
                warn!(error = %e, "camera read failed, video overlay frozen");
                return;
            }
        };
        match tx.try_send(frame) {
            // A full slot means the renderer hasn't looked yet; drop this one.
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => return,
        }
    }
}

fn grab(
    capture: &mut videoio::VideoCapture,
    raw:     &mut Mat,
    scaled:  &mut Mat,
    width:   usize,
    height:  usize,
) -> opencv::Result<Option<VideoFrame>> {
    if !capture.read(raw)? || raw.empty() {
        return Ok(None);
    }
    imgproc::resize(
        &*raw,
        scaled,
        Size::new(width as i32, height as i32),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;
    Ok(bgr_to_frame(scaled.data_bytes()?, width, height))
}

/// Pack tightly laid out BGR bytes into ARGB. `None` when the byte count
/// doesn't match the frame size (e.g. a greyscale device).
fn bgr_to_frame(bytes: &[u8], width: usize, height: usize) -> Option<VideoFrame> {
    if bytes.len() != width * height * 3 {
        return None;
    }
    let pixels = bytes
        .chunks_exact(3)
        .map(|p| 0xFF000000 | ((p[2] as u32) << 16) | ((p[1] as u32) << 8) | p[0] as u32)
        .collect();
    Some(VideoFrame { width, height, pixels })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bgr_bytes_become_argb() {
        let frame = bgr_to_frame(&[0x10, 0x20, 0x30, 0xFF, 0x00, 0x00], 2, 1).unwrap();
        assert_eq!(frame.pixel(0, 0), 0xFF302010);
        assert_eq!(frame.pixel(1, 0), 0xFF0000FF);
    }

    #[test]
    fn wrong_byte_count_is_rejected() {
        assert!(bgr_to_frame(&[0; 4], 2, 1).is_none());
        assert!(bgr_to_frame(&[0; 6], 2, 2).is_none());
    }
}
