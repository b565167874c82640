//! The `minifb` window: shows the framebuffer and turns keys into events.
//!
//! | Key | Action |
//! |---|---|
//! | `V` | Show / hide the video overlay |
//! | `Space` | Sim: dancer walks out of / back into frame |
//! | `2` | Sim: second dancer |
//! | `L` | Sim: weak detections |
//! | `Q` / `Esc` | Quit |

use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use pose_feed::SimControl;
use thiserror::Error;
use tracing::debug;

use crate::framebuffer::Framebuffer;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("cannot open window: {0}")]
    Open(#[source] minifb::Error),
    #[error("cannot update window: {0}")]
    Update(#[source] minifb::Error),
}

/// Window-level events the app loop reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiEvent {
    ToggleVideo,
    Quit,
}

pub struct Visualizer {
    window: Window,
    /// Present only when poses come from the simulator.
    sim_tx: Option<Sender<SimControl>>,
}

impl Visualizer {
    pub fn new(
        title:  &str,
        width:  usize,
        height: usize,
        sim_tx: Option<Sender<SimControl>>,
    ) -> Result<Self, WindowError> {
        let mut window = Window::new(
            title,
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(WindowError::Open)?;

        // Pacing is the FrameClock's job.
        window.limit_update_rate(None);

        Ok(Visualizer { window, sim_tx })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard input. Sim keys go straight to the simulator.
    pub fn poll_input(&mut self) -> Vec<UiEvent> {
        let mut events = Vec::new();
        if !self.window.is_open() {
            events.push(UiEvent::Quit);
            return events;
        }

        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if pressed(Key::Q) || pressed(Key::Escape) { events.push(UiEvent::Quit); }
        if pressed(Key::V) { events.push(UiEvent::ToggleVideo); }

        let mut sim = Vec::new();
        if pressed(Key::Space) { sim.push(SimControl::TogglePresence); }
        if pressed(Key::Key2)  { sim.push(SimControl::ToggleSecondDancer); }
        if pressed(Key::L)     { sim.push(SimControl::ToggleLowConfidence); }

        if let Some(tx) = &self.sim_tx {
            for control in sim {
                debug!(?control, "sim control");
                let _ = tx.send(control);
            }
        }
        events
    }

    pub fn present(&mut self, fb: &Framebuffer) -> Result<(), WindowError> {
        let (w, h) = fb.dims();
        self.window
            .update_with_buffer(fb.pixels(), w, h)
            .map_err(WindowError::Update)
    }

    /// Tell the simulator to stop.
    pub fn shutdown(&self) {
        if let Some(tx) = &self.sim_tx {
            let _ = tx.send(SimControl::Quit);
        }
    }
}
