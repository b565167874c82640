//! Top-level application state and the per-frame pipeline.
//!
//! `AppState` owns everything that persists between frames: jitter source,
//! stroke color, presence detector and ramp, and the video toggle. Each
//! frame it reads the latest amplitude and pose list, paints, and pushes a
//! new playback rate to the track.

use std::io;
use std::sync::mpsc;

use pose_feed::{spawn_pose_source, JsonLinesPoseSource, Point, Pose, PoseFeed, SimPoseSource};
use thiserror::Error;
use tracing::{info, warn};
use track_player::{AudioTrack, Player};

use crate::camera::{FrameSource, SyntheticCamera};
use crate::canvas::Canvas;
use crate::clock::FrameClock;
use crate::config::{AppConfig, ConfigError, SourceKind};
use crate::framebuffer::Framebuffer;
use crate::jitter::Jitter;
use crate::presence::{PresenceDetector, PresenceRamp};
use crate::reactive::{background_for_level, Palette, StrokeColor};
use crate::skeleton::draw_poses;
use crate::visualizer::{UiEvent, Visualizer, WindowError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Window(#[from] WindowError),
}

// ════════════════════════════════════════════════════════════════════════════
// VideoToggle — the show/hide video button
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VideoToggle {
    showing: bool,
}

impl VideoToggle {
    pub fn new(showing: bool) -> Self { VideoToggle { showing } }

    pub fn toggle(&mut self) { self.showing = !self.showing; }

    pub fn is_showing(&self) -> bool { self.showing }

    /// Button text: what pressing it would do.
    pub fn label(&self) -> &'static str {
        if self.showing { "Hide Video" } else { "Show Video" }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameReport — what one tick decided
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub level:  f32,
    pub people: usize,
    pub absent: bool,
    pub rate:   f32,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    jitter:   Jitter,
    palette:  Palette,
    stroke:   StrokeColor,
    detector: PresenceDetector,
    ramp:     PresenceRamp,
    video:    VideoToggle,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        AppState {
            jitter:   Jitter::new(cfg.slop, cfg.seed),
            palette:  cfg.palette.clone(),
            stroke:   StrokeColor::default(),
            detector: PresenceDetector::new(cfg.confidence_threshold, cfg.presence_scope, cfg.empty_frame_policy()),
            ramp:     PresenceRamp::new(cfg.ramp_frames),
            video:    VideoToggle::new(cfg.show_video),
        }
    }

    pub fn handle_ui(&mut self, event: UiEvent) {
        if event == UiEvent::ToggleVideo {
            self.video.toggle();
            info!(showing = self.video.is_showing(), "video overlay toggled");
        }
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    /// Run one frame: background from amplitude, optional mirrored video,
    /// skeletons, then presence and playback rate.
    pub fn tick<C, T, F>(
        &mut self,
        canvas: &mut C,
        track:  &mut T,
        poses:  &[Pose],
        camera: &mut F,
    ) -> FrameReport
    where
        C: Canvas + ?Sized,
        T: AudioTrack + ?Sized,
        F: FrameSource + ?Sized,
    {
        let level = track.current_level();
        canvas.wash(background_for_level(level, &self.palette));

        if self.video.is_showing() {
            canvas.image(camera.current_frame());
        }

        // Color chosen by last frame's wrists.
        canvas.set_stroke(self.stroke.to_hsba(&self.palette));
        let bodies = draw_poses(canvas, poses, &mut self.jitter, &mut self.stroke, &self.palette);

        let obs = self.detector.observe(&bodies);
        if obs.rising {
            info!("nobody dancing, slowing the music");
        }
        self.ramp.update(obs);
        let rate = self.ramp.playback_rate();
        track.set_rate(rate);

        canvas.label(self.video.label(), Point::new(10.0, 10.0));

        FrameReport { level, people: bodies.len(), absent: obs.absent, rate }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn stroke(&self)       -> StrokeColor { self.stroke }
    pub fn ramp_value(&self)   -> f32         { self.ramp.value() }
    pub fn video(&self)        -> VideoToggle { self.video }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application until the window closes.
///
/// Spawns the pose source (simulator or stdin), the track player, opens
/// the window, and drives the frame loop at `cfg.fps`.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    cfg.validate()?;

    // ── Pose source ───────────────────────────────────────────────────────
    let (mut feed, sim_tx): (PoseFeed, _) = match cfg.source {
        SourceKind::Sim => {
            let (tx, rx) = mpsc::channel();
            let feed = spawn_pose_source(SimPoseSource {
                rx,
                width:   cfg.width as f32,
                height:  cfg.height as f32,
                rate_hz: cfg.sim_rate_hz,
                seed:    cfg.seed.unwrap_or(0),
            });
            (feed, Some(tx))
        }
        SourceKind::Stdin => {
            let feed = spawn_pose_source(JsonLinesPoseSource { reader: io::BufReader::new(io::stdin()) });
            (feed, None)
        }
    };

    // ── Track ─────────────────────────────────────────────────────────────
    let phrase = cfg.track.phrase().map_err(ConfigError::from)?;
    let mut track = if cfg.track.silent {
        Player::spawn_silent(phrase)
    } else {
        Player::spawn(phrase, cfg.track.voice())
    };
    track.play();
    track.set_loop(cfg.track.looping);

    // ── Window + canvas ───────────────────────────────────────────────────
    let mut vis    = Visualizer::new("Pink Shirt Day", cfg.width, cfg.height, sim_tx)?;
    let mut fb     = Framebuffer::new(cfg.width, cfg.height, cfg.stroke_weight, cfg.mirror);
    let mut camera = open_camera(&cfg);
    let mut clock  = FrameClock::new(cfg.fps);
    let mut app    = AppState::new(&cfg);

    info!(width = cfg.width, height = cfg.height, fps = cfg.fps, source = ?cfg.source, "running");

    // ── Main loop ─────────────────────────────────────────────────────────
    'frames: while vis.is_open() {
        for event in vis.poll_input() {
            if event == UiEvent::Quit { break 'frames; }
            app.handle_ui(event);
        }

        app.tick(&mut fb, &mut track, feed.latest(), camera.as_mut());

        if let Err(e) = vis.present(&fb) {
            warn!(error = %e, "frame dropped");
        }
        clock.wait();
    }

    vis.shutdown();
    info!(frames = clock.frame(), "window closed");
    Ok(())
}

#[cfg(feature = "camera")]
fn open_camera(cfg: &AppConfig) -> Box<dyn FrameSource> {
    match crate::webcam::WebCamera::start(cfg.camera_index, cfg.width, cfg.height) {
        Ok(cam) => Box::new(cam),
        Err(e) => {
            warn!(error = %e, "no webcam, video overlay shows a test pattern");
            Box::new(SyntheticCamera::new(cfg.width, cfg.height))
        }
    }
}

#[cfg(not(feature = "camera"))]
fn open_camera(cfg: &AppConfig) -> Box<dyn FrameSource> {
    Box::new(SyntheticCamera::new(cfg.width, cfg.height))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
