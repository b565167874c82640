//! Application configuration: built-in defaults, optionally overridden by a
//! TOML file.
//!
//! ```toml
//! width  = 960
//! height = 720
//! slop   = 30.0
//! presence_scope = "last-keypoint"
//!
//! [palette]
//! stroke_hue = [300.0, 340.0]
//!
//! [track]
//! tempo_bpm  = 110
//! instrument = 81
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use track_player::{Note, Phrase, TrackError, Voice};

use crate::jitter::DEFAULT_SLOP;
use crate::presence::{EmptyFrame, PresenceScope, DEFAULT_CONFIDENCE, DEFAULT_RAMP_FRAMES};
use crate::reactive::Palette;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("bad config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("bad track: {0}")]
    Track(#[from] TrackError),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Where poses come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Built-in animated dancers.
    #[default]
    Sim,
    /// JSON lines on stdin from an external estimator.
    Stdin,
}

/// The music track.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    pub tempo_bpm:         u32,
    pub ticks_per_quarter: u32,
    /// GM program number.
    pub instrument:        u8,
    pub channel:           u8,
    pub looping:           bool,
    /// Skip MIDI output entirely; levels still drive the background.
    pub silent:            bool,
    /// Custom phrase; the built-in groove when absent.
    pub notes:             Option<Vec<Note>>,
}

impl Default for TrackConfig {
    fn default() -> Self {
        let groove = Phrase::groove();
        TrackConfig {
            tempo_bpm:         groove.tempo_bpm(),
            ticks_per_quarter: groove.ticks_per_quarter(),
            instrument:        Voice::default().instrument,
            channel:           0,
            looping:           true,
            silent:            false,
            notes:             None,
        }
    }
}

impl TrackConfig {
    pub fn phrase(&self) -> Result<Phrase, TrackError> {
        let notes = match &self.notes {
            Some(n) => n.clone(),
            None    => Phrase::groove().notes().to_vec(),
        };
        Phrase::new(notes, self.ticks_per_quarter, self.tempo_bpm)
    }

    pub fn voice(&self) -> Voice {
        Voice { instrument: self.instrument.min(127), channel: self.channel & 0x0F }
    }
}

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub width:                usize,
    pub height:               usize,
    /// Target frames per second of the render loop.
    pub fps:                  u32,
    /// Maximum jitter per coordinate, in pixels.
    pub slop:                 f32,
    pub stroke_weight:        u32,
    pub mirror:               bool,
    /// Start with the video overlay on.
    pub show_video:           bool,
    /// Webcam device for the overlay (`camera` feature).
    pub camera_index:         i32,
    pub confidence_threshold: f32,
    /// Absent frames until the music stops.
    pub ramp_frames:          u32,
    pub presence_scope:       PresenceScope,
    /// Unset: `absent` for the simulator, `hold` for a real estimator.
    pub empty_frame:          Option<EmptyFrame>,
    pub source:               SourceKind,
    /// Detection cycles per second of the simulated dancers.
    pub sim_rate_hz:          f32,
    /// Fixed seed for jitter and the simulator.
    pub seed:                 Option<u64>,
    pub palette:              Palette,
    pub track:                TrackConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            width:                960,
            height:               720,
            fps:                  60,
            slop:                 DEFAULT_SLOP,
            stroke_weight:        3,
            mirror:               true,
            show_video:           false,
            camera_index:         0,
            confidence_threshold: DEFAULT_CONFIDENCE,
            ramp_frames:          DEFAULT_RAMP_FRAMES,
            presence_scope:       PresenceScope::default(),
            empty_frame:          None,
            source:               SourceKind::default(),
            sim_rate_hz:          15.0,
            seed:                 None,
            palette:              Palette::default(),
            track:                TrackConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Empty-frame policy in force for the configured source.
    ///
    /// The simulator sends empty lists on purpose when its dancer walks
    /// off, so there an empty frame means nobody is there. An estimator
    /// also drops frames it simply failed on; those keep the last verdict.
    pub fn empty_frame_policy(&self) -> EmptyFrame {
        self.empty_frame.unwrap_or(match self.source {
            SourceKind::Sim   => EmptyFrame::Absent,
            SourceKind::Stdin => EmptyFrame::Hold,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid { field: "width/height", reason: "must be non-zero" });
        }
        if self.fps == 0 {
            return Err(ConfigError::Invalid { field: "fps", reason: "must be non-zero" });
        }
        if !self.slop.is_finite() {
            return Err(ConfigError::Invalid { field: "slop", reason: "must be a finite number" });
        }
        if !(self.sim_rate_hz > 0.0) {
            return Err(ConfigError::Invalid { field: "sim_rate_hz", reason: "must be positive" });
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::Invalid { field: "confidence_threshold", reason: "must be within 0–1" });
        }
        self.track.phrase()?;
        Ok(())
    }
}
