//! The music: a short looping phrase of MIDI notes.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackError {
    #[error("phrase has no notes")]
    Empty,
    #[error("tempo must be above zero")]
    ZeroTempo,
    #[error("note {index} has zero length")]
    ZeroLengthNote { index: usize },
}

/// A single step of the phrase. Velocity 0 is a rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Note {
    /// MIDI note number (0–127).
    pub pitch:    u8,
    /// Length in MIDI ticks.
    pub ticks:    u32,
    /// MIDI velocity (0–127).
    pub velocity: u8,
}

impl Note {
    pub const fn new(pitch: u8, ticks: u32, velocity: u8) -> Self {
        Note { pitch, ticks, velocity }
    }
    pub const fn rest(ticks: u32) -> Self {
        Note { pitch: 0, ticks, velocity: 0 }
    }
    pub fn is_rest(&self) -> bool { self.velocity == 0 }
}

/// A validated, non-empty note sequence with its timing base.
#[derive(Clone, Debug, PartialEq)]
pub struct Phrase {
    notes:             Vec<Note>,
    ticks_per_quarter: u32,
    tempo_bpm:         u32,
    total_ticks:       u64,
}

impl Phrase {
    pub fn new(notes: Vec<Note>, ticks_per_quarter: u32, tempo_bpm: u32) -> Result<Self, TrackError> {
        if notes.is_empty() { return Err(TrackError::Empty); }
        if tempo_bpm == 0 || ticks_per_quarter == 0 { return Err(TrackError::ZeroTempo); }
        if let Some(index) = notes.iter().position(|n| n.ticks == 0) {
            return Err(TrackError::ZeroLengthNote { index });
        }
        let total_ticks = notes.iter().map(|n| n.ticks as u64).sum();
        Ok(Phrase { notes, ticks_per_quarter, tempo_bpm, total_ticks })
    }

    /// Built-in two-bar groove in E minor pentatonic, 124 BPM.
    pub fn groove() -> Self {
        const E: u32 = 240; // eighth note at 480 tpq
        let notes = vec![
            Note::new(40, E, 110), Note::new(40, E, 70),  Note::new(52, E, 100), Note::rest(E),
            Note::new(43, E, 105), Note::new(45, E, 90),  Note::new(47, E, 100), Note::new(50, E, 80),
            Note::new(40, E, 110), Note::new(40, E, 70),  Note::new(52, E, 100), Note::new(50, E, 85),
            Note::new(47, E, 95),  Note::new(45, E, 90),  Note::new(43, E * 2, 100),
        ];
        Phrase {
            total_ticks: notes.iter().map(|n| n.ticks as u64).sum(),
            notes,
            ticks_per_quarter: 480,
            tempo_bpm: 124,
        }
    }

    pub fn notes(&self) -> &[Note] { &self.notes }
    pub fn tempo_bpm(&self) -> u32 { self.tempo_bpm }
    pub fn ticks_per_quarter(&self) -> u32 { self.ticks_per_quarter }
    pub fn total_ticks(&self) -> u64 { self.total_ticks }

    /// Ticks that elapse per millisecond at normal speed.
    pub fn ticks_per_ms(&self) -> f64 {
        self.ticks_per_quarter as f64 * self.tempo_bpm as f64 / 60_000.0
    }

    /// Index and start tick of the note sounding at `tick`
    /// (`0 <= tick < total_ticks`).
    pub fn note_at(&self, tick: f64) -> (usize, u64) {
        let mut start = 0u64;
        for (i, n) in self.notes.iter().enumerate() {
            let end = start + n.ticks as u64;
            if tick < end as f64 { return (i, start); }
            start = end;
        }
        let last = self.notes.len() - 1;
        (last, self.total_ticks - self.notes[last].ticks as u64)
    }
}

impl Default for Phrase {
    fn default() -> Self { Phrase::groove() }
}
