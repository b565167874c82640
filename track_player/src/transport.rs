//! Variable-speed playhead over a [`Phrase`].
//!
//! Pure state: no threads, no MIDI. The player thread advances it by wall
//! time and forwards the resulting [`TransportEvent`]s to a MIDI port.

use std::time::Duration;

use crate::phrase::Phrase;

/// Note on/off emitted while the playhead moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    NoteOn  { pitch: u8, velocity: u8 },
    NoteOff { pitch: u8 },
}

#[derive(Debug)]
pub struct Transport {
    phrase:   Phrase,
    /// Position in ticks, `0 <= playhead < total_ticks`.
    playhead: f64,
    rate:     f32,
    looping:  bool,
    playing:  bool,
    /// Index of the note currently held down, if any.
    sounding: Option<usize>,
}

impl Transport {
    pub fn new(phrase: Phrase) -> Self {
        Transport {
            phrase,
            playhead: 0.0,
            rate:     1.0,
            looping:  false,
            playing:  false,
            sounding: None,
        }
    }

    pub fn play(&mut self)                  { self.playing = true; }
    pub fn set_loop(&mut self, looping: bool) { self.looping = looping; }

    /// Playback speed multiplier; negative values are treated as 0.
    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate.max(0.0);
    }

    pub fn rate(&self)       -> f32  { self.rate }
    pub fn playhead(&self)   -> f64  { self.playhead }
    pub fn is_playing(&self) -> bool { self.playing }

    /// Advance by `dt` of wall time and report what changed.
    ///
    /// At rate 0 the playhead freezes in place and the held note is
    /// released; it is struck again once the rate picks up.
    pub fn advance(&mut self, dt: Duration) -> Vec<TransportEvent> {
        let mut events = Vec::new();

        if !self.playing || self.rate <= 0.0 {
            self.release(&mut events);
            return events;
        }

        let total = self.phrase.total_ticks() as f64;
        let step  = dt.as_secs_f64() * 1000.0 * self.phrase.ticks_per_ms() * self.rate as f64;
        let mut next = self.playhead + step;

        if next >= total {
            if self.looping {
                next %= total;
                // Wrapping onto the same index still re-strikes the note.
                self.release(&mut events);
            } else {
                self.playhead = 0.0;
                self.playing  = false;
                self.release(&mut events);
                return events;
            }
        }
        self.playhead = next;

        let (index, _) = self.phrase.note_at(self.playhead);
        if self.sounding != Some(index) {
            self.release(&mut events);
            let note = self.phrase.notes()[index];
            if !note.is_rest() {
                events.push(TransportEvent::NoteOn { pitch: note.pitch, velocity: note.velocity });
            }
            self.sounding = Some(index);
        }
        events
    }

    fn release(&mut self, events: &mut Vec<TransportEvent>) {
        if let Some(i) = self.sounding.take() {
            let note = self.phrase.notes()[i];
            if !note.is_rest() {
                events.push(TransportEvent::NoteOff { pitch: note.pitch });
            }
        }
    }

    /// Loudness of what is sounding right now, 0.0–1.0.
    ///
    /// Velocity scaled by a linear decay across the note (full at the
    /// attack, 30% at the tail). Silence reads 0.
    pub fn level(&self) -> f32 {
        let Some(i) = self.sounding else { return 0.0 };
        let (_, start) = self.phrase.note_at(self.playhead);
        let note = self.phrase.notes()[i];
        if note.is_rest() { return 0.0; }

        let progress = ((self.playhead - start as f64) / note.ticks as f64).clamp(0.0, 1.0) as f32;
        let envelope = 1.0 - 0.7 * progress;
        (note.velocity as f32 / 127.0 * envelope).clamp(0.0, 1.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
