//! Real-time playback thread.
//!
//! The [`Transport`] is advanced on its own thread and its note events are
//! sent to a MIDI output port. Commands go in over one channel; amplitude
//! levels come back over another so the render loop can read them without
//! blocking.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::phrase::Phrase;
use crate::transport::{Transport, TransportEvent};

/// How often the playback thread wakes to move the playhead.
const TICK: Duration = Duration::from_millis(5);

// ════════════════════════════════════════════════════════════════════════════
// AudioTrack — what the render loop needs from a playing track
// ════════════════════════════════════════════════════════════════════════════

/// A single looping music track with variable speed and a level meter.
pub trait AudioTrack {
    fn play(&mut self);
    fn set_loop(&mut self, looping: bool);
    /// Speed multiplier; 0 freezes the track without losing its place.
    fn set_rate(&mut self, rate: f32);
    /// Most recent amplitude reading, 0.0–1.0.
    fn current_level(&mut self) -> f32;
}

// ════════════════════════════════════════════════════════════════════════════
// PlayerCommand — sent to the playback thread
// ════════════════════════════════════════════════════════════════════════════

pub enum PlayerCommand {
    /// Start (or resume) the transport.
    Play,
    SetLoop(bool),
    SetRate(f32),
    /// Terminate the thread.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// MidiOut — abstraction over midir / null
// ════════════════════════════════════════════════════════════════════════════

trait MidiOut: Send {
    fn program_change(&mut self, channel: u8, program: u8);
    fn note_on(&mut self,  channel: u8, note: u8, velocity: u8);
    fn note_off(&mut self, channel: u8, note: u8);
}

// ── midir backend ─────────────────────────────────────────────────────────

struct MidirOut {
    conn: midir::MidiOutputConnection,
}

impl MidiOut for MidirOut {
    fn program_change(&mut self, channel: u8, program: u8) {
        let _ = self.conn.send(&[0xC0 | (channel & 0x0F), program & 0x7F]);
    }
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        let _ = self.conn.send(&[0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]);
    }
    fn note_off(&mut self, channel: u8, note: u8) {
        let _ = self.conn.send(&[0x80 | (channel & 0x0F), note & 0x7F, 0]);
    }
}

// ── null backend (used when no MIDI port is available) ────────────────────

struct NullOut;
impl MidiOut for NullOut {
    fn program_change(&mut self, _ch: u8, _p: u8)   {}
    fn note_on(&mut self, _ch: u8, _n: u8, _v: u8)  {}
    fn note_off(&mut self, _ch: u8, _n: u8)          {}
}

/// Try to open the first available MIDI output port, preferring a
/// softsynth. Falls back to `NullOut` with a warning if none is found;
/// the level meter keeps working either way.
fn open_midi_output() -> Box<dyn MidiOut> {
    let midi_out = match midir::MidiOutput::new("pinkshirt_track") {
        Ok(m)  => m,
        Err(e) => {
            warn!(error = %e, "MIDI init failed, track will be silent");
            return Box::new(NullOut);
        }
    };

    let ports = midi_out.ports();
    if ports.is_empty() {
        warn!("no MIDI output ports found, track will be silent \
               (try `timidity -iA` or `fluidsynth` on Linux)");
        return Box::new(NullOut);
    }

    let port_idx = ports.iter().enumerate()
        .find(|(_, p)| {
            midi_out.port_name(p).map(|n| {
                let n = n.to_lowercase();
                n.contains("fluid") || n.contains("timidity") ||
                n.contains("microsoft") || n.contains("gm") ||
                n.contains("synth")
            }).unwrap_or(false)
        })
        .map(|(i, _)| i)
        .unwrap_or(0);

    let port = &ports[port_idx];
    let name = midi_out.port_name(port)
        .unwrap_or_else(|_| "Unknown".to_string());
    info!(port = %name, "opening MIDI port");

    match midi_out.connect(port, "pinkshirt-track") {
        Ok(conn) => Box::new(MidirOut { conn }),
        Err(e) => {
            warn!(error = %e, "MIDI connect failed, track will be silent");
            Box::new(NullOut)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Player — handle to the playback thread
// ════════════════════════════════════════════════════════════════════════════

/// MIDI voice settings for the track.
#[derive(Clone, Copy, Debug)]
pub struct Voice {
    pub instrument: u8,
    pub channel:    u8,
}

impl Default for Voice {
    fn default() -> Self {
        // GM 38 = Synth Bass 1
        Voice { instrument: 38, channel: 0 }
    }
}

pub struct Player {
    cmd_tx:     Sender<PlayerCommand>,
    level_rx:   Receiver<f32>,
    last_level: f32,
}

impl Player {
    /// Spawn the playback thread on the system MIDI output.
    pub fn spawn(phrase: Phrase, voice: Voice) -> Self {
        Self::spawn_with(phrase, voice, open_midi_output)
    }

    /// Spawn with no MIDI output at all; levels are still reported.
    pub fn spawn_silent(phrase: Phrase) -> Self {
        Self::spawn_with(phrase, Voice::default(), || Box::new(NullOut) as Box<dyn MidiOut>)
    }

    fn spawn_with<F>(phrase: Phrase, voice: Voice, open: F) -> Self
    where
        F: FnOnce() -> Box<dyn MidiOut> + Send + 'static,
    {
        let (cmd_tx, cmd_rx)     = mpsc::channel::<PlayerCommand>();
        let (level_tx, level_rx) = mpsc::channel::<f32>();

        thread::spawn(move || {
            let midi = open();
            player_thread(Transport::new(phrase), voice, midi, cmd_rx, level_tx);
        });

        Player { cmd_tx, level_rx, last_level: 0.0 }
    }

    pub fn quit(&self) { let _ = self.cmd_tx.send(PlayerCommand::Quit); }
}

impl AudioTrack for Player {
    fn play(&mut self)                  { let _ = self.cmd_tx.send(PlayerCommand::Play); }
    fn set_loop(&mut self, looping: bool) { let _ = self.cmd_tx.send(PlayerCommand::SetLoop(looping)); }
    fn set_rate(&mut self, rate: f32)   { let _ = self.cmd_tx.send(PlayerCommand::SetRate(rate)); }

    /// Drain pending level readings (non-blocking) and keep the newest.
    fn current_level(&mut self) -> f32 {
        while let Ok(l) = self.level_rx.try_recv() { self.last_level = l; }
        self.last_level
    }
}

impl Drop for Player {
    fn drop(&mut self) { self.quit(); }
}

// ════════════════════════════════════════════════════════════════════════════
// player_thread — the actual loop
// ════════════════════════════════════════════════════════════════════════════

fn player_thread(
    mut transport: Transport,
    voice:         Voice,
    mut midi:      Box<dyn MidiOut>,
    cmd_rx:        Receiver<PlayerCommand>,
    level_tx:      Sender<f32>,
) {
    midi.program_change(voice.channel, voice.instrument);
    let mut last = Instant::now();

    loop {
        // ── drain commands ────────────────────────────────────────────────
        loop {
            match cmd_rx.try_recv() {
                Ok(PlayerCommand::Play) => {
                    debug!("track play");
                    transport.play();
                }
                Ok(PlayerCommand::SetLoop(l)) => transport.set_loop(l),
                Ok(PlayerCommand::SetRate(r)) => transport.set_rate(r),
                Ok(PlayerCommand::Quit) | Err(TryRecvError::Disconnected) => {
                    transport.set_rate(0.0);
                    send_events(&mut *midi, voice.channel, transport.advance(Duration::ZERO));
                    return;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        // ── move the playhead ─────────────────────────────────────────────
        let now = Instant::now();
        let events = transport.advance(now - last);
        last = now;
        send_events(&mut *midi, voice.channel, events);

        if level_tx.send(transport.level()).is_err() { return; }

        thread::sleep(TICK);
    }
}

fn send_events(midi: &mut dyn MidiOut, channel: u8, events: Vec<TransportEvent>) {
    for e in events {
        match e {
            TransportEvent::NoteOn  { pitch, velocity } => midi.note_on(channel, pitch, velocity),
            TransportEvent::NoteOff { pitch }           => midi.note_off(channel, pitch),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingOut {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl MidiOut for RecordingOut {
        fn program_change(&mut self, ch: u8, p: u8) {
            self.log.lock().unwrap().push(format!("pc {} {}", ch, p));
        }
        fn note_on(&mut self, ch: u8, n: u8, v: u8) {
            self.log.lock().unwrap().push(format!("on {} {} {}", ch, n, v));
        }
        fn note_off(&mut self, ch: u8, n: u8) {
            self.log.lock().unwrap().push(format!("off {} {}", ch, n));
        }
    }

    fn wait_for_level(player: &mut Player, pred: impl Fn(f32) -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if pred(player.current_level()) { return true; }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn level_rises_once_playing() {
        let mut player = Player::spawn_silent(Phrase::groove());
        assert_eq!(player.current_level(), 0.0);
        player.play();
        player.set_loop(true);
        assert!(wait_for_level(&mut player, |l| l > 0.0));
    }

    #[test]
    fn rate_zero_silences_level() {
        let mut player = Player::spawn_silent(Phrase::groove());
        player.play();
        assert!(wait_for_level(&mut player, |l| l > 0.0));
        player.set_rate(0.0);
        assert!(wait_for_level(&mut player, |l| l == 0.0));
        player.set_rate(1.0);
        assert!(wait_for_level(&mut player, |l| l > 0.0));
    }

    #[test]
    fn midi_sees_program_then_notes_then_release_on_quit() {
        let out = RecordingOut::default();
        let log = out.log.clone();
        let voice = Voice { instrument: 5, channel: 2 };
        let mut player = Player::spawn_with(
            Phrase::groove(), voice, move || Box::new(out) as Box<dyn MidiOut>,
        );
        player.play();
        assert!(wait_for_level(&mut player, |l| l > 0.0));
        player.quit();

        // The level channel closes once the thread has returned.
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if matches!(player.level_rx.try_recv(), Err(TryRecvError::Disconnected)) { break; }
            thread::sleep(Duration::from_millis(5));
        }
        let log = log.lock().unwrap();
        assert_eq!(log[0], "pc 2 5");
        assert_eq!(log[1], "on 2 40 110");
        assert!(log.last().unwrap().starts_with("off 2"));
    }
}
