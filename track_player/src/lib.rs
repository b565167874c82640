//! # track_player
//!
//! The music side of the dance mirror: one looping phrase played in real
//! time over MIDI, whose speed can be turned down to a standstill and back
//! up without losing its place, and whose loudness is reported back as an
//! amplitude level for the visuals.
//!
//! ```rust,no_run
//! use track_player::{AudioTrack, Phrase, Player, Voice};
//!
//! let mut track = Player::spawn(Phrase::groove(), Voice::default());
//! track.play();
//! track.set_loop(true);
//! track.set_rate(0.5);                // half speed
//! let level = track.current_level();  // 0.0–1.0
//! # let _ = level;
//! ```

pub mod phrase;
pub mod transport;
pub mod player;

pub use phrase::{Note, Phrase, TrackError};
pub use player::{AudioTrack, Player, PlayerCommand, Voice};
pub use transport::{Transport, TransportEvent};
