//! Fixed-rate frame pacing, independent of the window backend.

use std::thread;
use std::time::{Duration, Instant};

pub struct FrameClock {
    period:   Duration,
    deadline: Instant,
    frame:    u64,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        FrameClock { period, deadline: Instant::now() + period, frame: 0 }
    }

    pub fn period(&self) -> Duration { self.period }
    pub fn frame(&self)  -> u64      { self.frame }

    /// Sleep until the next tick is due and return its number.
    ///
    /// A frame that overran its slot does not trigger catch-up frames;
    /// the schedule restarts from now.
    pub fn wait(&mut self) -> u64 {
        let now = Instant::now();
        if now < self.deadline {
            thread::sleep(self.deadline - now);
            self.deadline += self.period;
        } else {
            self.deadline = now + self.period;
        }
        self.frame += 1;
        self.frame
    }
}
