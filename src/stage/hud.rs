//! Click counter, quote rotation, wiggle and music flags.

use rand::Rng;

use super::scheduler::{Scheduler, TimerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HudTimer {
    WiggleEnd,
}

pub struct Hud {
    clicks: u32,
    quote: usize,
    music_on: bool,
    wiggling: bool,
    wiggle_ms: f64,
    wiggle_timer: Option<TimerId>,
    timers: Scheduler<HudTimer>,
}

impl Hud {
    pub fn new(wiggle_ms: f64) -> Self {
        Self {
            clicks: 0,
            quote: 0,
            music_on: false,
            wiggling: false,
            wiggle_ms,
            wiggle_timer: None,
            timers: Scheduler::new(),
        }
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn quote_index(&self) -> usize {
        self.quote
    }

    pub fn music_on(&self) -> bool {
        self.music_on
    }

    pub fn wiggling(&self) -> bool {
        self.wiggling
    }

    /// Mascot clicked: count it and (re)start the wiggle.
    pub fn register_click(&mut self, now: f64) {
        self.clicks = self.clicks.saturating_add(1);
        if let Some(id) = self.wiggle_timer.take() {
            self.timers.cancel(id);
        }
        self.wiggle_timer = self.timers.after(now, self.wiggle_ms, HudTimer::WiggleEnd);
        self.wiggling = self.wiggle_timer.is_some();
    }

    pub fn reset_clicks(&mut self) {
        self.clicks = 0;
    }

    /// Switch to a random quote different from the current one.
    pub fn next_quote<R: Rng>(&mut self, count: usize, rng: &mut R) -> usize {
        self.quote = pick_other(self.quote, count, rng);
        self.quote
    }

    /// Only called once playback actually started (or paused).
    pub fn set_music_on(&mut self, on: bool) {
        self.music_on = on;
    }

    /// Returns true when the wiggle state changed.
    pub fn advance(&mut self, now: f64) -> bool {
        let mut changed = false;
        for timer in self.timers.fire_due(now) {
            match timer {
                HudTimer::WiggleEnd => {
                    self.wiggle_timer = None;
                    changed |= self.wiggling;
                    self.wiggling = false;
                }
            }
        }
        changed
    }

    pub fn shutdown(&mut self) {
        self.timers.cancel_all();
        self.wiggle_timer = None;
    }
}

/// Uniform index in `0..count` other than `current`. With fewer than two
/// choices there is nothing else to pick.
pub fn pick_other<R: Rng>(current: usize, count: usize, rng: &mut R) -> usize {
    if count < 2 {
        return 0;
    }
    // Draw from the count-1 other slots and skip over `current`.
    let idx = rng.random_range(0..count - 1);
    if idx >= current.min(count - 1) { idx + 1 } else { idx }
}
