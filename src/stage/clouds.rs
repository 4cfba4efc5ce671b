//! Drifting background clouds.
//!
//! A [`CloudField`] owns every live cloud plus the timers that create and
//! destroy them. Each cloud gets a one-shot expiry timer when it is inserted and
//! a repeating spawn timer keeps the sky populated. The frame loop calls
//! [`CloudField::advance`] and applies the returned [`CloudChange`]s to the DOM.
//!
//! Lifetimes: the drift animation may start with a negative delay, meaning the
//! cloud is already part-way across the screen. Such clouds only need the rest
//! of their duration, floored so the expiry timer is never zero or negative.
//! The field runs on a sanitized copy of its config, so the floor, the
//! durations and the spawn interval are always positive.

use rand::Rng;

use super::scheduler::{Scheduler, TimerId};
use crate::config::CloudConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CloudId(u64);

impl CloudId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Randomized visual parameters of one cloud (seconds / px / vh).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudParams {
    pub size: f64,
    pub top: f64,
    pub duration: f64,
    pub opacity: f64,
    pub delay: f64,
}

impl CloudParams {
    /// Draw a parameter set from the configured ranges.
    pub fn random<R: Rng>(cfg: &CloudConfig, rng: &mut R) -> Self {
        let size = cfg.size_px.sample(rng);
        let top = cfg.top_vh.sample(rng);
        let duration = cfg.duration_s.sample(rng);
        let opacity = cfg.opacity.sample(rng);
        let delay = cfg.delay_fraction.sample(rng) * duration;
        Self {
            size,
            top,
            duration,
            opacity,
            delay,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cloud {
    pub id: CloudId,
    pub params: CloudParams,
    pub expires_at_ms: f64,
}

impl Cloud {
    pub fn remaining_ms(&self, now: f64) -> f64 {
        self.expires_at_ms - now
    }
}

/// Seconds a cloud stays in the active set after insertion.
///
/// Non-negative delay: wait, then drift for the whole duration. Negative delay:
/// `-delay` seconds of the drift are already behind us, so only
/// `duration + delay` remain, never less than `floor`.
pub fn remaining_lifetime(delay: f64, duration: f64, floor: f64) -> f64 {
    if delay >= 0.0 {
        delay + duration
    } else {
        (duration + delay).max(floor)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CloudTimer {
    Spawn,
    Expire(CloudId),
}

/// What changed during a call; the DOM layer mirrors these.
#[derive(Clone, Debug, PartialEq)]
pub enum CloudChange {
    Spawned(Cloud),
    Removed(CloudId),
}

pub struct CloudField {
    cfg: CloudConfig,
    clouds: Vec<Cloud>,
    timers: Scheduler<CloudTimer>,
    spawn_timer: Option<TimerId>,
    next_id: u64,
    spawned: u64,
    removed: u64,
}

impl CloudField {
    pub fn new(cfg: CloudConfig) -> Self {
        if let Err(err) = cfg.validate() {
            console_log!("{err}; using the default for each invalid cloud setting");
        }
        Self {
            cfg: cfg.sanitized(),
            clouds: Vec::new(),
            timers: Scheduler::new(),
            spawn_timer: None,
            next_id: 0,
            spawned: 0,
            removed: 0,
        }
    }

    /// Initial burst plus the repeating spawn trigger. Calling it twice does not
    /// arm a second trigger.
    pub fn start<R: Rng>(&mut self, now: f64, rng: &mut R) -> Vec<CloudChange> {
        let mut changes = Vec::with_capacity(self.cfg.initial_burst);
        if self.timers.is_closed() {
            return changes;
        }
        for _ in 0..self.cfg.initial_burst {
            if let Some(c) = self.spawn_one(now, rng) {
                changes.push(CloudChange::Spawned(c));
            }
        }
        if self.spawn_timer.is_none() {
            self.spawn_timer = self
                .timers
                .every(now, self.cfg.spawn_interval_ms, CloudTimer::Spawn);
        }
        changes
    }

    /// Create one randomized cloud and arm its expiry timer.
    pub fn spawn_one<R: Rng>(&mut self, now: f64, rng: &mut R) -> Option<Cloud> {
        let params = CloudParams::random(&self.cfg, rng);
        self.insert(now, params)
    }

    /// What the repeating spawn trigger does on each firing.
    pub fn tick<R: Rng>(&mut self, now: f64, rng: &mut R) -> Option<Cloud> {
        self.spawn_one(now, rng)
    }

    /// Insert a cloud with explicit parameters. Returns `None` after shutdown.
    pub fn insert(&mut self, now: f64, params: CloudParams) -> Option<Cloud> {
        if self.timers.is_closed() {
            return None;
        }
        let id = CloudId(self.next_id);
        let floor = self.cfg.min_lifetime_s;
        let lifetime_s = match remaining_lifetime(params.delay, params.duration, floor) {
            s if s.is_finite() && s > 0.0 => s,
            // Hand-built params, e.g. a zero duration with zero delay.
            _ => floor,
        };
        let lifetime_ms = lifetime_s * 1000.0;
        self.timers.after(now, lifetime_ms, CloudTimer::Expire(id))?;
        self.next_id += 1;
        let cloud = Cloud {
            id,
            params,
            expires_at_ms: now + lifetime_ms,
        };
        self.clouds.push(cloud.clone());
        self.spawned += 1;
        Some(cloud)
    }

    /// Drop a cloud by id. Removing an absent cloud is not an error.
    pub fn remove(&mut self, id: CloudId) -> bool {
        let Some(idx) = self.clouds.iter().position(|c| c.id == id) else {
            return false;
        };
        self.clouds.remove(idx);
        self.removed += 1;
        true
    }

    /// Fire every timer due at `now`, in deadline order.
    pub fn advance<R: Rng>(&mut self, now: f64, rng: &mut R) -> Vec<CloudChange> {
        let mut changes = Vec::new();
        for timer in self.timers.fire_due(now) {
            match timer {
                CloudTimer::Spawn => {
                    if let Some(c) = self.tick(now, rng) {
                        changes.push(CloudChange::Spawned(c));
                    }
                }
                CloudTimer::Expire(id) => {
                    if self.remove(id) {
                        changes.push(CloudChange::Removed(id));
                    }
                }
            }
        }
        changes
    }

    /// Cancel the spawn trigger and every pending expiry. The active set is left
    /// as it was; nothing will touch it again.
    pub fn shutdown(&mut self) {
        self.timers.cancel_all();
        self.spawn_timer = None;
    }

    pub fn is_shut_down(&self) -> bool {
        self.timers.is_closed()
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned
    }

    pub fn removed_total(&self) -> u64 {
        self.removed
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }
}
