//! Virtual timers for the stage.
//!
//! Timers are plain data owned by whoever schedules them. The frame loop pumps
//! them with `performance.now()` via [`Scheduler::fire_due`]; nothing here talks
//! to the browser, so the whole lifecycle runs under native `cargo test`.
//! Dropping (or closing) a scheduler releases every pending timer at once.

/// Handle returned when a timer is armed; used to cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Entry<E> {
    id: TimerId,
    due_ms: f64,
    period_ms: Option<f64>, // Some(..) for repeating timers
    event: E,
}

pub struct Scheduler<E> {
    next_id: u64,
    entries: Vec<Entry<E>>,
    closed: bool,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
            closed: false,
        }
    }

    /// One-shot timer firing `delay_ms` after `now`. Returns `None` once closed.
    pub fn after(&mut self, now: f64, delay_ms: f64, event: E) -> Option<TimerId> {
        self.arm(now + delay_ms.max(0.0), None, event)
    }

    /// Repeating timer. The first firing is one full period after `now`.
    pub fn every(&mut self, now: f64, period_ms: f64, event: E) -> Option<TimerId> {
        // A zero period would spin forever inside fire_due.
        let period = period_ms.max(1.0);
        self.arm(now + period, Some(period), event)
    }

    fn arm(&mut self, due_ms: f64, period_ms: Option<f64>, event: E) -> Option<TimerId> {
        if self.closed {
            return None;
        }
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due_ms,
            period_ms,
            event,
        });
        Some(id)
    }

    /// Cancel a single timer. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel every pending timer and refuse new ones.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn next_due(&self) -> Option<f64> {
        self.entries.iter().map(|e| e.due_ms).reduce(f64::min)
    }
}

impl<E: Clone> Scheduler<E> {
    /// Collect every event whose deadline is `<= now`, earliest first (ties by
    /// arming order). One-shot timers are consumed; repeating timers fire once
    /// per call even if several periods were missed, then re-arm on their grid.
    pub fn fire_due(&mut self, now: f64) -> Vec<E> {
        if self.closed {
            return Vec::new();
        }
        let mut due: Vec<(f64, TimerId, E)> = Vec::new();
        self.entries.retain_mut(|entry| {
            if entry.due_ms > now {
                return true;
            }
            due.push((entry.due_ms, entry.id, entry.event.clone()));
            match entry.period_ms {
                Some(period) => {
                    let mut next = entry.due_ms + period;
                    while next <= now {
                        next += period;
                    }
                    entry.due_ms = next;
                    true
                }
                None => false,
            }
        });
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        due.into_iter().map(|(_, _, ev)| ev).collect()
    }
}
