//! Wall-clock run timing and best-time persistence

use obby_runtime::{KeyValueStore, TimeSource};

/// Namespace used when a course does not declare its own
pub const DEFAULT_NAMESPACE: &str = "connectus.obby";

/// Shown when no best time has been recorded
pub const BEST_TIME_PLACEHOLDER: &str = "--:--";

/// Format milliseconds as zero-padded `mm:ss`. Minutes are not capped.
pub fn format_time(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// The persisted best time for one course namespace.
///
/// The value is read once on open. Store failures and unparseable values both
/// mean "no best"; nothing here returns an error to the caller.
pub struct BestTimeStore {
    store: Box<dyn KeyValueStore>,
    key: String,
    best_ms: Option<u64>,
}

impl BestTimeStore {
    pub fn open(store: Box<dyn KeyValueStore>, namespace: &str) -> Self {
        let key = Self::key_for(namespace);
        let best_ms = match store.get(&key) {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(ms) => Some(ms),
                Err(_) => {
                    tracing::warn!("ignoring unreadable best time {:?} at {}", raw, key);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("best time unavailable: {}", e);
                None
            }
        };
        Self { store, key, best_ms }
    }

    /// Store key holding the best time for courses in `namespace`
    pub fn key_for(namespace: &str) -> String {
        format!("{}.bestTime", namespace)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn best_ms(&self) -> Option<u64> {
        self.best_ms
    }

    /// Record a completed run. Writes only when strictly faster than the
    /// current best; returns whether it was.
    pub fn record(&mut self, elapsed_ms: u64) -> bool {
        if matches!(self.best_ms, Some(best) if elapsed_ms >= best) {
            return false;
        }
        self.best_ms = Some(elapsed_ms);
        if let Err(e) = self.store.set(&self.key, &elapsed_ms.to_string()) {
            tracing::warn!("could not persist best time: {}", e);
        }
        true
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}

/// Elapsed time of the current run plus the durable best.
pub struct RunTimer {
    clock: Box<dyn TimeSource>,
    start_ms: u64,
    stopped_elapsed: Option<u64>,
    best: BestTimeStore,
}

impl RunTimer {
    /// Create a timer that is already running
    pub fn new(clock: Box<dyn TimeSource>, best: BestTimeStore) -> Self {
        let start_ms = clock.now_ms();
        Self {
            clock,
            start_ms,
            stopped_elapsed: None,
            best,
        }
    }

    /// New start timestamp, elapsed back to zero. The best is untouched.
    pub fn restart(&mut self) {
        self.start_ms = self.clock.now_ms();
        self.stopped_elapsed = None;
    }

    /// Freeze elapsed time. Returns the frozen value.
    pub fn stop(&mut self) -> u64 {
        let elapsed = self.elapsed_ms();
        self.stopped_elapsed = Some(elapsed);
        elapsed
    }

    pub fn is_running(&self) -> bool {
        self.stopped_elapsed.is_none()
    }

    pub fn elapsed_ms(&self) -> u64 {
        match self.stopped_elapsed {
            Some(ms) => ms,
            None => self.clock.now_ms().saturating_sub(self.start_ms),
        }
    }

    /// Stop the run and offer its time as a new best. Returns the elapsed time
    /// and whether it beat the best, or `None` if the timer was already stopped.
    pub fn complete(&mut self) -> Option<(u64, bool)> {
        if !self.is_running() {
            return None;
        }
        let elapsed = self.stop();
        let new_best = self.best.record(elapsed);
        if new_best {
            tracing::info!("new best time: {}", format_time(elapsed));
        }
        Some((elapsed, new_best))
    }

    pub fn best_ms(&self) -> Option<u64> {
        self.best.best_ms()
    }

    pub fn elapsed_formatted(&self) -> String {
        format_time(self.elapsed_ms())
    }

    pub fn best_formatted(&self) -> String {
        match self.best.best_ms() {
            Some(ms) => format_time(ms),
            None => BEST_TIME_PLACEHOLDER.to_string(),
        }
    }

    pub fn best_store(&self) -> &BestTimeStore {
        &self.best
    }
}
