//! Cooperative time control.
//!
//! A one-shot deadline armed per search. A background timer flips an
//! atomic flag at the deadline; the search polls the flag at its
//! suspension points and winds down on its own. There is no preemption
//! and no mutex: the flag is the only cross-thread state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

/// Shared deadline flag. Clones refer to the same underlying flag, so a
/// protocol-side handle can trip a search armed elsewhere.
#[derive(Clone)]
pub struct TimeControl {
    expired: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
}

impl TimeControl {
    pub fn new() -> Self {
        TimeControl {
            expired: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Schedule a one-shot deadline `budget` from now. Any previously
    /// armed timer is superseded: its generation no longer matches, so
    /// it expires without touching the flag.
    pub fn arm(&self, budget: Duration) {
        let armed = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.expired.store(false, Ordering::SeqCst);

        let expired = Arc::clone(&self.expired);
        let generation = Arc::clone(&self.generation);
        thread::spawn(move || {
            thread::sleep(budget);
            if generation.load(Ordering::SeqCst) == armed {
                expired.store(true, Ordering::SeqCst);
            }
        });
    }

    /// Trip the flag immediately (the `stop` command).
    pub fn trip(&self) {
        self.expired.store(true, Ordering::SeqCst);
    }

    /// Non-blocking poll.
    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::Relaxed)
    }

    /// Clear the flag for a new search and invalidate outstanding timers.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.expired.store(false, Ordering::SeqCst);
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new()
    }
}
