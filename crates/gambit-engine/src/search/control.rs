//! Search control: deadline and optional external stop flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Nodes between clock reads.
const CHECK_INTERVAL: u64 = 2048;

/// Decides when a running search must unwind.
///
/// The clock is read only every [`CHECK_INTERVAL`] nodes. Once the
/// deadline passes or the external flag is raised the control latches
/// into the stopped state and every later query answers `true` at once.
#[derive(Debug)]
pub struct SearchControl {
    start: Instant,
    deadline: Option<Instant>,
    external: Option<Arc<AtomicBool>>,
    stopped: bool,
}

impl SearchControl {
    /// Start the clock now; `budget` of `None` means no time limit.
    pub fn new(budget: Option<Duration>, external: Option<Arc<AtomicBool>>) -> Self {
        let start = Instant::now();
        Self {
            start,
            deadline: budget.map(|b| start + b),
            external,
            stopped: false,
        }
    }

    /// Called once per node with the running node count.
    #[inline]
    pub fn should_stop(&mut self, nodes: u64) -> bool {
        if self.stopped {
            return true;
        }
        if nodes % CHECK_INTERVAL != 0 {
            return false;
        }
        self.poll()
    }

    /// Check the clock and the flag regardless of the node count.
    pub fn poll(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        let flagged = self
            .external
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        self.stopped = flagged || expired;
        self.stopped
    }

    /// Whether the search has been cut off.
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
