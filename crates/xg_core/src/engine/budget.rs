use crate::models::StopReason;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Run budget for a batch of trials.
///
/// Checked between trials only, so a stopped run never leaves a half-played
/// trial behind. Clones share the cancellation flag.
#[derive(Debug, Clone)]
pub struct TrialBudget {
    start_time: Instant,
    max_wall_ms: Option<u64>,
    cancelled: Arc<AtomicBool>,
}

impl Default for TrialBudget {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl TrialBudget {
    /// No time limit; stops only when cancelled
    pub fn unlimited() -> Self {
        Self { start_time: Instant::now(), max_wall_ms: None, cancelled: Arc::new(AtomicBool::new(false)) }
    }

    /// Stop once `max_wall_ms` of wall clock time has passed
    pub fn with_timeout(max_wall_ms: u64) -> Self {
        Self { max_wall_ms: Some(max_wall_ms), ..Self::unlimited() }
    }

    /// Reset the budget timer (for reuse). Does not clear cancellation.
    pub fn reset(&mut self) {
        self.start_time = Instant::now();
    }

    /// Request a cooperative stop. Trials already running finish first.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Handle another thread can use to cancel this budget
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Check if wall clock time exceeded
    #[inline]
    pub fn is_timeout(&self) -> bool {
        match self.max_wall_ms {
            Some(ms) => self.start_time.elapsed() >= Duration::from_millis(ms),
            None => false,
        }
    }

    /// Why the run must stop before the next trial, if it must
    #[inline]
    pub fn check(&self) -> Option<StopReason> {
        if self.is_cancelled() {
            Some(StopReason::Cancelled)
        } else if self.is_timeout() {
            Some(StopReason::TimedOut)
        } else {
            None
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }
}
