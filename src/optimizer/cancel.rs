//! Cooperative cancellation and wall-clock deadlines

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared flag a caller flips to stop a running optimization.
///
/// Checked between raster cells; the run then returns everything committed
/// so far.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Why a run was stopped from outside the search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    Cancelled,
    DeadlineExceeded,
}

/// Cancellation token plus optional deadline, polled by the placer
#[derive(Debug, Clone)]
pub struct RunGuard {
    token: CancellationToken,
    started: Instant,
    deadline: Option<Instant>,
}

impl RunGuard {
    /// `time_limit_ms == 0` means no deadline
    pub fn new(token: CancellationToken, time_limit_ms: u64) -> Self {
        let started = Instant::now();
        let deadline = (time_limit_ms > 0).then(|| started + Duration::from_millis(time_limit_ms));
        Self {
            token,
            started,
            deadline,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(CancellationToken::new(), 0)
    }

    pub fn check(&self) -> Option<Interruption> {
        if self.token.is_cancelled() {
            return Some(Interruption::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Interruption::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_clones_share_flag() {
        let token = CancellationToken::new();
        let guard = RunGuard::new(token.clone(), 0);
        assert_eq!(guard.check(), None);
        token.cancel();
        assert_eq!(guard.check(), Some(Interruption::Cancelled));
    }

    #[test]
    fn test_deadline_expires() {
        let guard = RunGuard::new(CancellationToken::new(), 1);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(guard.check(), Some(Interruption::DeadlineExceeded));
    }

    #[test]
    fn test_unbounded_never_interrupts() {
        assert_eq!(RunGuard::unbounded().check(), None);
    }
}
