//! Cancellation scope shared by every task of one engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::CalibrationError;

/// Handle observed by a running task.
///
/// `generation` is the store generation the task was submitted under; the
/// store refuses writes from any other generation.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    generation: u64,
}

impl CancelToken {
    /// Fresh token bound to store generation 0.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn for_generation(generation: u64) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            generation,
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `Err(Cancelled)` once the token has been tripped.
    pub fn check(&self) -> Result<(), CalibrationError> {
        if self.is_cancelled() {
            Err(CalibrationError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct CancelScope {
    current: Mutex<CancelToken>,
}

impl CancelScope {
    pub(crate) fn token(&self) -> CancelToken {
        self.current.lock().clone()
    }

    /// Trip the current token and install the one returned by `renew`, while
    /// holding the scope lock so no task can pick up a stale token.
    pub(crate) fn cancel_all(&self, renew: impl FnOnce() -> CancelToken) {
        let mut current = self.current.lock();
        current.cancel();
        *current = renew();
    }

    pub(crate) fn cancel_current(&self) {
        self.current.lock().cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_all_trips_outstanding_tokens() {
        let scope = CancelScope::default();
        let before = scope.token();
        assert!(before.check().is_ok());

        scope.cancel_all(|| CancelToken::for_generation(1));
        assert!(before.is_cancelled());
        assert_eq!(before.check(), Err(CalibrationError::Cancelled));

        let after = scope.token();
        assert!(!after.is_cancelled());
        assert_eq!(after.generation(), 1);
    }

    #[test]
    fn clones_share_the_flag() {
        let t = CancelToken::new();
        let c = t.clone();
        c.cancel();
        assert!(t.is_cancelled());
    }
}
