use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Single-flight guard for read fetches.
///
/// While one fetch holds a ticket, `try_begin` returns `None` and the
/// duplicate request is dropped rather than queued.
#[derive(Debug, Clone, Default)]
pub struct FetchGuard {
    busy: Arc<AtomicBool>,
}

/// Held for the duration of one fetch; releases the guard on drop
#[derive(Debug)]
pub struct FetchTicket {
    busy: Arc<AtomicBool>,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self) -> Option<FetchTicket> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FetchTicket {
                busy: self.busy.clone(),
            })
    }

    pub fn is_fetching(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for FetchTicket {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_fetch_is_dropped_until_first_ends() {
        let guard = FetchGuard::new();
        let first = guard.try_begin();
        assert!(first.is_some());
        assert!(guard.is_fetching());
        assert!(guard.try_begin().is_none());

        drop(first);
        assert!(!guard.is_fetching());
        assert!(guard.try_begin().is_some());
    }

    #[test]
    fn clones_share_state() {
        let guard = FetchGuard::new();
        let other = guard.clone();
        let _ticket = guard.try_begin().unwrap();
        assert!(other.try_begin().is_none());
    }
}
