use portable_atomic::{AtomicBool, Ordering};

/// Holds the in-progress flag of a read cycle and releases it when dropped.
pub(crate) struct ReadGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ReadGuard<'a> {
    /// Sets the flag, or returns `None` if a read is already in flight.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_until_release() {
        let flag = AtomicBool::new(false);

        let guard = ReadGuard::acquire(&flag);
        assert!(guard.is_some());
        assert!(flag.load(Ordering::Relaxed));
        assert!(ReadGuard::acquire(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::Relaxed));
        assert!(ReadGuard::acquire(&flag).is_some());
        assert!(!flag.load(Ordering::Relaxed));
    }
}
