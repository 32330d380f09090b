//! View Scope
//!
//! Cancellation token for async work started by a view. Results that
//! arrive after the view is gone are discarded instead of written into
//! disposed signals. `GuardSlot` holds at most one resource guard for a
//! view and releases the old one before a replacement is opened.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use leptos::prelude::on_cleanup;

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token cancelled when the current reactive owner is cleaned up
    pub fn for_view() -> Self {
        let token = Self::new();
        let handle = token.clone();
        on_cleanup(move || handle.cancel());
        token
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `value` if the view is still alive
    pub fn guard<T>(&self, value: T) -> Option<T> {
        if self.is_cancelled() {
            None
        } else {
            Some(value)
        }
    }
}

/// Single owned guard, released on replace or on demand
#[derive(Debug)]
pub struct GuardSlot<T> {
    current: Option<T>,
}

impl<T> Default for GuardSlot<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T> GuardSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.current.is_some()
    }

    /// Drop the held guard, if any
    pub fn release(&mut self) {
        self.current = None;
    }

    /// Release the held guard, then open and hold a new one. On error the
    /// slot stays empty.
    pub fn acquire<E>(&mut self, open: impl FnOnce() -> Result<T, E>) -> Result<(), E> {
        self.release();
        self.current = Some(open()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let view_copy = token.clone();
        assert_eq!(view_copy.guard(3), Some(3));

        token.cancel();
        assert!(view_copy.is_cancelled());
        assert_eq!(view_copy.guard(3), None);
    }

    #[tokio::test]
    async fn test_late_result_is_discarded() {
        use crate::api::memory::MemoryBackend;
        use crate::api::TaskApi;

        let backend = MemoryBackend::new();
        backend.seed_task("p-1", "Draft spec", crate::models::TaskStatus::Todo);
        let token = CancelToken::new();

        let pending = backend.list_tasks("p-1");
        token.cancel();
        let result = pending.await.unwrap();
        assert_eq!(token.guard(result), None);
    }

    struct Recorded {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Drop for Recorded {
        fn drop(&mut self) {
            self.log.borrow_mut().push(format!("release {}", self.name));
        }
    }

    fn opener(
        name: &'static str,
        log: &Rc<RefCell<Vec<String>>>,
    ) -> impl FnOnce() -> Result<Recorded, String> {
        let log = log.clone();
        move || {
            log.borrow_mut().push(format!("open {}", name));
            Ok(Recorded { name, log })
        }
    }

    #[test]
    fn test_slot_releases_before_opening_next() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slot = GuardSlot::new();

        slot.acquire(opener("p-1", &log)).unwrap();
        slot.acquire(opener("p-2", &log)).unwrap();
        assert!(slot.is_held());
        assert_eq!(*log.borrow(), vec!["open p-1", "release p-1", "open p-2"]);

        // View teardown
        slot.release();
        assert!(!slot.is_held());
        assert_eq!(log.borrow().last().map(String::as_str), Some("release p-2"));
    }

    #[test]
    fn test_failed_open_leaves_slot_empty() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slot = GuardSlot::new();
        slot.acquire(opener("p-1", &log)).unwrap();

        let failed = slot.acquire(|| Err::<Recorded, _>("socket refused".to_string()));
        assert_eq!(failed, Err("socket refused".to_string()));
        assert!(!slot.is_held());
        assert_eq!(*log.borrow(), vec!["open p-1", "release p-1"]);
    }

    #[test]
    fn test_dropping_slot_releases_guard() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut slot = GuardSlot::new();
            slot.acquire(opener("p-1", &log)).unwrap();
        }
        assert_eq!(*log.borrow(), vec!["open p-1", "release p-1"]);
    }
}
