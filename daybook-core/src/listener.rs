//! Observers of calendar mutations.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use crate::event::Event;

pub type ListenerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Receives an event after it was added to or modified in a calendar.
///
/// Both callbacks default to doing nothing. There is no removal callback.
pub trait CalendarListener: Send + Sync {
    fn on_event_added(&self, _event: &Event) -> ListenerResult {
        Ok(())
    }

    fn on_event_modified(&self, _event: &Event) -> ListenerResult {
        Ok(())
    }
}

/// Registration-ordered listener list.
///
/// Registration may happen from another thread while a notification runs:
/// each notification iterates over a snapshot of the list.
#[derive(Default)]
pub struct Listeners {
    inner: Mutex<Vec<Arc<dyn CalendarListener>>>,
}

impl Listeners {
    /// Registering the same listener twice is a no-op.
    pub fn add(&self, listener: Arc<dyn CalendarListener>) {
        let mut listeners = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if !listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            listeners.push(listener);
        }
    }

    /// Removing a listener that was never registered is a no-op.
    pub fn remove(&self, listener: &Arc<dyn CalendarListener>) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|l| !Arc::ptr_eq(l, listener));
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn announce_added(&self, event: &Event) {
        self.deliver(event, |listener| listener.on_event_added(event));
    }

    pub(crate) fn announce_modified(&self, event: &Event) {
        self.deliver(event, |listener| listener.on_event_modified(event));
    }

    /// Call every listener in registration order. A listener that fails or
    /// panics is logged; the rest still run.
    fn deliver<F>(&self, event: &Event, notify: F)
    where
        F: Fn(&dyn CalendarListener) -> ListenerResult,
    {
        for listener in self.snapshot() {
            match panic::catch_unwind(AssertUnwindSafe(|| notify(listener.as_ref()))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(subject = event.subject(), "Listener notification failed: {e}");
                }
                Err(_) => {
                    tracing::warn!(subject = event.subject(), "Listener panicked during notification");
                }
            }
        }
    }

    fn snapshot(&self) -> Vec<Arc<dyn CalendarListener>> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
