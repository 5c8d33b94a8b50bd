//! Cancellable one-shot timers polled from the frame loop.
//!
//! Timers never call back on their own. The owner polls with the current
//! time and receives the payloads that came due.

use foundation::time::Time;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    handle: TimerHandle,
    due: Time,
    payload: T,
}

#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn schedule(&mut self, due: Time, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            handle,
            due,
            payload,
        });
        handle
    }

    /// Cancel a pending timer. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        let cancelled = self.entries.len() != before;
        if cancelled {
            tracing::debug!(handle = handle.0, pending = self.entries.len(), "timer cancelled");
        }
        cancelled
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove and return every timer due at or before `now`.
    ///
    /// Ordering: `(due, schedule order)`.
    pub fn poll(&mut self, now: Time) -> Vec<(TimerHandle, T)> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.due <= now);
        self.entries = pending;
        due.sort_by(|a, b| {
            a.due
                .0
                .total_cmp(&b.due.0)
                .then_with(|| a.handle.cmp(&b.handle))
        });
        due.into_iter().map(|e| (e.handle, e.payload)).collect()
    }
}
