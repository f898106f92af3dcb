//! Cooperative single-threaded timers.
//!
//! Engines never sleep or spawn. They ask a `TimerFacility` to deliver a
//! target back to them after a delay and keep the returned handle so the
//! registration can be withdrawn. `TimerQueue` is the only implementation:
//! it runs on a virtual millisecond clock that the host advances, either
//! from wall-clock time in the terminal loop or by hand in tests.

use std::collections::{BTreeMap, HashMap};

/// Identifies one scheduled callback. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// "Call me back after `delay_ms`" capability injected into the engines.
pub trait TimerFacility<T> {
    /// Schedule `target` to fire `delay_ms` after the facility's current time.
    fn after(&mut self, delay_ms: u64, target: T) -> TimerHandle;

    /// Withdraw a pending registration. Returns `false` if it already fired
    /// or was cancelled before.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

/// Virtual-clock timer queue.
///
/// Timers fire in `(due time, scheduling order)` order, so two timers due at
/// the same instant fire in the order they were armed.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now_ms: u64,
    next_id: u64,
    pending: BTreeMap<(u64, u64), T>,
    due_by_id: HashMap<u64, u64>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        TimerQueue {
            now_ms: 0,
            next_id: 0,
            pending: BTreeMap::new(),
            due_by_id: HashMap::new(),
        }
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.due_by_id.contains_key(&handle.0)
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&self) -> Option<u64> {
        self.pending.keys().next().map(|&(due, _)| due)
    }

    /// Remove and return the earliest timer due at or before `until_ms`,
    /// moving the clock to its due time. Returns `None` (and moves the clock
    /// to `until_ms`) once nothing else is due.
    ///
    /// Timers armed while handling a popped timer are visible to the next
    /// call, so a host loop draining with this method processes
    /// re-armed ticks that fall inside the same window.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerHandle, T)> {
        match self.pending.keys().next().copied() {
            Some((due, id)) if due <= until_ms => {
                let target = self.pending.remove(&(due, id))?;
                self.due_by_id.remove(&id);
                self.now_ms = self.now_ms.max(due);
                Some((TimerHandle(id), target))
            }
            _ => {
                self.now_ms = self.now_ms.max(until_ms);
                None
            }
        }
    }
}

impl<T> TimerFacility<T> for TimerQueue<T> {
    fn after(&mut self, delay_ms: u64, target: T) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        let due = self.now_ms.saturating_add(delay_ms);
        self.pending.insert((due, id), target);
        self.due_by_id.insert(id, due);
        TimerHandle(id)
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.due_by_id.remove(&handle.0) {
            Some(due) => self.pending.remove(&(due, handle.0)).is_some(),
            None => false,
        }
    }
}
