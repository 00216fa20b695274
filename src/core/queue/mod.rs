use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Blocking mailbox: `send` never blocks, `receive` waits until a value exists.
///
/// Values are delivered first-in first-out and each value goes to exactly one
/// receiver.
pub struct MessageQueue<T> {
    items: Mutex<VecDeque<T>>,
    not_empty: Condvar,
}

impl<T> MessageQueue<T> {
    /// Create a new, empty queue
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
        }
    }

    // every mutation is a single push or pop, so a panicking holder can't
    // leave the store half-written
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a value and wake one waiting receiver
    pub fn send(&self, value: T) {
        let mut items = self.lock();
        items.push_back(value);
        // --post operation assertion
        debug_assert!(!items.is_empty(), "Queue must have at least one item after send");
        drop(items);
        self.not_empty.notify_one();
    }

    /// Block until a value is available, then move it out of the queue.
    pub fn receive(&self) -> T {
        let mut items = self
            .not_empty
            .wait_while(self.lock(), |items| items.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        Self::take_front(&mut items)
    }

    /// Like [`receive`](Self::receive) but gives up after `timeout`.
    pub fn receive_timeout(&self, timeout: Duration) -> Option<T> {
        let (mut items, _) = self
            .not_empty
            .wait_timeout_while(self.lock(), timeout, |items| items.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        if items.is_empty() {
            return None;
        }
        Some(Self::take_front(&mut items))
    }

    /// Take a value if one is queued, without waiting
    pub fn try_receive(&self) -> Option<T> {
        self.lock().pop_front()
    }

    fn take_front(items: &mut VecDeque<T>) -> T {
        let len_before = items.len();
        let Some(value) = items.pop_front() else {
            unreachable!("wait predicate guarantees a queued value");
        };
        // -- post op assertion: queue size decreases by exactly one
        debug_assert_eq!(items.len(), len_before - 1, "Queue length should decrease by 1");
        value
    }

    /// Number of values waiting to be received
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<T> Default for MessageQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Queue shared between a producer and its consumers
pub type SharedQueue<T> = Arc<MessageQueue<T>>;
