//! Bounded, blocking, multi-producer/multi-consumer FIFO queue
//!
//! The queue holds at most `capacity` items. Producers block while it is
//! full, consumers block while it is empty, and [`BoundedQueue::shutdown`]
//! releases every waiter at once. Items buffered before shutdown are still
//! handed out by [`BoundedQueue::dequeue`] until the queue is drained.

use super::error::{LoggerError, Result};
use log::trace;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Error returned by the non-blocking and timed enqueue operations
///
/// The rejected item is handed back to the caller in both cases.
#[derive(PartialEq, Eq, Clone, Copy)]
pub enum TryEnqueueError<T> {
    /// The queue stayed full
    Full(T),
    /// The queue has been shut down
    Closed(T),
}

impl<T> TryEnqueueError<T> {
    /// Recover the rejected item
    pub fn into_inner(self) -> T {
        match self {
            TryEnqueueError::Full(item) | TryEnqueueError::Closed(item) => item,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, TryEnqueueError::Full(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, TryEnqueueError::Closed(_))
    }
}

impl<T> fmt::Debug for TryEnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryEnqueueError::Full(_) => "Full(..)".fmt(f),
            TryEnqueueError::Closed(_) => "Closed(..)".fmt(f),
        }
    }
}

impl<T> fmt::Display for TryEnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryEnqueueError::Full(_) => "enqueueing on a full queue".fmt(f),
            TryEnqueueError::Closed(_) => "enqueueing on a closed queue".fmt(f),
        }
    }
}

impl<T> std::error::Error for TryEnqueueError<T> {}

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// A fixed-capacity FIFO shared between any number of producer and consumer
/// threads
///
/// Both conditions are guarded by the same mutex. Producers wait on
/// `not_full`, consumers on `not_empty`, and every wait re-checks its
/// predicate after waking.
///
/// # Example
///
/// ```
/// use blocking_log_sink::BoundedQueue;
///
/// let queue = BoundedQueue::new(2).unwrap();
/// assert!(queue.enqueue("first"));
/// assert!(queue.enqueue("second"));
///
/// queue.shutdown();
/// assert!(!queue.enqueue("rejected"));
///
/// assert_eq!(queue.dequeue(), Some("first"));
/// assert_eq!(queue.dequeue(), Some("second"));
/// assert_eq!(queue.dequeue(), None);
/// ```
pub struct BoundedQueue<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items
    ///
    /// A zero capacity is rejected: no item could ever be admitted and every
    /// producer would block until shutdown.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(LoggerError::config(
                "BoundedQueue",
                "capacity must be positive, got 0",
            ));
        }

        Ok(Self {
            state: Mutex::new(State {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        })
    }

    /// Append `item` at the tail, blocking while the queue is full
    ///
    /// Returns `false` when the queue is (or becomes, while waiting) closed;
    /// the item is then discarded. A full queue is never an error, the caller
    /// simply waits for a consumer.
    pub fn enqueue(&self, item: T) -> bool {
        self.enqueue_until(item, None).is_ok()
    }

    /// Like [`enqueue`](Self::enqueue), but gives up after `timeout`
    pub fn enqueue_timeout(
        &self,
        item: T,
        timeout: Duration,
    ) -> std::result::Result<(), TryEnqueueError<T>> {
        // A deadline past the end of time degrades to an unbounded wait
        self.enqueue_until(item, Instant::now().checked_add(timeout))
    }

    /// Append `item` without blocking
    pub fn try_enqueue(&self, item: T) -> std::result::Result<(), TryEnqueueError<T>> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(TryEnqueueError::Closed(item));
        }
        if state.items.len() >= self.capacity {
            return Err(TryEnqueueError::Full(item));
        }

        state.items.push_back(item);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Append `item` without blocking, evicting the head when full
    ///
    /// Returns the evicted item, if any. A closed queue hands `item` back as
    /// `Err`.
    pub fn enqueue_evicting(&self, item: T) -> std::result::Result<Option<T>, T> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(item);
        }

        let evicted = if state.items.len() >= self.capacity {
            state.items.pop_front()
        } else {
            None
        };
        state.items.push_back(item);
        drop(state);
        self.not_empty.notify_one();
        Ok(evicted)
    }

    fn enqueue_until(
        &self,
        item: T,
        deadline: Option<Instant>,
    ) -> std::result::Result<(), TryEnqueueError<T>> {
        let mut state = self.state.lock();
        while state.items.len() >= self.capacity && !state.closed {
            trace!("queue full ({}), producer waiting", self.capacity);
            match deadline {
                None => self.not_full.wait(&mut state),
                Some(deadline) => {
                    if self.not_full.wait_until(&mut state, deadline).timed_out() {
                        break;
                    }
                }
            }
        }

        if state.closed {
            return Err(TryEnqueueError::Closed(item));
        }
        if state.items.len() >= self.capacity {
            return Err(TryEnqueueError::Full(item));
        }

        state.items.push_back(item);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove the head item, blocking while the queue is empty and open
    ///
    /// Buffered items are returned even after shutdown. `None` means the
    /// queue is both closed and drained, and stays that way.
    pub fn dequeue(&self) -> Option<T> {
        self.dequeue_until(None)
    }

    /// Like [`dequeue`](Self::dequeue), but gives up after `timeout`
    pub fn dequeue_timeout(&self, timeout: Duration) -> Option<T> {
        self.dequeue_until(Instant::now().checked_add(timeout))
    }

    /// Remove the head item without blocking
    pub fn try_dequeue(&self) -> Option<T> {
        let item = self.state.lock().items.pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    fn dequeue_until(&self, deadline: Option<Instant>) -> Option<T> {
        let mut state = self.state.lock();
        while state.items.is_empty() && !state.closed {
            trace!("queue empty, consumer waiting");
            match deadline {
                None => self.not_empty.wait(&mut state),
                Some(deadline) => {
                    if self.not_empty.wait_until(&mut state, deadline).timed_out() {
                        break;
                    }
                }
            }
        }

        let item = state.items.pop_front();
        drop(state);
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Close the queue and wake every waiting producer and consumer
    ///
    /// Calling this more than once is harmless.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        drop(state);

        let consumers = self.not_empty.notify_all();
        let producers = self.not_full.notify_all();
        trace!(
            "queue closed, woke {} consumer(s) and {} producer(s)",
            consumers,
            producers
        );
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.state.lock().items.len() >= self.capacity
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity)
            .field("len", &state.items.len())
            .field("closed", &state.closed)
            .finish()
    }
}
