//! Overflow policies for a full sink queue
//!
//! The default is back-pressure: the submitting thread waits for the worker
//! to make room. The other variants trade completeness for latency and must
//! be opted into explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Policy for handling a full queue on submit
///
/// # Example
///
/// ```
/// use blocking_log_sink::OverflowPolicy;
/// use std::time::Duration;
///
/// // Default behavior: wait for room
/// let policy = OverflowPolicy::default();
/// assert!(policy.is_blocking());
///
/// // Wait a bounded time, then drop
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// assert!(policy.is_lossy());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Block until space is available or the sink shuts down
    ///
    /// No accepted line is ever lost.
    #[default]
    Block,

    /// Block with timeout, then drop
    BlockWithTimeout(Duration),

    /// Drop the new line when the queue is full
    DropNewest,

    /// Evict the oldest buffered line to make room for the new one
    DropOldest,

    /// Drop the new line and alert via the `log` facade and the overflow
    /// callback
    AlertAndDrop,
}

impl OverflowPolicy {
    /// Whether a submit under this policy may wait for room
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            OverflowPolicy::Block | OverflowPolicy::BlockWithTimeout(_)
        )
    }

    /// Whether this policy may discard lines while the sink is open
    pub fn is_lossy(&self) -> bool {
        !matches!(self, OverflowPolicy::Block)
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::DropOldest => write!(f, "DropOldest"),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
        }
    }
}

/// Callback type for overflow notifications
///
/// Called when lines are dropped due to queue overflow.
/// The parameter is the total count of dropped lines so far.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;
