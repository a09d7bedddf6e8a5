//! Sink configuration
//!
//! [`SinkConfig`] is plain data: it can be built in code through
//! [`SinkBuilder`](super::sink::SinkBuilder) or loaded from JSON.

use super::error::{LoggerError, Result};
use super::overflow_policy::OverflowPolicy;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default queue capacity
pub const DEFAULT_CAPACITY: usize = 10;

/// Default name of the worker thread
pub const DEFAULT_THREAD_NAME: &str = "async-sink";

/// When the worker flushes its destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlushPolicy {
    /// Flush whenever the queue runs dry, and at shutdown
    #[default]
    Idle,
    /// Flush after every line
    EveryLine,
}

impl fmt::Display for FlushPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlushPolicy::Idle => write!(f, "Idle"),
            FlushPolicy::EveryLine => write!(f, "EveryLine"),
        }
    }
}

/// Configuration for an [`AsyncSink`](super::sink::AsyncSink)
///
/// # Example
///
/// ```
/// use blocking_log_sink::{FlushPolicy, OverflowPolicy, SinkConfig};
///
/// let config = SinkConfig::from_json_str(
///     r#"{ "capacity": 256, "flush_policy": "EveryLine" }"#,
/// ).unwrap();
///
/// assert_eq!(config.capacity, 256);
/// assert_eq!(config.flush_policy, FlushPolicy::EveryLine);
/// assert_eq!(config.overflow_policy, OverflowPolicy::Block);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Maximum number of lines buffered between submitters and the worker
    pub capacity: usize,
    pub overflow_policy: OverflowPolicy,
    pub flush_policy: FlushPolicy,
    /// Prefix each line with its submission time
    pub timestamp: Option<TimestampFormat>,
    pub thread_name: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
            flush_policy: FlushPolicy::default(),
            timestamp: None,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl SinkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON; absent fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SinkConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading sink configuration",
                path.display().to_string(),
                e,
            )
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(LoggerError::config(
                "SinkConfig",
                "capacity must be positive, got 0",
            ));
        }
        if self.thread_name.contains('\0') {
            return Err(LoggerError::config(
                "SinkConfig",
                "thread_name must not contain NUL bytes",
            ));
        }
        if let Some(ref format) = self.timestamp {
            format.validate()?;
        }
        Ok(())
    }
}
