//! Core queue and sink types

pub mod config;
pub mod destination;
pub mod error;
pub mod metrics;
pub mod overflow_policy;
pub mod queue;
pub mod sink;
pub mod template;
pub mod timestamp;

pub use config::{FlushPolicy, SinkConfig, DEFAULT_CAPACITY, DEFAULT_THREAD_NAME};
pub use destination::Destination;
pub use error::{LoggerError, Result};
pub use metrics::SinkMetrics;
pub use overflow_policy::{OverflowCallback, OverflowPolicy};
pub use queue::{BoundedQueue, TryEnqueueError};
pub use sink::{AsyncSink, SinkBuilder};
pub use template::{render, PLACEHOLDER};
pub use timestamp::TimestampFormat;
