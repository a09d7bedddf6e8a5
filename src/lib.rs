//! # Blocking Log Sink
//!
//! A bounded, blocking, multi-producer/multi-consumer queue and an
//! asynchronous line sink built on top of it.
//!
//! ## Features
//!
//! - **Back-pressure**: a full queue makes submitters wait instead of
//!   growing without bound or silently dropping lines
//! - **Drain on shutdown**: every line accepted before shutdown is written
//! - **Single writer**: one background thread owns the destination
//! - **Simple templates**: `{}` placeholders filled left to right
//!
//! ## Example
//!
//! ```no_run
//! use blocking_log_sink::prelude::*;
//!
//! let sink = AsyncSink::open("application.log")?;
//! sink.submit("Hello {}", ["World"]);
//! sink.shutdown();
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod destinations;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        render, AsyncSink, BoundedQueue, Destination, FlushPolicy, LoggerError, OverflowCallback,
        OverflowPolicy, Result, SinkBuilder, SinkConfig, SinkMetrics, TimestampFormat,
        TryEnqueueError,
    };
    pub use crate::destinations::{FileDestination, WriterDestination};
}

pub use crate::core::{
    render, AsyncSink, BoundedQueue, Destination, FlushPolicy, LoggerError, OverflowCallback,
    OverflowPolicy, Result, SinkBuilder, SinkConfig, SinkMetrics, TimestampFormat,
    TryEnqueueError, DEFAULT_CAPACITY, PLACEHOLDER,
};
pub use destinations::{FileDestination, WriterDestination};
