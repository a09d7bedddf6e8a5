//! Asynchronous line sink
//!
//! Submitters render and enqueue lines; one background worker drains the
//! queue into a [`Destination`]. A full queue applies back-pressure to the
//! submitters unless a lossy [`OverflowPolicy`] is configured.

use super::{
    config::{FlushPolicy, SinkConfig},
    destination::Destination,
    error::{LoggerError, Result},
    metrics::SinkMetrics,
    overflow_policy::{OverflowCallback, OverflowPolicy},
    queue::{BoundedQueue, TryEnqueueError},
    template::render,
    timestamp::TimestampFormat,
};
use crate::destinations::FileDestination;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, warn};
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A bounded queue of lines drained by a single background writer
///
/// # Example
///
/// ```no_run
/// use blocking_log_sink::AsyncSink;
///
/// let sink = AsyncSink::open("application.log")?;
/// sink.submit("listening on port {}", [8080]);
/// sink.submit_line("ready");
///
/// // Blocks until every accepted line is written
/// sink.shutdown();
/// # Ok::<(), blocking_log_sink::LoggerError>(())
/// ```
pub struct AsyncSink {
    queue: Arc<BoundedQueue<String>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    /// Disconnects when the worker exits
    worker_done: Receiver<()>,
    metrics: Arc<SinkMetrics>,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    timestamp: Option<TimestampFormat>,
    destination_name: String,
}

impl AsyncSink {
    /// Open `path` in append mode and start a worker with the default
    /// configuration
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(path, SinkConfig::default())
    }

    pub fn with_config(path: impl Into<PathBuf>, config: SinkConfig) -> Result<Self> {
        config.validate()?;
        let destination = FileDestination::open(path)?;
        Self::spawn(destination, config, None)
    }

    /// Start a worker draining into an already opened destination
    pub fn with_destination<D>(destination: D, config: SinkConfig) -> Result<Self>
    where
        D: Destination + 'static,
    {
        Self::spawn(destination, config, None)
    }

    /// Create a builder for AsyncSink
    ///
    /// # Example
    /// ```no_run
    /// use blocking_log_sink::prelude::*;
    ///
    /// let sink = AsyncSink::builder()
    ///     .path("application.log")
    ///     .capacity(1024)
    ///     .flush_policy(FlushPolicy::EveryLine)
    ///     .build()?;
    /// # Ok::<(), LoggerError>(())
    /// ```
    #[must_use]
    pub fn builder() -> SinkBuilder {
        SinkBuilder::new()
    }

    fn spawn<D>(
        destination: D,
        config: SinkConfig,
        on_overflow: Option<OverflowCallback>,
    ) -> Result<Self>
    where
        D: Destination + 'static,
    {
        config.validate()?;

        let queue = Arc::new(BoundedQueue::new(config.capacity)?);
        let metrics = Arc::new(SinkMetrics::new());
        let (done_tx, worker_done) = bounded(1);
        let destination_name = destination.name().to_string();

        let worker_queue = Arc::clone(&queue);
        let worker_metrics = Arc::clone(&metrics);
        let flush_policy = config.flush_policy;

        let handle = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || {
                run_worker(destination, &worker_queue, &worker_metrics, flush_policy, done_tx)
            })
            .map_err(LoggerError::WorkerSpawn)?;

        debug!(
            "sink started: destination={}, capacity={}, overflow={}, flush={}",
            destination_name, config.capacity, config.overflow_policy, config.flush_policy
        );

        Ok(Self {
            queue,
            worker: Mutex::new(Some(handle)),
            worker_done,
            metrics,
            overflow_policy: config.overflow_policy,
            on_overflow,
            timestamp: config.timestamp,
            destination_name,
        })
    }

    /// Render `template` with `args` and submit the result
    ///
    /// Blocks while the queue is full under the default policy. Lines
    /// submitted after shutdown are dropped and counted.
    pub fn submit<I>(&self, template: &str, args: I)
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.submit_line(render(template, args));
    }

    /// Submit an already rendered line
    pub fn submit_line(&self, line: impl Into<String>) {
        let line = line.into();
        let line = match self.timestamp {
            Some(ref format) => format.prefix(&line),
            None => line,
        };
        self.admit(line);
    }

    /// Same substitution as [`submit`](Self::submit), without submitting
    #[must_use]
    pub fn render<I>(template: &str, args: I) -> String
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        render(template, args)
    }

    fn admit(&self, line: String) {
        match self.overflow_policy {
            OverflowPolicy::Block => {
                let line = match self.queue.try_enqueue(line) {
                    Ok(()) => return self.record_admitted(),
                    Err(TryEnqueueError::Closed(_)) => return self.record_rejected(),
                    Err(TryEnqueueError::Full(line)) => line,
                };
                self.metrics.record_queue_full();
                if self.queue.enqueue(line) {
                    self.record_admitted();
                } else {
                    self.record_rejected();
                }
            }

            OverflowPolicy::BlockWithTimeout(timeout) => {
                let line = match self.queue.try_enqueue(line) {
                    Ok(()) => return self.record_admitted(),
                    Err(TryEnqueueError::Closed(_)) => return self.record_rejected(),
                    Err(TryEnqueueError::Full(line)) => line,
                };
                self.metrics.record_queue_full();
                match self.queue.enqueue_timeout(line, timeout) {
                    Ok(()) => self.record_admitted(),
                    Err(TryEnqueueError::Closed(_)) => self.record_rejected(),
                    Err(TryEnqueueError::Full(_)) => self.alert_and_drop(),
                }
            }

            OverflowPolicy::DropNewest => match self.queue.try_enqueue(line) {
                Ok(()) => self.record_admitted(),
                Err(TryEnqueueError::Closed(_)) => self.record_rejected(),
                Err(TryEnqueueError::Full(_)) => {
                    self.metrics.record_queue_full();
                    self.metrics.record_dropped_overflow();
                }
            },

            OverflowPolicy::DropOldest => match self.queue.enqueue_evicting(line) {
                Ok(None) => self.record_admitted(),
                Ok(Some(_evicted)) => {
                    self.record_admitted();
                    self.metrics.record_queue_full();
                    self.metrics.record_dropped_overflow();
                }
                Err(_) => self.record_rejected(),
            },

            OverflowPolicy::AlertAndDrop => match self.queue.try_enqueue(line) {
                Ok(()) => self.record_admitted(),
                Err(TryEnqueueError::Closed(_)) => self.record_rejected(),
                Err(TryEnqueueError::Full(_)) => {
                    self.metrics.record_queue_full();
                    self.alert_and_drop();
                }
            },
        }
    }

    #[inline]
    fn record_admitted(&self) {
        self.metrics.record_admitted();
    }

    #[inline]
    fn record_rejected(&self) {
        self.metrics.record_rejected();
    }

    /// Drop a line with alert notification
    fn alert_and_drop(&self) {
        let dropped_count = self.metrics.record_dropped_overflow();

        // Alert on first drop and periodically thereafter
        let should_alert = dropped_count == 0 || (dropped_count + 1).is_multiple_of(1000);
        if should_alert {
            warn!(
                "sink queue full, {} lines dropped; consider a larger capacity or the Block policy",
                dropped_count + 1
            );
            if let Some(ref callback) = self.on_overflow {
                callback(dropped_count + 1);
            }
        }
    }

    /// Close the queue and wait for the worker to drain it and exit
    ///
    /// Lines already buffered are written; later submissions are dropped.
    /// Calling this more than once is a no-op.
    pub fn shutdown(&self) {
        self.queue.shutdown();
        self.join_worker();
    }

    /// Like [`shutdown`](Self::shutdown), but stops waiting after `timeout`
    ///
    /// Returns `true` if the worker finished in time. On `false` the worker
    /// keeps draining in the background; a later `shutdown` or drop joins it.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use blocking_log_sink::AsyncSink;
    /// use std::time::Duration;
    ///
    /// let sink = AsyncSink::open("application.log")?;
    /// sink.submit_line("Important message");
    ///
    /// if !sink.shutdown_timeout(Duration::from_secs(10)) {
    ///     eprintln!("sink still draining");
    /// }
    /// # Ok::<(), blocking_log_sink::LoggerError>(())
    /// ```
    pub fn shutdown_timeout(&self, timeout: Duration) -> bool {
        self.queue.shutdown();

        match self.worker_done.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "sink worker for '{}' did not finish within {:?}",
                    self.destination_name, timeout
                );
                false
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                self.join_worker();
                true
            }
        }
    }

    fn join_worker(&self) {
        // Concurrent callers wait here until the first one has joined
        let mut worker = self.worker.lock();
        if let Some(handle) = worker.take() {
            if let Err(e) = handle.join() {
                error!(
                    "sink worker for '{}' panicked: {}",
                    self.destination_name,
                    panic_message(e.as_ref())
                );
            }

            let lost = self.metrics.lost();
            if lost > 0 {
                warn!(
                    "sink for '{}' shut down with {} lost lines (drop rate: {:.2}%)",
                    self.destination_name,
                    lost,
                    self.metrics.drop_rate()
                );
            }
            debug!("sink for '{}' shut down", self.destination_name);
        }
    }

    /// Whether shutdown has been requested
    pub fn is_shut_down(&self) -> bool {
        self.queue.is_closed()
    }

    /// Lines currently buffered
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow_policy
    }

    pub fn destination_name(&self) -> &str {
        &self.destination_name
    }

    /// Get the sink metrics for detailed observability
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }
}

impl Drop for AsyncSink {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for AsyncSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncSink")
            .field("destination", &self.destination_name)
            .field("queue", &self.queue)
            .field("overflow_policy", &self.overflow_policy)
            .field("timestamp", &self.timestamp)
            .field("metrics", &self.metrics)
            .finish()
    }
}

/// Closes the queue when the worker exits, however it exits, so producers
/// never wait on a queue nobody drains.
struct CloseOnExit<'a>(&'a BoundedQueue<String>);

impl Drop for CloseOnExit<'_> {
    fn drop(&mut self) {
        self.0.shutdown();
    }
}

fn run_worker<D: Destination>(
    mut destination: D,
    queue: &BoundedQueue<String>,
    metrics: &SinkMetrics,
    flush_policy: FlushPolicy,
    _done: Sender<()>,
) {
    let _close = CloseOnExit(queue);
    debug!("sink worker started for '{}'", destination.name());

    let mut dirty = false;
    loop {
        let line = match queue.try_dequeue() {
            Some(line) => line,
            None => {
                if dirty {
                    flush_destination(&mut destination);
                    dirty = false;
                }
                match queue.dequeue() {
                    Some(line) => line,
                    None => break,
                }
            }
        };

        write_line(&mut destination, &line, metrics);
        dirty = true;

        if flush_policy == FlushPolicy::EveryLine {
            flush_destination(&mut destination);
            dirty = false;
        }
    }

    if dirty {
        flush_destination(&mut destination);
    }
    debug!("sink worker for '{}' drained, exiting", destination.name());
}

/// Write one line with panic isolation; failures are reported and counted,
/// never propagated.
fn write_line<D: Destination>(destination: &mut D, line: &str, metrics: &SinkMetrics) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| destination.write_line(line)));

    match result {
        Ok(Ok(())) => {
            metrics.record_written();
        }
        Ok(Err(e)) => {
            metrics.record_write_failure();
            error!("destination '{}' failed to write: {}", destination.name(), e);
        }
        Err(panic_info) => {
            metrics.record_write_failure();
            error!(
                "destination '{}' panicked while writing: {}",
                destination.name(),
                panic_message(panic_info.as_ref())
            );
        }
    }
}

fn flush_destination<D: Destination>(destination: &mut D) {
    match panic::catch_unwind(AssertUnwindSafe(|| destination.flush())) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("destination '{}' flush failed: {}", destination.name(), e),
        Err(panic_info) => error!(
            "destination '{}' panicked during flush: {}",
            destination.name(),
            panic_message(panic_info.as_ref())
        ),
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for constructing an AsyncSink with a fluent API
///
/// # Example
/// ```no_run
/// use blocking_log_sink::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let sink = AsyncSink::builder()
///     .path("application.log")
///     .capacity(256)
///     .overflow_policy(OverflowPolicy::BlockWithTimeout(Duration::from_millis(50)))
///     .on_overflow(Arc::new(|count| {
///         eprintln!("ALERT: {} lines dropped", count);
///     }))
///     .build()?;
/// # Ok::<(), LoggerError>(())
/// ```
pub struct SinkBuilder {
    config: SinkConfig,
    path: Option<PathBuf>,
    destination: Option<Box<dyn Destination>>,
    on_overflow: Option<OverflowCallback>,
}

impl SinkBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: SinkConfig::default(),
            path: None,
            destination: None,
            on_overflow: None,
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: SinkConfig) -> Self {
        self.config = config;
        self
    }

    /// Write to a file opened in append mode at build time
    #[must_use = "builder methods return a new value"]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self.destination = None;
        self
    }

    /// Write to an already opened destination
    #[must_use = "builder methods return a new value"]
    pub fn destination<D: Destination + 'static>(mut self, destination: D) -> Self {
        self.destination = Some(Box::new(destination));
        self.path = None;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.config.overflow_policy = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.config.flush_policy = policy;
        self
    }

    /// Prefix every line with its submission time
    #[must_use = "builder methods return a new value"]
    pub fn timestamp(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp = Some(format);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = name.into();
        self
    }

    /// Set a callback for overflow notifications
    ///
    /// Invoked by the `AlertAndDrop` and `BlockWithTimeout` policies when
    /// lines are dropped. The parameter is the total count of dropped lines.
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    /// Build the AsyncSink
    ///
    /// The configuration is validated before the destination is opened, and
    /// the destination is opened before the worker starts.
    pub fn build(self) -> Result<AsyncSink> {
        self.config.validate()?;

        let destination: Box<dyn Destination> = match (self.destination, self.path) {
            (Some(destination), _) => destination,
            (None, Some(path)) => Box::new(FileDestination::open(path)?),
            (None, None) => {
                return Err(LoggerError::config(
                    "SinkBuilder",
                    "no destination configured; call path() or destination()",
                ))
            }
        };

        AsyncSink::spawn(destination, self.config, self.on_overflow)
    }
}

impl Default for SinkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
