//! Macros for submitting and rendering lines with heterogeneous arguments.
//!
//! [`AsyncSink::submit`](crate::AsyncSink::submit) accepts any iterator of
//! `Display` values, which means a single element type. These macros take
//! each argument by reference as `&dyn Display`, so different types can be
//! mixed freely.
//!
//! # Examples
//!
//! ```no_run
//! use blocking_log_sink::prelude::*;
//! use blocking_log_sink::submit;
//!
//! let sink = AsyncSink::open("server.log")?;
//!
//! // Plain line
//! submit!(sink, "Server started");
//!
//! // Mixed argument types
//! let port = 8080;
//! submit!(sink, "{} listening on port {}", "api", port);
//! # Ok::<(), LoggerError>(())
//! ```

/// Render a template into a `String` without submitting it.
///
/// # Examples
///
/// ```
/// use blocking_log_sink::render;
///
/// let user = "alice";
/// let id = 42;
/// assert_eq!(render!("{} has id {}", user, id), "alice has id 42");
/// assert_eq!(render!("Value {} {}", 42), "Value 42 {}");
/// assert_eq!(render!("no arguments {}"), "no arguments {}");
/// ```
#[macro_export]
macro_rules! render {
    ($template:expr $(,)?) => {
        $crate::render($template, ::std::iter::empty::<&str>())
    };
    ($template:expr, $($arg:expr),+ $(,)?) => {
        $crate::render($template, [$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

/// Render a template and submit it to a sink.
///
/// # Examples
///
/// ```
/// # use blocking_log_sink::prelude::*;
/// # let sink = AsyncSink::with_destination(
/// #     WriterDestination::new(Vec::new()),
/// #     SinkConfig::default(),
/// # ).unwrap();
/// use blocking_log_sink::submit;
/// submit!(sink, "Simple message");
/// submit!(sink, "T{} {}", 3, "ready");
/// ```
#[macro_export]
macro_rules! submit {
    ($sink:expr, $template:expr $(,)?) => {
        $sink.submit($template, ::std::iter::empty::<&str>())
    };
    ($sink:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $sink.submit($template, [$(&$arg as &dyn ::std::fmt::Display),+])
    };
}
