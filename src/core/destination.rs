//! Destination trait for persisted lines

use super::error::Result;

/// An append-only output owned by a sink worker
///
/// Only the worker thread ever touches a destination, so implementations
/// need `Send` but not `Sync`.
pub trait Destination: Send {
    /// Append `line` followed by a line terminator
    fn write_line(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

impl<D: Destination + ?Sized> Destination for Box<D> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        (**self).write_line(line)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
