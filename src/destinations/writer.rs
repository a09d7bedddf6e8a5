//! Destination over any `io::Write`

use crate::core::{Destination, Result};
use std::io::Write;

/// Writes lines to an arbitrary writer (stdout, an in-memory buffer, a pipe)
pub struct WriterDestination<W: Write + Send> {
    writer: W,
    name: String,
}

impl<W: Write + Send> WriterDestination<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            name: "writer".to_string(),
        }
    }

    /// Set the name reported in diagnostics
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterDestination<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout()).with_name("stdout")
    }
}

impl WriterDestination<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr()).with_name("stderr")
    }
}

impl<W: Write + Send> Destination for WriterDestination<W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_newline_terminated() {
        let mut destination = WriterDestination::new(Vec::new());
        destination.write_line("alpha").unwrap();
        destination.write_line("").unwrap();
        destination.write_line("two\nlines").unwrap();
        destination.flush().unwrap();

        assert_eq!(destination.get_ref().as_slice(), b"alpha\n\ntwo\nlines\n");
    }

    #[test]
    fn test_names() {
        assert_eq!(WriterDestination::new(Vec::new()).name(), "writer");
        assert_eq!(WriterDestination::stdout().name(), "stdout");
        assert_eq!(
            WriterDestination::new(Vec::new()).with_name("buffer").name(),
            "buffer"
        );
    }
}
