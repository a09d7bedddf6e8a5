//! File destination implementation

use crate::core::{Destination, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends lines to a file opened in append mode
pub struct FileDestination {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
}

impl FileDestination {
    /// Open (creating if needed) `path` for appending
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use blocking_log_sink::destinations::FileDestination;
    ///
    /// let destination = FileDestination::open("/var/log/app.log").unwrap();
    /// ```
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::destination_open(&path, e))?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Destination for FileDestination {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileDestination {
    fn drop(&mut self) {
        // Ensure all buffered data reaches the file
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_appends_to_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("existing.log");
        std::fs::write(&path, "first\n").unwrap();

        let mut destination = FileDestination::open(&path).unwrap();
        destination.write_line("second").unwrap();
        destination.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
        assert_eq!(destination.path(), path.as_path());
        assert_eq!(destination.name(), "file");
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no").join("such").join("dir.log");

        let err = FileDestination::open(&path).err().expect("open should fail");
        assert!(matches!(err, LoggerError::DestinationOpen { .. }));
    }

    #[test]
    fn test_drop_flushes_buffer() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dropped.log");

        {
            let mut destination = FileDestination::open(&path).unwrap();
            destination.write_line("buffered").unwrap();
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "buffered\n");
    }
}
