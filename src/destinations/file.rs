//! Append-only file destination

use crate::core::{Destination, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct FileDestination {
    writer: BufWriter<File>,
    path: PathBuf,
    name: String,
}

impl FileDestination {
    /// Open `path` for appending, creating it when missing
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_telemetry_logger::destinations::FileDestination;
    ///
    /// let destination = FileDestination::open("/var/log/checkout.jsonl").unwrap();
    /// ```
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::unavailable(path.display().to_string(), e.to_string()))?;

        Ok(Self {
            writer: BufWriter::new(file),
            name: format!("file://{}", path.display()),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Destination for FileDestination {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for FileDestination {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush {}: {}", self.name, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_destination_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jsonl");

        {
            let mut destination = FileDestination::open(&path).unwrap();
            destination.write(b"first\n").unwrap();
            destination.flush().unwrap();
        }
        {
            let mut destination = FileDestination::open(&path).unwrap();
            destination.write(b"second\n").unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_missing_directory_is_unavailable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.jsonl");

        let err = FileDestination::open(&path).err().unwrap();
        assert!(matches!(err, LoggerError::DestinationUnavailable { .. }));
    }
}
