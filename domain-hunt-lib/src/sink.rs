//! Append-only output of available domains.

use crate::error::HuntError;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Output file held open in append mode for the lifetime of a run.
///
/// Every record is flushed and synced before [`ResultSink::record`] returns.
/// Prior content is never read, so a resumed run may append a domain that an
/// interrupted run already wrote.
#[derive(Debug)]
pub struct ResultSink {
    path: PathBuf,
    file: File,
}

impl ResultSink {
    /// Open (or create) the output file for appending.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, HuntError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| HuntError::file_error(path.to_string_lossy(), e.to_string()))?;

        Ok(Self { path, file })
    }

    /// Durably append one domain.
    pub fn record(&mut self, domain: &str) -> Result<(), HuntError> {
        writeln!(self.file, "{}", domain)
            .and_then(|_| self.file.flush())
            .and_then(|_| self.file.sync_data())
            .map_err(|e| HuntError::file_error(self.path.to_string_lossy(), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let mut sink = ResultSink::open(&path).unwrap();
        sink.record("ab.com").unwrap();
        sink.record("cd.com").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "ab.com\ncd.com\n");
    }

    #[test]
    fn test_reopen_keeps_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        ResultSink::open(&path).unwrap().record("ab.com").unwrap();
        ResultSink::open(&path).unwrap().record("ab.com").unwrap();

        // No dedup across runs
        assert_eq!(fs::read_to_string(&path).unwrap(), "ab.com\nab.com\n");
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = ResultSink::open(dir.path().join("missing").join("out.txt"));
        assert!(matches!(result, Err(HuntError::FileError { .. })));
    }
}
