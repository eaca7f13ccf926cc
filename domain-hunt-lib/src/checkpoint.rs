//! Resumable progress marker.
//!
//! The checkpoint file holds one line: the last candidate of the last batch
//! whose results were fully written. It is replaced atomically so an
//! interrupt can never leave a half-written marker behind.

use crate::error::HuntError;
use crate::words::CandidateSet;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Reads and writes the checkpoint file.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored candidate.
    ///
    /// A missing, unreadable or empty file all mean "no checkpoint".
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let value = content.trim();
                if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable checkpoint");
                None
            }
        }
    }

    /// Replace the checkpoint with `candidate`.
    ///
    /// Writes a sibling temp file, syncs it, then renames it over the real
    /// file.
    pub fn save(&self, candidate: &str) -> Result<(), HuntError> {
        let temp_path = self.temp_path();
        let to_file_error = |path: &Path, e: std::io::Error| {
            HuntError::file_error(path.to_string_lossy(), e.to_string())
        };

        let mut file = fs::File::create(&temp_path).map_err(|e| to_file_error(&temp_path, e))?;
        file.write_all(candidate.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| to_file_error(&temp_path, e))?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(|e| to_file_error(&self.path, e))?;
        debug!(candidate, "checkpoint saved");
        Ok(())
    }

    /// Remove the checkpoint so the next run starts from the beginning.
    pub fn clear(&self) -> Result<(), HuntError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HuntError::file_error(
                self.path.to_string_lossy(),
                e.to_string(),
            )),
        }
    }

    /// Position to resume from for this candidate set.
    pub fn resume_index(&self, candidates: &CandidateSet) -> usize {
        let stored = self.load();
        let index = resume_index(candidates, stored.as_deref());

        match stored {
            Some(last) if index == 0 => {
                warn!(
                    checkpoint = %last,
                    "checkpoint not found in the current word list, starting over"
                );
            }
            Some(last) => info!(checkpoint = %last, resume_index = index, "resuming"),
            None => debug!("no checkpoint, starting from the beginning"),
        }
        index
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Index immediately after `checkpoint`, or 0 when it is absent or unknown.
pub fn resume_index(candidates: &CandidateSet, checkpoint: Option<&str>) -> usize {
    checkpoint
        .and_then(|last| candidates.position(last))
        .map(|pos| pos + 1)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &str) -> CandidateSet {
        CandidateSet::from_text(words, 6)
    }

    #[test]
    fn test_resume_after_checkpoint() {
        let candidates = set("ab\ncd\nef\ngh\n");
        assert_eq!(resume_index(&candidates, Some("ab")), 1);
        assert_eq!(resume_index(&candidates, Some("ef")), 3);
        assert_eq!(resume_index(&candidates, Some("gh")), 4);
    }

    #[test]
    fn test_resume_from_zero_when_missing_or_stale() {
        let candidates = set("ab\ncd\n");
        assert_eq!(resume_index(&candidates, None), 0);
        assert_eq!(resume_index(&candidates, Some("zz")), 0);
        assert_eq!(resume_index(&candidates, Some("")), 0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("checkpoint.txt"));

        assert_eq!(store.load(), None);
        store.save("apple").unwrap();
        assert_eq!(store.load(), Some("apple".to_string()));

        // Overwrites rather than appends
        store.save("banana").unwrap();
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "banana".to_string()
        );
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_load_trims_and_ignores_blank_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.txt");
        let store = CheckpointStore::new(&path);

        fs::write(&path, "  cd \n").unwrap();
        assert_eq!(store.load(), Some("cd".to_string()));

        fs::write(&path, "\n").unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_store_resume_index_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("checkpoint.txt"));
        let candidates = set("ab\ncd\nef\n");

        store.save("cd").unwrap();
        assert_eq!(store.resume_index(&candidates), 2);

        store.clear().unwrap();
        assert_eq!(store.resume_index(&candidates), 0);
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("nope").join("checkpoint.txt"));
        assert!(matches!(store.save("ab"), Err(HuntError::FileError { .. })));
    }
}
