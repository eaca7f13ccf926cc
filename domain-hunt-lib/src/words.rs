//! Dictionary loading and candidate normalization.
//!
//! The candidate set is the contract the checkpoint relies on: the same raw
//! dictionary must always produce the same ordered list, otherwise a stored
//! checkpoint would point somewhere else on the next run.

use crate::error::HuntError;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// An ordered, duplicate-free list of candidate labels.
///
/// Only constructed through [`CandidateSet::from_text`] (or the fetch helpers),
/// so every entry is lowercase ASCII alphanumeric, within the length limit,
/// and the list is sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    words: Vec<String>,
}

impl CandidateSet {
    /// Normalize newline-separated raw text into a candidate set.
    ///
    /// Tokens are trimmed and lowercased; anything empty, non-alphanumeric or
    /// longer than `max_length` is dropped.
    pub fn from_text(raw: &str, max_length: usize) -> Self {
        let words: BTreeSet<String> = raw
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|word| is_candidate(word, max_length))
            .collect();

        Self {
            words: words.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.words
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    /// Position of a candidate in the set, if present.
    pub fn position(&self, candidate: &str) -> Option<usize> {
        self.words
            .binary_search_by(|w| w.as_str().cmp(candidate))
            .ok()
    }
}

/// Whether a normalized token is a usable label.
fn is_candidate(word: &str, max_length: usize) -> bool {
    !word.is_empty() && word.len() <= max_length && word.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Load a candidate set from a URL or a local file.
///
/// `http://` and `https://` sources are downloaded; anything else is treated
/// as a path on disk. Any failure is a [`HuntError::FetchError`]: a partial
/// word list would shift every resume position.
pub async fn load_candidates(
    source: &str,
    max_length: usize,
    timeout: Duration,
) -> Result<CandidateSet, HuntError> {
    let raw = if is_remote(source) {
        fetch_remote(source, timeout).await?
    } else {
        read_local(Path::new(source))?
    };

    let candidates = CandidateSet::from_text(&raw, max_length);
    info!(
        source,
        raw_lines = raw.lines().count(),
        candidates = candidates.len(),
        "dictionary loaded"
    );
    Ok(candidates)
}

fn is_remote(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

async fn fetch_remote(url: &str, timeout: Duration) -> Result<String, HuntError> {
    // Dictionaries are a few megabytes; allow well beyond the per-probe bound.
    let client = reqwest::Client::builder()
        .timeout(timeout.max(Duration::from_secs(60)))
        .build()
        .map_err(|e| HuntError::fetch(url, format!("failed to create HTTP client: {}", e)))?;

    debug!(url, "downloading dictionary");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| HuntError::fetch(url, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HuntError::fetch(url, format!("HTTP {}", status.as_u16())));
    }

    response
        .text()
        .await
        .map_err(|e| HuntError::fetch(url, format!("failed to read body: {}", e)))
}

fn read_local(path: &Path) -> Result<String, HuntError> {
    std::fs::read_to_string(path)
        .map_err(|e| HuntError::fetch(path.to_string_lossy(), e.to_string()))
}
