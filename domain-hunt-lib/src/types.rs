//! Core data types for a domain scan.
//!
//! This module defines the probe outcome, the scan configuration that is
//! passed explicitly into the scheduler, and the events and summary the
//! scheduler reports back to its caller.

use crate::progress::ProgressSnapshot;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default RDAP endpoint for `.com` lookups.
pub const DEFAULT_RDAP_URL: &str = "https://rdap.verisign.com/com/v1/domain/";

/// Default dictionary: a plain newline-separated English word list.
pub const DEFAULT_DICTIONARY: &str =
    "https://raw.githubusercontent.com/dwyl/english-words/master/words_alpha.txt";

/// Result of probing a single candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The registry has no record of the domain
    Available,

    /// The domain resolves in DNS or the registry holds a record for it
    Unavailable,

    /// The registry asked us to slow down
    RateLimited,

    /// The check itself failed (timeout, network error, unexpected status)
    Indeterminate { reason: String },
}

impl ProbeOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, ProbeOutcome::Available)
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProbeOutcome::RateLimited)
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, ProbeOutcome::Indeterminate { .. })
    }
}

impl std::fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeOutcome::Available => write!(f, "available"),
            ProbeOutcome::Unavailable => write!(f, "unavailable"),
            ProbeOutcome::RateLimited => write!(f, "rate limited"),
            ProbeOutcome::Indeterminate { reason } => write!(f, "indeterminate ({})", reason),
        }
    }
}

/// Configuration for one scan.
///
/// Every tunable of the pipeline lives here; the scheduler, prober and
/// word source read nothing else.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Candidates probed concurrently, also the batch size
    /// Default: 4, Range: 1-100
    pub concurrency: usize,

    /// Longest label kept from the dictionary
    /// Default: 6
    pub max_length: usize,

    /// Top-level suffix appended to each candidate (without the dot)
    /// Default: "com"
    pub tld: String,

    /// File that receives one available domain per line
    pub output_path: PathBuf,

    /// File holding the last fully processed candidate
    pub checkpoint_path: PathBuf,

    /// RDAP base URL; the domain is appended to it
    pub rdap_url: String,

    /// Dictionary URL (http/https) or local file path
    pub dictionary: String,

    /// Bound on each DNS and registry request
    /// Default: 3 seconds
    pub request_timeout: Duration,

    /// Pause after a batch that saw at least one rate-limit response
    /// Default: 60 seconds
    pub cooldown: Duration,

    /// Pause between consecutive batches
    /// Default: 1 second
    pub batch_delay: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            max_length: 6,
            tld: "com".to_string(),
            output_path: PathBuf::from("rdap_available.txt"),
            checkpoint_path: PathBuf::from("checkpoint.txt"),
            rdap_url: DEFAULT_RDAP_URL.to_string(),
            dictionary: DEFAULT_DICTIONARY.to_string(),
            request_timeout: Duration::from_secs(3),
            cooldown: Duration::from_secs(60),
            batch_delay: Duration::from_secs(1),
        }
    }
}

impl ScanConfig {
    /// Set concurrency, capped at 100 to prevent resource exhaustion.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_tld<S: Into<String>>(mut self, tld: S) -> Self {
        self.tld = tld.into().trim_start_matches('.').to_lowercase();
        self
    }

    pub fn with_output_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_checkpoint_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.checkpoint_path = path.into();
        self
    }

    pub fn with_rdap_url<S: Into<String>>(mut self, url: S) -> Self {
        self.rdap_url = url.into();
        self
    }

    pub fn with_dictionary<S: Into<String>>(mut self, dictionary: S) -> Self {
        self.dictionary = dictionary.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    /// Compose the full domain name for a candidate label.
    pub fn domain_for(&self, candidate: &str) -> String {
        format!("{}.{}", candidate, self.tld)
    }
}

/// Something the scheduler wants its caller to know about.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// An available domain was durably written to the output file
    Match { domain: String },

    /// A batch saw rate limiting; the scheduler is about to pause
    CoolingDown { duration: Duration },

    /// A batch finished and its checkpoint was written
    BatchCompleted(ProgressSnapshot),
}

/// How a scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Every candidate from the resume index onwards was processed
    Completed,

    /// The shutdown signal fired; the checkpoint reflects the last full batch
    Interrupted,
}

/// Totals for one run of the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub outcome: ScanOutcome,

    /// Index the run started from
    pub start_index: usize,

    /// Candidates processed in this run (full batches only)
    pub processed: usize,

    pub total: usize,
    pub batches: usize,

    /// Available domains written to the output file in this run
    pub matches: Vec<String>,

    /// Number of rate-limit cooldowns taken
    pub cooldowns: usize,

    /// Candidate stored in the checkpoint file when the run ended
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checkpoint: Option<String>,
}

impl ScanSummary {
    pub(crate) fn new(start_index: usize, total: usize) -> Self {
        Self {
            outcome: ScanOutcome::Completed,
            start_index,
            processed: 0,
            total,
            batches: 0,
            matches: Vec::new(),
            cooldowns: 0,
            last_checkpoint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_documented_values() {
        let config = ScanConfig::default();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.max_length, 6);
        assert_eq!(config.tld, "com");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.cooldown, Duration::from_secs(60));
        assert_eq!(config.batch_delay, Duration::from_secs(1));
        assert_eq!(config.rdap_url, DEFAULT_RDAP_URL);
    }

    #[test]
    fn test_builder_clamps_and_normalizes() {
        let config = ScanConfig::default()
            .with_concurrency(0)
            .with_tld(".NET");
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.tld, "net");
        assert_eq!(config.domain_for("abc"), "abc.net");

        let config = ScanConfig::default().with_concurrency(500);
        assert_eq!(config.concurrency, 100);
    }

    #[test]
    fn test_probe_outcome_predicates() {
        assert!(ProbeOutcome::Available.is_available());
        assert!(ProbeOutcome::RateLimited.is_rate_limited());
        let failed = ProbeOutcome::Indeterminate {
            reason: "Timeout".to_string(),
        };
        assert!(failed.is_indeterminate());
        assert!(!failed.is_available());
        assert_eq!(failed.to_string(), "indeterminate (Timeout)");
    }
}
