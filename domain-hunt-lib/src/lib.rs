//! # Domain Hunt Library
//!
//! Scans a dictionary for short, unregistered domain names.
//!
//! The pipeline is a single resumable batch loop: load and normalize a word
//! list, skip past the stored checkpoint, probe each batch concurrently (DNS
//! first, RDAP only for names that do not resolve), append matches to an
//! output file, move the checkpoint, and report progress.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_hunt_lib::{load_candidates, BatchScheduler, ScanConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScanConfig::default().with_max_length(4);
//!     let candidates =
//!         load_candidates(&config.dictionary, config.max_length, config.request_timeout).await?;
//!
//!     let mut scheduler = BatchScheduler::from_config(config)?;
//!     let summary = scheduler
//!         .resume(&candidates, async { let _ = tokio::signal::ctrl_c().await; }, |_| {})
//!         .await?;
//!
//!     println!("{} matches", summary.matches.len());
//!     Ok(())
//! }
//! ```

// Re-export main public API types and functions
// This makes them available as domain_hunt_lib::TypeName
pub use checkpoint::{resume_index, CheckpointStore};
pub use config::{
    env_config_from, load_env_config, parse_duration_string, validate_scan_config, ConfigManager,
    EnvConfig, FileConfig, ScanFileConfig,
};
pub use error::HuntError;
pub use prober::AvailabilityProber;
pub use progress::{format_eta, ProgressSnapshot, ProgressTracker};
pub use protocols::{DnsResolver, RdapClient, RegistryLookup, SystemResolver};
pub use scheduler::BatchScheduler;
pub use sink::ResultSink;
pub use types::{
    ProbeOutcome, ScanConfig, ScanEvent, ScanOutcome, ScanSummary, DEFAULT_DICTIONARY,
    DEFAULT_RDAP_URL,
};
pub use words::{load_candidates, CandidateSet};

// Public modules
pub mod protocols;

// Internal modules - re-exported above
mod checkpoint;
mod config;
mod error;
mod prober;
mod progress;
mod scheduler;
mod sink;
mod types;
mod words;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, HuntError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
