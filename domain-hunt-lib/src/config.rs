//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and environment
//! variables and layering them onto a [`ScanConfig`] with proper precedence:
//! defaults, then config files, then `DH_*` environment variables. The CLI
//! applies its own flags last.

use crate::error::HuntError;
use crate::types::ScanConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Scan tunables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanFileConfig>,
}

/// The `[scan]` table. Every field is optional; unset fields keep the value
/// from the layer below.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanFileConfig {
    /// Concurrent probes, also the batch size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Longest dictionary word kept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Top-level suffix, e.g. "com"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tld: Option<String>,

    /// Output file for available domains
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Checkpoint file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<PathBuf>,

    /// RDAP base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdap_url: Option<String>,

    /// Dictionary URL or local path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<String>,

    /// Per-request timeout (as string, e.g., "3s", "500ms")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Rate-limit cooldown (as string, e.g., "60s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<String>,

    /// Delay between batches (as string, e.g., "1s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
}

/// Configuration discovery and loading functionality.
#[derive(Debug, Default)]
pub struct ConfigManager {
    /// Whether to log which config files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, HuntError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(HuntError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            HuntError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)
            .map_err(|e| HuntError::config(format!("Failed to parse TOML configuration: {}", e)))?;

        self.validate_config(&config)?;

        debug!(path = %path.display(), "configuration file loaded");
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config first (lowest), then the home directory, then the current
    /// directory (highest). A file that fails to parse is reported and
    /// skipped.
    pub fn discover_and_load(&self) -> Result<FileConfig, HuntError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping config file"),
            }
        }

        if self.verbose && !loaded_files.is_empty() {
            for path in &loaded_files {
                info!(path = %path.display(), "using config file");
            }
        }

        Ok(merged_config)
    }

    /// Get the local configuration file path.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./domain-hunt.toml", "./.domain-hunt.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Get the global configuration file path in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let candidates = [".domain-hunt.toml", "domain-hunt.toml"];

        candidates
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Get the XDG configuration file path.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-hunt").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations with proper precedence.
    ///
    /// Values from `higher` take precedence over values from `lower`.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        let scan = match (lower.scan, higher.scan) {
            (Some(lower), Some(higher)) => Some(ScanFileConfig {
                concurrency: higher.concurrency.or(lower.concurrency),
                max_length: higher.max_length.or(lower.max_length),
                tld: higher.tld.or(lower.tld),
                output: higher.output.or(lower.output),
                checkpoint: higher.checkpoint.or(lower.checkpoint),
                rdap_url: higher.rdap_url.or(lower.rdap_url),
                dictionary: higher.dictionary.or(lower.dictionary),
                timeout: higher.timeout.or(lower.timeout),
                cooldown: higher.cooldown.or(lower.cooldown),
                delay: higher.delay.or(lower.delay),
            }),
            (lower, higher) => higher.or(lower),
        };

        FileConfig { scan }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), HuntError> {
        let Some(scan) = &config.scan else {
            return Ok(());
        };

        if let Some(concurrency) = scan.concurrency {
            validate_concurrency(concurrency)?;
        }

        if let Some(max_length) = scan.max_length {
            validate_max_length(max_length)?;
        }

        if let Some(tld) = &scan.tld {
            validate_tld(tld)?;
        }

        for (name, value) in [
            ("timeout", &scan.timeout),
            ("cooldown", &scan.cooldown),
            ("delay", &scan.delay),
        ] {
            if let Some(value) = value {
                if parse_duration_string(value).is_none() {
                    return Err(HuntError::config(format!(
                        "Invalid {} format '{}'. Use format like '500ms', '3s', '2m'",
                        name, value
                    )));
                }
            }
        }

        Ok(())
    }
}

impl FileConfig {
    /// Layer the file settings onto `base`.
    ///
    /// Durations were checked by validation; an unparsable one here keeps the
    /// base value.
    pub fn apply_to(&self, mut base: ScanConfig) -> ScanConfig {
        let Some(scan) = &self.scan else {
            return base;
        };

        if let Some(concurrency) = scan.concurrency {
            base.concurrency = concurrency;
        }
        if let Some(max_length) = scan.max_length {
            base.max_length = max_length;
        }
        if let Some(tld) = &scan.tld {
            base = base.with_tld(tld.as_str());
        }
        if let Some(output) = &scan.output {
            base.output_path = output.clone();
        }
        if let Some(checkpoint) = &scan.checkpoint {
            base.checkpoint_path = checkpoint.clone();
        }
        if let Some(rdap_url) = &scan.rdap_url {
            base.rdap_url = rdap_url.clone();
        }
        if let Some(dictionary) = &scan.dictionary {
            base.dictionary = dictionary.clone();
        }
        if let Some(timeout) = scan.timeout.as_deref().and_then(parse_duration_string) {
            base.request_timeout = timeout;
        }
        if let Some(cooldown) = scan.cooldown.as_deref().and_then(parse_duration_string) {
            base.cooldown = cooldown;
        }
        if let Some(delay) = scan.delay.as_deref().and_then(parse_duration_string) {
            base.batch_delay = delay;
        }
        base
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// This represents configuration values that can be set via DH_* environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub max_length: Option<usize>,
    pub tld: Option<String>,
    pub output: Option<PathBuf>,
    pub checkpoint: Option<PathBuf>,
    pub rdap_url: Option<String>,
    pub dictionary: Option<String>,
    pub timeout: Option<Duration>,
    pub cooldown: Option<Duration>,
    pub delay: Option<Duration>,
}

/// Load configuration from the process environment.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    env_config_from(|key| env::var(key).ok())
}

/// Build an [`EnvConfig`] from an arbitrary variable lookup.
pub fn env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    let non_empty = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(val) = non_empty("DH_CONCURRENCY") {
        match val.parse::<usize>() {
            Ok(concurrency) if validate_concurrency(concurrency).is_ok() => {
                debug!(concurrency, "using DH_CONCURRENCY");
                env_config.concurrency = Some(concurrency);
            }
            _ => warn!(value = %val, "invalid DH_CONCURRENCY, must be 1-100"),
        }
    }

    if let Some(val) = non_empty("DH_MAX_LENGTH") {
        match val.parse::<usize>() {
            Ok(max_length) if validate_max_length(max_length).is_ok() => {
                debug!(max_length, "using DH_MAX_LENGTH");
                env_config.max_length = Some(max_length);
            }
            _ => warn!(value = %val, "invalid DH_MAX_LENGTH, must be 1-63"),
        }
    }

    if let Some(tld) = non_empty("DH_TLD") {
        match validate_tld(&tld) {
            Ok(()) => env_config.tld = Some(tld),
            Err(e) => warn!(value = %tld, error = %e, "invalid DH_TLD"),
        }
    }

    env_config.output = non_empty("DH_OUTPUT").map(PathBuf::from);
    env_config.checkpoint = non_empty("DH_CHECKPOINT").map(PathBuf::from);
    env_config.rdap_url = non_empty("DH_RDAP_URL");
    env_config.dictionary = non_empty("DH_DICTIONARY");

    let duration = |key: &str| {
        let val = non_empty(key)?;
        let parsed = parse_duration_string(&val);
        if parsed.is_none() {
            warn!(key, value = %val, "invalid duration, ignoring");
        }
        parsed
    };
    env_config.timeout = duration("DH_TIMEOUT");
    env_config.cooldown = duration("DH_COOLDOWN");
    env_config.delay = duration("DH_DELAY");

    env_config
}

impl EnvConfig {
    /// Layer the environment settings onto `base`.
    pub fn apply_to(&self, mut base: ScanConfig) -> ScanConfig {
        if let Some(concurrency) = self.concurrency {
            base.concurrency = concurrency;
        }
        if let Some(max_length) = self.max_length {
            base.max_length = max_length;
        }
        if let Some(tld) = &self.tld {
            base = base.with_tld(tld.as_str());
        }
        if let Some(output) = &self.output {
            base.output_path = output.clone();
        }
        if let Some(checkpoint) = &self.checkpoint {
            base.checkpoint_path = checkpoint.clone();
        }
        if let Some(rdap_url) = &self.rdap_url {
            base.rdap_url = rdap_url.clone();
        }
        if let Some(dictionary) = &self.dictionary {
            base.dictionary = dictionary.clone();
        }
        if let Some(timeout) = self.timeout {
            base.request_timeout = timeout;
        }
        if let Some(cooldown) = self.cooldown {
            base.cooldown = cooldown;
        }
        if let Some(delay) = self.delay {
            base.batch_delay = delay;
        }
        base
    }
}

const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(5 * 60);
const MAX_COOLDOWN: Duration = Duration::from_secs(24 * 3600);
const MAX_BATCH_DELAY: Duration = Duration::from_secs(3600);

/// Check a fully assembled configuration before a run.
pub fn validate_scan_config(config: &ScanConfig) -> Result<(), HuntError> {
    validate_concurrency(config.concurrency)?;
    validate_max_length(config.max_length)?;
    validate_tld(&config.tld)?;

    if config.rdap_url.trim().is_empty() {
        return Err(HuntError::config("RDAP URL cannot be empty"));
    }
    if config.dictionary.trim().is_empty() {
        return Err(HuntError::config("Dictionary source cannot be empty"));
    }
    if config.request_timeout.is_zero() || config.request_timeout > MAX_REQUEST_TIMEOUT {
        return Err(HuntError::config("Request timeout must be above zero and at most 5m"));
    }
    if config.cooldown > MAX_COOLDOWN {
        return Err(HuntError::config("Cooldown cannot exceed 24h"));
    }
    if config.batch_delay > MAX_BATCH_DELAY {
        return Err(HuntError::config("Batch delay cannot exceed 1h"));
    }
    Ok(())
}

fn validate_concurrency(concurrency: usize) -> Result<(), HuntError> {
    if concurrency == 0 || concurrency > 100 {
        return Err(HuntError::config("Concurrency must be between 1 and 100"));
    }
    Ok(())
}

fn validate_max_length(max_length: usize) -> Result<(), HuntError> {
    // A DNS label holds at most 63 octets.
    if max_length == 0 || max_length > 63 {
        return Err(HuntError::config("Max length must be between 1 and 63"));
    }
    Ok(())
}

fn validate_tld(tld: &str) -> Result<(), HuntError> {
    let tld = tld.trim_start_matches('.');
    if tld.is_empty() || tld.contains('.') || tld.contains(char::is_whitespace) {
        return Err(HuntError::config(format!("Invalid TLD '{}'", tld)));
    }
    Ok(())
}

/// Parse a duration string like "500ms", "5s", "2m", "1h".
///
/// A bare number is taken as seconds.
pub fn parse_duration_string(value: &str) -> Option<Duration> {
    let value = value.trim().to_lowercase();

    if let Some(ms) = value.strip_suffix("ms") {
        ms.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(s) = value.strip_suffix('s') {
        s.trim().parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(m) = value.strip_suffix('m') {
        m.trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else if let Some(h) = value.strip_suffix('h') {
        h.trim()
            .parse::<u64>()
            .ok()
            .and_then(|h| h.checked_mul(3600))
            .map(Duration::from_secs)
    } else {
        value.parse::<u64>().ok().map(Duration::from_secs)
    }
}
