//! Domain Hunt CLI Application
//!
//! Runs one long-lived, resumable scan of a dictionary for unregistered
//! domains. Configuration is layered: built-in defaults, TOML config files,
//! `DH_*` environment variables, then command-line flags.
//!
//! Exit codes: 0 when the scan completes, 130 when paused by Ctrl-C (the
//! checkpoint is valid), 1 on any fatal error.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use futures_util::FutureExt;
use domain_hunt_lib::{
    load_candidates, load_env_config, parse_duration_string, validate_scan_config, BatchScheduler,
    ConfigManager, FileConfig, HuntError, ScanConfig, ScanEvent, ScanOutcome, ScanSummary,
};
use std::future::Future;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Exit code for a run paused by an interrupt.
const EXIT_PAUSED: i32 = 130;

const LONG_ABOUT: &str = "Scan a dictionary for unregistered short domains.

Each word is checked in DNS first; only names that do not resolve are looked \
up over RDAP. Matches are appended to an output file and progress is \
checkpointed after every batch, so an interrupted scan resumes where it stopped.";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-hunt
#[derive(Parser, Debug)]
#[command(name = "domain-hunt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scan a dictionary for unregistered short domains using DNS and RDAP")]
#[command(long_about = LONG_ABOUT)]
#[command(styles = STYLES)]
pub struct Args {
    /// Dictionary URL (http/https) or local file, one word per line
    #[arg(
        short = 'w',
        long = "dictionary",
        value_name = "URL|FILE",
        help_heading = "Candidates"
    )]
    pub dictionary: Option<String>,

    /// Longest word to keep from the dictionary [default: 6]
    #[arg(short = 'm', long = "max-length", value_name = "N", help_heading = "Candidates")]
    pub max_length: Option<usize>,

    /// Top-level domain appended to each word [default: com]
    #[arg(short = 't', long = "tld", value_name = "TLD", help_heading = "Candidates")]
    pub tld: Option<String>,

    /// File receiving available domains, one per line [default: rdap_available.txt]
    #[arg(short = 'o', long = "output", value_name = "FILE", help_heading = "Files")]
    pub output: Option<PathBuf>,

    /// Checkpoint file used to resume [default: checkpoint.txt]
    #[arg(long = "checkpoint", value_name = "FILE", help_heading = "Files")]
    pub checkpoint: Option<PathBuf>,

    /// Ignore and remove any existing checkpoint before starting
    #[arg(long = "fresh", help_heading = "Files")]
    pub fresh: bool,

    /// RDAP base URL the domain is appended to
    #[arg(long = "rdap-url", value_name = "URL", help_heading = "Registry")]
    pub rdap_url: Option<String>,

    /// Per-request timeout, e.g. 3s or 500ms [default: 3s]
    #[arg(
        long = "timeout",
        value_name = "DURATION",
        value_parser = parse_duration_arg,
        help_heading = "Registry"
    )]
    pub timeout: Option<Duration>,

    /// Pause after a rate-limited batch [default: 60s]
    #[arg(
        long = "cooldown",
        value_name = "DURATION",
        value_parser = parse_duration_arg,
        help_heading = "Registry"
    )]
    pub cooldown: Option<Duration>,

    /// Pause between batches [default: 1s]
    #[arg(
        long = "delay",
        value_name = "DURATION",
        value_parser = parse_duration_arg,
        help_heading = "Registry"
    )]
    pub delay: Option<Duration>,

    /// Concurrent checks per batch (1-100) [default: 4]
    #[arg(short = 'c', long = "concurrency", help_heading = "Performance")]
    pub concurrency: Option<usize>,

    /// Print the final summary as JSON instead of live progress
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

fn parse_duration_arg(value: &str) -> Result<Duration, String> {
    parse_duration_string(value)
        .ok_or_else(|| format!("invalid duration '{}', use e.g. 500ms, 3s, 2m", value))
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(&args);

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match run_scan(&args, config).await {
        Ok(ScanOutcome::Completed) => {}
        Ok(ScanOutcome::Interrupted) => process::exit(EXIT_PAUSED),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Install the tracing subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(args: &Args) {
    let level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("domain_hunt={0},domain_hunt_lib={0}", level))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Layer defaults, config files, environment and flags into one config.
fn build_config(args: &Args) -> Result<ScanConfig, HuntError> {
    let manager = ConfigManager::new(args.verbose);
    let file_config = match &args.config {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load().unwrap_or_else(|e| {
            warn!(error = %e, "config discovery failed, using defaults");
            FileConfig::default()
        }),
    };

    let config = file_config.apply_to(ScanConfig::default());
    let config = load_env_config().apply_to(config);
    let config = apply_args(args, config);

    validate_scan_config(&config)?;
    Ok(config)
}

/// Apply command-line flags, the highest-precedence layer.
fn apply_args(args: &Args, mut config: ScanConfig) -> ScanConfig {
    if let Some(concurrency) = args.concurrency {
        // Range is checked by validate_scan_config
        config.concurrency = concurrency;
    }
    if let Some(max_length) = args.max_length {
        config.max_length = max_length;
    }
    if let Some(tld) = &args.tld {
        config = config.with_tld(tld.as_str());
    }
    if let Some(output) = &args.output {
        config.output_path = output.clone();
    }
    if let Some(checkpoint) = &args.checkpoint {
        config.checkpoint_path = checkpoint.clone();
    }
    if let Some(rdap_url) = &args.rdap_url {
        config.rdap_url = rdap_url.clone();
    }
    if let Some(dictionary) = &args.dictionary {
        config.dictionary = dictionary.clone();
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout = timeout;
    }
    if let Some(cooldown) = args.cooldown {
        config.cooldown = cooldown;
    }
    if let Some(delay) = args.delay {
        config.batch_delay = delay;
    }
    config
}

/// Install the Ctrl-C handler and hand back a way to wait for it.
///
/// Must be called from within the runtime. The handler is in place when this
/// returns, so a Ctrl-C that arrives before the listener task first runs still
/// pauses the scan instead of killing the process.
fn interrupt_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    let mut ctrl_c = Box::pin(tokio::signal::ctrl_c());
    // The OS handler is registered on first poll
    let early = ctrl_c.as_mut().now_or_never();

    tokio::spawn(async move {
        let result = match early {
            Some(result) => result,
            None => ctrl_c.await,
        };
        match result {
            Ok(()) => {
                let _ = tx.send(true);
            }
            Err(e) => {
                warn!(error = %e, "unable to listen for Ctrl-C");
                // Keep the sender alive so receivers never see a closed channel
                std::future::pending::<()>().await;
            }
        }
    });
    rx
}

/// A future that completes once the interrupt has been received.
fn interrupted(mut rx: watch::Receiver<bool>) -> impl Future<Output = ()> {
    async move {
        let _ = rx.wait_for(|fired| *fired).await;
    }
}

async fn run_scan(args: &Args, config: ScanConfig) -> Result<ScanOutcome, HuntError> {
    let interrupt = interrupt_signal();
    let live = !args.json;

    info!(
        dictionary = %config.dictionary,
        concurrency = config.concurrency,
        max_length = config.max_length,
        "domain-hunt starting"
    );

    let spinner = live.then(|| ui::Spinner::start("Loading dictionary...".to_string()));
    let load = load_candidates(&config.dictionary, config.max_length, config.request_timeout);
    let loaded = tokio::select! {
        biased;
        _ = interrupted(interrupt.clone()) => None,
        loaded = load => Some(loaded),
    };
    if let Some(spinner) = spinner {
        spinner.stop().await;
    }

    let candidates = match loaded {
        Some(result) => result?,
        None => {
            if live {
                println!("Paused before the scan started. Nothing was written.");
            }
            return Ok(ScanOutcome::Interrupted);
        }
    };

    let output_path = config.output_path.clone();
    let tld = config.tld.clone();
    let mut scheduler = BatchScheduler::from_config(config)?;

    if args.fresh {
        scheduler.checkpoint().clear()?;
        info!("checkpoint cleared");
    }

    let start_index = scheduler.checkpoint().resume_index(&candidates);
    if live {
        ui::print_header(scheduler.config(), candidates.len(), start_index);
    }

    let summary = scheduler
        .run(&candidates, start_index, interrupted(interrupt), |event| {
            if !live {
                return;
            }
            match event {
                ScanEvent::Match { domain } => ui::print_match(&domain),
                ScanEvent::CoolingDown { duration } => ui::print_cooldown(duration),
                ScanEvent::BatchCompleted(snapshot) => ui::print_progress(&snapshot, &tld),
            }
        })
        .await?;

    report(&summary, &output_path, args.json)?;
    Ok(summary.outcome)
}

fn report(
    summary: &ScanSummary,
    output_path: &std::path::Path,
    json: bool,
) -> Result<(), HuntError> {
    if json {
        let rendered = serde_json::to_string_pretty(summary)
            .map_err(|e| HuntError::internal(format!("Failed to serialize summary: {}", e)))?;
        println!("{}", rendered);
    } else {
        ui::print_summary(summary, output_path);
    }
    Ok(())
}
