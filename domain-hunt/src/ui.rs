//! Terminal display for a running scan.
//!
//! The live progress line is rewritten in place on stdout with `\r`; matches
//! and cooldown notices break onto their own lines above it. Logging goes to
//! stderr so it never tears the progress line. Uses only the `console` crate.

use console::{style, Term};
use domain_hunt_lib::{format_eta, ProgressSnapshot, ScanConfig, ScanOutcome, ScanSummary};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ── Spinner ──────────────────────────────────────────────────────────────────

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An async braille-dot spinner that writes to stderr so stdout stays clean.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    /// Start a new spinner with the given message (e.g. "Loading dictionary...").
    pub fn start(message: String) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut idx = 0usize;
            while running_clone.load(Ordering::Relaxed) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                let _ = term.clear_line();
                let _ = term.write_str(&format!("{} {}", style(frame).cyan(), message));
                idx += 1;
                tokio::time::sleep(Duration::from_millis(80)).await;
            }
            let _ = term.clear_line();
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the spinner and clear the line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header once the resume position is known.
pub fn print_header(config: &ScanConfig, total: usize, start_index: usize) {
    let remaining = total.saturating_sub(start_index);
    println!(
        "{} {} {}",
        style("domain-hunt").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "— {} candidate{} (.{}, max {} chars)",
            total,
            if total == 1 { "" } else { "s" },
            config.tld,
            config.max_length
        ))
        .dim(),
    );

    let mut meta_parts = vec![
        format!("Concurrency: {}", config.concurrency),
        format!("Remaining: {}", remaining),
    ];
    if start_index > 0 {
        meta_parts.push(format!("Resuming at #{}", start_index + 1));
    }
    println!("{}", style(meta_parts.join(" | ")).dim());
    println!();
}

// ── Live progress ────────────────────────────────────────────────────────────

/// Build the progress line for a snapshot.
pub fn format_progress_line(snapshot: &ProgressSnapshot, tld: &str) -> String {
    let eta = snapshot
        .eta
        .map(format_eta)
        .unwrap_or_else(|| "Calculating...".to_string());

    format!(
        "Progress: [{}/{}] {:.2}% | ETA: {} | Current: {}.{}",
        snapshot.completed, snapshot.total, snapshot.percent, eta, snapshot.current, tld
    )
}

/// Rewrite the progress line in place.
pub fn print_progress(snapshot: &ProgressSnapshot, tld: &str) {
    let mut stdout = std::io::stdout();
    // Trailing spaces wipe leftovers from a longer previous line.
    let _ = write!(stdout, "\r{}    ", format_progress_line(snapshot, tld));
    let _ = stdout.flush();
}

/// Announce a match on its own line.
pub fn print_match(domain: &str) {
    println!(
        "\r{} {}",
        style("[!] MATCH FOUND:").green().bold(),
        style(domain).green()
    );
}

/// Announce a rate-limit cooldown on its own line.
pub fn print_cooldown(duration: Duration) {
    println!(
        "\r{}",
        style(format!(
            "[!] Rate limit hit! Cooling down for {}s...",
            duration.as_secs()
        ))
        .yellow()
    );
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the closing lines of a run.
pub fn print_summary(summary: &ScanSummary, output: &std::path::Path) {
    println!();
    match summary.outcome {
        ScanOutcome::Interrupted => {
            println!();
            println!("{}", style("Paused. Progress saved to checkpoint.").yellow().bold());
        }
        ScanOutcome::Completed => {
            println!("{}", style("Scan complete.").green().bold());
        }
    }

    let found = summary.matches.len();
    println!(
        "{} processed this run, {} match{} written to {}{}",
        summary.processed,
        found,
        if found == 1 { "" } else { "es" },
        output.display(),
        match summary.cooldowns {
            0 => String::new(),
            n => format!(", {} cooldown{}", n, if n == 1 { "" } else { "s" }),
        }
    );
    if let Some(last) = &summary.last_checkpoint {
        println!("{}", style(format!("Checkpoint: {}", last)).dim());
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(eta: Option<Duration>) -> ProgressSnapshot {
        ProgressSnapshot {
            completed: 40,
            total: 160,
            percent: 25.0,
            eta,
            current: "abc".to_string(),
        }
    }

    #[test]
    fn test_progress_line_with_eta() {
        let line = format_progress_line(&snapshot(Some(Duration::from_secs(3725))), "com");
        assert_eq!(
            line,
            "Progress: [40/160] 25.00% | ETA: 1:02:05 | Current: abc.com"
        );
    }

    #[test]
    fn test_progress_line_without_eta() {
        let line = format_progress_line(&snapshot(None), "net");
        assert!(line.contains("ETA: Calculating..."));
        assert!(line.ends_with("Current: abc.net"));
    }
}
