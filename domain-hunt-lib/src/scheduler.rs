//! Batch scheduler: the scan loop.
//!
//! The remaining candidates are cut into contiguous batches the size of the
//! concurrency limit. Each batch is probed as one task group and joined in
//! full before anything is written, so output and checkpoint writes only ever
//! happen on the coordinating task, in this order:
//!
//! 1. every available domain of the batch goes to the result sink,
//! 2. the checkpoint moves to the last candidate of the batch (input order),
//! 3. a progress event is emitted,
//! 4. one cooldown if any probe was rate limited, then the inter-batch delay.
//!
//! The shutdown future is raced against probing and pausing, never against
//! the writes, so a batch is either fully recorded or not recorded at all.

use crate::checkpoint::CheckpointStore;
use crate::error::HuntError;
use crate::prober::AvailabilityProber;
use crate::progress::ProgressTracker;
use crate::sink::ResultSink;
use crate::types::{ProbeOutcome, ScanConfig, ScanEvent, ScanOutcome, ScanSummary};
use crate::words::CandidateSet;
use futures_util::future::join_all;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Drives a candidate set through the prober in bounded batches.
#[derive(Debug)]
pub struct BatchScheduler {
    config: ScanConfig,
    prober: AvailabilityProber,
    sink: ResultSink,
    checkpoint: CheckpointStore,
}

impl BatchScheduler {
    pub fn new(
        config: ScanConfig,
        prober: AvailabilityProber,
        sink: ResultSink,
        checkpoint: CheckpointStore,
    ) -> Self {
        Self {
            config,
            prober,
            sink,
            checkpoint,
        }
    }

    /// Wire up the real DNS resolver, RDAP client, output file and checkpoint
    /// file described by `config`.
    pub fn from_config(config: ScanConfig) -> Result<Self, HuntError> {
        let prober = AvailabilityProber::from_config(&config)?;
        let sink = ResultSink::open(&config.output_path)?;
        let checkpoint = CheckpointStore::new(&config.checkpoint_path);
        Ok(Self::new(config, prober, sink, checkpoint))
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn checkpoint(&self) -> &CheckpointStore {
        &self.checkpoint
    }

    /// Resume from the stored checkpoint and run to completion or shutdown.
    pub async fn resume<S, F>(
        &mut self,
        candidates: &CandidateSet,
        shutdown: S,
        on_event: F,
    ) -> Result<ScanSummary, HuntError>
    where
        S: Future<Output = ()>,
        F: FnMut(ScanEvent),
    {
        let start_index = self.checkpoint.resume_index(candidates);
        self.run(candidates, start_index, shutdown, on_event).await
    }

    /// Process `candidates[start_index..]`.
    ///
    /// Returns early with [`ScanOutcome::Interrupted`] as soon as `shutdown`
    /// completes. Only failures to write the output or checkpoint file are
    /// errors; individual probe failures are dropped.
    pub async fn run<S, F>(
        &mut self,
        candidates: &CandidateSet,
        start_index: usize,
        shutdown: S,
        mut on_event: F,
    ) -> Result<ScanSummary, HuntError>
    where
        S: Future<Output = ()>,
        F: FnMut(ScanEvent),
    {
        tokio::pin!(shutdown);

        let words = candidates.as_slice();
        let total = words.len();
        let start_index = start_index.min(total);
        let batch_size = self.config.concurrency.max(1);

        let tracker = ProgressTracker::new(total, start_index);
        let mut summary = ScanSummary::new(start_index, total);
        summary.last_checkpoint = self.checkpoint.load();

        info!(
            total,
            start_index,
            remaining = total - start_index,
            concurrency = batch_size,
            "scan started"
        );

        let prober = &self.prober;
        let mut completed = start_index;
        let mut batches = words[start_index..].chunks(batch_size).peekable();

        while let Some(batch) = batches.next() {
            let probes = join_all(batch.iter().map(|candidate| prober.probe(candidate)));

            let outcomes = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(completed, "shutdown requested mid-batch, abandoning batch");
                    summary.outcome = ScanOutcome::Interrupted;
                    return Ok(summary);
                }
                outcomes = probes => outcomes,
            };

            let mut rate_limited = 0usize;
            for (candidate, outcome) in batch.iter().zip(&outcomes) {
                match outcome {
                    ProbeOutcome::Available => {
                        let domain = self.config.domain_for(candidate);
                        self.sink.record(&domain)?;
                        info!(domain = %domain, "match found");
                        summary.matches.push(domain.clone());
                        on_event(ScanEvent::Match { domain });
                    }
                    ProbeOutcome::RateLimited => rate_limited += 1,
                    ProbeOutcome::Indeterminate { reason } => {
                        debug!(candidate = %candidate, reason = %reason, "check failed, dropping");
                    }
                    ProbeOutcome::Unavailable => {}
                }
            }

            if let Some(last) = batch.last() {
                self.checkpoint.save(last)?;
                completed += batch.len();
                summary.processed += batch.len();
                summary.batches += 1;
                summary.last_checkpoint = Some(last.clone());
                on_event(ScanEvent::BatchCompleted(tracker.snapshot(completed, last)));
            }

            if rate_limited > 0 {
                let cooldown = self.config.cooldown;
                warn!(rate_limited, ?cooldown, "registry rate limit hit, cooling down");
                summary.cooldowns += 1;
                on_event(ScanEvent::CoolingDown { duration: cooldown });

                if !pause(cooldown, shutdown.as_mut()).await {
                    summary.outcome = ScanOutcome::Interrupted;
                    return Ok(summary);
                }
            }

            if batches.peek().is_some() && !pause(self.config.batch_delay, shutdown.as_mut()).await
            {
                summary.outcome = ScanOutcome::Interrupted;
                return Ok(summary);
            }
        }

        info!(
            processed = summary.processed,
            matches = summary.matches.len(),
            "scan completed"
        );
        Ok(summary)
    }
}

/// Sleep for `duration` unless `shutdown` fires first. Returns `false` when
/// interrupted.
async fn pause<S>(duration: Duration, shutdown: Pin<&mut S>) -> bool
where
    S: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = shutdown => {
            info!("shutdown requested while paused");
            false
        }
        _ = tokio::time::sleep(duration) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::{DnsResolver, RegistryLookup};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NoDns;

    #[async_trait]
    impl DnsResolver for NoDns {
        async fn resolves(&self, _domain: &str) -> bool {
            false
        }
    }

    struct AlwaysStatus(u16);

    #[async_trait]
    impl RegistryLookup for AlwaysStatus {
        async fn lookup(&self, _domain: &str) -> Result<u16, HuntError> {
            Ok(self.0)
        }
    }

    fn scheduler(dir: &std::path::Path, status: u16, concurrency: usize) -> BatchScheduler {
        let config = ScanConfig::default()
            .with_concurrency(concurrency)
            .with_output_path(dir.join("out.txt"))
            .with_checkpoint_path(dir.join("checkpoint.txt"))
            .with_cooldown(Duration::ZERO)
            .with_batch_delay(Duration::ZERO);
        let prober =
            AvailabilityProber::new(Arc::new(NoDns), Arc::new(AlwaysStatus(status)), "com");
        let sink = ResultSink::open(&config.output_path).unwrap();
        let checkpoint = CheckpointStore::new(&config.checkpoint_path);
        BatchScheduler::new(config, prober, sink, checkpoint)
    }

    #[tokio::test]
    async fn test_batches_and_progress_events() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = scheduler(dir.path(), 200, 2);
        let candidates = CandidateSet::from_text("a\nb\nc\nd\ne\n", 6);

        let mut snapshots = Vec::new();
        let summary = scheduler
            .run(&candidates, 0, std::future::pending::<()>(), |event| {
                if let ScanEvent::BatchCompleted(snap) = event {
                    snapshots.push((snap.completed, snap.current));
                }
            })
            .await
            .unwrap();

        assert_eq!(summary.outcome, ScanOutcome::Completed);
        assert_eq!(summary.batches, 3);
        assert_eq!(summary.processed, 5);
        assert_eq!(
            snapshots,
            vec![
                (2, "b".to_string()),
                (4, "d".to_string()),
                (5, "e".to_string())
            ]
        );
        assert_eq!(scheduler.checkpoint().load(), Some("e".to_string()));
    }

    #[tokio::test]
    async fn test_start_index_past_end_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = scheduler(dir.path(), 404, 2);
        let candidates = CandidateSet::from_text("a\nb\n", 6);

        let summary = scheduler
            .run(&candidates, 10, std::future::pending::<()>(), |_| {})
            .await
            .unwrap();

        assert_eq!(summary.start_index, 2);
        assert_eq!(summary.processed, 0);
        assert!(summary.matches.is_empty());
        assert_eq!(scheduler.checkpoint().load(), None);
    }

    #[tokio::test]
    async fn test_shutdown_before_start_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = scheduler(dir.path(), 404, 2);
        let candidates = CandidateSet::from_text("a\nb\n", 6);

        let summary = scheduler
            .run(&candidates, 0, std::future::ready(()), |_| {})
            .await
            .unwrap();

        assert_eq!(summary.outcome, ScanOutcome::Interrupted);
        assert_eq!(summary.batches, 0);
        assert_eq!(scheduler.checkpoint().load(), None);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("out.txt")).unwrap(),
            ""
        );
    }

    #[tokio::test]
    async fn test_one_cooldown_per_rate_limited_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut scheduler = scheduler(dir.path(), 429, 3);
        let candidates = CandidateSet::from_text("a\nb\nc\nd\ne\nf\n", 6);

        let mut cooldown_events = 0;
        let summary = scheduler
            .run(&candidates, 0, std::future::pending::<()>(), |event| {
                if matches!(event, ScanEvent::CoolingDown { .. }) {
                    cooldown_events += 1;
                }
            })
            .await
            .unwrap();

        assert_eq!(summary.batches, 2);
        assert_eq!(summary.cooldowns, 2);
        assert_eq!(cooldown_events, 2);
        // Rate-limited candidates are not retried; the checkpoint still moves
        assert_eq!(summary.last_checkpoint, Some("f".to_string()));
    }
}
