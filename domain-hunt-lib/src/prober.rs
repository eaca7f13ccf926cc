//! Per-candidate availability check.
//!
//! DNS first, registry second. A live DNS record settles the question for
//! free, and most dictionary words are live sites, so the rate-limited
//! registry only sees the names that survive the DNS pass.

use crate::error::HuntError;
use crate::protocols::rdap::outcome_for_status;
use crate::protocols::{DnsResolver, RdapClient, RegistryLookup, SystemResolver};
use crate::types::{ProbeOutcome, ScanConfig};
use std::sync::Arc;
use tracing::debug;

/// Checks whether a single candidate label is unregistered.
///
/// Holds no mutable state, so one prober is shared by every probe in a batch.
#[derive(Clone)]
pub struct AvailabilityProber {
    dns: Arc<dyn DnsResolver>,
    registry: Arc<dyn RegistryLookup>,
    tld: String,
}

impl AvailabilityProber {
    /// Build a prober from explicit DNS and registry implementations.
    pub fn new<S: Into<String>>(
        dns: Arc<dyn DnsResolver>,
        registry: Arc<dyn RegistryLookup>,
        tld: S,
    ) -> Self {
        Self {
            dns,
            registry,
            tld: tld.into(),
        }
    }

    /// Build a prober that talks to the system resolver and the configured
    /// RDAP endpoint.
    pub fn from_config(config: &ScanConfig) -> Result<Self, HuntError> {
        let dns = SystemResolver::new(config.request_timeout);
        let registry = RdapClient::with_config(&config.rdap_url, config.request_timeout)?;
        Ok(Self::new(Arc::new(dns), Arc::new(registry), &config.tld))
    }

    /// Probe one candidate label (without suffix).
    pub async fn probe(&self, candidate: &str) -> ProbeOutcome {
        let domain = format!("{}.{}", candidate, self.tld);

        if self.dns.resolves(&domain).await {
            debug!(domain = %domain, "resolves in DNS, skipping registry");
            return ProbeOutcome::Unavailable;
        }

        let outcome = match self.registry.lookup(&domain).await {
            Ok(status) => outcome_for_status(status),
            Err(e) => ProbeOutcome::Indeterminate {
                reason: e.to_string(),
            },
        };

        debug!(domain = %domain, outcome = %outcome, "registry lookup finished");
        outcome
    }

    pub fn tld(&self) -> &str {
        &self.tld
    }
}

impl std::fmt::Debug for AvailabilityProber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityProber")
            .field("tld", &self.tld)
            .finish_non_exhaustive()
    }
}
