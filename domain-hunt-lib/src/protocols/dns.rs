//! DNS liveness probe.
//!
//! A name that resolves is a live site and therefore registered. Only
//! success or failure matters; the returned records are never inspected.

use async_trait::async_trait;
use std::time::Duration;
use tracing::trace;

/// Anything that can tell whether a hostname currently resolves.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// `true` when the name resolves to at least one address.
    ///
    /// NXDOMAIN, resolver errors and timeouts all report `false`.
    async fn resolves(&self, domain: &str) -> bool;
}

/// Resolver backed by the operating system's hostname lookup.
#[derive(Debug, Clone)]
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

#[async_trait]
impl DnsResolver for SystemResolver {
    async fn resolves(&self, domain: &str) -> bool {
        let lookup = tokio::net::lookup_host((domain, 0));

        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(mut addrs)) => addrs.next().is_some(),
            Ok(Err(e)) => {
                trace!(domain, error = %e, "DNS lookup failed");
                false
            }
            Err(_) => {
                trace!(domain, timeout = ?self.timeout, "DNS lookup timed out");
                false
            }
        }
    }
}
