//! RDAP (Registration Data Access Protocol) lookups.
//!
//! Only the status code of the response is used: a registry answers 404 for
//! a domain it has no record of and 429 when a client is over its quota.
//! The JSON body is never parsed.

use crate::error::HuntError;
use crate::types::ProbeOutcome;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::trace;

/// A registry that can be asked about a single domain.
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    /// Issue one lookup and return the HTTP status code of the answer.
    ///
    /// Transport failures and timeouts are errors; any status code, including
    /// 4xx and 5xx, is a successful lookup.
    async fn lookup(&self, domain: &str) -> Result<u16, HuntError>;
}

/// Map a registry status code to a probe outcome.
///
/// Only 404 and 429 carry meaning. Everything else, a 200 for a registered
/// domain included, is indeterminate and gets dropped by the scheduler.
pub fn outcome_for_status(status: u16) -> ProbeOutcome {
    match StatusCode::from_u16(status) {
        Ok(StatusCode::NOT_FOUND) => ProbeOutcome::Available,
        Ok(StatusCode::TOO_MANY_REQUESTS) => ProbeOutcome::RateLimited,
        _ => ProbeOutcome::Indeterminate {
            reason: format!("HTTP {}", status),
        },
    }
}

/// RDAP client for a single registry base URL.
#[derive(Clone)]
pub struct RdapClient {
    /// HTTP client for making RDAP requests
    http_client: reqwest::Client,
    /// Base URL the domain is appended to
    base_url: String,
    /// Timeout for RDAP requests
    timeout: Duration,
}

impl RdapClient {
    /// Create a new RDAP client with custom settings.
    pub fn with_config<S: Into<String>>(base_url: S, timeout: Duration) -> Result<Self, HuntError> {
        let http_client = reqwest::Client::builder()
            // Add buffer for HTTP timeout
            .timeout(timeout.saturating_add(Duration::from_secs(2)))
            .user_agent(concat!("domain-hunt/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                HuntError::network_with_source("Failed to create RDAP HTTP client", e.to_string())
            })?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            timeout,
        })
    }

    /// Build the lookup URL for a domain.
    pub fn url_for(&self, domain: &str) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, domain)
        } else {
            format!("{}/{}", self.base_url, domain)
        }
    }
}

impl std::fmt::Debug for RdapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdapClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl RegistryLookup for RdapClient {
    async fn lookup(&self, domain: &str) -> Result<u16, HuntError> {
        let url = self.url_for(domain);
        trace!(url = %url, "RDAP request");

        let request = self.http_client.get(&url).send();
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => Ok(response.status().as_u16()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(HuntError::timeout("RDAP request", self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(outcome_for_status(404), ProbeOutcome::Available);
        assert_eq!(outcome_for_status(429), ProbeOutcome::RateLimited);
        assert_eq!(
            outcome_for_status(200),
            ProbeOutcome::Indeterminate {
                reason: "HTTP 200".to_string()
            }
        );
        assert_eq!(
            outcome_for_status(503),
            ProbeOutcome::Indeterminate {
                reason: "HTTP 503".to_string()
            }
        );
        assert!(outcome_for_status(400).is_indeterminate());
        assert!(outcome_for_status(302).is_indeterminate());
    }

    #[test]
    fn test_url_joining() {
        let timeout = Duration::from_secs(3);
        let with_slash = RdapClient::with_config("https://rdap.example/domain/", timeout).unwrap();
        assert_eq!(
            with_slash.url_for("abc.com"),
            "https://rdap.example/domain/abc.com"
        );

        let without_slash =
            RdapClient::with_config("https://rdap.example/domain", timeout).unwrap();
        assert_eq!(
            without_slash.url_for("abc.com"),
            "https://rdap.example/domain/abc.com"
        );
    }

    #[test]
    fn test_huge_timeout_does_not_overflow() {
        let client = RdapClient::with_config("https://rdap.example/domain/", Duration::MAX);
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_registry_is_an_error() {
        // Port 9 (discard) on localhost is closed in practice; the request
        // must fail instead of yielding a status code.
        let client =
            RdapClient::with_config("http://127.0.0.1:9/domain/", Duration::from_secs(2)).unwrap();
        assert!(client.lookup("abc.com").await.is_err());
    }
}
