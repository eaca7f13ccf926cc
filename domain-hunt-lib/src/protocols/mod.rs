//! Protocol implementations used by the availability prober.
//!
//! Each protocol sits behind a small async trait so the prober and the
//! scheduler can be exercised without touching the network.

/// DNS liveness probe
pub mod dns;

/// RDAP (Registration Data Access Protocol) lookups
pub mod rdap;

// Re-export commonly used types
pub use dns::{DnsResolver, SystemResolver};
pub use rdap::{RdapClient, RegistryLookup};
