//! # Name Resolution
//!
//! Hook for turning name-bearing multiaddrs (`/dns4/...`, `/dnsaddr/...`) into
//! concrete ones. The crate performs no lookups itself: callers register a
//! [`Resolver`] per resolvable protocol and [`Resolvers`] routes each address
//! to the one matching its first resolvable segment.
//!
//! ```rust
//! use multiaddr_core::resolve::{Resolvers, StaticResolver};
//! use multiaddr_core::Multiaddr;
//!
//! let name: Multiaddr = "/dnsaddr/bootstrap.example".parse().unwrap();
//! let target: Multiaddr = "/ip4/10.0.0.1/tcp/4001".parse().unwrap();
//!
//! let resolvers = Resolvers::new();
//! resolvers
//!     .register("dnsaddr", StaticResolver::new().with("bootstrap.example", vec![target.clone()]))
//!     .unwrap();
//!
//! let resolved = futures::executor::block_on(resolvers.resolve(&name)).unwrap();
//! assert_eq!(resolved, vec![target]);
//! ```

use crate::error::{constants, BoxError, MultiaddrError, Result};
use crate::multiaddr::Multiaddr;
use crate::protocol::{self, Protocol};
use crate::utils::metrics::{Metrics, Timer};
use async_trait::async_trait;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, instrument, warn};

/// Name lookup handed to a [`Resolver`].
#[derive(Debug, Clone)]
pub struct ResolveQuery<'a> {
    /// Descriptor of the first resolvable segment
    pub protocol: &'static Protocol,
    /// Text value of that segment (the name)
    pub value: String,
    /// The full address being resolved
    pub addr: &'a Multiaddr,
}

/// Asynchronous name-resolution capability.
///
/// Results are expected to be concrete (not names); this is not enforced.
/// Cancellation and timeouts are the implementation's concern.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, query: ResolveQuery<'_>) -> std::result::Result<Vec<Multiaddr>, BoxError>;
}

/// Resolver answering from a fixed name table.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    entries: HashMap<String, Vec<Multiaddr>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the addresses `name` resolves to.
    pub fn with(mut self, name: impl Into<String>, addrs: Vec<Multiaddr>) -> Self {
        self.insert(name, addrs);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, addrs: Vec<Multiaddr>) {
        self.entries.insert(name.into(), addrs);
    }
}

#[async_trait]
impl Resolver for StaticResolver {
    async fn resolve(&self, query: ResolveQuery<'_>) -> std::result::Result<Vec<Multiaddr>, BoxError> {
        self.entries
            .get(&query.value)
            .cloned()
            .ok_or_else(|| format!("no records for {}", query.value).into())
    }
}

type ResolverRef = Arc<dyn Resolver + 'static>;

/// Resolvers keyed by protocol name.
#[derive(Clone)]
pub struct Resolvers {
    resolvers: Arc<RwLock<HashMap<Cow<'static, str>, ResolverRef>>>,
    metrics: Arc<Metrics>,
}

impl Default for Resolvers {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolvers {
    pub fn new() -> Self {
        Self {
            resolvers: Arc::new(RwLock::new(HashMap::new())),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Route names of `protocol` (or any of its aliases) to `resolver`.
    ///
    /// Replaces an earlier resolver for the same protocol.
    pub fn register<R>(&self, protocol: &str, resolver: R) -> Result<()>
    where
        R: Resolver + 'static,
    {
        let descriptor = protocol::by_name(protocol)?;
        let mut resolvers = self
            .resolvers
            .write()
            .map_err(|_| MultiaddrError::Custom(constants::ERR_RESOLVERS_WRITE_LOCK.to_string()))?;

        resolvers.insert(Cow::Owned(descriptor.name.clone()), Arc::new(resolver));
        debug!(protocol = %descriptor.name, "Resolver registered");
        Ok(())
    }

    /// Whether a resolver is registered for `protocol`.
    pub fn contains(&self, protocol: &str) -> bool {
        let Ok(descriptor) = protocol::by_name(protocol) else {
            return false;
        };
        self.resolvers
            .read()
            .map(|r| r.contains_key(descriptor.name.as_str()))
            .unwrap_or(false)
    }

    /// Resolve `addr` into concrete addresses.
    ///
    /// An address without resolvable segments resolves to itself.
    ///
    /// # Errors
    /// `NoResolver` when no resolver handles the first resolvable protocol;
    /// `Resolver` wrapping whatever the resolver failed with.
    #[instrument(skip(self, addr), fields(addr = %addr))]
    pub async fn resolve(&self, addr: &Multiaddr) -> Result<Vec<Multiaddr>> {
        let Some(segment) = addr.iter().find(|s| s.protocol.resolvable) else {
            return Ok(vec![addr.clone()]);
        };

        let resolver = {
            let resolvers = self.resolvers.read().map_err(|_| {
                MultiaddrError::Custom(constants::ERR_RESOLVERS_READ_LOCK.to_string())
            })?;
            resolvers
                .get(segment.protocol.name.as_str())
                .cloned()
                .ok_or_else(|| MultiaddrError::NoResolver(segment.protocol.name.clone()))?
        };

        let query = ResolveQuery {
            protocol: segment.protocol,
            value: segment.value_string()?.unwrap_or_default(),
            addr,
        };

        let _timer = Timer::start("resolve");
        self.metrics.resolution_attempt();

        match resolver.resolve(query).await {
            Ok(resolved) => {
                self.metrics.resolution_success(resolved.len() as u64);
                if resolved.iter().any(Multiaddr::is_name) {
                    warn!(count = resolved.len(), "Resolver returned addresses that still need resolution");
                }
                debug!(count = resolved.len(), "Address resolved");
                Ok(resolved)
            }
            Err(e) => {
                self.metrics.resolution_failed();
                warn!(error = %e, "Resolution failed");
                Err(MultiaddrError::Resolver(e))
            }
        }
    }

    /// Resolve every address concurrently, preserving input order.
    ///
    /// Fails with the first error encountered.
    pub async fn resolve_all(&self, addrs: &[Multiaddr]) -> Result<Vec<Vec<Multiaddr>>> {
        futures::future::try_join_all(addrs.iter().map(|addr| self.resolve(addr))).await
    }

    /// Counters for resolutions made through this set.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
