//! Observability and Metrics
//!
//! Counters for address parsing and name resolution.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Metrics collector for multiaddr operations
#[derive(Debug)]
pub struct Metrics {
    /// Addresses successfully constructed from text or bytes
    pub addresses_parsed: AtomicU64,
    /// Construction attempts that failed
    pub parse_errors: AtomicU64,
    /// Resolution attempts handed to a resolver
    pub resolutions_total: AtomicU64,
    /// Resolutions that completed
    pub resolutions_success: AtomicU64,
    /// Resolutions that failed
    pub resolutions_failed: AtomicU64,
    /// Addresses returned by resolvers
    pub addresses_resolved: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            addresses_parsed: AtomicU64::new(0),
            parse_errors: AtomicU64::new(0),
            resolutions_total: AtomicU64::new(0),
            resolutions_success: AtomicU64::new(0),
            resolutions_failed: AtomicU64::new(0),
            addresses_resolved: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a successfully constructed address
    pub fn address_parsed(&self) {
        self.addresses_parsed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed construction
    pub fn parse_error(&self) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a resolution attempt
    pub fn resolution_attempt(&self) {
        self.resolutions_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful resolution and how many addresses it produced
    pub fn resolution_success(&self, address_count: u64) {
        self.resolutions_success.fetch_add(1, Ordering::Relaxed);
        self.addresses_resolved
            .fetch_add(address_count, Ordering::Relaxed);
    }

    /// Record a failed resolution
    pub fn resolution_failed(&self) {
        self.resolutions_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            addresses_parsed: self.addresses_parsed.load(Ordering::Relaxed),
            parse_errors: self.parse_errors.load(Ordering::Relaxed),
            resolutions_total: self.resolutions_total.load(Ordering::Relaxed),
            resolutions_success: self.resolutions_success.load(Ordering::Relaxed),
            resolutions_failed: self.resolutions_failed.load(Ordering::Relaxed),
            addresses_resolved: self.addresses_resolved.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            addresses_parsed = snapshot.addresses_parsed,
            parse_errors = snapshot.parse_errors,
            resolutions_total = snapshot.resolutions_total,
            resolutions_success = snapshot.resolutions_success,
            resolutions_failed = snapshot.resolutions_failed,
            addresses_resolved = snapshot.addresses_resolved,
            uptime_seconds = snapshot.uptime_seconds,
            "Multiaddr metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub addresses_parsed: u64,
    pub parse_errors: u64,
    pub resolutions_total: u64,
    pub resolutions_success: u64,
    pub resolutions_failed: u64,
    pub addresses_resolved: u64,
    pub uptime_seconds: u64,
}

/// Global metrics instance
static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}
