//! # Protocol Registry
//!
//! Descriptors for every protocol a multiaddr may contain, and the lookup table
//! the codecs consult.
//!
//! ## Components
//! - **Registry**: code and name lookups, duplicate detection, aliases
//! - **Table**: the built-in `[code, size, name, resolvable, path]` rows
//!
//! ## Lifecycle
//! The process-wide registry is fixed the first time it is needed. Call
//! [`install`] once at startup to replace the built-in table (for example with
//! one built from [`crate::config::MultiaddrConfig`]); every later lookup reads
//! it without locking.

pub mod registry;
pub mod table;

#[cfg(test)]
mod tests;

pub use registry::{AddressSize, Protocol, Registry, ValueFormat, VARIABLE_SIZE};
pub use table::{builtin_entries, ProtocolEntry};

use crate::error::{MultiaddrError, Result};
use once_cell::sync::OnceCell;
use tracing::debug;

static REGISTRY: OnceCell<Registry> = OnceCell::new();

/// The process-wide registry, built from the built-in table unless one was installed.
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::builtin)
}

/// Install the process-wide registry.
///
/// # Errors
/// Returns `RegistryAlreadyInstalled` if a registry was installed or already
/// used by an earlier lookup.
pub fn install(registry: Registry) -> Result<()> {
    let count = registry.len();
    REGISTRY
        .set(registry)
        .map_err(|_| MultiaddrError::RegistryAlreadyInstalled)?;
    debug!(protocols = count, "Protocol registry installed");
    Ok(())
}

/// Descriptor for `code` in the process-wide registry.
pub fn by_code(code: u32) -> Result<&'static Protocol> {
    registry().by_code(code)
}

/// Descriptor for `name` in the process-wide registry.
pub fn by_name(name: &str) -> Result<&'static Protocol> {
    registry().by_name(name)
}
